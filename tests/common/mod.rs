//! Builder for well-formed synthetic SE1 images.
//!
//! Emits the full wire format end to end: CRLF banners, endianness
//! sentinel, constant area with per-body records, 3-byte segment index
//! tables and packed coefficient streams, in either byte order. Tests
//! choose magnitudes directly so expected coefficient values are exact.
#![allow(dead_code)]

/// One packing class worth of coefficients: `(class, signed magnitudes)`.
/// The decoded coefficient value is `magnitude * rmax / 2 / 1e9`.
pub type PackedClass = (usize, Vec<i64>);

/// Per-coordinate packed payload for one segment, x then y then z.
pub type SegmentPayload = [Vec<PackedClass>; 3];

pub struct PlanetSpec {
    pub ibdy: i32,
    pub flags: u8,
    pub ncoe: usize,
    pub rmax: f64,
    pub tfstart: f64,
    pub dseg: f64,
    /// Declared segment count; `tfend = tfstart + nseg * dseg`. Entries
    /// without a payload in `segments` stay zeroed in the index table.
    pub nseg: usize,
    pub telem: f64,
    pub prot: f64,
    pub dprot: f64,
    pub qrot: f64,
    pub dqrot: f64,
    pub peri: f64,
    pub dperi: f64,
    pub refep: Option<Vec<f64>>,
    pub segments: Vec<SegmentPayload>,
}

impl PlanetSpec {
    /// A body whose three coordinates are single class-0 coefficients, so
    /// every position query returns `magnitude * rmax / 4e9` per axis.
    pub fn constant(ibdy: i32, flags: u8, mags: [i64; 3], tfstart: f64, dseg: f64) -> Self {
        PlanetSpec {
            ibdy,
            flags,
            ncoe: 2,
            rmax: 4.0,
            tfstart,
            dseg,
            nseg: 1,
            telem: tfstart,
            prot: 0.0,
            dprot: 0.0,
            qrot: 0.0,
            dqrot: 0.0,
            peri: 0.0,
            dperi: 0.0,
            refep: None,
            segments: vec![[
                vec![(0, vec![mags[0]])],
                vec![(0, vec![mags[1]])],
                vec![(0, vec![mags[2]])],
            ]],
        }
    }

    pub fn tfend(&self) -> f64 {
        self.tfstart + self.nseg as f64 * self.dseg
    }

    /// Decoded coefficient values for one coordinate, in precision-class
    /// order as the reader emits them, padded to `ncoe`.
    pub fn coefficients(&self, segment: usize, coord: usize) -> Vec<f64> {
        let scale = self.rmax / 2.0 / 1e9;
        let mut coefs = Vec::new();
        for class in 0..6usize {
            if let Some((_, mags)) = self.segments[segment][coord]
                .iter()
                .find(|(c, _)| *c == class)
            {
                coefs.extend(mags.iter().map(|&m| m as f64 * scale));
            }
        }
        coefs.resize(self.ncoe, 0.0);
        coefs
    }
}

pub struct Se1Builder {
    pub big_endian: bool,
    pub wide_body_ids: bool,
    pub ephemeris_number: i32,
    pub planets: Vec<PlanetSpec>,
}

impl Se1Builder {
    pub fn new() -> Self {
        Se1Builder {
            big_endian: false,
            wide_body_ids: false,
            ephemeris_number: 431,
            planets: Vec::new(),
        }
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    pub fn wide_body_ids(mut self) -> Self {
        self.wide_body_ids = true;
        self
    }

    pub fn planet(mut self, spec: PlanetSpec) -> Self {
        self.planets.push(spec);
        self
    }

    fn w_i16(&self, buf: &mut Vec<u8>, v: i16) {
        if self.big_endian {
            buf.extend_from_slice(&v.to_be_bytes());
        } else {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn w_i32(&self, buf: &mut Vec<u8>, v: i32) {
        if self.big_endian {
            buf.extend_from_slice(&v.to_be_bytes());
        } else {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn w_u32(&self, buf: &mut Vec<u8>, v: u32) {
        if self.big_endian {
            buf.extend_from_slice(&v.to_be_bytes());
        } else {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn w_f64(&self, buf: &mut Vec<u8>, v: f64) {
        if self.big_endian {
            buf.extend_from_slice(&v.to_be_bytes());
        } else {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn patch_i32(&self, buf: &mut [u8], at: usize, v: i32) {
        let bytes = if self.big_endian {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        };
        buf[at..at + 4].copy_from_slice(&bytes);
    }

    /// Write a 3-byte index entry: the low three bytes of `v` in file order.
    fn patch_u24(&self, buf: &mut [u8], at: usize, v: u32) {
        assert!(v < 1 << 24, "segment offset {v} exceeds 3 bytes");
        let bytes = if self.big_endian {
            [(v >> 16) as u8, (v >> 8) as u8, v as u8]
        } else {
            [v as u8, (v >> 8) as u8, (v >> 16) as u8]
        };
        buf[at..at + 3].copy_from_slice(&bytes);
    }

    /// Whole-byte code (classes 0..=3): sign in the least significant bit.
    fn encode_field(mag: i64) -> u32 {
        if mag >= 0 {
            (mag as u32) << 1
        } else {
            ((-mag as u32) << 1) - 1
        }
    }

    /// Sub-byte field (classes 4 and 5): sign in the field's top bit, the
    /// inverse of the reader's `(field + top_bit) >> 1` magnitude rule.
    /// Representable magnitudes: `0 ..= top_bit/2 - 1` positive and
    /// `top_bit ..= top_bit + top_bit/2 - 1` negative.
    fn encode_subfield(mag: i64, top_bit: u32) -> u32 {
        let field = if mag >= 0 {
            (mag as u32) << 1
        } else {
            let doubled = (-mag as u32) << 1;
            assert!(
                doubled >= top_bit,
                "magnitude {mag} is not representable in a sub-byte field"
            );
            doubled - top_bit
        };
        assert!(
            field < top_bit << 1 && (field & top_bit != 0) == (mag < 0),
            "magnitude {mag} is not representable in a sub-byte field"
        );
        field
    }

    fn write_coordinate(&self, buf: &mut Vec<u8>, classes: &[PackedClass]) {
        let mut nsize = [0usize; 6];
        for (class, mags) in classes {
            assert!(*class < 6, "packing class out of range");
            nsize[*class] = mags.len();
            assert!(mags.len() <= 15, "class count exceeds a nibble");
        }
        let extended = nsize[4] + nsize[5] > 0 || nsize[0] > 7;
        if extended {
            buf.push(0x80);
            buf.push(((nsize[0] << 4) | nsize[1]) as u8);
            buf.push(((nsize[2] << 4) | nsize[3]) as u8);
            buf.push(((nsize[4] << 4) | nsize[5]) as u8);
        } else {
            buf.push(((nsize[0] << 4) | nsize[1]) as u8);
            buf.push(((nsize[2] << 4) | nsize[3]) as u8);
        }

        for class in 0..6usize {
            let Some((_, mags)) = classes.iter().find(|(c, _)| *c == class) else {
                continue;
            };
            if mags.is_empty() {
                continue;
            }
            match class {
                0..=3 => {
                    let width = 4 - class;
                    for &m in mags {
                        let code = Self::encode_field(m);
                        assert!(
                            width == 4 || code < 1u32 << (8 * width),
                            "magnitude {m} does not fit class {class}"
                        );
                        if self.big_endian {
                            buf.extend_from_slice(&code.to_be_bytes()[4 - width..]);
                        } else {
                            buf.extend_from_slice(&code.to_le_bytes()[..width]);
                        }
                    }
                }
                4 => {
                    for pair in mags.chunks(2) {
                        let hi = Self::encode_subfield(pair[0], 0x8);
                        let lo = pair
                            .get(1)
                            .map(|&m| Self::encode_subfield(m, 0x8))
                            .unwrap_or(0);
                        buf.push(((hi << 4) | lo) as u8);
                    }
                }
                _ => {
                    for quad in mags.chunks(4) {
                        let mut byte = 0u32;
                        for (slot, &m) in quad.iter().enumerate() {
                            byte |= Self::encode_subfield(m, 0x2) << (6 - 2 * slot);
                        }
                        buf.push(byte as u8);
                    }
                }
            }
        }
    }

    pub fn build(&self) -> Vec<u8> {
        assert!(!self.planets.is_empty(), "builder needs at least one body");
        let tfstart_file = self
            .planets
            .iter()
            .map(|p| p.tfstart)
            .fold(f64::INFINITY, f64::min);
        let tfend_file = self
            .planets
            .iter()
            .map(|p| p.tfend())
            .fold(f64::NEG_INFINITY, f64::max);

        let mut buf = Vec::new();
        buf.extend_from_slice(b"SE1 synthetic planetary ephemeris\r\n");
        buf.extend_from_slice(b"navagraha test fixture\r\n");
        buf.extend_from_slice(b"generated in-process\r\n");

        self.w_u32(&mut buf, 0x616263);
        let length_at = buf.len();
        self.w_i32(&mut buf, 0);
        self.w_i32(&mut buf, self.ephemeris_number);
        self.w_f64(&mut buf, tfstart_file);
        self.w_f64(&mut buf, tfend_file);

        let nplan = self.planets.len() as i16;
        if self.wide_body_ids {
            self.w_i16(&mut buf, nplan + 256);
            for p in &self.planets {
                self.w_i32(&mut buf, p.ibdy);
            }
        } else {
            self.w_i16(&mut buf, nplan);
            for p in &self.planets {
                self.w_i16(&mut buf, p.ibdy as i16);
            }
        }

        self.w_u32(&mut buf, 0); // crc, recorded but not validated
        for g in [
            299792.458,
            149597870.7,
            2.959122082855911e-4,
            81.30056,
            0.004654,
        ] {
            self.w_f64(&mut buf, g);
        }

        let mut lndx_at = Vec::with_capacity(self.planets.len());
        for p in &self.planets {
            lndx_at.push(buf.len());
            self.w_i32(&mut buf, 0);
            buf.push(p.flags);
            buf.push(p.ncoe as u8);
            self.w_i32(&mut buf, (p.rmax * 1000.0).round() as i32);
            for v in [
                p.tfstart,
                p.tfend(),
                p.dseg,
                p.telem,
                p.prot,
                p.dprot,
                p.qrot,
                p.dqrot,
                p.peri,
                p.dperi,
            ] {
                self.w_f64(&mut buf, v);
            }
            if let Some(refep) = &p.refep {
                assert_eq!(refep.len(), 2 * p.ncoe, "refep must hold 2*ncoe doubles");
                for &v in refep {
                    self.w_f64(&mut buf, v);
                }
            }
        }

        for (pi, p) in self.planets.iter().enumerate() {
            let table_at = buf.len();
            self.patch_i32(&mut buf, lndx_at[pi], table_at as i32);
            buf.resize(table_at + 3 * p.nseg, 0);
            for (si, payload) in p.segments.iter().enumerate() {
                assert!(si < p.nseg, "more payloads than declared segments");
                let start = buf.len() as u32;
                self.patch_u24(&mut buf, table_at + 3 * si, start);
                for coord in payload {
                    self.write_coordinate(&mut buf, coord);
                }
            }
        }

        let total = buf.len() as i32;
        self.patch_i32(&mut buf, length_at, total);
        buf
    }
}
