use nom::{
    bytes::complete::{tag, take, take_until},
    multi::count,
    number::{complete as num, Endianness},
    IResult,
};

use super::planet_ids::PlanetFlags;
use crate::navagraha_errors::NavagrahaError;

/// The constant-area endianness sentinel, the bytes "abc" read as an integer.
const ENDIAN_SENTINEL: u32 = 0x616263;

/// File-wide constants parsed from the constant area of an SE1 file.
#[derive(Debug, Clone)]
pub struct FileHeader {
    /// Byte order negotiated from the endianness sentinel.
    pub fendian: Endianness,
    /// Total file length recorded by the producer, bytes.
    pub file_length: i32,
    /// Numbering of the underlying development ephemeris (e.g. 431).
    pub ephemeris_number: i32,
    /// First Julian day covered by any body in this file.
    pub tfstart: f64,
    /// Last Julian day covered by any body in this file.
    pub tfend: f64,
    /// CRC word over the constant area, recorded but not validated.
    pub crc: u32,
    /// Speed of light, km/s.
    pub clight: f64,
    /// Astronomical unit, km.
    pub aunit: f64,
    /// Heliocentric gravitational constant.
    pub helgravconst: f64,
    /// Earth / Moon mass ratio.
    pub ratme: f64,
    /// Solar radius, AU.
    pub sunradius: f64,
}

/// Immutable per-body metadata from the constant area.
///
/// One record per body id listed in the file. The ten rotation constants
/// (`telem` .. `dperi`) parameterize the back-transform from the body's mean
/// orbital plane; `refep` holds the reference-ellipse Chebyshev coefficients
/// when the ellipse flag is set.
#[derive(Debug, Clone)]
pub struct PlanetRecord {
    pub ibdy: i32,
    /// File position of this body's 3-byte segment index table.
    pub index_table_offset: i32,
    pub iflg: PlanetFlags,
    /// Chebyshev coefficients per coordinate in each segment.
    pub ncoe: usize,
    /// Decompression scale factor.
    pub rmax: f64,
    pub tfstart: f64,
    pub tfend: f64,
    /// Segment length, days.
    pub dseg: f64,
    /// Reference epoch of the rotation constants, Julian day.
    pub telem: f64,
    pub prot: f64,
    pub dprot: f64,
    pub qrot: f64,
    pub dqrot: f64,
    pub peri: f64,
    pub dperi: f64,
    /// Reference-ellipse coefficients, `2 * ncoe` doubles, x block then y block.
    pub refep: Option<Vec<f64>>,
}

fn invalid(what: impl Into<String>) -> NavagrahaError {
    NavagrahaError::InvalidHeader(what.into())
}

fn ctx<'a, T>(res: IResult<&'a [u8], T>, what: &str) -> Result<(&'a [u8], T), NavagrahaError> {
    res.map_err(|_| invalid(format!("short read in constant area: {what}")))
}

/// One CRLF-terminated banner line, terminator consumed.
fn banner_line(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let (input, line) = take_until(&b"\r\n"[..])(input)?;
    let (input, _) = tag(&b"\r\n"[..])(input)?;
    Ok((input, line))
}

fn sentinel_bytes(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take(4usize)(input)
}

fn planet_record(input: &[u8], en: Endianness, ibdy: i32) -> IResult<&[u8], PlanetRecord> {
    let (input, lndx0) = num::i32(en)(input)?;
    let (input, iflg) = num::u8(input)?;
    let (input, ncoe) = num::u8(input)?;
    let (input, rmax_raw) = num::i32(en)(input)?;
    let (input, doubles) = count(num::f64(en), 10)(input)?;

    let iflg = PlanetFlags::new(iflg);
    let ncoe = ncoe as usize;
    let (input, refep) = if iflg.has_ellipse() {
        let (input, refep) = count(num::f64(en), 2 * ncoe)(input)?;
        (input, Some(refep))
    } else {
        (input, None)
    };

    Ok((
        input,
        PlanetRecord {
            ibdy,
            index_table_offset: lndx0,
            iflg,
            ncoe,
            rmax: rmax_raw as f64 / 1000.0,
            tfstart: doubles[0],
            tfend: doubles[1],
            dseg: doubles[2],
            telem: doubles[3],
            prot: doubles[4],
            dprot: doubles[5],
            qrot: doubles[6],
            dqrot: doubles[7],
            peri: doubles[8],
            dperi: doubles[9],
            refep,
        },
    ))
}

/// Parse the constant area of an SE1 file image.
///
/// Consumes the three banner lines, negotiates byte order from the sentinel,
/// then reads the file-wide constants and every per-body record, in the
/// position-dependent order the producer wrote them.
///
/// Return
/// ------
/// * The file header and the body records in file order, or
///   [`NavagrahaError::InvalidHeader`] naming the first field that failed.
pub fn parse(image: &[u8]) -> Result<(FileHeader, Vec<PlanetRecord>), NavagrahaError> {
    let mut input = image;
    for _ in 0..3 {
        let (rest, _) =
            banner_line(input).map_err(|_| invalid("missing CRLF-terminated banner line"))?;
        input = rest;
    }

    let (input, raw) =
        sentinel_bytes(input).map_err(|_| invalid("truncated before endianness sentinel"))?;
    let sentinel: [u8; 4] = raw.try_into().expect("take(4) yields four bytes");
    let fendian = if u32::from_le_bytes(sentinel) == ENDIAN_SENTINEL {
        Endianness::Little
    } else if u32::from_be_bytes(sentinel) == ENDIAN_SENTINEL {
        Endianness::Big
    } else {
        return Err(invalid("invalid endianness"));
    };
    let en = fendian;

    let (input, file_length) = ctx(num::i32(en)(input), "file length")?;
    if file_length < 0 || file_length as usize != image.len() {
        return Err(invalid(format!(
            "file length word {file_length} does not match image size {}",
            image.len()
        )));
    }

    let (input, ephemeris_number) = ctx(num::i32(en)(input), "ephemeris number")?;
    let (input, tfstart) = ctx(num::f64(en)(input), "file start epoch")?;
    let (input, tfend) = ctx(num::f64(en)(input), "file end epoch")?;

    // A body count above 256 flags 4-byte body ids on disk.
    let (input, nplan_raw) = ctx(num::i16(en)(input), "body count")?;
    let wide_ids = nplan_raw > 256;
    let nplan = if wide_ids {
        (nplan_raw % 256) as usize
    } else {
        nplan_raw as usize
    };

    let (input, ipl) = if wide_ids {
        ctx(count(num::i32(en), nplan)(input), "body ids")?
    } else {
        let (rest, ids) = ctx(count(num::i16(en), nplan)(input), "body ids")?;
        (rest, ids.into_iter().map(i32::from).collect())
    };

    let (input, crc) = ctx(num::u32(en)(input), "crc")?;
    let (input, globals) = ctx(count(num::f64(en), 5)(input), "global constants")?;

    let header = FileHeader {
        fendian,
        file_length,
        ephemeris_number,
        tfstart,
        tfend,
        crc,
        clight: globals[0],
        aunit: globals[1],
        helgravconst: globals[2],
        ratme: globals[3],
        sunradius: globals[4],
    };

    let mut records = Vec::with_capacity(nplan);
    let mut input = input;
    for &ibdy in &ipl {
        let (rest, rec) = planet_record(input, en, ibdy)
            .map_err(|_| invalid(format!("short read in constant area: body {ibdy} record")))?;
        input = rest;
        records.push(rec);
    }

    for rec in &records {
        if rec.ncoe < 1 {
            return Err(invalid(format!("body {}: zero Chebyshev order", rec.ibdy)));
        }
        if !(rec.dseg > 0.0) {
            return Err(invalid(format!(
                "body {}: non-positive segment length {}",
                rec.ibdy, rec.dseg
            )));
        }
        if !(rec.rmax > 0.0) {
            return Err(invalid(format!(
                "body {}: non-positive scale factor {}",
                rec.ibdy, rec.rmax
            )));
        }
        if rec.tfstart > rec.tfend {
            return Err(invalid(format!(
                "body {}: start epoch {} after end epoch {}",
                rec.ibdy, rec.tfstart, rec.tfend
            )));
        }
        if rec.tfstart < header.tfstart || rec.tfend > header.tfend {
            return Err(invalid(format!(
                "body {}: window [{}, {}] outside file window [{}, {}]",
                rec.ibdy, rec.tfstart, rec.tfend, header.tfstart, header.tfend
            )));
        }
        if rec.index_table_offset < 0 {
            return Err(invalid(format!(
                "body {}: negative index table offset",
                rec.ibdy
            )));
        }
    }

    Ok((header, records))
}
