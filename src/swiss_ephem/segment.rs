use nom::number::Endianness;
use smallvec::SmallVec;

use super::{endian_reader::EphemerisCursor, se1_header::PlanetRecord};
use crate::navagraha_errors::NavagrahaError;

/// Decoded coefficients for one contiguous segment of a body.
#[derive(Debug, Clone)]
pub(crate) struct SegmentCoefficients {
    pub tseg0: f64,
    pub tseg1: f64,
    /// `3 * ncoe` doubles, laid out x block, y block, z block.
    pub segp: Vec<f64>,
    /// Effective polynomial order. Equals `ncoe` after every decode; kept in
    /// case future file revisions reduce it.
    pub neval: usize,
}

/// Unpack one whole-byte code (classes 0..=3) into a scaled coefficient.
///
/// The least significant bit of the code is the sign, the remaining high
/// bits the magnitude. The `(code + 1) >> 1` branch for negatives mirrors
/// the producer's encoding exactly, so positive and negative coefficients
/// round-trip bit for bit.
fn unpack_field(code: u32, scale: f64) -> f64 {
    let code = code as u64;
    if code & 1 != 0 {
        -(((code + 1) >> 1) as f64 * scale)
    } else {
        ((code >> 1) as f64 * scale)
    }
}

/// Unpack one sub-byte field (classes 4 and 5) into a scaled coefficient.
///
/// The sub-byte classes carry the sign in the field's own top bit, not in
/// its least significant bit; the two conventions are distinct on the wire
/// and must not be unified. When the top bit is set the coefficient is
/// negated with magnitude `(field + top_bit) >> 1`, otherwise the
/// magnitude is `field >> 1`, symmetric with the whole-byte idiom.
fn unpack_subfield(field: u32, top_bit: u32, scale: f64) -> f64 {
    if field & top_bit != 0 {
        -(((field + top_bit) >> 1) as f64 * scale)
    } else {
        ((field >> 1) as f64 * scale)
    }
}

/// Decode one coordinate's packed coefficient stream into `block`.
///
/// The stream starts with a two byte header holding four 4-bit coefficient
/// counts, extended to a four byte header with six counts when the top bit
/// of the first byte is set. Count `i` is the number of coefficients in
/// precision class `i`: classes 0..=3 store whole codes of `4 - i` bytes
/// with the sign in the low bit, class 4 packs two coefficients per byte
/// (high nibble first) and class 5 four per byte (highest pair first),
/// both with the sign in the field's top bit. Coefficients appear in
/// Chebyshev order across the non-empty classes; trailing orders stay zero.
fn decode_coordinate(
    cur: &mut EphemerisCursor<'_>,
    rec: &PlanetRecord,
    block: &mut [f64],
) -> Result<(), NavagrahaError> {
    let c0 = cur.read_u8()?;
    let c1 = cur.read_u8()?;
    let mut nsize: SmallVec<[usize; 6]> = SmallVec::new();
    if c0 & 0x80 != 0 {
        let c2 = cur.read_u8()?;
        let c3 = cur.read_u8()?;
        for b in [c1, c2, c3] {
            nsize.push((b >> 4) as usize);
            nsize.push((b & 0x0f) as usize);
        }
    } else {
        for b in [c0, c1] {
            nsize.push((b >> 4) as usize);
            nsize.push((b & 0x0f) as usize);
        }
    }

    let nco: usize = nsize.iter().sum();
    if nco > rec.ncoe {
        return Err(NavagrahaError::CorruptSegment(format!(
            "{nco} coefficients instead of {} for body {}",
            rec.ncoe, rec.ibdy
        )));
    }

    let scale = rec.rmax / 2.0 / 1e9;
    let mut idbl = 0;
    for (class, &n) in nsize.iter().enumerate() {
        if n == 0 {
            continue;
        }
        match class {
            0..=3 => {
                let width = 4 - class;
                for _ in 0..n {
                    let code = cur.read_code(width)?;
                    block[idbl] = unpack_field(code, scale);
                    idbl += 1;
                }
            }
            4 => {
                let bytes = cur.read_raw(1, n.div_ceil(2))?;
                let mut left = n;
                for &b in bytes {
                    for field in [b >> 4, b & 0x0f] {
                        if left == 0 {
                            break;
                        }
                        block[idbl] = unpack_subfield(field as u32, 0x8, scale);
                        idbl += 1;
                        left -= 1;
                    }
                }
            }
            _ => {
                let bytes = cur.read_raw(1, n.div_ceil(4))?;
                let mut left = n;
                for &b in bytes {
                    for field in [b >> 6, (b >> 4) & 3, (b >> 2) & 3, b & 3] {
                        if left == 0 {
                            break;
                        }
                        block[idbl] = unpack_subfield(field as u32, 0x2, scale);
                        idbl += 1;
                        left -= 1;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Locate and decompress the segment of `rec` containing `tjd`.
///
/// Computes the segment index from the body's time window, follows the
/// 3-byte offset in the body's index table, and decodes the three packed
/// coordinate streams. The caller is responsible for range-checking `tjd`
/// against the body window; a date exactly on the final boundary evaluates
/// the last segment at its upper edge.
pub(crate) fn decode_segment(
    image: &[u8],
    endian: Endianness,
    rec: &PlanetRecord,
    tjd: f64,
) -> Result<SegmentCoefficients, NavagrahaError> {
    let mut iseg = ((tjd - rec.tfstart) / rec.dseg).floor();
    let mut tseg0 = rec.tfstart + iseg * rec.dseg;
    if tseg0 >= rec.tfend {
        iseg -= 1.0;
        tseg0 = rec.tfstart + iseg * rec.dseg;
    }
    if iseg < 0.0 {
        return Err(NavagrahaError::OutOfRange {
            jd: tjd,
            tfstart: rec.tfstart,
            tfend: rec.tfend,
        });
    }
    let tseg1 = tseg0 + rec.dseg;

    let mut cur = EphemerisCursor::new(image, endian);
    cur.seek(rec.index_table_offset as usize + iseg as usize * 3);
    let segpos = cur.read_index_offset()?;
    cur.seek(segpos as usize);

    let mut segp = vec![0.0; 3 * rec.ncoe];
    for icoord in 0..3 {
        let block = &mut segp[icoord * rec.ncoe..(icoord + 1) * rec.ncoe];
        decode_coordinate(&mut cur, rec, block)?;
    }

    Ok(SegmentCoefficients {
        tseg0,
        tseg1,
        segp,
        neval: rec.ncoe,
    })
}
