use std::collections::HashMap;
use std::fs;

use ahash::RandomState;
use camino::Utf8Path;
use nalgebra::Vector3;

use super::chebyshev::evaluate_chebyshev;
use super::planet_ids::PlanetFlags;
use super::rotation::rot_back;
use super::se1_header::{self, FileHeader, PlanetRecord};
use super::segment::{decode_segment, SegmentCoefficients};
use crate::navagraha_errors::NavagrahaError;

/// Per-body state: the immutable constant-area record plus the mutable
/// cache holding the most recently decoded segment.
#[derive(Debug)]
struct PlanetData {
    record: PlanetRecord,
    cache: Option<SegmentCoefficients>,
}

/// Handle over one opened SE1 ephemeris file.
///
/// The whole file is materialized in memory at open and the constant area
/// is parsed eagerly, so `position` never touches the filesystem. Each body
/// keeps the coefficients of its current segment cached and re-decodes
/// lazily when a query leaves the cached window. The handle is single-owner;
/// callers sharing one across threads must synchronize externally.
#[derive(Debug)]
pub struct Se1File {
    image: Vec<u8>,
    header: FileHeader,
    planets: HashMap<i32, PlanetData, RandomState>,
}

impl Se1File {
    /// Open and eagerly parse an SE1 file.
    pub fn open(path: &Utf8Path) -> Result<Self, NavagrahaError> {
        let image = fs::read(path)?;
        Self::from_image(image)
    }

    /// Parse an SE1 file already materialized in memory.
    pub fn from_image(image: Vec<u8>) -> Result<Self, NavagrahaError> {
        let (header, records) = se1_header::parse(&image)?;
        let planets = records
            .into_iter()
            .map(|record| {
                (
                    record.ibdy,
                    PlanetData {
                        record,
                        cache: None,
                    },
                )
            })
            .collect();
        Ok(Se1File {
            image,
            header,
            planets,
        })
    }

    /// The file-wide constants, including the producer's physical constants.
    pub fn file_header(&self) -> &FileHeader {
        &self.header
    }

    /// Julian-day validity range `[tfstart, tfend]` of the whole file.
    pub fn validity(&self) -> (f64, f64) {
        (self.header.tfstart, self.header.tfend)
    }

    /// Numbering of the underlying development ephemeris.
    pub fn ephemeris_number(&self) -> i32 {
        self.header.ephemeris_number
    }

    /// Body ids present in this file, in file order not guaranteed.
    pub fn body_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.planets.keys().copied()
    }

    /// Flag bits of a body, used by callers to decide whether the returned
    /// vector is heliocentric.
    pub fn flags(&self, ipl: i32) -> Result<PlanetFlags, NavagrahaError> {
        self.planets
            .get(&ipl)
            .map(|p| p.record.iflg)
            .ok_or(NavagrahaError::UnknownBody(ipl))
    }

    /// Rectangular coordinates of body `ipl` at Julian day `tjd`, in AU, on
    /// the frame the file targets (equatorial J2000).
    ///
    /// The first query for a body decodes its segment; later queries inside
    /// the same segment window evaluate the cached coefficients directly.
    /// A failed decode surfaces its error unchanged and leaves the previous
    /// cache state intact.
    ///
    /// Arguments
    /// ---------
    /// * `ipl`: body id as listed in the file (see `Planet`).
    /// * `tjd`: Julian day inside the body's validity window.
    ///
    /// Return
    /// ------
    /// * The position vector, or the decode error.
    pub fn position(&mut self, ipl: i32, tjd: f64) -> Result<Vector3<f64>, NavagrahaError> {
        let pdata = self
            .planets
            .get_mut(&ipl)
            .ok_or(NavagrahaError::UnknownBody(ipl))?;
        let rec = &pdata.record;

        if tjd < rec.tfstart || tjd > rec.tfend {
            return Err(NavagrahaError::OutOfRange {
                jd: tjd,
                tfstart: rec.tfstart,
                tfend: rec.tfend,
            });
        }

        let miss = match &pdata.cache {
            None => true,
            Some(seg) => tjd < seg.tseg0 || tjd > seg.tseg1,
        };
        if miss {
            let mut seg = decode_segment(&self.image, self.header.fendian, rec, tjd)?;
            if rec.iflg.is_rotated() {
                rot_back(rec, seg.tseg0, &mut seg.segp);
            }
            pdata.cache = Some(seg);
        }

        let seg = pdata.cache.as_ref().expect("cache filled above");
        let ncoe = pdata.record.ncoe;
        let tau = 2.0 * (tjd - seg.tseg0) / pdata.record.dseg - 1.0;
        Ok(Vector3::new(
            evaluate_chebyshev(tau, &seg.segp[0..ncoe]),
            evaluate_chebyshev(tau, &seg.segp[ncoe..2 * ncoe]),
            evaluate_chebyshev(tau, &seg.segp[2 * ncoe..3 * ncoe]),
        ))
    }
}
