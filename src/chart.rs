use nalgebra::Vector3;
use serde::Serialize;

use crate::ayanamsha;
use crate::constants::{Degree, JulianDay, CEPS2000, RADEG, SEPS2000};
use crate::navagraha_errors::NavagrahaError;
use crate::ref_system::{ecliptic_longitude, gmst, mean_lunar_node, normalize_deg, obleq};
use crate::swiss_ephem::{Planet, Se1File};

/// The nine grahas of a sidereal birth chart.
///
/// Seven map onto ephemeris bodies; Rahu and Ketu are the lunar nodes,
/// computed from the mean-node polynomial rather than the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Graha {
    Surya,
    Chandra,
    Mangala,
    Budha,
    Guru,
    Shukra,
    Shani,
    Rahu,
    Ketu,
}

impl Graha {
    pub const ALL: [Graha; 9] = [
        Graha::Surya,
        Graha::Chandra,
        Graha::Mangala,
        Graha::Budha,
        Graha::Guru,
        Graha::Shukra,
        Graha::Shani,
        Graha::Rahu,
        Graha::Ketu,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The ephemeris body backing this graha, if any.
    pub fn body(self) -> Option<Planet> {
        match self {
            Graha::Surya => Some(Planet::Sun),
            Graha::Chandra => Some(Planet::Moon),
            Graha::Mangala => Some(Planet::Mars),
            Graha::Budha => Some(Planet::Mercury),
            Graha::Guru => Some(Planet::Jupiter),
            Graha::Shukra => Some(Planet::Venus),
            Graha::Shani => Some(Planet::Saturn),
            Graha::Rahu | Graha::Ketu => None,
        }
    }
}

/// Sidereal positions and panchanga elements for one birth moment.
#[derive(Debug, Clone, Serialize)]
pub struct BirthChart {
    pub jd: JulianDay,
    pub ayanamsha: Degree,
    /// Sidereal longitudes indexed by [`Graha::index`].
    pub longitudes: [Degree; 9],
    /// Sidereal longitude of the rising ecliptic point.
    pub ascendant: Degree,
    /// Lunar day index, 0 ("Shukla Pratipada") through 29.
    pub tithi: u8,
}

impl BirthChart {
    pub fn longitude(&self, graha: Graha) -> Degree {
        self.longitudes[graha.index()]
    }
}

/// Geocentric rectangular position of a body, equatorial J2000, AU.
///
/// The file stores the heliocentric Earth under the Sun's id, so the Sun is
/// its negation; the Moon is geocentric as stored; heliocentric bodies need
/// the Earth vector subtracted.
pub fn geocentric_position(
    eph: &mut Se1File,
    planet: Planet,
    jd: JulianDay,
) -> Result<Vector3<f64>, NavagrahaError> {
    match planet {
        Planet::Sun => Ok(-eph.position(Planet::Sun.id(), jd)?),
        Planet::Moon => eph.position(Planet::Moon.id(), jd),
        body => {
            let pos = eph.position(body.id(), jd)?;
            if eph.flags(body.id())?.is_heliocentric() {
                let earth = eph.position(Planet::Sun.id(), jd)?;
                Ok(pos - earth)
            } else {
                Ok(pos)
            }
        }
    }
}

/// Tropical ecliptic longitude of a body, degrees in `[0, 360)`.
pub fn tropical_longitude(
    eph: &mut Se1File,
    planet: Planet,
    jd: JulianDay,
) -> Result<Degree, NavagrahaError> {
    let pos = geocentric_position(eph, planet, jd)?;
    Ok(ecliptic_longitude(&pos, SEPS2000, CEPS2000))
}

/// Sidereal (Lahiri) ecliptic longitude of a body, degrees in `[0, 360)`.
pub fn sidereal_longitude(
    eph: &mut Se1File,
    planet: Planet,
    jd: JulianDay,
) -> Result<Degree, NavagrahaError> {
    let tropical = tropical_longitude(eph, planet, jd)?;
    Ok(normalize_deg(tropical - ayanamsha::lahiri(jd)))
}

/// Tropical ascendant from the right ascension of the meridian, degrees.
///
/// `ramc` is GMST plus the observer's east longitude; `eps` the obliquity
/// of date in radians. Simplified rising-point model: refraction and
/// polar-circle degeneracies are not handled.
pub fn ascendant_from_ramc(ramc: Degree, latitude: Degree, eps: f64) -> Degree {
    let ramc = ramc * RADEG;
    let lat = latitude * RADEG;
    let asc = ramc
        .cos()
        .atan2(-(ramc.sin() * eps.cos() + lat.tan() * eps.sin()));
    normalize_deg(asc / RADEG)
}

/// Tropical ascendant for a time and place, degrees.
pub fn ascendant(jd: JulianDay, latitude: Degree, longitude: Degree) -> Degree {
    let ramc = normalize_deg(gmst(jd) + longitude);
    ascendant_from_ramc(ramc, latitude, obleq(jd))
}

/// Lunar-day index from sidereal Sun and Moon longitudes: each tithi spans
/// 12° of elongation.
pub fn tithi_index(sun: Degree, moon: Degree) -> u8 {
    ((moon - sun).rem_euclid(360.0) / 12.0).floor() as u8
}

/// Compute the full sidereal chart for one birth moment.
///
/// Arguments
/// ---------
/// * `eph`: opened planetary ephemeris covering `jd`.
/// * `jd`: Julian day of birth, UTC.
/// * `latitude`, `longitude`: geographic coordinates, degrees, east and
///   north positive.
///
/// Return
/// ------
/// * The nine sidereal graha longitudes, the sidereal ascendant and the
///   tithi index, or the first ephemeris error encountered.
pub fn birth_chart(
    eph: &mut Se1File,
    jd: JulianDay,
    latitude: Degree,
    longitude: Degree,
) -> Result<BirthChart, NavagrahaError> {
    let aya = ayanamsha::lahiri(jd);
    let node = mean_lunar_node(jd);

    let mut longitudes = [0.0; 9];
    for graha in Graha::ALL {
        let tropical = match graha.body() {
            Some(body) => tropical_longitude(eph, body, jd)?,
            None => match graha {
                Graha::Rahu => node,
                _ => node + 180.0,
            },
        };
        longitudes[graha.index()] = normalize_deg(tropical - aya);
    }

    let asc = normalize_deg(ascendant(jd, latitude, longitude) - aya);
    let tithi = tithi_index(
        longitudes[Graha::Surya.index()],
        longitudes[Graha::Chandra.index()],
    );

    Ok(BirthChart {
        jd,
        ayanamsha: aya,
        longitudes,
        ascendant: asc,
        tithi,
    })
}
