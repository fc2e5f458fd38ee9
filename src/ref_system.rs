use nalgebra::Vector3;

use crate::constants::{Degree, JulianDay, Radian, RADEG, RADSEC, T2000_JD};

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// This function returns the mean obliquity angle ε, defined as the angle between
/// the Earth's equator and the ecliptic plane, using the standard IAU 1976 polynomial model.
/// The result is expressed in radians and is valid for dates within a few millennia
/// of the J2000 epoch.
///
/// Arguments
/// ---------
/// * `jd`: Julian day (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// Formula
/// -------
/// The obliquity ε is computed as a cubic polynomial in Julian centuries since J2000,
/// evaluated with Horner's method:
///
/// ```text
/// ε = ((ob3 * t + ob2) * t + ob1) * t + ob0;
/// ```
pub fn obleq(jd: JulianDay) -> Radian {
    // Obliquity coefficients
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (jd - T2000_JD) / 36525.0;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Greenwich mean sidereal time at a given Julian day (UT), in degrees.
///
/// Uses the closed-form polynomial of the Astronomical Almanac:
///
/// ```text
/// GMST = 280.46061837 + 360.98564736629·(jd − 2451545) + 0.000387933·T² − T³/38710000
/// ```
///
/// with `T` in Julian centuries from J2000. The result is normalized to
/// `[0°, 360°)`.
pub fn gmst(jd: JulianDay) -> Degree {
    let t = (jd - T2000_JD) / 36525.0;
    let g = 280.46061837 + 360.98564736629 * (jd - T2000_JD) + 0.000387933 * t * t
        - t * t * t / 38710000.0;
    normalize_deg(g)
}

/// Mean longitude of the ascending lunar node, in degrees.
///
/// Standard polynomial in Julian centuries from J2000, normalized to
/// `[0°, 360°)`. The mean node regresses through the zodiac in ~18.6 years.
pub fn mean_lunar_node(jd: JulianDay) -> Degree {
    let t = (jd - T2000_JD) / 36525.0;
    let node = 125.04452 - 1934.136261 * t + 0.0020708 * t * t + t * t * t / 450000.0;
    normalize_deg(node)
}

/// Project an equatorial rectangular vector onto the ecliptic and return
/// its ecliptic longitude in degrees.
///
/// Arguments
/// ---------
/// * `pos`: rectangular position in an equatorial frame.
/// * `seps`, `ceps`: sine and cosine of the obliquity of that frame's equator.
///
/// Returns
/// --------
/// * Ecliptic longitude λ in `[0°, 360°)`, from `λ = atan2(y·cos ε + z·sin ε, x)`.
pub fn ecliptic_longitude(pos: &Vector3<f64>, seps: f64, ceps: f64) -> Degree {
    let ye = pos.y * ceps + pos.z * seps;
    normalize_deg(ye.atan2(pos.x) / RADEG)
}

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_deg(deg: Degree) -> Degree {
    deg.rem_euclid(360.0)
}
