use crate::constants::{Degree, JulianDay, RADEG, T1900_JD};

/// Lahiri (Chitrapaksha) ayanamsha in degrees at a given Julian day.
///
/// The sidereal zodiac is obtained by subtracting this value from a tropical
/// ecliptic longitude. The formula is the classical closed form in Julian
/// centuries `t` from 1900 January 0.5: a secular precession polynomial
/// around the 1900 mean value of 22°27′, plus the two dominant nutation
/// terms in the node and solar longitudes so the result is referred to the
/// true equinox.
///
/// Arguments
/// ---------
/// * `jd`: Julian day.
///
/// Return
/// ------
/// * Ayanamsha in degrees (≈ 22.46° in 1900, ≈ 23.85° in 2000, increasing
///   by ~50″ per year).
pub fn lahiri(jd: JulianDay) -> Degree {
    let t = (jd - T1900_JD) / 36525.0;

    // Mean longitudes of the lunar node and the Sun, degrees.
    let om = 259.183275 - 1934.142008333206 * t + 0.0020777778 * t * t;
    let ls = 279.696678 + 36000.76892 * t + 0.0003025 * t * t;

    // Accumulated precession since 1900 plus nutation, arcseconds.
    let aya =
        17.23 * (om * RADEG).sin() + 1.27 * (2.0 * ls * RADEG).sin() - (5025.64 + 1.11 * t) * t;

    (80861.27 - aya) / 3600.0
}
