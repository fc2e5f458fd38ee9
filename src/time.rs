use hifitime::{Epoch, TimeScale};

use crate::constants::JulianDay;

/// Transformation from a Gregorian UTC date and civil time to a Julian day
///
/// Argument
/// --------
/// * year, month, day: Gregorian calendar date
/// * hour, minute, second: civil time of day, UTC
///
/// Return
/// ------
/// * the Julian day number of that instant, UTC scale
pub fn julian_day_utc(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> JulianDay {
    Epoch::from_gregorian(year, month, day, hour, minute, second, 0, TimeScale::UTC)
        .to_jde_utc_days()
}

/// Transformation from date in the format YYYY-MM-ddTHH:mm:ss to a Julian day
pub fn date_to_jd(date: &str) -> Result<JulianDay, String> {
    use std::str::FromStr;
    Epoch::from_str(date)
        .map(|e| e.to_jde_utc_days())
        .map_err(|e| format!("Invalid date {date}: {e}"))
}
