pub const T2000_JD: f64 = 2451545.0; // J2000 epoch as a Julian date
pub const T1900_JD: f64 = 2415020.0; // 1900 January 0.5, origin of the ayanamsha polynomial
pub const RADEG: f64 = std::f64::consts::PI / 180.0; // Degrees -> radians conversion factor
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0; // arcsecond -> radians conversion factor

// Constants
pub const DPI: f64 = 2. * std::f64::consts::PI;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const AU: f64 = 149_597_870.7;

/// Sine and cosine of the J2000 mean obliquity, frozen to the exact values
/// the ephemeris file producer used when referring segment data to the
/// equatorial J2000 frame.
pub const SEPS2000: f64 = 0.39777715572793088;
pub const CEPS2000: f64 = 0.91748206215761929;

// type def
pub type Degree = f64;
pub type Radian = f64;
/// Time expressed as a Julian day number
pub type JulianDay = f64;
