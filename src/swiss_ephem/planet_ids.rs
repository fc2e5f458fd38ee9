/// Body ids as stored in SE1 planetary and lunar ephemeris files.
///
/// Id 0 carries the heliocentric position of the Earth (the file producer
/// stores the Earth under the "Sun" slot and lets the caller negate it to
/// obtain the geocentric Sun). Id 1 is the geocentric Moon. Ids 2..=9 are
/// the heliocentric planets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Planet {
    Sun = 0,
    Moon = 1,
    Mercury = 2,
    Venus = 3,
    Mars = 4,
    Jupiter = 5,
    Saturn = 6,
    Uranus = 7,
    Neptune = 8,
    Pluto = 9,
}

impl Planet {
    /// The body id under which this planet is stored in the file.
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn from_id(id: i32) -> Option<Planet> {
        match id {
            0 => Some(Planet::Sun),
            1 => Some(Planet::Moon),
            2 => Some(Planet::Mercury),
            3 => Some(Planet::Venus),
            4 => Some(Planet::Mars),
            5 => Some(Planet::Jupiter),
            6 => Some(Planet::Saturn),
            7 => Some(Planet::Uranus),
            8 => Some(Planet::Neptune),
            9 => Some(Planet::Pluto),
            _ => None,
        }
    }
}

/// Per-body flag bits from the constant area of an SE1 file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanetFlags(u8);

impl PlanetFlags {
    /// Coordinates are heliocentric; subtract the Earth vector (body id 0)
    /// for a geocentric position.
    pub const HELIOCENTRIC: u8 = 1;
    /// Chebyshev coefficients are expressed in the body's mean orbital
    /// plane and must be rotated back to equatorial J2000 after decoding.
    pub const ROTATE: u8 = 2;
    /// The segment coefficients are offsets from a reference ellipse whose
    /// Chebyshev representation is stored in the constant area.
    pub const ELLIPSE: u8 = 4;

    pub fn new(bits: u8) -> Self {
        PlanetFlags(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_heliocentric(self) -> bool {
        self.0 & Self::HELIOCENTRIC != 0
    }

    pub fn is_rotated(self) -> bool {
        self.0 & Self::ROTATE != 0
    }

    pub fn has_ellipse(self) -> bool {
        self.0 & Self::ELLIPSE != 0
    }
}
