//! Reader and evaluator for Swiss Ephemeris SE1 planetary files.
//!
//! An SE1 file carries a text-plus-binary constant area followed by, per
//! body, a 3-byte segment index table and the packed Chebyshev segments
//! themselves. Opening a file parses the constant area eagerly; position
//! queries locate the right segment, decompress its variable-precision
//! coefficients, rotate them to equatorial J2000 when the body is stored in
//! its orbital plane, and evaluate the series.

mod chebyshev;
mod endian_reader;
pub mod planet_ids;
mod rotation;
pub mod se1_file;
pub mod se1_header;
mod segment;

pub use chebyshev::evaluate_chebyshev;
pub use planet_ids::{Planet, PlanetFlags};
pub use se1_file::Se1File;
