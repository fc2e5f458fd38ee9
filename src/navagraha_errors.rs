use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavagrahaError {
    #[error("Invalid SE1 header: {0}")]
    InvalidHeader(String),

    #[error("Unknown body id: {0}")]
    UnknownBody(i32),

    #[error("Julian date {jd} outside body range [{tfstart}, {tfend}]")]
    OutOfRange { jd: f64, tfstart: f64, tfend: f64 },

    #[error("Read of {wanted} bytes at offset {offset} runs past end of file image ({len} bytes)")]
    ShortRead {
        offset: usize,
        wanted: usize,
        len: usize,
    },

    #[error("Corrupt segment: {0}")]
    CorruptSegment(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}
