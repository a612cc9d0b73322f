use std::io;

use failure::Fail;


/// The error type for everything that can go wrong when reading a PLY file.
///
/// All errors are returned to the immediate caller; nothing is logged or
/// retried internally. Most variants are fatal for the operation that
/// produced them, but three are part of normal control flow:
///
/// - [`Error::EndOfElement`] signals that a sequential read loop is done,
/// - [`Error::UnknownElement`] just means the requested name doesn't exist
///   (the caller may try another one),
/// - [`Error::SeekOutOfRange`] leaves the reader untouched.
#[derive(Debug, Fail)]
pub enum Error {
    /// The underlying byte source failed to read or seek.
    #[fail(display = "IO error: {}", _0)]
    Io(io::Error),

    /// The stream ended (or failed) before the `end_header` terminator was
    /// found.
    #[fail(display = "failed to read header: no 'end_header' terminator before end of stream")]
    HeaderRead,

    /// The header text is empty or malformed.
    #[fail(display = "invalid PLY file: {}", _0)]
    InvalidFile(String),

    /// The header declares a format other than `binary_little_endian`.
    #[fail(display = "unsupported PLY format (binary_little_endian only)")]
    UnsupportedFormat,

    /// No element with the requested name exists in the header.
    #[fail(display = "unknown element '{}'", _0)]
    UnknownElement(String),

    /// A seek position outside of `0..=count` was requested.
    #[fail(display = "can't seek to position {} (element has {} records)", pos, count)]
    SeekOutOfRange { pos: u64, count: u64 },

    /// A sequential read was attempted past the last record. This is the
    /// conventional loop termination signal, not a real failure.
    #[fail(display = "no records left in element")]
    EndOfElement,

    /// The source ended in the middle of a record. This usually means the
    /// file is corrupt or was truncated while being read.
    #[fail(display = "truncated record {} of element '{}'", index, element)]
    TruncatedRecord { element: String, index: u64 },
}

impl From<io::Error> for Error {
    fn from(src: io::Error) -> Self {
        Error::Io(src)
    }
}
