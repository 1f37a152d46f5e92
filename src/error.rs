/// A list of anchor parsing errors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Error {
    /// A read would go past the end of the supplied data.
    ///
    /// Also returned for structurally invalid data, like an unknown
    /// device table format.
    MalformedFont,

    /// An anchor table with a format other than 1, 2 or 3.
    UnsupportedFormat(u16),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Error::MalformedFont => write!(f, "malformed font"),
            Error::UnsupportedFormat(format) => {
                write!(f, "unsupported anchor table format {}", format)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
