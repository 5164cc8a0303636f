use std::{fmt, io};

/// A specialized [`Result`](std::result::Result) type for [`SwitchableDecoder`] operations.
///
/// [`SwitchableDecoder`]: crate::SwitchableDecoder
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error type reported by [`SwitchableDecoder`].
///
/// Every error surfaces from the call that triggered it. The decoder never retries a failed read
/// of the underlying source (except for [`io::ErrorKind::Interrupted`]), so calling the same method
/// again may legitimately report the same error again.
///
/// [`SwitchableDecoder`]: crate::SwitchableDecoder
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested encoding label is not known to the registry.
    #[error("unsupported encoding: {0:?}")]
    UnsupportedEncoding(String),

    /// An argument is out of the accepted domain, e.g. a blank encoding label or a buffer region
    /// that does not fit in the buffer.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The underlying byte source failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The decoder has been closed.
    #[error("decoder has been closed")]
    Closed,

    /// The input contains a malformed byte sequence and the decoder is configured to report it.
    #[error(transparent)]
    Malformed(#[from] MalformedError),
}

impl From<Error> for io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::Io(e) => e,
            Error::Malformed(e) => e.wrap(),
            e @ Error::UnsupportedEncoding(..) => io::Error::new(io::ErrorKind::InvalidInput, e),
            e @ Error::InvalidArgument(..) => io::Error::new(io::ErrorKind::InvalidInput, e),
            e @ Error::Closed => io::Error::new(io::ErrorKind::Other, e),
        }
    }
}

/// The error reported when the decoder encounters a malformed byte sequence while configured with
/// [`MalformedAction::Report`].
///
/// This error is non-fatal. It is reported only after every character decoded before the
/// malformed sequence has been delivered, and the next read resumes decoding right after the
/// malformed bytes.
///
/// [`MalformedAction::Report`]: crate::MalformedAction::Report
///
/// # Examples
///
/// ```rust
/// use encoding_rs_switch::{Config, Error, MalformedAction, SwitchableDecoder};
///
/// let src: &[u8] = &[227, 89, 151, 0xff, 144, 175];
/// let config = Config::default().malformed(MalformedAction::Report);
/// let mut decoder = SwitchableDecoder::with_config(src, "Shift_JIS", config)?;
///
/// let mut dst = String::new();
/// while let Err(error) = decoder.read_to_string(&mut dst) {
///     match error {
///         // insert replacement character (U+FFFD) and continue
///         Error::Malformed(_) => dst.push('\u{FFFD}'),
///         e => return Err(e),
///     }
/// }
///
/// assert_eq!(dst, "綺\u{FFFD}星");
/// # Ok::<(), encoding_rs_switch::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedError {
    encoding: &'static str,
    len: usize,
}

impl fmt::Display for MalformedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "encountered a malformed byte sequence of {} byte(s) in {}",
            self.len, self.encoding
        )
    }
}

impl std::error::Error for MalformedError {}

impl MalformedError {
    /// Creates a new error value.
    pub(crate) fn new(encoding: &'static str, len: usize) -> Self {
        Self { encoding, len }
    }

    /// Wraps `self` in a [`std::io::Error`].
    pub(crate) fn wrap(self) -> io::Error {
        io::Error::new(io::ErrorKind::InvalidData, self)
    }

    /// Returns the name of the encoding that found the malformed sequence.
    #[inline]
    pub fn encoding_name(&self) -> &'static str {
        self.encoding
    }

    /// Returns the length in bytes of the malformed sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns a reference to the `MalformedError` value wrapped by a [`std::io::Error`] if it
    /// contains an inner error whose type is `MalformedError`, or returns `None` otherwise.
    #[inline]
    pub fn wrapped_in(io_error: &io::Error) -> Option<&Self> {
        match io_error.get_ref() {
            Some(e) => e.downcast_ref::<Self>(),
            None => None,
        }
    }
}
