use std::fmt;

use encoding_rs::{Decoder, Encoding};

use super::{Error, Result};

/// A resolved character encoding that the decoder can switch to.
///
/// Most charsets are backed by an [`encoding_rs::Encoding`]. The one exception is
/// [`Charset::ISO_8859_1`]: the WHATWG Encoding Standard, and therefore `encoding_rs`, treats the
/// `iso-8859-1` label as an alias of windows-1252, which decodes bytes 0x80..=0x9F to printable
/// characters. `Charset::ISO_8859_1` maps every byte to the code point of the same value instead.
///
/// # Examples
///
/// ```rust
/// use encoding_rs_switch::Charset;
///
/// assert_eq!(Charset::for_label("utf8").unwrap().name(), "UTF-8");
/// assert_eq!(Charset::for_label("sjis").unwrap().name(), "Shift_JIS");
/// assert_eq!(Charset::for_label("latin1"), Some(Charset::ISO_8859_1));
/// assert_eq!(Charset::for_label("windows-1252").unwrap().name(), "windows-1252");
/// assert!(Charset::for_label("not-a-real-encoding").is_none());
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Charset(Family);

#[derive(Clone, Copy, PartialEq, Eq)]
enum Family {
    Whatwg(&'static Encoding),
    Latin1,
}

/// Labels that resolve to [`Charset::ISO_8859_1`], compared ASCII case-insensitively.
const LATIN1_LABELS: &[&str] = &[
    "iso-8859-1",
    "iso_8859-1",
    "iso_8859_1",
    "iso8859-1",
    "iso8859_1",
    "iso88591",
    "8859_1",
    "iso_8859-1:1987",
    "iso-ir-100",
    "latin1",
    "l1",
    "cp819",
    "ibm819",
    "ibm-819",
    "csisolatin1",
];

impl Charset {
    /// True ISO-8859-1, where each byte decodes to the code point of the same value.
    pub const ISO_8859_1: Charset = Charset(Family::Latin1);

    /// Looks up a charset by label, returning `None` if the label is unknown.
    ///
    /// Leading and trailing ASCII whitespace is ignored and labels are matched
    /// case-insensitively. ISO-8859-1 labels resolve to [`Charset::ISO_8859_1`]; every other label
    /// is resolved as per the WHATWG Encoding Standard, except that the "replacement" encoding is
    /// never returned.
    pub fn for_label(label: &str) -> Option<Charset> {
        let label = label.trim_matches(|c: char| c.is_ascii_whitespace());
        if LATIN1_LABELS.iter().any(|l| l.eq_ignore_ascii_case(label)) {
            return Some(Self::ISO_8859_1);
        }
        Encoding::for_label_no_replacement(label.as_bytes()).map(Self::from)
    }

    /// Returns the canonical name of this charset.
    pub fn name(&self) -> &'static str {
        match self.0 {
            Family::Whatwg(encoding) => encoding.name(),
            Family::Latin1 => "ISO-8859-1",
        }
    }

    /// Returns the underlying `encoding_rs` encoding, or `None` for [`Charset::ISO_8859_1`].
    pub fn encoding(&self) -> Option<&'static Encoding> {
        match self.0 {
            Family::Whatwg(encoding) => Some(encoding),
            Family::Latin1 => None,
        }
    }

    /// Resolves a label, reporting why it could not be resolved.
    pub(crate) fn resolve(label: &str) -> Result<Charset> {
        if label.trim_matches(|c: char| c.is_ascii_whitespace()).is_empty() {
            return Err(Error::InvalidArgument("encoding label must not be empty"));
        }
        Self::for_label(label).ok_or_else(|| Error::UnsupportedEncoding(label.to_owned()))
    }
}

impl From<&'static Encoding> for Charset {
    fn from(value: &'static Encoding) -> Self {
        Self(Family::Whatwg(value))
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Charset").field(&self.name()).finish()
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Describes which encoding a [`SwitchableDecoder`] should decode with.
///
/// Most callers never name this type and pass one of its `From` sources instead: a label (`&str`),
/// a [`Charset`], an `&'static encoding_rs::Encoding`, a preconfigured [`encoding_rs::Decoder`], or
/// an `Option` of any of these where `None` selects the platform default.
///
/// [`SwitchableDecoder`]: crate::SwitchableDecoder
pub enum EncodingSpec<'a> {
    /// The platform default encoding, see [`default_charset`](crate::default_charset).
    Default,
    /// An encoding label to look up with [`Charset::for_label`].
    Label(&'a str),
    /// An already resolved charset.
    Charset(Charset),
    /// A preconfigured decoder, used as is including any residual state.
    Decoder(Decoder),
}

impl fmt::Debug for EncodingSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Label(label) => f.debug_tuple("Label").field(label).finish(),
            Self::Charset(charset) => f.debug_tuple("Charset").field(&charset.name()).finish(),
            Self::Decoder(decoder) => f
                .debug_tuple("Decoder")
                .field(&decoder.encoding().name())
                .finish(),
        }
    }
}

impl<'a> From<&'a str> for EncodingSpec<'a> {
    fn from(value: &'a str) -> Self {
        Self::Label(value)
    }
}

impl<'a> From<&'a String> for EncodingSpec<'a> {
    fn from(value: &'a String) -> Self {
        Self::Label(value)
    }
}

impl From<Charset> for EncodingSpec<'_> {
    fn from(value: Charset) -> Self {
        Self::Charset(value)
    }
}

impl From<&'static Encoding> for EncodingSpec<'_> {
    fn from(value: &'static Encoding) -> Self {
        Self::Charset(value.into())
    }
}

impl From<Decoder> for EncodingSpec<'_> {
    fn from(value: Decoder) -> Self {
        Self::Decoder(value)
    }
}

impl<'a, T: Into<EncodingSpec<'a>>> From<Option<T>> for EncodingSpec<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Default, Into::into)
    }
}
