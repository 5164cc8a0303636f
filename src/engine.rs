use std::{fmt, ops};

use encoding_rs::{CoderResult, Decoder, DecoderResult};

use super::buffer::{InputBuffer, PendingChars};
use super::{default_charset, ByteSource, CarryOver, Charset, Config, EncodingSpec};
use super::MalformedAction;
use super::{MalformedError, Result};

/// Implements `Debug` for `encoding_rs::Decoder`.
pub(crate) struct DebuggableDecoder(Decoder);

impl fmt::Debug for DebuggableDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("encoding()", self.encoding())
            .finish()
    }
}

impl From<Decoder> for DebuggableDecoder {
    fn from(value: Decoder) -> Self {
        Self(value)
    }
}

impl ops::Deref for DebuggableDecoder {
    type Target = Decoder;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ops::DerefMut for DebuggableDecoder {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// The byte-to-character conversion of one encoding family.
#[derive(Debug)]
pub(crate) enum Codec {
    Whatwg(DebuggableDecoder),
    Latin1,
}

impl Codec {
    pub fn resolve(spec: EncodingSpec<'_>) -> Result<Self> {
        Ok(match spec {
            EncodingSpec::Default => Self::for_charset(default_charset()),
            EncodingSpec::Label(label) => Self::for_charset(Charset::resolve(label)?),
            EncodingSpec::Charset(charset) => Self::for_charset(charset),
            EncodingSpec::Decoder(decoder) => Self::Whatwg(decoder.into()),
        })
    }

    pub fn for_charset(charset: Charset) -> Self {
        match charset.encoding() {
            Some(encoding) => Self::Whatwg(encoding.new_decoder_with_bom_removal().into()),
            None => Self::Latin1,
        }
    }

    fn charset(&self) -> Charset {
        match self {
            Self::Whatwg(decoder) => decoder.encoding().into(),
            Self::Latin1 => Charset::ISO_8859_1,
        }
    }
}

/// The stateful decoder bound to one encoding.
///
/// The engine does not own the byte source; the source is lent to every call that may read from
/// it, so replacing the engine never leaves two engines able to read the same source.
#[derive(Debug)]
pub(crate) struct DecodingEngine {
    codec: Codec,
    input: InputBuffer,
    pending: PendingChars,
    malformed: MalformedAction,
    /// Whether the codec must be fed byte by byte so that it never holds part of a sequence once
    /// the requested characters are decoded.
    exact: bool,
    /// Storage to carry a malformed sequence error until every character decoded before it has
    /// been read.
    deferred_error: Option<MalformedError>,
}

impl DecodingEngine {
    pub fn new(codec: Codec, config: &Config) -> Self {
        Self {
            codec,
            input: InputBuffer::with_capacity(config.get_buffer_capacity()),
            pending: PendingChars::default(),
            malformed: config.get_malformed(),
            exact: config.get_carry_over() == CarryOver::Retain,
            deferred_error: None,
        }
    }

    pub fn charset(&self) -> Charset {
        self.codec.charset()
    }

    /// Returns the number of undecoded bytes and of decoded-but-unread characters held.
    pub fn buffered(&self) -> (usize, usize) {
        (self.input.len(), self.pending.char_count())
    }

    /// Takes over the buffered state of the engine being replaced. Undecoded bytes will be decoded
    /// by this engine's codec.
    pub fn adopt(&mut self, previous: DecodingEngine) {
        debug_assert!(self.input.is_empty() && self.pending.is_empty());
        let n = self.input.fill_from_slice(previous.input.as_ref());
        debug_assert_eq!(n, previous.input.len());
        self.pending = previous.pending;
        self.deferred_error = previous.deferred_error;
    }

    pub fn read_char(&mut self, source: &mut impl ByteSource) -> Result<Option<char>> {
        Ok(match self.fill(source, 1)? {
            true => self.pending.pop_front(),
            false => None,
        })
    }

    pub fn read_into(
        &mut self,
        source: &mut impl ByteSource,
        dst: &mut [char],
    ) -> Result<Option<usize>> {
        if dst.is_empty() {
            return Ok(Some(0));
        }
        Ok(match self.fill(source, dst.len())? {
            true => Some(self.pending.read_to_slice(dst)),
            false => None,
        })
    }

    pub fn read_to_string(
        &mut self,
        source: &mut impl ByteSource,
        dst: &mut String,
    ) -> Result<usize> {
        let mut total = 0;
        while self.fill(source, usize::MAX)? {
            total += self.pending.read_to_string(dst);
        }
        Ok(total)
    }

    pub fn skip(&mut self, source: &mut impl ByteSource, count: usize) -> Result<usize> {
        let mut skipped = 0;
        while skipped < count && self.fill(source, count - skipped)? {
            skipped += self.pending.skip(count - skipped);
        }
        Ok(skipped)
    }

    pub fn is_ready(&self, source: &mut impl ByteSource) -> Result<bool> {
        if !self.pending.is_empty() || !self.input.is_empty() || self.deferred_error.is_some() {
            return Ok(true);
        }
        Ok(source.available()?)
    }

    /// Decodes until at least one character is pending, returning `Ok(false)` if the source
    /// reached EOF with nothing left to deliver.
    ///
    /// `want` is the number of characters the caller asks for. At most `want` buffered bytes are
    /// decoded per step, so that bytes the caller has not asked for yet stay undecoded and can be
    /// decoded by another engine after a switch. In exact mode the codec is fed one byte at a time
    /// until `want` characters are out, so it never stops inside a sequence.
    fn fill(&mut self, source: &mut impl ByteSource, want: usize) -> Result<bool> {
        loop {
            if !self.pending.is_empty() {
                return Ok(true);
            } else if let Some(e) = self.deferred_error.take() {
                // report the error that has been deferred until all the preceding characters are
                // read
                return Err(e.into());
            }

            if self.input.is_empty() && self.input.fill_from_reader(source)? == 0 {
                self.finish();
                if self.pending.is_empty() && self.deferred_error.is_none() {
                    return Ok(false);
                }
            } else if self.exact {
                let mut produced = 0;
                while produced < want && !self.input.is_empty() && self.deferred_error.is_none() {
                    produced += self.decode(1, false);
                }
            } else {
                self.decode(want, false);
            }
        }
    }

    /// Lets the codec know the end of the stream and then resets it, so that a source yielding
    /// more bytes after EOF keeps being decoded.
    fn finish(&mut self) {
        debug_assert!(self.input.is_empty());
        self.decode(0, true);
        if let Codec::Whatwg(decoder) = &mut self.codec {
            // a BOM after EOF is not at the beginning of the stream
            *decoder = decoder
                .encoding()
                .new_decoder_without_bom_handling()
                .into();
        }
        log::trace!("reset {} decoder at end of stream", self.charset());
    }

    /// Decodes up to `limit` bytes of the buffered input into pending characters, stopping early
    /// only at a malformed sequence that is to be reported. Returns the number of characters
    /// produced.
    fn decode(&mut self, limit: usize, last: bool) -> usize {
        let src = self.input.as_ref();
        let src = &src[..src.len().min(limit)];
        let dst = self.pending.writable();
        let start = dst.len();
        let consumed = match &mut self.codec {
            Codec::Latin1 => {
                dst.extend(src.iter().map(|&b| char::from(b)));
                src.len()
            }
            Codec::Whatwg(decoder) if self.malformed == MalformedAction::Replace => {
                let mut consumed = 0;
                loop {
                    let rest = &src[consumed..];
                    dst.reserve(decoder.max_utf8_buffer_length(rest.len()).unwrap_or(rest.len()));
                    let (result, read, _) = decoder.decode_to_string(rest, dst, last);
                    consumed += read;
                    if let CoderResult::InputEmpty = result {
                        break consumed;
                    }
                }
            }
            Codec::Whatwg(decoder) => {
                let mut consumed = 0;
                loop {
                    let rest = &src[consumed..];
                    dst.reserve(
                        decoder
                            .max_utf8_buffer_length_without_replacement(rest.len())
                            .unwrap_or(rest.len()),
                    );
                    let (result, read) =
                        decoder.decode_to_string_without_replacement(rest, dst, last);
                    consumed += read;
                    match result {
                        DecoderResult::InputEmpty => break consumed,
                        DecoderResult::OutputFull => {}
                        DecoderResult::Malformed(len, _) => {
                            let name = decoder.encoding().name();
                            self.deferred_error = Some(MalformedError::new(name, len.into()));
                            break consumed;
                        }
                    }
                }
            }
        };
        let produced = dst[start..].chars().count();
        self.input.consume(consumed);
        produced
    }
}
