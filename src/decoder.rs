use std::mem;

use log::debug;

use super::engine::{Codec, DecodingEngine};
use super::{default_charset, ByteSource, CarryOver, Charset, Config, EncodingSpec};
use super::{Error, Result};

/// A character reader that decodes a byte source with an encoding that can be switched at any
/// point of the stream.
///
/// This wrapper reads bytes from the underlying [`ByteSource`], decodes them with the current
/// encoding, and hands out the decoded characters through [`read_char`], [`read_into`] and
/// friends. [`set_encoding`] replaces the decoding engine while keeping the source, so that a
/// caller that learns the real encoding from the data itself (e.g. from a pragma or an encoding
/// declaration) can switch to it without reopening the source.
///
/// Like a buffered reader, this decoder reads ahead from the source, but it decodes only as many
/// bytes as each read asks for. On a switch, whatever the old engine holds is handled according to
/// [`Config::carry_over`]. With the default, [`CarryOver::Discard`], it is dropped, so callers
/// should switch at a point where they have read every character that the source has yielded, e.g.
/// after [`is_ready`] returns `false` on a streaming source. [`CarryOver::Retain`] decodes the
/// bytes read ahead with the new encoding instead.
///
/// Reads block until the source yields bytes or reaches EOF. Reaching EOF does not close this
/// decoder: the read returns `Ok(None)`, and a source that yields more bytes later keeps being
/// decoded.
///
/// [`read_char`]: Self::read_char
/// [`read_into`]: Self::read_into
/// [`set_encoding`]: Self::set_encoding
/// [`is_ready`]: Self::is_ready
///
/// # Examples
///
/// ```rust
/// use encoding_rs_switch::SwitchableDecoder;
///
/// let src: &[u8] = &[0x41, 0x42, 0xE4, 0xB8, 0x80];
///
/// let mut decoder = SwitchableDecoder::new(src, "UTF-8")?;
/// let mut dst = String::new();
/// decoder.read_to_string(&mut dst)?;
/// assert_eq!(dst, "AB\u{4E00}");
///
/// let mut decoder = SwitchableDecoder::new(src, "UTF-8")?;
/// decoder.set_encoding("ISO-8859-1")?;
/// let mut dst = String::new();
/// decoder.read_to_string(&mut dst)?;
/// assert_eq!(dst, "AB\u{E4}\u{B8}\u{80}");
/// # Ok::<(), encoding_rs_switch::Error>(())
/// ```
#[derive(Debug)]
pub struct SwitchableDecoder<S> {
    /// The source and the active engine; `None` once closed.
    inner: Option<Inner<S>>,
    config: Config,
}

#[derive(Debug)]
struct Inner<S> {
    source: S,
    engine: DecodingEngine,
}

impl<S: ByteSource> SwitchableDecoder<S> {
    /// Creates a new decoder from a byte source and an encoding.
    ///
    /// `encoding` is anything convertible into [`EncodingSpec`]: a label such as `"Shift_JIS"`, a
    /// [`Charset`], an `&'static encoding_rs::Encoding`, a preconfigured
    /// [`encoding_rs::Decoder`], or `None` for the platform default.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedEncoding`] if the label is unknown; [`Error::InvalidArgument`] if it is
    /// empty.
    pub fn new<'a>(source: S, encoding: impl Into<EncodingSpec<'a>>) -> Result<Self> {
        Self::with_config(source, encoding, Config::default())
    }

    /// Creates a new decoder with the platform default encoding, see [`default_charset`].
    pub fn with_default_encoding(source: S) -> Self {
        Self::from_codec(
            source,
            Codec::for_charset(default_charset()),
            Config::default(),
        )
    }

    /// Creates a new decoder with a custom configuration.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_config<'a>(
        source: S,
        encoding: impl Into<EncodingSpec<'a>>,
        config: Config,
    ) -> Result<Self> {
        let codec = Codec::resolve(encoding.into())?;
        Ok(Self::from_codec(source, codec, config))
    }

    fn from_codec(source: S, codec: Codec, config: Config) -> Self {
        let engine = DecodingEngine::new(codec, &config);
        debug!("opened decoder with {}", engine.charset());
        Self {
            inner: Some(Inner { source, engine }),
            config,
        }
    }

    fn inner_mut(&mut self) -> Result<&mut Inner<S>> {
        self.inner.as_mut().ok_or(Error::Closed)
    }

    /// Reads a single character, returning `Ok(None)` at the end of the stream.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the source fails, [`Error::Malformed`] on malformed input under
    /// [`MalformedAction::Report`](crate::MalformedAction::Report), and [`Error::Closed`] after
    /// [`close`](Self::close).
    pub fn read_char(&mut self) -> Result<Option<char>> {
        let Inner { source, engine } = self.inner_mut()?;
        engine.read_char(source)
    }

    /// Reads up to `max_len` characters into `buf[offset..offset + max_len]`, returning the number
    /// of characters read, or `Ok(None)` at the end of the stream.
    ///
    /// This method blocks until at least one character is available, and then returns without
    /// waiting for more, so the count may be less than `max_len`. A `max_len` of zero returns
    /// `Ok(Some(0))` immediately.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the region does not fit in `buf`; otherwise as
    /// [`read_char`](Self::read_char).
    pub fn read_into(
        &mut self,
        buf: &mut [char],
        offset: usize,
        max_len: usize,
    ) -> Result<Option<usize>> {
        let Inner { source, engine } = self.inner_mut()?;
        let end = offset
            .checked_add(max_len)
            .filter(|&end| end <= buf.len())
            .ok_or(Error::InvalidArgument("buffer region out of bounds"))?;
        engine.read_into(source, &mut buf[offset..end])
    }

    /// Reads every remaining character and appends it to `buf`, returning the number of bytes
    /// appended.
    ///
    /// On error, the characters read before the error stay appended to `buf`.
    pub fn read_to_string(&mut self, buf: &mut String) -> Result<usize> {
        let Inner { source, engine } = self.inner_mut()?;
        engine.read_to_string(source, buf)
    }

    /// Reads and drops up to `n` characters, returning the number of characters skipped. The
    /// count is less than `n` only at the end of the stream.
    pub fn skip(&mut self, n: usize) -> Result<usize> {
        let Inner { source, engine } = self.inner_mut()?;
        engine.skip(source, n)
    }

    /// Returns an iterator over the remaining characters.
    ///
    /// The iterator ends at the end of the stream and yields every error it meets, so collecting
    /// it into a `Result` stops at the first error. On a closed decoder it yields
    /// [`Error::Closed`] once and then ends. An [`Error::Io`] is yielded as often as the source
    /// keeps failing, so a loop that skips errors should stop at the first I/O error.
    ///
    /// ```rust
    /// use encoding_rs_switch::SwitchableDecoder;
    ///
    /// let src: &[u8] = &[0x93, 0xfa, 0x96, 0x7b];
    /// let mut decoder = SwitchableDecoder::new(src, "sjis")?;
    /// let s = decoder.chars().collect::<Result<String, _>>()?;
    /// assert_eq!(s, "日本");
    /// # Ok::<(), encoding_rs_switch::Error>(())
    /// ```
    pub fn chars(&mut self) -> Chars<'_, S> {
        Chars {
            decoder: self,
            closed: false,
        }
    }

    /// Returns `true` if the next read is guaranteed not to block: some input is buffered or the
    /// source reports available bytes.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if probing the source fails; [`Error::Closed`] after
    /// [`close`](Self::close).
    pub fn is_ready(&mut self) -> Result<bool> {
        let Inner { source, engine } = self.inner_mut()?;
        engine.is_ready(source)
    }

    /// Returns the canonical name of the active encoding, or `None` if this decoder is closed.
    pub fn encoding_name(&self) -> Option<&'static str> {
        self.charset().map(|c| c.name())
    }

    /// Returns the active charset, or `None` if this decoder is closed.
    pub fn charset(&self) -> Option<Charset> {
        self.inner.as_ref().map(|inner| inner.engine.charset())
    }

    /// Replaces the decoding engine with a new one for `encoding`, keeping the source.
    ///
    /// The new encoding applies to every subsequent read. Buffered state of the previous engine is
    /// dropped or carried over as per [`Config::carry_over`]. If `encoding` cannot be resolved,
    /// the previous engine stays active and this decoder remains usable.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new), plus [`Error::Closed`] after [`close`](Self::close).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::VecDeque;
    ///
    /// use encoding_rs_switch::SwitchableDecoder;
    ///
    /// let mut decoder = SwitchableDecoder::new(VecDeque::<u8>::new(), "UTF-8")?;
    /// let mut dst = String::new();
    ///
    /// decoder.source_mut().unwrap().extend(b"caf\xc3\xa9 ");
    /// decoder.read_to_string(&mut dst)?;
    ///
    /// decoder.set_encoding("windows-1252")?;
    /// decoder.source_mut().unwrap().extend(b"caf\xe9");
    /// decoder.read_to_string(&mut dst)?;
    ///
    /// assert_eq!(dst, "café café");
    /// # Ok::<(), encoding_rs_switch::Error>(())
    /// ```
    pub fn set_encoding<'a>(&mut self, encoding: impl Into<EncodingSpec<'a>>) -> Result<()> {
        let config = self.config;
        let inner = self.inner_mut()?;
        let next = DecodingEngine::new(Codec::resolve(encoding.into())?, &config);
        let previous = mem::replace(&mut inner.engine, next);

        let (bytes, chars) = previous.buffered();
        debug!(
            "switched decoder from {} to {} ({:?} {} undecoded byte(s) and {} decoded char(s))",
            previous.charset(),
            inner.engine.charset(),
            config.get_carry_over(),
            bytes,
            chars
        );
        if config.get_carry_over() == CarryOver::Retain {
            inner.engine.adopt(previous);
        }
        Ok(())
    }

    /// Closes this decoder, dropping the engine and closing the source.
    ///
    /// Calling this method again is a no-op that returns `Ok(())`. This decoder counts as closed
    /// even if closing the source fails; the failure is still reported.
    pub fn close(&mut self) -> Result<()> {
        match self.inner.take() {
            None => Ok(()),
            Some(Inner { mut source, engine }) => {
                debug!("closing decoder with {}", engine.charset());
                drop(engine);
                Ok(source.close()?)
            }
        }
    }

    /// Returns `true` if this decoder has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns a reference to the underlying source, or `None` if this decoder is closed.
    pub fn source_ref(&self) -> Option<&S> {
        self.inner.as_ref().map(|inner| &inner.source)
    }

    /// Returns a mutable reference to the underlying source, or `None` if this decoder is closed.
    ///
    /// Reading from the source directly skips bytes past this decoder. Feeding a source such as
    /// `VecDeque<u8>` is the intended use.
    pub fn source_mut(&mut self) -> Option<&mut S> {
        self.inner.as_mut().map(|inner| &mut inner.source)
    }

    /// Returns the configuration of this decoder.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// An iterator over the characters of a [`SwitchableDecoder`], created by
/// [`SwitchableDecoder::chars`].
#[derive(Debug)]
pub struct Chars<'a, S> {
    decoder: &'a mut SwitchableDecoder<S>,
    /// Set once `Error::Closed` has been yielded.
    closed: bool,
}

impl<S: ByteSource> Iterator for Chars<'_, S> {
    type Item = Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        let next = self.decoder.read_char().transpose();
        self.closed = matches!(next, Some(Err(Error::Closed)));
        next
    }
}
