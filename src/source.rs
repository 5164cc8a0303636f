use std::{collections::VecDeque, fs, io};

/// A readable byte channel that a [`SwitchableDecoder`](crate::SwitchableDecoder) decodes from.
///
/// On top of [`std::io::Read`], a byte source can report whether bytes are likely readable without
/// blocking and can be closed explicitly. Both have conservative defaults, so a plain reader only
/// needs an empty `impl` block, or can be wrapped in [`ReadSource`].
///
/// Retrying on failure, timeouts, and cancellation are the concern of the source, not of the
/// decoder: the decoder propagates every error other than [`io::ErrorKind::Interrupted`] as is.
pub trait ByteSource: io::Read {
    /// Returns `true` if a subsequent `read` is likely to return bytes without blocking.
    ///
    /// The default implementation returns `Ok(false)`, which is always a safe answer.
    fn available(&mut self) -> io::Result<bool> {
        Ok(false)
    }

    /// Closes the source, releasing any resource it holds.
    ///
    /// The default implementation does nothing; resources are released when the source is dropped.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ByteSource for &[u8] {
    fn available(&mut self) -> io::Result<bool> {
        Ok(!self.is_empty())
    }
}

impl<T: AsRef<[u8]>> ByteSource for io::Cursor<T> {
    fn available(&mut self) -> io::Result<bool> {
        let len = self.get_ref().as_ref().len() as u64;
        Ok(self.position() < len)
    }
}

impl ByteSource for VecDeque<u8> {
    fn available(&mut self) -> io::Result<bool> {
        Ok(!self.is_empty())
    }
}

impl ByteSource for io::Empty {}

impl ByteSource for io::Stdin {}

impl<R: ByteSource> ByteSource for io::BufReader<R> {
    fn available(&mut self) -> io::Result<bool> {
        if !self.buffer().is_empty() {
            return Ok(true);
        }
        self.get_mut().available()
    }

    fn close(&mut self) -> io::Result<()> {
        self.get_mut().close()
    }
}

impl ByteSource for fs::File {
    fn available(&mut self) -> io::Result<bool> {
        use io::Seek as _;
        let len = self.metadata()?.len();
        Ok(self.stream_position()? < len)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn available(&mut self) -> io::Result<bool> {
        (**self).available()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn available(&mut self) -> io::Result<bool> {
        (**self).available()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Adapts any [`std::io::Read`] into a [`ByteSource`] that never reports available bytes and is
/// closed by being dropped.
///
/// # Examples
///
/// ```rust
/// use std::io;
///
/// use encoding_rs_switch::{ReadSource, SwitchableDecoder};
///
/// let src = io::repeat(b'a');
/// let mut decoder = SwitchableDecoder::new(ReadSource::new(src), "UTF-8")?;
/// assert_eq!(decoder.read_char()?, Some('a'));
/// # Ok::<(), encoding_rs_switch::Error>(())
/// ```
#[derive(Debug)]
pub struct ReadSource<R>(R);

impl<R: io::Read> ReadSource<R> {
    /// Wraps a reader.
    pub fn new(reader: R) -> Self {
        Self(reader)
    }

    /// Returns a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.0
    }

    /// Unwraps this source, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R: io::Read> io::Read for ReadSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R: io::Read> ByteSource for ReadSource<R> {}
