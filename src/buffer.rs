use std::{fmt, io};

/// A fixed-capacity byte buffer holding input read from the source but not yet decoded.
pub(crate) struct InputBuffer {
    buf: Box<[u8]>,
    start: usize,
    end: usize,
}

impl AsRef<[u8]> for InputBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.buf[self.start..self.end]
    }
}

impl fmt::Debug for InputBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputBuffer")
            .field("len", &self.len())
            .field("capacity", &self.buf.len())
            .finish()
    }
}

impl InputBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity].into_boxed_slice(),
            start: 0,
            end: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
    }

    /// Marks `count` bytes at the front as decoded.
    pub fn consume(&mut self, count: usize) {
        debug_assert!(count <= self.len());
        self.start = self.end.min(self.start + count);
        if self.start == self.end {
            self.clear();
        }
    }

    /// Moves the unconsumed bytes to the front so that the spare capacity is contiguous.
    fn compact(&mut self) {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
    }

    /// Pulls bytes from a reader into the spare capacity with a single successful read call,
    /// returning the number of bytes read. `Ok(0)` means the reader reached EOF or the buffer is
    /// full.
    pub fn fill_from_reader(&mut self, reader: &mut impl io::Read) -> io::Result<usize> {
        self.compact();
        if self.end == self.buf.len() {
            return Ok(0);
        }
        loop {
            match reader.read(&mut self.buf[self.end..]) {
                Ok(n) => {
                    debug_assert!(self.end + n <= self.buf.len());
                    self.end += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }

    /// Writes as many bytes as possible copied from a slice into the spare capacity, returning the
    /// number of bytes consumed.
    pub fn fill_from_slice(&mut self, src: &[u8]) -> usize {
        self.compact();
        let n = (self.buf.len() - self.end).min(src.len());
        self.buf[self.end..self.end + n].copy_from_slice(&src[..n]);
        self.end += n;
        n
    }
}

/// Characters decoded but not yet delivered to the caller, kept as UTF-8.
#[derive(Debug, Default)]
pub(crate) struct PendingChars {
    buf: String,
    pos: usize,
}

impl AsRef<str> for PendingChars {
    fn as_ref(&self) -> &str {
        &self.buf[self.pos..]
    }
}

impl PendingChars {
    pub fn is_empty(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Returns the number of characters held.
    pub fn char_count(&self) -> usize {
        self.as_ref().chars().count()
    }

    /// Returns the string that decoded output is appended to, dropping the delivered prefix first
    /// so that the string does not grow without bound.
    pub fn writable(&mut self) -> &mut String {
        if self.pos > 0 {
            self.buf.drain(..self.pos);
            self.pos = 0;
        }
        &mut self.buf
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.pos = 0;
    }

    pub fn pop_front(&mut self) -> Option<char> {
        let c = self.as_ref().chars().next()?;
        self.advance(c.len_utf8());
        Some(c)
    }

    /// Moves up to `dst.len()` characters into `dst`, returning the number of characters moved.
    pub fn read_to_slice(&mut self, dst: &mut [char]) -> usize {
        let mut consumed = 0;
        let mut n = 0;
        for (slot, c) in dst.iter_mut().zip(self.as_ref().chars()) {
            *slot = c;
            consumed += c.len_utf8();
            n += 1;
        }
        self.advance(consumed);
        n
    }

    /// Appends every held character to `dst`, returning the number of bytes appended.
    pub fn read_to_string(&mut self, dst: &mut String) -> usize {
        let s = self.as_ref();
        let n = s.len();
        dst.push_str(s);
        self.clear();
        n
    }

    /// Drops up to `count` characters, returning the number of characters dropped.
    pub fn skip(&mut self, count: usize) -> usize {
        let (n, bytes) = self
            .as_ref()
            .chars()
            .take(count)
            .fold((0, 0), |(n, bytes), c| (n + 1, bytes + c.len_utf8()));
        self.advance(bytes);
        n
    }

    fn advance(&mut self, bytes: usize) {
        debug_assert!(self.buf.is_char_boundary(self.pos + bytes));
        self.pos += bytes;
        if self.pos == self.buf.len() {
            self.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InputBuffer, PendingChars};

    #[test]
    fn input_buffer_compacts_before_filling() {
        let mut buffer = InputBuffer::with_capacity(4);
        assert_eq!(buffer.fill_from_slice(b"abcdef"), 4);
        assert_eq!(buffer.as_ref(), b"abcd");
        buffer.consume(3);
        assert_eq!(buffer.len(), 1);

        let mut src: &[u8] = b"xyz";
        assert_eq!(buffer.fill_from_reader(&mut src).unwrap(), 3);
        assert_eq!(buffer.as_ref(), b"dxyz");
        assert_eq!(buffer.fill_from_reader(&mut &b"!"[..]).unwrap(), 0);

        buffer.consume(4);
        assert!(buffer.is_empty());
        assert_eq!(buffer.fill_from_reader(&mut &b""[..]).unwrap(), 0);
    }

    #[test]
    fn pending_chars_hand_out_whole_characters() {
        let mut pending = PendingChars::default();
        pending.writable().push_str("a世界😂");
        assert_eq!(pending.char_count(), 4);
        assert_eq!(pending.pop_front(), Some('a'));

        let mut dst = ['\0'; 2];
        assert_eq!(pending.read_to_slice(&mut dst), 2);
        assert_eq!(dst, ['世', '界']);

        pending.writable().push_str("xyz");
        assert_eq!(pending.as_ref(), "😂xyz");
        assert_eq!(pending.skip(2), 2);

        let mut s = String::new();
        assert_eq!(pending.read_to_string(&mut s), 2);
        assert_eq!(s, "yz");
        assert!(pending.is_empty());
        assert_eq!(pending.pop_front(), None);
    }
}
