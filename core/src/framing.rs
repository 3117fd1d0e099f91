//! Line-oriented and fixed-length readers over a blocking byte stream.
//!
//! # Design
//! `read_line` pulls one byte per `read` call and keeps no buffer of its own,
//! so once the blank line ending a response header has been consumed the
//! stream is positioned exactly on the first body byte. Slow on long lines,
//! but header lines are short and bounded by `max`.

use std::io::{self, Read};

/// The stream ended or failed before the read completed.
///
/// `read` is the number of bytes consumed from the stream before the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incomplete {
    pub read: usize,
}

/// Read a single byte, retrying on `Interrupted`. `Ok(None)` means EOF.
fn read_byte<R: Read>(reader: &mut R) -> io::Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Read one LF-terminated line, consuming at most `max` bytes.
///
/// CR bytes are dropped and the LF is not stored, so `"abc\r\n"` yields
/// `b"abc"`. If `max` bytes are consumed without seeing LF, the bytes stored so
/// far are returned and the rest of the line is left on the stream.
pub fn read_line<R: Read>(reader: &mut R, max: usize) -> Result<Vec<u8>, Incomplete> {
    let mut line = Vec::new();
    let mut consumed = 0;

    while consumed < max {
        let byte = match read_byte(reader) {
            Ok(Some(b)) => b,
            Ok(None) | Err(_) => return Err(Incomplete { read: consumed }),
        };
        consumed += 1;
        match byte {
            b'\r' => continue,
            b'\n' => break,
            b => line.push(b),
        }
    }

    Ok(line)
}

/// Fill `buf` completely, retrying short reads.
///
/// Returns `buf.len()` on success. A read of zero bytes or an error before the
/// buffer is full is treated as premature EOF.
pub fn read_fixed<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, Incomplete> {
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Err(Incomplete { read: filled }),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => return Err(Incomplete { read: filled }),
        }
    }

    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Delivers its data at most `chunk` bytes per read.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl Trickle {
        fn new(data: &[u8], chunk: usize) -> Self {
            Self {
                data: data.to_vec(),
                pos: 0,
                chunk,
            }
        }
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    /// Fails with `Interrupted` once before every successful read.
    struct Flaky {
        inner: Cursor<Vec<u8>>,
        interrupt_next: bool,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.interrupt_next {
                self.interrupt_next = false;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.interrupt_next = true;
            self.inner.read(buf)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::ConnectionReset))
        }
    }

    #[test]
    fn crlf_line_strips_terminator() {
        let mut stream = Cursor::new(b"abc\r\n".to_vec());
        let line = read_line(&mut stream, 64).unwrap();
        assert_eq!(line, b"abc");
        assert_eq!(line.len(), 3);
    }

    #[test]
    fn bare_lf_line() {
        let mut stream = Cursor::new(b"abc\ndef\n".to_vec());
        assert_eq!(read_line(&mut stream, 64).unwrap(), b"abc");
        assert_eq!(read_line(&mut stream, 64).unwrap(), b"def");
    }

    #[test]
    fn blank_line_is_empty() {
        let mut stream = Cursor::new(b"\r\nbody".to_vec());
        assert!(read_line(&mut stream, 64).unwrap().is_empty());
        assert_eq!(stream.position(), 2);
    }

    #[test]
    fn stream_left_on_first_byte_after_line() {
        let mut stream = Cursor::new(b"Header: x\r\n\r\nhello".to_vec());
        read_line(&mut stream, 64).unwrap();
        read_line(&mut stream, 64).unwrap();
        let mut rest = String::new();
        stream.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "hello");
    }

    #[test]
    fn max_bounds_bytes_consumed() {
        let mut stream = Cursor::new(b"abcdefgh\n".to_vec());
        assert_eq!(read_line(&mut stream, 4).unwrap(), b"abcd");
        assert_eq!(stream.position(), 4);
        assert_eq!(read_line(&mut stream, 64).unwrap(), b"efgh");
    }

    #[test]
    fn carriage_returns_count_toward_max() {
        let mut stream = Cursor::new(b"a\r\r\rb\n".to_vec());
        assert_eq!(read_line(&mut stream, 4).unwrap(), b"a");
        assert_eq!(stream.position(), 4);
    }

    #[test]
    fn eof_before_terminator_reports_consumed() {
        let mut stream = Cursor::new(b"abc".to_vec());
        assert_eq!(read_line(&mut stream, 64), Err(Incomplete { read: 3 }));
    }

    #[test]
    fn eof_on_empty_stream() {
        let mut stream = Cursor::new(Vec::new());
        assert_eq!(read_line(&mut stream, 64), Err(Incomplete { read: 0 }));
    }

    #[test]
    fn read_error_fails_line() {
        assert_eq!(read_line(&mut Broken, 64), Err(Incomplete { read: 0 }));
    }

    #[test]
    fn line_reader_retries_interrupted() {
        let mut stream = Flaky {
            inner: Cursor::new(b"ok\r\n".to_vec()),
            interrupt_next: true,
        };
        assert_eq!(read_line(&mut stream, 64).unwrap(), b"ok");
    }

    #[test]
    fn fixed_reassembles_small_chunks() {
        let mut stream = Trickle::new(b"hello world", 3);
        let mut buf = [0u8; 11];
        assert_eq!(read_fixed(&mut stream, &mut buf), Ok(11));
        assert_eq!(&buf, b"hello world");
    }

    #[test]
    fn fixed_leaves_trailing_bytes_unread() {
        let mut stream = Cursor::new(b"hello world".to_vec());
        let mut buf = [0u8; 5];
        assert_eq!(read_fixed(&mut stream, &mut buf), Ok(5));
        assert_eq!(stream.position(), 5);
    }

    #[test]
    fn fixed_early_close_reports_delivered() {
        let mut stream = Trickle::new(b"hel", 2);
        let mut buf = [0u8; 5];
        assert_eq!(read_fixed(&mut stream, &mut buf), Err(Incomplete { read: 3 }));
        assert_eq!(&buf[..3], b"hel");
    }

    #[test]
    fn fixed_read_error_reports_delivered() {
        let mut buf = [0u8; 5];
        assert_eq!(read_fixed(&mut Broken, &mut buf), Err(Incomplete { read: 0 }));
    }

    #[test]
    fn fixed_zero_length_reads_nothing() {
        let mut buf = [0u8; 0];
        assert_eq!(read_fixed(&mut Broken, &mut buf), Ok(0));
    }

    #[test]
    fn fixed_retries_interrupted() {
        let mut stream = Flaky {
            inner: Cursor::new(b"data".to_vec()),
            interrupt_next: true,
        };
        let mut buf = [0u8; 4];
        assert_eq!(read_fixed(&mut stream, &mut buf), Ok(4));
    }
}
