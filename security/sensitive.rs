//! Scoped holders for sensitive material
//!
//! [`SensitiveBuffer`] and [`SensitiveValue`] scrub their contents when
//! they go out of scope, on every exit path: normal return, early `?`
//! return and panic unwind alike.

use std::fmt;
use std::io::{self, Read};
use zeroize::Zeroize;

use crate::secure_erase::{secure_erase, secure_erase_slice};

const READ_CHUNK: usize = 8 * 1024;

// Lengths of buffers fully released by `Drop`, per thread
#[cfg(test)]
thread_local! {
    static DROP_ERASURES: std::cell::RefCell<Vec<usize>> = std::cell::RefCell::new(Vec::new());
}

/// Owned byte buffer that is securely erased on drop.
///
/// Growth never leaves an unscrubbed copy behind: when an append exceeds
/// the current capacity the data moves to a new allocation and the old
/// one is erased before it is freed.
pub struct SensitiveBuffer {
    bytes: Vec<u8>,
}

impl SensitiveBuffer {
    /// Empty buffer
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Empty buffer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Take ownership of existing bytes. The caller keeps no copy.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Read a source to the end into a new buffer. Intermediate chunks are
    /// scrubbed; on error everything read so far is erased.
    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut buffer = Self::new();
        let mut chunk = [0u8; READ_CHUNK];

        let result = loop {
            match reader.read(&mut chunk) {
                Ok(0) => break Ok(()),
                Ok(n) => buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => break Err(e),
            }
        };
        secure_erase_slice(&mut chunk);

        result.map(|()| buffer)
    }

    /// Append bytes without leaking the previous allocation
    pub fn extend_from_slice(&mut self, data: &[u8]) {
        let needed = self.bytes.len() + data.len();
        if needed > self.bytes.capacity() {
            let mut grown = Vec::with_capacity(needed.max(self.bytes.capacity() * 2));
            grown.extend_from_slice(&self.bytes);
            secure_erase(Some(&mut self.bytes));
            self.bytes = grown;
        }
        self.bytes.extend_from_slice(data);
    }

    /// Contents
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable contents
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Allocated capacity
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Erase now rather than at drop. The buffer stays usable and empty.
    pub fn erase(&mut self) {
        secure_erase(Some(&mut self.bytes));
    }
}

impl Default for SensitiveBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for SensitiveBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl Drop for SensitiveBuffer {
    fn drop(&mut self) {
        #[cfg(test)]
        let len = self.bytes.len();

        self.erase();

        #[cfg(test)]
        {
            if self.bytes.capacity() == 0 {
                DROP_ERASURES.with(|log| log.borrow_mut().push(len));
            }
        }
    }
}

impl fmt::Debug for SensitiveBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SensitiveBuffer(<{} bytes redacted>)", self.bytes.len())
    }
}

/// Small sensitive value (a confidence score, a PIN digit) zeroized on drop
pub struct SensitiveValue<T: Zeroize> {
    value: T,
}

impl<T: Zeroize> SensitiveValue<T> {
    /// Wrap a value
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// Borrow the value
    pub fn expose(&self) -> &T {
        &self.value
    }

    /// Mutably borrow the value
    pub fn expose_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: Zeroize> Drop for SensitiveValue<T> {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

impl<T: Zeroize> fmt::Debug for SensitiveValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SensitiveValue(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erase_keeps_buffer_usable() {
        let mut buffer = SensitiveBuffer::from_vec(b"voice-embedding".to_vec());
        assert_eq!(buffer.len(), 15);

        buffer.erase();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 0);

        buffer.extend_from_slice(b"next");
        assert_eq!(buffer.as_slice(), b"next");
    }

    #[test]
    fn test_growth_preserves_contents() {
        let mut buffer = SensitiveBuffer::with_capacity(4);
        buffer.extend_from_slice(b"abcd");
        buffer.extend_from_slice(b"efgh");
        buffer.extend_from_slice(b"ij");

        assert_eq!(buffer.as_slice(), b"abcdefghij");
        assert!(buffer.capacity() >= 10);
    }

    #[test]
    fn test_read_from() {
        let data = vec![0x42u8; READ_CHUNK * 2 + 17];
        let buffer = SensitiveBuffer::read_from(&mut data.as_slice()).unwrap();
        assert_eq!(buffer.as_slice(), data.as_slice());
    }

    #[test]
    fn test_read_from_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "upload aborted"))
            }
        }

        let err = SensitiveBuffer::read_from(&mut Broken).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_debug_is_redacted() {
        let buffer = SensitiveBuffer::from_vec(b"secret".to_vec());
        assert_eq!(format!("{:?}", buffer), "SensitiveBuffer(<6 bytes redacted>)");

        let value = SensitiveValue::new(0.93f64);
        assert_eq!(*value.expose(), 0.93);
        assert!(!format!("{:?}", value).contains("0.93"));
    }

    #[test]
    fn test_value_zeroize_on_demand() {
        let mut value = SensitiveValue::new([9u8; 4]);
        value.expose_mut().zeroize();
        assert_eq!(value.expose(), &[0u8; 4]);
    }

    fn take_drop_erasures() -> Vec<usize> {
        DROP_ERASURES.with(|log| std::mem::take(&mut *log.borrow_mut()))
    }

    fn header_checksum(sample: SensitiveBuffer) -> io::Result<u8> {
        let header = sample
            .as_slice()
            .get(..4)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "truncated sample"))?;
        Ok(header.iter().fold(0, |acc, b| acc ^ b))
    }

    #[test]
    fn test_drop_erases_on_unwind() {
        take_drop_erasures();

        let result = std::panic::catch_unwind(|| {
            let buffer = SensitiveBuffer::from_vec(vec![1, 2, 3]);
            assert_eq!(buffer.len(), 3);
            panic!("matcher crashed");
        });

        assert!(result.is_err());
        assert_eq!(take_drop_erasures(), vec![3]);
    }

    #[test]
    fn test_drop_erases_on_early_return() {
        take_drop_erasures();

        let err = header_checksum(SensitiveBuffer::from_vec(vec![7, 7, 7])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(take_drop_erasures(), vec![3]);

        assert_eq!(header_checksum(SensitiveBuffer::from_vec(vec![1, 2, 4, 8, 16])).unwrap(), 15);
        assert_eq!(take_drop_erasures(), vec![5]);
    }
}
