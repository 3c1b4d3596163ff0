//! Secure Erase
//!
//! Scrubs sensitive byte buffers before their memory is released.
//!
//! Overwrites go through [`zeroize`], which uses volatile writes followed
//! by a compiler fence, so the optimizer cannot discard them as dead
//! stores even though the buffer is never read again. The whole
//! allocation is scrubbed, including spare capacity that may still hold
//! bytes from an earlier, longer length.

use tracing::trace;
use zeroize::Zeroize;

/// Erase a buffer and release its allocation.
///
/// - `None` or a buffer with no allocation is a no-op.
/// - Every byte of the allocation (up to capacity) is overwritten once
///   with zero.
/// - Afterwards the buffer's length and capacity are both zero, so a
///   caller that keeps the `Vec` around cannot read the old contents.
///
/// Calling it again on the same buffer is harmless. Exclusive access for
/// the duration of the call is guaranteed by the `&mut` borrow.
pub fn secure_erase(buffer: Option<&mut Vec<u8>>) {
    let Some(buffer) = buffer else {
        return;
    };
    if buffer.capacity() == 0 {
        return;
    }

    let capacity = buffer.capacity();

    // Zeroes `len` bytes, truncates, then zeroes the spare capacity.
    buffer.zeroize();

    // Drop the scrubbed allocation so capacity reports zero as well.
    drop(std::mem::take(buffer));

    trace!(bytes = capacity, "Sensitive buffer erased");
}

/// Erase a borrowed region in place.
///
/// The slice length cannot change, so only the contents are scrubbed;
/// use [`secure_erase`] when the owning `Vec` is available.
pub fn secure_erase_slice(region: &mut [u8]) {
    if region.is_empty() {
        return;
    }
    region.zeroize();
    trace!(bytes = region.len(), "Sensitive region erased");
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_absent_buffer_is_noop() {
        secure_erase(None);
    }

    #[test]
    fn test_empty_buffer_is_noop() {
        let mut buffer = Vec::new();
        secure_erase(Some(&mut buffer));
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.capacity(), 0);
    }

    #[test]
    fn test_erase_resets_length_and_capacity() {
        let mut buffer = b"face-template-0042".to_vec();
        secure_erase(Some(&mut buffer));

        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 0);
    }

    #[test]
    fn test_erase_truncated_buffer_with_spare_capacity() {
        let mut buffer = Vec::with_capacity(64);
        buffer.extend_from_slice(&[0xAB; 48]);
        buffer.truncate(4);

        secure_erase(Some(&mut buffer));
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.capacity(), 0);
    }

    #[test]
    fn test_erase_is_idempotent() {
        let mut buffer = vec![7u8; 32];
        secure_erase(Some(&mut buffer));
        secure_erase(Some(&mut buffer));

        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 0);
    }

    #[test]
    fn test_erase_slice_zeroes_contents() {
        let mut region = [0x5Au8; 16];
        secure_erase_slice(&mut region);
        assert!(region.iter().all(|b| *b == 0));

        secure_erase_slice(&mut []);
    }

    proptest! {
        #[test]
        fn prop_any_buffer_ends_empty(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let mut buffer = data;
            secure_erase(Some(&mut buffer));
            prop_assert_eq!(buffer.len(), 0);
            prop_assert_eq!(buffer.capacity(), 0);
        }
    }
}
