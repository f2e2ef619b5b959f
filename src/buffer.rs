//! Immutable, reference-counted byte storage.

use bytes::Bytes;
use core::ops::Deref;
use core::ops::Range;

/// An immutable byte array with shared ownership.
///
/// Multiple [`Block`][crate::block::Block]s may alias regions of the same
/// `Buffer`; the underlying storage lives as long as the longest-lived
/// referent. Bytes are never mutated once any `Buffer` handle exists — the
/// only mutable bytes in this crate live behind a [`Wire`][crate::wire::Wire]'s
/// still-growing tail segment (a `BytesMut`), which is frozen into a
/// `Buffer` no earlier than [`Wire::finalize`][crate::wire::Wire::finalize],
/// [`Wire::get_buffer`][crate::wire::Wire::get_buffer], or
/// [`Wire::parse`][crate::wire::Wire::parse].
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct Buffer(Bytes);

impl Buffer {
    /// Wrap an already-owned byte vector without copying.
    pub fn from_vec(bytes: alloc::vec::Vec<u8>) -> Self {
        Buffer(Bytes::from(bytes))
    }

    /// Copy `bytes` into a freshly allocated, shared buffer.
    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Buffer(Bytes::copy_from_slice(bytes))
    }

    /// Number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the full byte range.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// A zero-copy sub-view of `range`, sharing the same underlying
    /// allocation (reference count bumped, no bytes copied).
    pub fn slice(&self, range: Range<usize>) -> Buffer {
        Buffer(self.0.slice(range))
    }

    /// Whether `other`'s bytes fall inside `self`'s underlying allocation,
    /// i.e. `other` is a zero-copy sub-view of `self` (or vice versa). Used
    /// by tests to assert that parsing shares storage instead of copying.
    pub fn is_same_allocation(&self, other: &Buffer) -> bool {
        if self.0.is_empty() || other.0.is_empty() {
            return false;
        }
        let self_start = self.0.as_ptr() as usize;
        let self_end = self_start + self.0.len();
        let other_start = other.0.as_ptr() as usize;
        let other_end = other_start + other.0.len();
        self_start <= other_start && other_end <= self_end
            || other_start <= self_start && self_end <= other_end
    }
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<alloc::vec::Vec<u8>> for Buffer {
    fn from(bytes: alloc::vec::Vec<u8>) -> Self {
        Buffer::from_vec(bytes)
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Self {
        Buffer::copy_from_slice(bytes)
    }
}

impl From<Bytes> for Buffer {
    fn from(bytes: Bytes) -> Self {
        Buffer(bytes)
    }
}

impl From<Buffer> for Bytes {
    fn from(buffer: Buffer) -> Self {
        buffer.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slicing_shares_storage() {
        let buf = Buffer::copy_from_slice(&[1, 2, 3, 4, 5]);
        let mid = buf.slice(1..4);
        assert_eq!(mid.as_slice(), &[2, 3, 4]);
        assert!(buf.is_same_allocation(&mid));
    }

    #[test]
    fn distinct_allocations_are_not_shared() {
        let a = Buffer::copy_from_slice(&[1, 2, 3]);
        let b = Buffer::copy_from_slice(&[1, 2, 3]);
        assert_eq!(a.as_slice(), b.as_slice());
        assert!(!a.is_same_allocation(&b));
    }
}
