//! A single link in a [`Wire`](super::Wire)'s segment chain.

use crate::buffer::Buffer;
use bytes::{BufMut, BytesMut};
use core::cell::{Cell, RefCell};

/// A segment either still belongs exclusively to its owning [`Wire`] and
/// may grow (`Owned`), or has been shared out — via
/// [`Wire::set_iovec`](super::Wire::set_iovec), [`Wire::get_buffer`](super::Wire::get_buffer),
/// [`Wire::parse`](super::Wire::parse), or [`Wire::append_block`](super::Wire::append_block) —
/// and is now a frozen, immutable [`Buffer`] (`Frozen`). The transition is
/// one-way: once frozen, a segment's capacity is pinned to its length, so
/// further writes are forced into a new segment instead of silently
/// mutating bytes someone else may be reading.
enum Storage {
    Owned(BytesMut),
    Frozen(Buffer),
}

pub(super) struct Segment {
    storage: RefCell<Storage>,
    /// Logical capacity cap once `trim_capacity_to_size` has run. `BytesMut`
    /// has no "give back unused capacity" operation, so we track the cap
    /// ourselves instead of trusting `BytesMut::capacity()` — otherwise a
    /// segment abandoned by `Wire::expand` would keep reporting its old
    /// physical headroom, and a later `set_position` rewind into it could
    /// write past where the next segment's `offset` says it begins.
    capped_capacity: Cell<Option<usize>>,
    pub(super) offset: usize,
}

impl Segment {
    pub(super) fn new_owned(capacity: usize, offset: usize) -> Segment {
        Segment {
            storage: RefCell::new(Storage::Owned(BytesMut::with_capacity(capacity))),
            capped_capacity: Cell::new(None),
            offset,
        }
    }

    pub(super) fn from_buffer(buffer: Buffer, offset: usize) -> Segment {
        Segment {
            storage: RefCell::new(Storage::Frozen(buffer)),
            capped_capacity: Cell::new(None),
            offset,
        }
    }

    /// Bytes actually written so far.
    pub(super) fn size(&self) -> usize {
        match &*self.storage.borrow() {
            Storage::Owned(buf) => buf.len(),
            Storage::Frozen(buf) => buf.len(),
        }
    }

    /// Total allocated room. Equal to `size()` once frozen or trimmed.
    pub(super) fn capacity(&self) -> usize {
        if let Some(cap) = self.capped_capacity.get() {
            return cap;
        }
        match &*self.storage.borrow() {
            Storage::Owned(buf) => buf.capacity(),
            Storage::Frozen(buf) => buf.len(),
        }
    }

    /// Shrink this still-owned segment's capacity down to its used size,
    /// abandoning any unused tail bytes. A no-op once frozen.
    pub(super) fn trim_capacity_to_size(&mut self) {
        self.capped_capacity.set(Some(self.size()));
    }

    /// Shrink the used-bytes length to `len`, e.g. when `Wire::finalize`
    /// rewinds a segment's tail.
    pub(super) fn truncate_to(&mut self, len: usize) {
        match self.storage.get_mut() {
            Storage::Owned(buf) => buf.truncate(len),
            Storage::Frozen(buf) => *buf = buf.slice(0..len),
        }
    }

    /// Write `bytes` at the absolute Wire position `abs_pos`, which must
    /// fall within `[offset, offset + capacity())` of a still-owned
    /// segment. Either extends the segment (appending at its current
    /// length) or overwrites already-written bytes in place (patching a
    /// value reserved earlier in the same, not-yet-finalized Wire).
    pub(super) fn write_at(&mut self, abs_pos: usize, bytes: &[u8]) {
        let local = abs_pos - self.offset;
        match self.storage.get_mut() {
            Storage::Owned(buf) => {
                if local == buf.len() {
                    buf.put_slice(bytes);
                } else {
                    debug_assert!(local + bytes.len() <= buf.len(), "write would leave a gap");
                    buf[local..local + bytes.len()].copy_from_slice(bytes);
                }
            }
            Storage::Frozen(_) => {
                panic!("attempted to write into a frozen Wire segment")
            }
        }
    }

    /// Run `f` against the used byte range. Transient by construction —
    /// this never hands out a reference tied to the `RefCell` borrow, so
    /// callers that need to retain bytes past the call should copy or go
    /// through [`Segment::shared_buffer`] instead.
    pub(super) fn with_slice<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        match &*self.storage.borrow() {
            Storage::Owned(buf) => f(&buf[..]),
            Storage::Frozen(buf) => f(buf.as_slice()),
        }
    }

    /// A zero-copy, shared [`Buffer`] over this segment's used bytes,
    /// freezing it in place if it was still owned. Idempotent.
    pub(super) fn shared_buffer(&self) -> Buffer {
        let needs_freeze = matches!(&*self.storage.borrow(), Storage::Owned(_));
        if needs_freeze {
            let mut storage = self.storage.borrow_mut();
            let taken = core::mem::replace(&mut *storage, Storage::Frozen(Buffer::default()));
            if let Storage::Owned(buf) = taken {
                *storage = Storage::Frozen(Buffer::from(buf.freeze()));
            }
        }
        match &*self.storage.borrow() {
            Storage::Frozen(buf) => buf.clone(),
            Storage::Owned(_) => unreachable!("just froze this segment"),
        }
    }

    pub(super) fn clone_frozen(&self) -> Segment {
        Segment::from_buffer(self.shared_buffer(), self.offset)
    }
}
