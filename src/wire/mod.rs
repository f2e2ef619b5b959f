//! [`Wire`]: a segmented, growable byte buffer used while building up a
//! TLV encoding, and the cursor used to parse one back into sub-elements.
//!
//! Unlike [`Block`](crate::block::Block), which always shares a single
//! immutable [`Buffer`](crate::buffer::Buffer), a `Wire` owns a chain of
//! segments it may still be appending to. Each segment starts out as an
//! exclusively-owned, growable `BytesMut` and is frozen into a shared
//! `Buffer` the moment any of its bytes are handed out — via
//! [`Wire::get_buffer`], [`Wire::set_iovec`], [`Wire::parse`], or
//! [`Wire::append_block`]. This mirrors the teacher crate's distinction
//! between owned, mutable scratch space and shared, immutable output: we
//! never need a segment to be both at once.

mod segment;

use crate::block::Block;
use crate::buffer::Buffer;
use crate::error::{ErrorKind, Result};
use crate::varnumber::{self, TlvCursor};
use alloc::vec::Vec;
use core::cell::RefCell;
use segment::Segment;

/// Default growth increment used by [`Wire::expand`] and [`Wire::reserve`].
const DEFAULT_EXPAND: usize = 2048;

/// Below this many remaining bytes, [`Wire::reserve`] prefers to abandon
/// the current segment's unused tail and grow a fresh one rather than
/// split a write across the boundary.
const RESERVE_HEADROOM: usize = 32;

/// A segmented, growable output buffer, and the parse tree built by
/// walking one back into sub-elements.
///
/// A `Wire` tracks three positions into its segment chain: `begin` (index
/// 0, implicit), `current` (the segment containing the write/read
/// cursor — moved by [`Wire::set_position`]), and the tail (always the
/// last element of the chain; there is no separate field for it, since
/// segments are only ever appended at the true end of the chain or
/// dropped from it by [`Wire::finalize`]).
pub struct Wire {
    segments: Vec<Segment>,
    current: usize,
    position: usize,
    r#type: Option<u32>,
    sub_wires: RefCell<Option<Vec<Wire>>>,
    iovec: RefCell<Option<Vec<Buffer>>>,
}

impl Default for Wire {
    fn default() -> Self {
        Wire::new()
    }
}

impl Wire {
    /// An empty Wire with no segments yet; the first write allocates one.
    pub fn new() -> Wire {
        Wire {
            segments: Vec::new(),
            current: 0,
            position: 0,
            r#type: None,
            sub_wires: RefCell::new(None),
            iovec: RefCell::new(None),
        }
    }

    /// A Wire with one growable segment of `capacity` bytes already
    /// allocated.
    pub fn with_capacity(capacity: usize) -> Wire {
        let mut wire = Wire::new();
        wire.segments.push(Segment::new_owned(capacity, 0));
        wire
    }

    /// Adopt an already-encoded Block as the Wire's sole initial segment,
    /// zero-copy, with the cursor positioned past it. Fails with
    /// [`ErrorKind::NoWire`] if `block` has no wire image.
    pub fn from_block(block: &Block) -> Result<Wire> {
        let buffer = block.to_buffer()?;
        let size = buffer.len();
        let mut wire = Wire::new();
        wire.segments.push(Segment::from_buffer(buffer, 0));
        wire.position = size;
        Ok(wire)
    }

    /// Total bytes written: the tail segment's offset plus its used size.
    pub fn size(&self) -> usize {
        self.segments
            .last()
            .map(|seg| seg.offset + seg.size())
            .unwrap_or(0)
    }

    /// Total allocated capacity across all segments.
    pub fn capacity(&self) -> usize {
        self.segments.iter().map(Segment::capacity).sum()
    }

    /// The write/read cursor's absolute byte position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of segments in the chain.
    pub fn count_blocks(&self) -> usize {
        self.segments.len()
    }

    /// Whether this Wire holds any bytes at all.
    pub fn has_wire(&self) -> bool {
        !self.segments.is_empty()
    }

    /// The TLV type this Wire was parsed out as, if it's a sub-element
    /// produced by [`Wire::parse`].
    pub fn r#type(&self) -> Option<u32> {
        self.r#type
    }

    fn find_segment_index(&self, pos: usize) -> usize {
        for (i, seg) in self.segments.iter().enumerate() {
            if pos < seg.offset + seg.size() || i == self.segments.len() - 1 {
                return i;
            }
        }
        0
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        let idx = self.find_segment_index(pos);
        let seg = self.segments.get(idx)?;
        let local = pos - seg.offset;
        seg.with_slice(|bytes| bytes.get(local).copied())
    }

    /// Read a single byte at absolute position `pos`. Fails with
    /// [`ErrorKind::OutOfRange`] if `pos` is past the end.
    pub fn read_uint8(&self, pos: usize) -> Result<u8> {
        self.byte_at(pos).ok_or_else(|| ErrorKind::OutOfRange.at(pos))
    }

    /// Locate the segment containing absolute position `pos`, linearly
    /// scanning the chain from the head since segments aren't indexable by
    /// position alone. Returns `(segment_index, local_offset)`. Fails with
    /// [`ErrorKind::NoWire`] if this Wire holds no segments.
    pub fn find_position(&self, pos: usize) -> Result<(usize, usize)> {
        if !self.has_wire() {
            return Err(ErrorKind::NoWire.into());
        }
        let idx = self.find_segment_index(pos);
        let local = pos - self.segments[idx].offset;
        Ok((idx, local))
    }

    /// Bytes left in the current segment's capacity, from the cursor.
    pub fn remaining_in_current_block(&self) -> usize {
        if self.segments.is_empty() {
            return 0;
        }
        let seg = &self.segments[self.current];
        (seg.offset + seg.capacity()).saturating_sub(self.position)
    }

    /// Move the write/read cursor to `pos`, which must not exceed
    /// [`Wire::size`]. Relocates `current` to whichever segment contains
    /// it, which may leave `current` behind the tail — later writes then
    /// walk forward through (and may overwrite the used bytes of)
    /// already-allocated segments before reaching fresh capacity, which
    /// is how a reserved length placeholder gets patched in before
    /// [`Wire::finalize`].
    pub fn set_position(&mut self, pos: usize) -> Result<()> {
        if pos > self.size() {
            return Err(ErrorKind::OutOfRange.at(pos));
        }
        self.current = if self.segments.is_empty() {
            0
        } else {
            self.find_segment_index(pos)
        };
        self.position = pos;
        Ok(())
    }

    /// Append a new, empty segment of `alloc` bytes after the tail,
    /// trimming the previous tail's spare capacity down to its used size
    /// first, and move the cursor into the new segment.
    pub fn expand(&mut self, alloc: usize) {
        if let Some(tail) = self.segments.last_mut() {
            tail.trim_capacity_to_size();
        }
        let offset = self.size();
        self.segments.push(Segment::new_owned(alloc, offset));
        self.current = self.segments.len() - 1;
    }

    /// If the cursor sits exactly at the end of the current segment's
    /// capacity, move to the next segment in the chain if one already
    /// exists, otherwise [`Wire::expand`] by the default increment.
    pub fn expand_if_needed(&mut self) {
        if self.segments.is_empty() {
            self.expand(DEFAULT_EXPAND);
            self.position = self.segments[self.current].offset;
            return;
        }
        let seg = &self.segments[self.current];
        if self.position != seg.offset + seg.capacity() {
            return;
        }
        if self.current + 1 < self.segments.len() {
            self.current += 1;
        } else {
            self.expand(DEFAULT_EXPAND);
            self.position = self.segments[self.current].offset;
        }
    }

    /// Ensure at least `len` contiguous bytes can be written from the
    /// current position without crossing a segment boundary. If the
    /// current (tail) segment is nearly exhausted — fewer than `len` and
    /// fewer than a small headroom remain, and there is no next segment
    /// to fall back on — abandons the rest of its capacity and grows a
    /// fresh segment instead of splitting the write.
    pub fn reserve(&mut self, len: usize) {
        if self.segments.is_empty() {
            self.expand(DEFAULT_EXPAND.max(len));
            self.position = self.segments[self.current].offset;
            return;
        }
        let remaining = self.remaining_in_current_block();
        let has_next = self.current + 1 < self.segments.len();
        if remaining < len && remaining < RESERVE_HEADROOM && !has_next {
            self.expand(DEFAULT_EXPAND.max(len));
            self.position = self.segments[self.current].offset;
        } else {
            self.expand_if_needed();
        }
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        self.segments[self.current].write_at(self.position, bytes);
        self.position += bytes.len();
    }

    /// Write a single byte, reserving room first.
    pub fn write_uint8(&mut self, value: u8) {
        self.reserve(1);
        self.put_bytes(&[value]);
    }

    /// Write a big-endian `u16`, reserving room first.
    pub fn write_uint16(&mut self, value: u16) {
        self.reserve(2);
        self.put_bytes(&value.to_be_bytes());
    }

    /// Write a big-endian `u32`, reserving room first.
    pub fn write_uint32(&mut self, value: u32) {
        self.reserve(4);
        self.put_bytes(&value.to_be_bytes());
    }

    /// Write a big-endian `u64`, reserving room first.
    pub fn write_uint64(&mut self, value: u64) {
        self.reserve(8);
        self.put_bytes(&value.to_be_bytes());
    }

    /// Copy `src` in, crossing segment boundaries (and growing new
    /// segments) as needed.
    pub fn append_array(&mut self, mut src: &[u8]) {
        while !src.is_empty() {
            self.expand_if_needed();
            let remaining = self.remaining_in_current_block().max(1);
            let take = remaining.min(src.len());
            self.put_bytes(&src[..take]);
            src = &src[take..];
        }
    }

    /// [`Wire::finalize`], then link `block`'s wire bytes in as a new
    /// tail segment, zero-copy, and advance the cursor past it. Fails
    /// with [`ErrorKind::NoWire`] if `block` has no wire image.
    pub fn append_block(&mut self, block: &Block) -> Result<()> {
        self.finalize();
        let buffer = block.to_buffer()?;
        let size = buffer.len();
        let offset = self.position;
        self.segments.push(Segment::from_buffer(buffer, offset));
        self.current = self.segments.len() - 1;
        self.position += size;
        Ok(())
    }

    /// Drop every segment after `current` and truncate `current` down to
    /// the cursor's position, discarding anything written past it.
    pub fn finalize(&mut self) {
        if self.segments.is_empty() {
            return;
        }
        self.segments.truncate(self.current + 1);
        let local = self.position - self.segments[self.current].offset;
        self.segments[self.current].truncate_to(local);
    }

    /// Gather this Wire's used bytes into one freshly allocated [`Buffer`].
    pub fn get_buffer(&self) -> Buffer {
        let mut out = Vec::with_capacity(self.size());
        for seg in &self.segments {
            seg.with_slice(|bytes| out.extend_from_slice(bytes));
        }
        Buffer::from_vec(out)
    }

    /// Freeze every segment and record a zero-copy gather list of them,
    /// for callers (e.g. a socket's vectored write) that want the
    /// segments without concatenating them first.
    pub fn set_iovec(&mut self) {
        let list = self.segments.iter().map(Segment::shared_buffer).collect();
        *self.iovec.borrow_mut() = Some(list);
    }

    /// Whether [`Wire::set_iovec`] has been called since the last mutation
    /// that would invalidate it.
    pub fn has_iovec(&self) -> bool {
        self.iovec.borrow().is_some()
    }

    /// Concatenate the gather list built by [`Wire::set_iovec`]. Fails
    /// with [`ErrorKind::EmptyIovec`] if `set_iovec` hasn't been called.
    pub fn get_buffer_from_iovec(&self) -> Result<Buffer> {
        let iovec = self.iovec.borrow();
        let list = iovec.as_ref().ok_or(ErrorKind::EmptyIovec)?;
        let mut out = Vec::new();
        for buf in list {
            out.extend_from_slice(buf.as_slice());
        }
        Ok(Buffer::from_vec(out))
    }

    /// A cheap handle sharing this Wire's bytes, freezing every
    /// still-owned segment in place as a side effect (on both the
    /// original and the returned handle — see `DESIGN.md` for why this is
    /// the chosen reading of "reference-counted copy" under exclusive
    /// ownership). The returned Wire's own parse memoization and iovec
    /// start out empty.
    pub fn copy(&self) -> Wire {
        Wire {
            segments: self.segments.iter().map(Segment::clone_frozen).collect(),
            current: self.current,
            position: self.position,
            r#type: self.r#type,
            sub_wires: RefCell::new(None),
            iovec: RefCell::new(None),
        }
    }

    /// Lazily split this Wire's bytes into TLV sub-elements, memoizing
    /// the result. Idempotent once it has run, successfully or not.
    pub fn parse(&self) -> Result<()> {
        if self.sub_wires.borrow().is_some() {
            return Ok(());
        }
        let total = self.size();
        let mut built = Vec::new();
        let mut pos = 0usize;
        while pos < total {
            let mut cursor = WireCursor {
                wire: self,
                pos,
                limit: total,
            };
            let r#type = match varnumber::read_type(&mut cursor) {
                Ok(t) => t,
                Err(e) => {
                    *self.sub_wires.borrow_mut() = Some(Vec::new());
                    return Err(e);
                }
            };
            let length = match varnumber::read_varnumber(&mut cursor) {
                Ok(l) => l,
                Err(e) => {
                    *self.sub_wires.borrow_mut() = Some(Vec::new());
                    return Err(e);
                }
            };
            let header_end = cursor.pos;
            let remaining = (total - header_end) as u64;
            if length > remaining {
                *self.sub_wires.borrow_mut() = Some(Vec::new());
                return Err(ErrorKind::LengthExceeds.at(header_end));
            }
            let element_end = header_end + length as usize;
            built.push(self.build_sub_wire(header_end, element_end, r#type));
            pos = element_end;
        }
        *self.sub_wires.borrow_mut() = Some(built);
        Ok(())
    }

    /// Build a zero-copy sub-Wire over `[begin, end)` of this Wire's
    /// bytes, sharing whichever segment(s) it spans rather than copying.
    fn build_sub_wire(&self, begin: usize, end: usize, r#type: u32) -> Wire {
        let mut sub = Wire::new();
        sub.r#type = Some(r#type);
        if begin == end {
            return sub;
        }
        let begin_idx = self.find_segment_index(begin);
        let last_idx = self.find_segment_index(end - 1);
        if begin_idx == last_idx {
            let seg = &self.segments[begin_idx];
            let local_start = begin - seg.offset;
            let local_end = end - seg.offset;
            let buffer = seg.shared_buffer().slice(local_start..local_end);
            sub.segments.push(Segment::from_buffer(buffer, 0));
        } else {
            let mut offset = 0usize;
            for idx in begin_idx..=last_idx {
                let seg = &self.segments[idx];
                let local_start = begin.max(seg.offset) - seg.offset;
                let local_end = end.min(seg.offset + seg.size()) - seg.offset;
                let buffer = seg.shared_buffer().slice(local_start..local_end);
                let len = buffer.len();
                sub.segments.push(Segment::from_buffer(buffer, offset));
                offset += len;
            }
        }
        sub.position = end - begin;
        sub
    }

    /// Parse (if needed) and borrow the ordered sub-elements.
    pub fn elements(&self) -> Result<core::cell::Ref<'_, Vec<Wire>>> {
        self.parse()?;
        Ok(core::cell::Ref::map(self.sub_wires.borrow(), |opt| {
            opt.as_ref().expect("parse() populates sub_wires")
        }))
    }

    /// Number of sub-elements (after lazily parsing).
    pub fn elements_size(&self) -> Result<usize> {
        Ok(self.elements()?.len())
    }

    /// The first sub-element of the requested `type`. Fails with
    /// [`ErrorKind::NotFound`] if absent.
    pub fn get(&self, r#type: u32) -> Result<core::cell::Ref<'_, Wire>> {
        let elements = self.elements()?;
        core::cell::Ref::filter_map(elements, |v| v.iter().find(|w| w.r#type == Some(r#type)))
            .map_err(|_| ErrorKind::NotFound.into())
    }

    /// The first sub-element of the requested `type`, or `None`.
    pub fn find(&self, r#type: u32) -> Result<Option<core::cell::Ref<'_, Wire>>> {
        match self.get(r#type) {
            Ok(w) => Ok(Some(w)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// A [`TlvCursor`] that reads across a [`Wire`]'s segment chain without
/// materializing a contiguous copy of bytes that straddle a boundary.
struct WireCursor<'w> {
    wire: &'w Wire,
    pos: usize,
    limit: usize,
}

impl<'w> TlvCursor for WireCursor<'w> {
    fn peek_byte(&self) -> Option<u8> {
        if self.pos >= self.limit {
            None
        } else {
            self.wire.byte_at(self.pos)
        }
    }

    fn next_byte(&mut self) -> Option<u8> {
        let b = self.peek_byte();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn distance_to_end(&self) -> usize {
        self.limit.saturating_sub(self.pos)
    }

    fn position(&self) -> usize {
        self.pos
    }
}
