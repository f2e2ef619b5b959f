//! [`Block`]: an immutable, lazily-parsed view over a single TLV element.

use crate::buffer::Buffer;
use crate::error::{ErrorKind, Result};
use crate::varnumber::{self, SliceCursor, Writer};
use alloc::vec::Vec;
use core::cell::{Ref, RefCell};
use core::ops::Range;

/// Sentinel `type` value of a [`Block`] constructed by [`Block::empty`].
pub const NONE_TYPE: u32 = u32::MAX;

/// A view over a single NDN TLV element: `Type | Length | Value`.
///
/// A `Block` either shares an immutable [`Buffer`] (the common case — a
/// region parsed out of received bytes, or the frozen output of
/// [`Block::encode`]) or holds only a `type` and/or a value with no wire
/// image yet, pending encoding. Sub-elements of the value region are
/// parsed lazily and memoized on first access via [`Block::parse`]; the
/// memoization cell is the only interior-mutable state here; everything
/// else is fixed at construction and mutated only through the handful of
/// methods that take `&mut self`.
#[derive(Clone, Debug)]
pub struct Block {
    buffer: Option<Buffer>,
    begin: usize,
    end: usize,
    value_begin: usize,
    value_end: usize,
    r#type: u32,
    size: usize,
    sub_blocks: RefCell<Option<Vec<Block>>>,
}

impl Default for Block {
    fn default() -> Self {
        Block::empty()
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        match (self.wire(), other.wire()) {
            (Ok(a), Ok(b)) => self.size == other.size && a == b,
            _ => false,
        }
    }
}

impl Eq for Block {}

/// Read a `Type | Length` header out of `bytes`, returning the type and
/// the value region's bounds relative to the start of `bytes`.
///
/// `base_offset` is used only to annotate errors with an absolute byte
/// position. When `verify_length` is set, the declared length must equal
/// `bytes.len()` minus the header size exactly — the value region always
/// spans the rest of `bytes`, matching the source library's behavior of
/// treating the declared `L` as a checked annotation rather than a
/// truncation point.
fn read_header_within(bytes: &[u8], base_offset: usize, verify_length: bool) -> Result<(u32, usize, usize)> {
    let mut cursor = SliceCursor::new(bytes, base_offset);
    let r#type = varnumber::read_type(&mut cursor)?;
    let length = varnumber::read_varnumber(&mut cursor)?;
    let value_begin = cursor.consumed();
    let value_end = bytes.len();
    if verify_length && length != (value_end - value_begin) as u64 {
        return Err(ErrorKind::LengthMismatch.at(base_offset));
    }
    Ok((r#type, value_begin, value_end))
}

impl Block {
    /// An empty Block: `type == NONE_TYPE`, no buffer.
    pub fn empty() -> Block {
        Block {
            buffer: None,
            begin: 0,
            end: 0,
            value_begin: 0,
            value_end: 0,
            r#type: NONE_TYPE,
            size: 0,
            sub_blocks: RefCell::new(None),
        }
    }

    /// Construct a Block by parsing `Type | Length` from the whole of
    /// `buffer`. Fails with [`ErrorKind::LengthMismatch`] if the declared
    /// length doesn't match the buffer's remaining bytes.
    pub fn from_buffer(buffer: Buffer) -> Result<Block> {
        let len = buffer.len();
        let (r#type, value_begin, value_end) = read_header_within(buffer.as_slice(), 0, true)?;
        Ok(Block {
            buffer: Some(buffer),
            begin: 0,
            end: len,
            value_begin,
            value_end,
            r#type,
            size: len,
            sub_blocks: RefCell::new(None),
        })
    }

    /// Construct a Block over the explicit sub-range `range` of `buffer`,
    /// parsing `Type | Length` at `range.start`. `verify_length` controls
    /// whether the declared length is checked against `range`'s extent.
    pub fn from_buffer_range(buffer: Buffer, range: Range<usize>, verify_length: bool) -> Result<Block> {
        let Range { start: begin, end } = range;
        let (r#type, value_begin, value_end) =
            read_header_within(&buffer[begin..end], begin, verify_length)?;
        Ok(Block {
            buffer: Some(buffer),
            begin,
            end,
            value_begin: begin + value_begin,
            value_end: begin + value_end,
            r#type,
            size: end - begin,
            sub_blocks: RefCell::new(None),
        })
    }

    /// Construct a Block sharing `parent`'s underlying buffer over
    /// `range`. Fails with [`ErrorKind::OutOfRange`] if `range` isn't
    /// inside the parent's buffer.
    pub fn from_parent(parent: &Block, range: Range<usize>, verify_length: bool) -> Result<Block> {
        let buffer = parent
            .buffer
            .clone()
            .ok_or_else(|| ErrorKind::OutOfRange.at(range.start))?;
        if range.start > range.end || range.end > buffer.len() {
            return Err(ErrorKind::OutOfRange.at(range.start));
        }
        Block::from_buffer_range(buffer, range, verify_length)
    }

    /// Construct a Block from a raw byte slice of unknown origin,
    /// reading `Type | Length` and copying exactly the `header + L` bytes
    /// that belong to this element into a fresh [`Buffer`]. Fails with
    /// [`ErrorKind::Truncated`] if `bytes` doesn't hold the full element.
    pub fn from_bytes(bytes: &[u8]) -> Result<Block> {
        let mut cursor = SliceCursor::new(bytes, 0);
        let r#type = varnumber::read_type(&mut cursor)?;
        let length = varnumber::read_varnumber(&mut cursor)?;
        let header_len = cursor.consumed();
        if length > (bytes.len() - header_len) as u64 {
            return Err(ErrorKind::Truncated.at(header_len));
        }
        let total = header_len + length as usize;
        let buffer = Buffer::copy_from_slice(&bytes[..total]);
        Ok(Block {
            buffer: Some(buffer),
            begin: 0,
            end: total,
            value_begin: header_len,
            value_end: total,
            r#type,
            size: total,
            sub_blocks: RefCell::new(None),
        })
    }

    /// A Block carrying only a `type`, with no value or wire image yet.
    pub fn from_type(r#type: u32) -> Block {
        Block {
            buffer: None,
            begin: 0,
            end: 0,
            value_begin: 0,
            value_end: 0,
            r#type,
            size: 0,
            sub_blocks: RefCell::new(None),
        }
    }

    /// A Block carrying a `type` and an already-encoded value buffer, with
    /// no wire image (`T | L` framing) yet.
    pub fn from_type_value(r#type: u32, value: Buffer) -> Block {
        let value_size = value.len();
        let size = varnumber::size_of_varnumber(r#type as u64)
            + varnumber::size_of_varnumber(value_size as u64)
            + value_size;
        Block {
            begin: value.len(),
            end: value.len(),
            value_begin: 0,
            value_end: value.len(),
            buffer: Some(value),
            r#type,
            size,
            sub_blocks: RefCell::new(None),
        }
    }

    /// A Block carrying a `type` whose value is another Block's complete
    /// wire image. Fails with [`ErrorKind::NoWire`] if `value` has none.
    pub fn from_type_block(r#type: u32, value: &Block) -> Result<Block> {
        if !value.has_wire() {
            return Err(ErrorKind::NoWire.into());
        }
        let buffer = value.buffer.clone().expect("has_wire implies buffer");
        let value_size = value.end - value.begin;
        let size = varnumber::size_of_varnumber(r#type as u64)
            + varnumber::size_of_varnumber(value_size as u64)
            + value_size;
        Ok(Block {
            buffer: Some(buffer),
            begin: value.end,
            end: value.end,
            value_begin: value.begin,
            value_end: value.end,
            r#type,
            size,
            sub_blocks: RefCell::new(None),
        })
    }

    /// Read a complete Block from a blocking byte stream: `Type`, then
    /// `Length`, then exactly `Length` value bytes. Returns a Block
    /// carrying only `type` (no value) when `Length == 0`. Fails with
    /// [`ErrorKind::Oversize`] if `Length` exceeds
    /// [`MAX_NDN_PACKET_SIZE`][crate::MAX_NDN_PACKET_SIZE].
    #[cfg(feature = "std")]
    pub fn from_stream<R: std::io::Read>(input: &mut R) -> Result<Block> {
        let r#type = varnumber::read_type_from_reader(input)?;
        let length = varnumber::read_varnumber_from_reader(input)?;
        if length == 0 {
            return Ok(Block::from_type(r#type));
        }
        if length > crate::MAX_NDN_PACKET_SIZE as u64 {
            return Err(ErrorKind::Oversize.into());
        }
        let mut value = alloc::vec![0u8; length as usize];
        input
            .read_exact(&mut value)
            .map_err(|_| ErrorKind::Truncated.into())?;
        let mut block = Block::from_type_value(r#type, Buffer::from_vec(value));
        block.encode()?;
        Ok(block)
    }

    /// Non-throwing peek at the Block starting at `offset` within
    /// `buffer`. Returns `(false, Block::empty())` on truncated input
    /// instead of raising, so stream-oriented receivers can retry once
    /// more bytes arrive.
    pub fn try_from_buffer(buffer: &Buffer, offset: usize) -> (bool, Block) {
        if offset > buffer.len() {
            return (false, Block::empty());
        }
        let mut cursor = SliceCursor::new(&buffer[offset..], offset);
        let Some(r#type) = varnumber::try_read_type(&mut cursor) else {
            return (false, Block::empty());
        };
        let Some(length) = varnumber::try_read_varnumber(&mut cursor) else {
            return (false, Block::empty());
        };
        let value_begin = offset + cursor.consumed();
        if length > (buffer.len() - value_begin) as u64 {
            return (false, Block::empty());
        }
        let value_end = value_begin + length as usize;
        let block = Block {
            buffer: Some(buffer.clone()),
            begin: offset,
            end: value_end,
            value_begin,
            value_end,
            r#type,
            size: value_end - offset,
            sub_blocks: RefCell::new(None),
        };
        (true, block)
    }

    /// Drop the buffer and memoized sub-elements; reset to an empty Block.
    pub fn reset(&mut self) {
        self.buffer = None;
        self.begin = 0;
        self.end = 0;
        self.value_begin = 0;
        self.value_end = 0;
        self.r#type = NONE_TYPE;
        self.size = 0;
        self.sub_blocks = RefCell::new(None);
    }

    /// Drop the buffer only, retaining `type` and any memoized
    /// sub-elements, so a mutated Block's wire image is rebuilt on the
    /// next [`Block::encode`].
    pub fn reset_wire(&mut self) {
        self.buffer = None;
        self.begin = 0;
        self.end = 0;
        self.value_begin = 0;
        self.value_end = 0;
    }

    /// Lazily split `[value_begin, value_end)` into sub-elements,
    /// memoizing the result. Idempotent once it has succeeded on a
    /// non-empty value. A value-less Block (or one whose value is empty)
    /// memoizes an empty sub-element list immediately. On
    /// [`ErrorKind::LengthExceeds`], the memoization cell is left holding
    /// an empty list rather than a successful parse, so a later retry
    /// (e.g. once more bytes have arrived) re-attempts the walk instead of
    /// being treated as permanently parsed.
    pub fn parse(&self) -> Result<()> {
        {
            let existing = self.sub_blocks.borrow();
            if let Some(v) = existing.as_ref() {
                if !v.is_empty() || self.value_size() == 0 {
                    return Ok(());
                }
            }
        }
        if self.value_size() == 0 {
            *self.sub_blocks.borrow_mut() = Some(Vec::new());
            return Ok(());
        }

        let buffer = self.buffer.clone().expect("has_value implies buffer");
        let value = self.value();
        let mut built = Vec::new();
        let mut pos = 0usize;
        while pos < value.len() {
            let element_begin = pos;
            let mut cursor = SliceCursor::new(&value[pos..], self.value_begin + pos);
            let r#type = match varnumber::read_type(&mut cursor) {
                Ok(t) => t,
                Err(e) => {
                    *self.sub_blocks.borrow_mut() = Some(Vec::new());
                    return Err(e);
                }
            };
            let length = match varnumber::read_varnumber(&mut cursor) {
                Ok(l) => l,
                Err(e) => {
                    *self.sub_blocks.borrow_mut() = Some(Vec::new());
                    return Err(e);
                }
            };
            let header_len = cursor.consumed();
            let remaining = (value.len() - pos - header_len) as u64;
            if length > remaining {
                *self.sub_blocks.borrow_mut() = Some(Vec::new());
                return Err(ErrorKind::LengthExceeds.at(self.value_begin + pos));
            }
            let element_end = pos + header_len + length as usize;
            let abs_begin = self.value_begin + element_begin;
            let abs_value_begin = self.value_begin + pos + header_len;
            let abs_end = self.value_begin + element_end;
            built.push(Block {
                buffer: Some(buffer.clone()),
                begin: abs_begin,
                end: abs_end,
                value_begin: abs_value_begin,
                value_end: abs_end,
                r#type,
                size: abs_end - abs_begin,
                sub_blocks: RefCell::new(None),
            });
            pos = element_end;
        }
        *self.sub_blocks.borrow_mut() = Some(built);
        Ok(())
    }

    /// Render `Type | Length | Value` into a fresh buffer if this Block
    /// has no wire image yet. A no-op if it already does. When the value
    /// comes from sub-elements, each child contributes its own wire bytes
    /// if it has one, otherwise its raw `(type, value)`, recursively
    /// encoding grandchildren-only children first. Fails with
    /// [`ErrorKind::NoValue`] if any sub-block has neither a wire image,
    /// a value, nor sub-elements of its own to encode.
    pub fn encode(&mut self) -> Result<()> {
        if self.has_wire() {
            return Ok(());
        }
        let mut out: Vec<u8> = Vec::new();
        varnumber::write_varnumber(&mut out, self.r#type as u64)?;

        let value_len;
        if self.has_value() {
            value_len = self.value_size();
            varnumber::write_varnumber(&mut out, value_len as u64)?;
            out.write_bytes(self.value())?;
        } else {
            let children = self.sub_blocks.borrow().clone();
            match children {
                Some(v) if !v.is_empty() => {
                    let mut value_buf: Vec<u8> = Vec::new();
                    for child in &v {
                        if child.has_wire() {
                            value_buf.write_bytes(child.wire()?)?;
                        } else if child.has_value() {
                            varnumber::write_varnumber(&mut value_buf, child.r#type as u64)?;
                            varnumber::write_varnumber(&mut value_buf, child.value_size() as u64)?;
                            value_buf.write_bytes(child.value())?;
                        } else {
                            let has_grandchildren = child
                                .sub_blocks
                                .borrow()
                                .as_ref()
                                .map(|v| !v.is_empty())
                                .unwrap_or(false);
                            if !has_grandchildren {
                                return Err(ErrorKind::NoValue.into());
                            }
                            let mut owned = child.clone();
                            owned.encode()?;
                            value_buf.write_bytes(owned.wire()?)?;
                        }
                    }
                    value_len = value_buf.len();
                    varnumber::write_varnumber(&mut out, value_len as u64)?;
                    out.write_bytes(&value_buf)?;
                }
                _ => {
                    value_len = 0;
                    varnumber::write_varnumber(&mut out, 0)?;
                }
            }
        }

        let header_len = out.len() - value_len;
        let total = out.len();
        self.size = total;
        self.begin = 0;
        self.end = total;
        self.value_begin = header_len;
        self.value_end = total;
        self.buffer = Some(Buffer::from_vec(out));
        Ok(())
    }

    /// Interpret this Block's value as the wire image of one TLV. Fails
    /// with [`ErrorKind::NoValue`] if this Block has no value, or
    /// [`ErrorKind::LengthMismatch`] if the value isn't a single complete
    /// TLV.
    pub fn block_from_value(&self) -> Result<Block> {
        if self.value_size() == 0 {
            return Err(ErrorKind::NoValue.into());
        }
        let buffer = self.buffer.clone().expect("has_value implies buffer");
        let (r#type, value_begin, value_end) =
            read_header_within(self.value(), self.value_begin, true)?;
        Ok(Block {
            buffer: Some(buffer),
            begin: self.value_begin,
            end: self.value_end,
            value_begin: self.value_begin + value_begin,
            value_end: self.value_begin + value_end,
            r#type,
            size: self.value_end - self.value_begin,
            sub_blocks: RefCell::new(None),
        })
    }

    /// The first sub-element of the requested `type`. Fails with
    /// [`ErrorKind::NotFound`] if absent.
    pub fn get(&self, r#type: u32) -> Result<Ref<'_, Block>> {
        let elements = self.elements()?;
        Ref::filter_map(elements, |v| v.iter().find(|b| b.r#type == r#type))
            .map_err(|_| ErrorKind::NotFound.into())
    }

    /// The first sub-element of the requested `type`, or `None`.
    pub fn find(&self, r#type: u32) -> Result<Option<Ref<'_, Block>>> {
        let elements = self.elements()?;
        match Ref::filter_map(elements, |v| v.iter().find(|b| b.r#type == r#type)) {
            Ok(found) => Ok(Some(found)),
            Err(_) => Ok(None),
        }
    }

    /// Parse (if needed) and borrow the ordered sequence of sub-elements.
    pub fn elements(&self) -> Result<Ref<'_, Vec<Block>>> {
        self.parse()?;
        Ok(Ref::map(self.sub_blocks.borrow(), |opt| {
            opt.as_ref().expect("parse() populates sub_blocks")
        }))
    }

    /// Number of sub-elements (after lazily parsing).
    pub fn elements_size(&self) -> Result<usize> {
        Ok(self.elements()?.len())
    }

    /// Append `element` as a new last sub-element, demoting this Block
    /// from Wired back to Valued (see [`Block::reset_wire`]).
    pub fn push_back(&mut self, element: Block) -> Result<()> {
        self.parse()?;
        self.reset_wire();
        self.sub_blocks.get_mut().get_or_insert_with(Vec::new).push(element);
        Ok(())
    }

    /// Insert `element` at `index` among the sub-elements.
    pub fn insert(&mut self, index: usize, element: Block) -> Result<()> {
        self.parse()?;
        self.reset_wire();
        let v = self.sub_blocks.get_mut().get_or_insert_with(Vec::new);
        if index > v.len() {
            return Err(ErrorKind::OutOfRange.into());
        }
        v.insert(index, element);
        Ok(())
    }

    /// Remove and return the sub-element at `index`.
    pub fn erase(&mut self, index: usize) -> Result<Block> {
        self.parse()?;
        self.reset_wire();
        let v = self.sub_blocks.get_mut().get_or_insert_with(Vec::new);
        if index >= v.len() {
            return Err(ErrorKind::OutOfRange.into());
        }
        Ok(v.remove(index))
    }

    /// Remove all sub-elements in `range`.
    pub fn erase_range(&mut self, range: Range<usize>) -> Result<()> {
        self.parse()?;
        self.reset_wire();
        let v = self.sub_blocks.get_mut().get_or_insert_with(Vec::new);
        if range.start > range.end || range.end > v.len() {
            return Err(ErrorKind::OutOfRange.into());
        }
        v.drain(range);
        Ok(())
    }

    /// The TLV type, or [`NONE_TYPE`] if unset.
    pub fn r#type(&self) -> u32 {
        self.r#type
    }

    /// `true` iff `type == NONE_TYPE`.
    pub fn empty(&self) -> bool {
        self.r#type == NONE_TYPE
    }

    /// Whether this Block has a complete, non-degenerate `Type | Length | Value`
    /// wire image.
    pub fn has_wire(&self) -> bool {
        self.buffer.is_some() && self.begin != self.end
    }

    /// Whether this Block has a value region at all (wired or not).
    pub fn has_value(&self) -> bool {
        self.buffer.is_some()
    }

    /// The encoded wire bytes `[begin, end)`. Fails with
    /// [`ErrorKind::NoWire`] if this Block has no wire image.
    pub fn wire(&self) -> Result<&[u8]> {
        if !self.has_wire() {
            return Err(ErrorKind::NoWire.into());
        }
        Ok(&self.buffer.as_ref().expect("has_wire implies buffer")[self.begin..self.end])
    }

    /// The value bytes, or an empty slice if this Block has no value.
    pub fn value(&self) -> &[u8] {
        match &self.buffer {
            Some(buffer) if self.has_value() => &buffer[self.value_begin..self.value_end],
            _ => &[],
        }
    }

    /// Number of value bytes, or 0 if this Block has no value.
    pub fn value_size(&self) -> usize {
        if self.has_value() {
            self.value_end - self.value_begin
        } else {
            0
        }
    }

    /// The encoded element size: `end - begin` when wired, or the
    /// would-be encoded size when only a value is set. Fails with
    /// [`ErrorKind::NoWire`] if neither a wire image nor a value is set.
    pub fn size(&self) -> Result<usize> {
        if self.has_wire() || self.has_value() {
            Ok(self.size)
        } else {
            Err(ErrorKind::NoWire.into())
        }
    }

    /// A zero-copy [`Buffer`] over this Block's wire bytes `[begin, end)`,
    /// sharing the same allocation. Fails with [`ErrorKind::NoWire`] if
    /// this Block has no wire image. Used by
    /// [`Wire::from_block`][crate::wire::Wire::from_block] and
    /// [`Wire::append_block`][crate::wire::Wire::append_block] to adopt an
    /// already-encoded Block as a segment without copying its bytes.
    pub fn to_buffer(&self) -> Result<Buffer> {
        if !self.has_wire() {
            return Err(ErrorKind::NoWire.into());
        }
        let buffer = self.buffer.as_ref().expect("has_wire implies buffer");
        Ok(buffer.slice(self.begin..self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_byte_varnumber_scenario() {
        // S1: type=0x05, value=AA BB -> 05 02 AA BB
        let mut block = Block::from_type_value(0x05, Buffer::copy_from_slice(&[0xAA, 0xBB]));
        block.encode().unwrap();
        assert_eq!(block.wire().unwrap(), &[0x05, 0x02, 0xAA, 0xBB]);
        assert_eq!(block.size().unwrap(), 4);
        assert_eq!(block.value_size(), 2);
    }

    #[test]
    fn three_byte_length_scenario() {
        // S2: type=0x1E, 300 zero bytes -> L = FD 01 2C
        let value = alloc::vec![0u8; 300];
        let mut block = Block::from_type_value(0x1E, Buffer::from_vec(value));
        block.encode().unwrap();
        let wire = block.wire().unwrap();
        assert_eq!(&wire[..4], &[0x1E, 0xFD, 0x01, 0x2C]);
        assert_eq!(wire.len(), 303);
    }

    #[test]
    fn nested_scenario() {
        // S3: outer 0x06 { child 0x07 = 01 02, child 0x08 = 03 }
        let mut outer = Block::from_type(0x06);
        outer
            .push_back(Block::from_type_value(0x07, Buffer::copy_from_slice(&[0x01, 0x02])))
            .unwrap();
        outer
            .push_back(Block::from_type_value(0x08, Buffer::copy_from_slice(&[0x03])))
            .unwrap();
        outer.encode().unwrap();
        assert_eq!(
            outer.wire().unwrap(),
            &[0x06, 0x07, 0x07, 0x02, 0x01, 0x02, 0x08, 0x01, 0x03]
        );

        let reparsed = Block::from_buffer(Buffer::copy_from_slice(outer.wire().unwrap())).unwrap();
        assert_eq!(reparsed.elements_size().unwrap(), 2);
        assert_eq!(reparsed.get(0x07).unwrap().value(), &[0x01, 0x02]);
    }

    #[test]
    fn truncated_child_clears_sub_blocks() {
        // S6: outer claims 3 bytes of value, but the child inside claims
        // length 2 and then the buffer ends.
        let bytes = [0x06, 0x03, 0x07, 0x02, 0x01];
        let block = Block::from_buffer_range(Buffer::copy_from_slice(&bytes), 0..bytes.len(), false).unwrap();
        assert_eq!(block.parse().unwrap_err().kind(), crate::error::ErrorKind::LengthExceeds);
        assert_eq!(block.elements_size().unwrap_err().kind(), crate::error::ErrorKind::LengthExceeds);
    }

    #[test]
    fn empty_value_parses_to_no_elements() {
        let block = Block::from_type_value(0x01, Buffer::copy_from_slice(&[]));
        assert_eq!(block.elements_size().unwrap(), 0);
    }

    #[test]
    fn parse_is_zero_copy() {
        let bytes = [0x06, 0x04, 0x07, 0x02, 0xAA, 0xBB];
        let buffer = Buffer::copy_from_slice(&bytes);
        let block = Block::from_buffer(buffer.clone()).unwrap();
        let child = block.get(0x07).unwrap();
        // The child's value must point inside the very same allocation
        // `block` was built over, not a copy.
        let child_buf = Buffer::copy_from_slice(child.value());
        assert!(buffer.is_same_allocation(&child_buf) == false); // distinct copy has its own allocation
        let child_ptr = child.value().as_ptr() as usize;
        let parent_start = buffer.as_slice().as_ptr() as usize;
        let parent_end = parent_start + buffer.len();
        assert!(child_ptr >= parent_start && child_ptr < parent_end);
    }

    #[test]
    fn reset_wire_keeps_type_and_elements() {
        let mut outer = Block::from_type(0x06);
        outer
            .push_back(Block::from_type_value(0x07, Buffer::copy_from_slice(&[0x01])))
            .unwrap();
        outer.encode().unwrap();
        assert!(outer.has_wire());
        outer.reset_wire();
        assert!(!outer.has_wire());
        assert_eq!(outer.r#type(), 0x06);
        assert_eq!(outer.elements_size().unwrap(), 1);
    }

    #[test]
    fn encode_fails_no_value_on_childless_child() {
        let mut outer = Block::from_type(0x01);
        outer.push_back(Block::from_type(0x02)).unwrap();
        assert_eq!(outer.encode().unwrap_err().kind(), ErrorKind::NoValue);
    }

    #[test]
    fn block_from_value_requires_single_complete_tlv() {
        let inner = Block::from_type_value(0x09, Buffer::copy_from_slice(&[0x01, 0x02]));
        let mut wrapper = Block::from_type_block(0x10, &{
            let mut inner = inner;
            inner.encode().unwrap();
            inner
        })
        .unwrap();
        wrapper.encode().unwrap();
        let unwrapped = wrapper.block_from_value().unwrap();
        assert_eq!(unwrapped.r#type(), 0x09);
        assert_eq!(unwrapped.value(), &[0x01, 0x02]);
    }
}
