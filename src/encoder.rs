//! [`Encoder`]: a thin façade over [`Wire`] that frames values as
//! complete TLV elements and reports how many bytes each append wrote.

use crate::block::Block;
use crate::error::Result;
use crate::varnumber;
use crate::wire::Wire;

/// Builds up a TLV encoding one element at a time.
///
/// `Encoder` owns a [`Wire`] and never exposes its segment chain
/// directly; callers write types, lengths, and values, then pull the
/// finished bytes out via [`Encoder::into_wire`] or
/// [`Wire::get_buffer`].
pub struct Encoder {
    wire: Wire,
}

impl Encoder {
    /// Start encoding with `first_reserve` bytes of initial capacity.
    pub fn new(first_reserve: usize) -> Encoder {
        Encoder {
            wire: Wire::with_capacity(first_reserve),
        }
    }

    /// Append a single raw byte. Returns the number of bytes written (1).
    pub fn append_byte(&mut self, value: u8) -> usize {
        self.wire.write_uint8(value);
        1
    }

    /// Append a raw byte array. Returns `bytes.len()`.
    pub fn append_byte_array(&mut self, bytes: &[u8]) -> usize {
        self.wire.append_array(bytes);
        bytes.len()
    }

    /// Append `value` as a VarNumber. Returns the number of bytes written.
    pub fn append_varnumber(&mut self, value: u64) -> usize {
        match varnumber::size_of_varnumber(value) {
            1 => {
                self.wire.write_uint8(value as u8);
                1
            }
            3 => {
                self.wire.write_uint8(253);
                self.wire.write_uint16(value as u16);
                3
            }
            5 => {
                self.wire.write_uint8(254);
                self.wire.write_uint32(value as u32);
                5
            }
            _ => {
                self.wire.write_uint8(255);
                self.wire.write_uint64(value);
                9
            }
        }
    }

    /// Append `value` as a NonNegativeInteger. Returns the number of
    /// bytes written.
    pub fn append_nonneg_integer(&mut self, value: u64) -> usize {
        match varnumber::size_of_nonneg_integer(value) {
            1 => {
                self.wire.write_uint8(value as u8);
                1
            }
            2 => {
                self.wire.write_uint16(value as u16);
                2
            }
            4 => {
                self.wire.write_uint32(value as u32);
                4
            }
            _ => {
                self.wire.write_uint64(value);
                8
            }
        }
    }

    /// Append a complete `Type | Length | Value` framing a raw byte
    /// array. Returns the total number of bytes written.
    pub fn append_byte_array_block(&mut self, r#type: u32, bytes: &[u8]) -> usize {
        let mut written = self.append_varnumber(r#type as u64);
        written += self.append_varnumber(bytes.len() as u64);
        written += self.append_byte_array(bytes);
        written
    }

    /// Append `block`'s wire image, zero-copy. Returns the number of
    /// bytes written. Fails with [`ErrorKind::NoWire`][crate::error::ErrorKind::NoWire]
    /// if `block` has no wire image.
    pub fn append_block(&mut self, block: &Block) -> Result<usize> {
        let before = self.wire.size();
        self.wire.append_block(block)?;
        Ok(self.wire.size() - before)
    }

    /// Finish encoding and hand back the underlying [`Wire`].
    pub fn into_wire(self) -> Wire {
        self.wire
    }

    /// Borrow the underlying [`Wire`] without consuming the encoder.
    pub fn wire(&self) -> &Wire {
        &self.wire
    }
}
