//! A TLV (Type-Length-Value) encoding engine for Named Data Networking.
//!
//! Three layers build on each other:
//!
//! - [`varnumber`] — the `VarNumber` and `NonNegativeInteger` wire
//!   primitives, and the [`varnumber::TlvCursor`] trait both [`Block`]
//!   and [`wire::Wire`] read through.
//! - [`block`] — [`Block`], an immutable, lazily-parsed view over a
//!   single TLV element, sharing a reference-counted [`buffer::Buffer`].
//! - [`wire`] and [`encoder`] — [`wire::Wire`], a segmented growable
//!   buffer used while building up an encoding, and [`encoder::Encoder`],
//!   a thin façade over it.
//!
//! Enable the `std` feature (default) for [`Block::from_stream`] and the
//! reader-based VarNumber functions; disable default features for a
//! `no_std` + `alloc` build.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod block;
pub mod buffer;
pub mod encoder;
pub mod error;
pub mod varnumber;
pub mod wire;

pub use block::Block;
pub use buffer::Buffer;
pub use encoder::Encoder;
pub use error::{Error, ErrorKind, Result};
pub use wire::Wire;

/// Upper bound on a single NDN packet's `Length`, enforced by
/// [`Block::from_stream`].
pub const MAX_NDN_PACKET_SIZE: usize = 8800;
