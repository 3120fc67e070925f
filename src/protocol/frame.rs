use bitflags::bitflags;
use zerocopy::byteorder::big_endian::U32 as U32BE;
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::error::{Error, Result, eyre};

/// Size of the fixed frame header.
pub const HEADER_LEN: usize = size_of::<FrameHeader>();

bitflags! {
    /// Flags byte of a frame header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameFlags: u8 {
        /// The body is compressed with the negotiated algorithm.
        const COMPRESSED = 0x01;
        /// The response carries a trace id after the header.
        const TRACING = 0x02;
    }
}

/// CQL frame header (zero-copy)
///
/// Layout matches the native protocol v1:
/// - version: 1 byte (direction bit 0x80 + protocol version)
/// - flags: 1 byte
/// - stream: 1 byte, signed
/// - opcode: 1 byte
/// - length: 4 bytes (big-endian, body length)
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
pub struct FrameHeader {
    pub version: u8,
    pub flags: u8,
    pub stream: i8,
    pub opcode: u8,
    pub length: U32BE,
}

impl FrameHeader {
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        if data.len() < HEADER_LEN {
            return Err(Error::ProtocolViolation(eyre!(
                "frame header needs {HEADER_LEN} bytes, got {}",
                data.len()
            )));
        }
        Self::ref_from_bytes(&data[..HEADER_LEN])
            .map_err(|_| Error::ProtocolViolation(eyre!("invalid frame header")))
    }

    pub fn body_len(&self) -> usize {
        self.length.get() as usize
    }
}
