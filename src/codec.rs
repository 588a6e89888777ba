//! Frame checksum, command encoding and frame decoding.
//!
//! Every frame on the wire is nine bytes:
//!
//! ```text
//! +------+------+------+------+------+------+------+------+----------+
//! | 0xFF |  b1  |  b2  |  b3  |  b4  |  b5  |  b6  |  b7  | checksum |
//! +------+------+------+------+------+------+------+------+----------+
//! ```
//!
//! The checksum is the two's-complement negation of the sum of `b1..=b7`.
//! Push frames carry the concentration in `b4`/`b5`, query responses
//! (`FF 86 ...`) in `b2`/`b3`.

use crate::types::{FrameError, Measurement};

/// Length of every frame and command.
pub const FRAME_LEN: usize = 9;

/// First byte of every frame.
pub const START_BYTE: u8 = 0xFF;

/// Address byte of every command sent to the sensor.
pub const DEVICE_ADDRESS: u8 = 0x01;

/// Second byte of a response to a reading request.
pub const QUERY_RESPONSE_TAG: u8 = 0x86;

/// Commands understood by the ZE07.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Switch to initiative upload: the sensor pushes a frame every second.
    SetPushMode,
    /// Switch to question and answer: the sensor waits for `RequestReading`.
    SetQueryMode,
    /// Ask for one reading. Only answered in query mode.
    RequestReading,
}

impl Command {
    /// The six bytes following the start marker and address.
    pub fn opcode(&self) -> [u8; 6] {
        match self {
            Self::SetPushMode => [0x78, 0x40, 0x00, 0x00, 0x00, 0x00],
            Self::SetQueryMode => [0x78, 0x41, 0x00, 0x00, 0x00, 0x00],
            Self::RequestReading => [QUERY_RESPONSE_TAG, 0x00, 0x00, 0x00, 0x00, 0x00],
        }
    }

    /// Full nine-byte frame for this command.
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        build_command(self.opcode())
    }
}

/// Checksum over bytes 1..=7 of the eight bytes preceding the checksum slot.
pub fn checksum(bytes: &[u8; 8]) -> u8 {
    bytes[1..]
        .iter()
        .fold(0u8, |sum, &b| sum.wrapping_add(b))
        .wrapping_neg()
}

/// Build a command frame: `FF 01 <opcode> <checksum>`.
pub fn build_command(opcode: [u8; 6]) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[0] = START_BYTE;
    frame[1] = DEVICE_ADDRESS;
    frame[2..8].copy_from_slice(&opcode);
    frame[8] = checksum(&head(&frame));
    frame
}

/// Check that the last byte of `frame` matches the checksum of the rest.
pub fn verify_checksum(frame: &[u8; FRAME_LEN]) -> Result<(), FrameError> {
    let expected = checksum(&head(frame));
    if frame[8] == expected {
        Ok(())
    } else {
        Err(FrameError::ChecksumMismatch {
            expected,
            actual: frame[8],
        })
    }
}

/// Decode a frame pushed by the sensor in initiative upload mode.
///
/// The caller is expected to have aligned `frame` on the start marker.
pub fn decode_push_frame(frame: &[u8; FRAME_LEN]) -> Result<Measurement, FrameError> {
    verify_checksum(frame)?;
    Ok(Measurement::from_bytes(frame[4], frame[5]))
}

/// Decode the answer to a `RequestReading` command.
pub fn decode_query_response(frame: &[u8; FRAME_LEN]) -> Result<Measurement, FrameError> {
    if frame[0] != START_BYTE || frame[1] != QUERY_RESPONSE_TAG {
        return Err(FrameError::UnexpectedHeader {
            start: frame[0],
            kind: frame[1],
        });
    }
    verify_checksum(frame)?;
    Ok(Measurement::from_bytes(frame[2], frame[3]))
}

fn head(frame: &[u8; FRAME_LEN]) -> [u8; 8] {
    let mut head = [0u8; 8];
    head.copy_from_slice(&frame[..8]);
    head
}
