//! Byte layout of register accesses carried in DSI generic packets.
//!
//! Read request: 2-byte little-endian address, 4-byte little-endian reply.
//! Write: `[addr_lo, addr_hi, v0, v1, v2, v3]`, value bytes in ascending
//! significance.

use crate::error::ProtocolError;

/// Payload length of a read request: the register address.
pub const READ_REQUEST_LEN: usize = 2;
/// Payload length of a read response: one register value.
pub const READ_RESPONSE_LEN: usize = 4;
/// Payload length of a register write: address then value.
pub const WRITE_LEN: usize = 6;

/// Payload of a generic read request for `addr`.
pub fn encode_read(addr: u16) -> [u8; READ_REQUEST_LEN] {
    addr.to_le_bytes()
}

/// Decode a read response. Anything other than exactly four bytes is rejected.
pub fn decode_read(rx: &[u8]) -> Result<u32, ProtocolError> {
    let bytes: [u8; READ_RESPONSE_LEN] = rx.try_into().map_err(|_| ProtocolError::UnexpectedLength {
        expected: READ_RESPONSE_LEN,
        actual: rx.len(),
    })?;
    Ok(u32::from_le_bytes(bytes))
}

/// Payload of a generic long write setting `addr` to `value`.
pub fn encode_write(addr: u16, value: u32) -> [u8; WRITE_LEN] {
    let [a0, a1] = addr.to_le_bytes();
    let [v0, v1, v2, v3] = value.to_le_bytes();
    [a0, a1, v0, v1, v2, v3]
}

/// Inverse of [`encode_write`].
pub fn decode_write(payload: &[u8]) -> Result<(u16, u32), ProtocolError> {
    match *payload {
        [a0, a1, v0, v1, v2, v3] => Ok((
            u16::from_le_bytes([a0, a1]),
            u32::from_le_bytes([v0, v1, v2, v3]),
        )),
        _ => Err(ProtocolError::UnexpectedLength {
            expected: WRITE_LEN,
            actual: payload.len(),
        }),
    }
}

/// Inverse of [`encode_read`].
pub fn decode_read_request(payload: &[u8]) -> Result<u16, ProtocolError> {
    match *payload {
        [a0, a1] => Ok(u16::from_le_bytes([a0, a1])),
        _ => Err(ProtocolError::UnexpectedLength {
            expected: READ_REQUEST_LEN,
            actual: payload.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers;

    #[test]
    fn write_layout_is_exact() {
        assert_eq!(
            encode_write(registers::LV_PHY0, 0x0044_8006),
            [0xA0, 0x04, 0x06, 0x80, 0x44, 0x00]
        );
        assert_eq!(
            encode_write(0xBEEF, 0x1234_5678),
            [0xEF, 0xBE, 0x78, 0x56, 0x34, 0x12]
        );
    }

    #[test]
    fn read_request_is_little_endian() {
        assert_eq!(encode_read(registers::SYS_ID), [0x80, 0x05]);
        assert_eq!(decode_read_request(&[0x80, 0x05]), Ok(registers::SYS_ID));
    }

    #[test]
    fn read_response_is_little_endian() {
        assert_eq!(decode_read(&[0x00, 0x65, 0x00, 0x00]), Ok(0x6500));
    }

    #[test]
    fn read_response_wrong_length() {
        assert_eq!(
            decode_read(&[0x00, 0x65]),
            Err(ProtocolError::UnexpectedLength { expected: 4, actual: 2 })
        );
        assert_eq!(
            decode_read(&[0; 5]),
            Err(ProtocolError::UnexpectedLength { expected: 4, actual: 5 })
        );
    }

    #[test]
    fn write_round_trip_edges() {
        for &(addr, value) in &[
            (0u16, 0u32),
            (u16::MAX, u32::MAX),
            (0x0100, 0x8000_0001),
            (registers::SYS_RST, 0x4),
        ] {
            assert_eq!(decode_write(&encode_write(addr, value)), Ok((addr, value)));
        }
    }

    #[test]
    fn write_round_trip_sampled() {
        // xorshift walk over the address/value space
        let mut x: u64 = 0x9E37_79B9_7F4A_7C15;
        for _ in 0..10_000 {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            let addr = (x >> 48) as u16;
            let value = x as u32;
            assert_eq!(decode_write(&encode_write(addr, value)), Ok((addr, value)));
        }
    }

    #[test]
    fn decode_write_rejects_short_payload() {
        assert_eq!(
            decode_write(&[0x04, 0x05, 0x04]),
            Err(ProtocolError::UnexpectedLength { expected: 6, actual: 3 })
        );
    }
}
