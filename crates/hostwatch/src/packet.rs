//! ICMP Echo Request/Reply framing.
//!
//! Echo messages carry a fixed 8-byte header followed by an arbitrary
//! payload. All multi-byte fields are big-endian on the wire.

pub const ECHO_REQUEST: u8 = 8;
pub const ECHO_REPLY: u8 = 0;

pub const HEADER_LEN: usize = 8;
/// Filler payload length. The content is irrelevant; the length matters
/// for the checksum and for matching reply sizes against real tooling.
pub const PAYLOAD_LEN: usize = 41;

/// Internet checksum (RFC 1071) over big-endian 16-bit words.
///
/// An odd trailing byte is treated as the high byte of a zero-padded
/// word. A packet whose checksum field already holds the correct value
/// sums to zero.
pub fn checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    for word in data.chunks(2) {
        let mut val = u32::from(word[0]) << 8;
        if word.len() > 1 {
            val |= u32::from(word[1]);
        }
        sum = sum.wrapping_add(val);
    }
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

/// An Echo Request to be serialized and sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoRequest {
    pub ident: u16,
    pub seq: u16,
}

impl EchoRequest {
    /// Serializes header plus filler payload with the checksum filled in.
    ///
    /// The checksum field is zero while the sum is computed and is
    /// written back afterwards, so the finished packet sums to zero.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_LEN + PAYLOAD_LEN];
        buf[0] = ECHO_REQUEST;
        buf[1] = 0;
        buf[4..6].copy_from_slice(&self.ident.to_be_bytes());
        buf[6..8].copy_from_slice(&self.seq.to_be_bytes());
        buf[HEADER_LEN..].fill(b'A');
        let sum = checksum(&buf);
        buf[2..4].copy_from_slice(&sum.to_be_bytes());
        buf
    }
}

/// Header fields recovered from a received ICMP message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoReply {
    pub typ: u8,
    pub code: u8,
    pub checksum: u16,
    pub ident: u16,
    pub seq: u16,
}

impl EchoReply {
    /// Parses the fixed header. `None` if the message is shorter than
    /// the header, which callers treat as malformed.
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < HEADER_LEN {
            return None;
        }
        Some(Self {
            typ: data[0],
            code: data[1],
            checksum: u16::from_be_bytes([data[2], data[3]]),
            ident: u16::from_be_bytes([data[4], data[5]]),
            seq: u16::from_be_bytes([data[6], data[7]]),
        })
    }

    /// A reply answers a request only if it is an Echo Reply and carries
    /// the request's identifier. Replies for other identifiers belong to
    /// other processes pinging from this host and must be skipped.
    pub fn answers(&self, request: &EchoRequest) -> bool {
        self.typ == ECHO_REPLY && self.ident == request.ident
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_rfc1071_example() {
        let data = [0x00, 0x01, 0xf2, 0x03, 0xf4, 0xf5, 0xf6, 0xf7];
        assert_eq!(checksum(&data), 0x220d);
    }

    #[test]
    fn checksum_zeroed_header_with_filler_payload() {
        // Zeroed 8-byte header plus the 41-byte b'A' filler, matching
        // what standard ping tooling computes for this packet.
        let mut data = vec![0u8; HEADER_LEN];
        data.extend(std::iter::repeat_n(b'A', PAYLOAD_LEN));
        assert_eq!(checksum(&data), 0xa5e6);
    }

    #[test]
    fn checksum_odd_length_pads_low_byte() {
        // 0x0102 + 0x0300 = 0x0402
        assert_eq!(checksum(&[0x01, 0x02, 0x03]), !0x0402);
    }

    #[test]
    fn checksum_empty_input() {
        assert_eq!(checksum(&[]), 0xffff);
    }

    #[test]
    fn finished_packet_sums_to_zero() {
        let packet = EchoRequest {
            ident: 0xbeef,
            seq: 7,
        }
        .encode();
        assert_eq!(checksum(&packet), 0);
    }

    #[test]
    fn encode_parse_round_trip() {
        let request = EchoRequest {
            ident: 0x1234,
            seq: 42,
        };
        let packet = request.encode();
        assert_eq!(packet.len(), HEADER_LEN + PAYLOAD_LEN);

        let reply = EchoReply::parse(&packet).expect("header present");
        assert_eq!(reply.typ, ECHO_REQUEST);
        assert_eq!(reply.code, 0);
        assert_eq!(reply.ident, 0x1234);
        assert_eq!(reply.seq, 42);
        assert_eq!(
            reply.checksum,
            u16::from_be_bytes([packet[2], packet[3]])
        );
    }

    #[test]
    fn parse_rejects_short_message() {
        assert_eq!(EchoReply::parse(&[0u8; HEADER_LEN - 1]), None);
        assert_eq!(EchoReply::parse(&[]), None);
    }

    #[test]
    fn empty_payload_still_checksums() {
        let mut buf = [0u8; HEADER_LEN];
        buf[0] = ECHO_REQUEST;
        buf[4..6].copy_from_slice(&0x1234u16.to_be_bytes());
        buf[6..8].copy_from_slice(&1u16.to_be_bytes());
        // 0x0800 + 0x1234 + 0x0001 = 0x1a35
        assert_eq!(checksum(&buf), !0x1a35);
    }
}
