//! Frame encoding and the resumable frame decoder.
//!
//! The transport hands us a byte stream with no message boundaries: one
//! read may contain half a header, another may contain three frames and the
//! start of a fourth. [`FrameDecoder`] keeps just enough state between reads
//! to turn that stream back into discrete [`Message`]s.
//!
//! ```text
//!            2 bytes buffered                 `length` bytes buffered
//!   Header ──────────────────────→ Payload ───────────────────────────→ emit
//!     ↑                                                                  │
//!     └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The decoder never blocks and never fails. Running out of input simply
//! ends the current iteration; the caller feeds more bytes when the next
//! read completes.

use std::iter::FusedIterator;

use crate::{FrameHeader, Message, Opcode, ProtocolError};

/// Largest payload a frame can carry (the length field is one byte).
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize;

/// Encodes one frame: `header || payload`.
///
/// # Errors
/// - [`ProtocolError::PayloadTooLarge`] if `payload` is longer than
///   [`MAX_PAYLOAD_LEN`].
/// - [`ProtocolError::UnsendableOpcode`] for [`Opcode::Unknown`].
///
/// Either way no bytes are produced.
pub fn encode(opcode: Opcode, payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    if !opcode.is_known() {
        return Err(ProtocolError::UnsendableOpcode(opcode.as_u8()));
    }
    let length = u8::try_from(payload.len()).map_err(|_| {
        ProtocolError::PayloadTooLarge { len: payload.len() }
    })?;

    let header = FrameHeader {
        opcode: opcode.as_u8(),
        length,
    };
    let mut frame = Vec::with_capacity(FrameHeader::ENCODED_LEN + payload.len());
    frame.extend_from_slice(&header.to_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}

// ---------------------------------------------------------------------------
// FrameDecoder
// ---------------------------------------------------------------------------

/// Which part of a frame the decoder is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DecodeState {
    #[default]
    Header,
    Payload { opcode: Opcode, length: usize },
}

/// Result of trying to advance the state machine with what's buffered.
enum Step {
    NeedMore,
    Continue,
    Frame(Message),
}

/// A resumable parser from a byte stream to [`Message`]s.
///
/// Feed it every chunk the transport delivers, in order, with
/// [`decode`](Self::decode). A header or payload split across chunks is
/// held internally until the rest arrives.
///
/// ## Example
///
/// ```rust
/// use ten_protocol::{encode, FrameDecoder, Opcode};
///
/// let bytes = encode(Opcode::MovePlayer, &[0, 3]).unwrap();
/// let mut decoder = FrameDecoder::new();
///
/// // First read: only the header arrived.
/// assert!(decoder.decode_all(&bytes[..2]).is_empty());
///
/// // Second read: the payload.
/// let messages = decoder.decode_all(&bytes[2..]);
/// assert_eq!(messages.len(), 1);
/// assert_eq!(messages[0].opcode, Opcode::MovePlayer);
/// assert_eq!(messages[0].payload, vec![0, 3]);
/// ```
#[derive(Debug, Default)]
pub struct FrameDecoder {
    state: DecodeState,
    /// Bytes of the current header or payload collected so far.
    partial: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a lazy iterator over the frames completed by `input`.
    ///
    /// Bytes are only taken from `input` as the iterator advances. If the
    /// iterator is dropped early, [`Frames::consumed`] tells the caller
    /// where to resume; feeding `&input[consumed..]` to the next call
    /// continues exactly where decoding stopped.
    pub fn decode<'d, 'i>(&'d mut self, input: &'i [u8]) -> Frames<'d, 'i> {
        Frames {
            decoder: self,
            input,
            consumed: 0,
        }
    }

    /// Decodes every frame completed by `input`.
    pub fn decode_all(&mut self, input: &[u8]) -> Vec<Message> {
        self.decode(input).collect()
    }

    /// Number of bytes of an incomplete frame held across calls.
    pub fn buffered(&self) -> usize {
        match self.state {
            DecodeState::Header => self.partial.len(),
            DecodeState::Payload { .. } => {
                FrameHeader::ENCODED_LEN + self.partial.len()
            }
        }
    }

    /// Returns `true` when the decoder sits on a frame boundary.
    pub fn is_idle(&self) -> bool {
        self.state == DecodeState::Header && self.partial.is_empty()
    }

    /// How many more bytes the current phase needs.
    fn wanted(&self) -> usize {
        let target = match self.state {
            DecodeState::Header => FrameHeader::ENCODED_LEN,
            DecodeState::Payload { length, .. } => length,
        };
        target - self.partial.len()
    }

    fn step(&mut self) -> Step {
        match self.state {
            DecodeState::Header => {
                if self.partial.len() < FrameHeader::ENCODED_LEN {
                    return Step::NeedMore;
                }
                let header =
                    FrameHeader::from_bytes([self.partial[0], self.partial[1]]);
                self.partial.clear();
                self.partial.reserve(usize::from(header.length));
                self.state = DecodeState::Payload {
                    opcode: Opcode::from_u8(header.opcode),
                    length: usize::from(header.length),
                };
                Step::Continue
            }
            DecodeState::Payload { opcode, length } => {
                if self.partial.len() < length {
                    return Step::NeedMore;
                }
                let payload = std::mem::take(&mut self.partial);
                self.state = DecodeState::Header;
                Step::Frame(Message { opcode, payload })
            }
        }
    }
}

/// Iterator returned by [`FrameDecoder::decode`].
pub struct Frames<'d, 'i> {
    decoder: &'d mut FrameDecoder,
    input: &'i [u8],
    consumed: usize,
}

impl Frames<'_, '_> {
    /// Bytes of the input taken by the decoder so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Bytes of the input not yet looked at.
    pub fn remaining(&self) -> usize {
        self.input.len() - self.consumed
    }
}

impl Iterator for Frames<'_, '_> {
    type Item = Message;

    fn next(&mut self) -> Option<Message> {
        loop {
            let rest = &self.input[self.consumed..];
            let take = self.decoder.wanted().min(rest.len());
            self.decoder.partial.extend_from_slice(&rest[..take]);
            self.consumed += take;

            match self.decoder.step() {
                Step::Frame(message) => return Some(message),
                Step::Continue => continue,
                // Only reachable once `rest` is exhausted.
                Step::NeedMore => return None,
            }
        }
    }
}

impl FusedIterator for Frames<'_, '_> {}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    /// Builds a few frames of varied shape, including an empty payload and
    /// an unknown opcode.
    fn sample_frames() -> Vec<Message> {
        vec![
            Message::new(Opcode::GameData, vec![2, 3, 10]),
            Message::new(Opcode::AddPlayer, b"\x01Alice".to_vec()),
            Message::new(Opcode::RestartGame, Vec::new()),
            Message::new(Opcode::MovePlayer, vec![1, 3]),
            Message::new(Opcode::UserName, vec![b'x'; 255]),
            Message::new(Opcode::ServerWelcome, vec![0]),
        ]
    }

    fn encode_all(frames: &[Message]) -> Vec<u8> {
        frames
            .iter()
            .flat_map(|m| encode(m.opcode, &m.payload).unwrap())
            .collect()
    }

    // =====================================================================
    // encode()
    // =====================================================================

    #[test]
    fn test_encode_writes_header_then_payload() {
        let bytes = encode(Opcode::MovePlayer, &[0, 3]).unwrap();
        assert_eq!(bytes, vec![6, 2, 0, 3]);
    }

    #[test]
    fn test_encode_empty_payload_is_header_only() {
        let bytes = encode(Opcode::EndGame, &[]).unwrap();
        assert_eq!(bytes, vec![3, 0]);
    }

    #[test]
    fn test_encode_max_payload_succeeds() {
        let bytes = encode(Opcode::UserName, &[7; 255]).unwrap();
        assert_eq!(bytes.len(), 257);
        assert_eq!(bytes[1], 255);
    }

    #[test]
    fn test_encode_oversized_payload_returns_payload_too_large() {
        let result = encode(Opcode::UserName, &[0; 256]);
        assert_eq!(result, Err(ProtocolError::PayloadTooLarge { len: 256 }));
    }

    #[test]
    fn test_encode_unknown_opcode_is_refused() {
        let result = encode(Opcode::Unknown(255), &[]);
        assert_eq!(result, Err(ProtocolError::UnsendableOpcode(255)));
    }

    // =====================================================================
    // FrameDecoder: single frames
    // =====================================================================

    #[test]
    fn test_decode_every_opcode_and_payload_length_yields_same_message() {
        let mut decoder = FrameDecoder::new();
        for opcode in Opcode::KNOWN {
            for len in 0..=MAX_PAYLOAD_LEN {
                let payload: Vec<u8> = (0..len).map(|i| i as u8).collect();
                let bytes = encode(opcode, &payload).unwrap();

                let decoded = decoder.decode_all(&bytes);

                assert_eq!(decoded, vec![Message { opcode, payload }]);
                assert!(decoder.is_idle());
            }
        }
    }

    #[test]
    fn test_decode_unknown_opcode_delivers_payload() {
        let mut decoder = FrameDecoder::new();

        let decoded = decoder.decode_all(&[200, 3, 9, 8, 7]);

        assert_eq!(
            decoded,
            vec![Message::new(Opcode::Unknown(200), vec![9, 8, 7])]
        );
    }

    #[test]
    fn test_decode_partial_header_waits_for_more() {
        let mut decoder = FrameDecoder::new();

        assert!(decoder.decode_all(&[5]).is_empty());
        assert_eq!(decoder.buffered(), 1);
        assert!(!decoder.is_idle());

        let decoded = decoder.decode_all(&[1, 42]);
        assert_eq!(decoded, vec![Message::new(Opcode::AddPlayer, vec![42])]);
    }

    #[test]
    fn test_decode_empty_input_is_a_no_op() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.decode_all(&[]).is_empty());
        assert!(decoder.is_idle());

        // Also with a frame half-received.
        decoder.decode_all(&[4, 3, 2]);
        assert!(decoder.decode_all(&[]).is_empty());
        assert_eq!(decoder.buffered(), 3);
    }

    #[test]
    fn test_decode_zero_length_frame_emits_immediately() {
        let mut decoder = FrameDecoder::new();
        let decoded = decoder.decode_all(&[2, 0]);
        assert_eq!(decoded, vec![Message::new(Opcode::RestartGame, vec![])]);
        assert!(decoder.is_idle());
    }

    // =====================================================================
    // FrameDecoder: streams of frames
    // =====================================================================

    #[test]
    fn test_decode_many_frames_in_one_chunk() {
        let frames = sample_frames();
        let bytes = encode_all(&frames);

        let decoded = FrameDecoder::new().decode_all(&bytes);

        assert_eq!(decoded, frames);
    }

    #[test]
    fn test_decode_one_byte_at_a_time_matches_single_chunk() {
        let frames = sample_frames();
        let bytes = encode_all(&frames);
        let mut decoder = FrameDecoder::new();

        let decoded: Vec<Message> = bytes
            .iter()
            .flat_map(|b| decoder.decode_all(std::slice::from_ref(b)))
            .collect();

        assert_eq!(decoded, frames);
        assert!(decoder.is_idle());
    }

    #[test]
    fn test_decode_random_partitions_match_single_chunk() {
        let frames = sample_frames();
        let bytes = encode_all(&frames);
        // Seeded so a failure is reproducible.
        let mut rng = StdRng::seed_from_u64(0x7E4);

        for _ in 0..200 {
            let mut decoder = FrameDecoder::new();
            let mut decoded = Vec::new();
            let mut at = 0;
            while at < bytes.len() {
                let len = rng.random_range(1..=(bytes.len() - at).min(40));
                decoded.extend(decoder.decode(&bytes[at..at + len]));
                at += len;
            }
            assert_eq!(decoded, frames);
        }
    }

    #[test]
    fn test_frames_dropped_early_can_resume_from_consumed() {
        let frames = sample_frames();
        let bytes = encode_all(&frames);
        let mut decoder = FrameDecoder::new();

        // Take just the first frame, then stop.
        let (first, consumed) = {
            let mut iter = decoder.decode(&bytes);
            let first = iter.next();
            (first, iter.consumed())
        };
        assert_eq!(first.as_ref(), Some(&frames[0]));
        assert_eq!(consumed, 5);

        let rest = decoder.decode_all(&bytes[consumed..]);
        assert_eq!(rest, frames[1..].to_vec());
    }

    #[test]
    fn test_frames_consumed_counts_partial_trailing_frame() {
        let mut decoder = FrameDecoder::new();
        // One full frame plus the header of the next.
        let input = [8, 1, 0, 6, 2];

        let mut iter = decoder.decode(&input);
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert_eq!(iter.consumed(), input.len());
        assert_eq!(iter.remaining(), 0);
        drop(iter);

        assert_eq!(decoder.buffered(), 2);
    }
}
