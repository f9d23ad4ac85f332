//! Charset conversion and UCS-2 length probing for message bodies.
//!
//! CMPP bodies are ASCII, UCS-2 (big-endian) or GBK depending on
//! `Msg_Fmt`. [`recode`] converts between any two supported charsets,
//! bounded by an output capacity; [`ucs2_length`] measures a
//! NUL-terminated UCS-2 body.

use encoding_rs::{DecoderResult, EncoderResult, Encoding};
use tracing::{debug, trace};

use crate::error::CmppError;

/// Maximum short message body size in bytes.
pub const MAX_MSG_LENGTH: usize = 140;

// ── Charset ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    Ascii,
    Ucs2Be,
    Ucs2Le,
    Legacy(&'static Encoding),
}

impl Charset {
    fn resolve(label: &str) -> Option<Self> {
        let upper = label.trim().to_ascii_uppercase();
        match upper.as_str() {
            "ASCII" | "US-ASCII" => return Some(Charset::Ascii),
            "UCS-2" | "UCS2" | "UCS-2BE" | "UTF-16BE" => return Some(Charset::Ucs2Be),
            "UCS-2LE" | "UTF-16LE" => return Some(Charset::Ucs2Le),
            _ => {}
        }
        match Encoding::for_label(upper.as_bytes())? {
            e if e == encoding_rs::UTF_16BE => Some(Charset::Ucs2Be),
            e if e == encoding_rs::UTF_16LE => Some(Charset::Ucs2Le),
            e if e == encoding_rs::REPLACEMENT => None,
            e => Some(Charset::Legacy(e)),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Charset::Ascii => "ASCII",
            Charset::Ucs2Be => "UCS-2BE",
            Charset::Ucs2Le => "UCS-2LE",
            Charset::Legacy(e) => e.name(),
        }
    }

    /// Decode as much of `input` as is well-formed.
    fn decode(&self, input: &[u8]) -> (String, bool) {
        let enc = match self {
            Charset::Ascii => {
                let valid = input.iter().take_while(|b| b.is_ascii()).count();
                let text: String = input[..valid].iter().map(|&b| char::from(b)).collect();
                return (text, valid == input.len());
            }
            Charset::Ucs2Be => encoding_rs::UTF_16BE,
            Charset::Ucs2Le => encoding_rs::UTF_16LE,
            Charset::Legacy(e) => *e,
        };

        let mut decoder = enc.new_decoder_without_bom_handling();
        let capacity = decoder
            .max_utf8_buffer_length_without_replacement(input.len())
            .unwrap_or_else(|| input.len().saturating_mul(3));
        let mut text = String::with_capacity(capacity);
        let (result, _read) = decoder.decode_to_string_without_replacement(input, &mut text, true);
        (text, matches!(result, DecoderResult::InputEmpty))
    }

    /// Encode `text` into at most `capacity` bytes without splitting a
    /// character.
    fn encode(&self, text: &str, capacity: usize) -> (Vec<u8>, Outcome) {
        match self {
            Charset::Ascii => {
                let mut out = Vec::with_capacity(capacity.min(text.len()));
                for ch in text.chars() {
                    if !ch.is_ascii() {
                        return (out, Outcome::Stopped);
                    }
                    if out.len() == capacity {
                        return (out, Outcome::Truncated);
                    }
                    out.push(ch as u8);
                }
                (out, Outcome::Complete)
            }
            Charset::Ucs2Be | Charset::Ucs2Le => {
                let big_endian = *self == Charset::Ucs2Be;
                let mut out = Vec::with_capacity(capacity.min(text.len() * 2));
                let mut units = [0u16; 2];
                for ch in text.chars() {
                    let encoded = ch.encode_utf16(&mut units);
                    if out.len() + encoded.len() * 2 > capacity {
                        return (out, Outcome::Truncated);
                    }
                    for unit in encoded.iter() {
                        let bytes = if big_endian {
                            unit.to_be_bytes()
                        } else {
                            unit.to_le_bytes()
                        };
                        out.extend_from_slice(&bytes);
                    }
                }
                (out, Outcome::Complete)
            }
            Charset::Legacy(e) => {
                let mut encoder = e.new_encoder();
                let needed = encoder
                    .max_buffer_length_from_utf8_without_replacement(text.len())
                    .unwrap_or(capacity);
                let mut out = vec![0u8; capacity.min(needed)];
                let (result, _read, written) =
                    encoder.encode_from_utf8_without_replacement(text, &mut out, true);
                out.truncate(written);
                let outcome = match result {
                    EncoderResult::InputEmpty => Outcome::Complete,
                    EncoderResult::OutputFull => Outcome::Truncated,
                    EncoderResult::Unmappable(_) => Outcome::Stopped,
                };
                (out, outcome)
            }
        }
    }
}

// ── Conversion context ───────────────────────────────────────────

/// How a conversion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// All input was converted.
    Complete,
    /// The output capacity was reached.
    Truncated,
    /// Conversion stopped at malformed input or an unmappable character.
    Stopped,
}

/// Result of [`Converter::convert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recoded {
    pub bytes: Vec<u8>,
    pub outcome: Outcome,
}

/// An open conversion between two named charsets.
///
/// Released when dropped, on every path out of the scope that opened it.
#[derive(Debug)]
pub struct Converter {
    from: Charset,
    to: Charset,
}

impl Converter {
    /// Resolve both charset names.
    pub fn open(from: &str, to: &str) -> Result<Self, CmppError> {
        match (Charset::resolve(from), Charset::resolve(to)) {
            (Some(from), Some(to)) => {
                trace!(from = from.name(), to = to.name(), "conversion opened");
                Ok(Self { from, to })
            }
            _ => Err(CmppError::UnsupportedEncoding {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }

    /// Convert `input`, producing at most `capacity` bytes.
    pub fn convert(&mut self, input: &[u8], capacity: usize) -> Recoded {
        let (text, decoded_all) = self.from.decode(input);
        let (bytes, mut outcome) = self.to.encode(&text, capacity);
        if !decoded_all && outcome == Outcome::Complete {
            outcome = Outcome::Stopped;
        }
        if outcome != Outcome::Complete {
            debug!(
                from = self.from.name(),
                to = self.to.name(),
                ?outcome,
                written = bytes.len(),
                "conversion ended early"
            );
        }
        Recoded { bytes, outcome }
    }
}

impl Drop for Converter {
    fn drop(&mut self) {
        trace!(from = self.from.name(), to = self.to.name(), "conversion closed");
    }
}

/// Convert `input` from one named charset to another.
///
/// Output beyond `output_capacity` is silently dropped at a character
/// boundary. Malformed input or characters the target cannot represent
/// end the conversion early; what was converted up to that point is
/// returned.
pub fn recode(
    input: &[u8],
    from_encoding: &str,
    to_encoding: &str,
    output_capacity: usize,
) -> Result<Vec<u8>, CmppError> {
    let mut conv = Converter::open(from_encoding, to_encoding)?;
    Ok(conv.convert(input, output_capacity).bytes)
}

// ── UCS-2 ────────────────────────────────────────────────────────

/// Byte length of a NUL-terminated UCS-2 body.
///
/// Scans 2-byte units until a `0x0000` unit, the end of `input`, or
/// [`MAX_MSG_LENGTH`] bytes. A trailing odd byte is never counted.
pub fn ucs2_length(input: &[u8]) -> usize {
    let window = &input[..input.len().min(MAX_MSG_LENGTH)];
    window
        .chunks_exact(2)
        .take_while(|unit| unit.iter().any(|&b| b != 0))
        .count()
        * 2
}
