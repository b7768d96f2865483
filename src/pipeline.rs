//! Composes the bit stream, Huffman, Hamming, and DNA mapper stages into the
//! full encode/decode pipeline, and dispatches on whether the payload is
//! text or opaque binary.
//!
//! Encode: `bytes -> (optional Huffman) -> bit stream -> Hamming(7,4)+shortened -> DNA`
//! Decode: `DNA -> bit stream -> Hamming correct+strip -> (optional Huffman) -> bytes`

use crate::bits::{bits_to_bytes, bits_to_utf8, byte_bits, slice, utf8_bits};
use crate::hamming::CorrectionReport;
use crate::huffman::{self, header};
use crate::{dna, hamming, Error};
use bit_vec::BitVec;

/// Whether a payload is interpreted as UTF-8 text or opaque binary bytes.
/// Binary mode expands each byte into three decimal-digit Huffman symbols
/// when Huffman compression is enabled (`§4.6` of the format).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Text,
    Binary,
}

impl PayloadKind {
    /// Map one of the CLI's `-t/--type` values to a payload kind.
    pub fn from_type_str(s: &str) -> Result<Self, Error> {
        match s {
            "txt" => Ok(PayloadKind::Text),
            "jpg" | "jpeg" | "png" | "gz" | "txt.gz" => Ok(PayloadKind::Binary),
            other => Err(Error::UnsupportedType(other.to_string())),
        }
    }
}

/// Outcome of an [`encode`] run.
pub struct EncodeOutcome {
    pub dna: String,
    /// bit-length of the Huffman-encoded payload, if Huffman was used
    pub huffman_payload_bits: Option<u64>,
    /// bit-length of the dictionary, if Huffman was used
    pub dictionary_bits: Option<u64>,
    /// total bit-length of the raw (pre-Hamming) stream
    pub raw_bits: u64,
}

/// Outcome of a [`decode`] run.
pub struct DecodeOutcome {
    pub bytes: Vec<u8>,
    pub report: CorrectionReport,
    pub parity_bits_removed: usize,
    /// number of DNA bases in the input sequence
    pub sequence_len: usize,
    /// bit-length of the stream once parity bits are stripped (before any
    /// Huffman/UTF-8 decoding)
    pub stripped_bits_len: usize,
}

fn binary_symbols(bytes: &[u8]) -> Vec<char> {
    let mut out = Vec::with_capacity(bytes.len() * 3);
    for &b in bytes {
        out.extend(format!("{:03}", b).chars());
    }
    out
}

/// Encode a byte payload into its DNA representation.
pub fn encode(input: &[u8], kind: PayloadKind, huffman_on: bool) -> Result<EncodeOutcome, Error> {
    let (raw, huffman_payload_bits, dictionary_bits) = if huffman_on {
        let symbols: Vec<char> = match kind {
            PayloadKind::Text => std::str::from_utf8(input)
                .map_err(|_| Error::InvalidUtf8Input)?
                .chars()
                .collect(),
            PayloadKind::Binary => binary_symbols(input),
        };
        let table = if symbols.is_empty() {
            std::collections::HashMap::new()
        } else {
            let tree = huffman::build_tree(&symbols);
            huffman::assign_codes(&tree)
        };
        let payload = huffman::encode(&symbols, &table);
        let dict = header::dict_bits(&table);
        let head = header::encode(dict.len() as u64);

        log::debug!(
            "huffman table has {} symbols, dictionary is {} bits, payload is {} bits",
            table.len(),
            dict.len(),
            payload.len()
        );

        let mut raw = head;
        raw.append(&mut dict.clone());
        raw.append(&mut payload.clone());
        (raw, Some(payload.len() as u64), Some(dict.len() as u64))
    } else {
        let raw = match kind {
            PayloadKind::Text => {
                utf8_bits(std::str::from_utf8(input).map_err(|_| Error::InvalidUtf8Input)?)
            }
            PayloadKind::Binary => byte_bits(input),
        };
        (raw, None, None)
    };

    let raw_bits = raw.len() as u64;
    let hammed = hamming::encode(&raw);
    let dna = dna::encode(&hammed);
    log::info!("encoded {} bytes into {} DNA bases", input.len(), dna.len());
    Ok(EncodeOutcome { dna, huffman_payload_bits, dictionary_bits, raw_bits })
}

fn regroup_binary_symbols(symbols: &[char]) -> Vec<u8> {
    let mut out = Vec::with_capacity(symbols.len() / 3);
    let mut i = 0;
    while i + 3 <= symbols.len() {
        let chunk: String = symbols[i..i + 3].iter().collect();
        match chunk.parse::<u16>() {
            Ok(v) if v <= 255 => out.push(v as u8),
            _ => log::warn!("discarding malformed binary-huffman symbol group {:?}", chunk),
        }
        i += 3;
    }
    if i < symbols.len() {
        log::warn!("discarding {} trailing symbols that don't form a full byte", symbols.len() - i);
    }
    out
}

/// Decode a DNA sequence back into the original byte payload.
pub fn decode(dna: &str, kind: PayloadKind, huffman_on: bool) -> Result<DecodeOutcome, Error> {
    let sequence_len = dna.chars().count();
    let mapped = dna::decode(dna)?;
    let (corrected, report) = hamming::decode(&mapped);
    if report.errors_corrected > 0 {
        log::debug!("corrected {} single-bit errors", report.errors_corrected);
    }
    let (raw, parity_bits_removed) = hamming::strip_parity(&corrected);
    let stripped_bits_len = raw.len();

    let bytes = if huffman_on {
        let (head, d_start) = header::decode(&raw)?;
        let d_end = d_start + head.l as usize;
        if d_end > raw.len() {
            return Err(Error::MalformedHeader);
        }
        let dict_bits = slice(&raw, d_start, d_end);
        let dict_str = bits_to_utf8(&dict_bits);
        let table = header::parse_dict(&dict_str);
        let payload_bits = slice(&raw, d_end, raw.len());
        let symbols = huffman::decode(&payload_bits, &table);
        match kind {
            PayloadKind::Text => symbols.into_iter().collect::<String>().into_bytes(),
            PayloadKind::Binary => regroup_binary_symbols(&symbols),
        }
    } else {
        match kind {
            PayloadKind::Text => bits_to_utf8(&raw).into_bytes(),
            PayloadKind::Binary => bits_to_bytes(&raw),
        }
    };

    Ok(DecodeOutcome { bytes, report, parity_bits_removed, sequence_len, stripped_bits_len })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_example_a_no_huffman() {
        let outcome = encode(b"A", PayloadKind::Text, false).unwrap();
        assert_eq!(outcome.dna, "CACTCAGTCCAGAA");
        let decoded = decode(&outcome.dna, PayloadKind::Text, false).unwrap();
        assert_eq!(decoded.bytes, b"A");
        assert_eq!(decoded.report.errors_corrected, 0);
    }

    #[test]
    fn spec_example_ab_single_bit_flip_recovers() {
        let outcome = encode(b"AB", PayloadKind::Text, false).unwrap();
        let mut mutated: Vec<char> = outcome.dna.chars().collect();
        mutated[0] = match mutated[0] {
            'A' => 'C',
            'C' => 'A',
            'G' => 'T',
            'T' => 'G',
            _ => unreachable!(),
        };
        let mutated_dna: String = mutated.into_iter().collect();
        let decoded = decode(&mutated_dna, PayloadKind::Text, false).unwrap();
        assert_eq!(decoded.bytes, b"AB");
        assert_eq!(decoded.report.errors_corrected, 1);
    }

    #[test]
    fn round_trip_text_with_huffman() {
        let text = "the quick brown fox jumps over the lazy dog";
        let outcome = encode(text.as_bytes(), PayloadKind::Text, true).unwrap();
        let decoded = decode(&outcome.dna, PayloadKind::Text, true).unwrap();
        assert_eq!(decoded.bytes, text.as_bytes());
    }

    #[test]
    fn round_trip_binary_with_huffman() {
        let bytes: Vec<u8> = vec![0, 255, 128, 7, 42];
        let outcome = encode(&bytes, PayloadKind::Binary, true).unwrap();
        let decoded = decode(&outcome.dna, PayloadKind::Binary, true).unwrap();
        assert_eq!(decoded.bytes, bytes);
    }

    #[test]
    fn round_trip_binary_without_huffman() {
        let bytes: Vec<u8> = (0..=255).collect();
        let outcome = encode(&bytes, PayloadKind::Binary, false).unwrap();
        let decoded = decode(&outcome.dna, PayloadKind::Binary, false).unwrap();
        assert_eq!(decoded.bytes, bytes);
    }

    #[test]
    fn empty_input_round_trips_to_empty_output() {
        let outcome = encode(b"", PayloadKind::Binary, false).unwrap();
        assert_eq!(outcome.dna, "");
        let decoded = decode("", PayloadKind::Binary, false).unwrap();
        assert_eq!(decoded.bytes, Vec::<u8>::new());
    }

    #[test]
    fn empty_input_round_trips_with_huffman_header_only() {
        let outcome = encode(b"", PayloadKind::Text, true).unwrap();
        assert!(!outcome.dna.is_empty(), "huffman mode still emits a header even for empty input");
        let decoded = decode(&outcome.dna, PayloadKind::Text, true).unwrap();
        assert_eq!(decoded.bytes, Vec::<u8>::new());
    }

    #[test]
    fn binary_edge_bytes_round_trip_with_huffman() {
        let bytes = vec![0u8, 255u8];
        let outcome = encode(&bytes, PayloadKind::Binary, true).unwrap();
        let decoded = decode(&outcome.dna, PayloadKind::Binary, true).unwrap();
        assert_eq!(decoded.bytes, bytes);
    }
}
