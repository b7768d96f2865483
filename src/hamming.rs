//! Hamming(7,4)-family block code.
//!
//! Bits are consumed in groups of 4 and expanded into 7-bit codewords (4 data
//! + 3 parity). A trailing group smaller than 4 bits uses one of three
//! shortened codes instead, so every input length produces a well-formed
//! codeword:
//!
//! | data bits | codeword bits | parity formula |
//! |---|---|---|
//! | 4 | 7 | `p1=d0^d1^d3`, `p2=d0^d2^d3`, `p3=d1^d2^d3` |
//! | 3 | 6 | `p1=d0^d1`, `p2=d1^d2`, `p3=d0^d2` |
//! | 2 | 5 | `p1=!d0`, `p2=!d1`, `p3=d0^d1` |
//! | 1 | 3 | triplicate `d0 d0 d0` |
//!
//! Decoding recomputes the three parities for each codeword and uses the
//! resulting 3-bit match/mismatch syndrome to locate (and flip) a single bad
//! bit. More than one error per codeword is undetectable by this code and
//! will silently miscorrect - a known, accepted limitation (see the crate's
//! top level documentation).

use crate::bits::{push_bits, slice};
use bit_vec::BitVec;

/// One correction applied during [`decode`].
#[derive(Debug, Clone)]
pub struct Correction {
    /// index of this codeword within the stream (0-based)
    pub codeword_index: usize,
    /// data+parity bits after correction
    pub corrected_bits: BitVec,
    /// data+parity bits as received, before correction
    pub raw_bits: BitVec,
    /// `(start,end)` bit offsets of this codeword within the encoded stream
    pub span: (usize, usize),
}

/// Accumulated outcome of a [`decode`] pass.
#[derive(Debug, Clone, Default)]
pub struct CorrectionReport {
    pub errors_corrected: usize,
    pub corrections: Vec<Correction>,
}

fn encode_group(data: &BitVec, out: &mut BitVec) {
    let d = |i: usize| data.get(i).unwrap_or(false);
    match data.len() {
        4 => {
            out.append(&mut data.clone());
            out.push(d(0) ^ d(1) ^ d(3));
            out.push(d(0) ^ d(2) ^ d(3));
            out.push(d(1) ^ d(2) ^ d(3));
        }
        3 => {
            out.append(&mut data.clone());
            out.push(d(0) ^ d(1));
            out.push(d(1) ^ d(2));
            out.push(d(0) ^ d(2));
        }
        2 => {
            out.append(&mut data.clone());
            out.push(!d(0));
            out.push(!d(1));
            out.push(d(0) ^ d(1));
        }
        1 => {
            out.push(d(0));
            out.push(d(0));
            out.push(d(0));
        }
        _ => unreachable!("groups are at most 4 bits"),
    }
}

/// Encode a raw bit stream into its Hamming-protected form.
pub fn encode(bits: &BitVec) -> BitVec {
    let mut out = BitVec::with_capacity(bits.len() * 2);
    let mut i = 0;
    while i < bits.len() {
        let end = (i + 4).min(bits.len());
        let group = slice(bits, i, end);
        encode_group(&group, &mut out);
        i = end;
    }
    out
}

/// Location of a single flipped bit within a codeword, or `None` if the
/// 3-bit syndrome doesn't isolate one (a multi-bit error, or for the 6/5-bit
/// shortened codes, one of the syndrome values that the shortened code
/// cannot distinguish from a multi-bit error).
fn locate_error_7(p1_ok: bool, p2_ok: bool, p3_ok: bool) -> Option<usize> {
    match (p1_ok, p2_ok, p3_ok) {
        (true, true, true) => None,
        (false, false, true) => Some(0),
        (false, true, false) => Some(1),
        (true, false, false) => Some(2),
        (false, false, false) => Some(3),
        (false, true, true) => Some(4),
        (true, false, true) => Some(5),
        (true, true, false) => Some(6),
    }
}

fn locate_error_6(p1_ok: bool, p2_ok: bool, p3_ok: bool) -> Option<usize> {
    match (p1_ok, p2_ok, p3_ok) {
        (true, true, true) => None,
        (false, true, false) => Some(0),
        (false, false, true) => Some(1),
        (true, false, false) => Some(2),
        (false, true, true) => Some(3),
        (true, false, true) => Some(4),
        (true, true, false) => Some(5),
        // (false,false,false) collides: more than one syndrome pattern maps
        // here in the shortened 6-bit code, so the error can't be localized.
        (false, false, false) => None,
    }
}

fn locate_error_5(p1_ok: bool, p2_ok: bool, p3_ok: bool) -> Option<usize> {
    match (p1_ok, p2_ok, p3_ok) {
        (true, true, true) => None,
        (false, true, false) => Some(0),
        (true, false, false) => Some(1),
        (false, true, true) => Some(2),
        (true, false, true) => Some(3),
        (true, true, false) => Some(4),
        // (false,false,false) and (false,false,true) both collide in the
        // 5-bit shortened code; neither isolates a single bit.
        (false, false, false) => None,
        (false, false, true) => None,
    }
}

fn decode_codeword(raw: &BitVec) -> (BitVec, bool) {
    let g = |i: usize| raw.get(i).unwrap_or(false);
    let mut corrected = raw.clone();
    let flip_at = match raw.len() {
        7 => {
            let p1_ok = (g(0) ^ g(1) ^ g(3)) == g(4);
            let p2_ok = (g(0) ^ g(2) ^ g(3)) == g(5);
            let p3_ok = (g(1) ^ g(2) ^ g(3)) == g(6);
            locate_error_7(p1_ok, p2_ok, p3_ok)
        }
        6 => {
            let p1_ok = (g(0) ^ g(1)) == g(3);
            let p2_ok = (g(1) ^ g(2)) == g(4);
            let p3_ok = (g(0) ^ g(2)) == g(5);
            locate_error_6(p1_ok, p2_ok, p3_ok)
        }
        5 => {
            let p1_ok = (!g(0)) == g(2);
            let p2_ok = (!g(1)) == g(3);
            let p3_ok = (g(0) ^ g(1)) == g(4);
            locate_error_5(p1_ok, p2_ok, p3_ok)
        }
        3 => {
            // triplicate: majority vote
            let ones = g(0) as u8 + g(1) as u8 + g(2) as u8;
            let majority = ones >= 2;
            let mismatch = (0..3).filter(|&i| g(i) != majority).next();
            for i in 0..3 {
                corrected.set(i, majority);
            }
            return (corrected, mismatch.is_some());
        }
        0 => return (BitVec::new(), false),
        n => panic!("unexpected codeword length {}", n),
    };
    if let Some(pos) = flip_at {
        let cur = corrected.get(pos).unwrap();
        corrected.set(pos, !cur);
        (corrected, true)
    } else {
        (corrected, false)
    }
}

/// Decode a Hamming-protected bit stream, correcting single-bit errors per
/// codeword. Returns the corrected stream (data bits still interleaved with
/// parity bits - use [`strip_parity`] to remove them) plus a report of every
/// correction that was made.
pub fn decode(bits: &BitVec) -> (BitVec, CorrectionReport) {
    let mut out = BitVec::with_capacity(bits.len());
    let mut report = CorrectionReport::default();
    let mut i = 0;
    let mut index = 0;
    while i < bits.len() {
        let end = (i + 7).min(bits.len());
        let raw = slice(bits, i, end);
        let (corrected, changed) = decode_codeword(&raw);
        if changed {
            report.errors_corrected += 1;
            report.corrections.push(Correction {
                codeword_index: index,
                corrected_bits: corrected.clone(),
                raw_bits: raw,
                span: (i, end),
            });
        }
        out.append(&mut corrected.clone());
        i = end;
        index += 1;
    }
    (out, report)
}

/// Strip the parity bits from a (corrected) Hamming stream, re-emitting just
/// the data bits. Returns the data stream and the number of parity bits
/// removed.
pub fn strip_parity(bits: &BitVec) -> (BitVec, usize) {
    let mut out = BitVec::with_capacity(bits.len());
    let mut removed = 0;
    let mut i = 0;
    while i < bits.len() {
        let remaining = bits.len() - i;
        let (data_bits, codeword_len) = match remaining {
            r if r >= 7 => (4, 7),
            6 => (3, 6),
            5 => (2, 5),
            3 => (1, 3),
            _ => break,
        };
        let end = i + codeword_len;
        out.append(&mut slice(bits, i, i + data_bits));
        removed += codeword_len - data_bits;
        i = end;
    }
    (out, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::byte_bits;

    fn bits_from_str(s: &str) -> BitVec {
        let mut b = BitVec::new();
        for c in s.chars() {
            b.push(c == '1');
        }
        b
    }

    #[test]
    fn worked_example_from_spec() {
        // "0100" -> 0100 011, "0001" -> 0001 111
        let bits = bits_from_str("01000001");
        let hammed = encode(&bits);
        assert_eq!(hammed, bits_from_str("01000110001111"));
    }

    #[test]
    fn round_trip_no_errors_for_every_group_size() {
        for len in 0..20 {
            let bits = byte_bits(&vec![0b10110101; len]);
            let hammed = encode(&bits);
            let (corrected, report) = decode(&hammed);
            assert_eq!(report.errors_corrected, 0);
            let (stripped, _) = strip_parity(&corrected);
            assert_eq!(stripped, bits);
        }
    }

    #[test]
    fn single_bit_flip_is_corrected_in_full_codeword() {
        let bits = byte_bits(&[0x41, 0x42]);
        let hammed = encode(&bits);
        for pos in 0..7 {
            let mut mutated = hammed.clone();
            let cur = mutated.get(pos).unwrap();
            mutated.set(pos, !cur);
            let (corrected, report) = decode(&mutated);
            assert!(report.errors_corrected >= 1);
            let (stripped, _) = strip_parity(&corrected);
            assert_eq!(stripped, bits, "flipping bit {} should still recover original", pos);
        }
    }

    #[test]
    fn all_syndromes_7bit() {
        // enumerate every single bit flip across a handful of data patterns
        for d in 0u8..16 {
            let mut data = BitVec::new();
            for i in (0..4).rev() {
                data.push((d >> i) & 1 == 1);
            }
            let mut codeword = BitVec::new();
            encode_group(&data, &mut codeword);
            for pos in 0..7 {
                let mut mutated = codeword.clone();
                let cur = mutated.get(pos).unwrap();
                mutated.set(pos, !cur);
                let (corrected, changed) = decode_codeword(&mutated);
                assert!(changed);
                assert_eq!(corrected, codeword, "data={:04b} pos={}", d, pos);
            }
        }
    }

    #[test]
    fn all_syndromes_6bit() {
        for d in 0u8..8 {
            let mut data = BitVec::new();
            for i in (0..3).rev() {
                data.push((d >> i) & 1 == 1);
            }
            let mut codeword = BitVec::new();
            encode_group(&data, &mut codeword);
            assert_eq!(codeword.len(), 6);
            for pos in 0..6 {
                let mut mutated = codeword.clone();
                let cur = mutated.get(pos).unwrap();
                mutated.set(pos, !cur);
                let (corrected, changed) = decode_codeword(&mutated);
                assert!(changed, "data={:03b} pos={}", d, pos);
                assert_eq!(corrected, codeword, "data={:03b} pos={}", d, pos);
            }
        }
    }

    #[test]
    fn all_syndromes_5bit() {
        for d in 0u8..4 {
            let mut data = BitVec::new();
            for i in (0..2).rev() {
                data.push((d >> i) & 1 == 1);
            }
            let mut codeword = BitVec::new();
            encode_group(&data, &mut codeword);
            assert_eq!(codeword.len(), 5);
            for pos in 0..5 {
                let mut mutated = codeword.clone();
                let cur = mutated.get(pos).unwrap();
                mutated.set(pos, !cur);
                let (corrected, changed) = decode_codeword(&mutated);
                assert!(changed, "data={:02b} pos={}", d, pos);
                assert_eq!(corrected, codeword, "data={:02b} pos={}", d, pos);
            }
        }
    }

    #[test]
    fn six_bit_collision_syndrome_is_not_corrected() {
        // data=000 -> codeword 000000; flipping bits 0 and 4 together produces
        // the (false,false,false) syndrome, which the shortened 6-bit code
        // cannot localize to a single position.
        let mut mutated = bits_from_str("000000");
        mutated.set(0, true);
        mutated.set(4, true);
        let (_corrected, changed) = decode_codeword(&mutated);
        assert!(!changed);
    }

    #[test]
    fn triplicate_majority_vote() {
        let one = bits_from_str("111");
        let (corrected, changed) = decode_codeword(&one);
        assert!(!changed);
        assert_eq!(corrected, one);

        let flipped = bits_from_str("101");
        let (corrected, changed) = decode_codeword(&flipped);
        assert!(changed);
        assert_eq!(corrected, bits_from_str("111"));
    }

    #[test]
    fn strip_parity_removes_expected_counts() {
        let bits = byte_bits(&[0xAB]); // 8 bits -> 4+4 groups -> two 7-bit codewords, 6 parity bits
        let hammed = encode(&bits);
        let (stripped, removed) = strip_parity(&hammed);
        assert_eq!(stripped, bits);
        assert_eq!(removed, 6);
    }
}
