//! Low level helpers shared by the codec stages for moving between bytes,
//! UTF-8 text, and `BitVec` bit streams.
//!
//! Bit order is MSB-first everywhere an integer is rendered into bits, per
//! the framing rules the rest of the crate depends on.

use bit_vec::BitVec;

/// Append the `n` least-significant bits of `value`, most significant first.
pub fn push_bits(out: &mut BitVec, value: u64, n: usize) {
    for i in (0..n).rev() {
        out.push((value >> i) & 1 == 1);
    }
}

/// Read `n` bits starting at `start` as a big-endian unsigned integer.
/// Panics if the range runs past the end of `bits` (callers are expected to
/// bounds-check first, as every call site in this crate already knows the
/// stream is long enough).
pub fn read_bits(bits: &BitVec, start: usize, n: usize) -> u64 {
    let mut value: u64 = 0;
    for i in 0..n {
        value = (value << 1) | bits.get(start + i).expect("read_bits out of range") as u64;
    }
    value
}

/// Copy out the bits in `[start,end)` as a fresh `BitVec`.
pub fn slice(bits: &BitVec, start: usize, end: usize) -> BitVec {
    let mut out = BitVec::with_capacity(end - start);
    for i in start..end {
        out.push(bits.get(i).unwrap_or(false));
    }
    out
}

/// Convert a byte sequence into bits, 8 bits per byte, MSB first.
pub fn byte_bits(bytes: &[u8]) -> BitVec {
    let mut out = BitVec::with_capacity(bytes.len() * 8);
    for &b in bytes {
        push_bits(&mut out, b as u64, 8);
    }
    out
}

/// Inverse of [`byte_bits`]. Trailing bits that don't complete a byte are
/// dropped.
pub fn bits_to_bytes(bits: &BitVec) -> Vec<u8> {
    let mut out = Vec::with_capacity(bits.len() / 8);
    let mut i = 0;
    while i + 8 <= bits.len() {
        out.push(read_bits(bits, i, 8) as u8);
        i += 8;
    }
    out
}

/// Render the UTF-8 bytes of `text` into bits, 8 bits per byte MSB first.
pub fn utf8_bits(text: &str) -> BitVec {
    byte_bits(text.as_bytes())
}

/// Render the decimal digits of `n` as consecutive 8-bit ASCII bytes.
pub fn ascii_digits(n: u64) -> BitVec {
    byte_bits(n.to_string().as_bytes())
}

/// Parse `n` consecutive 8-bit ASCII decimal digits starting at `start` back
/// into an integer. Returns `None` if a byte isn't an ASCII digit.
pub fn parse_ascii_digits(bits: &BitVec, start: usize, digit_count: usize) -> Option<u64> {
    let mut s = String::with_capacity(digit_count);
    for i in 0..digit_count {
        let byte = read_bits(bits, start + i * 8, 8) as u8;
        if !byte.is_ascii_digit() {
            return None;
        }
        s.push(byte as char);
    }
    s.parse().ok()
}

/// Decode a UTF-8-aware bit stream back to a `String`, using the leading-byte
/// classifier to pick a window width for each character: 8 bits for `0...`,
/// 16 for `110...`, 24 for `1110...`, 32 for `11110...`. Stops at the first
/// position that matches none of the four prefixes (typically because fewer
/// than 8 bits remain). A window whose bytes don't form valid UTF-8 is
/// skipped rather than aborting the whole decode - malformed input is
/// expected to arrive here after an uncorrected bit flip upstream.
pub fn bits_to_utf8(bits: &BitVec) -> String {
    let len = bits.len();
    let mut out = String::new();
    let mut pos = 0;
    while pos < len {
        let remaining = len - pos;
        let nbytes = if !bits.get(pos).unwrap() {
            1
        } else if remaining >= 3 && bits.get(pos + 1).unwrap() && !bits.get(pos + 2).unwrap() {
            2
        } else if remaining >= 4
            && bits.get(pos + 1).unwrap()
            && bits.get(pos + 2).unwrap()
            && !bits.get(pos + 3).unwrap()
        {
            3
        } else if remaining >= 5
            && bits.get(pos + 1).unwrap()
            && bits.get(pos + 2).unwrap()
            && bits.get(pos + 3).unwrap()
            && !bits.get(pos + 4).unwrap()
        {
            4
        } else {
            break;
        };
        let needed = nbytes * 8;
        if remaining < needed {
            break;
        }
        let mut raw = Vec::with_capacity(nbytes);
        for i in 0..nbytes {
            raw.push(read_bits(bits, pos + i * 8, 8) as u8);
        }
        match std::str::from_utf8(&raw) {
            Ok(s) => out.push_str(s),
            Err(_) => log::warn!("skipped malformed utf-8 window at bit {}", pos),
        }
        pos += needed;
    }
    out
}
