//! The two-level length prefix that makes the Huffman dictionary
//! self-delimiting, plus dictionary serialization/parsing.
//!
//! Layout within the bit stream:
//!
//! ```text
//! [0 .. 8)            m   number of ASCII digits of L, as one ASCII byte
//! [8 .. 8(m+1))       L   length of D in bits, as m ASCII bytes
//! [8(m+1) .. +L)      D   dictionary serialization (UTF-8 bits)
//! ```

use crate::bits::{ascii_digits, parse_ascii_digits, utf8_bits};
use crate::Error;
use bit_vec::BitVec;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub m: u8,
    pub l: u64,
}

/// Render the `m ∥ L` prefix for a dictionary of `dict_bits_len` bits.
pub fn encode(dict_bits_len: u64) -> BitVec {
    let l = dict_bits_len;
    let m = l.to_string().len() as u64;
    assert!((1..=9).contains(&m), "dictionary length {} bits needs an out-of-range digit count", l);
    let mut out = ascii_digits(m);
    out.append(&mut ascii_digits(l));
    out
}

/// Parse the `m ∥ L` prefix. Returns the header and the bit offset where `D`
/// begins. Rejects non-decimal digits, an out-of-range `m`, or an `L` that
/// would run past the end of the stream.
pub fn decode(bits: &BitVec) -> Result<(Header, usize), Error> {
    if bits.len() < 8 {
        return Err(Error::MalformedHeader);
    }
    let m = parse_ascii_digits(bits, 0, 1).ok_or(Error::MalformedHeader)?;
    if !(1..=9).contains(&m) {
        return Err(Error::MalformedHeader);
    }
    let m = m as u8;
    let after_m = 8 + m as usize * 8;
    if bits.len() < after_m {
        return Err(Error::MalformedHeader);
    }
    let l = parse_ascii_digits(bits, 8, m as usize).ok_or(Error::MalformedHeader)?;
    if bits.len() < after_m + l as usize {
        return Err(Error::MalformedHeader);
    }
    Ok((Header { m, l }, after_m))
}

/// Serialize a code table as `"," + key + code` repeated per entry, sorted
/// by symbol for a deterministic byte layout (the table is self-describing,
/// so entry order has no effect on round-tripping).
pub fn serialize_dict(table: &HashMap<char, String>) -> String {
    let mut entries: Vec<(&char, &String)> = table.iter().collect();
    entries.sort_by_key(|(k, _)| **k);
    let mut s = String::new();
    for (key, code) in entries {
        s.push(',');
        s.push(*key);
        s.push_str(code);
    }
    s
}

/// Parse a serialized dictionary back into a code table. A literal comma key
/// produces the two-comma sequence `",,"` (its own leading delimiter
/// immediately followed by the comma symbol itself); this is detected and
/// the split is adjusted to re-prefix the following entry's code with the
/// comma key, matching the reference parser. This only matters because keys
/// are exactly one character and codes are `{0,1}`-only, so `",,"` can only
/// ever mean "comma key follows" - it is not load-bearing for any other key.
pub fn parse_dict(s: &str) -> HashMap<char, String> {
    let mut entries: Vec<String> = Vec::new();
    if let Some(_) = s.find(",,") {
        let mut halves = s.splitn(2, ",,");
        let first = halves.next().unwrap_or("");
        let second = halves.next().unwrap_or("");
        entries.extend(first.split(',').map(str::to_string));
        let mut second_entries: Vec<String> = second.split(',').map(str::to_string).collect();
        if let Some(head) = second_entries.first_mut() {
            *head = format!(",{}", head);
        }
        entries.extend(second_entries);
    } else if !s.is_empty() {
        entries.extend(s[1..].split(',').map(str::to_string));
    }
    let mut table = HashMap::new();
    for entry in entries {
        if !entry.is_empty() {
            let mut chars = entry.chars();
            let key = chars.next().unwrap();
            table.insert(key, chars.collect());
        }
    }
    table
}

/// Bit-encode a serialized dictionary, UTF-8.
pub fn dict_bits(table: &HashMap<char, String>) -> BitVec {
    utf8_bits(&serialize_dict(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trip() {
        for l in [0u64, 1, 7, 255, 999_999_999] {
            let bits = encode(l);
            let (header, offset) = decode(&bits).unwrap();
            assert_eq!(header.l, l);
            assert_eq!(offset, bits.len());
        }
    }

    #[test]
    fn rejects_l_exceeding_remaining_bits() {
        let mut bits = encode(255);
        bits.truncate(bits.len() - 1);
        assert!(matches!(decode(&bits), Err(Error::MalformedHeader)));
    }

    #[test]
    fn dict_round_trip_without_comma_key() {
        let mut table = HashMap::new();
        table.insert('A', "0".to_string());
        table.insert('B', "10".to_string());
        table.insert('C', "11".to_string());
        let s = serialize_dict(&table);
        assert_eq!(parse_dict(&s), table);
    }

    #[test]
    fn dict_round_trip_with_comma_key() {
        let mut table = HashMap::new();
        table.insert(',', "1".to_string());
        table.insert('A', "00".to_string());
        table.insert('B', "01".to_string());
        let s = serialize_dict(&table);
        assert_eq!(parse_dict(&s), table);
    }

    #[test]
    fn header_self_consistency_matches_spec_example() {
        // "AB" with two 1-bit codes: D = utf8Bits(",A0,B1")
        let mut table = HashMap::new();
        table.insert('A', "0".to_string());
        table.insert('B', "1".to_string());
        let d = dict_bits(&table);
        let header = encode(d.len() as u64);
        let (parsed, offset) = decode(&header).unwrap();
        assert_eq!(parsed.l as usize, d.len());
        assert_eq!(offset, header.len());
    }
}
