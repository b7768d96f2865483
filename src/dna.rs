//! Bijective mapping between a bit stream and the `{A,C,G,T}` alphabet.
//!
//! Encoding substitutes `0->C, 1->G`, then at every odd 0-based index
//! re-maps `C->T, G->A`. The effect is that every adjacent pair of bases is
//! one of `{CT, CA, GT, GA}`, which keeps the purine/pyrimidine mix balanced
//! and avoids long single-base runs between adjacent positions. Decoding
//! reverses both passes.

use crate::Error;
use bit_vec::BitVec;

/// Map a bit stream to a DNA base string.
pub fn encode(bits: &BitVec) -> String {
    let mut out = String::with_capacity(bits.len());
    for (i, bit) in bits.iter().enumerate() {
        let base = if bit { 'G' } else { 'C' };
        out.push(if i % 2 == 1 {
            match base {
                'C' => 'T',
                'G' => 'A',
                _ => unreachable!(),
            }
        } else {
            base
        });
    }
    out
}

/// Map a DNA base string back to a bit stream. Rejects any character outside
/// `{A,C,G,T}`.
pub fn decode(dna: &str) -> Result<BitVec, Error> {
    let mut out = BitVec::with_capacity(dna.len());
    for c in dna.chars() {
        let merged = match c {
            'T' | 'A' => {
                // undo the odd-position disguise: T was C, A was G
                if c == 'T' {
                    'C'
                } else {
                    'G'
                }
            }
            'C' | 'G' => c,
            _ => return Err(Error::InvalidBase(c)),
        };
        out.push(merged == 'G');
    }
    Ok(out)
}
