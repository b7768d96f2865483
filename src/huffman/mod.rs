//! Static Huffman coding over a symbol stream.
//!
//! A symbol is one UTF-8 character for text payloads, or one decimal digit
//! `'0'..'9'` for binary payloads (where each source byte contributes three
//! digit symbols, see [`crate::pipeline`]). The tree is built once per
//! encode run from the full frequency table and the resulting code table is
//! serialized into the stream header (see [`header`]) so decoding never
//! needs anything but the encoded artifact itself.

pub mod header;

use bit_vec::BitVec;
use std::collections::HashMap;

/// A Huffman tree node. Leaves carry the symbol they encode and its
/// frequency; internal nodes only need the summed frequency for the next
/// merge step.
#[derive(Debug, Clone)]
pub enum Tree {
    Leaf { symbol: char, freq: usize },
    Internal { freq: usize, left: Box<Tree>, right: Box<Tree> },
}

impl Tree {
    fn freq(&self) -> usize {
        match self {
            Tree::Leaf { freq, .. } => *freq,
            Tree::Internal { freq, .. } => *freq,
        }
    }
}

/// Count symbol occurrences, preserving first-seen order so that the
/// tie-breaking in [`build_tree`] is reproducible.
fn frequency_table(symbols: &[char]) -> Vec<(char, usize)> {
    let mut order: Vec<(char, usize)> = Vec::new();
    let mut index: HashMap<char, usize> = HashMap::new();
    for &s in symbols {
        match index.get(&s) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(s, order.len());
                order.push((s, 1));
            }
        }
    }
    order
}

/// Build a Huffman tree from a symbol stream. Repeatedly stable-sorts the
/// working node list by ascending frequency and merges the two smallest
/// nodes under a new parent, appended to the end of the list - this mirrors
/// the reference algorithm's `sorted()` / `pop(0)` / `append()` cadence
/// exactly, so ties resolve in first-seen order on every pass.
pub fn build_tree(symbols: &[char]) -> Tree {
    let freqs = frequency_table(symbols);
    assert!(!freqs.is_empty(), "cannot build a Huffman tree over an empty symbol stream");
    let mut nodes: Vec<Tree> = freqs
        .into_iter()
        .map(|(symbol, freq)| Tree::Leaf { symbol, freq })
        .collect();
    while nodes.len() > 1 {
        nodes.sort_by_key(|n| n.freq());
        let left = nodes.remove(0);
        let right = nodes.remove(0);
        let freq = left.freq() + right.freq();
        nodes.push(Tree::Internal { freq, left: Box::new(left), right: Box::new(right) });
    }
    nodes.pop().expect("loop leaves exactly one node")
}

/// Walk the tree once, accumulating a fresh code string per branch (no
/// shared mutable accumulator), and return the resulting symbol-to-code map.
/// A single-symbol stream is a degenerate tree of one leaf; it gets the code
/// `"0"` rather than an empty string, since every entry in the table must be
/// a non-empty bit string for the decoder to make progress.
pub fn assign_codes(tree: &Tree) -> HashMap<char, String> {
    fn walk(node: &Tree, prefix: String, map: &mut HashMap<char, String>) {
        match node {
            Tree::Leaf { symbol, .. } => {
                map.insert(*symbol, if prefix.is_empty() { "0".to_string() } else { prefix });
            }
            Tree::Internal { left, right, .. } => {
                walk(left, prefix.clone() + "0", map);
                walk(right, prefix + "1", map);
            }
        }
    }
    let mut map = HashMap::new();
    walk(tree, String::new(), &mut map);
    map
}

/// Replace each symbol with its code and concatenate into one bit stream.
pub fn encode(symbols: &[char], table: &HashMap<char, String>) -> BitVec {
    let mut out = BitVec::new();
    for s in symbols {
        let code = table.get(s).expect("every symbol must have a Huffman code");
        for c in code.chars() {
            out.push(c == '1');
        }
    }
    out
}

/// Scan the bit stream, accumulating bits until they match a code in the
/// table, emitting the corresponding symbol and resetting. The table is
/// prefix-free by construction, so this is unambiguous. A trailing partial
/// code that never matches is discarded - the expected outcome when the
/// input stream ends mid-symbol (e.g. after corruption upstream).
pub fn decode(bits: &BitVec, table: &HashMap<char, String>) -> Vec<char> {
    let inverse: HashMap<&str, char> = table.iter().map(|(k, v)| (v.as_str(), *k)).collect();
    let mut out = Vec::new();
    let mut current = String::new();
    for bit in bits.iter() {
        current.push(if bit { '1' } else { '0' });
        if let Some(&symbol) = inverse.get(current.as_str()) {
            out.push(symbol);
            current.clear();
        }
    }
    out
}
