//! # dnacodex
//!
//! Encode arbitrary files as DNA base sequences (`{A,C,G,T}`) and decode them
//! back, combining three transforms in a fixed pipeline:
//!
//! 1. an optional Huffman compression stage (`huffman`),
//! 2. a mandatory Hamming(7,4)-family error-correcting code over every 4-bit
//!    group of the bit stream (`hamming`),
//! 3. a deterministic bit-to-DNA mapping that alternates substitution rules
//!    on even/odd positions to keep the sequence G/C-balanced (`dna`).
//!
//! [`pipeline`] composes these in encode order, and its inverse in decode
//! order. The library itself performs no I/O; `main.rs` reads/writes files
//! and turns pipeline outcomes into the CLI's human-readable and CSV output -
//! the same split the crate's codecs elsewhere use between library functions
//! and the binary. [`simulate`] is a separate property-testing harness built
//! on top of [`pipeline`]; it mutates already-encoded DNA sequences at a
//! given substitution rate and reports how well the Hamming stage recovers.
//!
//! Only single-bit substitution errors inside one Hamming codeword are
//! corrected - deletions, insertions, and multi-bit errors within a codeword
//! are out of scope, as is any cryptographic confidentiality or biological
//! realism of the DNA representation.

pub mod bits;
pub mod dna;
pub mod hamming;
pub mod huffman;
pub mod pipeline;
pub mod report;
pub mod simulate;

/// Errors surfaced by the codec. I/O and malformed-header errors are fatal;
/// everything else the pipeline can encounter (skipped UTF-8 windows,
/// uncorrectable Hamming codewords, discarded Huffman stalls) is handled as
/// best-effort recovery and never surfaces as an `Error`.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed header")]
    MalformedHeader,
    #[error("invalid DNA base '{0}' in input")]
    InvalidBase(char),
    #[error("input is not valid utf-8 text")]
    InvalidUtf8Input,
    #[error("unsupported payload type: {0}")]
    UnsupportedType(String),
}
