//! CSV side-effect files written by the CLI binaries. None of this runs from
//! library calls - `pipeline` returns plain data, and these functions are
//! what turn that data into the on-disk bookkeeping the reference tooling
//! produced (`DNAcodeX_decoding_INFO.csv`, `DNAcodeX_corrected_seqs_*.csv`,
//! `Mutations_simulator_report.csv`).

use crate::hamming::Correction;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

const DECODING_INFO_HEADER: &str =
    "Input File,ID(DateTime),Errors Count,Length of Input Sequence,Removed Parity Bits,Length of Sequence After Parity Bits Removal,Output File Size (bytes)\n";

const SIMULATION_REPORT_HEADER: &str =
    "Input File,Run Number,Mutations Rate,Mutation Count,Corrected Error Count,Perfect Retrieval\n";

fn append_with_header(path: &Path, header: &str, row: &str) -> io::Result<()> {
    let needs_header = !path.exists();
    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    if needs_header {
        f.write_all(header.as_bytes())?;
    }
    writeln!(f, "{}", row)
}

/// Append one row to `DNAcodeX_decoding_INFO.csv`, writing the header first
/// if the file doesn't exist yet.
#[allow(clippy::too_many_arguments)]
pub fn append_decoding_info(
    path: &Path,
    input_file: &str,
    run_id: &str,
    errors_count: usize,
    input_sequence_len: usize,
    removed_parity_bits: usize,
    len_after_parity_removal: usize,
    output_file_size: u64,
) -> io::Result<()> {
    let row = format!(
        "{},{},{},{},{},{},{}",
        input_file, run_id, errors_count, input_sequence_len, removed_parity_bits, len_after_parity_removal, output_file_size
    );
    append_with_header(path, DECODING_INFO_HEADER, &row)
}

/// Write one row per corrected codeword to a fresh
/// `DNAcodeX_corrected_seqs_<timestamp>.csv`.
pub fn write_corrected_sequences(path: &Path, dna: &str, corrections: &[Correction]) -> io::Result<()> {
    let dna_chars: Vec<char> = dna.chars().collect();
    let mut f = std::fs::File::create(path)?;
    for c in corrections {
        let span: String = dna_chars[c.span.0..c.span.1].iter().collect();
        let corrected: String = c.corrected_bits.iter().map(|b| if b { '1' } else { '0' }).collect();
        let raw: String = c.raw_bits.iter().map(|b| if b { '1' } else { '0' }).collect();
        writeln!(f, "{},{},{},{}:{}", span, corrected, raw, c.span.0, c.span.1)?;
    }
    Ok(())
}

/// Append one row to `Mutations_simulator_report.csv`.
pub fn append_simulation_run(
    path: &Path,
    input_file: &str,
    run_number: usize,
    mutation_rate: f64,
    mutation_count: usize,
    corrected_error_count: usize,
    perfect_retrieval: bool,
) -> io::Result<()> {
    let row = format!(
        "{},{},{},{},{},{}",
        input_file, run_number, mutation_rate, mutation_count, corrected_error_count, perfect_retrieval as u8
    );
    append_with_header(path, SIMULATION_REPORT_HEADER, &row)
}
