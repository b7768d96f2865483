//! Single-base-substitution mutation harness used by the `simulate` CLI
//! subcommand (property-testing harness, not part of the core codec - see
//! the crate's top level documentation).
//!
//! Each run mutates a subset of bases in an already-encoded DNA sequence,
//! decodes the mutated sequence through the normal pipeline, and reports how
//! many bases were changed, how many Hamming codewords were corrected, and
//! whether the decoded bytes still match the original input exactly.

use crate::pipeline::{self, PayloadKind};
use crate::Error;
use rand::Rng;

/// Outcome of mutating and re-decoding one DNA sequence.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub mutation_count: usize,
    pub errors_corrected: usize,
    pub perfect_retrieval: bool,
}

/// Flip a `rate`-fraction of bases in `dna` to one of the other three bases,
/// chosen uniformly at random without replacement among positions. Mirrors
/// `random.sample` + `random.choice` over `{A,C,G,T}\{current}` in the
/// reference simulator.
pub fn mutate_sequence(dna: &str, rate: f64, rng: &mut impl Rng) -> (String, usize) {
    let mut bases: Vec<char> = dna.chars().collect();
    let n = bases.len();
    if n == 0 {
        return (String::new(), 0);
    }
    let num_mutations = ((n as f64) * rate) as usize;
    let num_mutations = num_mutations.min(n);
    let positions = rand::seq::index::sample(rng, n, num_mutations);
    for pos in positions.iter() {
        let current = bases[pos];
        let mut choices: Vec<char> = ['A', 'C', 'G', 'T'].into_iter().filter(|&b| b != current).collect();
        let idx = rng.gen_range(0..choices.len());
        bases[pos] = choices.remove(idx);
    }
    (bases.into_iter().collect(), num_mutations)
}

/// Run one simulated-mutation round: mutate `dna` at `rate`, decode it, and
/// compare against `original` bytes.
pub fn run(
    original: &[u8],
    dna: &str,
    kind: PayloadKind,
    huffman_on: bool,
    rate: f64,
    rng: &mut impl Rng,
) -> Result<SimulationOutcome, Error> {
    let (mutated_dna, mutation_count) = mutate_sequence(dna, rate, rng);
    let outcome = pipeline::decode(&mutated_dna, kind, huffman_on)?;
    let perfect_retrieval = outcome.bytes == original;
    Ok(SimulationOutcome {
        mutation_count,
        errors_corrected: outcome.report.errors_corrected,
        perfect_retrieval,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_rate_mutates_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let dna = "CACTCAGTCCAGAA";
        let (mutated, count) = mutate_sequence(dna, 0.0, &mut rng);
        assert_eq!(count, 0);
        assert_eq!(mutated, dna);
    }

    #[test]
    fn full_rate_changes_every_base() {
        let mut rng = StdRng::seed_from_u64(2);
        let dna = "CACTCAGTCCAGAA";
        let (mutated, count) = mutate_sequence(dna, 1.0, &mut rng);
        assert_eq!(count, dna.len());
        for (a, b) in dna.chars().zip(mutated.chars()) {
            assert_ne!(a, b, "every base should have been replaced by a different one");
        }
    }

    #[test]
    fn mutated_bases_stay_in_alphabet() {
        let mut rng = StdRng::seed_from_u64(3);
        let dna = "CACTCAGTCCAGAAGGGGCCCCATATAT";
        let (mutated, _) = mutate_sequence(dna, 0.5, &mut rng);
        assert!(mutated.chars().all(|c| "ACGT".contains(c)));
    }

    #[test]
    fn zero_mutation_rate_round_trips_perfectly() {
        let mut rng = StdRng::seed_from_u64(4);
        let original = b"hello dna world";
        let outcome = pipeline::encode(original, PayloadKind::Text, false).unwrap();
        let result = run(original, &outcome.dna, PayloadKind::Text, false, 0.0, &mut rng).unwrap();
        assert_eq!(result.mutation_count, 0);
        assert!(result.perfect_retrieval);
        assert_eq!(result.errors_corrected, 0);
    }

    #[test]
    fn empty_sequence_has_no_mutations() {
        let mut rng = StdRng::seed_from_u64(5);
        let (mutated, count) = mutate_sequence("", 0.5, &mut rng);
        assert_eq!(count, 0);
        assert_eq!(mutated, "");
    }
}
