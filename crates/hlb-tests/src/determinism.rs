//! Byte-identical output checks.

use std::fmt;

use hlb_spec::blake3_hash;

/// Outcome of running a generator several times.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether every run produced the same bytes.
    pub is_deterministic: bool,
    /// Runs performed.
    pub runs: usize,
    /// Output size of the first run in bytes.
    pub output_size: usize,
    /// BLAKE3 hash of the first run.
    pub hash: String,
    /// First differing byte, if any.
    pub first_difference: Option<Difference>,
}

/// Where two runs first disagreed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Difference {
    /// Run that differed from run 0.
    pub run_index: usize,
    /// Byte offset, or the shorter length when only the sizes differ.
    pub offset: usize,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run {} differs at byte {}", self.run_index, self.offset)
    }
}

impl DeterminismResult {
    /// Panics with the first difference if the runs disagreed.
    pub fn assert_deterministic(&self) {
        if let Some(diff) = self.first_difference {
            panic!(
                "non-deterministic output over {} runs ({} bytes, hash {}): {}",
                self.runs, self.output_size, self.hash, diff
            );
        }
    }
}

/// Runs `generate` `runs` times (at least 2) and compares the outputs.
pub fn verify_determinism<F>(generate: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> Vec<u8>,
{
    let runs = runs.max(2);
    let reference = generate();
    let hash = blake3_hash(&reference);

    let first_difference = (1..runs).find_map(|run_index| {
        let output = generate();
        let offset = reference
            .iter()
            .zip(&output)
            .position(|(a, b)| a != b)
            .or_else(|| (output.len() != reference.len()).then(|| output.len().min(reference.len())));
        offset.map(|offset| Difference { run_index, offset })
    });

    DeterminismResult {
        is_deterministic: first_difference.is_none(),
        runs,
        output_size: reference.len(),
        hash,
        first_difference,
    }
}
