use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};

use super::DEFAULT_DIFFICULTY;

/// How many candidates are tried between two looks at the cancel flag.
const CANCEL_CHECK_INTERVAL: i64 = 4_096;

/// Proof-of-Work puzzle: find `proof` such that
/// `sha256(proof² - previous_proof²)` starts with `difficulty` hex zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: u32,
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

impl ProofOfWork {
    pub const fn new(difficulty: u32) -> Self {
        Self { difficulty }
    }

    /// Hex digest of the puzzle expression for a candidate proof.
    /// Squares are taken in i128 so no pair of i64 proofs can overflow.
    pub fn digest(proof: i64, previous_proof: i64) -> String {
        let proof = i128::from(proof);
        let previous_proof = i128::from(previous_proof);
        let operation = proof * proof - previous_proof * previous_proof;

        let mut hasher = Sha256::new();
        hasher.update(operation.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn is_valid_proof(&self, proof: i64, previous_proof: i64) -> bool {
        let digest = Self::digest(proof, previous_proof);
        let zeros = self.difficulty as usize;
        digest.len() >= zeros && digest.bytes().take(zeros).all(|b| b == b'0')
    }

    /// Unbounded search starting at 1.
    pub fn solve(&self, previous_proof: i64) -> i64 {
        let mut proof: i64 = 1;
        loop {
            if let Some(found) = self.search_from(proof, previous_proof) {
                return found;
            }
            proof = proof.wrapping_add(CANCEL_CHECK_INTERVAL);
        }
    }

    /// Same search as `solve`, but gives up with `None` once `cancel` is raised.
    pub fn solve_until(&self, previous_proof: i64, cancel: &AtomicBool) -> Option<i64> {
        let mut proof: i64 = 1;
        while !cancel.load(Ordering::Relaxed) {
            if let Some(found) = self.search_from(proof, previous_proof) {
                return Some(found);
            }
            proof = proof.wrapping_add(CANCEL_CHECK_INTERVAL);
        }
        None
    }

    /// Scan one window of candidates `[start, start + CANCEL_CHECK_INTERVAL)`.
    fn search_from(&self, start: i64, previous_proof: i64) -> Option<i64> {
        (0..CANCEL_CHECK_INTERVAL)
            .map(|offset| start.wrapping_add(offset))
            .find(|candidate| self.is_valid_proof(*candidate, previous_proof))
    }
}
