use std::fmt;

use super::{Block, ProofOfWork};

/// First rule a candidate chain breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFault {
    Empty,
    /// `previous_hash` of the block at `index` does not match its predecessor.
    BrokenLink { index: u64 },
    /// Proof of the block at `index` does not solve the puzzle against its predecessor.
    InvalidProof { index: u64 },
}

impl fmt::Display for ChainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainFault::Empty => write!(f, "chain is empty"),
            ChainFault::BrokenLink { index } => {
                write!(f, "block #{index} does not link to its predecessor")
            }
            ChainFault::InvalidProof { index } => {
                write!(f, "block #{index} carries an invalid proof")
            }
        }
    }
}

/// Walk every adjacent pair: linkage first, then the proof.
pub fn validate_chain(chain: &[Block], pow: &ProofOfWork) -> Result<(), ChainFault> {
    if chain.is_empty() {
        return Err(ChainFault::Empty);
    }

    for pair in chain.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);

        if current.previous_hash != prev.hash() {
            return Err(ChainFault::BrokenLink {
                index: current.index,
            });
        }

        if !pow.is_valid_proof(current.proof, prev.proof) {
            return Err(ChainFault::InvalidProof {
                index: current.index,
            });
        }
    }

    Ok(())
}

pub fn is_chain_valid(chain: &[Block], pow: &ProofOfWork) -> bool {
    validate_chain(chain, pow).is_ok()
}
