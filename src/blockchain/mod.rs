pub mod block;
pub mod model;
pub mod pow;
pub mod validator;

pub use block::Block;
pub use model::{Ledger, Reward};
pub use pow::ProofOfWork;
pub use validator::validate_chain;

/// Default Proof-of-Work difficulty (number of leading hex zeros).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Proof stored in the genesis block.
pub const GENESIS_PROOF: i64 = 1;

/// Previous-hash sentinel of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Flat mining reward (dev value).
pub const DEFAULT_REWARD: u64 = 1;
