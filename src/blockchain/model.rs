use log::debug;
use serde_json::Number;

use super::{Block, ProofOfWork, validator};
use crate::error::{Error, Result};
use crate::transaction::Transaction;

/// Reward transaction injected into every mined block. Policy is the caller's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reward {
    pub sender: String,
    pub receiver: String,
    pub amount: u64,
}

/// Snapshot of the chain tip a proof is searched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tip {
    pub next_index: u64,
    pub proof: i64,
    pub hash: String,
}

/// In-memory chain plus the buffer of transactions waiting for the next block.
///
/// The ledger also remembers the hash of the block it last sealed or adopted.
/// Pairwise validation cannot see an edit to the tip (no later block links to
/// it), so `is_valid` compares the tip against that recorded hash as well.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    pow: ProofOfWork,
    tip_hash: Option<String>,
}

impl Ledger {
    /// Initialize a new ledger with a genesis block.
    pub fn new(pow: ProofOfWork) -> Self {
        let genesis = Block::genesis();
        let tip_hash = Some(genesis.hash());
        Self {
            chain: vec![genesis],
            pending: Vec::new(),
            pow,
            tip_hash,
        }
    }

    /// The full chain, genesis first.
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Only true if a replacement handed us an empty chain.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Transactions queued for the next block, in submission order.
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Puzzle this ledger validates proofs against.
    pub fn pow(&self) -> &ProofOfWork {
        &self.pow
    }

    /// Seal the pending buffer into a new block and append it.
    pub fn create_block(&mut self, proof: i64, previous_hash: String) -> &Block {
        let index = self.chain.len() as u64 + 1;
        let transactions = std::mem::take(&mut self.pending);
        debug!(
            "LEDGER - sealing block #{} with {} txs",
            index,
            transactions.len()
        );

        let block = Block::new(index, proof, previous_hash, transactions);
        self.tip_hash = Some(block.hash());
        self.chain.push(block);
        &self.chain[self.chain.len() - 1]
    }

    /// Return the last block in the chain.
    pub fn previous_block(&self) -> Result<&Block> {
        self.chain
            .last()
            .ok_or(Error::InvariantViolation("ledger chain has no genesis block"))
    }

    /// Queue a transaction; returns the index of the block that will hold it.
    pub fn add_transaction(
        &mut self,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: impl Into<Number>,
    ) -> u64 {
        self.pending.push(Transaction::new(sender, receiver, amount));
        self.chain.len() as u64 + 1
    }

    /// Canonical digest of `block`; see `Block::hash`.
    pub fn hash(block: &Block) -> String {
        block.hash()
    }

    /// Snapshot the last block for a proof search.
    pub fn tip(&self) -> Result<Tip> {
        let last = self.previous_block()?;
        Ok(Tip {
            next_index: last.index + 1,
            proof: last.proof,
            hash: last.hash(),
        })
    }

    /// Second half of mining: if the chain still ends at `tip`, inject the
    /// reward and seal the block. Returns `None` untouched if the tip moved.
    pub fn seal(&mut self, tip: &Tip, proof: i64, reward: &Reward) -> Option<Block> {
        let current = self.chain.last().map(Block::hash);
        if current.as_deref() != Some(tip.hash.as_str()) {
            return None;
        }

        self.add_transaction(
            reward.sender.as_str(),
            reward.receiver.as_str(),
            reward.amount,
        );
        Some(self.create_block(proof, tip.hash.clone()).clone())
    }

    /// Pairwise chain validation plus a check that the tip is still the
    /// block this ledger sealed or adopted.
    pub fn is_valid(&self) -> bool {
        let tip_intact = self.chain.last().map(Block::hash) == self.tip_hash;
        tip_intact && validator::is_chain_valid(&self.chain, &self.pow)
    }

    /// Swap in a whole chain. Existing blocks are never edited in place.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        self.tip_hash = chain.last().map(Block::hash);
        self.chain = chain;
    }
}
