use log::{debug, info};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::blockchain::{Block, Ledger, ProofOfWork, Reward};
use crate::error::{Error, Result};
use crate::network::{ChainSnapshot, ChainSource, PeerSet, consensus};
use crate::transaction::TransactionRequest;

/// Outcome of a consensus round.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub replaced: bool,
    pub chain: Vec<Block>,
}

/// One ledger node: chain, pending buffer and peers behind their own locks.
///
/// The ledger mutex is the single writer for chain and buffer. Mining searches
/// its proof outside the lock and only takes it to seal the block.
pub struct Node {
    ledger: Mutex<Ledger>,
    peers: Mutex<PeerSet>,
    pow: ProofOfWork,
    reward: Reward,
    shutdown: Arc<AtomicBool>,
}

impl Node {
    pub fn new(pow: ProofOfWork, reward: Reward, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            ledger: Mutex::new(Ledger::new(pow)),
            peers: Mutex::new(PeerSet::new()),
            pow,
            reward,
            shutdown,
        }
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn peers(&self) -> MutexGuard<'_, PeerSet> {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Solve the puzzle for the current tip and seal a block with the reward.
    /// Blocks the calling thread for the length of the search.
    pub fn mine(&self) -> Result<Block> {
        loop {
            let tip = self.ledger().tip()?;
            let proof = self
                .pow
                .solve_until(tip.proof, &self.shutdown)
                .ok_or(Error::MiningCancelled)?;

            if let Some(block) = self.ledger().seal(&tip, proof, &self.reward) {
                info!(
                    "MINER - sealed block #{} (proof={}, txs={})",
                    block.index,
                    block.proof,
                    block.transactions.len()
                );
                return Ok(block);
            }
            debug!("MINER - tip moved during search for block #{}, retrying", tip.next_index);
        }
    }

    /// Copy of the current chain with its length.
    pub fn chain(&self) -> ChainSnapshot {
        ChainSnapshot::new(self.ledger().chain().to_vec())
    }

    pub fn is_valid(&self) -> bool {
        self.ledger().is_valid()
    }

    /// Validity and length read under one lock, so both describe the same chain.
    pub fn audit(&self) -> (bool, usize) {
        let ledger = self.ledger();
        (ledger.is_valid(), ledger.len())
    }

    /// Queue a transaction; returns the index of the block that will include it.
    pub fn submit_transaction(&self, request: TransactionRequest) -> Result<u64> {
        let tx = request.into_transaction()?;
        let index = self.ledger().add_transaction(tx.sender, tx.receiver, tx.amount);
        debug!("LEDGER - transaction queued for block #{index}");
        Ok(index)
    }

    pub fn register_peers<S: AsRef<str>>(&self, addresses: &[S]) -> Result<Vec<String>> {
        if addresses.is_empty() {
            return Err(Error::MalformedInput("no peer addresses supplied".into()));
        }
        let mut peers = self.peers();
        let added = peers.register_all(addresses)?;
        info!("PEERS - registered {} new peer(s), {} known", added, peers.len());
        Ok(peers.to_vec())
    }

    /// Registered peers in the order consensus visits them.
    pub fn peer_list(&self) -> Vec<String> {
        self.peers().to_vec()
    }

    /// Adopt the longest valid peer chain if it beats ours. Peer failures
    /// only exclude that peer from the round.
    pub async fn resolve_consensus<C: ChainSource>(&self, source: &C) -> Resolution {
        let peers = self.peer_list();
        let local_len = self.ledger().len();

        let candidate = consensus::resolve(local_len, &peers, source, &self.pow).await;

        let mut ledger = self.ledger();
        let replaced = match candidate {
            // Our chain may have grown while peers were being fetched.
            Some(candidate) if candidate.chain.len() > ledger.len() => {
                info!(
                    "CONSENSUS - replacing local chain ({} blocks) with {}'s ({} blocks)",
                    ledger.len(),
                    candidate.peer,
                    candidate.chain.len()
                );
                ledger.replace_chain(candidate.chain);
                true
            }
            _ => false,
        };

        Resolution {
            replaced,
            chain: ledger.chain().to_vec(),
        }
    }
}
