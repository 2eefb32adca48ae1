use futures::future::join_all;
use log::{debug, info, warn};

use super::client::{ChainSnapshot, ChainSource};
use crate::blockchain::{Block, ProofOfWork, validate_chain};
use crate::error::{Error, Result};

/// A peer chain that beat the local one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub peer: String,
    pub chain: Vec<Block>,
}

/// Fetch every peer concurrently, then pick the longest valid chain strictly
/// longer than `local_len`. Peers are weighed in the order given, so the
/// first one seen at a given maximal length wins.
pub async fn resolve<C: ChainSource>(
    local_len: usize,
    peers: &[String],
    source: &C,
    pow: &ProofOfWork,
) -> Option<Candidate> {
    let fetched = join_all(peers.iter().map(|peer| source.fetch_chain(peer))).await;
    let responses = peers.iter().cloned().zip(fetched).collect();
    select_longest(local_len, responses, pow)
}

/// The comparison half of `resolve`, over responses already fetched.
pub fn select_longest(
    local_len: usize,
    responses: Vec<(String, Result<ChainSnapshot>)>,
    pow: &ProofOfWork,
) -> Option<Candidate> {
    let mut max_len = local_len;
    let mut best: Option<Candidate> = None;

    for (peer, response) in responses {
        let snapshot = match response {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("CONSENSUS - skipping peer: {err}");
                continue;
            }
        };

        if snapshot.length <= max_len {
            debug!(
                "CONSENSUS - peer {} offers {} blocks, need more than {}",
                peer, snapshot.length, max_len
            );
            continue;
        }

        if let Err(err) = check_snapshot(&peer, &snapshot, pow) {
            warn!("CONSENSUS - skipping peer: {err}");
            continue;
        }

        max_len = snapshot.length;
        best = Some(Candidate {
            peer,
            chain: snapshot.chain,
        });
    }

    if let Some(candidate) = &best {
        info!(
            "CONSENSUS - peer {} holds the longest valid chain ({} blocks, local {})",
            candidate.peer, max_len, local_len
        );
    }
    best
}

fn check_snapshot(peer: &str, snapshot: &ChainSnapshot, pow: &ProofOfWork) -> Result<()> {
    let invalid = |reason: String| Error::InvalidChain {
        peer: peer.to_string(),
        reason,
    };

    if snapshot.length != snapshot.chain.len() {
        return Err(invalid(format!(
            "reported length {} but sent {} blocks",
            snapshot.length,
            snapshot.chain.len()
        )));
    }
    validate_chain(&snapshot.chain, pow).map_err(|fault| invalid(fault.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{ChainSnapshot, ChainSource, resolve, select_longest};
    use crate::blockchain::{Block, Ledger, ProofOfWork, Reward};
    use crate::error::{Error, Result};
    use std::collections::HashMap;

    pub(crate) const POW: ProofOfWork = ProofOfWork::new(2);

    /// In-memory peers; unknown addresses behave like dead hosts.
    #[derive(Default)]
    pub(crate) struct FakePeers {
        pub chains: HashMap<String, ChainSnapshot>,
    }

    impl FakePeers {
        pub(crate) fn with(mut self, peer: &str, chain: Vec<Block>) -> Self {
            self.chains.insert(peer.to_string(), ChainSnapshot::new(chain));
            self
        }
    }

    impl ChainSource for FakePeers {
        async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot> {
            self.chains
                .get(peer)
                .cloned()
                .ok_or_else(|| Error::PeerUnreachable {
                    peer: peer.to_string(),
                    reason: "connection refused".into(),
                })
        }
    }

    /// Chain of `len` blocks, mined honestly from a fresh genesis.
    pub(crate) fn valid_chain(len: usize) -> Vec<Block> {
        let mut ledger = Ledger::new(POW);
        let reward = Reward {
            sender: "peer".into(),
            receiver: "miner".into(),
            amount: 1,
        };
        while ledger.len() < len {
            let tip = ledger.tip().unwrap();
            let proof = POW.solve(tip.proof);
            ledger.seal(&tip, proof, &reward).unwrap();
        }
        ledger.chain().to_vec()
    }

    fn invalid_chain(len: usize) -> Vec<Block> {
        let mut chain = valid_chain(len);
        chain[1].transactions[0].amount = 500.into();
        chain
    }

    fn peers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[actix_web::test]
    async fn adopts_longest_valid_chain_over_longer_invalid_one() {
        let source = FakePeers::default()
            .with("a:1", valid_chain(5))
            .with("b:2", invalid_chain(10));

        let candidate = resolve(3, &peers(&["a:1", "b:2"]), &source, &POW)
            .await
            .unwrap();
        assert_eq!(candidate.peer, "a:1");
        assert_eq!(candidate.chain.len(), 5);
    }

    #[actix_web::test]
    async fn no_longer_chain_means_no_candidate() {
        let source = FakePeers::default()
            .with("a:1", valid_chain(2))
            .with("b:2", valid_chain(3));

        let found = resolve(3, &peers(&["a:1", "b:2", "dead:9"]), &source, &POW).await;
        assert!(found.is_none());
    }

    #[actix_web::test]
    async fn unreachable_peers_do_not_block_resolution() {
        let source = FakePeers::default().with("b:2", valid_chain(4));

        let candidate = resolve(1, &peers(&["a:1", "b:2"]), &source, &POW)
            .await
            .unwrap();
        assert_eq!(candidate.peer, "b:2");
    }

    #[test]
    fn first_peer_wins_at_equal_length() {
        let responses = vec![
            ("a:1".to_string(), Ok(ChainSnapshot::new(valid_chain(4)))),
            ("b:2".to_string(), Ok(ChainSnapshot::new(valid_chain(4)))),
        ];
        let candidate = select_longest(2, responses, &POW).unwrap();
        assert_eq!(candidate.peer, "a:1");
    }

    #[test]
    fn lying_about_length_is_invalid() {
        let mut snapshot = ChainSnapshot::new(valid_chain(3));
        snapshot.length = 8;
        let responses = vec![("a:1".to_string(), Ok(snapshot))];
        assert!(select_longest(2, responses, &POW).is_none());
    }
}
