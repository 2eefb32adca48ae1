use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::blockchain::Block;
use crate::error::{Error, Result};

/// Path every node serves its chain on.
pub const CHAIN_PATH: &str = "/api/v1/chain/";

/// Largest chain body accepted from a peer.
const MAX_CHAIN_BYTES: usize = 32 * 1024 * 1024;

/// `{chain, length}` as served on `CHAIN_PATH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl ChainSnapshot {
    pub fn new(chain: Vec<Block>) -> Self {
        let length = chain.len();
        Self { chain, length }
    }
}

/// Somewhere peer chains can be fetched from.
#[allow(async_fn_in_trait)]
pub trait ChainSource {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot>;
}

/// Fetches peer chains over HTTP with a per-request timeout.
pub struct HttpChainSource {
    client: awc::Client,
}

impl HttpChainSource {
    pub fn new(timeout: Duration) -> Self {
        let client = awc::Client::builder().timeout(timeout).finish();
        Self { client }
    }
}

impl ChainSource for HttpChainSource {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot> {
        let unreachable = |reason: String| Error::PeerUnreachable {
            peer: peer.to_string(),
            reason,
        };

        let url = format!("http://{peer}{CHAIN_PATH}");
        debug!("PEER - GET {url}");
        let mut response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(unreachable(format!("HTTP {}", response.status())));
        }

        response
            .json::<ChainSnapshot>()
            .limit(MAX_CHAIN_BYTES)
            .await
            .map_err(|e| unreachable(format!("undecodable chain: {e}")))
    }
}
