use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::blockchain::Block;
use crate::node::Node;

/// Shared application state: the node plus transport-level settings.
pub struct AppState {
    pub node: Node,
    pub peer_timeout: Duration,
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    #[serde(flatten)]
    pub block: Block,
}

/* ---------- TX API Models ---------- */

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

/* ---------- Nodes API Models ---------- */

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct ConnectResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub replaced: bool,
    pub message: String,
    pub chain: Vec<Block>,
}
