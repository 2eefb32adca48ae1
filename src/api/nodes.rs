use actix_web::{HttpResponse, get, post, web};

use super::models::{AppState, ConnectRequest, ConnectResponse, ResolveResponse};
use crate::error::Error;
use crate::network::HttpChainSource;

/// Register peer nodes, e.g. `{"nodes": ["http://127.0.0.1:5001"]}`.
#[post("/nodes/")]
pub async fn connect_nodes(
    state: web::Data<AppState>,
    body: web::Json<ConnectRequest>,
) -> actix_web::Result<HttpResponse> {
    let nodes = body
        .into_inner()
        .nodes
        .ok_or_else(|| Error::MalformedInput("missing field(s): nodes".into()))?;
    let total_nodes = state.node.register_peers(&nodes)?;

    Ok(HttpResponse::Created().json(ConnectResponse {
        message: format!("{} node(s) known to this ledger", total_nodes.len()),
        total_nodes,
    }))
}

/// Run a consensus round against every known peer.
#[get("/nodes/resolve/")]
pub async fn resolve_chain(state: web::Data<AppState>) -> HttpResponse {
    let source = HttpChainSource::new(state.peer_timeout);
    let resolution = state.node.resolve_consensus(&source).await;

    let message = if resolution.replaced {
        "The local chain was replaced by the longest valid peer chain"
    } else {
        "The local chain is already the longest valid chain"
    };
    HttpResponse::Ok().json(ResolveResponse {
        replaced: resolution.replaced,
        message: message.to_string(),
        chain: resolution.chain,
    })
}
