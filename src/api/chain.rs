use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::models::{AppState, MineResponse, ValidateResponse};

/// Get the full blockchain. Peers read this during consensus.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.node.chain())
}

/// Validate the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let (valid, length) = state.node.audit();
    HttpResponse::Ok().json(ValidateResponse { valid, length })
}

/// Mine a block from the pending buffer plus the reward transaction.
/// The proof search runs on the blocking pool, off the worker thread.
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> actix_web::Result<HttpResponse> {
    let node_state = state.clone();
    let block = web::block(move || node_state.node.mine()).await??;

    info!("POST /mine/ - block #{} mined", block.index);
    Ok(HttpResponse::Ok().json(MineResponse {
        message: format!("Block #{} mined", block.index),
        block,
    }))
}
