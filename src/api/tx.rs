use actix_web::{HttpResponse, post, web};
use log::{debug, warn};

use super::models::{AppState, NewTxResponse};
use crate::transaction::TransactionRequest;

/// Queue a transaction for the next mined block.
#[post("/transactions/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<TransactionRequest>,
) -> actix_web::Result<HttpResponse> {
    let index = state
        .node
        .submit_transaction(body.into_inner())
        .inspect_err(|e| warn!("POST /transactions/ - rejected: {e}"))?;

    debug!("POST /transactions/ - queued for block #{index}");
    Ok(HttpResponse::Created().json(NewTxResponse {
        message: format!("This transaction will be added to block {index}"),
        index,
    }))
}
