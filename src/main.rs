mod api;
mod blockchain;
mod config;
mod error;
mod network;
mod node;
mod transaction;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use api::AppState;
use blockchain::{ProofOfWork, Reward};
use config::NodeConfig;
use node::Node;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env().map_err(std::io::Error::other)?;

    // Raised on Ctrl-C so an in-flight proof search gives up instead of
    // holding up graceful shutdown.
    let shutdown = Arc::new(AtomicBool::new(false));
    let signal_flag = shutdown.clone();
    actix_web::rt::spawn(async move {
        if actix_web::rt::signal::ctrl_c().await.is_ok() {
            warn!("shutdown requested, cancelling any running proof search");
            signal_flag.store(true, Ordering::Relaxed);
        }
    });

    let reward = Reward {
        sender: config.node_address.clone(),
        receiver: config.reward_receiver.clone(),
        amount: config.reward_amount,
    };
    let node = Node::new(ProofOfWork::new(config.difficulty), reward, shutdown);
    if !config.peers.is_empty() {
        node.register_peers(&config.peers)
            .map_err(std::io::Error::other)?;
    }

    info!(
        "Starting ledger node {} at http://{}:{} (difficulty={}, peers={})",
        config.node_address,
        config.host,
        config.port,
        config.difficulty,
        config.peers.len()
    );

    let state = web::Data::new(AppState {
        node,
        peer_timeout: config.peer_timeout,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
