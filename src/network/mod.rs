pub mod client;
pub mod consensus;
pub mod peers;

pub use client::{ChainSnapshot, ChainSource, HttpChainSource};
pub use peers::PeerSet;
