use std::env;
use std::str::FromStr;
use std::time::Duration;

use uuid::Uuid;

use crate::blockchain::{DEFAULT_DIFFICULTY, DEFAULT_REWARD};
use crate::error::{Error, Result};

const MAX_DIFFICULTY: u32 = 16;

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
    pub reward_amount: u64,
    pub reward_receiver: String,
    /// Identity used as the sender of mining rewards.
    pub node_address: String,
    pub peer_timeout: Duration,
    pub peers: Vec<String>,
}

impl NodeConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or(&lookup, "PORT", 5000u16)?;

        let difficulty = parse_or(&lookup, "POW_DIFFICULTY", DEFAULT_DIFFICULTY)?;
        if !(1..=MAX_DIFFICULTY).contains(&difficulty) {
            return Err(Error::Config(
                "POW_DIFFICULTY",
                format!("{difficulty} is outside 1..={MAX_DIFFICULTY}"),
            ));
        }

        let reward_amount = parse_or(&lookup, "MINING_REWARD", DEFAULT_REWARD)?;
        let reward_receiver = lookup("REWARD_RECEIVER").unwrap_or_else(|| "miner".to_string());
        let node_address = lookup("NODE_ADDRESS")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        let peer_timeout = Duration::from_millis(parse_or(&lookup, "PEER_TIMEOUT_MS", 3_000u64)?);

        let peers = lookup("PEERS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            difficulty,
            reward_amount,
            reward_receiver,
            node_address,
            peer_timeout,
            peers,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| Error::Config(key, format!("{raw:?}: {e}"))),
        None => Ok(default),
    }
}
