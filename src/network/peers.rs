use actix_web::http::Uri;
use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// Known peer addresses, stored as `host[:port]`.
///
/// Kept ordered so that consensus visits peers in lexicographic order and
/// ties between equally long chains always go to the smallest address.
#[derive(Debug, Default, Clone)]
pub struct PeerSet {
    peers: BTreeSet<String>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `http://host:port/path` or bare `host:port` down to its authority.
    pub fn normalize(address: &str) -> Result<String> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(Error::MalformedInput("empty peer address".into()));
        }

        let uri: Uri = trimmed
            .parse()
            .map_err(|e| Error::MalformedInput(format!("invalid peer address {trimmed:?}: {e}")))?;
        match uri.authority() {
            Some(authority) if !authority.host().is_empty() => {
                Ok(authority.as_str().to_ascii_lowercase())
            }
            _ => Err(Error::MalformedInput(format!(
                "peer address {trimmed:?} has no host"
            ))),
        }
    }

    /// Register one address; returns false if it was already known.
    pub fn register(&mut self, address: &str) -> Result<bool> {
        let normalized = Self::normalize(address)?;
        Ok(self.peers.insert(normalized))
    }

    /// Register a batch. Nothing is inserted unless every address normalizes.
    pub fn register_all<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<usize> {
        let normalized = addresses
            .iter()
            .map(|a| Self::normalize(a.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(normalized
            .into_iter()
            .filter(|peer| self.peers.insert(peer.clone()))
            .count())
    }

    /// Number of distinct peers.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Owned copy of every address, in lexicographic order.
    pub fn to_vec(&self) -> Vec<String> {
        self.peers.iter().cloned().collect()
    }
}
