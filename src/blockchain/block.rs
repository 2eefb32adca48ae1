use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A sealed block. Blocks are never edited once appended to a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp in milliseconds (UTC)
    pub transactions: Vec<Transaction>,
    pub proof: i64,
    pub previous_hash: String,
}

impl Block {
    /// Create the genesis block (index 1, fixed proof and previous hash).
    pub fn genesis() -> Self {
        Self::new(1, GENESIS_PROOF, GENESIS_PREVIOUS_HASH.to_string(), Vec::new())
    }

    pub fn new(index: u64, proof: i64, previous_hash: String, transactions: Vec<Transaction>) -> Self {
        Self {
            index,
            timestamp: Utc::now().timestamp_millis(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// SHA-256 over the canonical encoding, hex encoded.
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_bytes());
        hex::encode(hasher.finalize())
    }

    /// Compact JSON with keys sorted at every level, independent of how
    /// `serde_json` happens to order its maps.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let transactions: Vec<Value> = self
            .transactions
            .iter()
            .map(|tx| {
                serde_json::json!({
                    "sender": tx.sender,
                    "receiver": tx.receiver,
                    "amount": tx.amount,
                })
            })
            .collect();
        let value = serde_json::json!({
            "index": self.index,
            "timestamp": self.timestamp,
            "transactions": transactions,
            "proof": self.proof,
            "previous_hash": self.previous_hash,
        });

        let mut out = String::new();
        write_canonical(&value, &mut out);
        out.into_bytes()
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(&Value::String(key.clone()), out);
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        // Scalars already have a single compact JSON form.
        scalar => out.push_str(&scalar.to_string()),
    }
}
