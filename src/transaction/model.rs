use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::{Error, Result};

/// A value transfer queued into the ledger. Balances are not checked.
///
/// `amount` is any JSON number (negative and fractional included) and is
/// hashed in the exact form it was received in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: Number,
}

impl Transaction {
    pub fn new(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: impl Into<Number>,
    ) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount: amount.into(),
        }
    }
}

/// Transaction submission as received from a caller; any field may be absent.
/// A non-numeric `amount` fails to deserialize at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionRequest {
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub amount: Option<Number>,
}

impl TransactionRequest {
    /// Turn the request into a `Transaction`, naming every missing field on failure.
    pub fn into_transaction(self) -> Result<Transaction> {
        let mut missing = Vec::new();
        if self.sender.is_none() {
            missing.push("sender");
        }
        if self.receiver.is_none() {
            missing.push("receiver");
        }
        if self.amount.is_none() {
            missing.push("amount");
        }

        match (self.sender, self.receiver, self.amount) {
            (Some(sender), Some(receiver), Some(amount)) => Ok(Transaction {
                sender,
                receiver,
                amount,
            }),
            _ => Err(Error::MalformedInput(format!(
                "missing field(s): {}",
                missing.join(", ")
            ))),
        }
    }
}
