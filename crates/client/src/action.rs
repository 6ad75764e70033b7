//! In-game actions and their wire payloads.
//!
//! An [`Action`] converts itself into the `{id, json}` pair the chain's
//! custom-data operation carries; the broadcaster never looks inside an
//! action beyond that contract. New gameplay actions are new types
//! implementing the trait — the broadcaster does not change.

use serde::Serialize;
use thiserror::Error;

/// The custom_json id of the heist-invest action.
pub const HEIST_OPERATION_ID: &str = "dw-heist";

#[derive(Debug, Error)]
#[error("action payload is not serializable: {0}")]
pub struct EncodingError(#[from] serde_json::Error);

/// The operation payload an action encodes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionPayload {
    pub id: String,
    pub json: String,
}

/// One in-game operation, encodable to exactly one operation payload.
pub trait Action {
    fn to_transaction(&self) -> Result<ActionPayload, EncodingError>;
}

/// Invests in-game currency into the daily heist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeistInvestment {
    #[serde(rename = "username")]
    account: String,
    amount: String,
}

impl HeistInvestment {
    /// The amount is passed through opaquely; whether it names a valid
    /// quantity is the game backend's call, surfaced at broadcast time.
    pub fn new(account: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            amount: amount.into(),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }
}

impl Action for HeistInvestment {
    fn to_transaction(&self) -> Result<ActionPayload, EncodingError> {
        Ok(ActionPayload {
            id: HEIST_OPERATION_ID.to_owned(),
            json: serde_json::to_string(self)?,
        })
    }
}
