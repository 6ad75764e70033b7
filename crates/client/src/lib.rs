//! Drugwars game client.
//!
//! The core surface for issuing in-game actions against a Steem-compatible
//! chain. An action encodes itself into a custom-data operation payload;
//! [`Heisenberg`] wraps that payload in a transaction, signs it with the
//! account's posting key, and broadcasts it synchronously — the call
//! returns once the node confirms inclusion, with the assigned transaction
//! id and block number.
//!
//! # Example
//!
//! This invests 420 ingame DRUGs into the daily heist:
//!
//! ```no_run
//! use heisenberg_client::Heisenberg;
//!
//! # async fn run() -> Result<(), heisenberg_client::Error> {
//! let client = Heisenberg::new("username", "<private posting key>")?;
//! let trx = client.heist("420").await?;
//!
//! println!("included in block {:?} as {:?}", trx.block_num, trx.id);
//! # Ok(())
//! # }
//! ```
//!
//! Broadcasting is not idempotent: every confirmed call changes game
//! state, and nothing in this crate retries or dedupes. Callers wanting
//! retries or timeouts wrap the call themselves.

pub mod action;
pub mod client;
pub mod config;
pub mod error;
pub mod transaction;


pub use action::{Action, ActionPayload, EncodingError, HeistInvestment, HEIST_OPERATION_ID};
pub use client::Heisenberg;
pub use config::{ClientConfig, DEFAULT_NODES};
pub use error::Error;
pub use transaction::Transaction;

// Re-export the chain-side seam so callers can supply their own node.
pub use heisenberg_chain::{Node, RpcClient};
pub use url::Url;
