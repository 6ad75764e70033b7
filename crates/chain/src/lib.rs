//! Chain-level plumbing for a Steem-compatible node.
//!
//! This crate is the SDK layer the game client drives: wallet-import-format
//! posting keys, graphene wire serialization, transaction assembly with
//! canonical recoverable signatures, and the condenser JSON-RPC surface
//! including the synchronous broadcast call that returns only once a
//! transaction is included in a block.
//!
//! Nothing in here knows about the game. Gameplay semantics live one crate
//! up, in `heisenberg-client`.

pub mod key;
pub mod operation;
pub mod rpc;
pub mod serializer;
pub mod transaction;

pub use key::{KeyError, PrivateKey, SignError};
pub use operation::{CustomJson, Operation};
pub use rpc::{BroadcastResponse, DynamicGlobalProperties, Node, RpcClient, RpcError};
pub use transaction::{
    Authority, SignedTransaction, TransactionBuilder, TxError, STEEM_CHAIN_ID,
};
// Re-export common types
pub use url::Url;
