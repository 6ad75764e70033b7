//! The broadcast result record.

use serde::{Deserialize, Serialize};

/// What the chain reported back for a broadcast action: the transaction id
/// and the block it landed in. Nodes may omit either field; absence is not
/// an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Option<String>,
    pub block_num: Option<u64>,
}

impl Transaction {
    pub(crate) const fn new(id: Option<String>, block_num: Option<u64>) -> Self {
        Self { id, block_num }
    }
}
