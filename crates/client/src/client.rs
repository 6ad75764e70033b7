//! The core client: holds the account identity and posting key, turns
//! actions into signed transactions, and broadcasts them.

use heisenberg_chain::{
    Authority, CustomJson, Node, Operation, PrivateKey, RpcClient, TransactionBuilder,
};
use tracing::debug;

use crate::action::{Action, HeistInvestment};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::transaction::Transaction;

/// The game client.
///
/// One instance per session: credentials are fixed at construction and the
/// node handle is reused across broadcasts. Broadcasts through a single
/// instance are meant to run one at a time — callers wanting concurrency
/// use one instance per task.
#[derive(Debug)]
pub struct Heisenberg<N = RpcClient> {
    account: String,
    key: PrivateKey,
    node: N,
}

impl Heisenberg {
    /// Connects against the default public endpoints.
    pub fn new(account: impl Into<String>, private_posting_key: &str) -> Result<Self, Error> {
        Self::with_config(account, private_posting_key, &ClientConfig::default())
    }

    /// Connects against an explicit endpoint list.
    pub fn with_config(
        account: impl Into<String>,
        private_posting_key: &str,
        config: &ClientConfig,
    ) -> Result<Self, Error> {
        let node = RpcClient::new(config.nodes.clone()).map_err(Error::configuration)?;
        Self::with_node(account, private_posting_key, node)
    }
}

impl<N> Heisenberg<N>
where
    N: Node,
    N::Error: Send + Sync + 'static,
{
    /// Builds a client over any node implementation — the hook for test
    /// doubles and custom transports.
    pub fn with_node(
        account: impl Into<String>,
        private_posting_key: &str,
        node: N,
    ) -> Result<Self, Error> {
        let key = PrivateKey::from_wif(private_posting_key).map_err(Error::configuration)?;

        Ok(Self {
            account: account.into(),
            key,
            node,
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// Invests `amount` of in-game currency into the daily heist.
    ///
    /// The action is always bound to this client's own account.
    pub async fn heist(&self, amount: impl Into<String>) -> Result<Transaction, Error> {
        let action = HeistInvestment::new(self.account.clone(), amount);
        self.broadcast(&action).await
    }

    /// Signs and broadcasts an action, returning once the node confirms
    /// inclusion.
    ///
    /// Every successful call mutates chain state; nothing here dedupes or
    /// retries a submission, so double-submitting is the caller's to avoid.
    pub async fn broadcast(&self, action: &impl Action) -> Result<Transaction, Error> {
        let payload = action.to_transaction()?;

        debug!(account = %self.account, id = %payload.id, "broadcasting action");

        let op = Operation::CustomJson(CustomJson {
            required_auths: Vec::new(),
            required_posting_auths: vec![self.account.clone()],
            id: payload.id,
            json: payload.json,
        });

        let props = self
            .node
            .dynamic_global_properties()
            .await
            .map_err(Error::broadcast)?;

        let mut builder = TransactionBuilder::new(&props).map_err(Error::broadcast)?;
        builder.append_op(op);
        builder.append_signer(&self.account, Authority::Posting);

        let trx = builder.sign(&[&self.key]).map_err(Error::Signing)?;

        let response = self
            .node
            .broadcast_transaction_synchronous(&trx)
            .await
            .map_err(Error::broadcast)?;

        debug!(id = ?response.id, block_num = ?response.block_num, "transaction included");

        Ok(Transaction::new(response.id, response.block_num))
    }
}
