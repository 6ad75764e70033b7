//! The node-facing surface: a JSON-RPC 2.0 client over HTTP and the
//! [`Node`] trait it implements, which is the seam test doubles stand in
//! behind.

use core::error::Error as CoreError;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::transaction::SignedTransaction;

const GET_DYNAMIC_GLOBAL_PROPERTIES: &str = "condenser_api.get_dynamic_global_properties";
const BROADCAST_TRANSACTION_SYNCHRONOUS: &str =
    "condenser_api.broadcast_transaction_synchronous";

/// What a broadcaster needs from a node.
///
/// `broadcast_transaction_synchronous` must return only once the
/// transaction is included in a block (or the node rejects it) — that is
/// the node-side contract of the RPC it names.
pub trait Node {
    type Error: CoreError;

    #[expect(async_fn_in_trait, reason = "Should be fine")]
    async fn dynamic_global_properties(&self) -> Result<DynamicGlobalProperties, Self::Error>;

    #[expect(async_fn_in_trait, reason = "Should be fine")]
    async fn broadcast_transaction_synchronous(
        &self,
        trx: &SignedTransaction,
    ) -> Result<BroadcastResponse, Self::Error>;
}

/// The slice of `get_dynamic_global_properties` a transaction needs.
#[derive(Clone, Debug, Deserialize)]
pub struct DynamicGlobalProperties {
    pub head_block_number: u64,
    pub head_block_id: String,
    pub time: String,
}

/// What the node reports back for an included transaction. Nodes may omit
/// either field.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BroadcastResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub block_num: Option<u64>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RpcError {
    #[error("no node endpoints configured")]
    NoNodes,
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("node rejected the request with code {code}: {message}")]
    Node { code: i64, message: String },
    #[error("invalid response from node while calling `{0}`")]
    InvalidResponse(&'static str),
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct RpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// JSON-RPC client over a prioritized node list.
///
/// Endpoints are tried in order: a transport failure moves on to the next
/// node, a node-level rejection is returned as-is (rejections are
/// deterministic, connectivity is not).
#[derive(Debug)]
pub struct RpcClient {
    client: reqwest::Client,
    nodes: Vec<Url>,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(nodes: Vec<Url>) -> Result<Self, RpcError> {
        if nodes.is_empty() {
            return Err(RpcError::NoNodes);
        }

        Ok(Self {
            client: reqwest::Client::new(),
            nodes,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn nodes(&self) -> &[Url] {
        &self.nodes
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<R, RpcError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let mut connectivity = None;
        for node in &self.nodes {
            match self.call_node(node, &request).await {
                Ok(result) => return Ok(result),
                Err(RpcError::Transport(err)) => {
                    debug!(%node, %err, "node unreachable, trying next endpoint");
                    connectivity = Some(RpcError::Transport(err));
                }
                Err(err) => return Err(err),
            }
        }

        Err(connectivity.unwrap_or(RpcError::NoNodes))
    }

    async fn call_node<R: DeserializeOwned>(
        &self,
        node: &Url,
        request: &RpcRequest,
    ) -> Result<R, RpcError> {
        let response: RpcResponse = self
            .client
            .post(node.clone())
            .json(request)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(RpcError::Node {
                code: error.code,
                message: error.message,
            });
        }

        let result = response
            .result
            .ok_or(RpcError::InvalidResponse(request.method))?;

        serde_json::from_value(result).map_err(|_| RpcError::InvalidResponse(request.method))
    }
}

impl Node for RpcClient {
    type Error = RpcError;

    async fn dynamic_global_properties(&self) -> Result<DynamicGlobalProperties, RpcError> {
        self.call(GET_DYNAMIC_GLOBAL_PROPERTIES, Value::Array(Vec::new()))
            .await
    }

    async fn broadcast_transaction_synchronous(
        &self,
        trx: &SignedTransaction,
    ) -> Result<BroadcastResponse, RpcError> {
        let params = Value::Array(vec![serde_json::to_value(trx)?]);
        self.call(BROADCAST_TRANSACTION_SYNCHRONOUS, params).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_envelope_is_jsonrpc_2() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: GET_DYNAMIC_GLOBAL_PROPERTIES,
            params: Value::Array(Vec::new()),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "condenser_api.get_dynamic_global_properties",
                "params": [],
            })
        );
    }

    #[test]
    fn broadcast_response_tolerates_missing_fields() {
        let full: BroadcastResponse =
            serde_json::from_value(json!({"id": "abc123", "block_num": 42})).unwrap();
        assert_eq!(full.id.as_deref(), Some("abc123"));
        assert_eq!(full.block_num, Some(42));

        let partial: BroadcastResponse = serde_json::from_value(json!({"id": "abc123"})).unwrap();
        assert_eq!(partial.block_num, None);

        let empty: BroadcastResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.id, None);
        assert_eq!(empty.block_num, None);
    }

    #[test]
    fn node_errors_deserialize_with_code_and_message() {
        let response: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32000, "message": "missing required posting authority"},
        }))
        .unwrap();

        let body = response.error.unwrap();
        assert_eq!(body.code, -32000);
        assert_eq!(body.message, "missing required posting authority");
        assert!(response.result.is_none());
    }

    #[test]
    fn empty_node_list_is_a_configuration_error() {
        assert!(matches!(RpcClient::new(Vec::new()), Err(RpcError::NoNodes)));
    }
}
