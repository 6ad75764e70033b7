//! Client configuration.

use url::Url;

/// Public RPC endpoints tried in order.
pub const DEFAULT_NODES: &[&str] = &["https://api.steemit.com"];

/// Node endpoints for a client. Defaults to the public endpoint list;
/// overridable so tests and private deployments can point elsewhere.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub nodes: Vec<Url>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            nodes: DEFAULT_NODES
                .iter()
                .filter_map(|node| Url::parse(node).ok())
                .collect(),
        }
    }
}
