//! The client's error taxonomy.

use core::error::Error as CoreError;

use heisenberg_chain::SignError;
use thiserror::Error;

use crate::action::EncodingError;

type Cause = Box<dyn CoreError + Send + Sync>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Malformed credentials or an unusable endpoint set, caught at
    /// construction time.
    #[error("invalid client configuration: {0}")]
    Configuration(#[source] Cause),

    /// An action failed to produce its operation payload. Raised before
    /// any network traffic.
    #[error("failed to encode action: {0}")]
    Encoding(#[from] EncodingError),

    /// Local signing failed. The transaction never left the process.
    #[error("failed to sign transaction: {0}")]
    Signing(#[source] SignError),

    /// The node could not be reached, rejected the transaction, or
    /// returned an unusable response.
    #[error("failed to broadcast transaction: {0}")]
    Broadcast(#[source] Cause),
}

impl Error {
    pub(crate) fn configuration(err: impl CoreError + Send + Sync + 'static) -> Self {
        Self::Configuration(Box::new(err))
    }

    pub(crate) fn broadcast(err: impl CoreError + Send + Sync + 'static) -> Self {
        Self::Broadcast(Box::new(err))
    }
}
