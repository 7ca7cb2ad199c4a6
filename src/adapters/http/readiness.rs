use std::future::Future;
use tokio::sync::OnceCell;

use crate::domain::errors::GatewayError;
use crate::domain::models::tool::ClientInfo;

/// Lazily runs a session's one-time setup
///
/// Concurrent first requests wait for a single setup attempt. A failed
/// attempt is not remembered, so the next request tries again.
pub struct Readiness {
    client: ClientInfo,
    ready: OnceCell<()>,
}

impl Readiness {
    pub fn new(client: ClientInfo) -> Self {
        Self {
            client,
            ready: OnceCell::new(),
        }
    }

    pub async fn ensure<F, Fut>(&self, setup: F) -> Result<(), GatewayError>
    where
        F: FnOnce(ClientInfo) -> Fut,
        Fut: Future<Output = Result<(), GatewayError>>,
    {
        self.ready
            .get_or_try_init(|| setup(self.client.clone()))
            .await
            .map(|_| ())
    }
}
