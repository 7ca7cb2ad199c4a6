//! Client registry
//!
//! Builds one session per active, command-based server entry and indexes it
//! under its config key and its lowercased display name.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::models::mcp_server::{ServerDescriptor, TransportKind};
use crate::domain::ports::mcp_client::{McpError, SessionFactory, ToolSession};

/// Owned set of tool sessions, keyed for lookup
///
/// Built once at startup and torn down once at shutdown through
/// [`ClientRegistry::close_all`]; teardown is not meant to race with lookups.
#[derive(Default)]
pub struct ClientRegistry {
    entries: BTreeMap<String, Arc<dyn ToolSession>>,
    sessions: Vec<Arc<dyn ToolSession>>,
}

impl ClientRegistry {
    /// Build sessions for every active descriptor
    ///
    /// Descriptors are processed in ascending key order. Inactive entries and
    /// entries with neither a command nor a base URL are skipped.
    ///
    /// # Errors
    /// - `McpError::UnsupportedTransport` when an active entry only has a base URL
    /// - any error returned by the factory
    ///
    /// Sessions created before the failure are closed first.
    pub async fn build(
        descriptors: &[ServerDescriptor],
        factory: &dyn SessionFactory,
    ) -> Result<Self, McpError> {
        let mut ordered: Vec<&ServerDescriptor> = descriptors.iter().collect();
        ordered.sort_by(|a, b| a.key.cmp(&b.key));

        let mut registry = Self::default();
        for descriptor in ordered {
            if let Err(e) = registry.add(descriptor, factory).await {
                registry.close_all().await;
                return Err(e);
            }
        }

        info!(
            sessions = registry.sessions.len(),
            keys = ?registry.keys(),
            "MCP client registry built"
        );
        Ok(registry)
    }

    async fn add(
        &mut self,
        descriptor: &ServerDescriptor,
        factory: &dyn SessionFactory,
    ) -> Result<(), McpError> {
        if !descriptor.is_active {
            debug!(key = %descriptor.key, "skipping inactive MCP server");
            return Ok(());
        }

        match descriptor.transport() {
            TransportKind::Stdio => {}
            TransportKind::Http => {
                return Err(McpError::UnsupportedTransport(descriptor.key.clone()));
            }
            TransportKind::Unreachable => {
                warn!(key = %descriptor.key, "MCP server has neither command nor baseUrl, skipping");
                return Ok(());
            }
        }

        let session = factory.connect(descriptor).await?;
        self.entries.insert(descriptor.key.clone(), Arc::clone(&session));
        if let Some(name_key) = descriptor.name_key() {
            self.entries
                .entry(name_key)
                .or_insert_with(|| Arc::clone(&session));
        }
        self.sessions.push(session);
        Ok(())
    }

    /// Find a session by key or display name
    ///
    /// Tries an exact match, then the lowercased query, then the first key
    /// (in ascending order) containing the lowercased query. When several
    /// keys contain the query, which one wins is unspecified; callers must
    /// not depend on it.
    pub fn find_by_key_or_name(&self, query: &str) -> Option<Arc<dyn ToolSession>> {
        if let Some(session) = self.entries.get(query) {
            return Some(Arc::clone(session));
        }
        let lower = query.to_lowercase();
        if let Some(session) = self.entries.get(&lower) {
            return Some(Arc::clone(session));
        }
        self.entries
            .iter()
            .find(|(key, _)| key.to_lowercase().contains(&lower))
            .map(|(_, session)| Arc::clone(session))
    }

    /// First session found among `candidates`, tried in order.
    pub fn find_first<S: AsRef<str>>(&self, candidates: &[S]) -> Option<Arc<dyn ToolSession>> {
        candidates
            .iter()
            .find_map(|candidate| self.find_by_key_or_name(candidate.as_ref()))
    }

    /// Close every session once, ignoring individual errors, and empty the registry.
    pub async fn close_all(&mut self) {
        self.entries.clear();
        for session in self.sessions.drain(..) {
            if let Err(e) = session.close().await {
                warn!(server_name = session.server_name(), error = %e, "error closing MCP session");
            }
        }
    }

    /// Number of lookup keys, aliases included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}
