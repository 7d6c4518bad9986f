//! Connection registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::connection::ClientConnection;

/// Registry of live WebSocket connections, keyed by connection ID.
#[derive(Default)]
pub struct Gateway {
    connections: RwLock<HashMap<String, Arc<ClientConnection>>>,
}

impl Gateway {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection.
    pub fn add(&self, conn: Arc<ClientConnection>) {
        let _ = self
            .connections
            .write()
            .insert(conn.id.clone(), conn);
    }

    /// Remove a connection by ID. Idempotent.
    pub fn remove(&self, id: &str) -> Option<Arc<ClientConnection>> {
        self.connections.write().remove(id)
    }

    /// Look up a connection by ID.
    pub fn get(&self, id: &str) -> Option<Arc<ClientConnection>> {
        self.connections.read().get(id).cloned()
    }

    /// Number of live connections.
    pub fn count(&self) -> usize {
        self.connections.read().len()
    }
}
