//! Connection registry
//!
//! Ordered set of open chat connections. Each connection is represented by
//! the sending half of its outbound channel; a writer task per connection
//! drains the other half into the WebSocket.
//!
//! Locks are never held across an await point, so the registry can be used
//! from any task and from `Drop`.

use crate::chat::error::ChatError;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Unique identifier for a chat connection
pub type ConnectionId = Uuid;

/// One open chat connection
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    remote: String,
    sender: mpsc::UnboundedSender<String>,
}

impl Connection {
    /// Create a connection and the receiver its writer task should drain
    ///
    /// # Arguments
    /// * `remote` - Remote endpoint, for logging only
    pub fn channel(remote: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let connection = Self {
            id: Uuid::new_v4(),
            remote: remote.into(),
            sender,
        };
        (connection, receiver)
    }

    /// Connection id
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

/// Registry of open chat connections
///
/// A send that fails during broadcast removes that connection and delivery
/// continues to the others.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<RwLock<Vec<Connection>>>,
}

impl ConnectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection
    ///
    /// Returns false (and changes nothing) if the id is already registered.
    pub fn register(&self, connection: Connection) -> bool {
        let mut connections = self.write();
        if connections.iter().any(|c| c.id == connection.id) {
            return false;
        }
        debug!(
            connection_id = %connection.id,
            remote = %connection.remote,
            "Registering chat connection"
        );
        connections.push(connection);
        true
    }

    /// Remove a connection
    ///
    /// Idempotent; returns true only if the connection was present.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        let mut connections = self.write();
        let before = connections.len();
        connections.retain(|c| c.id != id);
        let removed = connections.len() != before;
        if removed {
            debug!(connection_id = %id, "Unregistered chat connection");
        }
        removed
    }

    /// Deliver text to exactly one connection
    ///
    /// # Errors
    /// * `ChatError::UnknownConnection` if the id is not registered
    /// * `ChatError::ConnectionClosed` if the connection's writer is gone
    pub fn send_to(&self, id: ConnectionId, text: &str) -> Result<(), ChatError> {
        let sender = self
            .read()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.sender.clone())
            .ok_or(ChatError::UnknownConnection(id))?;

        sender
            .send(text.to_string())
            .map_err(|_| ChatError::ConnectionClosed(id))
    }

    /// Deliver text to every registered connection, in registry order
    ///
    /// Membership is snapshotted when the broadcast starts. Connections whose
    /// send fails are removed.
    ///
    /// # Returns
    /// * `usize` - Number of connections the text was delivered to
    pub fn broadcast(&self, text: &str) -> usize {
        let snapshot: Vec<(ConnectionId, mpsc::UnboundedSender<String>)> = self
            .read()
            .iter()
            .map(|c| (c.id, c.sender.clone()))
            .collect();

        let mut delivered = 0;
        let mut failed = Vec::new();
        for (id, sender) in snapshot {
            if sender.send(text.to_string()).is_ok() {
                delivered += 1;
            } else {
                warn!(connection_id = %id, "Broadcast to closed connection, removing it");
                failed.push(id);
            }
        }

        if !failed.is_empty() {
            self.write().retain(|c| !failed.contains(&c.id));
        }
        delivered
    }

    /// Number of registered connections
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no connection is registered
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Whether the id is registered
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.read().iter().any(|c| c.id == id)
    }

    // A poisoned lock still holds a consistent Vec: every mutation is a
    // single push or retain.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Connection>> {
        self.connections.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Connection>> {
        self.connections.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Unregisters a connection when dropped
///
/// Guarantees cleanup on every exit from a connection's handler, including
/// panics and cancellation.
#[derive(Debug)]
pub struct RegistrationGuard {
    registry: ConnectionRegistry,
    id: ConnectionId,
}

impl RegistrationGuard {
    /// Guard the given registration
    pub fn new(registry: ConnectionRegistry, id: ConnectionId) -> Self {
        Self { registry, id }
    }
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered(registry: &ConnectionRegistry) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (connection, rx) = Connection::channel("127.0.0.1:5000");
        let id = connection.id();
        assert!(registry.register(connection));
        (id, rx)
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let registry = ConnectionRegistry::new();
        let (connection, _rx) = Connection::channel("a");
        assert!(registry.register(connection.clone()));
        assert!(!registry.register(connection));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let registry = ConnectionRegistry::new();
        let (id, _rx) = registered(&registry);
        let (other, _other_rx) = registered(&registry);

        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(other));
        assert!(!registry.contains(id));
    }

    #[test]
    fn test_broadcast_reaches_all_in_order() {
        let registry = ConnectionRegistry::new();
        let (_, mut a) = registered(&registry);
        let (_, mut b) = registered(&registry);

        assert_eq!(registry.broadcast("one"), 2);
        assert_eq!(registry.broadcast("two"), 2);

        for rx in [&mut a, &mut b] {
            assert_eq!(rx.try_recv().unwrap(), "one");
            assert_eq!(rx.try_recv().unwrap(), "two");
            assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn test_broadcast_removes_closed_connections() {
        let registry = ConnectionRegistry::new();
        let (_, mut a) = registered(&registry);
        let (closed, closed_rx) = registered(&registry);
        let (_, mut c) = registered(&registry);
        drop(closed_rx);

        assert_eq!(registry.broadcast("hello"), 2);
        assert_eq!(a.try_recv().unwrap(), "hello");
        assert_eq!(c.try_recv().unwrap(), "hello");
        assert!(!registry.contains(closed));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_send_to_targets_one_connection() {
        let registry = ConnectionRegistry::new();
        let (a_id, mut a) = registered(&registry);
        let (_, mut b) = registered(&registry);

        registry.send_to(a_id, "private").unwrap();
        assert_eq!(a.try_recv().unwrap(), "private");
        assert!(b.try_recv().is_err());
    }

    #[test]
    fn test_send_to_errors() {
        let registry = ConnectionRegistry::new();
        let unknown = Uuid::new_v4();
        assert!(matches!(
            registry.send_to(unknown, "x"),
            Err(ChatError::UnknownConnection(id)) if id == unknown
        ));

        let (id, rx) = registered(&registry);
        drop(rx);
        assert!(matches!(
            registry.send_to(id, "x"),
            Err(ChatError::ConnectionClosed(_))
        ));
    }

    #[test]
    fn test_guard_unregisters_on_drop() {
        let registry = ConnectionRegistry::new();
        let (id, _rx) = registered(&registry);
        {
            let _guard = RegistrationGuard::new(registry.clone(), id);
            assert!(registry.contains(id));
        }
        assert!(registry.is_empty());
    }
}
