use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

use super::types::ServerFrame;

pub type WsSender = mpsc::UnboundedSender<ServerFrame>;

struct UserConnection {
    id: u64,
    tx: WsSender,
    subscriptions: HashSet<String>,
}

/// Registry of authenticated WebSocket connections, keyed by user id. A
/// user may hold several connections (multiple tabs/devices); each tracks
/// its own subscription set. Single-node broker: delivery never crosses
/// process boundaries.
#[derive(Clone)]
pub struct ConnectionManager {
    connections: Arc<DashMap<i64, Vec<UserConnection>>>,
    next_id: Arc<AtomicU64>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a connection for `user_id` and return its connection id.
    pub fn register(&self, user_id: i64, tx: WsSender) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.connections.entry(user_id).or_default().push(UserConnection {
            id,
            tx,
            subscriptions: HashSet::new(),
        });
        id
    }

    pub fn unregister(&self, user_id: i64, connection_id: u64) {
        if let Some(mut entry) = self.connections.get_mut(&user_id) {
            entry.retain(|conn| conn.id != connection_id);
            if entry.is_empty() {
                drop(entry);
                self.connections.remove_if(&user_id, |_, conns| conns.is_empty());
            }
        }
    }

    pub fn subscribe(&self, user_id: i64, connection_id: u64, destination: &str) {
        if let Some(mut entry) = self.connections.get_mut(&user_id) {
            if let Some(conn) = entry.iter_mut().find(|c| c.id == connection_id) {
                conn.subscriptions.insert(destination.to_string());
            }
        }
    }

    pub fn unsubscribe(&self, user_id: i64, connection_id: u64, destination: &str) {
        if let Some(mut entry) = self.connections.get_mut(&user_id) {
            if let Some(conn) = entry.iter_mut().find(|c| c.id == connection_id) {
                conn.subscriptions.remove(destination);
            }
        }
    }

    /// Deliver a frame to every connection of `user_id` subscribed to
    /// `destination`. Returns how many connections it reached. Send errors
    /// mean the receiving task is already gone; cleanup happens on
    /// unregister.
    pub fn send_to_user(&self, user_id: i64, destination: &str, frame: &ServerFrame) -> usize {
        let mut delivered = 0;
        if let Some(entry) = self.connections.get(&user_id) {
            for conn in entry.iter() {
                if conn.subscriptions.contains(destination) && conn.tx.send(frame.clone()).is_ok() {
                    delivered += 1;
                }
            }
        }
        delivered
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (WsSender, mpsc::UnboundedReceiver<ServerFrame>) {
        mpsc::unbounded_channel()
    }

    #[test]
    fn test_delivery_requires_subscription() {
        let manager = ConnectionManager::new();
        let (tx, mut rx) = channel();
        let conn_id = manager.register(3, tx);

        let frame = ServerFrame::Subscribed {
            destination: "/user/queue/rooms.10".to_string(),
        };

        assert_eq!(manager.send_to_user(3, "/user/queue/rooms.10", &frame), 0);

        manager.subscribe(3, conn_id, "/user/queue/rooms.10");
        assert_eq!(manager.send_to_user(3, "/user/queue/rooms.10", &frame), 1);
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_delivery_is_private_to_the_user() {
        let manager = ConnectionManager::new();
        let (tx_a, mut rx_a) = channel();
        let (tx_b, mut rx_b) = channel();
        let conn_a = manager.register(3, tx_a);
        let conn_b = manager.register(7, tx_b);

        manager.subscribe(3, conn_a, "/user/queue/rooms.10");
        manager.subscribe(7, conn_b, "/user/queue/rooms.10");

        let frame = ServerFrame::Subscribed {
            destination: "/user/queue/rooms.10".to_string(),
        };
        assert_eq!(manager.send_to_user(3, "/user/queue/rooms.10", &frame), 1);

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn test_unregister_stops_delivery() {
        let manager = ConnectionManager::new();
        let (tx, _rx) = channel();
        let conn_id = manager.register(3, tx);
        manager.subscribe(3, conn_id, "/user/queue/rooms.list");

        manager.unregister(3, conn_id);

        let frame = ServerFrame::Subscribed {
            destination: "/user/queue/rooms.list".to_string(),
        };
        assert_eq!(manager.send_to_user(3, "/user/queue/rooms.list", &frame), 0);
    }

    #[test]
    fn test_multiple_connections_per_user() {
        let manager = ConnectionManager::new();
        let (tx1, mut rx1) = channel();
        let (tx2, mut rx2) = channel();
        let conn1 = manager.register(3, tx1);
        let conn2 = manager.register(3, tx2);

        manager.subscribe(3, conn1, "/user/queue/rooms.list");
        manager.subscribe(3, conn2, "/user/queue/rooms.list");

        let frame = ServerFrame::Subscribed {
            destination: "/user/queue/rooms.list".to_string(),
        };
        assert_eq!(manager.send_to_user(3, "/user/queue/rooms.list", &frame), 2);
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }
}
