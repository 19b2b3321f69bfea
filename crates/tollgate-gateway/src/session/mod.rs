//! Session registry: `connection_id -> open socket`.
//!
//! The registry owns the per-connection allow context for the lifetime of
//! the socket. Later lifecycle events and callback pushes read the
//! connect-time context from here; nothing re-derives tenant identity after
//! connect. An entry exists only while the connection is in the Connected
//! state; removal is the Closed transition's bookkeeping.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;

/// One session's outbound queue sender.
#[derive(Clone)]
pub struct ConnectionHandle {
    pub tx: mpsc::Sender<Message>,
}

#[derive(Clone)]
struct SessionEntry {
    handle: ConnectionHandle,
    context: BTreeMap<String, String>,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, SessionEntry>,
    seq: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    /// Mint an opaque connection id. Unique for the process lifetime; ids
    /// are never reused across reconnects.
    pub fn mint_connection_id(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .subsec_nanos();
        format!("{seq:x}-{nanos:08x}")
    }

    pub fn insert(
        &self,
        connection_id: String,
        context: BTreeMap<String, String>,
        handle: ConnectionHandle,
    ) {
        self.sessions
            .insert(connection_id, SessionEntry { handle, context });
    }

    pub fn remove(&self, connection_id: &str) -> Option<ConnectionHandle> {
        self.sessions
            .remove(connection_id)
            .map(|(_, entry)| entry.handle)
    }

    pub fn get(&self, connection_id: &str) -> Option<ConnectionHandle> {
        self.sessions
            .get(connection_id)
            .map(|r| r.value().handle.clone())
    }

    /// Connect-time authorizer context for an open connection.
    pub fn context(&self, connection_id: &str) -> Option<BTreeMap<String, String>> {
        self.sessions
            .get(connection_id)
            .map(|r| r.value().context.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
