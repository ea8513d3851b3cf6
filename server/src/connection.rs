use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::db_mongo::{Connector, DatabaseHandle, MongoConnector, resolve_database_name};

pub const MONGODB_URI_VAR: &str = "MONGODB_URI";

/// The connection string read at startup. Blank values count as absent.
#[derive(Clone, Default)]
pub struct ConnectionConfig {
    uri: Option<String>,
}

impl ConnectionConfig {
    pub fn new(uri: Option<String>) -> Self {
        Self {
            uri: uri.filter(|uri| !uri.trim().is_empty()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var(MONGODB_URI_VAR).ok())
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.uri.is_some()
    }
}

// The URI can embed credentials, so it is never printed.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("uri", &self.uri.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectFailure {
    #[error("missing configuration")]
    ConfigurationMissing,

    #[error("{0}")]
    Connectivity(String),
}

#[derive(Clone)]
pub enum ConnectionState {
    Disconnected,
    Connected(DatabaseHandle),
    Failed(ConnectFailure),
}

impl ConnectionState {
    pub fn handle(&self) -> Option<&DatabaseHandle> {
        match self {
            ConnectionState::Connected(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }
}

impl fmt::Debug for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => f.write_str("Disconnected"),
            ConnectionState::Connected(handle) => {
                f.debug_tuple("Connected").field(&handle.name()).finish()
            }
            ConnectionState::Failed(reason) => f.debug_tuple("Failed").field(reason).finish(),
        }
    }
}

/// Owns the process's single database handle.
///
/// `connect` and `disconnect` run at process boundaries. Request handlers
/// only ever call [`current_handle`](Self::current_handle), which clones the
/// shared handle out of the state cell and releases the lock immediately.
pub struct ConnectionManager {
    connector: Arc<dyn Connector>,
    state: RwLock<ConnectionState>,
}

impl ConnectionManager {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            state: RwLock::new(ConnectionState::Disconnected),
        }
    }

    pub fn mongo() -> Self {
        Self::new(Arc::new(MongoConnector))
    }

    /// Connect, select the resolved database and ping it.
    ///
    /// Only acts from `Disconnected`; any other state is returned unchanged.
    pub async fn connect(&self, config: &ConnectionConfig) -> ConnectionState {
        let mut state = self.state.write().await;
        if !matches!(*state, ConnectionState::Disconnected) {
            tracing::warn!(state = ?&*state, "connect called on an initialised connection manager");
            return state.clone();
        }

        *state = self.establish(config).await;
        state.clone()
    }

    async fn establish(&self, config: &ConnectionConfig) -> ConnectionState {
        let Some(uri) = config.uri() else {
            tracing::warn!(
                "{} not found in environment variables; database endpoints will be unavailable",
                MONGODB_URI_VAR
            );
            return ConnectionState::Failed(ConnectFailure::ConfigurationMissing);
        };

        let database = resolve_database_name(uri);
        tracing::info!(uri_present = true, database = %database, "Connecting to MongoDB");

        let handle = match self.connector.open(uri, &database).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(database = %database, "Failed to connect to MongoDB: {}", e);
                return ConnectionState::Failed(ConnectFailure::Connectivity(e.to_string()));
            }
        };

        if let Err(e) = handle.ping().await {
            tracing::error!(database = %database, "Failed to ping MongoDB: {}", e);
            handle.close().await;
            return ConnectionState::Failed(ConnectFailure::Connectivity(e.to_string()));
        }

        tracing::info!(database = %handle.name(), "Connected to MongoDB");
        ConnectionState::Connected(handle)
    }

    /// Release the handle. Safe to call in any state, any number of times.
    pub async fn disconnect(&self) {
        let mut state = self.state.write().await;
        let ConnectionState::Connected(handle) = &*state else {
            tracing::debug!(state = ?&*state, "disconnect: nothing to close");
            return;
        };

        let handle = Arc::clone(handle);
        *state = ConnectionState::Disconnected;
        drop(state);

        handle.close().await;
        tracing::info!(database = %handle.name(), "MongoDB connection closed");
    }

    pub async fn current_handle(&self) -> Option<DatabaseHandle> {
        self.state.read().await.handle().cloned()
    }

    pub async fn state(&self) -> ConnectionState {
        self.state.read().await.clone()
    }
}
