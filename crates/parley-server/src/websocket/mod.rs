//! WebSocket gateway: connection registry and per-client sessions.

pub mod connection;
pub mod gateway;
pub mod handler;
pub mod session;

pub use connection::ClientConnection;
pub use gateway::Gateway;
