//! Connection management over blocking TCP.

pub mod connection;

pub use connection::{Connection, ConnectionInfo};
