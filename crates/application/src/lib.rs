//! Khabari Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for transport, persistence and time)
//! - The dispatcher that turns a request into a response
//! - The tab/history store and the session that wires them together

pub mod dispatcher;
pub mod error;
pub mod ports;
pub mod session;
pub mod store;

pub use dispatcher::{Dispatcher, NetworkError};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    Clock, HttpClient, HttpClientError, KeyValueStore, StorageError, TransportRequest,
    TransportResponse,
};
pub use session::{SendError, SendOutcome, Session};
pub use store::{StoreSnapshot, TabStore, keys};
