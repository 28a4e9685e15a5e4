//! Event Bus Service
//!
//! An in-memory publish/subscribe bus for HTTP microservices. Services
//! register a webhook URL once and receive every event published after
//! (and, thanks to checkpoints, before) that moment.
//!
//! # Features
//!
//! - **At-least-once delivery**: bounded retries with a fixed delay for
//!   every event and subscriber
//! - **Per-subscriber checkpoints**: missed events replay automatically
//!   on re-registration
//! - **Partial-failure isolation**: one unreachable subscriber never
//!   blocks delivery to the others
//! - **Online/offline tracking**: subscribers that exhaust their retries
//!   are skipped until they come back
//!
//! # Modules
//!
//! - `types`: Core data structures (Event, Subscriber)
//! - `event_log`: Append-only event history
//! - `registry`: Subscriber records and checkpoints
//! - `delivery`: Webhook POSTs, retries, replay and fan-out
//! - `bus`: Register/publish facade over the three engines
//! - `config`: Environment-driven settings
//! - `api`: Axum HTTP surface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use event_bus::api::http::create_router;
//! use event_bus::{BusConfig, EventBus};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BusConfig::from_env();
//!     let port = config.port;
//!     let bus = Arc::new(EventBus::new(config)?);
//!     let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
//!     axum::serve(listener, create_router(bus)).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bus;
pub mod config;
pub mod delivery;
pub mod event_log;
pub mod registry;
pub mod types;

// Re-export commonly used items at crate root
pub use bus::{BusError, BusResult, EventBus, PublishReceipt, RegisterReceipt};
pub use config::BusConfig;
pub use delivery::{DeliveryOutcome, RetryPolicy};
pub use types::{Event, Subscriber, SubscriberInfo, SubscriberStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
