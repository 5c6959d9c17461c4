//! Eye Tracker Module
//!
//! Streams telemetry from a MindLink-style eye tracker to an imagery sink.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    TelemetryAdapter                      │
//! │   (session lifecycle, handler wiring, device config)     │
//! └─────────────────────┬───────────────────────────────────┘
//!                       │ TrackerConnector / TrackerApi
//!         ┌─────────────┼──────────────┐
//!         │             │              │
//!         ▼             ▼              ▼
//! ┌────────────┐  ┌───────────┐  ┌────────────┐
//! │ Vendor SDK │  │   Mock    │  │ Synthetic  │
//! │  binding   │  │  tracker  │  │   device   │
//! │ (external) │  │           │  │ (drives    │
//! │            │  │           │  │  the mock) │
//! └────────────┘  └───────────┘  └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`protocol`] - Stream, event and ack codes plus device defaults
//! - [`api`] - The vendor-facing traits and handler types
//! - [`adapter`] - Session owner that normalizes samples and logs events
//! - [`mock`] - In-process tracker implementing the vendor traits
//! - [`synthetic`] - Simulated glasses feeding the mock tracker

pub mod adapter;
pub mod api;
pub mod mock;
pub mod protocol;
pub mod synthetic;

// Re-export main adapter for convenience
pub use adapter::{AdapterConfig, AdapterError, TelemetryAdapter};
