//! Service layer: business logic orchestration.
//!
//! [`RelayService`] routes inbound messages to the owner command
//! interpreter or the assistant, and backs the dashboard API.

pub mod relay_service;

pub use relay_service::{DashboardSnapshot, InboundOutcome, RelayService};
