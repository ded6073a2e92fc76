//! Data Transfer Objects for request/response serialization.
//!
//! Webhook payloads follow the WhatsApp Cloud API shape; dashboard DTOs
//! flatten domain types into plain JSON for the owner UI.

pub mod dashboard_dto;
pub mod webhook_dto;

pub use dashboard_dto::*;
pub use webhook_dto::*;
