//! Domain types and pure logic for the Upwork job intake relay.
//!
//! - [`job`] for inbound payload and its validator.
//! - [`proposal`] for prompt template and generated drafts.
//! - [`record`] for the persisted job record and its status lifecycle.
//! - [`notification`] for channel summary rendering.
//! - [`scoring`] for optional job match scoring.
//! - [`capability`] for traits for the outbound services.

pub mod capability;
pub mod error;
pub mod job;
pub mod notification;
pub mod proposal;
pub mod record;
pub mod scoring;
pub mod types;
