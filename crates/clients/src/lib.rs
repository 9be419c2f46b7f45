//! HTTP clients for the relay's outbound services.
//!
//! - [`openai::OpenAiClient`] for proposal and score generation.
//! - [`airtable::AirtableClient`] for job record storage.
//! - [`slack::SlackClient`] for channel notifications.
//!
//! Each client owns a `reqwest::Client` built with a request timeout and is
//! configured from an immutable `*Config` read once at startup.

pub mod airtable;
pub mod config;
pub mod openai;
pub mod slack;

pub use airtable::{AirtableClient, AirtableConfig};
pub use config::ConfigError;
pub use openai::{OpenAiClient, OpenAiConfig};
pub use slack::{SlackClient, SlackConfig};
