//! Job-intake pipeline: validate, generate, build, persist, notify.
//!
//! Every outbound service is reached through the capability traits in
//! [`jobrelay_core::capability`], so the pipeline runs unchanged against
//! real HTTP clients or test substitutes.

pub mod generator;
pub mod notifier;
pub mod orchestrator;
pub mod persistence;

pub use orchestrator::{
    Pipeline, PipelineFailure, PipelineOutcome, PipelineSettings, Stage, DEFAULT_CALL_TIMEOUT,
};
