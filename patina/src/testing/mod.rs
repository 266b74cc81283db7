//! Test doubles for the inference client and search tool.
//!
//! These are exported (not `#[cfg(test)]`) so downstream callers can drive
//! the pipeline in their own tests without touching a hosted provider.

mod mocks;

pub use mocks::{
    EchoInferenceClient, FailingInferenceClient, FailingSearchTool, RecordedInvocation,
    ScriptedInferenceClient, StaticSearchTool, ToolDrivenInferenceClient,
};
