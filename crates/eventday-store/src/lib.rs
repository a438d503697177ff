// ABOUTME: Durable storage for the eventday registration log.
// ABOUTME: Provides the JSONL-backed implementation of the EventLogStore contract.

pub mod jsonl;

pub use jsonl::{JsonlError, JsonlStore};
