//! Core types shared across reqmodel facilities
//!
//! This crate provides the canonical field keys and event names used by
//! both the error facility and the logging facility, so that every layer
//! emits structurally identical events.

pub mod schema;
