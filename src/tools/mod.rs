// ABOUTME: Tool layer exposing domain operations to the language model
// ABOUTME: Organizes the registry, execution context, result types, and book tool bindings
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Tools
//!
//! The tool layer bridges the language model's function-calling interface
//! and the domain service. It provides:
//!
//! - A closed set of tools ([`registry::BookTool`]) with machine-readable
//!   schemas for the model
//! - Strict argument parsing: malformed arguments fail that single call
//! - Tenant enforcement: every dispatch re-validates that the tenant it was
//!   asked to execute under matches the request context it carries
//!
//! Tool failures never abort a chat turn; they surface as failure results
//! that are reported to both the model and the caller.

mod books;
pub mod context;
pub mod registry;
pub mod result;

pub use context::ToolContext;
pub use registry::{BookTool, ToolRegistry};
pub use result::{ToolPayload, ToolResult};
