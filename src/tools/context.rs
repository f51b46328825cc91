// ABOUTME: Execution context passed to every tool invocation
// ABOUTME: Carries the trusted tenant identity and database access
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool execution context.
//!
//! The context is built by the orchestrator from the authenticated request;
//! its tenant id is the trusted identity, never a model-supplied value.

use crate::database::Database;

/// Context provided to every tool execution
#[derive(Clone)]
pub struct ToolContext {
    /// Trusted tenant identity from the authenticated request
    pub tenant_id: String,
    /// Database access for the domain operations behind each tool
    pub database: Database,
}

impl ToolContext {
    /// Create a new context for a request
    #[must_use]
    pub const fn new(tenant_id: String, database: Database) -> Self {
        Self {
            tenant_id,
            database,
        }
    }
}
