// ABOUTME: Tagged result types returned by tool execution
// ABOUTME: Callers branch on the payload's kind discriminator, not its shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Tool Result Types
//!
//! [`ToolResult`] is the tagged outcome of every tool invocation: either a
//! success with a payload or a failure with an error message. The payload
//! carries a `kind` discriminator (`book`, `list`, `deleted`) so consumers
//! branch on the tag rather than inferring the shape from the structure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::BookRecord;

/// Payload of a successful tool invocation, discriminated by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolPayload {
    /// A single book (create, update, complete)
    Book {
        /// The affected book
        book: BookRecord,
    },
    /// A list of books with its count
    List {
        /// Number of books returned
        count: usize,
        /// The books
        books: Vec<BookRecord>,
    },
    /// Confirmation of a deletion
    Deleted {
        /// ID of the removed book
        id: i64,
        /// Title of the removed book
        title: String,
    },
}

/// Tagged outcome of a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the invocation succeeded
    pub success: bool,
    /// Payload on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<ToolPayload>,
    /// Error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful result
    #[must_use]
    pub const fn ok(payload: ToolPayload) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
        }
    }

    /// Create a failure result
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(message.into()),
        }
    }

    /// Whether this result represents a failure
    #[must_use]
    pub const fn is_error(&self) -> bool {
        !self.success
    }

    /// Serialize to a JSON value for the model and the HTTP response
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
