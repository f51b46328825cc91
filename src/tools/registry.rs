// ABOUTME: Closed registry of book tools with schemas and strict name dispatch
// ABOUTME: Converts every failure mode into a failure ToolResult; a bad call never aborts a turn
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Tool Registry
//!
//! The registry exposes a closed set of tools as an enum-keyed table: each
//! [`BookTool`] variant maps its name to a schema and an executable binding.
//! Names from the model are resolved by strict match; an unrecognized name
//! or malformed argument payload yields a failure result for that single
//! call and never a crash.

use serde_json::{json, Value};
use tracing::{debug, warn};

use super::books;
use super::context::ToolContext;
use super::result::ToolResult;
use crate::errors::AppError;
use crate::llm::{FunctionDeclaration, Tool};

/// The closed set of tools exposed to the language model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookTool {
    AddBook,
    ListBooks,
    CompleteBook,
    DeleteBook,
    UpdateBook,
}

impl BookTool {
    /// All tools, in the order they are declared to the model
    pub const ALL: [Self; 5] = [
        Self::AddBook,
        Self::ListBooks,
        Self::CompleteBook,
        Self::DeleteBook,
        Self::UpdateBook,
    ];

    /// Resolve a tool from its wire name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add_book" => Some(Self::AddBook),
            "list_books" => Some(Self::ListBooks),
            "complete_book" => Some(Self::CompleteBook),
            "delete_book" => Some(Self::DeleteBook),
            "update_book" => Some(Self::UpdateBook),
            _ => None,
        }
    }

    /// Wire name of this tool
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AddBook => "add_book",
            Self::ListBooks => "list_books",
            Self::CompleteBook => "complete_book",
            Self::DeleteBook => "delete_book",
            Self::UpdateBook => "update_book",
        }
    }

    /// Description shown to the model
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AddBook => {
                "Create a new book entry. Use only the details the user provided; \
                 leave optional fields unset when the user did not mention them."
            }
            Self::ListBooks => {
                "Retrieve all books for the user, optionally filtered by reading status"
            }
            Self::CompleteBook => "Mark a book as completed (read) by its ID",
            Self::DeleteBook => "Delete a book from the reading list by its ID",
            Self::UpdateBook => {
                "Modify a book's details by its ID; fields that are not provided keep \
                 their current values"
            }
        }
    }

    /// JSON Schema for this tool's parameters
    #[must_use]
    pub fn parameters(self) -> Value {
        match self {
            Self::AddBook => json!({
                "type": "object",
                "required": ["title"],
                "properties": {
                    "title": {
                        "type": "string",
                        "minLength": 1,
                        "maxLength": 200,
                        "description": "Book title"
                    },
                    "description": {
                        "type": "string",
                        "maxLength": 1000,
                        "description": "Optional detailed description of the book"
                    },
                    "priority": {
                        "type": "string",
                        "enum": ["low", "medium", "high"],
                        "description": "Optional priority level for the book"
                    },
                    "category": {
                        "type": "string",
                        "maxLength": 100,
                        "description": "Optional category/genre for the book"
                    },
                    "due_date": {
                        "type": "string",
                        "description": "Optional reading start date (RFC 3339)"
                    },
                    "due_date_end": {
                        "type": "string",
                        "description": "Optional reading end date (RFC 3339)"
                    }
                }
            }),
            Self::ListBooks => json!({
                "type": "object",
                "required": [],
                "properties": {
                    "status": {
                        "type": "string",
                        "enum": ["pending", "completed"],
                        "description": "Optional filter by reading status"
                    }
                }
            }),
            Self::CompleteBook => json!({
                "type": "object",
                "required": ["book_id"],
                "properties": {
                    "book_id": {
                        "type": "integer",
                        "description": "Unique identifier for the book to mark as completed"
                    }
                }
            }),
            Self::DeleteBook => json!({
                "type": "object",
                "required": ["book_id"],
                "properties": {
                    "book_id": {
                        "type": "integer",
                        "description": "Unique identifier for the book to delete"
                    }
                }
            }),
            Self::UpdateBook => json!({
                "type": "object",
                "required": ["book_id"],
                "properties": {
                    "book_id": {
                        "type": "integer",
                        "description": "Unique identifier for the book to update"
                    },
                    "title": {
                        "type": "string",
                        "minLength": 1,
                        "maxLength": 200,
                        "description": "Optional new title"
                    },
                    "description": {
                        "type": "string",
                        "maxLength": 1000,
                        "description": "Optional new description"
                    },
                    "priority": {
                        "type": "string",
                        "enum": ["low", "medium", "high"],
                        "description": "Optional new priority level"
                    },
                    "category": {
                        "type": "string",
                        "maxLength": 100,
                        "description": "Optional new category/genre"
                    },
                    "due_date": {
                        "type": "string",
                        "description": "Optional new reading start date (RFC 3339)"
                    },
                    "due_date_end": {
                        "type": "string",
                        "description": "Optional new reading end date (RFC 3339)"
                    }
                }
            }),
        }
    }

    /// Build the function declaration sent to the model
    #[must_use]
    pub fn declaration(self) -> FunctionDeclaration {
        FunctionDeclaration {
            name: self.name().to_owned(),
            description: self.description().to_owned(),
            parameters: Some(self.parameters()),
        }
    }

    /// Execute this tool with already-parsed arguments
    async fn execute(self, ctx: &ToolContext, args: Value) -> Result<ToolResult, AppError> {
        match self {
            Self::AddBook => {
                let args = Self::parse_args(self, args)?;
                books::add_book(ctx, args).await
            }
            Self::ListBooks => {
                let args = Self::parse_args(self, args)?;
                books::list_books(ctx, args).await
            }
            Self::CompleteBook => {
                let args = Self::parse_args(self, args)?;
                books::complete_book(ctx, args).await
            }
            Self::DeleteBook => {
                let args = Self::parse_args(self, args)?;
                books::delete_book(ctx, args).await
            }
            Self::UpdateBook => {
                let args = Self::parse_args(self, args)?;
                books::update_book(ctx, args).await
            }
        }
    }

    fn parse_args<T: serde::de::DeserializeOwned>(
        tool: Self,
        args: Value,
    ) -> Result<T, AppError> {
        serde_json::from_value(args).map_err(|e| {
            AppError::invalid_input(format!("invalid arguments for {}: {e}", tool.name()))
        })
    }
}

/// Enum-keyed tool table exposed to the orchestrator
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolRegistry;

impl ToolRegistry {
    /// Create the registry
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Declarations for every registered tool
    #[must_use]
    pub fn declarations(&self) -> Vec<FunctionDeclaration> {
        BookTool::ALL.iter().map(|tool| tool.declaration()).collect()
    }

    /// The full tool group sent with the first model call
    #[must_use]
    pub fn tool_schema(&self) -> Tool {
        Tool {
            function_declarations: self.declarations(),
        }
    }

    /// Dispatch a tool call requested by the model
    ///
    /// `tenant_id` is the trusted identity of the invoking request; it must
    /// equal the tenant carried by `ctx` even though the orchestrator is the
    /// only caller. Unknown names, malformed arguments, and execution
    /// failures all come back as failure results so the remaining calls of
    /// the turn still run.
    pub async fn dispatch(
        &self,
        name: &str,
        tenant_id: &str,
        ctx: &ToolContext,
        raw_args: &str,
    ) -> ToolResult {
        if tenant_id != ctx.tenant_id {
            warn!(
                "Tool dispatch tenant mismatch: request={}, context={}",
                tenant_id, ctx.tenant_id
            );
            return ToolResult::error(
                "tenant mismatch between request context and tool invocation",
            );
        }

        let Some(tool) = BookTool::from_name(name) else {
            warn!("Model requested unknown tool '{}'", name);
            return ToolResult::error(format!("unknown tool '{name}'"));
        };

        let args: Value = if raw_args.trim().is_empty() {
            json!({})
        } else {
            match serde_json::from_str(raw_args) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Malformed arguments for tool '{}': {}", name, e);
                    return ToolResult::error(format!("malformed arguments for '{name}': {e}"));
                }
            }
        };

        debug!("Executing tool '{}' for tenant {}", name, tenant_id);

        match tool.execute(ctx, args).await {
            Ok(result) => result,
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}
