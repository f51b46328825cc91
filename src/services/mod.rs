// ABOUTME: Domain services sitting between route handlers and storage
// ABOUTME: Holds the chat orchestration state machine
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain service layer.

pub mod chat_orchestration;

pub use chat_orchestration::{process_message, ChatTurn, ExecutedToolCall};
