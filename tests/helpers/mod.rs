// ABOUTME: Test helper modules shared across integration tests
// ABOUTME: Provides the axum request builder used by route tests

pub mod axum_test;
