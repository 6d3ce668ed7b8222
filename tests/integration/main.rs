//! Integration tests for Catalog-Sweep
//!
//! These tests use wiremock to stand in for the backend API and drive full
//! runs end-to-end, from request validation to the exported file.

mod common;
mod review_tests;
mod search_tests;
