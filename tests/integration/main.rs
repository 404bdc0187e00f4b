//! Integration tests
//!
//! HTTP traffic is served by wiremock; the HTTP API is exercised through
//! actix-web's test harness.

mod fetch_tests;
mod readings_tests;
mod server_tests;
