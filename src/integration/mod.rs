//! Integration tests against a real metadata directory

mod e2e;
pub mod fixtures;
