//! Integration tests for epi-wallet
//!
//! These tests wire the wallet services together with in-memory
//! collaborators and check the observable behaviour end to end.

pub mod config_tests;
pub mod import_flow_tests;
pub mod product_flow_tests;
