//! Common test utilities for epi-wallet
//!
//! Hand-written fakes record every interaction so tests can assert on what
//! the wallet did rather than on how it did it.

pub mod fakes;
pub mod fixtures;

// Re-export commonly used items
pub use fakes::{MappingEngine, MemoryCredentialStore, MemoryResolver, RecordingEnv, ScriptedChecker};
pub use fixtures::{snapshot, test_config};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
