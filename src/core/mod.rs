//! Core functionality for the wallet
//!
//! This module contains the business logic: validation, batching, credential
//! watching and the flows built on top of them.

pub mod audit;
pub mod gtin;
pub mod identity;
pub mod import;
pub mod messages;
pub mod permissions;
pub mod pipeline;
pub mod product;
