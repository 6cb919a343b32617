//! Wallet identity bootstrap
//!
//! Loads the wallet DID, creates one under a free name when missing, and
//! starts the credential watcher for it.

mod bootstrap;
mod resolver;


pub use bootstrap::{BootstrapOutcome, NavigateHomeHandler, WalletBootstrap};
pub use resolver::{IdentityResolver, create_unique_identity, name_did};
