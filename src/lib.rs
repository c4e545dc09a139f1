//! Cache MFA-authenticated AWS STS sessions.
//!
//! A run reuses an unexpired cached session when one exists. Otherwise it prompts for
//! an MFA code, exchanges it for temporary credentials (GetSessionToken, or AssumeRole
//! when the profile names a role), caches them with owner-only permissions and writes
//! a sourceable env file plus a wrapper script next to the cache record.

pub mod artifacts;
pub mod aws;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod error;
pub mod mfa;
pub mod profile;
pub mod prompt;
pub mod session;
pub mod utils;

pub use error::{Error, Result};
pub use mfa::{MfaSession, SessionOutcome};
