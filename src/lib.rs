//! AWS session resolution library
//!
//! Builds authenticated AWS SDK sessions from the default credential chain, a
//! pinned region, a named profile, or an assumed role. Every session tags its
//! requests with this tool's user-agent token.

pub mod cli;
pub mod session;
pub mod settings;

pub use session::{CredentialResolver, Session, SessionError};
