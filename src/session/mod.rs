//! AWS session resolution module
//!
//! This module builds ready-to-use AWS sessions including:
//! - [`resolver::CredentialResolver`] - Default, region-pinned, profile and role sessions
//! - [`handle::Session`] - Resolved configuration plus its request handler chain
//! - [`handlers`] - Named interceptors, including the tool's user-agent tag
//! - [`loader`] - The seam between the resolver and `aws-config` discovery

pub mod error;
pub mod handle;
pub mod handlers;
pub mod loader;
pub mod resolver;

// Re-export commonly used types
pub use error::SessionError;
pub use handle::{CredentialSource, Session};
pub use handlers::{HandlerList, NamedHandler, UserAgentHandler};
pub use loader::{AwsConfigLoader, ConfigLoader, LoadRequest, StaticConfigLoader};
pub use resolver::{CredentialResolver, SessionOptions};
