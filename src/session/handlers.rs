//! Request handler chain attached to every session
//!
//! Handlers are SDK interceptors registered under a fixed name. The chain keeps
//! at most one handler per name, so pushing the same handler twice leaves a
//! single entry in place.
//!
//! The tool identifies itself as the SDK app name [`APP_NAME`], which the SDK
//! renders as `app/aws-session` in the `User-Agent` header. Sessions set it on
//! their `SdkConfig` so every client and the STS exchange of role sessions
//! carry it; [`UserAgentHandler`] adds the same token to requests whose config
//! lost it.

use aws_smithy_runtime_api::box_error::BoxError;
use aws_smithy_runtime_api::client::interceptors::context::BeforeTransmitInterceptorContextMut;
use aws_smithy_runtime_api::client::interceptors::{Intercept, SharedInterceptor};
use aws_smithy_runtime_api::client::runtime_components::RuntimeComponents;
use aws_smithy_types::config_bag::ConfigBag;

/// App name this tool reports to AWS
pub const APP_NAME: &str = "aws-session";

const USER_AGENT_HEADER: &str = "user-agent";

/// An interceptor registered under a stable name
#[derive(Debug, Clone)]
pub struct NamedHandler {
    pub name: &'static str,
    pub interceptor: SharedInterceptor,
}

impl NamedHandler {
    pub fn new(name: &'static str, interceptor: impl Intercept + 'static) -> Self {
        Self {
            name,
            interceptor: SharedInterceptor::new(interceptor),
        }
    }
}

/// Ordered list of named handlers
#[derive(Debug, Clone, Default)]
pub struct HandlerList {
    handlers: Vec<NamedHandler>,
}

impl HandlerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler, replacing in place any handler already registered under its name
    pub fn push_back_named(&mut self, handler: NamedHandler) {
        match self.handlers.iter_mut().find(|h| h.name == handler.name) {
            Some(existing) => *existing = handler,
            None => self.handlers.push(handler),
        }
    }

    /// Number of handlers registered under `name`
    pub fn count(&self, name: &str) -> usize {
        self.handlers.iter().filter(|h| h.name == name).count()
    }

    /// Handler names in chain order
    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name).collect()
    }

    /// Interceptors in chain order, ready to register on an SDK client config
    pub fn interceptors(&self) -> impl Iterator<Item = SharedInterceptor> + '_ {
        self.handlers.iter().map(|h| h.interceptor.clone())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Tags outbound requests with this tool's `app/` token.
///
/// Runs after signing so the SDK's own `User-Agent` value is already in
/// place; the token is appended to it rather than replacing it, and skipped
/// when the SDK already rendered it from the config's app name. SigV4 does
/// not sign `User-Agent`, so the signature stays valid.
#[derive(Debug, Clone)]
pub struct UserAgentHandler {
    token: String,
}

impl UserAgentHandler {
    pub const NAME: &'static str = "aws-session.UserAgentHandler";

    pub fn new() -> Self {
        Self {
            token: format!("app/{}", APP_NAME),
        }
    }

    /// The `app/<name>` token added to requests
    pub fn token(&self) -> &str {
        &self.token
    }

    /// This handler wrapped for a [`HandlerList`]
    pub fn named() -> NamedHandler {
        NamedHandler::new(Self::NAME, Self::new())
    }

    /// Combine an existing header value with the product token
    fn tagged(&self, current: Option<&str>) -> Option<String> {
        match current {
            None | Some("") => Some(self.token.clone()),
            Some(value) if value.split(' ').any(|part| part == self.token) => None,
            Some(value) => Some(format!("{} {}", value, self.token)),
        }
    }
}

impl Default for UserAgentHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Intercept for UserAgentHandler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn modify_before_transmit(
        &self,
        context: &mut BeforeTransmitInterceptorContextMut<'_>,
        _runtime_components: &RuntimeComponents,
        _cfg: &mut ConfigBag,
    ) -> Result<(), BoxError> {
        let headers = context.request_mut().headers_mut();
        if let Some(value) = self.tagged(headers.get(USER_AGENT_HEADER)) {
            headers.insert(USER_AGENT_HEADER, value);
        }
        Ok(())
    }
}
