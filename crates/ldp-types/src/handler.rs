//! Capability-based handler dispatch.
//!
//! A handler first reports whether it can process an input, then processes
//! it. A [`Dispatcher`] holds an ordered handler list and delegates to the
//! first one that accepts; the accepted handler is returned as a
//! [`Committed`] value so an input can only be processed after a successful
//! check.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{LdpError, LdpResult};

/// A unit of work that declares which inputs it supports.
#[async_trait]
pub trait AsyncHandler<I, O>: Send + Sync
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Check whether `input` is supported. Must not consume anything the
    /// input carries; rejection reasons are reported as errors.
    fn can_handle(&self, input: &I) -> LdpResult<()>;

    /// Process an input. Callers are expected to have checked
    /// [`can_handle`](Self::can_handle) first.
    async fn handle(&self, input: I) -> LdpResult<O>;

    /// Check, then process.
    async fn handle_safe(&self, input: I) -> LdpResult<O> {
        self.can_handle(&input)?;
        self.handle(input).await
    }
}

/// Delegates each input to the first handler in its list that accepts it.
pub struct Dispatcher<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    name: String,
    handlers: Vec<Arc<dyn AsyncHandler<I, O>>>,
}

impl<I, O> Dispatcher<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    pub fn new(name: impl Into<String>, handlers: Vec<Arc<dyn AsyncHandler<I, O>>>) -> Self {
        Self {
            name: name.into(),
            handlers,
        }
    }

    /// Append a handler. Earlier handlers keep priority.
    pub fn push(&mut self, handler: Arc<dyn AsyncHandler<I, O>>) {
        self.handlers.push(handler);
    }

    pub fn with(mut self, handler: Arc<dyn AsyncHandler<I, O>>) -> Self {
        self.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Select the first handler that accepts `input`.
    ///
    /// Fails with [`LdpError::NoApplicableHandler`] listing every rejection
    /// when none does.
    pub fn try_accept(&self, input: &I) -> LdpResult<Committed<'_, I, O>> {
        let mut reasons = Vec::with_capacity(self.handlers.len());
        for (index, handler) in self.handlers.iter().enumerate() {
            match handler.can_handle(input) {
                Ok(()) => {
                    tracing::trace!(dispatcher = %self.name, index, "handler accepted input");
                    return Ok(Committed {
                        handler: handler.as_ref(),
                    });
                }
                Err(e) => reasons.push(e.to_string()),
            }
        }
        tracing::debug!(dispatcher = %self.name, ?reasons, "no handler accepted input");
        Err(LdpError::NoApplicableHandler { reasons })
    }
}

impl<I, O> fmt::Debug for Dispatcher<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("name", &self.name)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// A handler that has accepted an input and is ready to process it.
pub struct Committed<'a, I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    handler: &'a dyn AsyncHandler<I, O>,
}

impl<I, O> Committed<'_, I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    pub async fn process(self, input: I) -> LdpResult<O> {
        self.handler.handle(input).await
    }
}

#[async_trait]
impl<I, O> AsyncHandler<I, O> for Dispatcher<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    fn can_handle(&self, input: &I) -> LdpResult<()> {
        self.try_accept(input).map(|_| ())
    }

    async fn handle(&self, input: I) -> LdpResult<O> {
        self.try_accept(&input)?.process(input).await
    }
}
