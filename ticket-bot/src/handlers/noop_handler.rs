//! No-op handler: always returns Continue. Used as terminal handler in tests.

use crate::core::{Event, Handler, HandlerResponse, Result};
use async_trait::async_trait;

/// Handler that does nothing; always continues.
#[derive(Clone)]
pub struct NoOpHandler;

impl NoOpHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Handler for NoOpHandler {
    async fn handle(&self, _event: &Event) -> Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
}
