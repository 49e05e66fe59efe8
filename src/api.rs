//! HTTP API for the Reply Service

mod handlers;
mod types;

pub use handlers::create_router;
pub use types::*;

use crate::reply::ReplyService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub replies: Arc<dyn ReplyService>,
}

impl AppState {
    pub fn new(replies: Arc<dyn ReplyService>) -> Self {
        Self { replies }
    }
}
