use std::sync::Arc;

use crate::db::FeedbackStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FeedbackStore>,
    pub strict_validation: bool,
}
