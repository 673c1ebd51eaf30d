use std::sync::Arc;

use crate::service::widget::Widget;

/// State shared by every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub widget: Arc<Widget>,
}

impl AppState {
    pub fn new(widget: Arc<Widget>) -> Self {
        Self { widget }
    }
}
