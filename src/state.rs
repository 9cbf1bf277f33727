use std::sync::Arc;

use crate::api::ThreadApi;
use crate::view::RenderOptions;

/// Shared by every request. Each request builds its own renderer on top.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn ThreadApi>,
    pub render: RenderOptions,
}
