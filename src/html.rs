use askama::Template;

// Control is matched on inside the templates
use crate::view::{Control, ThreadView};

/// The widget on its own, for embedding into an existing page.
#[derive(Template)]
#[template(path = "components/thread.html")]
pub struct ThreadFragment<'a> {
    pub view: &'a ThreadView,
    /// Path of the page hosting the widget; forms and links point back to it
    pub page: &'a str,
}

/// A standalone page wrapping the widget.
#[derive(Template)]
#[template(path = "pages/thread.html")]
pub struct ThreadPage<'a> {
    pub view: &'a ThreadView,
    pub page: &'a str,
}

pub fn render_fragment(view: &ThreadView, page: &str) -> Result<String, askama::Error> {
    ThreadFragment { view, page }.render()
}
