//! The test form.

use crate::config::UiConfig;
use crate::error::AppResult;
use crate::state::AppState;
use askama::Template;
use axum::{extract::State, response::Html};

/// `templates/index.html`; optional inputs are only rendered when enabled.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    title: &'a str,
    show_image: bool,
    show_custom_fields: bool,
    show_field_toggles: bool,
}

impl<'a> From<&'a UiConfig> for IndexTemplate<'a> {
    fn from(config: &'a UiConfig) -> Self {
        Self {
            title: &config.title,
            show_image: config.show_image,
            show_custom_fields: config.show_custom_fields,
            show_field_toggles: config.show_field_toggles,
        }
    }
}

/// GET / - Serve the test form
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    Ok(Html(render_index(&state.ui)?))
}

pub fn render_index(config: &UiConfig) -> AppResult<String> {
    Ok(IndexTemplate::from(config).render()?)
}
