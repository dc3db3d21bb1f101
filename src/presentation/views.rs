use crate::application::error::HttpError;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

pub const PAGE_TITLE: &str = "Visitor counter";

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: &'static str,
    pub total_views: i64,
}

impl IndexTemplate {
    pub fn new(total_views: i64) -> Self {
        Self {
            title: PAGE_TITLE,
            total_views,
        }
    }
}

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) origin: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(origin: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            origin,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            origin,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            origin,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_renders_total() {
        let html = IndexTemplate::new(42).render().expect("template renders");
        assert!(html.contains(r#"<strong id="total-views">42</strong>"#));
        assert!(html.contains("times"));
    }

    #[test]
    fn index_uses_singular_for_one_view() {
        let html = IndexTemplate::new(1).render().expect("template renders");
        assert!(html.contains("1</strong> time."));
    }
}
