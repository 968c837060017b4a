//! Project information page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use accounts_core::EntityKind;

/// One documented route.
pub struct RouteInfo {
    pub method: &'static str,
    pub path: String,
    pub summary: &'static str,
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub name: &'static str,
    pub version: &'static str,
    pub routes: Vec<RouteInfo>,
}

fn route_table() -> Vec<RouteInfo> {
    let mut routes = Vec::new();
    for kind in EntityKind::ALL {
        let base = format!("/{}", kind.resource());
        let status_method = match kind {
            EntityKind::Customer => "PATCH",
            EntityKind::User => "PATCH | POST",
        };
        let entries = [
            ("GET", base.clone(), "List all, newest first"),
            ("GET", format!("{base}/search?q="), "Search names and email"),
            ("GET", format!("{base}/{{id}}"), "Fetch by ID"),
            ("GET", format!("{base}/email/{{email}}"), "Fetch by email"),
            ("POST", base.clone(), "Create"),
            ("PATCH", format!("{base}/{{id}}"), "Partial update"),
            ("DELETE", format!("{base}/{{id}}"), "Delete"),
            (
                status_method,
                format!("{base}/{{id}}/confirm-email"),
                "Confirm email",
            ),
            (status_method, format!("{base}/{{id}}/activate"), "Activate"),
            (
                status_method,
                format!("{base}/{{id}}/deactivate"),
                "Deactivate",
            ),
        ];
        routes.extend(entries.into_iter().map(|(method, path, summary)| RouteInfo {
            method,
            path,
            summary,
        }));
    }
    routes
}

/// `GET /`
#[instrument]
pub async fn index() -> impl IntoResponse {
    IndexTemplate {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        routes: route_table(),
    }
}
