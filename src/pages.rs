use axum::{
    extract::Query,
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::state::AppState;

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page))
        .route("/register", get(register_page))
        .route("/admin", get(admin_page))
        .route("/request-appointment", get(request_appointment_page))
}

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub error: Option<String>,
}

fn shell(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body><main data-page=\"{title}\">{body}</main></body></html>"
    ))
}

async fn login_page(Query(query): Query<LoginPageQuery>) -> Html<String> {
    let notice = match query.error.as_deref() {
        Some("pending") => "<p role=\"alert\">Your account is pending approval.</p>",
        _ => "",
    };
    shell("login", notice)
}

async fn register_page() -> Html<String> {
    shell("register", "")
}

async fn admin_page() -> Html<String> {
    shell("admin", "")
}

async fn request_appointment_page() -> Html<String> {
    shell("request-appointment", "")
}
