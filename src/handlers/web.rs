use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

use crate::assets::{APP_JS, INDEX_HTML, STYLE_CSS};
use crate::AppState;

pub async fn index(State(state): State<AppState>) -> Response {
    Html(inject_base_path(INDEX_HTML, &state.base_path)).into_response()
}

pub async fn static_file(Path(path): Path<String>) -> Response {
    match path.as_str() {
        "app.js" => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/javascript")],
            APP_JS,
        )
            .into_response(),
        "style.css" => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/css")],
            STYLE_CSS,
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn inject_base_path(html: &str, base_path: &str) -> String {
    // Inject a script tag that sets the BASE_PATH variable
    let script = format!(r#"<script>window.BASE_PATH = "{}";</script>"#, base_path);
    let html = html.replace("<head>", &format!("<head>\n    {}", script));

    // Update static asset paths
    html.replace("href=\"/static/", &format!("href=\"{}/static/", base_path))
        .replace("src=\"/static/", &format!("src=\"{}/static/", base_path))
}
