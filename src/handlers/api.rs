use axum::extract::{Path, Query, State};
use axum::{http::StatusCode, response::IntoResponse, Json};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{normalize_query, parse_due, CreateTodo, ListQuery, TodoView};
use crate::AppState;

pub async fn list_todos(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<TodoView>>, AppError> {
    let query = normalize_query(params.q.as_deref().unwrap_or(""));
    let now = OffsetDateTime::now_utc();

    let store = state.store.lock().unwrap();
    let views: Vec<TodoView> = store
        .items()
        .iter()
        .map(|item| TodoView::project(item, store.is_removing(item.id), now, state.offset))
        .filter(|view| view.matches(&query))
        .collect();
    info!(count = views.len(), "Listed todos");
    Ok(Json(views))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Json(req): Json<CreateTodo>,
) -> Result<(StatusCode, Json<TodoView>), AppError> {
    let due = match req.due.as_deref().filter(|raw| !raw.is_empty()) {
        Some(raw) => Some(parse_due(raw).ok_or(AppError::BadRequest("Invalid due date"))?),
        None => None,
    };

    let mut store = state.store.lock().unwrap();
    let Some(item) = store.add(&req.text, due)? else {
        return Err(AppError::BadRequest("Text cannot be empty"));
    };
    info!(id = item.id, text = %item.text, "Created todo");

    let view = TodoView::project(&item, false, OffsetDateTime::now_utc(), state.offset);
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TodoView>, AppError> {
    let mut store = state.store.lock().unwrap();
    match store.toggle(id)? {
        Some(item) => {
            info!(id, completed = item.completed, "Toggled todo");
            let view = TodoView::project(
                &item,
                store.is_removing(id),
                OffsetDateTime::now_utc(),
                state.offset,
            );
            Ok(Json(view))
        }
        None => Err(AppError::NotFound),
    }
}

pub async fn remove_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !state.store.lock().unwrap().begin_remove(id) {
        return Err(AppError::NotFound);
    }
    info!(id, "Marked todo for removal");

    // The surface reports back once its removal animation finishes; if
    // that signal never arrives the removal happens after the grace
    // period regardless.
    let store = state.store.clone();
    let grace = state.removal_grace;
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        match store.lock().unwrap().finalize_remove(id) {
            Ok(true) => warn!(id, "Removal signal never arrived, finalized by fallback"),
            Ok(false) => {}
            Err(err) => warn!(id, ?err, "Fallback removal failed"),
        }
    });

    Ok(StatusCode::ACCEPTED)
}

pub async fn removal_done(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if state.store.lock().unwrap().finalize_remove(id)? {
        info!(id, "Deleted todo");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
