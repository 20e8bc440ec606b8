use std::{net::Ipv4Addr, sync::Arc};

use tracing::info;

use tickoff::storage::Storage;
use tickoff::store::TodoStore;
use tickoff::{create_app, display_offset, AppState, REMOVAL_GRACE};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("TICKOFF_PORT")
        .expect("TICKOFF_PORT to be set")
        .parse()
        .expect("port number");

    let db_path = std::env::var("TICKOFF_DB").unwrap_or_else(|_| "todos.db".to_string());

    let base_path = std::env::var("TICKOFF_BASE_PATH")
        .ok()
        .map(|path| {
            let path = path.trim_end_matches('/');
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{}", path)
            }
        })
        .unwrap_or_default();

    let storage = Storage::open(&db_path).expect("opening storage");
    let store = TodoStore::load(storage).expect("loading todo list").into_shared();

    let state = AppState {
        store,
        base_path: Arc::new(base_path),
        offset: display_offset(),
        removal_grace: REMOVAL_GRACE,
    };
    let app = create_app(state);
    let addr = (Ipv4Addr::UNSPECIFIED, port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to port");

    info!("running on {addr:?}");

    axum::serve(listener, app).await.expect("failed serving");
}
