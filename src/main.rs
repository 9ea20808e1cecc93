use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::Extension,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};

use linkgrove::discovery::handlers::handle_front;
use linkgrove::newsletter::handlers::{handle_subscribe, handle_unsubscribe};
use linkgrove::pages::handlers::{
    handle_add_comment, handle_commented_pages, handle_create_page, handle_delete_comment,
    handle_delete_page, handle_get_page, handle_get_user, handle_like, handle_liked_pages,
    handle_list_comments, handle_list_own, handle_unlike, handle_update_page, handle_user_pages,
};
use linkgrove::store::memory::MemoryStore;
use linkgrove::store::types::{PageId, ServiceLinks, TreePage, UserId, UserProfile, now_ms};
use linkgrove::throttle::gate::AdmissionGate;
use linkgrove::throttle::middleware::admission_middleware;
use linkgrove::viewer::{SessionResolver, TokenTable};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut bind_addr: SocketAddr = "0.0.0.0:3000".parse()?;
    let mut demo = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind_addr = args[i + 1].parse()?;
                i += 2;
            }
            "--demo" => {
                demo = true;
                i += 1;
            }
            _ => {
                eprintln!("Usage: {} [--bind <addr:port>] [--demo]", args[0]);
                std::process::exit(1);
            }
        }
    }

    let store = Arc::new(MemoryStore::new());
    let gate = Arc::new(AdmissionGate::new());
    let tokens = Arc::new(TokenTable::default());

    if demo {
        seed_demo(&store, &tokens);
    }
    let sessions: Arc<dyn SessionResolver> = tokens;

    // Periodic sweep keeps the rate-limiter state map bounded.
    let sweep_gate = gate.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(600));
        loop {
            interval.tick().await;
            let dropped = sweep_gate.purge_idle(now_ms());
            if dropped > 0 {
                tracing::info!(
                    "Evicted {} idle rate-limit entries ({} tracked)",
                    dropped,
                    sweep_gate.tracked()
                );
            }
        }
    });

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_origin(Any);

    // Sensitive public mutating routes sit behind the admission gate;
    // registration/login would attach to the same layer.
    let throttled = Router::new()
        .route("/api/newsletter", post(handle_subscribe))
        .route("/api/newsletter/:email", delete(handle_unsubscribe))
        .layer(middleware::from_fn(admission_middleware));

    let app = Router::new()
        .route("/", get(handle_health))
        .route("/api/front", get(handle_front))
        .route("/api/tree", get(handle_list_own).post(handle_create_page))
        .route(
            "/api/tree/:id",
            get(handle_get_page)
                .put(handle_update_page)
                .delete(handle_delete_page),
        )
        .route("/api/tree/:id/likes", put(handle_like).delete(handle_unlike))
        .route(
            "/api/tree/:id/comments",
            get(handle_list_comments).put(handle_add_comment),
        )
        .route(
            "/api/tree/:id/comments/:comment_id",
            delete(handle_delete_comment),
        )
        .route("/api/like/tree", get(handle_liked_pages))
        .route("/api/comment/tree", get(handle_commented_pages))
        .route("/api/user/:id", get(handle_get_user))
        .route("/api/user/:id/tree", get(handle_user_pages))
        .merge(throttled)
        .layer(cors)
        .layer(Extension(store))
        .layer(Extension(gate))
        .layer(Extension(sessions));

    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "message": "API online" }))
}

/// A user, a token and a few pages so the API is explorable without a
/// registration flow wired up.
fn seed_demo(store: &MemoryStore, tokens: &TokenTable) {
    let owner = UserProfile {
        id: UserId::new(),
        name: "demo".to_string(),
        image: None,
    };
    store.upsert_user(owner.clone());
    tokens.grant("demo-token", owner.id.clone());

    let now = now_ms();
    for (i, (title, artist)) in [
        ("Midnight Drive", "Neon Harbor"),
        ("Glass Gardens", "Aurora Fields"),
        ("Undertow", "Neon Harbor"),
    ]
    .into_iter()
    .enumerate()
    {
        store.upsert_page(TreePage {
            id: PageId::new(),
            owner: owner.id.clone(),
            title: title.to_string(),
            artist: artist.to_string(),
            album: None,
            description: format!("{title} by {artist}"),
            cover: None,
            is_public: true,
            release_date: now - (i as u64) * 86_400_000,
            created_at: now - (i as u64) * 1_000,
            clicks: 0,
            urls: ServiceLinks::default(),
            yt_id: None,
        });
    }

    tracing::info!("Demo data seeded; authorize with 'Bearer demo-token'");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        tracing::info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
