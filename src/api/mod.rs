mod manage;

mod query;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// 配置全部路由并绑定应用状态
pub fn setup_route(state: AppState) -> Router {
    Router::new()
        .merge(query::setup_route())
        .merge(manage::setup_route())
        .with_state(state)
}

pub async fn run_server(state: AppState) {
    let router = add_middlewares(setup_route(state));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("Listening on :3000");
    axum::serve(listener, router).await.unwrap();
}

fn add_middlewares(router: Router) -> Router {
    fn log_failure(
        err: tower_http::classify::ServerErrorsFailureClass,
        _latency: std::time::Duration,
        _span: &tracing::Span,
    ) {
        tracing::error!(error = %err, "request failed");
    }

    router.layer(TraceLayer::new_for_http().on_failure(log_failure))
}
