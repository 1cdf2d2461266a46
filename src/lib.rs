pub mod api;
pub mod catalog;
pub mod content;
pub mod error;
pub mod imaging;
pub mod state;
pub mod storage;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use crate::{catalog::Catalog, imaging::MediaStore, state::AppState};

pub async fn run() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("TRAVELNOTE_LOG"))
        .init();

    let pool = storage::init_db_from_env().await;
    let catalog = Catalog::from_env_or_default().expect("加载站点目录失败");
    let media = MediaStore::from_env();

    let state = AppState::new(pool, catalog, media);

    api::run_server(state).await
}
