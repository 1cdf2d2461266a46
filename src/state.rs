use std::sync::Arc;

use axum::extract::FromRef;

use crate::{catalog::Catalog, imaging::MediaStore, storage::Db};

/// 应用程序上下文
///
/// [`AppState`] 封装了数据库连接池、站点目录和媒体存储，提供统一访问入口。
#[derive(Clone, FromRef)]
pub struct AppState {
    pool: Db,
    catalog: Arc<Catalog>,
    media: MediaStore,
}

impl AppState {
    /// 创建一个新的 [`AppState`] 实例
    pub fn new(pool: Db, catalog: Catalog, media: MediaStore) -> Self {
        Self {
            pool,
            catalog: Arc::new(catalog),
            media,
        }
    }
}
