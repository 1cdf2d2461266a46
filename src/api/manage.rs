use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};

use super::query::ArticleMeta;

use crate::catalog::Catalog;
use crate::content::slugify;
use crate::error::{ApiError, Error, Result};
use crate::imaging::{self, MediaStore, Orientation};
use crate::state::AppState;
use crate::storage::{ArticleQuery, ArticleStorage, Db, NewArticle};

/// 上传请求体上限，需要容纳整相机照片
const UPLOAD_BODY_LIMIT: usize = 25 * 1024 * 1024;

/// 配置后台管理路由。
///
/// 路由包括：
/// - `GET /manage/articles`：后台文章列表，可按作者过滤
/// - `POST /manage/articles`：创建文章（multipart 表单 + 图片）
/// - `POST /manage/articles/{id}`：编辑文章，追加新图片
/// - `DELETE /manage/articles/{id}`：删除文章
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/manage/articles", get(dashboard).post(create_article))
        .route(
            "/manage/articles/{id}",
            post(update_article).delete(delete_article),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

/// 文章表单的文本字段
#[derive(Debug, Default)]
struct ArticleForm {
    title: String,
    slug: String,
    letter: String,
    category: String,
    category_en: String,
    author: String,
    content: String,
    location_info: String,
    how_to_get: String,
    travel_tips: String,
    location_map_embed: String,
}

/// 一个上传文件的原始字节和文件名
struct UploadedFile {
    filename: String,
    bytes: Bytes,
}

/// 成功入库的图片
#[derive(Debug, Serialize)]
pub struct SavedImage {
    pub path: String,
    pub orientation: Orientation,
}

/// 创建/编辑的响应体
#[derive(Debug, Serialize)]
pub struct ManageResponse {
    pub id: i64,
    pub slug: String,
    /// 本次成功入库的图片
    pub images: Vec<SavedImage>,
    /// 本次无法解码而被跳过的文件名
    pub failed_images: Vec<String>,
}

/// 读取 multipart 表单，文本字段与 `images` 文件字段分开收集
async fn read_form(mut multipart: Multipart) -> Result<(ArticleForm, Vec<UploadedFile>)> {
    let mut form = ArticleForm::default();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "images" {
            let filename = field.file_name().unwrap_or_default().to_owned();
            if filename.is_empty() {
                continue;
            }
            let bytes = field.bytes().await?;
            files.push(UploadedFile { filename, bytes });
            continue;
        }

        let value = field.text().await?;
        match name.as_str() {
            "title" => form.title = value,
            "slug" => form.slug = value,
            "letter" => form.letter = value,
            "category" => form.category = value,
            "category_en" => form.category_en = value,
            "author" => form.author = value,
            "content" => form.content = value,
            "location_info" => form.location_info = value,
            "how_to_get" => form.how_to_get = value,
            "travel_tips" => form.travel_tips = value,
            "location_map_embed" => form.location_map_embed = value,
            _ => {}
        }
    }

    Ok((form, files))
}

/// 表单字段转待写入的文章，并做基本校验
fn build_article(catalog: &Catalog, form: ArticleForm) -> Result<NewArticle> {
    let letter = form.letter.trim().to_lowercase();
    if !catalog.is_letter(&letter) {
        return Err(Error::FormatError("letter must be a single latin letter"));
    }
    if form.title.trim().is_empty() {
        return Err(Error::FormatError("title must not be empty"));
    }

    // 分类 slug 优先取英文名
    let category_slug = if !form.category_en.trim().is_empty() {
        slugify(&form.category_en)
    } else {
        slugify(&form.category)
    };

    Ok(NewArticle {
        slug: form.slug.trim().to_string(),
        title: form.title.trim().to_string(),
        letter,
        category: form.category.trim().to_string(),
        category_en: form.category_en.trim().to_string(),
        category_slug,
        author: form.author.trim().to_string(),
        content: form.content,
        location_info: form.location_info,
        how_to_get: form.how_to_get,
        travel_tips: form.travel_tips,
        location_map_embed: form.location_map_embed,
    })
}

/// 生成未被占用的 slug：base、base-1、base-2 …
async fn unique_slug(pool: &Db, base: &str) -> Result<String> {
    let mut slug = base.to_string();
    let mut num = 1;
    while pool.slug_exists(&slug).await? {
        slug = format!("{base}-{num}");
        num += 1;
    }
    Ok(slug)
}

/// 逐个归一化并入库上传图片
///
/// 单个文件解码失败只记录并跳过，不影响同批的其他文件。
async fn ingest_images(
    pool: &Db,
    media: &MediaStore,
    article_id: i64,
    files: Vec<UploadedFile>,
) -> (Vec<SavedImage>, Vec<String>) {
    let mut saved = Vec::new();
    let mut failed = Vec::new();

    for file in files {
        match ingest_one(pool, media, article_id, &file).await {
            Ok(image) => saved.push(image),
            Err(e) => {
                tracing::warn!(filename = %file.filename, error = %e, "图片归一化失败，跳过该文件");
                failed.push(file.filename);
            }
        }
    }

    (saved, failed)
}

/// 归一化单个文件：解码失败时不落盘也不写库
async fn ingest_one(
    pool: &Db,
    media: &MediaStore,
    article_id: i64,
    file: &UploadedFile,
) -> Result<SavedImage> {
    let normalized = imaging::normalize(&file.bytes)?;
    let path = media.save(&file.filename, &normalized.bytes)?;

    let mut store = pool.clone();
    store
        .insert_image(article_id, &path, normalized.orientation.as_str())
        .await?;

    Ok(SavedImage {
        path,
        orientation: normalized.orientation,
    })
}

/// 创建文章。
///
/// slug 留空时根据标题生成并用 -1、-2 后缀避开冲突。
async fn create_article(
    State(catalog): State<Arc<Catalog>>,
    State(media): State<MediaStore>,
    State(pool): State<Db>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ManageResponse>)> {
    let (form, files) = read_form(multipart).await?;

    let mut article = build_article(&catalog, form)?;
    if article.slug.is_empty() {
        article.slug = unique_slug(&pool, &slugify(&article.title)).await?;
    }

    let mut store = pool.clone();
    let id = store.insert_article(&article).await?;
    tracing::info!(id, slug = %article.slug, "article created");

    let (images, failed_images) = ingest_images(&pool, &media, id, files).await;

    Ok((
        StatusCode::CREATED,
        Json(ManageResponse {
            id,
            slug: article.slug,
            images,
            failed_images,
        }),
    ))
}

/// 编辑文章。
///
/// 全量覆盖文本字段；slug 和作者留空时沿用原值。
/// 新上传的图片追加到既有集合末尾，已有图片不再重新归一化。
async fn update_article(
    Path(id): Path<i64>,
    State(catalog): State<Arc<Catalog>>,
    State(media): State<MediaStore>,
    State(pool): State<Db>,
    multipart: Multipart,
) -> Result<Json<ManageResponse>> {
    let existing = pool.get_by_id(id).await?.ok_or(ApiError::NotFound)?;

    let (form, files) = read_form(multipart).await?;
    let mut article = build_article(&catalog, form)?;
    if article.slug.is_empty() {
        article.slug = existing.slug;
    }
    if article.author.is_empty() {
        article.author = existing.author;
    }

    let mut store = pool.clone();
    store.update_article(id, &article).await?;

    let (images, failed_images) = ingest_images(&pool, &media, id, files).await;

    Ok(Json(ManageResponse {
        id,
        slug: article.slug,
        images,
        failed_images,
    }))
}

/// 删除文章，图片记录级联删除。
async fn delete_article(Path(id): Path<i64>, State(pool): State<Db>) -> Result<StatusCode> {
    let mut store = pool.clone();
    if store.delete_article(id).await? == 0 {
        return Err(ApiError::NotFound.into());
    }
    tracing::info!(id, "article deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// 查询参数，用于后台列表按作者过滤。
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DashboardParams {
    author: Option<String>,
}

/// 后台文章列表。
async fn dashboard(
    Query(params): Query<DashboardParams>,
    State(pool): State<Db>,
) -> Result<Json<Vec<ArticleMeta>>> {
    let rows = pool.list_by_author(params.author.as_deref()).await?;

    Ok(Json(rows.into_iter().map(ArticleMeta::from).collect()))
}
