use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::content::{Block, compose, first_image_src};
use crate::error::{ApiError, Result};
use crate::imaging::MediaStore;
use crate::state::AppState;
use crate::storage::{ArticleListItem, ArticleQuery, Db};

/// 配置浏览侧路由。
///
/// 路由包括：
/// - `GET /`：首页，固定展示字母 a
/// - `GET /articles`：全部文章分页列表
/// - `GET /place/{category}`：分类文章列表
/// - `GET /{letter}`：字母归档
/// - `GET /{letter}/{slug}`：文章详情
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/articles", get(article_list))
        .route("/place/{category}", get(articles_by_category))
        .route("/{letter}", get(letter_archive))
        .route("/{letter}/{slug}", get(article_detail))
}

/// 文章元信息，用于列表展示。
#[derive(Debug, Serialize)]
pub struct ArticleMeta {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub letter: String,
    pub category: String,
    pub category_slug: String,
    pub author: String,
    pub created_at: i64,
    /// 正文里第一张落盘图片的 URL，分类页以外为空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
}

impl From<ArticleListItem> for ArticleMeta {
    fn from(row: ArticleListItem) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            letter: row.letter,
            category: row.category,
            category_slug: row.category_slug,
            author: row.author,
            created_at: row.created_at.timestamp_millis(),
            preview_image: None,
        }
    }
}

/// 字母归档页。
#[derive(Debug, Serialize)]
pub struct LetterPage {
    pub letter: String,
    pub category: String,
    pub articles: Vec<ArticleMeta>,
}

/// 分类页。
#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub category: String,
    pub articles: Vec<ArticleMeta>,
}

/// 详情页的图片引用。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageView {
    pub url: String,
    pub orientation: String,
}

/// 完整文章，包括元信息、交替排列的渲染块和同分类推荐。
#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub letter: String,
    pub category: String,
    pub author: String,
    pub location_info: String,
    pub how_to_get: String,
    pub travel_tips: String,
    pub location_map_embed: String,
    pub created_at: i64,
    pub category_slug: Option<String>,
    pub category_url: Option<String>,
    pub blocks: Vec<Block<ImageView>>,
    pub other_articles: Vec<ArticleMeta>,
}

/// 首页，等价于字母 a 的归档页。
async fn index(State(catalog): State<Arc<Catalog>>, State(pool): State<Db>) -> Result<Json<LetterPage>> {
    letter_page("a", &catalog, &pool).await.map(Json)
}

/// 字母归档页。
///
/// 字母不在字母表内返回 [`ApiError::NotFound`]。
async fn letter_archive(
    Path(letter): Path<String>,
    State(catalog): State<Arc<Catalog>>,
    State(pool): State<Db>,
) -> Result<Json<LetterPage>> {
    let letter = letter.to_lowercase();
    if !catalog.is_letter(&letter) {
        return Err(ApiError::NotFound.into());
    }

    letter_page(&letter, &catalog, &pool).await.map(Json)
}

async fn letter_page(letter: &str, catalog: &Catalog, pool: &Db) -> Result<LetterPage> {
    let articles = pool.list_by_letter(letter).await?;

    // 站点沿用的惯例：字母 a 直接作为 Abu Dhabi 分类页
    let category = if letter == "a" {
        catalog
            .name_for_slug("abudhabi")
            .unwrap_or("Abu Dhabi")
            .to_string()
    } else {
        format!(
            "Travel destinations starting with “{}”",
            letter.to_uppercase()
        )
    };

    Ok(LetterPage {
        letter: letter.to_uppercase(),
        category,
        articles: articles.into_iter().map(ArticleMeta::from).collect(),
    })
}

/// 根据字母和 slug 获取单篇文章。
///
/// 正文按换行拆成段落，与图片按下标交替排列成渲染块；
/// 多出的图片追加在末尾。文章不存在返回 [`ApiError::NotFound`]。
async fn article_detail(
    Path((letter, slug)): Path<(String, String)>,
    State(catalog): State<Arc<Catalog>>,
    State(media): State<MediaStore>,
    State(pool): State<Db>,
) -> Result<Json<ArticleDetail>> {
    let article = pool
        .get_one(&letter.to_lowercase(), &slug)
        .await?
        .ok_or(ApiError::NotFound)?;

    let images = pool
        .images_of(article.id)
        .await?
        .into_iter()
        .map(|row| ImageView {
            url: media.url(&row.path),
            orientation: row.orientation,
        })
        .collect();
    let blocks = compose(&article.content, images);

    let category = article.category.trim().to_string();
    let (other_articles, category_slug) = if category.is_empty() {
        (Vec::new(), None)
    } else {
        let related = pool.related(&category, article.id).await?;
        let slug = catalog.slug_for_name(&category).map(str::to_owned);
        (related, slug)
    };
    let category_url = category_slug.as_deref().map(|s| format!("/place/{s}"));

    Ok(Json(ArticleDetail {
        id: article.id,
        slug: article.slug,
        title: article.title,
        letter: article.letter,
        category: article.category,
        author: article.author,
        location_info: article.location_info,
        how_to_get: article.how_to_get,
        travel_tips: article.travel_tips,
        location_map_embed: article.location_map_embed,
        created_at: article.created_at.timestamp_millis(),
        category_slug,
        category_url,
        blocks,
        other_articles: other_articles.into_iter().map(ArticleMeta::from).collect(),
    }))
}

/// 分类文章列表。
///
/// 每篇文章带可选的预览图：取正文第一个 `<img>` 的 src，
/// 且对应文件确实存在于媒体目录时才返回。
async fn articles_by_category(
    Path(category): Path<String>,
    State(catalog): State<Arc<Catalog>>,
    State(media): State<MediaStore>,
    State(pool): State<Db>,
) -> Result<Json<CategoryPage>> {
    let name = catalog
        .name_for_slug(&category)
        .ok_or(ApiError::NotFound)?
        .to_string();

    let rows = pool.list_by_category(&name).await?;
    let articles = rows
        .into_iter()
        .map(|row| {
            let preview_image = first_image_src(&row.content)
                .filter(|src| media.exists_for_url(src))
                .map(str::to_owned);

            let mut meta = ArticleMeta::from(row);
            meta.preview_image = preview_image;
            meta
        })
        .collect();

    Ok(Json(CategoryPage {
        category: name,
        articles,
    }))
}

/// 查询参数，用于文章列表分页。
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PageParams {
    page: i32,
    limit: i32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self { page: 1, limit: 12 }
    }
}

/// 全部文章的分页列表，新的在前。
async fn article_list(
    Query(params): Query<PageParams>,
    State(pool): State<Db>,
) -> Result<Json<Vec<ArticleMeta>>> {
    let rows = pool.list_page(params.page, params.limit.clamp(1, 100)).await?;

    Ok(Json(rows.into_iter().map(ArticleMeta::from).collect()))
}
