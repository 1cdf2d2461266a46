use super::{ArticleListItem, ArticleRow, Db, ImageRow};

const LIST_COLUMNS: &str =
    "id, slug, title, letter, category, category_slug, author, content, created_at";

/// Trait 用于查询文章相关数据
///
/// 提供详情、归档、分类、分页列表和图片集合的查询接口。
pub trait ArticleQuery {
    /// 获取 [`Db`] 对象
    fn db(&self) -> &Db;

    /// 按字母和 slug 查询单篇文章
    ///
    /// 返回 [`ArticleRow`]，文章不存在时返回 `None`。
    fn get_one(
        &self,
        letter: &str,
        slug: &str,
    ) -> impl Future<Output = Result<Option<ArticleRow>, sqlx::Error>> {
        async move {
            sqlx::query_as::<_, ArticleRow>(
                "SELECT * FROM articles WHERE letter = $1 AND slug = $2",
            )
            .bind(letter)
            .bind(slug)
            .fetch_optional(self.db())
            .await
        }
    }

    /// 按主键查询单篇文章
    fn get_by_id(&self, id: i64) -> impl Future<Output = Result<Option<ArticleRow>, sqlx::Error>> {
        async move {
            sqlx::query_as::<_, ArticleRow>("SELECT * FROM articles WHERE id = $1")
                .bind(id)
                .fetch_optional(self.db())
                .await
        }
    }

    /// 查询某个字母下的全部文章，新的在前
    fn list_by_letter(
        &self,
        letter: &str,
    ) -> impl Future<Output = Result<Vec<ArticleListItem>, sqlx::Error>> {
        async move {
            sqlx::query_as::<_, ArticleListItem>(&format!(
                "SELECT {LIST_COLUMNS} FROM articles WHERE letter = $1 ORDER BY created_at DESC"
            ))
            .bind(letter)
            .fetch_all(self.db())
            .await
        }
    }

    /// 查询某个分类下的全部文章，新的在前
    fn list_by_category(
        &self,
        category: &str,
    ) -> impl Future<Output = Result<Vec<ArticleListItem>, sqlx::Error>> {
        async move {
            sqlx::query_as::<_, ArticleListItem>(&format!(
                "SELECT {LIST_COLUMNS} FROM articles WHERE category = $1 ORDER BY created_at DESC"
            ))
            .bind(category)
            .fetch_all(self.db())
            .await
        }
    }

    /// 分页查询文章列表，新的在前
    fn list_page(
        &self,
        page: i32,
        limit: i32,
    ) -> impl Future<Output = Result<Vec<ArticleListItem>, sqlx::Error>> {
        async move {
            let offset = (page.max(1) - 1) * limit;
            sqlx::query_as::<_, ArticleListItem>(&format!(
                "SELECT {LIST_COLUMNS} FROM articles ORDER BY created_at DESC \
                 LIMIT $1 OFFSET $2"
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(self.db())
            .await
        }
    }

    /// 后台列表，可按作者过滤
    fn list_by_author(
        &self,
        author: Option<&str>,
    ) -> impl Future<Output = Result<Vec<ArticleListItem>, sqlx::Error>> {
        async move {
            let mut builder = sqlx::QueryBuilder::new(format!(
                "SELECT {LIST_COLUMNS} FROM articles "
            ));
            if let Some(author) = author {
                builder.push("WHERE author = ").push_bind(author);
            }
            builder.push(" ORDER BY created_at DESC");

            builder
                .build_query_as::<ArticleListItem>()
                .fetch_all(self.db())
                .await
        }
    }

    /// 同分类下随机挑选至多 5 篇其他文章
    fn related(
        &self,
        category: &str,
        exclude_id: i64,
    ) -> impl Future<Output = Result<Vec<ArticleListItem>, sqlx::Error>> {
        async move {
            sqlx::query_as::<_, ArticleListItem>(&format!(
                "SELECT {LIST_COLUMNS} FROM articles \
                 WHERE category = $1 AND id <> $2 ORDER BY RANDOM() LIMIT 5"
            ))
            .bind(category)
            .bind(exclude_id)
            .fetch_all(self.db())
            .await
        }
    }

    /// 查询文章的图片集合，按上传顺序返回
    fn images_of(
        &self,
        article_id: i64,
    ) -> impl Future<Output = Result<Vec<ImageRow>, sqlx::Error>> {
        async move {
            sqlx::query_as::<_, ImageRow>(
                "SELECT id, path, orientation FROM article_images \
                 WHERE article_id = $1 ORDER BY id",
            )
            .bind(article_id)
            .fetch_all(self.db())
            .await
        }
    }

    /// 判断 slug 是否已被占用
    fn slug_exists(&self, slug: &str) -> impl Future<Output = Result<bool, sqlx::Error>> {
        async move {
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM articles WHERE slug = $1)")
                .bind(slug)
                .fetch_one(self.db())
                .await
        }
    }
}

impl ArticleQuery for Db {
    fn db(&self) -> &Db {
        self
    }
}
