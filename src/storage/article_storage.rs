use sqlx::PgExecutor;

use super::{Db, NewArticle};

/// 提供文章和图片的数据库写入接口
///
/// 文章支持增删改；图片行只增不改，随文章级联删除。
pub trait ArticleStorage {
    /// 获取 SQL 执行器，用于 [`sqlx::query()`] 执行
    fn executor<'t>(&'t mut self) -> impl PgExecutor<'t>;

    /// 插入文章，返回新行的主键
    fn insert_article(
        &mut self,
        article: &NewArticle,
    ) -> impl Future<Output = Result<i64, sqlx::Error>> {
        async {
            sqlx::query_scalar(
                "
                INSERT INTO articles
                    (slug, title, letter, category, category_en, category_slug,
                     author, content, location_info, how_to_get, travel_tips,
                     location_map_embed)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                RETURNING id
                ",
            )
            .bind(&article.slug)
            .bind(&article.title)
            .bind(&article.letter)
            .bind(&article.category)
            .bind(&article.category_en)
            .bind(&article.category_slug)
            .bind(&article.author)
            .bind(&article.content)
            .bind(&article.location_info)
            .bind(&article.how_to_get)
            .bind(&article.travel_tips)
            .bind(&article.location_map_embed)
            .fetch_one(self.executor())
            .await
        }
    }

    /// 更新文章全部字段，返回受影响的行数
    fn update_article(
        &mut self,
        id: i64,
        article: &NewArticle,
    ) -> impl Future<Output = Result<u64, sqlx::Error>> {
        async move {
            let result = sqlx::query(
                "
                UPDATE articles SET
                    slug = $2, title = $3, letter = $4, category = $5,
                    category_en = $6, category_slug = $7, author = $8,
                    content = $9, location_info = $10, how_to_get = $11,
                    travel_tips = $12, location_map_embed = $13
                WHERE id = $1
                ",
            )
            .bind(id)
            .bind(&article.slug)
            .bind(&article.title)
            .bind(&article.letter)
            .bind(&article.category)
            .bind(&article.category_en)
            .bind(&article.category_slug)
            .bind(&article.author)
            .bind(&article.content)
            .bind(&article.location_info)
            .bind(&article.how_to_get)
            .bind(&article.travel_tips)
            .bind(&article.location_map_embed)
            .execute(self.executor())
            .await?;
            Ok(result.rows_affected())
        }
    }

    /// 删除文章，图片行由外键级联删除，返回受影响的行数
    fn delete_article(&mut self, id: i64) -> impl Future<Output = Result<u64, sqlx::Error>> {
        async move {
            let result = sqlx::query("DELETE FROM articles WHERE id = $1")
                .bind(id)
                .execute(self.executor())
                .await?;
            Ok(result.rows_affected())
        }
    }

    /// 为文章追加一条图片记录
    fn insert_image(
        &mut self,
        article_id: i64,
        path: &str,
        orientation: &str,
    ) -> impl Future<Output = Result<(), sqlx::Error>> {
        async move {
            sqlx::query(
                "INSERT INTO article_images (article_id, path, orientation) VALUES ($1, $2, $3)",
            )
            .bind(article_id)
            .bind(path)
            .bind(orientation)
            .execute(self.executor())
            .await?;
            Ok(())
        }
    }
}

/// 为 [`sqlx::PgTransaction`] 实现 [`ArticleStorage`]
impl ArticleStorage for sqlx::PgTransaction<'_> {
    fn executor<'t>(&'t mut self) -> impl PgExecutor<'t> {
        self.as_mut()
    }
}

/// 为 [`Db`] 实现 [`ArticleStorage`]
impl ArticleStorage for Db {
    fn executor<'t>(&'t mut self) -> impl PgExecutor<'t> {
        &*self
    }
}
