use chrono::{DateTime, Local};

/// 文章详情行
///
/// 包含文章全部字段，用于详情页和编辑前读取。
#[derive(Debug, sqlx::FromRow)]
pub struct ArticleRow {
    pub id: i64,
    /// 文章唯一标识
    pub slug: String,
    /// 标题
    pub title: String,
    /// 归档字母，单个小写拉丁字母
    pub letter: String,
    /// 分类名（展示用）
    pub category: String,
    /// 分类英文名，用于生成分类 slug
    pub category_en: String,
    /// 分类 slug
    pub category_slug: String,
    /// 作者名称
    pub author: String,
    /// 富文本正文
    pub content: String,
    /// 地点介绍
    pub location_info: String,
    /// 到达方式
    pub how_to_get: String,
    /// 实用建议
    pub travel_tips: String,
    /// 地图嵌入代码
    pub location_map_embed: String,
    /// 创建时间
    pub created_at: DateTime<Local>,
}

/// 文章列表行
///
/// 用于归档、分类和后台列表。保留 content 是因为分类页
/// 要从正文里提取预览图。
#[derive(Debug, sqlx::FromRow)]
pub struct ArticleListItem {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub letter: String,
    pub category: String,
    pub category_slug: String,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Local>,
}

/// 文章图片行
///
/// 行一旦写入不再修改；id 递增即上传顺序。
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImageRow {
    pub id: i64,
    /// 相对媒体目录的存储路径
    pub path: String,
    /// 版式，"horizontal" 或 "vertical"
    pub orientation: String,
}

/// 待写入的文章字段
#[derive(Debug, Default)]
pub struct NewArticle {
    pub slug: String,
    pub title: String,
    pub letter: String,
    pub category: String,
    pub category_en: String,
    pub category_slug: String,
    pub author: String,
    pub content: String,
    pub location_info: String,
    pub how_to_get: String,
    pub travel_tips: String,
    pub location_map_embed: String,
}
