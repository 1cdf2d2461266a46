use std::env;

use serde::Deserialize;

use crate::error::Result;

/// 站点字母表，按字母归档用
pub const LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";

/// 站点目录
///
/// 字母表和分类映射在进程启动时加载一次，之后只读。
#[derive(Debug, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
}

/// 分类条目，slug 用于 URL，name 用于展示
#[derive(Debug, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
}

impl Default for Catalog {
    fn default() -> Self {
        let categories = [
            ("abudhabi", "Abu Dhabi"),
            ("dubai", "Dubai"),
            ("istanbul", "Istanbul"),
            ("almaty", "Almaty"),
            ("burabay", "Burabay"),
        ]
        .into_iter()
        .map(|(slug, name)| Category {
            slug: slug.to_string(),
            name: name.to_string(),
        })
        .collect();

        Self { categories }
    }
}

impl Catalog {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Into::into)
    }

    /// 从环境变量 `TRAVELNOTE_CATALOG` 指定的 TOML 文件加载目录
    ///
    /// 未设置时使用内置默认分类。
    pub fn from_env_or_default() -> Result<Self> {
        match env::var("TRAVELNOTE_CATALOG") {
            Ok(path) => Self::from_toml_str(&std::fs::read_to_string(path)?),
            Err(_) => Ok(Self::default()),
        }
    }

    /// 判断是否为合法的归档字母（单个小写拉丁字母）
    pub fn is_letter(&self, letter: &str) -> bool {
        let mut chars = letter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => LETTERS.contains(c),
            _ => false,
        }
    }

    /// 字母在字母表中的序号，从 1 开始
    pub fn letter_index(&self, letter: &str) -> Option<usize> {
        if !self.is_letter(letter) {
            return None;
        }
        LETTERS.find(letter).map(|pos| pos + 1)
    }

    /// 根据 URL slug 查找分类名
    pub fn name_for_slug(&self, slug: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.slug.eq_ignore_ascii_case(slug))
            .map(|c| c.name.as_str())
    }

    /// 根据分类名反查 URL slug，名称比较忽略大小写和首尾空白
    pub fn slug_for_name(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .map(|c| c.slug.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_lookups() {
        let catalog = Catalog::default();

        assert_eq!(catalog.name_for_slug("abudhabi"), Some("Abu Dhabi"));
        assert_eq!(catalog.name_for_slug("DUBAI"), Some("Dubai"));
        assert_eq!(catalog.name_for_slug("nowhere"), None);

        assert_eq!(catalog.slug_for_name("Abu Dhabi"), Some("abudhabi"));
        assert_eq!(catalog.slug_for_name("  abu dhabi  "), Some("abudhabi"));
        assert_eq!(catalog.slug_for_name("Atlantis"), None);
    }

    #[test]
    fn test_letter_validation() {
        let catalog = Catalog::default();

        assert!(catalog.is_letter("a"));
        assert!(catalog.is_letter("z"));
        assert!(!catalog.is_letter("A"));
        assert!(!catalog.is_letter("ab"));
        assert!(!catalog.is_letter(""));
        assert!(!catalog.is_letter("1"));

        assert_eq!(catalog.letter_index("a"), Some(1));
        assert_eq!(catalog.letter_index("z"), Some(26));
        assert_eq!(catalog.letter_index("!"), None);
    }

    #[test]
    fn test_catalog_from_toml() {
        let toml_content = r#"
            [[categories]]
            slug = "almaty"
            name = "Almaty"

            [[categories]]
            slug = "burabay"
            name = "Burabay"
        "#;

        let catalog = Catalog::from_toml_str(toml_content).expect("解析目录失败");
        assert_eq!(catalog.name_for_slug("almaty"), Some("Almaty"));
        assert_eq!(catalog.name_for_slug("abudhabi"), None);
    }

    #[test]
    fn test_catalog_from_invalid_toml_fails() {
        assert!(Catalog::from_toml_str("categories = 1").is_err());
    }
}
