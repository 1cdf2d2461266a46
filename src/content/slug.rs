/// 将标题转换为 URL slug
///
/// 保留 Unicode 字母和数字并转为小写，其余字符折叠为单个 `-`，
/// 去掉首尾的分隔符。
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.trim().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Dubai Skyline"), "dubai-skyline");
        assert_eq!(slugify("Abu Dhabi"), "abu-dhabi");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("a  --  b"), "a-b");
        assert_eq!(slugify("what's up?"), "what-s-up");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  !!Hello!!  "), "hello");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_slugify_keeps_unicode_letters() {
        // 西里尔标题不做音译，保留原字符
        assert_eq!(slugify("Горный Алтай"), "горный-алтай");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
    }
}
