//! 富文本预览辅助
//!
//! 文章正文是富文本编辑器产出的 HTML。分类列表页需要从中提取
//! 第一张内嵌图片作为预览图，列表摘要需要去掉除 `<img>` 以外的标签。
//! 这里只做轻量的字符串扫描，不引入完整的 HTML 解析。

/// 提取正文中第一个 `<img>` 标签的 `src` 属性值
///
/// 没有图片或图片没有 `src` 时返回 `None`。
pub fn first_image_src(html: &str) -> Option<&str> {
    let start = find_ci(html, "<img")?;
    let rest = &html[start..];
    let end = rest.find('>').map(|i| i + 1).unwrap_or(rest.len());

    attr_value(&rest[..end], "src")
}

/// 去掉除 `<img …>` 之外的全部标签，保留文本内容
pub fn strip_tags_except_img(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match tail.find('>') {
            Some(close) => {
                let tag = &tail[..=close];
                if is_img_tag(tag) {
                    out.push_str(tag);
                }
                rest = &tail[close + 1..];
            }
            None => {
                // 未闭合的尖括号按普通文本处理
                out.push_str(tail);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// 在 ASCII 大小写不敏感的前提下查找子串的字节偏移
///
/// needle 必须是纯 ASCII，保证返回的偏移落在字符边界上。
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    (0..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

/// 在单个标签文本内查找属性值，支持单双引号和无引号写法
fn attr_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let mut search = 0;
    while let Some(found) = find_ci(&tag[search..], name) {
        let pos = search + found;
        search = pos + name.len();

        // 属性名前面必须是空白，避免匹配到其他属性名的一部分
        let before_ok = tag[..pos]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_whitespace());
        if !before_ok {
            continue;
        }

        let after = tag[pos + name.len()..].trim_start();
        let Some(value) = after.strip_prefix('=') else {
            continue;
        };
        let value = value.trim_start();

        let mut chars = value.chars();
        return match chars.next() {
            Some(quote @ ('"' | '\'')) => {
                let value = &value[1..];
                value.find(quote).map(|end| &value[..end])
            }
            Some(_) => {
                let end = value
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(value.len());
                Some(&value[..end])
            }
            None => None,
        };
    }
    None
}

fn is_img_tag(tag: &str) -> bool {
    let inner = tag.trim_start_matches('<').trim_start();
    let Some(rest) = inner.get(..3) else {
        return false;
    };
    if !rest.eq_ignore_ascii_case("img") {
        return false;
    }
    inner[3..].chars().next().is_none_or(|c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_image_src_found() {
        let html = r#"<p>Intro</p><img src="/media/article_images/a.jpg" alt="x"><p>More</p>"#;

        assert_eq!(first_image_src(html), Some("/media/article_images/a.jpg"));
    }

    #[test]
    fn test_first_image_src_returns_first_of_many() {
        let html = r#"<img src='one.jpg'><img src="two.jpg">"#;

        assert_eq!(first_image_src(html), Some("one.jpg"));
    }

    #[test]
    fn test_first_image_src_case_insensitive() {
        let html = r#"<IMG SRC="upper.png">"#;

        assert_eq!(first_image_src(html), Some("upper.png"));
    }

    #[test]
    fn test_first_image_src_absent() {
        assert_eq!(first_image_src("<p>no pictures here</p>"), None);
        assert_eq!(first_image_src(""), None);
        // 有标签但没有 src
        assert_eq!(first_image_src("<img alt=\"x\">"), None);
    }

    #[test]
    fn test_first_image_src_ignores_other_src_like_attrs() {
        let html = r#"<img data-src="lazy.jpg" src="real.jpg">"#;

        assert_eq!(first_image_src(html), Some("real.jpg"));
    }

    #[test]
    fn test_strip_tags_keeps_img_and_text() {
        let html = r#"<p>Hello <b>world</b></p><img src="a.jpg"><div>tail</div>"#;

        assert_eq!(
            strip_tags_except_img(html),
            r#"Hello world<img src="a.jpg">tail"#
        );
    }

    #[test]
    fn test_strip_tags_drops_closing_img() {
        assert_eq!(strip_tags_except_img("<img src='a'></img>text"), "<img src='a'>text");
    }

    #[test]
    fn test_strip_tags_unclosed_bracket_is_text() {
        assert_eq!(strip_tags_except_img("a < b"), "a < b");
    }
}
