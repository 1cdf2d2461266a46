use serde::Serialize;

/// 渲染块
///
/// 文章详情页由段落块和图片块交替组成。块只在渲染时构造，不落库。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum Block<I> {
    Paragraph(String),
    Image(I),
}

/// 按换行拆分正文，丢弃修剪后为空的段落，保留其余段落的相对顺序
pub fn split_paragraphs(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect()
}

/// 将正文段落与图片按下标交替排列
///
/// 第 i 段后面跟第 i 张图，两边按位置配对；图片多出来的部分
/// 原样追加在末尾，段落多出来的部分后面不再出现图片。
pub fn compose<I>(content: &str, images: Vec<I>) -> Vec<Block<I>> {
    let paragraphs = split_paragraphs(content);
    let mut images = images.into_iter();

    let mut blocks = Vec::with_capacity(paragraphs.len() + images.len());
    for paragraph in paragraphs {
        blocks.push(Block::Paragraph(paragraph));
        if let Some(image) = images.next() {
            blocks.push(Block::Image(image));
        }
    }
    blocks.extend(images.map(Block::Image));
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(text: &str) -> Block<&'static str> {
        Block::Paragraph(text.to_string())
    }

    #[test]
    fn test_compose_interleaves_by_index() {
        let blocks = compose("Hello\n\nWorld", vec!["img1"]);

        assert_eq!(
            blocks,
            vec![paragraph("Hello"), Block::Image("img1"), paragraph("World")]
        );
    }

    #[test]
    fn test_compose_text_only() {
        let blocks = compose::<&str>("Only text", vec![]);

        assert_eq!(blocks, vec![paragraph("Only text")]);
    }

    #[test]
    fn test_compose_images_only() {
        let blocks = compose("", vec!["img1", "img2"]);

        assert_eq!(blocks, vec![Block::Image("img1"), Block::Image("img2")]);
    }

    #[test]
    fn test_compose_both_empty() {
        let blocks = compose::<&str>("", vec![]);

        assert!(blocks.is_empty());
    }

    #[test]
    fn test_compose_whitespace_content_yields_no_paragraphs() {
        let blocks = compose("   \n\t\n  ", vec!["img1"]);

        assert_eq!(blocks, vec![Block::Image("img1")]);
    }

    #[test]
    fn test_compose_extra_images_appended_at_tail() {
        let blocks = compose("One\nTwo", vec!["a", "b", "c", "d"]);

        assert_eq!(
            blocks,
            vec![
                paragraph("One"),
                Block::Image("a"),
                paragraph("Two"),
                Block::Image("b"),
                Block::Image("c"),
                Block::Image("d"),
            ]
        );
    }

    #[test]
    fn test_compose_extra_paragraphs_have_no_trailing_images() {
        let blocks = compose("One\nTwo\nThree", vec!["a"]);

        assert_eq!(
            blocks,
            vec![
                paragraph("One"),
                Block::Image("a"),
                paragraph("Two"),
                paragraph("Three"),
            ]
        );
    }

    #[test]
    fn test_compose_output_length_is_sum() {
        let content = "a\nb\nc\nd\ne";
        for n in 0..8 {
            let images: Vec<usize> = (0..n).collect();
            let blocks = compose(content, images);
            assert_eq!(blocks.len(), 5 + n);
        }
    }

    #[test]
    fn test_compose_strict_alternation_prefix() {
        let blocks = compose("a\nb\nc", vec![1, 2, 3, 4, 5]);

        // 前 min(p, n) * 2 个块严格按 段落/图片 交替
        for (i, block) in blocks.iter().take(6).enumerate() {
            if i % 2 == 0 {
                assert!(matches!(block, Block::Paragraph(_)), "块 {} 应为段落", i);
            } else {
                assert!(matches!(block, Block::Image(_)), "块 {} 应为图片", i);
            }
        }
        assert!(matches!(blocks[6], Block::Image(4)));
        assert!(matches!(blocks[7], Block::Image(5)));
    }

    #[test]
    fn test_split_paragraphs_trims_and_drops_empty() {
        let paragraphs = split_paragraphs("  Hello \n\n\t\nWorld\n");

        assert_eq!(paragraphs, vec!["Hello", "World"]);
    }

    #[test]
    fn test_split_paragraphs_idempotent() {
        let first = split_paragraphs("  a \n\n b\nc  \n\n");
        let second = split_paragraphs(&first.join("\n"));

        assert_eq!(first, second);
    }

    #[test]
    fn test_block_serializes_with_type_tag() {
        let blocks = compose("Hi", vec!["p.jpg"]);
        let json = serde_json::to_value(&blocks).expect("序列化失败");

        assert_eq!(json[0]["type"], "paragraph");
        assert_eq!(json[0]["content"], "Hi");
        assert_eq!(json[1]["type"], "image");
        assert_eq!(json[1]["content"], "p.jpg");
    }
}
