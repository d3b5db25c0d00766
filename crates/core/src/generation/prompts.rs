//! Prompt templates for tag generation.

/// System instructions for the tag generator
pub const TAG_GENERATOR: &str = include_str!("defaults/tag_generator.md");

/// User instruction asking for `count` names in `category`
pub fn tag_request(category: &str, count: usize) -> String {
    format!(
        "请为\"{}\"这个类别列出{}个知名品牌或项目名称，只返回 JSON 数组。",
        category, count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_is_bundled() {
        assert!(TAG_GENERATOR.contains("JSON"));
    }

    #[test]
    fn test_tag_request_mentions_category_and_count() {
        let prompt = tag_request("奶茶", 7);
        assert!(prompt.contains("\"奶茶\""));
        assert!(prompt.contains('7'));
    }
}
