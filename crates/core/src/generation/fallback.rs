//! # Fallback Table
//!
//! Offline, keyword-indexed name lists used when the provider is unavailable
//! or comes back short. Matching is first-match in declaration order, so a
//! category that hits keywords from two groups (say "coffee game") lands in
//! whichever group is declared first.
//!
//! Chinese keywords match anywhere in the category. ASCII keywords only
//! match as whole words (an optional plural `s`/`es` allowed), so `tea` hits
//! "milk tea" and "teas" but not "steam" or "team".

use regex::Regex;
use std::sync::OnceLock;

use crate::state::{IdPrefix, Tag};

/// A curated group of well-known names and the keywords that select it
#[derive(Debug)]
pub struct FallbackGroup {
    pub label: &'static str,
    /// Lower-case keywords matched against the lower-cased category
    pub keywords: &'static [&'static str],
    pub items: &'static [&'static str],
}

pub const FALLBACK_GROUPS: &[FallbackGroup] = &[
    FallbackGroup {
        label: "beverage",
        keywords: &[
            "奶茶", "饮品", "饮料", "茶饮", "咖啡", "果汁", "milk tea", "coffee", "tea", "drink",
            "beverage",
        ],
        items: &[
            "蜜雪冰城",
            "喜茶",
            "奈雪的茶",
            "茶百道",
            "古茗",
            "霸王茶姬",
            "一点点",
            "CoCo都可",
            "书亦烧仙草",
            "瑞幸咖啡",
        ],
    },
    FallbackGroup {
        label: "food",
        keywords: &["餐厅", "美食", "快餐", "火锅", "restaurant", "food", "fast food"],
        items: &[
            "麦当劳",
            "肯德基",
            "海底捞",
            "必胜客",
            "汉堡王",
            "老乡鸡",
            "西贝莜面村",
            "呷哺呷哺",
            "真功夫",
            "外婆家",
        ],
    },
    FallbackGroup {
        label: "games",
        keywords: &["游戏", "手游", "网游", "game"],
        items: &[
            "王者荣耀",
            "原神",
            "英雄联盟",
            "和平精英",
            "我的世界",
            "崩坏：星穹铁道",
            "永劫无间",
            "第五人格",
            "蛋仔派对",
            "绝地求生",
        ],
    },
    FallbackGroup {
        label: "phones",
        keywords: &["手机", "数码", "电子", "phone", "smartphone"],
        items: &[
            "苹果", "华为", "小米", "OPPO", "vivo", "荣耀", "三星", "一加", "真我", "魅族",
        ],
    },
    FallbackGroup {
        label: "cars",
        keywords: &["汽车", "新能源", "车企", "automobile", "car brand"],
        items: &[
            "比亚迪",
            "特斯拉",
            "理想",
            "蔚来",
            "小鹏",
            "丰田",
            "大众",
            "宝马",
            "奔驰",
            "奥迪",
        ],
    },
    FallbackGroup {
        label: "sportswear",
        keywords: &["运动", "球鞋", "sneaker", "sportswear"],
        items: &[
            "耐克",
            "阿迪达斯",
            "李宁",
            "安踏",
            "特步",
            "匹克",
            "361度",
            "彪马",
            "新百伦",
            "亚瑟士",
        ],
    },
    FallbackGroup {
        label: "snacks",
        keywords: &["零食", "小吃", "snack"],
        items: &[
            "三只松鼠",
            "良品铺子",
            "百草味",
            "卫龙",
            "旺旺",
            "乐事",
            "奥利奥",
            "盐津铺子",
            "洽洽",
            "好丽友",
        ],
    },
];

/// One pattern per group, in `FALLBACK_GROUPS` order
fn group_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        FALLBACK_GROUPS
            .iter()
            .map(|group| {
                let alternatives: Vec<String> = group
                    .keywords
                    .iter()
                    .map(|kw| {
                        if kw.is_ascii() {
                            format!(r"(?:^|[^a-z0-9]){}(?:e?s)?(?:[^a-z0-9]|$)", regex::escape(kw))
                        } else {
                            regex::escape(kw)
                        }
                    })
                    .collect();
                Regex::new(&alternatives.join("|")).expect("keyword patterns compile")
            })
            .collect()
    })
}

/// First group whose keywords appear in `category`
pub fn match_group(category: &str) -> Option<&'static FallbackGroup> {
    let lowered = category.to_lowercase();
    FALLBACK_GROUPS
        .iter()
        .zip(group_patterns())
        .find(|(_, pattern)| pattern.is_match(&lowered))
        .map(|(group, _)| group)
}

/// Up to `count` offline tags for `category`. A matched group yields its
/// curated names in order and never more than it has; an unmatched category
/// yields exactly `count` numbered placeholders.
pub fn fallback(category: &str, count: usize) -> Vec<Tag> {
    match match_group(category) {
        Some(group) => group
            .items
            .iter()
            .take(count)
            .map(|name| Tag::text(IdPrefix::Fallback, *name))
            .collect(),
        None => (0..count)
            .map(|i| Tag::text(IdPrefix::Fallback, format!("{}-{}", category, i + 1)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(tags: &[Tag]) -> Vec<String> {
        tags.iter().map(|t| t.content.clone()).collect()
    }

    #[test]
    fn test_beverage_in_curated_order() {
        let tags = fallback("奶茶", 5);
        assert_eq!(
            contents(&tags),
            vec!["蜜雪冰城", "喜茶", "奈雪的茶", "茶百道", "古茗"]
        );
        assert!(tags.iter().all(|t| t.id.starts_with("fb-")));
    }

    #[test]
    fn test_never_exceeds_curated_list() {
        let tags = fallback("奶茶", 12);
        assert_eq!(tags.len(), 10);
        assert_eq!(tags.last().unwrap().content, "瑞幸咖啡");
    }

    #[test]
    fn test_unmatched_category_placeholders() {
        let tags = fallback("零件库存管理", 3);
        assert_eq!(
            contents(&tags),
            vec!["零件库存管理-1", "零件库存管理-2", "零件库存管理-3"]
        );
    }

    #[test]
    fn test_case_insensitive_keywords() {
        assert_eq!(match_group("Best COFFEE shops").unwrap().label, "beverage");
        assert_eq!(match_group("Mobile Games").unwrap().label, "games");
    }

    #[test]
    fn test_first_declared_group_wins() {
        // Hits both beverage and games; beverage is declared first
        assert_eq!(match_group("coffee game").unwrap().label, "beverage");
    }

    #[test]
    fn test_ascii_keywords_match_whole_words() {
        assert_eq!(match_group("Steam游戏").unwrap().label, "games");
        assert_eq!(match_group("team sports 运动").unwrap().label, "sportswear");
        assert!(match_group("steamboat").is_none());
        assert_eq!(match_group("bubble tea").unwrap().label, "beverage");
        assert_eq!(match_group("Teas of the world").unwrap().label, "beverage");
        assert_eq!(match_group("tea饮品").unwrap().label, "beverage");
    }

    #[test]
    fn test_zero_count() {
        assert!(fallback("奶茶", 0).is_empty());
        assert!(fallback("unmatched", 0).is_empty());
    }

    #[test]
    fn test_groups_are_well_formed() {
        for group in FALLBACK_GROUPS {
            assert!(!group.items.is_empty(), "{} has no items", group.label);
            for kw in group.keywords {
                assert_eq!(*kw, kw.to_lowercase(), "{} keyword not lower-case", group.label);
            }
        }
    }
}
