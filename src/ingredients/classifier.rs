use crate::model::Category;

/// A category paired with the substrings that select it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub category: Category,
    pub keywords: &'static [&'static str],
}

impl Rule {
    pub fn matches(&self, name: &str) -> bool {
        self.keywords.iter().any(|keyword| name.contains(keyword))
    }
}

/// Known ingredient names, checked first
pub const DICTIONARY: [Rule; 4] = [
    Rule {
        category: Category::Vegetable,
        keywords: &[
            "花椰菜", "高麗菜", "白菜", "青江菜", "菠菜", "空心菜", "地瓜葉", "芥藍", "羽衣甘藍",
            "小黃瓜", "黃瓜", "番茄", "茄子", "洋蔥", "青蔥", "蔥", "蒜", "薑", "香菜", "九層塔",
            "辣椒", "甜椒", "紅椒", "黃椒", "菇", "香菇", "杏鮑菇", "金針菇", "鴻喜菇", "蘑菇",
            "萵苣", "生菜", "玉米筍", "豆芽", "紅蘿蔔", "胡蘿蔔", "白蘿蔔", "蘿蔔",
        ],
    },
    Rule {
        category: Category::Seafood,
        keywords: &[
            "鮭魚", "鮪魚", "鱈魚", "鯖魚", "鰻魚", "鯛魚", "虱目魚", "秋刀魚", "蝦", "蟹", "干貝",
            "蛤蜊", "文蛤", "牡蠣", "章魚", "魷魚", "小卷", "透抽", "海苔", "昆布",
        ],
    },
    Rule {
        category: Category::Meat,
        keywords: &[
            "雞", "雞胸", "雞腿", "牛", "牛肉", "豬", "豬肉", "羊", "羊肉", "鴨", "鴨腿", "培根",
            "火腿", "香腸", "絞肉", "排骨", "五花", "里肌",
        ],
    },
    Rule {
        category: Category::Starch,
        keywords: &[
            "飯", "白飯", "糙米", "米", "麵", "麵條", "烏龍麵", "拉麵", "冬粉", "米粉", "麵包",
            "吐司", "饅頭", "餅皮", "馬鈴薯", "地瓜", "芋頭", "南瓜",
        ],
    },
];

/// Broader markers, consulted only when no dictionary keyword matched
pub const HEURISTICS: [Rule; 3] = [
    Rule {
        category: Category::Seafood,
        keywords: &["魚", "蝦", "貝", "蟹"],
    },
    Rule {
        category: Category::Meat,
        keywords: &["牛", "豬", "雞", "鴨", "羊"],
    },
    Rule {
        category: Category::Starch,
        keywords: &["麵", "飯", "米", "薯", "吐司"],
    },
];

fn first_match(rules: &[Rule], name: &str) -> Option<Category> {
    rules
        .iter()
        .find(|rule| rule.matches(name))
        .map(|rule| rule.category)
}

/// Classify with the built-in rule order.
///
/// Pure and total: anything unmatched, including the empty string, is `Other`.
pub fn classify(name: &str) -> Category {
    first_match(&DICTIONARY, name)
        .or_else(|| first_match(&HEURISTICS, name))
        .unwrap_or(Category::Other)
}

/// Two-tier classifier whose category priority can be reordered.
///
/// Within each tier the first matching rule wins, so a name that hits
/// keywords from several categories resolves by rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    dictionary: Vec<Rule>,
    heuristics: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier {
            dictionary: DICTIONARY.to_vec(),
            heuristics: HEURISTICS.to_vec(),
        }
    }
}

impl Classifier {
    /// Reorder both tiers so categories listed in `priority` are checked first,
    /// in that order. Unlisted categories keep their built-in relative order.
    pub fn with_priority(priority: &[Category]) -> Self {
        let rank = |rule: &Rule| {
            priority
                .iter()
                .position(|c| *c == rule.category)
                .unwrap_or(priority.len())
        };

        let mut classifier = Classifier::default();
        classifier.dictionary.sort_by_key(rank);
        classifier.heuristics.sort_by_key(rank);
        classifier
    }

    pub fn classify(&self, name: &str) -> Category {
        first_match(&self.dictionary, name)
            .or_else(|| first_match(&self.heuristics, name))
            .unwrap_or(Category::Other)
    }

    /// Category order of the dictionary tier
    pub fn dictionary_order(&self) -> Vec<Category> {
        self.dictionary.iter().map(|rule| rule.category).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_tier() {
        assert_eq!(classify("鮭魚"), Category::Seafood);
        assert_eq!(classify("高麗菜"), Category::Vegetable);
        assert_eq!(classify("雞胸肉"), Category::Meat);
        assert_eq!(classify("烏龍麵"), Category::Starch);
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(classify("冷凍鮭魚片"), Category::Seafood);
        assert_eq!(classify("牛肉片"), Category::Meat);
    }

    #[test]
    fn test_heuristic_tier() {
        assert_eq!(classify("鱸魚"), Category::Seafood);
        assert_eq!(classify("扇貝"), Category::Seafood);
        assert_eq!(classify("薯條"), Category::Starch);
    }

    #[test]
    fn test_unmatched_is_other() {
        assert_eq!(classify("戚風蛋糕"), Category::Other);
        assert_eq!(classify("蛋"), Category::Other);
        assert_eq!(classify(""), Category::Other);
        assert_eq!(classify("   "), Category::Other);
    }

    #[test]
    fn test_deterministic() {
        for name in ["鮭魚", "蔥爆牛肉", "戚風蛋糕", ""] {
            assert_eq!(classify(name), classify(name));
        }
    }

    #[test]
    fn test_first_category_wins_on_ambiguous_names() {
        // "蔥" is a vegetable keyword, "牛肉" a meat keyword
        assert_eq!(classify("蔥爆牛肉"), Category::Vegetable);
        // "蝦" (seafood) is checked before "飯" (starch)
        assert_eq!(classify("蝦仁炒飯"), Category::Seafood);
    }

    #[test]
    fn test_default_classifier_matches_free_function() {
        let classifier = Classifier::default();
        for name in ["鮭魚", "蔥爆牛肉", "薯條", "扇貝", "戚風蛋糕"] {
            assert_eq!(classifier.classify(name), classify(name));
        }
        assert_eq!(
            classifier.dictionary_order(),
            vec![
                Category::Vegetable,
                Category::Seafood,
                Category::Meat,
                Category::Starch
            ]
        );
    }

    #[test]
    fn test_priority_reorders_ambiguous_names() {
        let classifier = Classifier::with_priority(&[Category::Meat]);
        assert_eq!(classifier.classify("蔥爆牛肉"), Category::Meat);
        assert_eq!(
            classifier.dictionary_order(),
            vec![
                Category::Meat,
                Category::Vegetable,
                Category::Seafood,
                Category::Starch
            ]
        );
        // unambiguous names are unaffected
        assert_eq!(classifier.classify("鮭魚"), Category::Seafood);
    }

    #[test]
    fn test_priority_applies_to_heuristic_tier() {
        // "鯊魚薯餅" hits no dictionary keyword, but both the "魚" and "薯" markers
        assert_eq!(classify("鯊魚薯餅"), Category::Seafood);

        let classifier = Classifier::with_priority(&[Category::Starch]);
        assert_eq!(classifier.classify("鯊魚薯餅"), Category::Starch);
    }
}
