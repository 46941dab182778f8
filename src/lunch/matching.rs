//! 匹配规则：三要素逐项判定、人数上限解析、是否多人拼桌

use crate::lunch::types::{LunchPreference, PREF_ANY};

/// 单要素判定：任一侧为空或为通配符直接命中，否则看双向包含
pub fn field_matches(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() || a == PREF_ANY || b == PREF_ANY {
        return true;
    }
    a.contains(b) || b.contains(a)
}

/// 完美匹配：对方没有发布过计划时恒为不匹配，
/// 否则吃什么、几点吃、在哪吃三项全部命中才算
pub fn is_match(mine: &LunchPreference, theirs: Option<&LunchPreference>) -> bool {
    let Some(theirs) = theirs else {
        return false;
    };
    field_matches(&mine.food, &theirs.food)
        && field_matches(&mine.time, &theirs.time)
        && field_matches(&mine.location, &theirs.location)
}

/// 从人数文案里取出所有数字段，返回其中最大的一个。
/// "3-4人" 解析为 4，"多人聚餐" 这类没有数字的返回 None
pub fn parse_max_size(size_text: &str) -> Option<u32> {
    let mut max: Option<u32> = None;
    let mut current: Option<u32> = None;
    for ch in size_text.chars() {
        if let Some(d) = ch.to_digit(10) {
            current = Some(current.unwrap_or(0).saturating_mul(10).saturating_add(d));
        } else if let Some(run) = current.take() {
            max = Some(max.map_or(run, |m| m.max(run)));
        }
    }
    if let Some(run) = current {
        max = Some(max.map_or(run, |m| m.max(run)));
    }
    max
}

/// 能参与拼桌判定的输入：纯文案、饭局、开放饭局都实现它
pub trait GroupSizeHint {
    /// 人数文案，没有可用文案时返回 None
    fn size_text(&self) -> Option<&str>;
    /// 参与者数量，文案解析不出数字时兜底用
    fn participant_count(&self) -> usize;
}

impl GroupSizeHint for str {
    fn size_text(&self) -> Option<&str> {
        Some(self)
    }

    fn participant_count(&self) -> usize {
        0
    }
}

/// 是否算多人拼桌：文案里解析出的最大人数大于 2 即是；
/// 解析出 0 或没有数字时退回看参与者数量
pub fn is_group_dining<T: GroupSizeHint + ?Sized>(input: &T) -> bool {
    if let Some(text) = input.size_text() {
        if let Some(max) = parse_max_size(text) {
            if max > 0 {
                return max > 2;
            }
        }
    }
    input.participant_count() > 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pref(food: &str, time: &str, location: &str) -> LunchPreference {
        LunchPreference {
            food: food.to_string(),
            size: PREF_ANY.to_string(),
            time: time.to_string(),
            location: location.to_string(),
            hide_food: false,
            hide_location: false,
        }
    }

    #[test]
    fn test_wildcard_absorbs_everything() {
        assert!(field_matches(PREF_ANY, "日料鳗鱼饭"));
        assert!(field_matches("火锅", PREF_ANY));
        assert!(field_matches("", "12:00"));
        assert!(field_matches("老巴刹", ""));
    }

    #[test]
    fn test_containment_is_bidirectional() {
        assert!(field_matches("日料", "日料鳗鱼饭"));
        assert!(field_matches("日料鳗鱼饭", "日料"));
        assert!(!field_matches("火锅", "烧烤"));
    }

    #[test]
    fn test_match_requires_all_three_fields() {
        let mine = pref("日料", "12:00", "公司楼下");
        let hit = pref("日料鳗鱼饭", "12:00", "公司楼下");
        let miss_time = pref("日料鳗鱼饭", "13:00", "公司楼下");
        assert!(is_match(&mine, Some(&hit)));
        assert!(!is_match(&mine, Some(&miss_time)));
    }

    #[test]
    fn test_match_is_symmetric() {
        let pairs = [
            (pref("日料", "12:00", "公司楼下"), pref("日料鳗鱼饭", PREF_ANY, "公司")),
            (pref("火锅", "12:00", PREF_ANY), pref("烧烤", "12:00", PREF_ANY)),
            (pref("", "11:30", "老巴刹"), pref("菜饭", "11:30", "老巴刹附近")),
        ];
        for (a, b) in &pairs {
            assert_eq!(is_match(a, Some(b)), is_match(b, Some(a)));
        }
    }

    #[test]
    fn test_missing_plan_never_matches() {
        let mine = pref(PREF_ANY, PREF_ANY, PREF_ANY);
        assert!(!is_match(&mine, None));
    }

    #[test]
    fn test_all_any_matches_any_concrete_plan() {
        let mine = pref(PREF_ANY, PREF_ANY, PREF_ANY);
        let theirs = pref("湘菜小炒", "11:50", "二楼食堂");
        assert!(is_match(&mine, Some(&theirs)));
    }

    #[test]
    fn test_parse_max_size_picks_largest_run() {
        assert_eq!(parse_max_size("3-4人"), Some(4));
        assert_eq!(parse_max_size("2人"), Some(2));
        assert_eq!(parse_max_size("12:30 以后 5 人"), Some(30));
        assert_eq!(parse_max_size("多人聚餐"), None);
        assert_eq!(parse_max_size("私聊"), None);
        assert_eq!(parse_max_size(""), None);
    }

    #[test]
    fn test_group_dining_from_size_text() {
        assert!(is_group_dining("3-4人"));
        assert!(!is_group_dining("2人"));
        assert!(!is_group_dining("1人"));
        // 没有数字的文案在纯文案输入下没有参与者可兜底
        assert!(!is_group_dining("多人聚餐"));
    }

    #[test]
    fn test_zero_in_size_text_falls_back_to_count() {
        struct Table {
            size: &'static str,
            heads: usize,
        }
        impl GroupSizeHint for Table {
            fn size_text(&self) -> Option<&str> {
                Some(self.size)
            }
            fn participant_count(&self) -> usize {
                self.heads
            }
        }
        let zero = Table { size: "0人", heads: 4 };
        assert!(is_group_dining(&zero));
        let worded = Table { size: "多人聚餐", heads: 2 };
        assert!(!is_group_dining(&worded));
    }
}
