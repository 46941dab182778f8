use serde::{Deserialize, Serialize};

/// 三要素通配符，任意一侧为它时该要素直接命中
pub const PREF_ANY: &str = "随意";

/// 时间、地点缺省时的展示占位
pub const PREF_TBD: &str = "待定";

/// 隐藏要素在对方视角下的展示占位
pub const SECRET_PLACEHOLDER: &str = "🤫 秘密";

/// 午餐偏好，求约饭与饭局确认都围绕这份结构展开
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LunchPreference {
    pub food: String,
    pub size: String,
    pub time: String,
    pub location: String,
    #[serde(rename = "hideFood", default)]
    pub hide_food: bool,
    #[serde(rename = "hideLocation", default)]
    pub hide_location: bool,
}

impl LunchPreference {
    /// 一键开摆：三要素全部随意，默认不隐藏
    pub fn any() -> Self {
        Self {
            food: PREF_ANY.to_string(),
            size: PREF_ANY.to_string(),
            time: PREF_ANY.to_string(),
            location: PREF_ANY.to_string(),
            hide_food: false,
            hide_location: false,
        }
    }

    /// 自定义配置的起始草稿：吃什么留空，其余随意
    pub fn custom_draft() -> Self {
        Self {
            food: String::new(),
            ..Self::any()
        }
    }

    /// 好友卡片上展示的吃什么，被隐藏时给占位
    pub fn shown_food(&self) -> &str {
        if self.hide_food {
            SECRET_PLACEHOLDER
        } else {
            &self.food
        }
    }

    /// 好友卡片上展示的地点，被隐藏时给占位
    pub fn shown_location(&self) -> &str {
        if self.hide_location {
            SECRET_PLACEHOLDER
        } else {
            &self.location
        }
    }
}

/// 可以被单独隐藏的偏好要素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivacyField {
    Food,
    Location,
}
