use serde::{Deserialize, Serialize};

use crate::lunch::friend::models::Friend;
use crate::lunch::matching::GroupSizeHint;
use crate::lunch::types::SECRET_PLACEHOLDER;

/// 饭局详情页的两个视角：自己看，或模拟对方看
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiningView {
    Mine,
    Partner,
}

/// 渲染用的参与者条目，资料解析后的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub nickname: String,
    #[serde(rename = "avatarColor")]
    pub avatar_color: String,
    pub role: String,
}

/// 已确认的饭局。一对一约饭没有 event_id，
/// 从开放饭局加入的会带上来源饭局的 id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningSession {
    #[serde(rename = "eventId", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<Friend>,
    pub food: String,
    pub time: String,
    pub location: String,
    pub size: String,
    /// 确认时刻的 HH:MM
    pub timestamp: String,
    #[serde(rename = "isGroup")]
    pub is_group: bool,
    #[serde(rename = "isAcknowledged")]
    pub is_acknowledged: bool,
    pub participants: Vec<Participant>,
    pub title: String,
}

impl DiningSession {
    /// 当前视角下展示的吃什么。
    /// 一对一饭局里对方把吃什么藏起来时，自己这边只能看到占位
    pub fn shown_food(&self, view: DiningView) -> &str {
        if self.masked(view, |p| p.hide_food) {
            SECRET_PLACEHOLDER
        } else {
            &self.food
        }
    }

    /// 当前视角下展示的地点
    pub fn shown_location(&self, view: DiningView) -> &str {
        if self.masked(view, |p| p.hide_location) {
            SECRET_PLACEHOLDER
        } else {
            &self.location
        }
    }

    fn masked(&self, view: DiningView, flag: impl Fn(&crate::lunch::types::LunchPreference) -> bool) -> bool {
        if self.is_group || view == DiningView::Partner {
            return false;
        }
        self.partner
            .as_ref()
            .and_then(|f| f.lunch_plan.as_ref())
            .map(flag)
            .unwrap_or(false)
    }
}

impl GroupSizeHint for DiningSession {
    fn size_text(&self) -> Option<&str> {
        if self.size.is_empty() {
            None
        } else {
            Some(&self.size)
        }
    }

    fn participant_count(&self) -> usize {
        self.participants.len()
    }
}
