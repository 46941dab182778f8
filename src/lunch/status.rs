//! 本人求约饭状态机：空闲、配置中、求约饭三态

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lunch::types::{LunchPreference, PrivacyField};

/// 自定义配置面板的吃什么候选
pub const FOOD_PRESETS: [&str; 5] = ["随意", "淮南牛肉汤", "麻辣香锅", "菜饭", "私聊"];

/// 自定义配置面板的地点候选
pub const LOCATION_PRESETS: [&str; 3] = ["随意", "老巴刹", "私聊"];

/// 人数选项
pub const SIZE_OPTIONS: [&str; 5] = ["随意", "2人", "3-4人", "多人聚餐", "私聊"];

/// 时间选项
pub const TIME_OPTIONS: [&str; 6] = ["随意", "私聊", "11:30", "12:00", "12:30", "13:00"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeekingState {
    /// 没有在找饭搭子
    Idle,
    /// 打开了自定义配置，还没发布
    Configuring,
    /// 已发布，等待匹配
    Seeking,
}

/// 求约饭状态机，持有当前状态与偏好草稿。
/// 停止求饭只回到空闲，偏好内容保留
#[derive(Debug, Clone, Serialize)]
pub struct StatusLifecycle {
    state: SeekingState,
    details: LunchPreference,
}

impl StatusLifecycle {
    pub fn new() -> Self {
        Self {
            state: SeekingState::Idle,
            details: LunchPreference::custom_draft(),
        }
    }

    /// 一键开摆：偏好全部随意，直接进入求约饭
    pub fn quick_start(&mut self) {
        self.details = LunchPreference::any();
        self.state = SeekingState::Seeking;
        debug!("[Status] ⚡ 一键开摆，全随意进入求约饭");
    }

    /// 打开自定义配置，草稿重置为吃什么留空、其余随意
    pub fn begin_custom(&mut self) {
        self.details = LunchPreference::custom_draft();
        self.state = SeekingState::Configuring;
    }

    /// 覆盖当前草稿
    pub fn update_draft(&mut self, details: LunchPreference) {
        self.details = details;
    }

    /// 翻转吃什么或地点的隐藏开关
    pub fn toggle_privacy(&mut self, field: PrivacyField) {
        match field {
            PrivacyField::Food => self.details.hide_food = !self.details.hide_food,
            PrivacyField::Location => self.details.hide_location = !self.details.hide_location,
        }
    }

    /// 发布当前草稿，进入求约饭
    pub fn confirm_custom(&mut self) {
        self.state = SeekingState::Seeking;
        debug!("[Status] 📝 发布自定义偏好: {:?}", self.details);
    }

    /// 放弃配置，回到空闲
    pub fn cancel_custom(&mut self) {
        if self.state == SeekingState::Configuring {
            self.state = SeekingState::Idle;
        }
    }

    /// 主动停止求饭，偏好保留
    pub fn stop(&mut self) {
        self.state = SeekingState::Idle;
    }

    /// 饭局确认后由流程侧清掉求约饭状态
    pub(crate) fn clear_seeking(&mut self) {
        self.state = SeekingState::Idle;
    }

    pub fn state(&self) -> SeekingState {
        self.state
    }

    pub fn is_seeking(&self) -> bool {
        self.state == SeekingState::Seeking
    }

    pub fn details(&self) -> &LunchPreference {
        &self.details
    }
}

impl Default for StatusLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lunch::types::PREF_ANY;

    #[test]
    fn test_quick_start_enters_seeking_with_all_any() {
        let mut status = StatusLifecycle::new();
        assert_eq!(status.state(), SeekingState::Idle);
        status.quick_start();
        assert!(status.is_seeking());
        assert_eq!(status.details().food, PREF_ANY);
        assert_eq!(status.details().time, PREF_ANY);
    }

    #[test]
    fn test_custom_flow_resets_draft_then_publishes() {
        let mut status = StatusLifecycle::new();
        status.begin_custom();
        assert_eq!(status.state(), SeekingState::Configuring);
        assert!(status.details().food.is_empty());

        let mut draft = status.details().clone();
        draft.food = "麻辣香锅".to_string();
        draft.time = "12:30".to_string();
        status.update_draft(draft);
        status.confirm_custom();
        assert!(status.is_seeking());
        assert_eq!(status.details().food, "麻辣香锅");
    }

    #[test]
    fn test_cancel_custom_only_leaves_configuring() {
        let mut status = StatusLifecycle::new();
        status.quick_start();
        status.cancel_custom();
        assert!(status.is_seeking());

        status.begin_custom();
        status.cancel_custom();
        assert_eq!(status.state(), SeekingState::Idle);
    }

    #[test]
    fn test_stop_keeps_details() {
        let mut status = StatusLifecycle::new();
        status.begin_custom();
        let mut draft = status.details().clone();
        draft.food = "菜饭".to_string();
        status.update_draft(draft);
        status.confirm_custom();
        status.stop();
        assert_eq!(status.state(), SeekingState::Idle);
        assert_eq!(status.details().food, "菜饭");
    }

    #[test]
    fn test_toggle_privacy_flips_flags() {
        let mut status = StatusLifecycle::new();
        status.toggle_privacy(PrivacyField::Food);
        assert!(status.details().hide_food);
        status.toggle_privacy(PrivacyField::Food);
        assert!(!status.details().hide_food);
        status.toggle_privacy(PrivacyField::Location);
        assert!(status.details().hide_location);
    }
}
