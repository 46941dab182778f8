use serde::{Deserialize, Serialize};

use crate::lunch::types::LunchPreference;

/// 好友的约饭状态：active 表示正在求约饭
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    Active,
    Inactive,
}

/// 好友条目，身份信息来自存储，状态和午餐计划是运行期数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    pub id: String,
    pub nickname: String,
    #[serde(rename = "avatarColor")]
    pub avatar_color: String,
    #[serde(rename = "shortId", default)]
    pub short_id: String,
    #[serde(default)]
    pub note: String,
    pub status: FriendStatus,
    #[serde(rename = "lunchPlan")]
    pub lunch_plan: Option<LunchPreference>,
}

impl Friend {
    /// 接受好友申请时据此生成新条目：状态置 active，计划和备注留空
    pub fn from_request(req: &FriendRequest) -> Self {
        Self {
            id: req.from_id.clone(),
            nickname: req.from_nickname.clone(),
            avatar_color: req.from_avatar_color.clone(),
            short_id: req.from_short_id.clone(),
            note: String::new(),
            status: FriendStatus::Active,
            lunch_plan: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == FriendStatus::Active
    }
}

/// 好友申请，id 与发起方 uid 一致，同一发起人只保留一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendRequest {
    pub id: String,
    #[serde(rename = "fromUid")]
    pub from_id: String,
    #[serde(rename = "fromNickname")]
    pub from_nickname: String,
    #[serde(rename = "fromShortId", default)]
    pub from_short_id: String,
    #[serde(rename = "fromAvatarColor", default)]
    pub from_avatar_color: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}
