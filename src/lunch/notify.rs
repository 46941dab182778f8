//! 应用内通知：单槽位展示，新通知顶掉旧通知，过期靠计时器回收

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lunch::friend::models::Friend;

/// 通知在槽位里的存活时长，超时未点击自动消失
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// 发现完美匹配后延迟这么久再弹通知
pub const MATCH_PRESENT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FriendRequest,
    PerfectMatch,
    IncomingInvite,
}

/// 一条应用内通知，kind 决定点击后的跳转
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
    /// 匹配、邀约类通知携带的好友
    pub friend: Option<Friend>,
    #[serde(skip)]
    generation: u64,
}

/// 点击通知后应进入的界面
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationRoute {
    /// 打开好友申请列表
    OpenFriendRequests,
    /// 进入与该好友的约饭确认
    OpenPairwiseConfirm(Friend),
    /// 进入该好友发来的邀约
    OpenIncomingInvite(Friend),
}

/// 单槽位通知中心。post 返回代数，计时器带着代数来过期，
/// 只有槽位里仍是同一条时才真正清掉，被新通知顶掉的过期无效
#[derive(Debug, Default)]
pub struct NotificationCenter {
    slot: Option<Notification>,
    generation: u64,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入槽位并顶掉旧通知，返回这条通知的代数
    pub fn post(
        &mut self,
        title: impl Into<String>,
        body: impl Into<String>,
        kind: NotificationKind,
        friend: Option<Friend>,
    ) -> u64 {
        self.generation += 1;
        let notification = Notification {
            title: title.into(),
            body: body.into(),
            kind,
            friend,
            generation: self.generation,
        };
        debug!(
            "[Notify] 📥 通知入槽: {} (kind={:?}, gen={})",
            notification.title, notification.kind, self.generation
        );
        self.slot = Some(notification);
        self.generation
    }

    /// 计时器到点回收。代数对不上说明槽位已被更新的通知占据
    pub fn expire(&mut self, generation: u64) -> bool {
        match &self.slot {
            Some(n) if n.generation == generation => {
                debug!("[Notify] ⏰ 通知过期回收 (gen={})", generation);
                self.slot = None;
                true
            }
            _ => false,
        }
    }

    /// 手动关闭当前通知
    pub fn dismiss(&mut self) -> bool {
        self.slot.take().is_some()
    }

    /// 点击通知：清空槽位并给出跳转目标。
    /// 匹配、邀约类通知缺失好友载荷时只清空不跳转
    pub fn click(&mut self) -> Option<NotificationRoute> {
        let notification = self.slot.take()?;
        match notification.kind {
            NotificationKind::FriendRequest => Some(NotificationRoute::OpenFriendRequests),
            NotificationKind::PerfectMatch => notification
                .friend
                .map(NotificationRoute::OpenPairwiseConfirm),
            NotificationKind::IncomingInvite => notification
                .friend
                .map(NotificationRoute::OpenIncomingInvite),
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.slot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lunch::friend::models::FriendStatus;

    fn friend(id: &str, nickname: &str) -> Friend {
        Friend {
            id: id.to_string(),
            nickname: nickname.to_string(),
            avatar_color: "bg-blue-500".to_string(),
            short_id: String::new(),
            note: String::new(),
            status: FriendStatus::Active,
            lunch_plan: None,
        }
    }

    #[test]
    fn test_post_replaces_previous_notification() {
        let mut center = NotificationCenter::new();
        center.post("新好友请求", "干饭王 请求添加你为好友", NotificationKind::FriendRequest, None);
        center.post(
            "发现完美匹配 ✨",
            "你和 产品阿强 的口味很合！",
            NotificationKind::PerfectMatch,
            Some(friend("1", "产品阿强")),
        );
        let current = center.current().unwrap();
        assert_eq!(current.kind, NotificationKind::PerfectMatch);
    }

    #[test]
    fn test_stale_expiry_does_not_clear_newer_notification() {
        let mut center = NotificationCenter::new();
        let first = center.post(
            "收到约饭邀请",
            "设计师小美 想要和你约饭",
            NotificationKind::IncomingInvite,
            Some(friend("2", "设计师小美")),
        );
        let second = center.post(
            "收到约饭邀请",
            "Java老哥 想要和你约饭",
            NotificationKind::IncomingInvite,
            Some(friend("3", "Java老哥")),
        );

        assert!(!center.expire(first));
        let survivor = center.current().unwrap();
        assert_eq!(survivor.friend.as_ref().unwrap().id, "3");

        assert!(center.expire(second));
        assert!(center.current().is_none());
    }

    #[test]
    fn test_click_clears_and_routes_by_kind() {
        let mut center = NotificationCenter::new();
        center.post("新好友请求", "有人想加你", NotificationKind::FriendRequest, None);
        assert_eq!(center.click(), Some(NotificationRoute::OpenFriendRequests));
        assert!(center.current().is_none());
        assert_eq!(center.click(), None);

        center.post(
            "发现完美匹配 ✨",
            "你和 产品阿强 的口味很合！",
            NotificationKind::PerfectMatch,
            Some(friend("1", "产品阿强")),
        );
        match center.click() {
            Some(NotificationRoute::OpenPairwiseConfirm(f)) => assert_eq!(f.id, "1"),
            other => panic!("期望进入约饭确认, 实际 {:?}", other),
        }
    }

    #[test]
    fn test_click_without_friend_payload_only_clears() {
        let mut center = NotificationCenter::new();
        center.post("发现完美匹配 ✨", "口味很合！", NotificationKind::PerfectMatch, None);
        assert_eq!(center.click(), None);
        assert!(center.current().is_none());
    }

    #[test]
    fn test_dismiss_empties_slot() {
        let mut center = NotificationCenter::new();
        assert!(!center.dismiss());
        center.post("新好友请求", "有人想加你", NotificationKind::FriendRequest, None);
        assert!(center.dismiss());
        assert!(center.current().is_none());
    }
}
