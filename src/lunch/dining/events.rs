//! 开放饭局看板：已确认的饭局对好友开放拼桌

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lunch::friend::directory::FriendDirectory;
use crate::lunch::matching::GroupSizeHint;

/// 开放饭局里的参与者，friend_id 为空表示局外嘉宾或自己
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParticipant {
    #[serde(rename = "friendId")]
    pub friend_id: Option<String>,
    pub role: String,
    #[serde(rename = "isSelf", default)]
    pub is_self: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// 一场对好友开放的饭局
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenDiningEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "sizePreference", default)]
    pub size_preference: String,
    pub food: String,
    pub time: String,
    pub location: String,
    pub participants: Vec<EventParticipant>,
    #[serde(default)]
    pub joined: bool,
}

impl OpenDiningEvent {
    /// 看板只对圈内人展示：参与者里至少有一位是我的好友才算
    pub fn has_friend_of(&self, directory: &FriendDirectory) -> bool {
        self.participants.iter().any(|p| {
            p.friend_id
                .as_deref()
                .map_or(false, |id| directory.get(id).is_some())
        })
    }
}

impl GroupSizeHint for OpenDiningEvent {
    fn size_text(&self) -> Option<&str> {
        if self.size_preference.is_empty() {
            None
        } else {
            Some(&self.size_preference)
        }
    }

    fn participant_count(&self) -> usize {
        self.participants.len()
    }
}

/// 开放饭局看板，加入与退出只改本地状态
#[derive(Debug, Default)]
pub struct OpenEventBoard {
    events: Vec<OpenDiningEvent>,
}

impl OpenEventBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用初始饭局填充看板
    pub fn seed(&mut self, events: Vec<OpenDiningEvent>) {
        debug!("[Board] 📋 看板初始化，共 {} 场饭局", events.len());
        self.events = events;
    }

    pub fn events(&self) -> &[OpenDiningEvent] {
        &self.events
    }

    pub fn get(&self, event_id: &str) -> Option<&OpenDiningEvent> {
        self.events.iter().find(|e| e.id == event_id)
    }

    /// 过滤出当前用户可见的饭局
    pub fn visible<'a>(&'a self, directory: &FriendDirectory) -> Vec<&'a OpenDiningEvent> {
        self.events
            .iter()
            .filter(|e| e.has_friend_of(directory))
            .collect()
    }

    /// 把自己挂到某场饭局的参与者名单里
    pub(crate) fn mark_joined(&mut self, event_id: &str, me: EventParticipant) -> bool {
        match self.events.iter_mut().find(|e| e.id == event_id) {
            Some(event) => {
                event.joined = true;
                event.participants.push(me);
                true
            }
            None => false,
        }
    }

    /// 退出饭局：摘掉自己的参与者条目并恢复可加入状态
    pub(crate) fn reset_joined(&mut self, event_id: &str) {
        if let Some(event) = self.events.iter_mut().find(|e| e.id == event_id) {
            event.participants.retain(|p| !p.is_self);
            event.joined = false;
            debug!("[Board] 🗑️ 已退出饭局 {}，恢复可加入", event_id);
        }
    }
}
