//! 饭局流程服务层
//!
//! 管着三件事：一对一约饭的邀约流程、开放饭局的加入与退出、
//! 已确认饭局的展示状态（视角、知悉、退出确认）。
//! 同一时刻最多只有一场已确认饭局。

use chrono::Local;
use tracing::{debug, info};

use crate::lunch::dining::events::{EventParticipant, OpenEventBoard};
use crate::lunch::dining::models::{DiningSession, DiningView, Participant};
use crate::lunch::error::{CoreError, CoreResult};
use crate::lunch::friend::directory::FriendDirectory;
use crate::lunch::friend::models::{Friend, FriendStatus};
use crate::lunch::matching::is_group_dining;
use crate::lunch::profile::UserProfile;
use crate::lunch::status::StatusLifecycle;
use crate::lunch::types::{PREF_ANY, PREF_TBD};

/// 一对一邀约推进到哪一步
#[derive(Debug, Clone)]
pub enum DatingFlow {
    /// 没有进行中的邀约
    Idle,
    /// 选中了对象，停在确认页
    Confirming(Friend),
    /// 邀约已发出，等对方回应
    InviteSent(Friend),
    /// 收到对方发来的邀约
    IncomingInvite(Friend),
}

impl DatingFlow {
    fn friend(&self) -> Option<&Friend> {
        match self {
            DatingFlow::Idle => None,
            DatingFlow::Confirming(f)
            | DatingFlow::InviteSent(f)
            | DatingFlow::IncomingInvite(f) => Some(f),
        }
    }
}

/// 饭局流程服务
pub struct DiningService {
    flow: DatingFlow,
    session: Option<DiningSession>,
    view: DiningView,
    /// 退出饭局的确认挂起标记
    pending_exit: bool,
}

impl DiningService {
    pub fn new() -> Self {
        Self {
            flow: DatingFlow::Idle,
            session: None,
            view: DiningView::Mine,
            pending_exit: false,
        }
    }

    /// 选中一位好友，进入邀约确认
    pub fn initiate_date(&mut self, friend: Friend) {
        debug!("[Dining] 💡 选中约饭对象: {}", friend.nickname);
        self.flow = DatingFlow::Confirming(friend);
    }

    /// 把确认页上的邀约发出去
    pub fn send_invite(&mut self) -> CoreResult<()> {
        match std::mem::replace(&mut self.flow, DatingFlow::Idle) {
            DatingFlow::Confirming(f) => {
                info!("[Dining] 📡 已向 {} 发出约饭邀请", f.nickname);
                self.flow = DatingFlow::InviteSent(f);
                Ok(())
            }
            other => {
                self.flow = other;
                Err(CoreError::Validation("请先选择要邀请的好友".to_string()))
            }
        }
    }

    /// 对方发来的邀约进入流程
    pub fn receive_invite(&mut self, friend: Friend) {
        info!("[Dining] 📥 收到 {} 的约饭邀请", friend.nickname);
        self.flow = DatingFlow::IncomingInvite(friend);
    }

    /// 邀约被拒或自己放弃，流程归零
    pub fn decline_invite(&mut self) {
        self.flow = DatingFlow::Idle;
    }

    /// 双方谈妥，确认一对一饭局。
    /// 细节取对方发布的计划，对方没发布就用自己的偏好兜底
    pub fn confirm_pairwise(
        &mut self,
        directory: &mut FriendDirectory,
        status: &mut StatusLifecycle,
        me: Option<&UserProfile>,
    ) -> CoreResult<DiningSession> {
        let friend = self
            .flow
            .friend()
            .cloned()
            .ok_or_else(|| CoreError::Validation("没有待确认的约饭对象".to_string()))?;
        if self.session.is_some() {
            return Err(CoreError::Validation(
                "已有进行中的饭局，请先取消或退出".to_string(),
            ));
        }

        let final_plan = friend
            .lunch_plan
            .clone()
            .unwrap_or_else(|| status.details().clone());

        let entries = vec![
            EventParticipant {
                friend_id: None,
                role: "我".to_string(),
                is_self: true,
                name: None,
            },
            EventParticipant {
                friend_id: Some(friend.id.clone()),
                role: "朋友".to_string(),
                is_self: false,
                name: None,
            },
        ];
        let participants = resolve_participants(&entries, directory, me);

        let session = DiningSession {
            event_id: None,
            partner: Some(friend.clone()),
            food: or_fallback(&final_plan.food, PREF_ANY),
            time: or_fallback(&final_plan.time, PREF_TBD),
            location: or_fallback(&final_plan.location, PREF_TBD),
            size: or_fallback(&final_plan.size, "2人"),
            timestamp: Local::now().format("%H:%M").to_string(),
            is_group: is_group_dining(final_plan.size.as_str()),
            is_acknowledged: false,
            participants,
            title: format!("{} x {} 的饭局", my_nickname(me), friend.nickname),
        };

        status.clear_seeking();
        directory.flip_status(&friend.id, FriendStatus::Inactive);
        self.flow = DatingFlow::Idle;
        self.view = DiningView::Mine;
        self.pending_exit = false;
        self.session = Some(session.clone());

        info!("[Dining] ✅ 饭局已确认: {}", session.title);
        Ok(session)
    }

    /// 加入一场开放饭局。已加入过的再点一次是空操作，
    /// 没有任何好友在场的饭局不允许加入
    pub fn join_open_event(
        &mut self,
        event_id: &str,
        board: &mut OpenEventBoard,
        directory: &FriendDirectory,
        status: &mut StatusLifecycle,
        me: Option<&UserProfile>,
    ) -> CoreResult<Option<DiningSession>> {
        let event = board
            .get(event_id)
            .ok_or_else(|| CoreError::NotFound(format!("饭局不存在: {}", event_id)))?;
        if event.joined {
            debug!("[Dining] 已加入过饭局 {}，忽略", event_id);
            return Ok(None);
        }
        if !event.has_friend_of(directory) {
            return Err(CoreError::Validation(
                "这场饭局里没有你的好友".to_string(),
            ));
        }

        board.mark_joined(
            event_id,
            EventParticipant {
                friend_id: None,
                role: format!("{} 已加入", my_nickname(me)),
                is_self: true,
                name: None,
            },
        );
        // 重新取一遍，拿到带自己在内的参与者名单
        let joined = match board.get(event_id) {
            Some(e) => e.clone(),
            None => return Ok(None),
        };

        let session = DiningSession {
            event_id: Some(joined.id.clone()),
            partner: None,
            food: or_fallback(&joined.food, PREF_ANY),
            time: or_fallback(&joined.time, PREF_TBD),
            location: or_fallback(&joined.location, PREF_TBD),
            size: joined.size_preference.clone(),
            timestamp: Local::now().format("%H:%M").to_string(),
            is_group: is_group_dining(&joined),
            // 拼桌进来的局不需要再走知悉流程
            is_acknowledged: true,
            participants: resolve_participants(&joined.participants, directory, me),
            title: or_fallback(&joined.title, "好友饭局"),
        };

        status.clear_seeking();
        self.view = DiningView::Mine;
        self.pending_exit = false;
        self.session = Some(session.clone());

        info!("[Dining] 👥 已加入开放饭局: {}", session.title);
        Ok(Some(session))
    }

    /// 对方视角确认"知道了"。多人拼桌的局生来已知悉，调了也不变
    pub fn acknowledge(&mut self) -> CoreResult<()> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| CoreError::Validation("当前没有饭局".to_string()))?;
        if session.is_group {
            return Ok(());
        }
        session.is_acknowledged = true;
        self.view = DiningView::Mine;
        Ok(())
    }

    /// 在自己与对方视角之间切换，仅限一对一饭局
    pub fn toggle_view(&mut self) -> CoreResult<DiningView> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| CoreError::Validation("当前没有饭局".to_string()))?;
        if session.is_group {
            return Err(CoreError::Validation("多人饭局没有对方视角".to_string()));
        }
        self.view = match self.view {
            DiningView::Mine => DiningView::Partner,
            DiningView::Partner => DiningView::Mine,
        };
        Ok(self.view)
    }

    /// 取消饭局，必须给出非空原因。
    /// 一对一的对方恢复求约饭；开放饭局的加入标记不在这里恢复
    pub fn cancel(
        &mut self,
        directory: &mut FriendDirectory,
        reason: &str,
    ) -> CoreResult<DiningSession> {
        let Some(session) = self.session.take() else {
            return Err(CoreError::Validation("当前没有饭局".to_string()));
        };
        if reason.trim().is_empty() {
            self.session = Some(session);
            return Err(CoreError::Validation("请填写取消原因".to_string()));
        }

        if let Some(partner) = &session.partner {
            directory.flip_status(&partner.id, FriendStatus::Active);
        }
        self.view = DiningView::Mine;
        self.pending_exit = false;

        info!("[Dining] 🛑 饭局已取消: {} (原因: {})", session.title, reason);
        Ok(session)
    }

    /// 发起退出，等待确认
    pub fn request_exit(&mut self) -> CoreResult<()> {
        if self.session.is_none() {
            return Err(CoreError::Validation("当前没有饭局".to_string()));
        }
        self.pending_exit = true;
        Ok(())
    }

    /// 放弃退出
    pub fn dismiss_exit(&mut self) {
        self.pending_exit = false;
    }

    /// 确认退出。对方恢复求约饭，来源饭局恢复可加入
    pub fn confirm_exit(
        &mut self,
        directory: &mut FriendDirectory,
        board: &mut OpenEventBoard,
    ) -> CoreResult<DiningSession> {
        if !self.pending_exit {
            return Err(CoreError::Validation("退出饭局需要先确认".to_string()));
        }
        let session = self
            .session
            .take()
            .ok_or_else(|| CoreError::Validation("当前没有饭局".to_string()))?;

        if let Some(partner) = &session.partner {
            directory.flip_status(&partner.id, FriendStatus::Active);
        }
        if let Some(event_id) = &session.event_id {
            board.reset_joined(event_id);
        }
        self.view = DiningView::Mine;
        self.pending_exit = false;

        info!("[Dining] 👋 已退出饭局: {}", session.title);
        Ok(session)
    }

    pub fn session(&self) -> Option<&DiningSession> {
        self.session.as_ref()
    }

    pub fn flow(&self) -> &DatingFlow {
        &self.flow
    }

    pub fn view(&self) -> DiningView {
        self.view
    }

    pub fn exit_pending(&self) -> bool {
        self.pending_exit
    }
}

impl Default for DiningService {
    fn default() -> Self {
        Self::new()
    }
}

fn my_nickname(me: Option<&UserProfile>) -> String {
    me.map(|p| p.nickname.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "我".to_string())
}

fn or_fallback(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// 把参与者条目解析成可渲染的名单：
/// 自己固定用翠绿色；好友查名册；都查不到按嘉宾处理，
/// 没有资料的条目用 guest-下标 当占位 ID
fn resolve_participants(
    entries: &[EventParticipant],
    directory: &FriendDirectory,
    me: Option<&UserProfile>,
) -> Vec<Participant> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let profile = entry.friend_id.as_deref().and_then(|id| directory.get(id));
            let nickname = if entry.is_self {
                my_nickname(me)
            } else {
                profile
                    .map(|f| f.nickname.clone())
                    .or_else(|| entry.name.clone())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "嘉宾".to_string())
            };
            let avatar_color = if entry.is_self {
                "bg-emerald-500".to_string()
            } else {
                profile
                    .map(|f| f.avatar_color.clone())
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| "bg-gray-300".to_string())
            };
            Participant {
                id: profile
                    .map(|f| f.id.clone())
                    .unwrap_or_else(|| format!("guest-{}", idx)),
                nickname,
                avatar_color,
                role: entry.role.clone(),
            }
        })
        .collect()
}
