//! LunchBuddy 客户端核心实现模块
//!
//! 此模块把资料、求约饭状态、好友名册、饭局流程和通知槽位
//! 组合成一个对外的客户端门面，所有操作在同一把状态锁下串行执行。

use crate::lunch::db::create_sqlite_pool_with_migration;
use crate::lunch::dining::{
    DatingFlow, DiningService, DiningSession, DiningView, OpenDiningEvent, OpenEventBoard,
};
use crate::lunch::error::{CoreError, CoreResult};
use crate::lunch::friend::{
    EmptyFriendListener, Friend, FriendDao, FriendDirectory, FriendListener, FriendRequest,
};
use crate::lunch::ids::{generate_operation_id, generate_short_id, pick_avatar_color};
use crate::lunch::listener::{AppListener, EmptyAppListener};
use crate::lunch::notify::{
    Notification, NotificationCenter, NotificationKind, NotificationRoute, MATCH_PRESENT_DELAY,
    NOTIFICATION_TTL,
};
use crate::lunch::profile::{ProfileDao, UserProfile};
use crate::lunch::push::{validate_subscription, PushDao, PushSubscription, SLOT_PROFILE};
use crate::lunch::seeds::{initial_friends, initial_open_events, RANDOM_NICKNAMES};
use crate::lunch::status::{SeekingState, StatusLifecycle};
use crate::lunch::types::{LunchPreference, PrivacyField};
use anyhow::Result;
use chrono::Utc;
use rand::Rng;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// 客户端配置
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// 应用 ID，本地库内以此隔离多应用数据
    pub app_id: String,
    /// 用户 ID
    pub user_id: String,
    /// 本地 SQLite 数据库 URL
    ///
    /// 例如：`sqlite://lunchbuddy.db?mode=rwc`
    pub db_url: String,
    /// 启动时灌入内置演示名册（不落库，仅内存）
    pub use_seed_roster: bool,
}

impl ClientConfig {
    /// 创建默认配置
    pub fn new(user_id: String) -> Self {
        Self {
            app_id: "default-app-id".to_string(),
            user_id,
            db_url: "sqlite://lunchbuddy.db?mode=rwc".to_string(),
            use_seed_roster: false,
        }
    }
}

/// 单用户的全部可变状态，锁内串行保证操作互斥
struct AppState {
    // 本人资料，未注册时为 None
    profile: Option<UserProfile>,
    // 求约饭状态机
    status: StatusLifecycle,
    // 好友名册（session_start 后可用）
    directory: Option<FriendDirectory>,
    // 开放饭局看板
    board: OpenEventBoard,
    // 饭局流程
    dining: DiningService,
    // 单槽通知
    notifications: NotificationCenter,
    // 应用事件监听器（可由调用方注册）
    app_listener: Arc<dyn AppListener>,
    // 好友事件监听器（可由调用方注册）
    friend_listener: Arc<dyn FriendListener>,
    // 资料 DAO（session_start 后可用）
    profile_dao: Option<ProfileDao>,
    // 共享数据库连接池
    db: Option<Pool<Sqlite>>,
}

impl AppState {
    fn new() -> Self {
        Self {
            profile: None,
            status: StatusLifecycle::new(),
            directory: None,
            board: OpenEventBoard::new(),
            dining: DiningService::new(),
            notifications: NotificationCenter::new(),
            app_listener: Arc::new(EmptyAppListener),
            friend_listener: Arc::new(EmptyFriendListener),
            profile_dao: None,
            db: None,
        }
    }
}

fn session_not_started() -> CoreError {
    CoreError::Validation("会话未启动，请先调用 session_start".to_string())
}

/// LunchBuddy 客户端
///
/// 核心约饭逻辑实现
#[derive(Clone)]
pub struct LunchBuddyClient {
    pub(crate) config: ClientConfig,
    state: Arc<Mutex<AppState>>,
}

impl LunchBuddyClient {
    /// 创建新的客户端
    /// - `config`: 客户端配置
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(AppState::new())),
        }
    }

    /// 注册应用事件监听器
    pub async fn set_app_listener(&self, listener: Arc<dyn AppListener>) {
        let mut st = self.state.lock().await;
        st.app_listener = listener;
    }

    /// 注册好友事件监听器
    ///
    /// 名册已创建时同步替换名册内部的监听器，保持回调一致
    pub async fn set_friend_listener(&self, listener: Arc<dyn FriendListener>) {
        let mut st = self.state.lock().await;
        st.friend_listener = listener.clone();
        if let Some(directory) = st.directory.as_mut() {
            directory.set_listener(listener);
        }
    }

    /// 启动本地会话：建库建表、加载资料、构建好友名册并灌入开放饭局
    pub async fn session_start(&self) -> Result<()> {
        let operation_id = generate_operation_id();
        info!(
            "[Client] 🚀 启动本地会话 (user={}, app={}, op={})",
            self.config.user_id, self.config.app_id, operation_id
        );

        info!("[Client] 🔗 打开本地数据库: {}", self.config.db_url);
        let pool = create_sqlite_pool_with_migration(&self.config.db_url).await?;

        let mut st = self.state.lock().await;

        let profile_dao = ProfileDao::new(pool.clone(), self.config.app_id.clone());
        st.profile = profile_dao.load(&self.config.user_id).await?;
        match &st.profile {
            Some(profile) => info!(
                "[Client] ✅ 资料已加载: {} (shortId={})",
                profile.nickname, profile.short_id
            ),
            None => info!("[Client] 💡 本机尚未注册，先调用 register 创建资料"),
        }

        let mut directory = FriendDirectory::with_listener(
            self.config.user_id.clone(),
            FriendDao::new(
                pool.clone(),
                self.config.app_id.clone(),
                self.config.user_id.clone(),
            ),
            ProfileDao::new(pool.clone(), self.config.app_id.clone()),
            st.friend_listener.clone(),
        );
        if self.config.use_seed_roster {
            info!("[Client] 🌱 使用内置演示名册");
            directory.seed(initial_friends()).await;
        } else {
            directory.hydrate().await?;
        }
        st.directory = Some(directory);

        st.board.seed(initial_open_events());
        st.profile_dao = Some(profile_dao);
        st.db = Some(pool);

        self.emit_open_events(&st);
        info!("[Client] ✅ 会话就绪");
        Ok(())
    }

    // ==================== 资料 ====================

    /// 当前用户资料快照
    pub async fn profile(&self) -> Option<UserProfile> {
        self.state.lock().await.profile.clone()
    }

    /// 注册：生成 6 位数字 ID 与头像色并写库。写库失败时本地不保留资料
    pub async fn register(&self, nickname: &str) -> CoreResult<UserProfile> {
        let trimmed = nickname.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation("请输入昵称".to_string()));
        }

        let mut st = self.state.lock().await;
        let dao = st.profile_dao.as_ref().ok_or_else(session_not_started)?;
        let profile = UserProfile {
            nickname: trimmed.to_string(),
            created_at: Utc::now().to_rfc3339(),
            avatar_color: pick_avatar_color(),
            short_id: generate_short_id(),
        };
        dao.upsert(&self.config.user_id, &profile).await?;
        st.profile = Some(profile.clone());
        info!(
            "[Client] ✅ 注册完成: {} (shortId={})",
            profile.nickname, profile.short_id
        );
        Ok(profile)
    }

    /// 修改昵称。写库失败时本地昵称不变
    pub async fn update_nickname(&self, nickname: &str) -> CoreResult<()> {
        let trimmed = nickname.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation("请输入昵称".to_string()));
        }

        let mut st = self.state.lock().await;
        if st.profile.is_none() {
            return Err(CoreError::Validation("尚未注册".to_string()));
        }
        let dao = st.profile_dao.as_ref().ok_or_else(session_not_started)?;
        dao.update_nickname(&self.config.user_id, trimmed).await?;
        if let Some(profile) = st.profile.as_mut() {
            profile.nickname = trimmed.to_string();
        }
        info!("[Client] ✏️ 昵称已更新: {}", trimmed);
        Ok(())
    }

    // ==================== 求约饭状态 ====================

    /// 一键开摆：以全「随意」的偏好进入求约饭并立刻扫一轮匹配
    pub async fn quick_start(&self) {
        let mut st = self.state.lock().await;
        st.status.quick_start();
        info!("[Client] ⚡ 一键开摆，进入求约饭");
        self.emit_seeking(&st);
        self.schedule_match_scan(&st);
    }

    /// 打开自定义偏好草稿
    pub async fn begin_custom(&self) {
        let mut st = self.state.lock().await;
        st.status.begin_custom();
        self.emit_seeking(&st);
    }

    /// 更新草稿内容（仅配置中生效，不触发匹配）
    pub async fn update_draft(&self, details: LunchPreference) {
        let mut st = self.state.lock().await;
        st.status.update_draft(details);
    }

    /// 切换字段的「保密」开关
    pub async fn toggle_privacy(&self, field: PrivacyField) {
        let mut st = self.state.lock().await;
        st.status.toggle_privacy(field);
    }

    /// 发布自定义偏好并扫一轮匹配
    pub async fn confirm_custom(&self) {
        let mut st = self.state.lock().await;
        st.status.confirm_custom();
        info!("[Client] 📢 发布自定义偏好，进入求约饭");
        self.emit_seeking(&st);
        self.schedule_match_scan(&st);
    }

    /// 放弃草稿，回到未发布状态
    pub async fn cancel_custom(&self) {
        let mut st = self.state.lock().await;
        st.status.cancel_custom();
        self.emit_seeking(&st);
    }

    /// 停止求约饭
    pub async fn stop_seeking(&self) {
        let mut st = self.state.lock().await;
        st.status.stop();
        info!("[Client] 🛑 已停止求约饭");
        self.emit_seeking(&st);
    }

    pub async fn seeking_state(&self) -> SeekingState {
        self.state.lock().await.status.state()
    }

    pub async fn lunch_details(&self) -> LunchPreference {
        self.state.lock().await.status.details().clone()
    }

    /// 按当前偏好把在摆的好友分成「合拍 / 不合拍」两组
    pub async fn partition_matches(&self) -> CoreResult<(Vec<Friend>, Vec<Friend>)> {
        let st = self.state.lock().await;
        let directory = st.directory.as_ref().ok_or_else(session_not_started)?;
        let (matched, rest) = directory.partition_matches(st.status.details());
        Ok((
            matched.into_iter().cloned().collect(),
            rest.into_iter().cloned().collect(),
        ))
    }

    // ==================== 好友 ====================

    pub async fn friends(&self) -> CoreResult<Vec<Friend>> {
        let st = self.state.lock().await;
        let directory = st.directory.as_ref().ok_or_else(session_not_started)?;
        Ok(directory.friends().to_vec())
    }

    pub async fn friend_requests(&self) -> CoreResult<Vec<FriendRequest>> {
        let st = self.state.lock().await;
        let directory = st.directory.as_ref().ok_or_else(session_not_started)?;
        Ok(directory.requests().to_vec())
    }

    /// 按 6 位数字 ID 发起好友申请，成功时返回对方昵称
    pub async fn add_friend(&self, short_id: &str) -> CoreResult<String> {
        let mut st = self.state.lock().await;
        let AppState {
            profile, directory, ..
        } = &mut *st;
        let directory = directory.as_mut().ok_or_else(session_not_started)?;
        directory.add_friend(profile.as_ref(), short_id).await
    }

    /// 接受好友申请，申请已不存在时返回 None
    pub async fn accept_friend_request(&self, request_id: &str) -> CoreResult<Option<Friend>> {
        let mut st = self.state.lock().await;
        let directory = st.directory.as_mut().ok_or_else(session_not_started)?;
        directory.accept_request(request_id).await
    }

    /// 进入删除好友确认
    pub async fn initiate_delete_friend(&self, friend_id: &str) -> CoreResult<()> {
        let mut st = self.state.lock().await;
        let directory = st.directory.as_mut().ok_or_else(session_not_started)?;
        directory.initiate_delete(friend_id)
    }

    /// 确认删除，返回被删除的好友
    pub async fn confirm_delete_friend(&self) -> CoreResult<Option<Friend>> {
        let mut st = self.state.lock().await;
        let directory = st.directory.as_mut().ok_or_else(session_not_started)?;
        directory.confirm_delete().await
    }

    pub async fn cancel_delete_friend(&self) -> CoreResult<()> {
        let mut st = self.state.lock().await;
        let directory = st.directory.as_mut().ok_or_else(session_not_started)?;
        directory.cancel_delete();
        Ok(())
    }

    /// 打开备注编辑，返回当前备注用于回填
    pub async fn open_friend_note(&self, friend_id: &str) -> CoreResult<String> {
        let mut st = self.state.lock().await;
        let directory = st.directory.as_mut().ok_or_else(session_not_started)?;
        directory.open_note(friend_id)
    }

    pub async fn save_friend_note(&self, note: &str) -> CoreResult<()> {
        let mut st = self.state.lock().await;
        let directory = st.directory.as_mut().ok_or_else(session_not_started)?;
        directory.save_note(note).await
    }

    pub async fn cancel_friend_note(&self) -> CoreResult<()> {
        let mut st = self.state.lock().await;
        let directory = st.directory.as_mut().ok_or_else(session_not_started)?;
        directory.cancel_note();
        Ok(())
    }

    /// 以远端名册为准做一轮对账
    pub async fn reconcile_friends(&self, remote: Vec<Friend>) -> CoreResult<()> {
        let mut st = self.state.lock().await;
        let directory = st.directory.as_mut().ok_or_else(session_not_started)?;
        directory.reconcile_friends(remote).await;
        Ok(())
    }

    /// 以远端申请列表为准对账，列表变长时为最新一条弹通知
    pub async fn reconcile_requests(&self, remote: Vec<FriendRequest>) -> CoreResult<()> {
        let mut st = self.state.lock().await;
        let newest = {
            let directory = st.directory.as_mut().ok_or_else(session_not_started)?;
            directory.reconcile_requests(remote).await
        };
        if let Some(request) = newest {
            let body = format!("{} 请求添加你为好友", request.from_nickname);
            self.post_notification(
                &mut st,
                "新好友请求",
                body,
                NotificationKind::FriendRequest,
                None,
            );
        }
        Ok(())
    }

    // ==================== 演示钩子 ====================

    /// 模拟收到一条陌生人好友申请（随机昵称池）并弹通知
    pub async fn simulate_friend_request(&self) -> CoreResult<FriendRequest> {
        let mut st = self.state.lock().await;
        let nickname = {
            let mut rng = rand::thread_rng();
            RANDOM_NICKNAMES[rng.gen_range(0..RANDOM_NICKNAMES.len())]
        };
        let sim_id = format!("sim-{}", Utc::now().timestamp_millis());
        let request = FriendRequest {
            id: sim_id.clone(),
            from_id: sim_id,
            from_nickname: nickname.to_string(),
            from_short_id: generate_short_id(),
            from_avatar_color: pick_avatar_color(),
            created_at: Utc::now().to_rfc3339(),
        };

        let directory = st.directory.as_mut().ok_or_else(session_not_started)?;
        directory.receive_request(request.clone()).await;

        let body = format!("{} 请求添加你为好友", request.from_nickname);
        self.post_notification(
            &mut st,
            "新好友请求",
            body,
            NotificationKind::FriendRequest,
            None,
        );
        info!(
            "[Client] 📥 模拟好友申请: {} (shortId={})",
            request.from_nickname, request.from_short_id
        );
        Ok(request)
    }

    /// 模拟某位好友向我发出约饭邀请并弹通知
    pub async fn simulate_incoming_invite(&self, friend_id: &str) -> CoreResult<()> {
        let mut st = self.state.lock().await;
        let friend = {
            let directory = st.directory.as_ref().ok_or_else(session_not_started)?;
            directory
                .get(friend_id)
                .cloned()
                .ok_or_else(|| CoreError::NotFound(format!("好友不存在: {}", friend_id)))?
        };

        let body = format!("{} 想要和你约饭", friend.nickname);
        info!("[Client] 📨 模拟约饭邀请: {}", friend.nickname);
        self.post_notification(
            &mut st,
            "收到约饭邀请",
            body,
            NotificationKind::IncomingInvite,
            Some(friend),
        );
        Ok(())
    }

    // ==================== 通知 ====================

    pub async fn current_notification(&self) -> Option<Notification> {
        self.state.lock().await.notifications.current().cloned()
    }

    /// 点击当前通知：清空槽位并按类型驱动后续流程
    pub async fn click_notification(&self) -> Option<NotificationRoute> {
        let mut st = self.state.lock().await;
        let had = st.notifications.current().is_some();
        let route = st.notifications.click();
        if had {
            self.emit_notification_cleared(&st);
        }
        match &route {
            Some(NotificationRoute::OpenPairwiseConfirm(friend)) => {
                st.dining.initiate_date(friend.clone());
            }
            Some(NotificationRoute::OpenIncomingInvite(friend)) => {
                st.dining.receive_invite(friend.clone());
            }
            Some(NotificationRoute::OpenFriendRequests) | None => {}
        }
        route
    }

    /// 手动关闭当前通知
    pub async fn dismiss_notification(&self) -> bool {
        let mut st = self.state.lock().await;
        let dismissed = st.notifications.dismiss();
        if dismissed {
            self.emit_notification_cleared(&st);
        }
        dismissed
    }

    // ==================== 饭局 ====================

    /// 主动向某位好友发起双人约饭（进入确认）
    pub async fn initiate_date(&self, friend_id: &str) -> CoreResult<()> {
        let mut st = self.state.lock().await;
        let friend = {
            let directory = st.directory.as_ref().ok_or_else(session_not_started)?;
            directory
                .get(friend_id)
                .cloned()
                .ok_or_else(|| CoreError::NotFound(format!("好友不存在: {}", friend_id)))?
        };
        st.dining.initiate_date(friend);
        Ok(())
    }

    /// 对确认中的对象发出邀请
    pub async fn send_invite(&self) -> CoreResult<()> {
        let mut st = self.state.lock().await;
        st.dining.send_invite()
    }

    /// 拒绝收到的约饭邀请
    pub async fn decline_invite(&self) {
        let mut st = self.state.lock().await;
        st.dining.decline_invite();
    }

    /// 双人饭局成局：落定菜品时间地点、清空求约饭并锁定对方
    pub async fn confirm_pairwise(&self) -> CoreResult<DiningSession> {
        let mut st = self.state.lock().await;
        let AppState {
            profile,
            status,
            directory,
            dining,
            ..
        } = &mut *st;
        let directory = directory.as_mut().ok_or_else(session_not_started)?;
        let session = dining.confirm_pairwise(directory, status, profile.as_ref())?;
        info!("[Client] 🍱 饭局成局: {}", session.title);
        self.emit_session(&st);
        self.emit_seeking(&st);
        self.emit_friend_roster(&st);
        Ok(session)
    }

    /// 加入一场开放饭局。已加入过时返回 None
    pub async fn join_open_event(&self, event_id: &str) -> CoreResult<Option<DiningSession>> {
        let mut st = self.state.lock().await;
        let AppState {
            profile,
            status,
            directory,
            board,
            dining,
            ..
        } = &mut *st;
        let directory = directory.as_ref().ok_or_else(session_not_started)?;
        let joined = dining.join_open_event(event_id, board, directory, status, profile.as_ref())?;
        if let Some(session) = &joined {
            info!("[Client] 🪑 已拼桌: {}", session.title);
            self.emit_session(&st);
            self.emit_seeking(&st);
            self.emit_open_events(&st);
        }
        Ok(joined)
    }

    /// 对方视角确认邀约后回到我的视角
    pub async fn acknowledge_session(&self) -> CoreResult<()> {
        let mut st = self.state.lock().await;
        st.dining.acknowledge()?;
        self.emit_session(&st);
        Ok(())
    }

    /// 在「我 / 对方」两个视角间切换（仅双人饭局）
    pub async fn toggle_session_view(&self) -> CoreResult<DiningView> {
        let mut st = self.state.lock().await;
        st.dining.toggle_view()
    }

    /// 取消饭局，必须填写原因。取消后对方恢复可约
    pub async fn cancel_session(&self, reason: &str) -> CoreResult<DiningSession> {
        let mut st = self.state.lock().await;
        let cancelled = {
            let AppState {
                directory, dining, ..
            } = &mut *st;
            let directory = directory.as_mut().ok_or_else(session_not_started)?;
            dining.cancel(directory, reason)?
        };
        info!(
            "[Client] 🗑️ 饭局已取消: {} (原因: {})",
            cancelled.title,
            reason.trim()
        );
        self.emit_session(&st);
        self.emit_friend_roster(&st);
        Ok(cancelled)
    }

    /// 进入退出饭局确认
    pub async fn request_exit_session(&self) -> CoreResult<()> {
        let mut st = self.state.lock().await;
        st.dining.request_exit()
    }

    pub async fn dismiss_exit_session(&self) {
        let mut st = self.state.lock().await;
        st.dining.dismiss_exit();
    }

    /// 确认退出：清掉饭局、恢复对方状态并把拼桌名额还回看板
    pub async fn confirm_exit_session(&self) -> CoreResult<DiningSession> {
        let mut st = self.state.lock().await;
        let exited = {
            let AppState {
                directory,
                board,
                dining,
                ..
            } = &mut *st;
            let directory = directory.as_mut().ok_or_else(session_not_started)?;
            dining.confirm_exit(directory, board)?
        };
        info!("[Client] 👋 已退出饭局: {}", exited.title);
        self.emit_session(&st);
        self.emit_friend_roster(&st);
        self.emit_open_events(&st);
        Ok(exited)
    }

    pub async fn current_session(&self) -> Option<DiningSession> {
        self.state.lock().await.dining.session().cloned()
    }

    pub async fn dating_flow(&self) -> DatingFlow {
        self.state.lock().await.dining.flow().clone()
    }

    pub async fn session_view(&self) -> DiningView {
        self.state.lock().await.dining.view()
    }

    pub async fn exit_pending(&self) -> bool {
        self.state.lock().await.dining.exit_pending()
    }

    /// 看板上的全部开放饭局
    pub async fn open_events(&self) -> Vec<OpenDiningEvent> {
        self.state.lock().await.board.events().to_vec()
    }

    /// 对我可见的开放饭局（至少有一位我的好友在局中）
    pub async fn visible_open_events(&self) -> CoreResult<Vec<OpenDiningEvent>> {
        let st = self.state.lock().await;
        let directory = st.directory.as_ref().ok_or_else(session_not_started)?;
        Ok(st.board.visible(directory).into_iter().cloned().collect())
    }

    // ==================== 推送订阅 ====================

    /// 保存当前用户的浏览器推送订阅（校验后写入资料槽位）
    pub async fn save_push_subscription(&self, sub: &PushSubscription) -> CoreResult<()> {
        validate_subscription(sub)?;
        let st = self.state.lock().await;
        let db = st.db.clone().ok_or_else(session_not_started)?;
        let dao = PushDao::new(db, self.config.app_id.clone());
        dao.save(&self.config.user_id, SLOT_PROFILE, sub).await?;
        info!("[Client] 📡 推送订阅已保存");
        Ok(())
    }

    // ==================== 内部：通知与匹配 ====================

    /// 写入通知槽并启动过期定时器。旧通知被顶掉时其定时器会因代数不匹配而失效
    fn post_notification(
        &self,
        st: &mut AppState,
        title: &str,
        body: String,
        kind: NotificationKind,
        friend: Option<Friend>,
    ) {
        let generation = st.notifications.post(title, body, kind, friend);
        if let Some(notification) = st.notifications.current() {
            let json = serde_json::to_string(notification).unwrap_or_default();
            let listener = st.app_listener.clone();
            tokio::spawn(async move {
                listener.on_notification_posted(json).await;
            });
        }

        let client = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(NOTIFICATION_TTL).await;
            client.expire_notification(generation).await;
        });
    }

    async fn expire_notification(&self, generation: u64) {
        let mut st = self.state.lock().await;
        if st.notifications.expire(generation) {
            self.emit_notification_cleared(&st);
        }
    }

    /// 进入求约饭后扫一轮好友匹配，命中则延迟一秒弹「完美匹配」
    fn schedule_match_scan(&self, st: &AppState) {
        if !st.status.is_seeking() {
            return;
        }
        let Some(directory) = st.directory.as_ref() else {
            return;
        };
        let Some(matched) = directory.first_match(st.status.details()).cloned() else {
            debug!("[Client] 本轮没有完美匹配");
            return;
        };
        info!(
            "[Client] ✨ 发现完美匹配: {}，{} 秒后弹通知",
            matched.nickname,
            MATCH_PRESENT_DELAY.as_secs()
        );
        let client = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(MATCH_PRESENT_DELAY).await;
            client.present_match(matched).await;
        });
    }

    async fn present_match(&self, friend: Friend) {
        let mut st = self.state.lock().await;
        let body = format!("你和 {} 的口味很合！", friend.nickname);
        self.post_notification(
            &mut st,
            "发现完美匹配 ✨",
            body,
            NotificationKind::PerfectMatch,
            Some(friend),
        );
    }

    // ==================== 内部：事件分发 ====================

    fn emit_seeking(&self, st: &AppState) {
        let json = serde_json::to_string(&st.status).unwrap_or_default();
        let listener = st.app_listener.clone();
        tokio::spawn(async move {
            listener.on_seeking_changed(json).await;
        });
    }

    fn emit_session(&self, st: &AppState) {
        let json = match st.dining.session() {
            Some(session) => serde_json::to_string(session).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        };
        let listener = st.app_listener.clone();
        tokio::spawn(async move {
            listener.on_session_changed(json).await;
        });
    }

    fn emit_open_events(&self, st: &AppState) {
        let json = serde_json::to_string(st.board.events()).unwrap_or_default();
        let listener = st.app_listener.clone();
        tokio::spawn(async move {
            listener.on_open_events_changed(json).await;
        });
    }

    fn emit_notification_cleared(&self, st: &AppState) {
        let listener = st.app_listener.clone();
        tokio::spawn(async move {
            listener.on_notification_cleared().await;
        });
    }

    /// 客户端直接改了好友状态（成局锁定、取消恢复）时补发名册事件
    fn emit_friend_roster(&self, st: &AppState) {
        let Some(directory) = st.directory.as_ref() else {
            return;
        };
        let json = serde_json::to_string(directory.friends()).unwrap_or_default();
        let listener = st.friend_listener.clone();
        tokio::spawn(async move {
            listener.on_friend_list_changed(json).await;
        });
    }
}
