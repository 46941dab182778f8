//! 好友名册服务层
//!
//! 持有内存中的好友列表与申请队列，负责加好友、接受申请、
//! 删除、备注等流程。写库是乐观式的：本地先改，落库失败只记日志，
//! 由下一次对账把本地拉回权威状态。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::lunch::error::{CoreError, CoreResult};
use crate::lunch::friend::dao::FriendDao;
use crate::lunch::friend::listener::{EmptyFriendListener, FriendListener};
use crate::lunch::friend::models::{Friend, FriendRequest, FriendStatus};
use crate::lunch::matching::is_match;
use crate::lunch::profile::{ProfileDao, UserProfile};
use crate::lunch::types::LunchPreference;

/// 好友名册
pub struct FriendDirectory {
    user_id: String,
    friend_dao: FriendDao,
    profile_dao: ProfileDao,
    listener: Arc<dyn FriendListener>,
    friends: Vec<Friend>,
    requests: Vec<FriendRequest>,
    /// 删除确认中的目标，确认或取消前一直挂着
    pending_delete: Option<Friend>,
    /// 备注编辑中的目标
    note_target: Option<Friend>,
}

impl FriendDirectory {
    /// 创建名册（使用默认空监听器）
    pub fn new(user_id: String, friend_dao: FriendDao, profile_dao: ProfileDao) -> Self {
        Self::with_listener(user_id, friend_dao, profile_dao, Arc::new(EmptyFriendListener))
    }

    /// 创建名册（带自定义监听器）
    pub fn with_listener(
        user_id: String,
        friend_dao: FriendDao,
        profile_dao: ProfileDao,
        listener: Arc<dyn FriendListener>,
    ) -> Self {
        Self {
            user_id,
            friend_dao,
            profile_dao,
            listener,
            friends: Vec::new(),
            requests: Vec::new(),
            pending_delete: None,
            note_target: None,
        }
    }

    pub fn set_listener(&mut self, listener: Arc<dyn FriendListener>) {
        self.listener = listener;
    }

    /// 演示模式：直接灌入内置名册
    pub async fn seed(&mut self, friends: Vec<Friend>) {
        info!("[Directory] 📋 使用内置名册，共 {} 位好友", friends.len());
        self.friends = friends;
        self.emit_friends().await;
    }

    /// 从存储加载好友关系并解析资料，再加载申请收件箱
    pub async fn hydrate(&mut self) -> CoreResult<()> {
        info!("[Directory] 🔄 加载好友名册...");
        let links = self.friend_dao.get_links().await?;
        let ids: Vec<String> = links.iter().map(|l| l.friend_user_id.clone()).collect();
        let profiles = self.profile_dao.get_many(&ids).await?;
        let by_id: HashMap<String, _> = profiles
            .into_iter()
            .map(|p| (p.user_id.clone(), p))
            .collect();

        // 资料缺失的关系直接跳过，保持关系表顺序
        self.friends = links
            .iter()
            .filter_map(|link| {
                by_id.get(&link.friend_user_id).map(|p| Friend {
                    id: p.user_id.clone(),
                    nickname: p.nickname.clone(),
                    avatar_color: p.avatar_color.clone(),
                    short_id: p.short_id.clone(),
                    note: link.note.clone(),
                    status: FriendStatus::Active,
                    lunch_plan: None,
                })
            })
            .collect();

        self.requests = self.friend_dao.get_requests().await?;
        info!(
            "[Directory] ✅ 名册加载完成 - 好友: {}, 申请: {}",
            self.friends.len(),
            self.requests.len()
        );

        self.emit_friends().await;
        self.emit_requests().await;
        Ok(())
    }

    /// 按 6 位短 ID 发起好友申请，返回对方昵称。
    /// 校验顺序固定：格式、存在性、自指、重复，全过了才碰存储写入
    pub async fn add_friend(
        &mut self,
        me: Option<&UserProfile>,
        short_id: &str,
    ) -> CoreResult<String> {
        if short_id.trim().is_empty() || short_id.chars().count() != 6 {
            return Err(CoreError::Validation("请输入6位数字ID".to_string()));
        }

        let target = self
            .profile_dao
            .find_by_short_id(short_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound("未找到该 ID 的用户，请确认对方已注册".to_string())
            })?;

        if target.user_id == self.user_id {
            return Err(CoreError::SelfReference("不能添加自己为好友".to_string()));
        }

        if self
            .friends
            .iter()
            .any(|f| f.id == target.user_id || f.short_id == target.short_id)
        {
            return Err(CoreError::Duplicate("已在好友列表中".to_string()));
        }

        let request = FriendRequest {
            id: self.user_id.clone(),
            from_id: self.user_id.clone(),
            from_nickname: me
                .map(|p| p.nickname.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "好友".to_string()),
            from_short_id: me.map(|p| p.short_id.clone()).unwrap_or_default(),
            from_avatar_color: me
                .map(|p| p.avatar_color.clone())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "bg-orange-500".to_string()),
            created_at: Utc::now().to_rfc3339(),
        };
        self.friend_dao.put_request(&target.user_id, &request).await?;

        info!("[Directory] 📤 已向 {} 发送好友申请", target.nickname);
        Ok(target.nickname)
    }

    /// 接受一条好友申请。申请已不存在时静默成功，重复接受不报错
    pub async fn accept_request(&mut self, request_id: &str) -> CoreResult<Option<Friend>> {
        let Some(pos) = self.requests.iter().position(|r| r.id == request_id) else {
            debug!("[Directory] 申请 {} 不存在或已处理，忽略", request_id);
            return Ok(None);
        };
        let request = self.requests.remove(pos);
        let friend = Friend::from_request(&request);
        self.friends.push(friend.clone());

        // 乐观写库：双向关系与申请删除一起落库，失败只记日志
        if let Err(e) = self
            .friend_dao
            .commit_accept(&request.from_id, &Utc::now().to_rfc3339())
            .await
        {
            error!("[Directory] ❌ 接受申请落库失败，本地已生效: {:?}", e);
        }

        info!("[Directory] ✅ 已接受 {} 的好友申请", friend.nickname);
        self.emit_friends().await;
        self.emit_requests().await;
        Ok(Some(friend))
    }

    /// 进入删除确认，目标挂在名册上等待确认或取消
    pub fn initiate_delete(&mut self, friend_id: &str) -> CoreResult<()> {
        let friend = self
            .friends
            .iter()
            .find(|f| f.id == friend_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("好友不存在: {}", friend_id)))?;
        self.pending_delete = Some(friend);
        Ok(())
    }

    /// 确认删除。没有待确认目标时什么都不做
    pub async fn confirm_delete(&mut self) -> CoreResult<Option<Friend>> {
        let Some(target) = self.pending_delete.take() else {
            return Ok(None);
        };

        if let Err(e) = self.friend_dao.delete_link(&target.id).await {
            error!("[Directory] ❌ 删除好友落库失败，本地已移除: {:?}", e);
        }
        self.friends.retain(|f| f.id != target.id);

        info!("[Directory] 🗑️ 已删除好友 {}", target.nickname);
        self.emit_friends().await;
        Ok(Some(target))
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// 打开备注编辑，返回当前备注用于回填
    pub fn open_note(&mut self, friend_id: &str) -> CoreResult<String> {
        let friend = self
            .friends
            .iter()
            .find(|f| f.id == friend_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("好友不存在: {}", friend_id)))?;
        let note = friend.note.clone();
        self.note_target = Some(friend);
        Ok(note)
    }

    /// 保存备注。没有编辑目标时静默成功
    pub async fn save_note(&mut self, note: &str) -> CoreResult<()> {
        let Some(target) = self.note_target.take() else {
            return Ok(());
        };

        if let Err(e) = self.friend_dao.update_note(&target.id, note).await {
            error!("[Directory] ❌ 备注落库失败，本地已更新: {:?}", e);
        }
        if let Some(friend) = self.friends.iter_mut().find(|f| f.id == target.id) {
            friend.note = note.to_string();
        }

        info!("[Directory] 📝 已更新 {} 的备注", target.nickname);
        self.emit_friends().await;
        Ok(())
    }

    pub fn cancel_note(&mut self) {
        self.note_target = None;
    }

    /// 饭局流程专用：翻转某位好友的求约饭状态，只改内存
    pub(crate) fn flip_status(&mut self, friend_id: &str, status: FriendStatus) -> bool {
        match self.friends.iter_mut().find(|f| f.id == friend_id) {
            Some(friend) => {
                friend.status = status;
                true
            }
            None => false,
        }
    }

    /// 模拟一条外部到达的申请，同一发起人覆盖旧条目
    pub(crate) async fn receive_request(&mut self, request: FriendRequest) {
        self.requests.retain(|r| r.id != request.id);
        self.requests.push(request);
        self.emit_requests().await;
    }

    /// 以远端名册为权威做一次对账：
    /// 成员与身份信息（昵称、头像色、短 ID、备注）以远端为准，
    /// 幸存者的运行期状态（求约饭、午餐计划）保留不动
    pub async fn reconcile_friends(&mut self, remote: Vec<Friend>) {
        info!(
            "[Directory] 开始对账好友名册，远端: {}, 本地: {}",
            remote.len(),
            self.friends.len()
        );

        let local_map: HashMap<String, Friend> = self
            .friends
            .iter()
            .cloned()
            .map(|f| (f.id.clone(), f))
            .collect();

        let mut insert_count = 0;
        let mut update_count = 0;

        let mut next = Vec::with_capacity(remote.len());
        for mut incoming in remote {
            match local_map.get(&incoming.id) {
                Some(local) => {
                    if !Self::identity_equal(local, &incoming) {
                        info!("[Directory]   更新好友: {}", incoming.id);
                        update_count += 1;
                    }
                    incoming.status = local.status;
                    incoming.lunch_plan = local.lunch_plan.clone();
                }
                None => {
                    info!("[Directory]   新增好友: {}", incoming.id);
                    insert_count += 1;
                }
            }
            next.push(incoming);
        }

        let mut delete_count = 0;
        for f in &self.friends {
            if !next.iter().any(|n| n.id == f.id) {
                info!("[Directory]   删除本地多余好友: {}", f.id);
                delete_count += 1;
            }
        }

        self.friends = next;
        info!(
            "[Directory] 好友对账完成 - 新增: {}, 更新: {}, 删除: {}",
            insert_count, update_count, delete_count
        );
        self.emit_friends().await;
    }

    /// 申请收件箱对账。队列变长说明有新申请到达，把最新的一条交给调用方
    pub async fn reconcile_requests(&mut self, remote: Vec<FriendRequest>) -> Option<FriendRequest> {
        let grew = remote.len() > self.requests.len();
        let newest = if grew {
            remote
                .iter()
                .filter(|r| !self.requests.iter().any(|old| old.id == r.id))
                .last()
                .cloned()
        } else {
            None
        };

        self.requests = remote;
        self.emit_requests().await;
        newest
    }

    fn identity_equal(a: &Friend, b: &Friend) -> bool {
        a.nickname == b.nickname
            && a.avatar_color == b.avatar_color
            && a.short_id == b.short_id
            && a.note == b.note
    }

    async fn emit_friends(&self) {
        if let Ok(json) = serde_json::to_string(&self.friends) {
            self.listener.on_friend_list_changed(json).await;
        }
    }

    async fn emit_requests(&self) {
        if let Ok(json) = serde_json::to_string(&self.requests) {
            self.listener.on_friend_request_list_changed(json).await;
        }
    }

    pub fn friends(&self) -> &[Friend] {
        &self.friends
    }

    pub fn requests(&self) -> &[FriendRequest] {
        &self.requests
    }

    pub fn get(&self, friend_id: &str) -> Option<&Friend> {
        self.friends.iter().find(|f| f.id == friend_id)
    }

    pub fn pending_delete(&self) -> Option<&Friend> {
        self.pending_delete.as_ref()
    }

    pub fn note_target(&self) -> Option<&Friend> {
        self.note_target.as_ref()
    }

    /// 处于求约饭状态的好友
    pub fn active_friends(&self) -> Vec<&Friend> {
        self.friends.iter().filter(|f| f.is_active()).collect()
    }

    /// 在求约饭的好友里找第一位三要素全中的
    pub fn first_match(&self, details: &LunchPreference) -> Option<&Friend> {
        self.friends
            .iter()
            .filter(|f| f.is_active())
            .find(|f| is_match(details, f.lunch_plan.as_ref()))
    }

    /// 把求约饭好友按是否匹配分成两组，供首页分区展示
    pub fn partition_matches(&self, details: &LunchPreference) -> (Vec<&Friend>, Vec<&Friend>) {
        self.friends
            .iter()
            .filter(|f| f.is_active())
            .partition(|f| is_match(details, f.lunch_plan.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lunch::db::create_sqlite_pool_with_migration;
    use crate::lunch::seeds::initial_friends;
    use async_trait::async_trait;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::{Pool, Sqlite};
    use std::sync::Mutex;

    const APP: &str = "default-app-id";

    async fn migrated_pool() -> Pool<Sqlite> {
        create_sqlite_pool_with_migration("sqlite::memory:")
            .await
            .unwrap()
    }

    fn directory_on(pool: &Pool<Sqlite>, user_id: &str) -> FriendDirectory {
        FriendDirectory::new(
            user_id.to_string(),
            FriendDao::new(pool.clone(), APP.to_string(), user_id.to_string()),
            ProfileDao::new(pool.clone(), APP.to_string()),
        )
    }

    fn profile(nickname: &str, short_id: &str) -> UserProfile {
        UserProfile {
            nickname: nickname.to_string(),
            created_at: "2026-08-24T08:00:00Z".to_string(),
            avatar_color: "bg-green-500".to_string(),
            short_id: short_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_friend_validates_before_touching_store() {
        // 未跑迁移的库：只要校验先行，非法短 ID 根本不会碰到存储
        let bare_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let mut directory = directory_on(&bare_pool, "me");

        for bad in ["", "  ", "12345", "1234567"] {
            match directory.add_friend(None, bad).await {
                Err(CoreError::Validation(msg)) => assert_eq!(msg, "请输入6位数字ID"),
                other => panic!("短 ID {:?} 应当校验失败, 实际 {:?}", bad, other),
            }
        }
    }

    #[tokio::test]
    async fn test_add_friend_rejects_unknown_self_and_duplicate() {
        let pool = migrated_pool().await;
        let profiles = ProfileDao::new(pool.clone(), APP.to_string());
        profiles.upsert("me", &profile("我自己", "111111")).await.unwrap();
        profiles.upsert("u2", &profile("奶茶脑袋", "222222")).await.unwrap();

        let mut directory = directory_on(&pool, "me");

        assert!(matches!(
            directory.add_friend(Some(&profile("我自己", "111111")), "999999").await,
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            directory.add_friend(Some(&profile("我自己", "111111")), "111111").await,
            Err(CoreError::SelfReference(_))
        ));

        let nickname = directory
            .add_friend(Some(&profile("我自己", "111111")), "222222")
            .await
            .unwrap();
        assert_eq!(nickname, "奶茶脑袋");

        // 对方接受后出现在名册里，再加一次要报重复
        directory.friends.push(Friend {
            id: "u2".to_string(),
            nickname: "奶茶脑袋".to_string(),
            avatar_color: "bg-green-500".to_string(),
            short_id: "222222".to_string(),
            note: String::new(),
            status: FriendStatus::Active,
            lunch_plan: None,
        });
        assert!(matches!(
            directory.add_friend(Some(&profile("我自己", "111111")), "222222").await,
            Err(CoreError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn test_request_lands_in_target_inbox() {
        let pool = migrated_pool().await;
        let profiles = ProfileDao::new(pool.clone(), APP.to_string());
        profiles.upsert("u2", &profile("奶茶脑袋", "222222")).await.unwrap();

        let mut directory = directory_on(&pool, "me");
        directory
            .add_friend(Some(&profile("干饭王", "111111")), "222222")
            .await
            .unwrap();

        let mut inbox = directory_on(&pool, "u2");
        inbox.hydrate().await.unwrap();
        assert_eq!(inbox.requests().len(), 1);
        assert_eq!(inbox.requests()[0].from_id, "me");
        assert_eq!(inbox.requests()[0].from_nickname, "干饭王");
    }

    #[tokio::test]
    async fn test_accept_request_is_idempotent() {
        let pool = migrated_pool().await;
        let sender_dao = FriendDao::new(pool.clone(), APP.to_string(), "u9".to_string());
        sender_dao
            .put_request(
                "me",
                &FriendRequest {
                    id: "u9".to_string(),
                    from_id: "u9".to_string(),
                    from_nickname: "火锅战神".to_string(),
                    from_short_id: "999999".to_string(),
                    from_avatar_color: "bg-purple-500".to_string(),
                    created_at: "2026-08-24T09:00:00Z".to_string(),
                },
            )
            .await
            .unwrap();

        let mut directory = directory_on(&pool, "me");
        directory.hydrate().await.unwrap();
        assert_eq!(directory.requests().len(), 1);

        let accepted = directory.accept_request("u9").await.unwrap();
        assert_eq!(accepted.unwrap().nickname, "火锅战神");
        assert_eq!(directory.friends().len(), 1);
        assert!(directory.requests().is_empty());

        // 第二次接受同一条申请：静默成功，名册不变
        assert!(directory.accept_request("u9").await.unwrap().is_none());
        assert_eq!(directory.friends().len(), 1);

        // 落库侧也应当已经双向成立
        let mut other_side = directory_on(&pool, "u9");
        other_side.hydrate().await.unwrap();
        assert_eq!(other_side.friends().len(), 0); // 对方没有资料行，解析后跳过
        let links = FriendDao::new(pool.clone(), APP.to_string(), "u9".to_string())
            .get_links()
            .await
            .unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].friend_user_id, "me");
    }

    #[tokio::test]
    async fn test_delete_is_two_step() {
        let pool = migrated_pool().await;
        let mut directory = directory_on(&pool, "me");
        directory.seed(initial_friends()).await;

        assert!(directory.initiate_delete("ghost").is_err());

        directory.initiate_delete("2").unwrap();
        assert_eq!(directory.pending_delete().unwrap().nickname, "设计师小美");

        directory.cancel_delete();
        assert!(directory.pending_delete().is_none());
        assert_eq!(directory.friends().len(), 4);

        directory.initiate_delete("2").unwrap();
        let removed = directory.confirm_delete().await.unwrap();
        assert_eq!(removed.unwrap().id, "2");
        assert_eq!(directory.friends().len(), 3);
        assert!(directory.get("2").is_none());

        // 没有待确认目标时确认是空操作
        assert!(directory.confirm_delete().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_note_edit_flow() {
        let pool = migrated_pool().await;
        let mut directory = directory_on(&pool, "me");
        directory.seed(initial_friends()).await;

        let current = directory.open_note("3").unwrap();
        assert_eq!(current, "李工");

        directory.save_note("李工-后端组").await.unwrap();
        assert_eq!(directory.get("3").unwrap().note, "李工-后端组");
        assert!(directory.note_target().is_none());

        // 编辑目标已清空，再保存等于空操作
        directory.save_note("不会生效").await.unwrap();
        assert_eq!(directory.get("3").unwrap().note, "李工-后端组");
    }

    #[tokio::test]
    async fn test_reconcile_preserves_runtime_state() {
        let pool = migrated_pool().await;
        let mut directory = directory_on(&pool, "me");
        directory.seed(initial_friends()).await;
        directory.flip_status("1", FriendStatus::Inactive);

        // 远端快照：1 改了备注，3、4 没了，来了个新同事 9
        let mut remote: Vec<Friend> = Vec::new();
        let mut one = initial_friends().remove(0);
        one.note = "张强-已转岗".to_string();
        one.status = FriendStatus::Active; // 远端行没有运行期状态
        one.lunch_plan = None;
        remote.push(one);
        let mut two = initial_friends().remove(1);
        two.status = FriendStatus::Active;
        two.lunch_plan = None;
        remote.push(two);
        remote.push(Friend {
            id: "9".to_string(),
            nickname: "新同事".to_string(),
            avatar_color: "bg-purple-500".to_string(),
            short_id: "909090".to_string(),
            note: String::new(),
            status: FriendStatus::Active,
            lunch_plan: None,
        });

        directory.reconcile_friends(remote).await;

        assert_eq!(directory.friends().len(), 3);
        let one = directory.get("1").unwrap();
        assert_eq!(one.note, "张强-已转岗");
        assert_eq!(one.status, FriendStatus::Inactive); // 运行期状态保留
        assert!(one.lunch_plan.is_some());
        let two = directory.get("2").unwrap();
        assert!(two.lunch_plan.is_some()); // 幸存者计划不被远端抹掉
        assert!(directory.get("3").is_none());
        assert!(directory.get("9").is_some());
    }

    #[tokio::test]
    async fn test_reconcile_requests_reports_newest_arrival() {
        let pool = migrated_pool().await;
        let mut directory = directory_on(&pool, "me");

        let req = |id: &str, nick: &str| FriendRequest {
            id: id.to_string(),
            from_id: id.to_string(),
            from_nickname: nick.to_string(),
            from_short_id: String::new(),
            from_avatar_color: "bg-orange-500".to_string(),
            created_at: "2026-08-24T09:00:00Z".to_string(),
        };

        let newest = directory
            .reconcile_requests(vec![req("a", "随缘食客")])
            .await;
        assert_eq!(newest.unwrap().from_nickname, "随缘食客");

        // 队列缩短（被接受或撤回）不算新到达
        assert!(directory.reconcile_requests(vec![]).await.is_none());

        directory.reconcile_requests(vec![req("a", "随缘食客")]).await;
        let newest = directory
            .reconcile_requests(vec![req("a", "随缘食客"), req("b", "周五烧烤")])
            .await;
        assert_eq!(newest.unwrap().id, "b");
    }

    #[tokio::test]
    async fn test_match_helpers_only_consider_active_friends() {
        let pool = migrated_pool().await;
        let mut directory = directory_on(&pool, "me");
        directory.seed(initial_friends()).await;

        let anything = LunchPreference::any();
        assert_eq!(directory.first_match(&anything).unwrap().id, "1");

        directory.flip_status("1", FriendStatus::Inactive);
        assert_eq!(directory.first_match(&anything).unwrap().id, "2");

        let mut picky = LunchPreference::any();
        picky.food = "湘菜".to_string();
        picky.time = "11:50".to_string();
        let (matched, others) = directory.partition_matches(&picky);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, "3");
        assert_eq!(others.len(), 2); // 2 号时间不合，4 号隐藏但食物不合
    }

    struct CapturingListener {
        friend_events: Mutex<Vec<String>>,
        request_events: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FriendListener for CapturingListener {
        async fn on_friend_list_changed(&self, friends_json: String) {
            self.friend_events.lock().unwrap().push(friends_json);
        }

        async fn on_friend_request_list_changed(&self, requests_json: String) {
            self.request_events.lock().unwrap().push(requests_json);
        }
    }

    #[tokio::test]
    async fn test_accept_fires_both_listeners() {
        let pool = migrated_pool().await;
        let listener = Arc::new(CapturingListener {
            friend_events: Mutex::new(Vec::new()),
            request_events: Mutex::new(Vec::new()),
        });
        let mut directory = FriendDirectory::with_listener(
            "me".to_string(),
            FriendDao::new(pool.clone(), APP.to_string(), "me".to_string()),
            ProfileDao::new(pool.clone(), APP.to_string()),
            listener.clone(),
        );

        directory
            .receive_request(FriendRequest {
                id: "u9".to_string(),
                from_id: "u9".to_string(),
                from_nickname: "碳水教父".to_string(),
                from_short_id: "123123".to_string(),
                from_avatar_color: "bg-blue-500".to_string(),
                created_at: "2026-08-24T09:00:00Z".to_string(),
            })
            .await;
        directory.accept_request("u9").await.unwrap();

        let friend_events = listener.friend_events.lock().unwrap();
        assert_eq!(friend_events.len(), 1);
        assert!(friend_events[0].contains("碳水教父"));
        // receive_request 一次 + accept 一次
        assert_eq!(listener.request_events.lock().unwrap().len(), 2);
    }
}
