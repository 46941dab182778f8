//! 好友数据访问层（DAO）
//!
//! 负责好友关系与好友申请的全部数据库读写，
//! 业务侧（好友名册）只操作内存列表，落库统一走这里。

use anyhow::{Context, Result};
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

use crate::lunch::friend::models::FriendRequest;

/// 一条好友关系，owner 侧视角
#[derive(Debug, Clone, PartialEq)]
pub struct FriendLink {
    pub friend_user_id: String,
    pub note: String,
    pub added_at: String,
}

/// 好友 DAO（基于 sqlx）
pub struct FriendDao {
    db: Pool<Sqlite>,
    app_id: String,
    user_id: String,
}

impl FriendDao {
    pub fn new(db: Pool<Sqlite>, app_id: String, user_id: String) -> Self {
        Self { db, app_id, user_id }
    }

    /// 本人好友关系列表，按添加时间排序
    pub async fn get_links(&self) -> Result<Vec<FriendLink>> {
        let rows = sqlx::query(
            r#"
            SELECT friend_user_id, note, added_at
            FROM friend_links
            WHERE app_id = ? AND owner_user_id = ?
            ORDER BY added_at, friend_user_id
            "#,
        )
        .bind(&self.app_id)
        .bind(&self.user_id)
        .fetch_all(&self.db)
        .await
        .context("查询好友关系失败")?;

        let links: Vec<FriendLink> = rows
            .into_iter()
            .map(|m| FriendLink {
                friend_user_id: m.get("friend_user_id"),
                note: m.get("note"),
                added_at: m.get("added_at"),
            })
            .collect();

        debug!("[FriendDAO] 获取好友关系，共 {} 条", links.len());
        Ok(links)
    }

    /// 接受申请的落库动作：双向好友关系加申请删除放在一个事务里
    pub async fn commit_accept(&self, from_user_id: &str, added_at: &str) -> Result<()> {
        let mut tx = self.db.begin().await.context("开启接受申请事务失败")?;

        let link_sql = r#"
            INSERT INTO friend_links (app_id, owner_user_id, friend_user_id, note, added_at)
            VALUES (?, ?, ?, '', ?)
            ON CONFLICT(app_id, owner_user_id, friend_user_id) DO UPDATE SET
                added_at = excluded.added_at
        "#;

        sqlx::query(link_sql)
            .bind(&self.app_id)
            .bind(&self.user_id)
            .bind(from_user_id)
            .bind(added_at)
            .execute(&mut *tx)
            .await
            .context("写入本方好友关系失败")?;

        sqlx::query(link_sql)
            .bind(&self.app_id)
            .bind(from_user_id)
            .bind(&self.user_id)
            .bind(added_at)
            .execute(&mut *tx)
            .await
            .context("写入对方好友关系失败")?;

        sqlx::query(
            r#"
            DELETE FROM friend_requests
            WHERE app_id = ? AND to_user_id = ? AND from_user_id = ?
            "#,
        )
        .bind(&self.app_id)
        .bind(&self.user_id)
        .bind(from_user_id)
        .execute(&mut *tx)
        .await
        .context("删除已接受的申请失败")?;

        tx.commit().await.context("提交接受申请事务失败")?;
        debug!("[FriendDAO] 已落库双向好友关系 (from={})", from_user_id);
        Ok(())
    }

    /// 删除本人指向对方的好友关系
    pub async fn delete_link(&self, friend_user_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM friend_links
            WHERE app_id = ? AND owner_user_id = ? AND friend_user_id = ?
            "#,
        )
        .bind(&self.app_id)
        .bind(&self.user_id)
        .bind(friend_user_id)
        .execute(&self.db)
        .await
        .context("删除好友关系失败")?;
        Ok(())
    }

    /// 更新某个好友的备注
    pub async fn update_note(&self, friend_user_id: &str, note: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE friend_links SET note = ?
            WHERE app_id = ? AND owner_user_id = ? AND friend_user_id = ?
            "#,
        )
        .bind(note)
        .bind(&self.app_id)
        .bind(&self.user_id)
        .bind(friend_user_id)
        .execute(&self.db)
        .await
        .context("更新好友备注失败")?;
        Ok(())
    }

    /// 发到别人收件箱的好友申请，同一发起人重复发送直接覆盖
    pub async fn put_request(&self, to_user_id: &str, req: &FriendRequest) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO friend_requests (
                app_id, to_user_id, from_user_id,
                from_nickname, from_short_id, from_avatar_color, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(app_id, to_user_id, from_user_id) DO UPDATE SET
                from_nickname = excluded.from_nickname,
                from_short_id = excluded.from_short_id,
                from_avatar_color = excluded.from_avatar_color,
                created_at = excluded.created_at
            "#,
        )
        .bind(&self.app_id)
        .bind(to_user_id)
        .bind(&req.from_id)
        .bind(&req.from_nickname)
        .bind(&req.from_short_id)
        .bind(&req.from_avatar_color)
        .bind(&req.created_at)
        .execute(&self.db)
        .await
        .context("写入好友申请失败")?;

        debug!("[FriendDAO] 已投递好友申请 (to={}, from={})", to_user_id, req.from_id);
        Ok(())
    }

    /// 本人收件箱里的申请，按到达时间排序
    pub async fn get_requests(&self) -> Result<Vec<FriendRequest>> {
        let rows = sqlx::query(
            r#"
            SELECT from_user_id, from_nickname, from_short_id, from_avatar_color, created_at
            FROM friend_requests
            WHERE app_id = ? AND to_user_id = ?
            ORDER BY created_at, from_user_id
            "#,
        )
        .bind(&self.app_id)
        .bind(&self.user_id)
        .fetch_all(&self.db)
        .await
        .context("查询好友申请失败")?;

        let requests: Vec<FriendRequest> = rows
            .into_iter()
            .map(|m| {
                let from_id: String = m.get("from_user_id");
                FriendRequest {
                    id: from_id.clone(),
                    from_id,
                    from_nickname: m.get("from_nickname"),
                    from_short_id: m.get("from_short_id"),
                    from_avatar_color: m.get("from_avatar_color"),
                    created_at: m.get("created_at"),
                }
            })
            .collect();

        debug!("[FriendDAO] 收件箱申请 {} 条", requests.len());
        Ok(requests)
    }

    /// 从本人收件箱删掉一条申请
    pub async fn delete_request(&self, from_user_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM friend_requests
            WHERE app_id = ? AND to_user_id = ? AND from_user_id = ?
            "#,
        )
        .bind(&self.app_id)
        .bind(&self.user_id)
        .bind(from_user_id)
        .execute(&self.db)
        .await
        .context("删除好友申请失败")?;
        Ok(())
    }
}
