//! 用户资料：注册信息模型与资料数据访问层

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

/// 本人资料，注册时一次生成，昵称可改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub nickname: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "avatarColor")]
    pub avatar_color: String,
    #[serde(rename = "shortId")]
    pub short_id: String,
}

/// 他人资料查询结果，带用户 ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(rename = "uid")]
    pub user_id: String,
    pub nickname: String,
    #[serde(rename = "avatarColor")]
    pub avatar_color: String,
    #[serde(rename = "shortId")]
    pub short_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// 资料 DAO（基于 sqlx）
pub struct ProfileDao {
    db: Pool<Sqlite>,
    app_id: String,
}

impl ProfileDao {
    pub fn new(db: Pool<Sqlite>, app_id: String) -> Self {
        Self { db, app_id }
    }

    /// 读取某个用户的资料
    pub async fn load(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let row = sqlx::query(
            r#"
            SELECT nickname, avatar_color, short_id, created_at
            FROM profiles
            WHERE app_id = ? AND user_id = ?
            "#,
        )
        .bind(&self.app_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("查询用户资料失败")?;

        Ok(row.map(|m| UserProfile {
            nickname: m.get("nickname"),
            avatar_color: m.get("avatar_color"),
            short_id: m.get("short_id"),
            created_at: m.get("created_at"),
        }))
    }

    /// 写入或覆盖用户资料
    pub async fn upsert(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (
                app_id, user_id, nickname, avatar_color, short_id, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(app_id, user_id) DO UPDATE SET
                nickname = excluded.nickname,
                avatar_color = excluded.avatar_color,
                short_id = excluded.short_id,
                created_at = excluded.created_at
            "#,
        )
        .bind(&self.app_id)
        .bind(user_id)
        .bind(&profile.nickname)
        .bind(&profile.avatar_color)
        .bind(&profile.short_id)
        .bind(&profile.created_at)
        .execute(&self.db)
        .await
        .context("写入用户资料失败")?;

        debug!("[ProfileDAO] 已保存资料 (user={}, short_id={})", user_id, profile.short_id);
        Ok(())
    }

    /// 只更新昵称
    pub async fn update_nickname(&self, user_id: &str, nickname: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE profiles SET nickname = ?
            WHERE app_id = ? AND user_id = ?
            "#,
        )
        .bind(nickname)
        .bind(&self.app_id)
        .bind(user_id)
        .execute(&self.db)
        .await
        .context("更新昵称失败")?;
        Ok(())
    }

    /// 按 6 位短 ID 反查用户，找不到返回 None
    pub async fn find_by_short_id(&self, short_id: &str) -> Result<Option<ProfileRecord>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, nickname, avatar_color, short_id, created_at
            FROM profiles
            WHERE app_id = ? AND short_id = ?
            "#,
        )
        .bind(&self.app_id)
        .bind(short_id)
        .fetch_optional(&self.db)
        .await
        .context("按短ID查询用户失败")?;

        Ok(row.map(Self::record_from_row))
    }

    /// 批量按用户 ID 查询资料，入参多长都一次查完
    pub async fn get_many(&self, user_ids: &[String]) -> Result<Vec<ProfileRecord>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; user_ids.len()].join(", ");
        let sql = format!(
            "SELECT user_id, nickname, avatar_color, short_id, created_at \
             FROM profiles WHERE app_id = ? AND user_id IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&sql).bind(&self.app_id);
        for id in user_ids {
            query = query.bind(id);
        }
        let rows = query
            .fetch_all(&self.db)
            .await
            .context("批量查询用户资料失败")?;

        let records: Vec<ProfileRecord> = rows.into_iter().map(Self::record_from_row).collect();
        debug!("[ProfileDAO] 批量查询资料 {} 个，命中 {} 个", user_ids.len(), records.len());
        Ok(records)
    }

    fn record_from_row(m: sqlx::sqlite::SqliteRow) -> ProfileRecord {
        ProfileRecord {
            user_id: m.get("user_id"),
            nickname: m.get("nickname"),
            avatar_color: m.get("avatar_color"),
            short_id: m.get("short_id"),
            created_at: m.get("created_at"),
        }
    }
}
