//! Web Push 订阅存取与提醒下发
//!
//! 订阅按槽位存储。历史数据里同一个用户可能把订阅写在三个位置，
//! 读取时按 profile、user、legacy 的顺序取第一个命中的。
//! 下发只做订阅端点直推，payload 不做加密。

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info};

use crate::lunch::error::{CoreError, CoreResult};

pub const SLOT_PROFILE: &str = "profile";
pub const SLOT_USER: &str = "user";
pub const SLOT_LEGACY: &str = "legacy";

/// 订阅槽位的解析顺序
pub const SLOT_RESOLVE_ORDER: [&str; 3] = [SLOT_PROFILE, SLOT_USER, SLOT_LEGACY];

/// 浏览器订阅对象里的密钥对
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// 一条 Web Push 订阅，与浏览器 PushSubscription 的 JSON 同构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: SubscriptionKeys,
}

/// 推送内容，url 是点开通知后落地的页面
#[derive(Debug, Clone, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub url: String,
}

/// 订阅合法性检查：端点是 http(s) 地址，
/// p256dh 是 65 字节的未压缩 P-256 公钥，auth 是 16 字节
pub fn validate_subscription(sub: &PushSubscription) -> CoreResult<()> {
    if !sub.endpoint.starts_with("https://") && !sub.endpoint.starts_with("http://") {
        return Err(CoreError::Validation(format!(
            "订阅端点不是合法地址: {}",
            sub.endpoint
        )));
    }

    let p256dh = URL_SAFE_NO_PAD
        .decode(&sub.keys.p256dh)
        .map_err(|_| CoreError::Validation("p256dh 不是合法的 base64url".to_string()))?;
    if p256dh.len() != 65 {
        return Err(CoreError::Validation(format!(
            "p256dh 长度不对: {} 字节",
            p256dh.len()
        )));
    }

    let auth = URL_SAFE_NO_PAD
        .decode(&sub.keys.auth)
        .map_err(|_| CoreError::Validation("auth 不是合法的 base64url".to_string()))?;
    if auth.len() != 16 {
        return Err(CoreError::Validation(format!(
            "auth 长度不对: {} 字节",
            auth.len()
        )));
    }

    Ok(())
}

/// 推送订阅 DAO（基于 sqlx）
pub struct PushDao {
    db: Pool<Sqlite>,
    app_id: String,
}

impl PushDao {
    pub fn new(db: Pool<Sqlite>, app_id: String) -> Self {
        Self { db, app_id }
    }

    /// 把订阅写进指定槽位
    pub async fn save(&self, user_id: &str, slot: &str, sub: &PushSubscription) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO push_subscriptions (
                app_id, user_id, slot, endpoint, p256dh, auth_key
            ) VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(app_id, user_id, slot) DO UPDATE SET
                endpoint = excluded.endpoint,
                p256dh = excluded.p256dh,
                auth_key = excluded.auth_key
            "#,
        )
        .bind(&self.app_id)
        .bind(user_id)
        .bind(slot)
        .bind(&sub.endpoint)
        .bind(&sub.keys.p256dh)
        .bind(&sub.keys.auth)
        .execute(&self.db)
        .await
        .context("写入推送订阅失败")?;

        debug!("[PushDAO] 已保存订阅 (user={}, slot={})", user_id, slot);
        Ok(())
    }

    /// 读取某个槽位的订阅
    pub async fn get(&self, user_id: &str, slot: &str) -> Result<Option<PushSubscription>> {
        let row = sqlx::query(
            r#"
            SELECT endpoint, p256dh, auth_key
            FROM push_subscriptions
            WHERE app_id = ? AND user_id = ? AND slot = ?
            "#,
        )
        .bind(&self.app_id)
        .bind(user_id)
        .bind(slot)
        .fetch_optional(&self.db)
        .await
        .context("查询推送订阅失败")?;

        Ok(row.map(|m| PushSubscription {
            endpoint: m.get("endpoint"),
            keys: SubscriptionKeys {
                p256dh: m.get("p256dh"),
                auth: m.get("auth_key"),
            },
        }))
    }

    /// 按固定顺序找该用户的第一条可用订阅，返回命中的槽位名
    pub async fn resolve(&self, user_id: &str) -> Result<Option<(&'static str, PushSubscription)>> {
        for slot in SLOT_RESOLVE_ORDER {
            if let Some(sub) = self.get(user_id, slot).await? {
                debug!("[PushDAO] 订阅命中槽位 {} (user={})", slot, user_id);
                return Ok(Some((slot, sub)));
            }
        }
        Ok(None)
    }
}

/// 推送发送器，往订阅端点直发 JSON 提醒
pub struct PushSender {
    http: reqwest::Client,
    vapid_public_key: String,
}

impl PushSender {
    pub fn new(vapid_public_key: String) -> Result<Self> {
        let http = reqwest::ClientBuilder::new()
            .build()
            .context("创建 HTTP 客户端失败")?;
        Ok(Self {
            http,
            vapid_public_key,
        })
    }

    /// 发送一条提醒。端点返回非 2xx 一律按拒绝处理
    pub async fn send(&self, sub: &PushSubscription, payload: &PushPayload) -> Result<()> {
        let resp = self
            .http
            .post(&sub.endpoint)
            .header("TTL", "2419200")
            .header("Content-Type", "application/json")
            .header(
                "Crypto-Key",
                format!("p256ecdsa={}", self.vapid_public_key),
            )
            .json(payload)
            .send()
            .await
            .context("推送请求发送失败")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("推送服务拒绝: {} - {}", status, text);
        }

        info!("[Push] ✅ 推送已送达端点 (status={})", status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lunch::db::create_sqlite_pool_with_migration;

    fn subscription(endpoint: &str) -> PushSubscription {
        PushSubscription {
            endpoint: endpoint.to_string(),
            keys: SubscriptionKeys {
                p256dh: URL_SAFE_NO_PAD.encode([4u8; 65]),
                auth: URL_SAFE_NO_PAD.encode([7u8; 16]),
            },
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_subscription() {
        let sub = subscription("https://fcm.googleapis.com/fcm/send/abc");
        assert!(validate_subscription(&sub).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_endpoint_and_keys() {
        let bad_endpoint = subscription("ftp://somewhere");
        assert!(matches!(
            validate_subscription(&bad_endpoint),
            Err(CoreError::Validation(_))
        ));

        let mut bad_key = subscription("https://push.example.com/x");
        bad_key.keys.p256dh = "not base64!!".to_string();
        assert!(validate_subscription(&bad_key).is_err());

        let mut short_auth = subscription("https://push.example.com/x");
        short_auth.keys.auth = URL_SAFE_NO_PAD.encode([1u8; 8]);
        assert!(validate_subscription(&short_auth).is_err());
    }

    #[tokio::test]
    async fn test_resolve_order_prefers_profile_slot() {
        let pool = create_sqlite_pool_with_migration("sqlite::memory:")
            .await
            .unwrap();
        let dao = PushDao::new(pool, "default-app-id".to_string());

        assert!(dao.resolve("u1").await.unwrap().is_none());

        dao.save("u1", SLOT_LEGACY, &subscription("https://push.example.com/legacy"))
            .await
            .unwrap();
        let (slot, sub) = dao.resolve("u1").await.unwrap().unwrap();
        assert_eq!(slot, SLOT_LEGACY);
        assert!(sub.endpoint.ends_with("/legacy"));

        dao.save("u1", SLOT_USER, &subscription("https://push.example.com/user"))
            .await
            .unwrap();
        let (slot, _) = dao.resolve("u1").await.unwrap().unwrap();
        assert_eq!(slot, SLOT_USER);

        dao.save("u1", SLOT_PROFILE, &subscription("https://push.example.com/profile"))
            .await
            .unwrap();
        let (slot, sub) = dao.resolve("u1").await.unwrap().unwrap();
        assert_eq!(slot, SLOT_PROFILE);
        assert!(sub.endpoint.ends_with("/profile"));
    }

    #[tokio::test]
    async fn test_save_overwrites_same_slot() {
        let pool = create_sqlite_pool_with_migration("sqlite::memory:")
            .await
            .unwrap();
        let dao = PushDao::new(pool, "default-app-id".to_string());

        dao.save("u1", SLOT_PROFILE, &subscription("https://push.example.com/old"))
            .await
            .unwrap();
        dao.save("u1", SLOT_PROFILE, &subscription("https://push.example.com/new"))
            .await
            .unwrap();

        let stored = dao.get("u1", SLOT_PROFILE).await.unwrap().unwrap();
        assert!(stored.endpoint.ends_with("/new"));
    }
}
