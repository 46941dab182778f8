//! LunchBuddy 推送工具
//!
//! 给指定用户补发一条桌面提醒：按槽位顺序找到该用户的浏览器推送订阅，
//! 校验后直发订阅端点。数据库和 VAPID 公钥通过环境变量提供

use anyhow::Result;
use clap::Parser;
use lunchbuddy_core::lunch::db::create_sqlite_pool_with_migration;
use lunchbuddy_core::lunch::push::{validate_subscription, PushDao, PushPayload, PushSender};
use std::env;
use tracing::info;

/// LunchBuddy 推送工具
#[derive(Parser, Debug)]
#[command(name = "lunchbuddy-push")]
#[command(about = "LunchBuddy 推送工具 - 给指定用户发一条桌面提醒", long_about = None)]
struct Args {
    /// 接收者用户 ID
    #[arg(short, long)]
    to: String,

    /// 提醒标题
    #[arg(long, default_value = "LunchBuddy 提醒")]
    title: String,

    /// 提醒内容
    #[arg(long, default_value = "你有新的消息")]
    body: String,

    /// 点击提醒后打开的页面路径
    #[arg(long, default_value = "/")]
    url: String,

    /// 应用 ID
    #[arg(long, default_value = "default-app-id")]
    app_id: String,

    /// 日志级别（默认: info,lunchbuddy_core=debug）
    #[arg(long, default_value = "info,lunchbuddy_core=debug")]
    log_level: String,
}

/// 初始化日志（仅控制台输出）
fn init_logger(log_level: &str) {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

/// 逐项检查必需环境变量，返回缺失项清单
fn collect_missing<'a>(vars: &[(&'a str, &str)]) -> Vec<&'a str> {
    vars.iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level);

    // 环境变量缺一不可，一次性报全再退出。
    // 下发不做 payload 加密，私钥只做存在性校验
    let db_url = env::var("LUNCHBUDDY_DB").unwrap_or_default();
    let vapid_public_key = env::var("VAPID_PUBLIC_KEY").unwrap_or_default();
    let vapid_private_key = env::var("VAPID_PRIVATE_KEY").unwrap_or_default();
    let missing = collect_missing(&[
        ("LUNCHBUDDY_DB", &db_url),
        ("VAPID_PUBLIC_KEY", &vapid_public_key),
        ("VAPID_PRIVATE_KEY", &vapid_private_key),
    ]);
    if !missing.is_empty() {
        anyhow::bail!("Missing env: {}", missing.join(", "));
    }

    info!("[Push] 🔗 打开数据库: {}", db_url);
    let pool = create_sqlite_pool_with_migration(&db_url).await?;
    let dao = PushDao::new(pool, args.app_id.clone());

    let Some((slot, sub)) = dao.resolve(&args.to).await? else {
        anyhow::bail!("No pushSubscription found for uid={}", args.to);
    };
    info!("[Push] 📡 命中订阅 (uid={}, slot={})", args.to, slot);
    validate_subscription(&sub)?;

    let sender = PushSender::new(vapid_public_key)?;
    let payload = PushPayload {
        title: args.title.clone(),
        body: args.body.clone(),
        url: args.url.clone(),
    };
    sender.send(&sub, &payload).await?;

    info!("[Push] ✅ Sent push to uid={}", args.to);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_env_present_passes() {
        let missing = collect_missing(&[
            ("LUNCHBUDDY_DB", "sqlite::memory:"),
            ("VAPID_PUBLIC_KEY", "pk"),
            ("VAPID_PRIVATE_KEY", "sk"),
        ]);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_missing_private_key_blocks_before_store_access() {
        // 私钥缺失也要在打开数据库之前拦下来
        let missing = collect_missing(&[
            ("LUNCHBUDDY_DB", "sqlite::memory:"),
            ("VAPID_PUBLIC_KEY", "pk"),
            ("VAPID_PRIVATE_KEY", ""),
        ]);
        assert_eq!(missing, vec!["VAPID_PRIVATE_KEY"]);
    }

    #[test]
    fn test_missing_env_reported_in_declaration_order() {
        let missing = collect_missing(&[
            ("LUNCHBUDDY_DB", ""),
            ("VAPID_PUBLIC_KEY", ""),
            ("VAPID_PRIVATE_KEY", ""),
        ]);
        assert_eq!(
            missing,
            vec!["LUNCHBUDDY_DB", "VAPID_PUBLIC_KEY", "VAPID_PRIVATE_KEY"]
        );
        assert_eq!(
            format!("Missing env: {}", missing.join(", ")),
            "Missing env: LUNCHBUDDY_DB, VAPID_PUBLIC_KEY, VAPID_PRIVATE_KEY"
        );
    }
}
