//! LunchBuddy CLI 客户端（演示版）
//!
//! 非交互式 CLI，用于测试和展示约饭核心功能
//! 启动后自动注册并按脚本走一遍：开摆匹配、双人成局、拼桌、好友申请与邀请

use anyhow::Result;
use clap::Parser;
use lunchbuddy_core::lunch::client::{ClientConfig, LunchBuddyClient};
use lunchbuddy_core::lunch::friend::FriendListener;
use lunchbuddy_core::lunch::listener::AppListener;
use lunchbuddy_core::lunch::notify::NotificationRoute;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

/// LunchBuddy CLI 客户端
#[derive(Parser, Debug)]
#[command(name = "lunchbuddy-cli")]
#[command(about = "LunchBuddy CLI 客户端 - 用于测试和展示约饭功能", long_about = None)]
struct Args {
    /// 用户 ID（默认: demo-user）
    #[arg(short, long, default_value = "demo-user")]
    user: String,

    /// 首次注册使用的昵称
    #[arg(short, long, default_value = "干饭王")]
    nickname: String,

    /// 本地数据库 URL，换成文件路径可以跨次运行保留资料
    #[arg(long, default_value = "sqlite::memory:")]
    db: String,

    /// 演示结束后的停留时长（秒），0 表示持续运行
    #[arg(short, long, default_value = "8")]
    duration: u64,

    /// 日志级别（默认: info,lunchbuddy_core=debug）
    #[arg(long, default_value = "info,lunchbuddy_core=debug")]
    log_level: String,
}

/// 初始化日志（同时输出到 stdout 和文件）
fn init_logger(log_level: &str) {
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 优先使用环境变量 RUST_LOG（如果设置了），否则使用命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // 创建日志文件（追加模式）
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("无法创建日志文件 debug.log");

    // 输出到 stdout（控制台），保留 ANSI 颜色代码用于终端显示
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(true);

    // 输出到文件，禁用 ANSI 颜色代码（文件不需要颜色）
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("[CLI] 📝 日志已同时输出到控制台和文件: debug.log");
}

/// 设置监听器（输出所有接收到的事件）
async fn setup_listeners(client: &LunchBuddyClient) {
    // 应用事件监听器
    struct CliAppListener;
    #[async_trait::async_trait]
    impl AppListener for CliAppListener {
        async fn on_seeking_changed(&self, status_json: String) {
            info!("[CLI/App] 🍚 求约饭状态变更: {}", status_json);
        }

        async fn on_session_changed(&self, session_json: String) {
            if session_json == "null" {
                info!("[CLI/App] 🍽️ 饭局已清空");
            } else {
                info!("[CLI/App] 🍽️ 饭局变更: {}", session_json);
            }
        }

        async fn on_open_events_changed(&self, events_json: String) {
            info!("[CLI/App] 📋 开放饭局看板变更: {}", events_json);
        }

        async fn on_notification_posted(&self, notification_json: String) {
            info!("[CLI/App] 🔔 通知: {}", notification_json);
        }

        async fn on_notification_cleared(&self) {
            info!("[CLI/App] 🔕 通知已清除");
        }
    }
    client.set_app_listener(Arc::new(CliAppListener)).await;

    // 好友监听器
    struct CliFriendListener;
    #[async_trait::async_trait]
    impl FriendListener for CliFriendListener {
        async fn on_friend_list_changed(&self, friends_json: String) {
            info!("[CLI/Friend] 👥 好友列表变更: {}", friends_json);
        }

        async fn on_friend_request_list_changed(&self, requests_json: String) {
            info!("[CLI/Friend] 📝 好友申请变更: {}", requests_json);
        }
    }
    client.set_friend_listener(Arc::new(CliFriendListener)).await;
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    init_logger(&args.log_level);

    info!("[CLI] 🚀 LunchBuddy CLI 客户端（演示模式）");
    info!("[CLI] 👤 用户: {}", args.user);
    info!("[CLI] 💾 数据库: {}", args.db);
    info!("[CLI] ⏱️  停留时长: {} 秒（0=持续运行）", args.duration);

    // 创建客户端（演示模式灌入内置名册）
    let mut config = ClientConfig::new(args.user.clone());
    config.db_url = args.db.clone();
    config.use_seed_roster = true;
    let client = LunchBuddyClient::new(config);

    // 设置监听器
    setup_listeners(&client).await;

    // 启动会话
    info!("[CLI] 🔗 正在启动本地会话...");
    client
        .session_start()
        .await
        .map_err(|e| anyhow::anyhow!("会话启动失败: {}", e))?;

    // 注册或加载资料
    let profile = match client.profile().await {
        Some(profile) => {
            info!(
                "[CLI] ✅ 资料已加载: {} (shortId={})",
                profile.nickname, profile.short_id
            );
            profile
        }
        None => {
            let profile = client
                .register(&args.nickname)
                .await
                .map_err(|e| anyhow::anyhow!("注册失败: {}", e))?;
            info!(
                "[CLI] ✅ 注册成功: {} (shortId={})",
                profile.nickname, profile.short_id
            );
            profile
        }
    };

    let friends = client.friends().await?;
    info!("[CLI] 👥 好友名册（共 {} 位）:", friends.len());
    for friend in &friends {
        info!(
            "[CLI]   - {} | {} | {}",
            friend.nickname,
            if friend.note.is_empty() {
                "无备注"
            } else {
                &friend.note
            },
            if friend.is_active() {
                "在摆"
            } else {
                "约饭中"
            }
        );
    }

    // 第一幕：一键开摆，等完美匹配通知弹出后点进去成局
    info!("[CLI] —— 第一幕：一键开摆 ——");
    client.quick_start().await;
    sleep(Duration::from_millis(1500)).await;
    if let Some(note) = client.current_notification().await {
        info!("[CLI] 🔔 当前通知: {} / {}", note.title, note.body);
    }
    match client.click_notification().await {
        Some(NotificationRoute::OpenPairwiseConfirm(friend)) => {
            info!("[CLI] 🤝 进入双人确认: {}", friend.nickname);
            let session = client
                .confirm_pairwise()
                .await
                .map_err(|e| anyhow::anyhow!("成局失败: {}", e))?;
            info!(
                "[CLI] 🍱 成局: {} | {} | {} | {}",
                session.title, session.food, session.time, session.location
            );
            if let Ok(view) = client.toggle_session_view().await {
                info!("[CLI] 👀 切换视角: {:?}", view);
            }
            let _ = client.acknowledge_session().await;
            let cancelled = client.cancel_session("吃完改天再约").await?;
            info!("[CLI] 🗑️ 已取消: {}", cancelled.title);
        }
        other => info!("[CLI] 🤷 没等到匹配通知: {:?}", other),
    }

    // 第二幕：看板拼桌，加入后再按二次确认退出
    info!("[CLI] —— 第二幕：拼桌开放饭局 ——");
    let events = client.visible_open_events().await?;
    info!("[CLI] 📋 可拼桌饭局（共 {} 场）:", events.len());
    for event in &events {
        info!(
            "[CLI]   - {} | {} | {} | {}",
            event.title, event.food, event.time, event.location
        );
    }
    if let Some(event) = events.first() {
        if let Some(session) = client.join_open_event(&event.id).await? {
            info!(
                "[CLI] 🪑 已加入: {}（{} 人在局）",
                session.title,
                session.participants.len()
            );
        }
        client.request_exit_session().await?;
        let exited = client.confirm_exit_session().await?;
        info!("[CLI] 👋 已退出: {}", exited.title);
    }

    // 第三幕：模拟好友申请，点通知跳申请列表并接受
    info!("[CLI] —— 第三幕：好友申请与通知 ——");
    let request = client.simulate_friend_request().await?;
    if let Some(NotificationRoute::OpenFriendRequests) = client.click_notification().await {
        info!(
            "[CLI] 📝 打开申请列表（{} 条待处理）",
            client.friend_requests().await?.len()
        );
    }
    if let Some(friend) = client.accept_friend_request(&request.id).await? {
        info!(
            "[CLI] ✅ 已接受: {}，当前好友 {} 位",
            friend.nickname,
            client.friends().await?.len()
        );
    }

    // 第四幕：收到好友的约饭邀请并接受
    info!("[CLI] —— 第四幕：收到约饭邀请 ——");
    client.simulate_incoming_invite("2").await?;
    if let Some(NotificationRoute::OpenIncomingInvite(friend)) = client.click_notification().await {
        info!("[CLI] 💌 来自 {} 的邀请，接受并成局", friend.nickname);
        match client.confirm_pairwise().await {
            Ok(session) => {
                info!("[CLI] 🍱 成局: {}", session.title);
                let _ = client.cancel_session("演示结束，改天真约").await;
            }
            Err(e) => error!("[CLI] ❌ 确认失败: {}", e),
        }
    }

    // 第五幕：发布自定义偏好并查看匹配分组
    info!("[CLI] —— 第五幕：偏好发布与匹配分组 ——");
    client.begin_custom().await;
    let mut draft = client.lunch_details().await;
    draft.food = "日料鳗鱼饭".to_string();
    draft.time = "12:00".to_string();
    client.update_draft(draft).await;
    client.confirm_custom().await;
    let (matched, others) = client.partition_matches().await?;
    info!(
        "[CLI] ✨ 合拍 {} 位 / 不合拍 {} 位",
        matched.len(),
        others.len()
    );
    for friend in &matched {
        info!("[CLI]   - {} ({})", friend.nickname, friend.avatar_color);
    }
    client.stop_seeking().await;

    // 按 6 位 ID 加好友的反馈示例
    if let Err(e) = client.add_friend("520131").await {
        info!("[CLI] 💡 按 ID 加好友示例: {}", e);
    }
    info!(
        "[CLI] 💡 把你的 shortId {} 发给同事，对方注册后即可互加",
        profile.short_id
    );

    info!("[CLI] 📥 演示脚本执行完毕，继续监听事件...");
    if args.duration > 0 {
        info!("[CLI] ⏰ {} 秒后自动退出", args.duration);
        sleep(Duration::from_secs(args.duration)).await;
        info!("[CLI] 👋 程序退出");
    } else {
        info!("[CLI] ⏰ 持续运行中，按 Ctrl+C 退出");
        // 持续运行直到被中断
        loop {
            sleep(Duration::from_secs(3600)).await;
        }
    }

    Ok(())
}
