//! SQLite 数据库工具：统一创建连接池并执行 sqlx 迁移
//!
//! 约定：crate 根目录下的 `migrations/` 存放全部迁移 SQL，
//! 资料、好友、申请、推送订阅四张表都在这里建出来。

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

/// 创建 SQLite 连接池并执行所有未执行的迁移
pub async fn create_sqlite_pool_with_migration(db_url: &str) -> Result<Pool<Sqlite>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
        .with_context(|| format!("连接 SQLite 失败: {}", db_url))?;

    sqlx::migrate!().run(&pool).await.context("执行数据库迁移失败")?;

    Ok(pool)
}
