pub mod client;
pub mod db;
pub mod dining;
pub mod error;
pub mod friend;
pub mod ids;
pub mod listener;
pub mod matching;
pub mod notify;
pub mod profile;
pub mod push;
pub mod seeds;
pub mod status;
pub mod types;

// 重新导出客户端入口
pub use client::{ClientConfig, LunchBuddyClient};

// 重新导出核心领域类型
pub use error::{CoreError, CoreResult};
pub use types::{LunchPreference, PrivacyField};
