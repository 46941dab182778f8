//! 好友域：数据模型、DAO、名册服务与事件监听

pub mod dao;
pub mod directory;
pub mod listener;
pub mod models;

pub use dao::{FriendDao, FriendLink};
pub use directory::FriendDirectory;
pub use listener::{EmptyFriendListener, FriendListener};
pub use models::{Friend, FriendRequest, FriendStatus};
