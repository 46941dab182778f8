pub mod lunch;

// 重新导出常用类型和函数，方便外部使用
pub use lunch::{
    client::{ClientConfig, LunchBuddyClient},
    dining::{DiningSession, DiningView, OpenDiningEvent},
    error::{CoreError, CoreResult},
    friend::{Friend, FriendDirectory, FriendListener, FriendRequest, FriendStatus},
    listener::AppListener,
    status::{SeekingState, StatusLifecycle},
    types::LunchPreference,
};
