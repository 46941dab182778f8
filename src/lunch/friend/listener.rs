use async_trait::async_trait;

/// 好友侧事件监听器，参数均为 JSON 字符串
#[async_trait]
pub trait FriendListener: Send + Sync {
    /// 好友列表发生变化（添加/删除/备注/状态）
    async fn on_friend_list_changed(&self, friends_json: String);

    /// 好友申请队列发生变化
    async fn on_friend_request_list_changed(&self, requests_json: String);
}

/// 空实现，方便调用方只关心部分事件
pub struct EmptyFriendListener;

#[async_trait]
impl FriendListener for EmptyFriendListener {
    async fn on_friend_list_changed(&self, _friends_json: String) {
        // 默认不做任何处理
    }

    async fn on_friend_request_list_changed(&self, _requests_json: String) {
        // 默认不做任何处理
    }
}
