use async_trait::async_trait;

/// 应用层事件监听器：求约饭状态、饭局、开放饭局、通知。
/// 参数均为 JSON 字符串，被清空的对象以 "null" 传递
#[async_trait]
pub trait AppListener: Send + Sync {
    /// 求约饭状态变化（进入、发布、停止）
    async fn on_seeking_changed(&self, status_json: String);

    /// 饭局创建、确认或清除
    async fn on_session_changed(&self, session_json: String);

    /// 开放饭局看板变化（加入、退出）
    async fn on_open_events_changed(&self, events_json: String);

    /// 通知入槽
    async fn on_notification_posted(&self, notification_json: String);

    /// 通知被点击、关闭或过期回收
    async fn on_notification_cleared(&self);
}

/// 空实现，方便调用方只关心部分事件
pub struct EmptyAppListener;

#[async_trait]
impl AppListener for EmptyAppListener {
    async fn on_seeking_changed(&self, _status_json: String) {
        // 默认不做任何处理
    }

    async fn on_session_changed(&self, _session_json: String) {
        // 默认不做任何处理
    }

    async fn on_open_events_changed(&self, _events_json: String) {
        // 默认不做任何处理
    }

    async fn on_notification_posted(&self, _notification_json: String) {
        // 默认不做任何处理
    }

    async fn on_notification_cleared(&self) {
        // 默认不做任何处理
    }
}
