use thiserror::Error;

/// 核心操作的错误分类，薄壳层按变体决定提示文案还是上报
#[derive(Debug, Error)]
pub enum CoreError {
    /// 输入或当前状态不满足操作前置条件
    #[error("校验失败: {0}")]
    Validation(String),

    /// 目标对象不存在（好友、饭局、订阅等）
    #[error("未找到: {0}")]
    NotFound(String),

    /// 重复添加或重复操作
    #[error("重复: {0}")]
    Duplicate(String),

    /// 操作对象指向了自己
    #[error("不能指向自己: {0}")]
    SelfReference(String),

    /// 存储或网络等远端读写失败
    #[error("远端操作失败: {0}")]
    Remote(#[from] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
