//! # Error 模块
//!
//! 定义 room-runtime 中使用的错误类型。
//!
//! 只有构造期的配置问题会成为错误；点击被忽略、重复的移动请求、
//! 补间冲突都在运行时静默处理，不产生错误。

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(String),

    /// 解析失败
    #[error("配置解析失败: {0}")]
    Parse(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

/// 房间对象构造错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoomError {
    /// 声明的零件在几何数据中缺失
    #[error("对象 '{object}' 缺少零件 '{part}'")]
    MissingPart { object: String, part: String },

    /// 音频后端无法提供音效
    #[error("对象 '{object}' 缺少音效 '{clip}'")]
    MissingSound { object: String, clip: String },

    /// 子部件零件名无法解析出下标
    #[error("零件名 '{name}' 无法解析出子部件下标")]
    InvalidCaseName { name: String },

    /// 零件名中的下标与声明顺序不一致
    #[error("零件 '{name}' 的下标 {parsed} 与声明顺序 {declared} 不一致")]
    CaseIndexMismatch {
        name: String,
        parsed: usize,
        declared: usize,
    },

    /// 房间中没有该对象
    #[error("房间中没有对象 '{kind}'")]
    UnknownObject { kind: String },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type RoomResult<T> = Result<T, RoomError>;
