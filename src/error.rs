//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 启动画面属于"即发即忘"的展示逻辑：宿主无法对部分失败做出有意义的反应，
//! 因此公开的 `show` / `close` 不返回错误，所有失败都只写日志。
//! 但内部各阶段（配置校验、资源加载、解码、窗口创建）仍然使用
//! `Result<T, SplashError>` + `?` 传递错误，在最外层统一记录。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息，日志里直接 `{}` 输出即可。
//! - 为 `std::io::Error` 提供 `From` 转换；解码错误需要带上资源名，由调用方显式构造。

/// 启动画面统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum SplashError {
    /// 未注册配置提供者
    #[error("configuration provider not set, splash screen cannot be shown")]
    Configuration,

    /// 窗口尺寸无效（任一维度 <= 0）
    #[error("invalid window dimensions {width}x{height} (must be > 0)")]
    InvalidDimensions { width: i64, height: i64 },

    /// 资源包中找不到指定资源
    #[error("unable to locate image resource {0} in bundle")]
    AssetNotFound(String),

    /// 资源存在但无法解码
    #[error("unable to decode image resource {name}: {reason}")]
    AssetDecode { name: String, reason: String },

    /// 原始像素缓冲长度与声明尺寸不符
    #[error(
        "pixel data size ({actual}) does not match expected size ({expected}) for {width}x{height} image"
    )]
    PixelBufferSize {
        actual: usize,
        expected: usize,
        width: i64,
        height: i64,
    },

    /// 文件系统 I/O 错误
    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    /// 窗口系统操作失败
    #[error("window operation failed: {0}")]
    Window(String),
}
