//! # 图片来源模块（image_source）
//!
//! ## 设计思路
//!
//! 将"资源定位 → 解码 → 两级解析"按职责拆分为子模块：
//!
//! - `bundle`：资源包抽象（目录 / 内存）
//! - `decode`：编码图片解码与原始像素缓冲校验
//! - `resolve`：资源包优先、像素缓冲兜底的解析顺序
//! - `source`：来源与位图中间模型
//!
//! ## 调用链
//!
//! ```text
//! presenter::show
//!    ↓
//! resolve.rs（两级解析 + 日志）
//!    ├─ bundle.rs（按名称 + 扩展名读取字节）
//!    └─ decode.rs（解码 / 长度校验 / 预乘）
//!    ↓
//! SplashImage → platform 窗口
//! ```

mod bundle;
mod decode;
mod resolve;
mod source;

pub use bundle::{AssetBundle, DirectoryBundle, MemoryBundle};
pub use resolve::resolve_image;
pub use source::{BitmapRep, ImageSource, ResolvedImage, SplashImage};
