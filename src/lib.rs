//! # 原生启动画面插件：库入口
//!
//! 在宿主应用初始化期间显示一个无边框、居中、置顶的启动窗口，
//! 初始化完成后以可选的过渡动效关闭。
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  宿主 (Tauri 应用)                        │
//! │                                                          │
//! │   app.native_splash().show()  ...  .close("fade")        │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ plugin（NativeSplash 托管状态 + TauriDispatcher）
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↓            核心 (Rust)                           │
//! │                                                          │
//! │  ┌─ presenter ─── Hidden ⇄ Shown 状态机                  │
//! │  │   ├─ config         配置值对象 + 提供者               │
//! │  │   ├─ dispatch       UI 线程投递（阻塞 / 即发即忘）    │
//! │  │   ├─ effect         关闭动效解析                      │
//! │  │   └─ geometry       居中公式                          │
//! │  │                                                       │
//! │  ├─ image_source       资源包优先、像素缓冲兜底          │
//! │  └─ platform           窗口系统抽象                      │
//! │      ├─ macos          cocoa / AppKit                    │
//! │      └─ headless       记录型实现（其它平台 / 测试）     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `SplashError`，只用于内部传递与日志 |
//! | [`config`] | `SplashConfig` 与 `ConfigurationProvider` |
//! | [`geometry`] | 点 / 尺寸 / 矩形与居中计算 |
//! | [`effect`] | `close(effect)` 动效名解析与目标位置 |
//! | [`image_source`] | 资源包、解码、两级图片解析 |
//! | [`dispatch`] | `UiDispatcher` 调度原语与 `QueueDispatcher` |
//! | [`platform`] | `WindowSystem` / `SplashWindow` 及平台实现 |
//! | [`presenter`] | `SplashPresenter` 生命周期 |
//! | [`plugin`] | Tauri 插件 `init()` 与 `NativeSplashExt` |

pub mod config;
pub mod dispatch;
pub mod effect;
pub mod error;
pub mod geometry;
pub mod image_source;
pub mod platform;
pub mod plugin;
pub mod presenter;

pub use config::{ConfigurationProvider, SplashConfig};
pub use dispatch::{QueueDispatcher, UiDispatcher};
pub use effect::DismissEffect;
pub use error::SplashError;
pub use plugin::{init, NativeSplash, NativeSplashExt};
pub use presenter::SplashPresenter;
