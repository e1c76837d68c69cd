//! 窗口系统抽象模块
//!
//! 启动画面对窗口系统只有很窄的需求：读取主屏可见区域、创建一个无边框置顶窗口、
//! 设置透明度与位置、放一张居中的图片、做一段属性动画、最后隐藏并释放。
//!
//! # 设计思路
//!
//! - 平台差异下沉：`WindowSystem` / `SplashWindow` 两个 trait 描述上述能力，
//!   `presenter` 只依赖 trait，不接触任何平台 API。
//! - 窗口资源由 `SplashWindow` 的所有权表示：`Drop` 即释放原生窗口。
//! - macOS 使用 cocoa 实现；其余平台（以及测试）使用 `headless` 记录实现。
//!
//! # 坐标系统
//!
//! 直接使用平台逻辑坐标。macOS 为左下角原点、Y 轴向上，
//! 因此 `slide_up_fade` 的 +50 即视觉上的向上移动。

use std::time::Duration;

use crate::error::SplashError;
use crate::geometry::Rect;
use crate::image_source::SplashImage;

pub mod headless;
#[cfg(target_os = "macos")]
pub mod macos;

/// 创建启动窗口所需的参数
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    /// 窗口在屏幕坐标中的位置与尺寸
    pub frame: Rect,
    /// 窗口标题（辅助功能）
    pub title: String,
}

/// 一段属性动画的目标值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub alpha: f64,
    pub frame: Rect,
    pub duration: Duration,
}

/// 平台窗口系统
pub trait WindowSystem: Send + Sync + 'static {
    type Window: SplashWindow;

    /// 主屏可见区域（去除菜单栏与 Dock）
    fn main_screen_visible_frame(&self) -> Option<Rect>;

    /// 创建无边框、非不透明、无阴影、浮动层级的窗口（尚未显示）
    fn create_window(&self, spec: &WindowSpec) -> Result<Self::Window, SplashError>;
}

/// 启动窗口
///
/// 所有方法只会在 UI 线程上调用。
pub trait SplashWindow: Send + 'static {
    fn frame(&self) -> Rect;

    fn set_alpha(&mut self, alpha: f64);

    /// 在窗口内容区 `rect`（相对窗口）处放置图片
    fn set_image(&mut self, image: &SplashImage, rect: Rect) -> Result<(), SplashError>;

    /// 显示到最前并成为 key window
    fn order_front(&mut self);

    /// 以动画过渡到目标透明度与位置
    fn animate(&mut self, transition: Transition);

    /// 隐藏窗口
    fn order_out(&mut self);
}

/// 当前平台的窗口系统
#[cfg(target_os = "macos")]
pub type NativeWindowSystem = macos::CocoaWindowSystem;

/// 当前平台的窗口系统
#[cfg(not(target_os = "macos"))]
pub type NativeWindowSystem = headless::HeadlessWindowSystem;

/// 构造当前平台的窗口系统
pub fn native_window_system() -> NativeWindowSystem {
    #[cfg(target_os = "macos")]
    {
        macos::CocoaWindowSystem
    }

    #[cfg(not(target_os = "macos"))]
    {
        log::warn!("NativeSplash: no native splash backend on this platform, using headless window system");
        headless::HeadlessWindowSystem::new(None)
    }
}
