//! 几何计算模块
//!
//! 该模块实现启动画面唯一的几何算法：把一个矩形居中放进另一个矩形。
//! 窗口在主屏可见区域内居中、图片在窗口内容区内居中，都复用同一个公式：
//!
//! ```text
//! origin = (outer.size - inner.size) / 2 + outer.origin
//! ```
//!
//! # 设计思路
//!
//! - 算法纯函数化：输入为内外尺寸，输出唯一坐标，便于测试。
//! - X/Y 轴独立计算，不依赖坐标系方向（macOS 左下角原点同样适用）。
//! - 使用 `f64` 与平台的逻辑坐标（CGFloat）保持一致，不做取整。
//! - 内容大于外框时原点为负值，保持居中语义而不是贴边收敛。

/// 逻辑坐标系中的点
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 逻辑尺寸（宽、高）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// 由原点与尺寸描述的矩形
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// 以 `(0, 0)` 为原点的矩形，用于描述窗口内容区
    pub const fn from_size(size: Size) -> Self {
        Self {
            origin: Point::new(0.0, 0.0),
            size,
        }
    }

    /// 矩形中心点
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// 平移后的新矩形，尺寸不变
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            origin: Point::new(self.origin.x + dx, self.origin.y + dy),
            size: self.size,
        }
    }
}

/// 计算 `inner` 在 `outer` 内居中时的原点
///
/// # 参数
/// * `inner` - 被放置内容的尺寸（窗口或图片）
/// * `outer` - 容器矩形（屏幕可见区域或窗口内容区）
///
/// # 返回
/// 内容矩形的原点，满足 `origin + inner / 2 == outer.center()`
///
/// # 示例
/// ```
/// use tauri_plugin_native_splash::geometry::{center_in, Point, Rect, Size};
///
/// let window = Rect::from_size(Size::new(300.0, 200.0));
/// let origin = center_in(Size::new(100.0, 80.0), window);
/// assert_eq!(origin, Point::new(100.0, 60.0));
/// ```
pub fn center_in(inner: Size, outer: Rect) -> Point {
    let x = (outer.size.width - inner.width) / 2.0 + outer.origin.x;
    let y = (outer.size.height - inner.height) / 2.0 + outer.origin.y;
    Point::new(x, y)
}

/// 居中后的完整矩形
pub fn centered_rect(inner: Size, outer: Rect) -> Rect {
    Rect::new(center_in(inner, outer), inner)
}
