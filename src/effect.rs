//! 关闭动效模块
//!
//! `close(effect)` 的参数是一个不区分大小写的字符串：
//! - `""`：不做动画，立即隐藏并释放窗口
//! - `fade`：原地淡出
//! - `slide_up_fade`：淡出同时上移 50
//! - `slide_down_fade`：淡出同时下移 50
//! - 其它非空值（包括纯空白）：按 `fade` 处理（不是错误）

use std::time::Duration;

use crate::geometry::Rect;

/// 显示/关闭动画的固定时长
pub const ANIMATION_DURATION: Duration = Duration::from_millis(300);

/// 滑动类动效的纵向位移（逻辑单位）
pub const SLIDE_DISTANCE: f64 = 50.0;

/// 关闭时的过渡动效
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissEffect {
    Fade,
    SlideUpFade,
    SlideDownFade,
}

impl DismissEffect {
    /// 解析外部传入的动效名
    ///
    /// 只有空字符串返回 `None`（不做动画）；空白不会被裁掉。
    pub fn parse(effect: &str) -> Option<Self> {
        if effect.is_empty() {
            return None;
        }

        match effect.to_lowercase().as_str() {
            "fade" => Some(Self::Fade),
            "slide_up_fade" => Some(Self::SlideUpFade),
            "slide_down_fade" => Some(Self::SlideDownFade),
            other => {
                log::debug!("NativeSplash: unknown dismiss effect '{}', falling back to fade", other);
                Some(Self::Fade)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::SlideUpFade => "slide_up_fade",
            Self::SlideDownFade => "slide_down_fade",
        }
    }

    /// 动画结束时窗口应处的位置
    pub fn target_frame(self, frame: Rect) -> Rect {
        match self {
            Self::Fade => frame,
            Self::SlideUpFade => frame.translated(0.0, SLIDE_DISTANCE),
            Self::SlideDownFade => frame.translated(0.0, -SLIDE_DISTANCE),
        }
    }
}
