//! # 配置模块
//!
//! ## 设计思路
//!
//! 宿主在调用 `show()` 之前提供配置。配置是一个只读值对象，
//! 所有可选字段都有显式默认值（空字符串 / `None` / 0），
//! 只在使用点（`show()`）校验一次。
//!
//! ## 实现思路
//!
//! - `SplashConfig` 通过 `serde` 反序列化，键名使用 camelCase，
//!   既可以写在 `tauri.conf.json` 的 `plugins.native-splash` 中，也可以在代码里构造。
//! - `ConfigurationProvider` 是注入点：每次 `show()` 都会重新读取，
//!   宿主可以在任意时刻替换提供者，也可以用闭包延迟计算配置。

use serde::Deserialize;

use crate::geometry::Size;

/// 启动画面配置
///
/// 图片来源按优先级解析：
/// 1. `image_resource_name`（+ 可选 retina 资源）指向资源包中的图片；
/// 2. `image_pixels` + `image_width` / `image_height` 提供的原始 RGBA 缓冲。
///
/// `image_width` / `image_height` 同时作为已加载图片的目标逻辑尺寸。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SplashConfig {
    /// 窗口宽度（逻辑单位），<= 0 时不显示
    pub window_width: i64,
    /// 窗口高度（逻辑单位），<= 0 时不显示
    pub window_height: i64,
    /// 窗口标题，仅用于辅助功能
    pub window_title: String,
    /// 显示时是否淡入
    pub with_animation: bool,
    /// 预乘 alpha 的 RGBA 像素（行优先、无填充）
    pub image_pixels: Vec<u8>,
    pub image_resource_name: String,
    pub image_resource_extension: String,
    pub retina_image_resource_name: Option<String>,
    /// 未指定时沿用 `image_resource_extension`
    pub retina_image_resource_extension: Option<String>,
    pub image_width: i64,
    pub image_height: i64,
}

impl SplashConfig {
    /// 有效的窗口尺寸；任一维度 <= 0 时返回 `None`
    pub fn window_size(&self) -> Option<Size> {
        if self.window_width <= 0 || self.window_height <= 0 {
            return None;
        }
        Some(Size::new(self.window_width as f64, self.window_height as f64))
    }

    /// 配置的图片目标尺寸；宽高都为正数时才生效
    pub fn image_override_size(&self) -> Option<Size> {
        if self.image_width > 0 && self.image_height > 0 {
            Some(Size::new(self.image_width as f64, self.image_height as f64))
        } else {
            None
        }
    }

    /// 非空的 retina 资源名
    ///
    /// 空字符串与 `None` 等价。
    pub fn retina_resource_name(&self) -> Option<&str> {
        self.retina_image_resource_name
            .as_deref()
            .filter(|name| !name.is_empty())
    }

    /// retina 资源扩展名，未指定时回退到基础扩展名
    pub fn retina_resource_extension(&self) -> &str {
        self.retina_image_resource_extension
            .as_deref()
            .unwrap_or(&self.image_resource_extension)
    }
}

/// 配置提供者
///
/// 每次 `show()` 调用都会重新读取一次。
pub trait ConfigurationProvider: Send + Sync {
    fn splash_config(&self) -> SplashConfig;
}

impl ConfigurationProvider for SplashConfig {
    fn splash_config(&self) -> SplashConfig {
        self.clone()
    }
}

impl<F> ConfigurationProvider for F
where
    F: Fn() -> SplashConfig + Send + Sync,
{
    fn splash_config(&self) -> SplashConfig {
        self()
    }
}
