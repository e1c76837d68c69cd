//! # 图片解析模块
//!
//! ## 设计思路
//!
//! 在 `show()` 时按确定的两级顺序解析图片：
//!
//! ```text
//! 资源包（imageResourceName 非空）
//!    ├─ 成功 → 基础表示 (+ retina 表示，失败仅告警)
//!    └─ 失败（找不到 / 解码失败）→ 记录错误，继续
//!          ↓
//! 原始像素缓冲（imageWidth/imageHeight > 0 且缓冲非空）
//!    ├─ 长度严格等于 w*h*4 → 图片
//!    └─ 长度不符 → 记录错误
//!          ↓
//! 无图片（调用方显示空白窗口）
//! ```
//!
//! 资源名为空时直接进入第二级，而不是报错。

use crate::config::SplashConfig;
use crate::error::SplashError;
use crate::geometry::Size;

use super::bundle::{describe, AssetBundle};
use super::decode::{decode_encoded, decode_pixel_buffer};
use super::source::{ImageSource, ResolvedImage, SplashImage};

/// 按配置解析启动画面图片
///
/// 所有失败都只记录日志，返回 `None` 表示窗口保持空白。
pub fn resolve_image(config: &SplashConfig, bundle: &dyn AssetBundle) -> Option<ResolvedImage> {
    if !config.image_resource_name.is_empty() {
        match load_bundled_image(config, bundle) {
            Ok(image) => {
                return Some(ResolvedImage {
                    image,
                    source: ImageSource::Bundled,
                });
            }
            Err(err) => log::error!("NativeSplash: {}", err),
        }
    }

    if config.image_width <= 0 || config.image_height <= 0 || config.image_pixels.is_empty() {
        return None;
    }

    match decode_pixel_buffer(&config.image_pixels, config.image_width, config.image_height) {
        Ok(rep) => {
            let size = Size::new(rep.pixel_width as f64, rep.pixel_height as f64);
            Some(ResolvedImage {
                image: SplashImage::new(size, rep),
                source: ImageSource::PixelBuffer,
            })
        }
        Err(err) => {
            log::error!("NativeSplash: {}", err);
            None
        }
    }
}

/// 从资源包加载基础图片与可选的 retina 表示
fn load_bundled_image(
    config: &SplashConfig,
    bundle: &dyn AssetBundle,
) -> Result<SplashImage, SplashError> {
    let name = config.image_resource_name.as_str();
    let extension = Some(config.image_resource_extension.as_str());
    let label = describe(name, extension);

    let bytes = bundle.load(name, extension)?;
    let base = decode_encoded(&bytes, &label)?;

    let size = config.image_override_size().unwrap_or_else(|| {
        Size::new(base.pixel_width as f64, base.pixel_height as f64)
    });
    let mut image = SplashImage::new(size, base);

    if let Some(retina_name) = config.retina_resource_name() {
        let retina_extension = Some(config.retina_resource_extension());
        let retina_label = describe(retina_name, retina_extension);

        match bundle
            .load(retina_name, retina_extension)
            .and_then(|bytes| decode_encoded(&bytes, &retina_label))
        {
            Ok(rep) => image.add_representation(rep),
            Err(err) => log::warn!(
                "NativeSplash: unable to load retina image resource {} ({}), using base representation only",
                retina_label,
                err
            ),
        }
    }

    Ok(image)
}
