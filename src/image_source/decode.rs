//! # 解码模块
//!
//! ## 设计思路
//!
//! 将"字节 → 位图"集中在一处，输出统一为预乘 alpha 的 RGBA：
//! - 资源包中的编码图片（PNG / JPEG …）由 `image` crate 解码后预乘；
//! - 原始像素缓冲本身就是预乘 RGBA，只做严格的长度校验。
//!
//! ## 实现思路
//!
//! 1. 编码图片：`image::load_from_memory` → `to_rgba8` → 预乘
//! 2. 像素缓冲：`width * height * 4` 使用 checked 运算，长度必须完全一致，
//!    不一致视为解码失败（严格契约，而非尽力而为）

use crate::error::SplashError;

use super::source::BitmapRep;

/// 解码资源包中的编码图片
///
/// `name` 仅用于错误信息。
pub(crate) fn decode_encoded(bytes: &[u8], name: &str) -> Result<BitmapRep, SplashError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| SplashError::AssetDecode {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    let rgba = decoded.to_rgba8();
    let (pixel_width, pixel_height) = rgba.dimensions();
    let mut pixels = rgba.into_raw();
    premultiply_alpha(&mut pixels);

    log::debug!(
        "NativeSplash: decoded {} ({}x{} px)",
        name,
        pixel_width,
        pixel_height
    );

    Ok(BitmapRep {
        pixel_width,
        pixel_height,
        pixels,
    })
}

/// 校验并包装原始像素缓冲
///
/// 调用方保证 `width > 0`、`height > 0` 且缓冲非空。
pub(crate) fn decode_pixel_buffer(
    bytes: &[u8],
    width: i64,
    height: i64,
) -> Result<BitmapRep, SplashError> {
    let expected = usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        .and_then(|pixels| pixels.checked_mul(4));

    let size_mismatch = || SplashError::PixelBufferSize {
        actual: bytes.len(),
        expected: expected.unwrap_or(usize::MAX),
        width,
        height,
    };

    let expected = expected.ok_or_else(size_mismatch)?;
    if bytes.len() != expected {
        return Err(size_mismatch());
    }

    let pixel_width = u32::try_from(width).map_err(|_| size_mismatch())?;
    let pixel_height = u32::try_from(height).map_err(|_| size_mismatch())?;

    Ok(BitmapRep {
        pixel_width,
        pixel_height,
        pixels: bytes.to_vec(),
    })
}

/// 原地把直通 alpha 的 RGBA 转为预乘 alpha
fn premultiply_alpha(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        let alpha = px[3] as u16;
        if alpha == 255 {
            continue;
        }
        for channel in &mut px[..3] {
            *channel = ((*channel as u16 * alpha + 127) / 255) as u8;
        }
    }
}
