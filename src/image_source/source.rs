//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将"图片从哪里来"和"解码后的结果"解耦：
//! - `ImageSource` 表示最终采用的来源（资源包 / 原始像素缓冲）
//! - `BitmapRep` 表示一份已解码的位图（预乘 alpha 的 RGBA）
//! - `SplashImage` 表示同一逻辑图片的一组表示（基础 + 可选 retina）

use crate::geometry::Size;

/// 图片最终采用的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// 资源包中的命名资源
    Bundled,
    /// 配置中的原始像素缓冲
    PixelBuffer,
}

/// 一份已解码的位图
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapRep {
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// 预乘 alpha 的 RGBA 字节（`pixel_width * pixel_height * 4`）
    pub pixels: Vec<u8>,
}

/// 同一逻辑图片的多份表示
///
/// 第一份为基础表示；平台按像素密度挑选最合适的一份绘制。
#[derive(Debug, Clone, PartialEq)]
pub struct SplashImage {
    /// 逻辑尺寸，窗口内的摆放以此为准
    pub size: Size,
    pub representations: Vec<BitmapRep>,
}

impl SplashImage {
    pub fn new(size: Size, base: BitmapRep) -> Self {
        Self {
            size,
            representations: vec![base],
        }
    }

    pub fn add_representation(&mut self, rep: BitmapRep) {
        self.representations.push(rep);
    }

    /// 每份表示相对逻辑尺寸的像素密度（取横向）
    pub fn scale_factors(&self) -> Vec<f64> {
        self.representations
            .iter()
            .map(|rep| {
                if self.size.width > 0.0 {
                    rep.pixel_width as f64 / self.size.width
                } else {
                    1.0
                }
            })
            .collect()
    }
}

/// 解析结果：图片及其来源
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub image: SplashImage,
    pub source: ImageSource,
}
