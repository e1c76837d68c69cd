//! # 资源包模块
//!
//! ## 设计思路
//!
//! 启动画面只"读"宿主打包好的资源，不拥有任何磁盘状态。
//! 通过 `AssetBundle` 抽象资源查找，让解析逻辑与具体存储解耦：
//! - `DirectoryBundle`：应用资源目录（macOS 上即 `Contents/Resources`）
//! - `MemoryBundle`：内嵌资源（`include_bytes!`），也用于测试
//!
//! ## 实现思路
//!
//! - 资源按"名称 + 可选扩展名"定位；扩展名为空时只匹配与名称完全相同的文件，
//!   不会按主文件名猜测扩展名（`logo` 不会命中 `logo.png`）。
//! - "找不到" 与 "读取失败" 使用不同错误分支，便于日志区分。

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SplashError;

/// 资源包：按名称与扩展名读取资源字节
pub trait AssetBundle: Send + Sync {
    fn load(&self, name: &str, extension: Option<&str>) -> Result<Vec<u8>, SplashError>;
}

/// 资源描述，用于日志：`logo.png` / `logo`
pub(crate) fn describe(name: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) if !ext.is_empty() => format!("{}.{}", name, ext),
        _ => name.to_string(),
    }
}

/// 基于目录的资源包
#[derive(Debug, Clone)]
pub struct DirectoryBundle {
    root: PathBuf,
}

impl DirectoryBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 定位资源文件
    fn locate(&self, name: &str, extension: Option<&str>) -> Option<PathBuf> {
        let path = self.root.join(describe(name, extension));
        path.is_file().then_some(path)
    }
}

impl AssetBundle for DirectoryBundle {
    fn load(&self, name: &str, extension: Option<&str>) -> Result<Vec<u8>, SplashError> {
        let path = self
            .locate(name, extension)
            .ok_or_else(|| SplashError::AssetNotFound(describe(name, extension)))?;

        log::debug!("NativeSplash: reading resource {}", path.display());
        Ok(fs::read(path)?)
    }
}

/// 内存资源包
///
/// 键为完整文件名（`logo.png`）。
#[derive(Debug, Clone, Default)]
pub struct MemoryBundle {
    assets: BTreeMap<String, Vec<u8>>,
}

impl MemoryBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(file_name, bytes);
        self
    }

    pub fn insert(&mut self, file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.assets.insert(file_name.into(), bytes.into());
    }
}

impl AssetBundle for MemoryBundle {
    fn load(&self, name: &str, extension: Option<&str>) -> Result<Vec<u8>, SplashError> {
        self.assets
            .get(&describe(name, extension))
            .cloned()
            .ok_or_else(|| SplashError::AssetNotFound(describe(name, extension)))
    }
}
