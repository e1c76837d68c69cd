//! 无界面窗口系统
//!
//! 不创建任何原生窗口，只把每个窗口的状态记录下来：
//! 位置、透明度、可见性、图片摆放、动画序列以及是否已释放。
//! 用于没有原生实现的平台，也用于测试中断言窗口行为。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::SplashError;
use crate::geometry::Rect;
use crate::image_source::SplashImage;

use super::{SplashWindow, Transition, WindowSpec, WindowSystem};

/// 窗口内已放置的图片
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    /// 相对窗口内容区的位置与尺寸
    pub rect: Rect,
    /// 位图表示数量（基础 + retina）
    pub representations: usize,
}

/// 单个窗口的记录
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessWindowRecord {
    pub id: usize,
    pub title: String,
    pub frame: Rect,
    pub alpha: f64,
    pub visible: bool,
    pub image: Option<PlacedImage>,
    pub transitions: Vec<Transition>,
    pub released: bool,
}

type Registry = Arc<Mutex<Vec<HeadlessWindowRecord>>>;

fn lock(registry: &Registry) -> MutexGuard<'_, Vec<HeadlessWindowRecord>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 记录型窗口系统
#[derive(Debug, Clone)]
pub struct HeadlessWindowSystem {
    screen: Option<Rect>,
    registry: Registry,
    fail_creation: Arc<AtomicBool>,
}

impl HeadlessWindowSystem {
    /// `screen` 为模拟的主屏可见区域；`None` 表示没有主屏
    pub fn new(screen: Option<Rect>) -> Self {
        Self {
            screen,
            registry: Arc::new(Mutex::new(Vec::new())),
            fail_creation: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 让后续的窗口创建失败
    pub fn set_fail_creation(&self, fail: bool) {
        self.fail_creation.store(fail, Ordering::SeqCst);
    }

    /// 所有创建过的窗口（含已释放）
    pub fn windows(&self) -> Vec<HeadlessWindowRecord> {
        lock(&self.registry).clone()
    }

    /// 尚未释放的窗口
    pub fn live_windows(&self) -> Vec<HeadlessWindowRecord> {
        lock(&self.registry)
            .iter()
            .filter(|record| !record.released)
            .cloned()
            .collect()
    }
}

impl WindowSystem for HeadlessWindowSystem {
    type Window = HeadlessWindow;

    fn main_screen_visible_frame(&self) -> Option<Rect> {
        self.screen
    }

    fn create_window(&self, spec: &WindowSpec) -> Result<HeadlessWindow, SplashError> {
        if self.fail_creation.load(Ordering::SeqCst) {
            return Err(SplashError::Window("headless window creation disabled".to_string()));
        }

        let mut records = lock(&self.registry);
        let id = records.len();
        records.push(HeadlessWindowRecord {
            id,
            title: spec.title.clone(),
            frame: spec.frame,
            alpha: 1.0,
            visible: false,
            image: None,
            transitions: Vec::new(),
            released: false,
        });

        Ok(HeadlessWindow {
            id,
            frame: spec.frame,
            registry: Arc::clone(&self.registry),
        })
    }
}

/// 记录型窗口，`Drop` 时标记为已释放
#[derive(Debug)]
pub struct HeadlessWindow {
    id: usize,
    frame: Rect,
    registry: Registry,
}

impl HeadlessWindow {
    fn update(&self, apply: impl FnOnce(&mut HeadlessWindowRecord)) {
        if let Some(record) = lock(&self.registry).get_mut(self.id) {
            apply(record);
        }
    }
}

impl SplashWindow for HeadlessWindow {
    fn frame(&self) -> Rect {
        self.frame
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.update(|record| record.alpha = alpha);
    }

    fn set_image(&mut self, image: &SplashImage, rect: Rect) -> Result<(), SplashError> {
        let placed = PlacedImage {
            rect,
            representations: image.representations.len(),
        };
        self.update(|record| record.image = Some(placed));
        Ok(())
    }

    fn order_front(&mut self) {
        self.update(|record| record.visible = true);
    }

    fn animate(&mut self, transition: Transition) {
        // 没有时间轴，直接落到目标值
        self.frame = transition.frame;
        self.update(|record| {
            record.alpha = transition.alpha;
            record.frame = transition.frame;
            record.transitions.push(transition);
        });
    }

    fn order_out(&mut self) {
        self.update(|record| record.visible = false);
    }
}

impl Drop for HeadlessWindow {
    fn drop(&mut self) {
        self.update(|record| record.released = true);
    }
}
