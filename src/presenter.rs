//! 启动画面生命周期模块
//!
//! `SplashPresenter` 独占至多一个启动窗口，负责两态状态机：
//!
//! ```text
//!            show()（配置有效）
//!   Hidden ───────────────────────▶ Shown
//!     ▲                               │
//!     └───────────────────────────────┘
//!        close(effect) 完成（立即或动画结束）
//! ```
//!
//! - `Shown` 时再次 `show()`、`Hidden` 时 `close()` 都是空操作，不是错误。
//! - 关闭动画进行中状态仍为 `Shown`，此时 `show()` 被拒绝，重复的 `close()` 被忽略。
//! - 收尾任务丢失（事件循环已退出等）时，超过 `STALE_DISMISSAL` 后的下一次
//!   `show()` / `close()` 会先完成这次关闭，状态不会永久卡住。
//!
//! # 设计思路
//!
//! - 用显式的实例替代进程级静态单例：窗口系统、调度器、资源包全部注入，
//!   测试可以创建互不影响的实例。
//! - 所有状态变更都发生在 UI 线程任务内。Rust 要求共享状态 `Send + Sync`，
//!   因此状态放在一把只会被 UI 线程获取的 `Mutex` 里。
//! - 锁只包住状态读写，不跨越宿主回调（配置提供者）、资源读取和窗口系统调用：
//!   提供者里调用 `is_shown()` / `close()` 不会死锁。
//! - 公开方法不返回错误：失败全部写日志后降级（不显示 / 空白窗口 / 直接淡出）。
//!
//! # 实现思路
//!
//! - `show()` 通过 `run_blocking` 切到 UI 线程，调用方阻塞直到窗口显示完毕。
//! - `close()` 通过 `run_detached` 切到 UI 线程，调用方立即返回。
//! - 动画收尾通过 `dispatch_after(ANIMATION_DURATION)` 调度，收尾时隐藏并释放窗口。
//!   每次关闭带一个序号，过期的收尾任务不会误关后来的窗口。

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::config::ConfigurationProvider;
use crate::dispatch::UiDispatcher;
use crate::effect::{DismissEffect, ANIMATION_DURATION};
use crate::error::SplashError;
use crate::geometry::{center_in, centered_rect, Point, Rect};
use crate::image_source::{resolve_image, AssetBundle};
use crate::platform::{SplashWindow, Transition, WindowSpec, WindowSystem};

/// 关闭动画开始后多久仍未收尾即视为收尾任务已丢失
pub const STALE_DISMISSAL: Duration = Duration::from_millis(600);

/// 进行中的关闭动画
#[derive(Debug, Clone, Copy)]
struct Dismissal {
    id: u64,
    started: Instant,
}

/// 启动窗口状态
///
/// 不变量：至多一个窗口；"已显示" 当且仅当 `window.is_some()`。
struct SplashWindowState<W> {
    window: Option<W>,
    dismissal: Option<Dismissal>,
    next_dismissal: u64,
    /// `build_window` 进行中，拒绝重入的 `show()`
    building: bool,
}

impl<W: SplashWindow> SplashWindowState<W> {
    fn is_shown(&self) -> bool {
        self.window.is_some()
    }

    /// 隐藏并释放窗口，结束关闭动画
    fn release(&mut self) {
        if let Some(mut window) = self.window.take() {
            window.order_out();
        }
        self.dismissal = None;
        log::info!("NativeSplash: splash window closed");
    }

    /// 收尾任务迟迟没有执行时，就地完成关闭
    fn settle_stale_dismissal(&mut self, now: Instant) {
        let Some(dismissal) = self.dismissal else {
            return;
        };
        if now.duration_since(dismissal.started) >= STALE_DISMISSAL {
            log::warn!("NativeSplash: dismissal completion never ran, releasing window now");
            self.release();
        }
    }
}

struct Inner<S: WindowSystem> {
    system: S,
    dispatcher: Arc<dyn UiDispatcher>,
    bundle: Arc<dyn AssetBundle>,
    provider: Mutex<Option<Arc<dyn ConfigurationProvider>>>,
    state: Mutex<SplashWindowState<S::Window>>,
}

/// 启动画面展示器
///
/// 克隆得到的是同一个展示器的另一个句柄。
pub struct SplashPresenter<S: WindowSystem> {
    inner: Arc<Inner<S>>,
}

impl<S: WindowSystem> Clone for SplashPresenter<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: WindowSystem> SplashPresenter<S> {
    pub fn new(
        system: S,
        dispatcher: Arc<dyn UiDispatcher>,
        bundle: Arc<dyn AssetBundle>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                system,
                dispatcher,
                bundle,
                provider: Mutex::new(None),
                state: Mutex::new(SplashWindowState {
                    window: None,
                    dismissal: None,
                    next_dismissal: 0,
                    building: false,
                }),
            }),
        }
    }

    /// 注册或替换配置提供者，下一次 `show()` 生效
    pub fn set_configuration_provider(&self, provider: impl ConfigurationProvider + 'static) {
        *self.inner.lock_provider() = Some(Arc::new(provider));
    }

    pub fn clear_configuration_provider(&self) {
        *self.inner.lock_provider() = None;
    }

    /// 显示启动窗口
    ///
    /// 在 UI 线程上同步执行；从其它线程调用时阻塞直到完成。
    pub fn show(&self) {
        let inner = Arc::clone(&self.inner);
        self.inner
            .dispatcher
            .run_blocking(Box::new(move || inner.show_on_ui_thread()));
    }

    /// 关闭启动窗口
    ///
    /// `effect` 为空时立即隐藏并释放；否则播放对应动效后释放。
    /// 从其它线程调用时异步执行，返回时关闭尚未完成。
    pub fn close(&self, effect: &str) {
        let inner = Arc::clone(&self.inner);
        let effect = effect.to_owned();
        self.inner
            .dispatcher
            .run_detached(Box::new(move || Inner::close_on_ui_thread(&inner, &effect)));
    }

    /// 当前是否有启动窗口（含关闭动画进行中）
    pub fn is_shown(&self) -> bool {
        self.inner.lock_state().is_shown()
    }

    pub fn window_system(&self) -> &S {
        &self.inner.system
    }
}

impl<S: WindowSystem> Inner<S> {
    fn lock_state(&self) -> MutexGuard<'_, SplashWindowState<S::Window>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_provider(&self) -> MutexGuard<'_, Option<Arc<dyn ConfigurationProvider>>> {
        self.provider.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn show_on_ui_thread(&self) {
        {
            let mut state = self.lock_state();
            state.settle_stale_dismissal(Instant::now());
            if state.is_shown() {
                log::debug!("NativeSplash: splash already shown, ignoring show()");
                return;
            }
            if state.building {
                log::debug!("NativeSplash: splash is being built, ignoring nested show()");
                return;
            }
            state.building = true;
        }

        let result = self.build_window();

        let mut state = self.lock_state();
        state.building = false;
        match result {
            Ok(window) => {
                state.window = Some(window);
                state.dismissal = None;
                log::info!("NativeSplash: splash window shown");
            }
            Err(SplashError::InvalidDimensions { width, height }) => {
                log::warn!(
                    "NativeSplash: invalid window dimensions {}x{} (<= 0), splash not shown",
                    width,
                    height
                );
            }
            Err(err) => log::error!("NativeSplash: {}", err),
        }
    }

    /// 校验配置、创建窗口、放置图片并显示
    fn build_window(&self) -> Result<S::Window, SplashError> {
        let provider = self
            .lock_provider()
            .clone()
            .ok_or(SplashError::Configuration)?;
        let config = provider.splash_config();

        let size = config
            .window_size()
            .ok_or(SplashError::InvalidDimensions {
                width: config.window_width,
                height: config.window_height,
            })?;

        let origin = match self.system.main_screen_visible_frame() {
            Some(screen) => center_in(size, screen),
            None => {
                log::warn!("NativeSplash: main screen unavailable, placing splash at origin");
                Point::default()
            }
        };

        let frame = Rect::new(origin, size);
        let mut window = self.system.create_window(&WindowSpec {
            frame,
            title: config.window_title.clone(),
        })?;

        match resolve_image(&config, self.bundle.as_ref()) {
            Some(resolved) => {
                let rect = centered_rect(resolved.image.size, Rect::from_size(size));
                if let Err(err) = window.set_image(&resolved.image, rect) {
                    log::warn!("NativeSplash: unable to attach image ({}), window will be blank", err);
                }
            }
            None => {
                log::warn!("NativeSplash: failed to load image resources, window will be blank");
            }
        }

        if config.with_animation {
            window.set_alpha(0.0);
            window.order_front();
            window.animate(Transition {
                alpha: 1.0,
                frame,
                duration: ANIMATION_DURATION,
            });
        } else {
            window.set_alpha(1.0);
            window.order_front();
        }

        Ok(window)
    }

    fn close_on_ui_thread(this: &Arc<Self>, effect: &str) {
        let mut state = this.lock_state();
        state.settle_stale_dismissal(Instant::now());
        if state.dismissal.is_some() {
            log::debug!("NativeSplash: dismissal already in progress, ignoring close()");
            return;
        }
        if !state.is_shown() {
            log::debug!("NativeSplash: splash not shown, ignoring close()");
            return;
        }

        let Some(effect) = DismissEffect::parse(effect) else {
            state.release();
            return;
        };

        let Some(window) = state.window.as_mut() else {
            return;
        };
        let frame = window.frame();
        window.animate(Transition {
            alpha: 0.0,
            frame: effect.target_frame(frame),
            duration: ANIMATION_DURATION,
        });
        let id = state.next_dismissal;
        state.next_dismissal += 1;
        state.dismissal = Some(Dismissal {
            id,
            started: Instant::now(),
        });
        drop(state);

        log::debug!("NativeSplash: dismissing splash with {}", effect.as_str());
        let inner = Arc::clone(this);
        this.dispatcher
            .dispatch_after(ANIMATION_DURATION, Box::new(move || inner.finish_dismissal(id)));
    }

    fn finish_dismissal(&self, id: u64) {
        let mut state = self.lock_state();
        if state.dismissal.map(|dismissal| dismissal.id) == Some(id) {
            state.release();
        } else {
            log::debug!("NativeSplash: dismissal {} already settled", id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SplashConfig;
    use crate::dispatch::{QueueDispatcher, UiTask};
    use crate::geometry::Size;
    use crate::image_source::MemoryBundle;
    use crate::platform::headless::HeadlessWindowSystem;
    use std::sync::mpsc;
    use std::thread;

    /// 丢弃所有延迟任务，模拟事件循环退出后收尾任务丢失
    #[derive(Default)]
    struct DroppingDispatcher {
        queue: QueueDispatcher,
    }

    impl UiDispatcher for DroppingDispatcher {
        fn is_ui_thread(&self) -> bool {
            self.queue.is_ui_thread()
        }

        fn dispatch(&self, task: UiTask) {
            self.queue.dispatch(task);
        }

        fn dispatch_after(&self, _delay: Duration, _task: UiTask) {}
    }

    fn screen() -> Rect {
        Rect::new(Point::new(0.0, 0.0), Size::new(1920.0, 1080.0))
    }

    fn presenter() -> (SplashPresenter<HeadlessWindowSystem>, Arc<QueueDispatcher>) {
        let dispatcher = Arc::new(QueueDispatcher::new());
        let presenter = SplashPresenter::new(
            HeadlessWindowSystem::new(Some(screen())),
            dispatcher.clone(),
            Arc::new(MemoryBundle::new()),
        );
        (presenter, dispatcher)
    }

    fn config() -> SplashConfig {
        SplashConfig {
            window_width: 300,
            window_height: 200,
            window_title: "Splash".to_string(),
            ..Default::default()
        }
    }

    fn after_animation() -> Instant {
        Instant::now() + ANIMATION_DURATION + Duration::from_millis(50)
    }

    #[test]
    fn test_show_without_provider_is_noop() {
        let (presenter, _) = presenter();
        presenter.show();

        assert!(!presenter.is_shown());
        assert!(presenter.window_system().windows().is_empty());
    }

    #[test]
    fn test_show_with_invalid_dimensions_is_noop() {
        let (presenter, _) = presenter();
        presenter.set_configuration_provider(SplashConfig {
            window_width: 0,
            ..config()
        });
        presenter.show();

        assert!(!presenter.is_shown());
        assert!(presenter.window_system().windows().is_empty());
    }

    #[test]
    fn test_show_centers_window_on_screen() {
        let (presenter, _) = presenter();
        presenter.set_configuration_provider(config());
        presenter.show();

        let windows = presenter.window_system().live_windows();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].frame.origin, Point::new(810.0, 440.0));
        assert_eq!(windows[0].frame.size, Size::new(300.0, 200.0));
        assert_eq!(windows[0].title, "Splash");
        assert!(windows[0].visible);
        assert_eq!(windows[0].alpha, 1.0);
        assert!(windows[0].transitions.is_empty());
    }

    #[test]
    fn test_show_without_screen_uses_origin() {
        let dispatcher = Arc::new(QueueDispatcher::new());
        let presenter = SplashPresenter::new(
            HeadlessWindowSystem::new(None),
            dispatcher,
            Arc::new(MemoryBundle::new()),
        );
        presenter.set_configuration_provider(config());
        presenter.show();

        let windows = presenter.window_system().live_windows();
        assert_eq!(windows[0].frame.origin, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_show_with_animation_fades_in() {
        let (presenter, _) = presenter();
        presenter.set_configuration_provider(SplashConfig {
            with_animation: true,
            ..config()
        });
        presenter.show();

        let window = &presenter.window_system().live_windows()[0];
        assert_eq!(window.transitions.len(), 1);
        assert_eq!(window.transitions[0].alpha, 1.0);
        assert_eq!(window.transitions[0].duration, ANIMATION_DURATION);
        assert_eq!(window.transitions[0].frame, window.frame);
    }

    #[test]
    fn test_window_creation_failure_keeps_hidden() {
        let (presenter, _) = presenter();
        presenter.set_configuration_provider(config());
        presenter.window_system().set_fail_creation(true);
        presenter.show();
        assert!(!presenter.is_shown());

        presenter.window_system().set_fail_creation(false);
        presenter.show();
        assert!(presenter.is_shown());
    }

    #[test]
    fn test_close_fade_releases_after_animation() {
        let (presenter, dispatcher) = presenter();
        presenter.set_configuration_provider(config());
        presenter.show();

        presenter.close("fade");
        assert!(presenter.is_shown(), "still shown while animating");
        let window = &presenter.window_system().windows()[0];
        assert_eq!(window.transitions.last().map(|t| t.alpha), Some(0.0));

        dispatcher.pump_at(after_animation());
        assert!(!presenter.is_shown());
        assert!(presenter.window_system().live_windows().is_empty());
    }

    #[test]
    fn test_close_during_dismissal_is_ignored() {
        let (presenter, dispatcher) = presenter();
        presenter.set_configuration_provider(config());
        presenter.show();

        presenter.close("slide_up_fade");
        presenter.close("");
        assert!(presenter.is_shown());
        assert_eq!(presenter.window_system().windows()[0].transitions.len(), 1);

        dispatcher.pump_at(after_animation());
        assert!(!presenter.is_shown());
    }

    #[test]
    fn test_close_whitespace_effect_fades() {
        let (presenter, dispatcher) = presenter();
        presenter.set_configuration_provider(config());
        presenter.show();

        presenter.close(" ");
        assert!(presenter.is_shown(), "whitespace is not the empty effect");
        let window = &presenter.window_system().windows()[0];
        assert_eq!(window.transitions.len(), 1);
        assert_eq!(window.transitions[0].alpha, 0.0);
        assert_eq!(window.transitions[0].frame, window.frame);

        dispatcher.pump_at(after_animation());
        assert!(!presenter.is_shown());
    }

    #[test]
    fn test_provider_may_call_back_into_presenter() {
        let (done_tx, done_rx) = mpsc::channel();

        // 独立的 UI 线程：一旦死锁，主测试线程靠超时发现而不是一起卡住
        thread::spawn(move || {
            let (presenter, _) = presenter();
            let seen = Arc::new(Mutex::new(Vec::new()));

            let handle = presenter.clone();
            let record = Arc::clone(&seen);
            presenter.set_configuration_provider(move || {
                record.lock().unwrap().push(handle.is_shown());
                handle.close("fade");
                handle.show();
                config()
            });

            presenter.show();
            let shown = presenter.is_shown();
            let windows = presenter.window_system().windows().len();
            presenter.clear_configuration_provider();

            let seen = seen.lock().unwrap().clone();
            let _ = done_tx.send((shown, windows, seen));
        });

        let (shown, windows, seen) = done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("show() returns while the provider queries the presenter");
        assert!(shown);
        assert_eq!(windows, 1);
        assert_eq!(seen, vec![false]);
    }

    #[test]
    fn test_lost_completion_is_settled_by_next_call() {
        let dispatcher = Arc::new(DroppingDispatcher::default());
        let presenter = SplashPresenter::new(
            HeadlessWindowSystem::new(Some(screen())),
            dispatcher,
            Arc::new(MemoryBundle::new()),
        );
        presenter.set_configuration_provider(config());
        presenter.show();
        presenter.close("fade");

        presenter.show();
        assert_eq!(presenter.window_system().windows().len(), 1, "still dismissing");

        thread::sleep(STALE_DISMISSAL + Duration::from_millis(50));
        presenter.show();

        let windows = presenter.window_system().windows();
        assert_eq!(windows.len(), 2);
        assert!(windows[0].released);
        assert!(presenter.is_shown());
    }

    #[test]
    fn test_late_completion_leaves_newer_window_alone() {
        let (presenter, dispatcher) = presenter();
        presenter.set_configuration_provider(config());
        presenter.show();
        presenter.close("fade");

        thread::sleep(STALE_DISMISSAL + Duration::from_millis(50));
        presenter.show();
        presenter.close("fade");

        // 第一次关闭的收尾任务早已到期，第二次的还没有
        assert_eq!(dispatcher.pump_at(Instant::now()), 1);
        assert!(presenter.is_shown());

        dispatcher.pump_at(after_animation());
        assert!(!presenter.is_shown());
        assert!(presenter.window_system().live_windows().is_empty());
    }

    #[test]
    fn test_provider_replaced_between_shows() {
        let (presenter, _) = presenter();
        presenter.set_configuration_provider(config());
        presenter.show();
        presenter.close("");

        presenter.set_configuration_provider(SplashConfig {
            window_width: 400,
            window_height: 100,
            ..Default::default()
        });
        presenter.show();

        let windows = presenter.window_system().live_windows();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].frame.size, Size::new(400.0, 100.0));

        presenter.close("");
        presenter.clear_configuration_provider();
        presenter.show();
        assert!(!presenter.is_shown());
    }
}
