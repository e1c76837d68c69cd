//! Tauri 插件接入模块
//!
//! # 设计思路
//!
//! 宿主是 Tauri 应用：插件在 `setup` 阶段组装好展示器并注册为托管状态，
//! 宿主随后通过 `app.native_splash()` 调用 `show()` / `close()`。
//!
//! - UI 线程即 Tauri 主线程：`setup` 在主线程执行，此时记录线程 ID。
//! - 投递使用 `AppHandle::run_on_main_thread`；
//!   延迟投递在 Tauri 的异步运行时中 `tokio::time::sleep` 后再投递。
//! - 资源包指向应用资源目录（macOS 上为 `Contents/Resources`）。
//! - `tauri.conf.json` 的 `plugins.native-splash` 可直接提供初始配置。
//!
//! # 示例
//! ```ignore
//! use tauri_plugin_native_splash::{NativeSplashExt, SplashConfig};
//!
//! tauri::Builder::default()
//!     .plugin(tauri_plugin_native_splash::init())
//!     .setup(|app| {
//!         app.native_splash().set_configuration(SplashConfig {
//!             window_width: 300,
//!             window_height: 200,
//!             image_resource_name: "logo".into(),
//!             image_resource_extension: "png".into(),
//!             ..Default::default()
//!         });
//!         app.native_splash().show();
//!         Ok(())
//!     })
//!     .run(tauri::generate_context!())?;
//! ```

use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

use tauri::plugin::{Builder, TauriPlugin};
use tauri::{AppHandle, Manager, Runtime};

use crate::config::{ConfigurationProvider, SplashConfig};
use crate::dispatch::{UiDispatcher, UiTask};
use crate::image_source::{AssetBundle, DirectoryBundle, MemoryBundle};
use crate::platform::{native_window_system, NativeWindowSystem};
use crate::presenter::SplashPresenter;

/// 插件名，对应 `tauri.conf.json` 中的 `plugins.native-splash`
pub const PLUGIN_NAME: &str = "native-splash";

/// 基于 Tauri 主线程的调度器
pub struct TauriDispatcher<R: Runtime> {
    handle: AppHandle<R>,
    ui_thread: ThreadId,
}

impl<R: Runtime> TauriDispatcher<R> {
    /// 必须在主线程上创建
    pub fn new(handle: AppHandle<R>) -> Self {
        Self {
            handle,
            ui_thread: thread::current().id(),
        }
    }
}

impl<R: Runtime> UiDispatcher for TauriDispatcher<R> {
    fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    fn dispatch(&self, task: UiTask) {
        if let Err(err) = self.handle.run_on_main_thread(task) {
            log::error!("NativeSplash: failed to dispatch to main thread: {}", err);
        }
    }

    fn dispatch_after(&self, delay: Duration, task: UiTask) {
        let handle = self.handle.clone();
        tauri::async_runtime::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = handle.run_on_main_thread(task) {
                // 收尾任务丢失时，展示器会在下一次 show()/close() 中自行收尾
                log::error!("NativeSplash: failed to dispatch delayed task to main thread: {}", err);
            }
        });
    }
}

/// 托管状态：应用内唯一的启动画面
pub struct NativeSplash {
    presenter: SplashPresenter<NativeWindowSystem>,
}

impl NativeSplash {
    fn new<R: Runtime>(app: &AppHandle<R>) -> Self {
        let bundle: Arc<dyn AssetBundle> = match app.path().resource_dir() {
            Ok(dir) => {
                let bundle = DirectoryBundle::new(dir);
                log::debug!("NativeSplash: resource directory {}", bundle.root().display());
                Arc::new(bundle)
            }
            Err(err) => {
                log::warn!(
                    "NativeSplash: resource directory unavailable ({}), bundled images disabled",
                    err
                );
                Arc::new(MemoryBundle::new())
            }
        };

        let dispatcher: Arc<dyn UiDispatcher> = Arc::new(TauriDispatcher::new(app.clone()));
        Self {
            presenter: SplashPresenter::new(native_window_system(), dispatcher, bundle),
        }
    }

    /// 注册或替换配置提供者
    pub fn set_configuration(&self, provider: impl ConfigurationProvider + 'static) {
        self.presenter.set_configuration_provider(provider);
    }

    pub fn show(&self) {
        self.presenter.show();
    }

    /// `effect`：`""` / `fade` / `slide_up_fade` / `slide_down_fade`
    pub fn close(&self, effect: &str) {
        self.presenter.close(effect);
    }

    pub fn is_shown(&self) -> bool {
        self.presenter.is_shown()
    }
}

/// 在任意 `Manager` 上访问启动画面
pub trait NativeSplashExt<R: Runtime> {
    fn native_splash(&self) -> &NativeSplash;
}

impl<R: Runtime, T: Manager<R>> NativeSplashExt<R> for T {
    fn native_splash(&self) -> &NativeSplash {
        self.state::<NativeSplash>().inner()
    }
}

/// 构建插件
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<SplashConfig>> {
    Builder::<R, Option<SplashConfig>>::new(PLUGIN_NAME)
        .setup(|app, api| {
            let splash = NativeSplash::new(app);
            if let Some(config) = api.config().clone() {
                log::debug!("NativeSplash: using configuration from tauri.conf.json");
                splash.set_configuration(config);
            }
            app.manage(splash);
            Ok(())
        })
        .build()
}
