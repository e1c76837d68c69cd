//! UI 线程调度模块
//!
//! 启动画面的所有窗口操作都必须在宿主唯一的 UI 线程上执行。
//! 本模块把"切到 UI 线程执行"显式化为一个调度原语，提供两种调用模式：
//!
//! - `run_blocking`：同步投递，调用方阻塞直到任务执行完（`show()` 使用）
//! - `run_detached`：异步投递，即发即忘（`close()` 使用）
//!
//! 两种模式在调用方已经位于 UI 线程时都直接内联执行。
//!
//! # 设计思路
//!
//! - 平台差异下沉：`UiDispatcher` 只要求实现"是否在 UI 线程""投递""延迟投递"三件事，
//!   阻塞与非阻塞两种模式由 trait 的默认方法统一实现。
//! - `QueueDispatcher` 是一个由宿主自行泵送的 UI 队列，
//!   适用于自带事件循环的宿主，也让测试可以精确控制任务执行时机。
//!
//! # 实现思路
//!
//! - 阻塞模式：任务包装后投递，调用方在 `mpsc` 通道上等待完成信号；
//!   如果任务在执行前被丢弃（例如事件循环已退出），通道断开，调用方不会永久阻塞。
//! - `QueueDispatcher` 延迟任务按 (到期时间, 序号) 排序，保证同一时刻投递的任务按顺序执行。

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Mutex, PoisonError};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

/// 投递到 UI 线程的任务
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// UI 线程调度器
pub trait UiDispatcher: Send + Sync {
    /// 当前线程是否为 UI 线程
    fn is_ui_thread(&self) -> bool;

    /// 异步投递任务到 UI 线程
    fn dispatch(&self, task: UiTask);

    /// 延迟 `delay` 后在 UI 线程执行任务
    fn dispatch_after(&self, delay: Duration, task: UiTask);

    /// 在 UI 线程执行任务并等待其完成
    fn run_blocking(&self, task: UiTask) {
        if self.is_ui_thread() {
            task();
            return;
        }

        let (done_tx, done_rx) = mpsc::channel::<()>();
        self.dispatch(Box::new(move || {
            task();
            let _ = done_tx.send(());
        }));

        if done_rx.recv().is_err() {
            log::warn!("NativeSplash: UI task was dropped before it could run");
        }
    }

    /// 在 UI 线程执行任务，不等待
    fn run_detached(&self, task: UiTask) {
        if self.is_ui_thread() {
            task();
        } else {
            self.dispatch(task);
        }
    }
}

struct DelayedTask {
    due: Instant,
    seq: u64,
    task: UiTask,
}

#[derive(Default)]
struct QueueState {
    ready: VecDeque<UiTask>,
    delayed: Vec<DelayedTask>,
    next_seq: u64,
}

/// 由宿主泵送的 UI 任务队列
///
/// 创建它的线程即 UI 线程；宿主需在该线程上周期性调用 [`QueueDispatcher::pump`]。
pub struct QueueDispatcher {
    ui_thread: ThreadId,
    state: Mutex<QueueState>,
}

impl QueueDispatcher {
    /// 以当前线程为 UI 线程创建队列
    pub fn new() -> Self {
        Self::for_thread(thread::current().id())
    }

    /// 以指定线程为 UI 线程创建队列
    pub fn for_thread(ui_thread: ThreadId) -> Self {
        Self {
            ui_thread,
            state: Mutex::new(QueueState::default()),
        }
    }

    /// 执行所有就绪任务与已到期的延迟任务，返回执行数量
    pub fn pump(&self) -> usize {
        self.pump_at(Instant::now())
    }

    /// 以 `now` 作为当前时间泵送队列
    ///
    /// 任务执行期间不持有锁，任务可以继续投递新任务；
    /// 新投递的就绪任务会在本轮一并执行。
    pub fn pump_at(&self, now: Instant) -> usize {
        let mut executed = 0;
        while let Some(task) = self.next_task(now) {
            task();
            executed += 1;
        }
        executed
    }

    /// 尚未执行的任务数（含未到期的延迟任务）
    pub fn pending(&self) -> usize {
        let state = self.lock();
        state.ready.len() + state.delayed.len()
    }

    fn next_task(&self, now: Instant) -> Option<UiTask> {
        let mut state = self.lock();
        if let Some(task) = state.ready.pop_front() {
            return Some(task);
        }

        let index = state
            .delayed
            .iter()
            .enumerate()
            .filter(|(_, delayed)| delayed.due <= now)
            .min_by_key(|(_, delayed)| (delayed.due, delayed.seq))
            .map(|(index, _)| index)?;
        Some(state.delayed.swap_remove(index).task)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for QueueDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl UiDispatcher for QueueDispatcher {
    fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    fn dispatch(&self, task: UiTask) {
        self.lock().ready.push_back(task);
    }

    fn dispatch_after(&self, delay: Duration, task: UiTask) {
        let mut state = self.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.delayed.push(DelayedTask {
            due: Instant::now() + delay,
            seq,
            task,
        });
    }
}
