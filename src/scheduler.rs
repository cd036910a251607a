//! 一次性定时器调度。
//!
//! [`TokioScheduler`] 在 tokio 运行时上计时；[`ManualScheduler`] 使用虚拟时钟，
//! 由宿主（UI 事件循环或测试）显式推进。

use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::PlayerError;

/// 定时器到期后执行的任务
pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    /// 在 `delay` 之后执行一次 `task`
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle;
}

/// 已调度定时器的句柄
#[derive(Debug, Clone)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// 取消定时器，可重复调用
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

impl TokioScheduler {
    /// 绑定到当前 tokio 运行时
    pub fn current() -> Result<Self, PlayerError> {
        Ok(Self {
            handle: tokio::runtime::Handle::try_current()?,
        })
    }

    pub fn with_handle(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let timer = TimerHandle::new();
        let token = timer.token.clone();

        self.handle.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => task(),
            }
        });

        timer
    }
}

struct PendingTask {
    due: Duration,
    seq: u64,
    token: CancellationToken,
    task: Task,
}

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingTask>,
}

/// 手动推进的虚拟时钟调度器
#[derive(Default)]
pub struct ManualScheduler {
    clock: Mutex<ManualClock>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前虚拟时间
    pub fn now(&self) -> Duration {
        self.clock.lock().now
    }

    /// 尚未到期且未取消的定时器数量
    pub fn pending(&self) -> usize {
        self.clock
            .lock()
            .pending
            .iter()
            .filter(|p| !p.token.is_cancelled())
            .count()
    }

    /// 推进虚拟时间，按到期顺序执行到期的任务
    pub fn advance(&self, by: Duration) {
        let mut due = {
            let mut clock = self.clock.lock();
            clock.now += by;
            let now = clock.now;
            let (ready, waiting): (Vec<_>, Vec<_>) =
                clock.pending.drain(..).partition(|p| p.due <= now);
            clock.pending = waiting;
            ready
        };
        due.sort_by_key(|p| (p.due, p.seq));

        // 任务在锁外执行，任务内可以再次调度
        for pending in due {
            if !pending.token.is_cancelled() {
                (pending.task)();
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let timer = TimerHandle::new();
        let mut clock = self.clock.lock();
        let seq = clock.next_seq;
        clock.next_seq += 1;
        let due = clock.now + delay;
        clock.pending.push(PendingTask {
            due,
            seq,
            token: timer.token.clone(),
            task,
        });
        timer
    }
}
