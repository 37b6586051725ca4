//! Coordinator - single owner of the buffering/live state
//!
//! 所有事件经由 mpsc 通道进入协调任务，追加、回放与状态切换都在同一任务内完成，
//! 因此无需加锁即可保证顺序与 exactly-once。

use std::sync::Arc;

use contracts::EventRecord;
use integration_registry::IntegrationRegistry;
use observability::metrics::{
    record_event_buffered, record_event_live, record_events_discarded, record_events_replayed,
};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::fanout::fan_out;
use crate::handle::{Phase, Shared};
use crate::queue::PendingQueue;

/// 发往协调任务的消息
#[derive(Debug)]
pub(crate) enum Command {
    Event(EventRecord),
    /// Bootstrap 完成，携带最终的注册表
    Activated(Arc<IntegrationRegistry>),
    Flush(oneshot::Sender<()>),
}

/// 分发状态：Buffering 只能切换到 Live 一次
#[derive(Debug)]
enum DispatchState {
    Buffering(PendingQueue),
    Live(Arc<IntegrationRegistry>),
}

pub(crate) struct Coordinator {
    rx: mpsc::UnboundedReceiver<Command>,
    state: DispatchState,
    shared: Arc<Shared>,
    cancel: CancellationToken,
}

impl Coordinator {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<Command>,
        shared: Arc<Shared>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            rx,
            state: DispatchState::Buffering(PendingQueue::new()),
            shared,
            cancel,
        }
    }

    /// 主循环，收到取消信号或所有发送端关闭后退出
    #[instrument(name = "dispatcher_coordinator", skip(self))]
    pub(crate) async fn run(mut self) {
        debug!("coordinator started");

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                command = self.rx.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
            }
        }

        // 停止接收新消息，但处理完已入队的消息
        self.rx.close();
        while let Ok(command) = self.rx.try_recv() {
            self.handle(command);
        }

        if let DispatchState::Buffering(queue) = &self.state {
            if !queue.is_empty() {
                let count = queue.len();
                warn!(discarded = count, "shutting down before activation, buffered events discarded");
                self.shared.stats.add_discarded(count as u64);
                record_events_discarded(count);
            }
        }

        self.shared.phase.send_replace(Phase::Stopped);
        info!(stats = ?self.shared.stats.snapshot(), "coordinator stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Event(event) => self.on_event(event),
            Command::Activated(registry) => self.on_activated(registry),
            Command::Flush(done) => {
                // 接收方可能已放弃等待
                let _ = done.send(());
            }
        }
    }

    fn on_event(&mut self, event: EventRecord) {
        match &mut self.state {
            DispatchState::Buffering(queue) => {
                let pending = queue.push(event);
                self.shared.stats.inc_buffered();
                record_event_buffered(pending);
            }
            DispatchState::Live(registry) => {
                fan_out(registry, &event, &self.shared.stats);
                self.shared.stats.inc_live();
                record_event_live();
            }
        }
    }

    /// Buffering -> Live：先发布注册表供生命周期通知使用，再按 FIFO 回放
    #[instrument(name = "dispatcher_activate", skip(self, registry), fields(backends = registry.len()))]
    fn on_activated(&mut self, registry: Arc<IntegrationRegistry>) {
        let previous = std::mem::replace(&mut self.state, DispatchState::Live(Arc::clone(&registry)));
        let queue = match previous {
            DispatchState::Buffering(queue) => queue,
            DispatchState::Live(current) => {
                warn!("activation already completed, ignoring duplicate");
                self.state = DispatchState::Live(current);
                return;
            }
        };

        // 生命周期通知与事件无顺序约束，回放期间即可转发。
        // 只有 coordinator 写入，set 不会失败
        let _ = self.shared.registry.set(Arc::clone(&registry));

        let count = queue.len();
        if registry.is_empty() {
            if count > 0 {
                warn!(discarded = count, "no backend activated, buffered events discarded");
                self.shared.stats.add_discarded(count as u64);
                record_events_discarded(count);
            }
        } else {
            for event in queue.drain() {
                fan_out(&registry, &event, &self.shared.stats);
            }
            self.shared.stats.add_replayed(count as u64);
            record_events_replayed(count);
        }

        self.shared.phase.send_replace(Phase::Live);
        info!(replayed = count, "dispatcher live");
    }
}
