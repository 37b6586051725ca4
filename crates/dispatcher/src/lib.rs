//! # Dispatcher
//!
//! 事件分发模块。
//!
//! 负责：
//! - 激活完成前缓存事件（Buffering）
//! - 激活完成后按 FIFO 回放，之后直接 fan-out（Live）
//! - 隔离失败的 backend，不影响其他 backend
//! - 生命周期通知不缓存，直接在调用线程转发

mod bootstrap;
mod coordinator;
pub mod dispatcher;
pub mod error;
mod fanout;
pub mod handle;
pub mod metrics;
pub mod queue;

pub use contracts::{EventRecord, LifecycleContext, LifecycleKind};
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::DispatcherError;
pub use handle::{DispatcherHandle, Phase};
pub use metrics::{DispatcherStats, StatsSnapshot};
pub use queue::PendingQueue;
