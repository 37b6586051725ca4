//! 采集器指标记录模块
//!
//! 通过 `metrics` facade 记录 bootstrap 与分发过程的运行指标。
//! 未安装 recorder 时所有调用均为空操作。

use contracts::{BackendId, LifecycleKind};
use metrics::{counter, gauge};

/// 记录 settings 拉取尝试
pub fn record_settings_fetch(success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "analytics_settings_fetch_attempts_total",
        "status" => status
    )
    .increment(1);
}

/// 记录激活完成后的 backend 数量
pub fn record_backends_activated(count: usize) {
    gauge!("analytics_backends_activated").set(count as f64);
}

/// 记录 backend 构造失败
pub fn record_activation_failure(backend: BackendId) {
    counter!(
        "analytics_backend_activation_failures_total",
        "backend" => backend.settings_key()
    )
    .increment(1);
}

/// 记录进入 pending 队列的事件
pub fn record_event_buffered(pending: usize) {
    counter!("analytics_events_buffered_total").increment(1);
    gauge!("analytics_events_pending").set(pending as f64);
}

/// 记录一次 replay 的事件数
pub fn record_events_replayed(count: usize) {
    counter!("analytics_events_replayed_total").increment(count as u64);
    gauge!("analytics_events_pending").set(0.0);
}

/// 记录激活后直接分发的事件
pub fn record_event_live() {
    counter!("analytics_events_live_total").increment(1);
}

/// 记录单个 backend 的投递结果
pub fn record_backend_delivery(backend: BackendId, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "analytics_backend_deliveries_total",
        "backend" => backend.settings_key(),
        "status" => status
    )
    .increment(1);
}

/// 记录转发的生命周期通知
pub fn record_lifecycle_forwarded(kind: LifecycleKind) {
    counter!(
        "analytics_lifecycle_forwarded_total",
        "kind" => kind.as_str()
    )
    .increment(1);
}

/// 记录关闭时被丢弃的 pending 事件
pub fn record_events_discarded(count: usize) {
    counter!("analytics_events_discarded_total").increment(count as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_settings_fetch(false);
        record_backends_activated(2);
        record_activation_failure(BackendId::Amplitude);
        record_event_buffered(3);
        record_events_replayed(3);
        record_event_live();
        record_backend_delivery(BackendId::Mixpanel, true);
        record_lifecycle_forwarded(LifecycleKind::Resumed);
        record_events_discarded(1);
    }
}
