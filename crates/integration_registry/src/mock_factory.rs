//! Mock backend factory
//!
//! 用于单元测试与端到端测试的 mock 实现，支持注入构造失败与分发失败。

use std::sync::{Arc, Mutex};

use contracts::{
    AliasPayload, BackendId, BackendSettings, ContractError, EventRecord, GroupPayload,
    IdentifyPayload, Integration, LifecycleContext, LifecycleKind, ScreenPayload, TrackPayload,
};

use crate::factory::BackendFactory;

/// 单次投递记录
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Event(EventRecord),
    Lifecycle {
        kind: LifecycleKind,
        component: String,
    },
}

/// 所有 mock backend 共享的投递日志
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Arc<Mutex<Vec<(BackendId, Delivery)>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, id: BackendId, delivery: Delivery) {
        self.log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, delivery));
    }

    /// 全部投递记录（按发生顺序）
    pub fn all(&self) -> Vec<(BackendId, Delivery)> {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// 某个 backend 收到的事件（按发生顺序）
    pub fn events_for(&self, id: BackendId) -> Vec<EventRecord> {
        self.all()
            .into_iter()
            .filter_map(|(backend, delivery)| match delivery {
                Delivery::Event(event) if backend == id => Some(event),
                _ => None,
            })
            .collect()
    }

    /// 某个 backend 收到的生命周期通知
    pub fn lifecycle_for(&self, id: BackendId) -> Vec<LifecycleKind> {
        self.all()
            .into_iter()
            .filter_map(|(backend, delivery)| match delivery {
                Delivery::Lifecycle { kind, .. } if backend == id => Some(kind),
                _ => None,
            })
            .collect()
    }
}

/// Mock 工厂配置
#[derive(Debug, Default, Clone)]
pub struct MockConfig {
    /// 构造时失败的 backend
    pub fail_construct: Vec<BackendId>,
    /// 每次分发都返回错误的 backend
    pub fail_dispatch: Vec<BackendId>,
    /// 每次分发都 panic 的 backend
    pub panic_dispatch: Vec<BackendId>,
}

/// Mock backend 工厂
#[derive(Debug, Clone)]
pub struct MockBackendFactory {
    recorder: Recorder,
    config: MockConfig,
}

impl MockBackendFactory {
    pub fn new(recorder: Recorder) -> Self {
        Self::with_config(recorder, MockConfig::default())
    }

    pub fn with_config(recorder: Recorder, config: MockConfig) -> Self {
        Self { recorder, config }
    }
}

impl BackendFactory for MockBackendFactory {
    fn construct(
        &self,
        id: BackendId,
        settings: &BackendSettings,
    ) -> Result<Box<dyn Integration>, ContractError> {
        if self.config.fail_construct.contains(&id) {
            return Err(ContractError::config(id, "mock construction failure"));
        }
        settings.as_object(id)?;

        let mode = if self.config.panic_dispatch.contains(&id) {
            Mode::Panic
        } else if self.config.fail_dispatch.contains(&id) {
            Mode::Fail
        } else {
            Mode::Record
        };

        Ok(Box::new(RecordingIntegration {
            id,
            mode,
            recorder: self.recorder.clone(),
        }))
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Record,
    Fail,
    Panic,
}

/// 记录所有投递的 mock backend
struct RecordingIntegration {
    id: BackendId,
    mode: Mode,
    recorder: Recorder,
}

impl RecordingIntegration {
    fn handle(&self, delivery: Delivery) -> Result<(), ContractError> {
        match self.mode {
            Mode::Record => {
                self.recorder.push(self.id, delivery);
                Ok(())
            }
            Mode::Fail => Err(ContractError::Other("mock dispatch failure".into())),
            Mode::Panic => panic!("mock backend {} panicked", self.id),
        }
    }

    fn event(&self, event: EventRecord) -> Result<(), ContractError> {
        self.handle(Delivery::Event(event))
    }
}

impl Integration for RecordingIntegration {
    fn id(&self) -> BackendId {
        self.id
    }

    fn on_lifecycle(
        &self,
        kind: LifecycleKind,
        context: &LifecycleContext<'_>,
    ) -> Result<(), ContractError> {
        self.handle(Delivery::Lifecycle {
            kind,
            component: context.component.to_string(),
        })
    }

    fn on_identify(&self, payload: &IdentifyPayload) -> Result<(), ContractError> {
        self.event(EventRecord::Identify(payload.clone()))
    }

    fn on_group(&self, payload: &GroupPayload) -> Result<(), ContractError> {
        self.event(EventRecord::Group(payload.clone()))
    }

    fn on_track(&self, payload: &TrackPayload) -> Result<(), ContractError> {
        self.event(EventRecord::Track(payload.clone()))
    }

    fn on_alias(&self, payload: &AliasPayload) -> Result<(), ContractError> {
        self.event(EventRecord::Alias(payload.clone()))
    }

    fn on_screen(&self, payload: &ScreenPayload) -> Result<(), ContractError> {
        self.event(EventRecord::Screen(payload.clone()))
    }
}
