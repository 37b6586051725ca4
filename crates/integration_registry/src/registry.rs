//! IntegrationRegistry 核心实现
//!
//! 根据 AvailableBackends 与 ProjectSettings 构造已激活的 backend 集合。
//! 集合一旦构造完成即不可变，可被任意线程无锁读取。

use contracts::{AvailableBackends, BackendId, ProjectSettings};
use observability::metrics::{record_activation_failure, record_backends_activated};
use tracing::{debug, error, info, instrument};

use crate::backend::ActivatedBackend;
use crate::factory::BackendFactory;

/// 单个 backend 的激活结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// 已构造并加入注册表
    Activated,
    /// 未链接进当前二进制
    NotLinked,
    /// 当前项目未启用
    NotEnabled,
    /// 构造失败（已记录日志并跳过）
    Failed(String),
}

/// Integration Registry
///
/// 持有所有已激活的 backend，生命周期与进程一致。
#[derive(Debug, Default)]
pub struct IntegrationRegistry {
    backends: Vec<ActivatedBackend>,
    report: Vec<(BackendId, ActivationOutcome)>,
}

impl IntegrationRegistry {
    /// 空注册表（零 backend 降级）
    pub fn empty() -> Self {
        Self::default()
    }

    /// 激活既可用又已配置的 backend
    ///
    /// # 部分激活
    /// 单个 backend 构造失败只会跳过该 backend，其余照常激活。
    #[instrument(
        name = "integration_registry_activate",
        skip(available, settings, factory),
        fields(available = available.len(), enabled = settings.enabled().len())
    )]
    pub fn activate(
        available: &AvailableBackends,
        settings: &ProjectSettings,
        factory: &dyn BackendFactory,
    ) -> Self {
        let mut registry = Self::empty();

        for id in BackendId::ALL {
            let outcome = registry.activate_one(id, available, settings, factory);
            registry.report.push((id, outcome));
        }

        record_backends_activated(registry.backends.len());
        info!(
            activated = registry.backends.len(),
            backends = ?registry.ids(),
            "integration activation completed"
        );
        registry
    }

    #[instrument(
        name = "integration_registry_activate_one",
        skip(self, available, settings, factory),
        fields(backend = %id)
    )]
    fn activate_one(
        &mut self,
        id: BackendId,
        available: &AvailableBackends,
        settings: &ProjectSettings,
        factory: &dyn BackendFactory,
    ) -> ActivationOutcome {
        let enabled = settings.settings_for(id);

        if !available.contains(id) {
            if enabled.is_some() {
                debug!("enabled for project but not bundled, skipping");
            }
            return ActivationOutcome::NotLinked;
        }

        let Some(backend_settings) = enabled else {
            debug!("bundled but not enabled for project");
            return ActivationOutcome::NotEnabled;
        };

        match factory.construct(id, backend_settings) {
            Ok(integration) if integration.id() != id => {
                let message = format!("factory returned adapter for '{}'", integration.id());
                error!(error = %message, "could not initialize backend");
                record_activation_failure(id);
                ActivationOutcome::Failed(message)
            }
            Ok(integration) => {
                info!("backend activated");
                self.backends.push(ActivatedBackend::new(id, integration));
                ActivationOutcome::Activated
            }
            Err(e) => {
                // 构造失败：记录并跳过，不影响其他 backend
                error!(error = %e, "could not initialize backend");
                record_activation_failure(id);
                ActivationOutcome::Failed(e.to_string())
            }
        }
    }

    /// 已激活的 backend（按 BackendId 顺序）
    pub fn backends(&self) -> &[ActivatedBackend] {
        &self.backends
    }

    pub fn ids(&self) -> Vec<BackendId> {
        self.backends.iter().map(ActivatedBackend::id).collect()
    }

    pub fn get(&self, id: BackendId) -> Option<&ActivatedBackend> {
        self.backends.iter().find(|b| b.id() == id)
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// 每个已知 backend 的激活结果
    pub fn report(&self) -> &[(BackendId, ActivationOutcome)] {
        &self.report
    }
}
