//! LogIntegration - logs every delivery via tracing
//!
//! Stand-in adapter for local runs and for backends whose vendor adapter is
//! not part of this workspace.

use contracts::{
    AliasPayload, BackendId, BackendSettings, ContractError, GroupPayload, IdentifyPayload,
    Integration, LifecycleContext, LifecycleKind, ScreenPayload, TrackPayload,
};
use tracing::{info, instrument};

use crate::factory::BackendFactory;

/// Adapter that logs deliveries for debugging
pub struct LogIntegration {
    id: BackendId,
}

impl LogIntegration {
    pub fn new(id: BackendId) -> Self {
        Self { id }
    }
}

impl Integration for LogIntegration {
    fn id(&self) -> BackendId {
        self.id
    }

    fn on_lifecycle(
        &self,
        kind: LifecycleKind,
        context: &LifecycleContext<'_>,
    ) -> Result<(), ContractError> {
        info!(
            backend = %self.id,
            kind = %kind,
            component = context.component,
            has_state = context.state.is_some(),
            "lifecycle"
        );
        Ok(())
    }

    fn on_identify(&self, payload: &IdentifyPayload) -> Result<(), ContractError> {
        info!(backend = %self.id, user_id = %payload.user_id, traits = payload.traits.len(), "identify");
        Ok(())
    }

    fn on_group(&self, payload: &GroupPayload) -> Result<(), ContractError> {
        info!(backend = %self.id, user_id = %payload.user_id, group_id = %payload.group_id, "group");
        Ok(())
    }

    fn on_track(&self, payload: &TrackPayload) -> Result<(), ContractError> {
        info!(
            backend = %self.id,
            user_id = %payload.user_id,
            event = %payload.event,
            properties = payload.properties.len(),
            "track"
        );
        Ok(())
    }

    fn on_alias(&self, payload: &AliasPayload) -> Result<(), ContractError> {
        info!(backend = %self.id, previous_id = %payload.previous_id, user_id = %payload.user_id, "alias");
        Ok(())
    }

    fn on_screen(&self, payload: &ScreenPayload) -> Result<(), ContractError> {
        info!(
            backend = %self.id,
            user_id = %payload.user_id,
            name = %payload.name,
            category = ?payload.category,
            "screen"
        );
        Ok(())
    }
}

/// Factory building [`LogIntegration`]s
///
/// Enforces each backend's required setting so misconfigured projects fail
/// activation the way a vendor SDK would.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogBackendFactory;

impl BackendFactory for LogBackendFactory {
    #[instrument(name = "log_backend_construct", skip(self, settings), fields(backend = %id))]
    fn construct(
        &self,
        id: BackendId,
        settings: &BackendSettings,
    ) -> Result<Box<dyn Integration>, ContractError> {
        let key = settings.require_str(id, id.required_setting())?;
        info!(key_len = key.len(), "log backend constructed");
        Ok(Box::new(LogIntegration::new(id)))
    }
}
