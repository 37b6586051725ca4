//! Integration trait - capability set of an activated backend
//!
//! Implemented by vendor adapters. Every capability defaults to a no-op so an
//! adapter only overrides what its vendor supports.

use crate::{
    AliasPayload, BackendId, ContractError, GroupPayload, IdentifyPayload, LifecycleContext,
    LifecycleKind, ScreenPayload, TrackPayload,
};

/// Backend adapter invoked by the dispatcher.
///
/// Methods take `&self`: an activated backend is shared read-only between the
/// coordinator and the threads forwarding lifecycle notifications, so adapters
/// needing mutable state keep it behind their own synchronization.
pub trait Integration: Send + Sync {
    /// Backend this adapter is bound to
    fn id(&self) -> BackendId;

    fn on_lifecycle(
        &self,
        _kind: LifecycleKind,
        _context: &LifecycleContext<'_>,
    ) -> Result<(), ContractError> {
        Ok(())
    }

    fn on_identify(&self, _payload: &IdentifyPayload) -> Result<(), ContractError> {
        Ok(())
    }

    fn on_group(&self, _payload: &GroupPayload) -> Result<(), ContractError> {
        Ok(())
    }

    fn on_track(&self, _payload: &TrackPayload) -> Result<(), ContractError> {
        Ok(())
    }

    fn on_alias(&self, _payload: &AliasPayload) -> Result<(), ContractError> {
        Ok(())
    }

    fn on_screen(&self, _payload: &ScreenPayload) -> Result<(), ContractError> {
        Ok(())
    }
}
