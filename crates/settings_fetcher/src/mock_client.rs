//! Mock settings clients
//!
//! Scripted responses and a release gate for driving bootstrap timing in tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use contracts::{ContractError, ProjectSettings};

use crate::client::SettingsClient;

/// Longest a gated fetch waits before giving up
const GATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocks fetches until opened
#[derive(Debug, Default)]
pub struct SettingsGate {
    open: Mutex<bool>,
    cv: Condvar,
}

impl SettingsGate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Release every waiting and future fetch
    pub fn open(&self) {
        let mut open = self.open.lock().unwrap_or_else(|e| e.into_inner());
        *open = true;
        self.cv.notify_all();
    }

    fn wait(&self) -> Result<(), ContractError> {
        let open = self.open.lock().unwrap_or_else(|e| e.into_inner());
        let (open, _) = self
            .cv
            .wait_timeout_while(open, GATE_TIMEOUT, |open| !*open)
            .unwrap_or_else(|e| e.into_inner());
        if *open {
            Ok(())
        } else {
            Err(ContractError::network("settings gate never opened"))
        }
    }
}

/// Client replaying a fixed script of responses
///
/// Once the script is exhausted every fetch fails with a network error.
pub struct ScriptedSettingsClient {
    script: Mutex<VecDeque<Result<ProjectSettings, ContractError>>>,
    attempts: AtomicU32,
    gate: Option<Arc<SettingsGate>>,
}

impl ScriptedSettingsClient {
    pub fn new(script: Vec<Result<ProjectSettings, ContractError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            attempts: AtomicU32::new(0),
            gate: None,
        }
    }

    /// Fails `failures` times with a network error, then returns `settings`
    pub fn failing_then(failures: usize, settings: ProjectSettings) -> Self {
        let mut script: Vec<_> = (0..failures)
            .map(|i| Err(ContractError::network(format!("connection reset ({i})"))))
            .collect();
        script.push(Ok(settings));
        Self::new(script)
    }

    /// Never succeeds
    pub fn always_failing() -> Self {
        Self::new(Vec::new())
    }

    /// Hold every fetch until `gate` opens
    pub fn gated(mut self, gate: Arc<SettingsGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of fetches performed so far
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl SettingsClient for ScriptedSettingsClient {
    fn fetch(&self) -> Result<ProjectSettings, ContractError> {
        if let Some(gate) = &self.gate {
            gate.wait()?;
        }
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(ContractError::network("no scripted response")))
    }
}
