use serde_json::Value;

use crate::view_model::UploadViewModel;

/// Polls allowed before an unsettled status is treated as failure.
pub const DEFAULT_MAX_POLLS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading,
    Processing {
        polls: u32,
    },
    Done,
    Failed {
        message: String,
    },
}

impl UploadPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadPhase::Done | UploadPhase::Failed { .. })
    }
}

/// Caller-side view of one upload followed by status polling.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    phase: UploadPhase,
    max_polls: u32,
    file_count: usize,
    last_status: Option<Value>,
    dirty: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POLLS)
    }
}

impl SessionState {
    /// Settling needs two equal snapshots, so fewer than two polls can never succeed.
    pub fn new(max_polls: u32) -> Self {
        Self {
            phase: UploadPhase::Idle,
            max_polls: max_polls.max(2),
            file_count: 0,
            last_status: None,
            dirty: false,
        }
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    pub fn max_polls(&self) -> u32 {
        self.max_polls
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    pub fn last_status(&self) -> Option<&Value> {
        self.last_status.as_ref()
    }

    pub fn view(&self) -> UploadViewModel {
        let polls = match self.phase {
            UploadPhase::Processing { polls } => polls,
            _ => 0,
        };
        UploadViewModel {
            phase: self.phase.clone(),
            file_count: self.file_count,
            polls,
            last_status: self.last_status.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_phase(&mut self, phase: UploadPhase) {
        self.phase = phase;
        self.dirty = true;
    }

    pub(crate) fn set_file_count(&mut self, file_count: usize) {
        self.file_count = file_count;
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.set_phase(UploadPhase::Failed {
            message: message.into(),
        });
    }

    /// Stores `snapshot` and reports whether it equals the previous one.
    pub(crate) fn record_status(&mut self, snapshot: Value) -> bool {
        let settled = self.last_status.as_ref() == Some(&snapshot);
        self.last_status = Some(snapshot);
        self.dirty = true;
        settled
    }

    pub(crate) fn reset(&mut self) {
        *self = Self {
            dirty: true,
            ..Self::new(self.max_polls)
        };
    }
}
