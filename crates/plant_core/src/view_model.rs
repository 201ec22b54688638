use serde_json::Value;

use crate::UploadPhase;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UploadViewModel {
    pub phase: UploadPhase,
    pub file_count: usize,
    pub polls: u32,
    pub last_status: Option<Value>,
    pub dirty: bool,
}
