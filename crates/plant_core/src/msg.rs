use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Caller wants to submit a batch of `files` entries.
    UploadRequested { files: usize },
    /// Server accepted the batch.
    UploadAccepted { files: usize },
    /// Server or transport rejected the batch.
    UploadRejected { message: String },
    /// One point-in-time read of the upload status.
    StatusReported { snapshot: Value },
    /// Status read failed.
    StatusFailed { message: String },
    /// Return a finished session to idle.
    Reset,
}
