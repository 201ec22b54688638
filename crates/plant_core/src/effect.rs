#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    SubmitUpload,
    PollStatus { attempt: u32 },
}
