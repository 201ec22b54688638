use crate::{Effect, Msg, SessionState, UploadPhase};

pub const STATUS_NOT_SETTLED: &str = "upload status did not settle";
pub const NO_FILES_SELECTED: &str = "no files selected for upload";

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that do not fit the current phase are ignored.
pub fn update(mut state: SessionState, msg: Msg) -> (SessionState, Vec<Effect>) {
    let effects = match msg {
        Msg::UploadRequested { files } => {
            if *state.phase() != UploadPhase::Idle {
                return (state, Vec::new());
            }
            if files == 0 {
                state.fail(NO_FILES_SELECTED);
                return (state, Vec::new());
            }
            state.set_file_count(files);
            state.set_phase(UploadPhase::Uploading);
            vec![Effect::SubmitUpload]
        }
        Msg::UploadAccepted { files } => {
            if *state.phase() != UploadPhase::Uploading {
                return (state, Vec::new());
            }
            state.set_file_count(files);
            state.set_phase(UploadPhase::Processing { polls: 0 });
            vec![Effect::PollStatus { attempt: 1 }]
        }
        Msg::UploadRejected { message } => {
            if *state.phase() != UploadPhase::Uploading {
                return (state, Vec::new());
            }
            state.fail(message);
            Vec::new()
        }
        Msg::StatusReported { snapshot } => {
            let polls = match state.phase() {
                UploadPhase::Processing { polls } => Some(polls + 1),
                _ => None,
            };
            let Some(polls) = polls else {
                return (state, Vec::new());
            };
            if state.record_status(snapshot) {
                state.set_phase(UploadPhase::Done);
                Vec::new()
            } else if polls >= state.max_polls() {
                state.fail(STATUS_NOT_SETTLED);
                Vec::new()
            } else {
                state.set_phase(UploadPhase::Processing { polls });
                vec![Effect::PollStatus { attempt: polls + 1 }]
            }
        }
        Msg::StatusFailed { message } => {
            if !matches!(state.phase(), UploadPhase::Processing { .. }) {
                return (state, Vec::new());
            }
            state.fail(message);
            Vec::new()
        }
        Msg::Reset => {
            if state.phase().is_terminal() {
                state.reset();
            }
            Vec::new()
        }
    };

    (state, effects)
}
