pub mod invocation;
pub mod job;
pub mod report;
pub mod selection;

pub use invocation::{parse_payload, InvocationResponse, TriggerPayload, VerifyPayload};
pub use job::{BackupJob, JobState, JobSummary};
pub use report::{PollResult, TriggerReport, VerificationReport, VerificationSummary};
pub use selection::{
    BackupSelection, ResolvedSelection, ResourceReference, Selection, SelectionKind, TagSelector,
};
