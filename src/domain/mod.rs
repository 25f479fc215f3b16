pub mod submission;
pub mod verdict;

pub use submission::{FieldValue, FormField, FormSubmission, RawParams, Submission};
pub use verdict::{TriggeredFilter, Verdict};
