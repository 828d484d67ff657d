pub mod submission;

pub use submission::{MediaType, Submission, SubmissionStatus};
