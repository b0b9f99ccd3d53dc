//! Application lifecycle: a job seeker's candidacy for a job moves from `pending` through the
//! employer's review to one of the terminal states (`hired`, `rejected`, `withdrawn`). Every change
//! appends to the application's status history and is written back with an optimistic check on the
//! status it was read with.

pub mod dashboard;
pub mod domain;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use dashboard::{Dashboard, StatusCountEntry};
pub use domain::{
    Answer, Application, ApplicationStatus, ApplicationView, Interview, InterviewOutcome,
    InterviewStatus, InterviewType, Note, ScheduleInterview, StatusChange, StatusUpdate,
    SubmitApplication, Withdrawal, WithdrawnBy,
};
pub use router::application_router;
pub use service::ApplicationService;
