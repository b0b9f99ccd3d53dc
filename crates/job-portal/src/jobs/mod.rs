//! Job postings owned by employer profiles.

pub mod domain;
pub mod router;
pub mod search;
pub mod service;

pub use domain::{
    Accommodations, EducationRequirement, EmploymentType, ExperienceRange, Job, JobDraft,
    JobLocation, JobStatus, JobSummary, JobUpdate, JobView, Requirements, SalaryRange,
    WorkplaceType,
};
pub use router::job_router;
pub use search::{JobFilter, JobSearch};
pub use service::JobService;
