//! Employer and job seeker profiles. A user owns at most one profile of each kind, and the
//! profile id is what jobs and applications reference.

pub mod domain;
pub mod filter;
pub mod router;
pub mod service;

pub use domain::{
    EmployerDraft, EmployerListing, EmployerProfile, EmployerUpdate, JobSeekerDraft,
    JobSeekerListing, JobSeekerProfile, JobSeekerUpdate, Resume,
};
pub use filter::{EmployerFilter, JobSeekerFilter};
pub use router::profile_router;
pub use service::ProfileService;
