//! Storage abstraction so the services can be exercised against any backing store.
//!
//! Uniqueness (one application per job and job seeker, one profile per user) is a property of the
//! store: implementations must reject duplicates atomically at insert time and report them as
//! [`RepositoryError::Conflict`].

use crate::applications::domain::Application;
use crate::ids::{ApplicationId, EmployerId, JobId, JobSeekerId, UserId};
use crate::jobs::domain::Job;
use crate::profiles::domain::{EmployerProfile, JobSeekerProfile};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("record was modified concurrently")]
    Stale,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored record could not be decoded: {0}")]
    Corrupted(String),
}

pub trait JobRepository: Send + Sync {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError>;
    fn update_job(&self, job: &Job) -> Result<(), RepositoryError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn jobs_by_employer(&self, employer: &EmployerId) -> Result<Vec<Job>, RepositoryError>;
    fn published_jobs(&self) -> Result<Vec<Job>, RepositoryError>;
    /// Removes the job together with every application referencing it, returning how many
    /// applications went with it.
    fn delete_job(&self, id: &JobId) -> Result<usize, RepositoryError>;
}

pub trait ApplicationRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the (job, job seeker) pair is taken and with
    /// [`RepositoryError::NotFound`] when the referenced job does not exist.
    fn insert_application(&self, application: Application) -> Result<Application, RepositoryError>;
    /// Overwrites the stored application only while its revision still equals
    /// `expected_revision`; otherwise fails with [`RepositoryError::Stale`].
    fn replace_application(
        &self,
        application: &Application,
        expected_revision: u64,
    ) -> Result<(), RepositoryError>;
    fn fetch_application(&self, id: &ApplicationId)
        -> Result<Option<Application>, RepositoryError>;
    fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, RepositoryError>;
    fn applications_for_job_seeker(
        &self,
        job_seeker: &JobSeekerId,
    ) -> Result<Vec<Application>, RepositoryError>;
    fn applications_for_jobs(&self, jobs: &[JobId]) -> Result<Vec<Application>, RepositoryError>;
    /// Number of applications for the job that have not been withdrawn.
    fn count_active_applications(&self, job: &JobId) -> Result<u64, RepositoryError>;
}

pub trait ProfileRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the user already owns an employer profile.
    fn insert_employer(&self, profile: EmployerProfile)
        -> Result<EmployerProfile, RepositoryError>;
    fn update_employer(&self, profile: &EmployerProfile) -> Result<(), RepositoryError>;
    fn fetch_employer(&self, id: &EmployerId) -> Result<Option<EmployerProfile>, RepositoryError>;
    fn employer_by_user(&self, user: &UserId) -> Result<Option<EmployerProfile>, RepositoryError>;
    fn employers(&self) -> Result<Vec<EmployerProfile>, RepositoryError>;

    /// Fails with [`RepositoryError::Conflict`] when the user already owns a job seeker profile.
    fn insert_job_seeker(
        &self,
        profile: JobSeekerProfile,
    ) -> Result<JobSeekerProfile, RepositoryError>;
    fn update_job_seeker(&self, profile: &JobSeekerProfile) -> Result<(), RepositoryError>;
    fn fetch_job_seeker(
        &self,
        id: &JobSeekerId,
    ) -> Result<Option<JobSeekerProfile>, RepositoryError>;
    fn job_seeker_by_user(&self, user: &UserId)
        -> Result<Option<JobSeekerProfile>, RepositoryError>;
    fn job_seekers(&self) -> Result<Vec<JobSeekerProfile>, RepositoryError>;
}

/// Convenience bound for stores backing the whole portal.
pub trait PortalStore: JobRepository + ApplicationRepository + ProfileRepository {}

impl<T> PortalStore for T where T: JobRepository + ApplicationRepository + ProfileRepository {}
