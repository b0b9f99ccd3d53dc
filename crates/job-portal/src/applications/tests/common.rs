use std::sync::Arc;

use axum::response::Response;
use chrono::{Duration, Utc};
use serde_json::Value;

use crate::access::Actor;
use crate::applications::domain::{
    Application, ApplicationStatus, Note, StatusUpdate, SubmitApplication,
};
use crate::applications::ApplicationService;
use crate::auth::{Authenticator, Identity, Role};
use crate::ids::{ApplicationId, EmployerId, JobId, JobSeekerId, UserId};
use crate::jobs::domain::{
    Accommodations, EmploymentType, Job, JobDraft, JobLocation, JobStatus, Requirements,
    SalaryRange, WorkplaceType,
};
use crate::jobs::JobService;
use crate::profiles::domain::{
    Accessibility, Availability, CompanySize, EmployerDraft, EmployerProfile, JobSeekerDraft,
    JobSeekerProfile, Preferences, SeekerCategory,
};
use crate::profiles::ProfileService;
use crate::repository::{
    ApplicationRepository, JobRepository, ProfileRepository, RepositoryError,
};
use crate::store::MemoryStore;

pub(super) struct Portal<S = MemoryStore> {
    pub(super) store: Arc<S>,
    pub(super) applications: ApplicationService<S>,
    pub(super) jobs: JobService<S>,
    pub(super) profiles: ProfileService<S>,
}

pub(super) fn portal() -> Portal {
    portal_over(Arc::new(MemoryStore::new()))
}

pub(super) fn portal_over<S: crate::repository::PortalStore + 'static>(
    store: Arc<S>,
) -> Portal<S> {
    Portal {
        applications: ApplicationService::new(store.clone()),
        jobs: JobService::new(store.clone()),
        profiles: ProfileService::new(store.clone()),
        store,
    }
}

pub(super) fn identity(role: Role) -> Identity {
    Identity {
        user_id: UserId::new(),
        role,
    }
}

pub(super) fn employer_draft(company_name: &str) -> EmployerDraft {
    EmployerDraft {
        company_name: company_name.to_string(),
        industry: "Manufacturing".to_string(),
        company_size: CompanySize::Medium,
        company_description: "Precision parts for agriculture".to_string(),
        website: Some("https://example.com".to_string()),
        location: Default::default(),
        social_media: Default::default(),
        inclusivity_programs: Vec::new(),
        workplace_features: Default::default(),
    }
}

pub(super) fn job_seeker_draft() -> JobSeekerDraft {
    JobSeekerDraft {
        category: SeekerCategory::Regular,
        skills: vec!["CNC".to_string(), "Quality control".to_string()],
        experience: Vec::new(),
        education: Vec::new(),
        resume_url: Some("https://cdn.example.com/resume.pdf".to_string()),
        preferences: Preferences::default(),
        accessibility: Accessibility::default(),
        availability: Availability {
            immediate: true,
            notice_period: None,
        },
    }
}

pub(super) fn job_draft(title: &str) -> JobDraft {
    JobDraft {
        title: title.to_string(),
        description: "Operate and maintain the machining line".to_string(),
        requirements: Requirements {
            skills: vec!["CNC".to_string()],
            ..Requirements::default()
        },
        employment_type: EmploymentType::FullTime,
        workplace_type: WorkplaceType::OnSite,
        location: JobLocation {
            city: Some("Cedar Rapids".to_string()),
            ..JobLocation::default()
        },
        salary: SalaryRange {
            min: Some(52_000),
            max: Some(68_000),
            ..SalaryRange::default()
        },
        benefits: vec!["Health".to_string()],
        flexible_schedule: false,
        accommodations: Accommodations::default(),
        status: JobStatus::Published,
        application_deadline: None,
    }
}

pub(super) fn status(status: ApplicationStatus) -> StatusUpdate {
    StatusUpdate {
        status,
        reason: None,
        note: None,
    }
}

pub(super) fn submission(job: &Job) -> SubmitApplication {
    SubmitApplication {
        job_id: job.id,
        cover_letter: Some("I have run this line before.".to_string()),
        answers: Vec::new(),
    }
}

impl<S: crate::repository::PortalStore + 'static> Portal<S> {
    pub(super) fn employer(&self, company_name: &str) -> (Identity, Actor) {
        let identity = identity(Role::Employer);
        self.profiles
            .create_employer(&identity, employer_draft(company_name))
            .expect("employer profile created");
        let actor = self.applications.actor(&identity).expect("employer resolves");
        (identity, actor)
    }

    pub(super) fn job_seeker(&self) -> (Identity, Actor) {
        let identity = identity(Role::JobSeeker);
        self.profiles
            .create_job_seeker(&identity, job_seeker_draft())
            .expect("job seeker profile created");
        let actor = self
            .applications
            .actor(&identity)
            .expect("job seeker resolves");
        (identity, actor)
    }

    pub(super) fn published_job(&self, employer: &Actor) -> Job {
        self.jobs
            .create(employer, job_draft("Machinist"))
            .expect("job created")
            .job
    }

    pub(super) fn submit(&self, seeker: &Actor, job: &Job) -> Application {
        self.applications
            .submit(seeker, submission(job))
            .expect("application submitted")
    }

    pub(super) fn applications_count(&self, job: &Job) -> u64 {
        self.jobs
            .get(&job.id)
            .expect("job readable")
            .applications_count
    }

    pub(super) fn stored(&self, id: &ApplicationId) -> Application {
        self.store
            .fetch_application(id)
            .expect("fetch succeeds")
            .expect("application present")
    }

    /// Moves the stored application straight to `status`, bypassing the lifecycle rules.
    pub(super) fn force_status(&self, id: &ApplicationId, status: ApplicationStatus) {
        let mut application = self.stored(id);
        let expected = application.revision;
        application.status = status;
        application.revision += 1;
        self.store
            .replace_application(&application, expected)
            .expect("status forced");
    }
}

pub(super) fn deadline_passed(mut draft: JobDraft) -> JobDraft {
    draft.application_deadline = Some(Utc::now() - Duration::days(1));
    draft
}

pub(super) fn authenticator() -> Arc<Authenticator> {
    Arc::new(Authenticator::from_secret(
        b"application-routing-tests",
        Duration::minutes(10),
    ))
}

pub(super) fn bearer(authenticator: &Authenticator, identity: Identity) -> String {
    format!(
        "Bearer {}",
        authenticator.issue(identity).expect("token issues")
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store double that fails the way a real backend does under contention or outage.
pub(super) struct FaultyStore {
    pub(super) inner: MemoryStore,
    pub(super) fault: Fault,
}

#[derive(Clone, Copy)]
pub(super) enum Fault {
    /// Every application write loses the optimistic check.
    StaleWrites,
    /// Application reads fail as if the database were offline.
    Offline,
    /// Another writer appends a note just before each application write lands.
    Interleaved,
    /// The job is deleted just before a new application is stored.
    JobDeleted,
}

impl FaultyStore {
    pub(super) fn new(inner: MemoryStore, fault: Fault) -> Self {
        Self { inner, fault }
    }

    fn offline<T>(&self) -> Result<T, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn competing_note(&self, id: &ApplicationId) -> Result<(), RepositoryError> {
        let mut current = self
            .inner
            .fetch_application(id)?
            .ok_or(RepositoryError::NotFound)?;
        let expected = current.revision;
        current.notes.push(Note {
            content: "added by another reviewer".to_string(),
            author: Actor::Employer(EmployerId::new()),
            created_at: Utc::now(),
        });
        current.revision += 1;
        self.inner.replace_application(&current, expected)
    }
}

impl JobRepository for FaultyStore {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError> {
        self.inner.insert_job(job)
    }

    fn update_job(&self, job: &Job) -> Result<(), RepositoryError> {
        self.inner.update_job(job)
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        self.inner.fetch_job(id)
    }

    fn jobs_by_employer(&self, employer: &EmployerId) -> Result<Vec<Job>, RepositoryError> {
        self.inner.jobs_by_employer(employer)
    }

    fn published_jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        self.inner.published_jobs()
    }

    fn delete_job(&self, id: &JobId) -> Result<usize, RepositoryError> {
        self.inner.delete_job(id)
    }
}

impl ApplicationRepository for FaultyStore {
    fn insert_application(&self, application: Application) -> Result<Application, RepositoryError> {
        if let Fault::JobDeleted = self.fault {
            self.inner.delete_job(&application.job)?;
        }
        self.inner.insert_application(application)
    }

    fn replace_application(
        &self,
        application: &Application,
        expected_revision: u64,
    ) -> Result<(), RepositoryError> {
        match self.fault {
            Fault::StaleWrites => Err(RepositoryError::Stale),
            Fault::Offline | Fault::JobDeleted => {
                self.inner.replace_application(application, expected_revision)
            }
            Fault::Interleaved => {
                self.competing_note(&application.id)?;
                self.inner.replace_application(application, expected_revision)
            }
        }
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        match self.fault {
            Fault::Offline => self.offline(),
            Fault::StaleWrites | Fault::Interleaved | Fault::JobDeleted => {
                self.inner.fetch_application(id)
            }
        }
    }

    fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, RepositoryError> {
        self.inner.applications_for_job(job)
    }

    fn applications_for_job_seeker(
        &self,
        job_seeker: &JobSeekerId,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.inner.applications_for_job_seeker(job_seeker)
    }

    fn applications_for_jobs(&self, jobs: &[JobId]) -> Result<Vec<Application>, RepositoryError> {
        self.inner.applications_for_jobs(jobs)
    }

    fn count_active_applications(&self, job: &JobId) -> Result<u64, RepositoryError> {
        self.inner.count_active_applications(job)
    }
}

impl ProfileRepository for FaultyStore {
    fn insert_employer(&self, profile: EmployerProfile) -> Result<EmployerProfile, RepositoryError> {
        self.inner.insert_employer(profile)
    }

    fn update_employer(&self, profile: &EmployerProfile) -> Result<(), RepositoryError> {
        self.inner.update_employer(profile)
    }

    fn fetch_employer(&self, id: &EmployerId) -> Result<Option<EmployerProfile>, RepositoryError> {
        self.inner.fetch_employer(id)
    }

    fn employer_by_user(&self, user: &UserId) -> Result<Option<EmployerProfile>, RepositoryError> {
        self.inner.employer_by_user(user)
    }

    fn employers(&self) -> Result<Vec<EmployerProfile>, RepositoryError> {
        self.inner.employers()
    }

    fn insert_job_seeker(
        &self,
        profile: JobSeekerProfile,
    ) -> Result<JobSeekerProfile, RepositoryError> {
        self.inner.insert_job_seeker(profile)
    }

    fn update_job_seeker(&self, profile: &JobSeekerProfile) -> Result<(), RepositoryError> {
        self.inner.update_job_seeker(profile)
    }

    fn fetch_job_seeker(
        &self,
        id: &JobSeekerId,
    ) -> Result<Option<JobSeekerProfile>, RepositoryError> {
        self.inner.fetch_job_seeker(id)
    }

    fn job_seeker_by_user(
        &self,
        user: &UserId,
    ) -> Result<Option<JobSeekerProfile>, RepositoryError> {
        self.inner.job_seeker_by_user(user)
    }

    fn job_seekers(&self) -> Result<Vec<JobSeekerProfile>, RepositoryError> {
        self.inner.job_seekers()
    }
}
