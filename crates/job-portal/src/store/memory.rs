use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::applications::domain::{Application, ApplicationStatus};
use crate::ids::{ApplicationId, EmployerId, JobId, JobSeekerId, UserId};
use crate::jobs::domain::Job;
use crate::profiles::domain::{EmployerProfile, JobSeekerProfile};
use crate::repository::{
    ApplicationRepository, JobRepository, ProfileRepository, RepositoryError,
};

#[derive(Default)]
struct Collections {
    employers: HashMap<EmployerId, EmployerProfile>,
    employer_by_user: HashMap<UserId, EmployerId>,
    job_seekers: HashMap<JobSeekerId, JobSeekerProfile>,
    job_seeker_by_user: HashMap<UserId, JobSeekerId>,
    jobs: HashMap<JobId, Job>,
    applications: HashMap<ApplicationId, Application>,
    /// Composite unique index over (job, job seeker).
    application_keys: HashMap<(JobId, JobSeekerId), ApplicationId>,
}

/// Process-local store. Every operation runs under one lock, so index checks and writes are a
/// single atomic step.
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl JobRepository for MemoryStore {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.jobs.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    fn update_job(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        match guard.jobs.get_mut(&job.id) {
            Some(stored) => {
                *stored = job.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.lock()?.jobs.get(id).cloned())
    }

    fn jobs_by_employer(&self, employer: &EmployerId) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .jobs
            .values()
            .filter(|job| job.employer == *employer)
            .cloned()
            .collect())
    }

    fn published_jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .jobs
            .values()
            .filter(|job| job.status == crate::jobs::domain::JobStatus::Published)
            .cloned()
            .collect())
    }

    fn delete_job(&self, id: &JobId) -> Result<usize, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.jobs.remove(id).is_none() {
            return Err(RepositoryError::NotFound);
        }

        let doomed: Vec<ApplicationId> = guard
            .applications
            .values()
            .filter(|application| application.job == *id)
            .map(|application| application.id)
            .collect();
        for application_id in &doomed {
            if let Some(application) = guard.applications.remove(application_id) {
                guard
                    .application_keys
                    .remove(&(application.job, application.job_seeker));
            }
        }

        Ok(doomed.len())
    }
}

impl ApplicationRepository for MemoryStore {
    fn insert_application(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.lock()?;
        if !guard.jobs.contains_key(&application.job) {
            return Err(RepositoryError::NotFound);
        }
        let key = (application.job, application.job_seeker);
        if guard.application_keys.contains_key(&key)
            || guard.applications.contains_key(&application.id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.application_keys.insert(key, application.id);
        guard.applications.insert(application.id, application.clone());
        Ok(application)
    }

    fn replace_application(
        &self,
        application: &Application,
        expected_revision: u64,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let stored = guard
            .applications
            .get_mut(&application.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.revision != expected_revision {
            return Err(RepositoryError::Stale);
        }
        *stored = application.clone();
        Ok(())
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(self.lock()?.applications.get(id).cloned())
    }

    fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .applications
            .values()
            .filter(|application| application.job == *job)
            .cloned()
            .collect())
    }

    fn applications_for_job_seeker(
        &self,
        job_seeker: &JobSeekerId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .applications
            .values()
            .filter(|application| application.job_seeker == *job_seeker)
            .cloned()
            .collect())
    }

    fn applications_for_jobs(&self, jobs: &[JobId]) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .applications
            .values()
            .filter(|application| jobs.contains(&application.job))
            .cloned()
            .collect())
    }

    fn count_active_applications(&self, job: &JobId) -> Result<u64, RepositoryError> {
        let guard = self.lock()?;
        let count = guard
            .applications
            .values()
            .filter(|application| {
                application.job == *job && application.status != ApplicationStatus::Withdrawn
            })
            .count();
        Ok(count as u64)
    }
}

impl ProfileRepository for MemoryStore {
    fn insert_employer(&self, profile: EmployerProfile) -> Result<EmployerProfile, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.employer_by_user.contains_key(&profile.user)
            || guard.employers.contains_key(&profile.id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.employer_by_user.insert(profile.user, profile.id);
        guard.employers.insert(profile.id, profile.clone());
        Ok(profile)
    }

    fn update_employer(&self, profile: &EmployerProfile) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        match guard.employers.get_mut(&profile.id) {
            Some(stored) if stored.user == profile.user => {
                *stored = profile.clone();
                Ok(())
            }
            Some(_) => Err(RepositoryError::Conflict),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_employer(&self, id: &EmployerId) -> Result<Option<EmployerProfile>, RepositoryError> {
        Ok(self.lock()?.employers.get(id).cloned())
    }

    fn employer_by_user(&self, user: &UserId) -> Result<Option<EmployerProfile>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .employer_by_user
            .get(user)
            .and_then(|id| guard.employers.get(id))
            .cloned())
    }

    fn employers(&self) -> Result<Vec<EmployerProfile>, RepositoryError> {
        Ok(self.lock()?.employers.values().cloned().collect())
    }

    fn insert_job_seeker(
        &self,
        profile: JobSeekerProfile,
    ) -> Result<JobSeekerProfile, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.job_seeker_by_user.contains_key(&profile.user)
            || guard.job_seekers.contains_key(&profile.id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.job_seeker_by_user.insert(profile.user, profile.id);
        guard.job_seekers.insert(profile.id, profile.clone());
        Ok(profile)
    }

    fn update_job_seeker(&self, profile: &JobSeekerProfile) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        match guard.job_seekers.get_mut(&profile.id) {
            Some(stored) if stored.user == profile.user => {
                *stored = profile.clone();
                Ok(())
            }
            Some(_) => Err(RepositoryError::Conflict),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_job_seeker(
        &self,
        id: &JobSeekerId,
    ) -> Result<Option<JobSeekerProfile>, RepositoryError> {
        Ok(self.lock()?.job_seekers.get(id).cloned())
    }

    fn job_seeker_by_user(
        &self,
        user: &UserId,
    ) -> Result<Option<JobSeekerProfile>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard
            .job_seeker_by_user
            .get(user)
            .and_then(|id| guard.job_seekers.get(id))
            .cloned())
    }

    fn job_seekers(&self) -> Result<Vec<JobSeekerProfile>, RepositoryError> {
        Ok(self.lock()?.job_seekers.values().cloned().collect())
    }
}
