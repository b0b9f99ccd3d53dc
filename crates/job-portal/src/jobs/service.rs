use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{Job, JobDraft, JobUpdate, JobView};
use super::search::JobSearch;
use crate::access::{require_employer, require_job_owner, resolve_actor, Actor};
use crate::auth::Identity;
use crate::error::ServiceError;
use crate::ids::{EmployerId, JobId};
use crate::repository::{PortalStore, RepositoryError};

fn validate(job: &Job) -> Result<(), ServiceError> {
    if job.title.trim().is_empty() {
        return Err(ServiceError::validation("job title is required"));
    }
    if job.description.trim().is_empty() {
        return Err(ServiceError::validation("job description is required"));
    }
    if let (Some(min), Some(max)) = (job.salary.min, job.salary.max) {
        if min > max {
            return Err(ServiceError::validation(
                "salary minimum cannot exceed the maximum",
            ));
        }
    }
    Ok(())
}

/// Job postings: public search plus employer-owned CRUD.
pub struct JobService<S> {
    store: Arc<S>,
}

impl<S> JobService<S>
where
    S: PortalStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn actor(&self, identity: &Identity) -> Result<Actor, ServiceError> {
        resolve_actor(self.store.as_ref(), identity)
    }

    fn view(&self, job: Job, company_name: Option<String>) -> Result<JobView, ServiceError> {
        let applications_count = self.store.count_active_applications(&job.id)?;
        Ok(JobView {
            job,
            applications_count,
            company_name,
        })
    }

    fn company_name(&self, employer: &EmployerId) -> Result<Option<String>, ServiceError> {
        Ok(self
            .store
            .fetch_employer(employer)?
            .map(|profile| profile.company_name))
    }

    fn owned(&self, actor: &Actor, id: &JobId) -> Result<Job, ServiceError> {
        let job = self
            .store
            .fetch_job(id)?
            .ok_or_else(|| ServiceError::not_found("job not found"))?;
        require_job_owner(actor, &job)?;
        Ok(job)
    }

    pub fn create(&self, actor: &Actor, draft: JobDraft) -> Result<JobView, ServiceError> {
        let employer = require_employer(actor)?;
        let job = Job::new(employer, draft, Utc::now());
        validate(&job)?;

        let stored = self.store.insert_job(job)?;
        info!(job_id = %stored.id, employer_id = %employer, status = %stored.status, "job created");
        let company_name = self.company_name(&employer)?;
        self.view(stored, company_name)
    }

    /// Published jobs matching `search`, most recently published first.
    pub fn search(&self, search: &JobSearch) -> Result<Vec<JobView>, ServiceError> {
        let filter = search.compile()?;
        let mut jobs: Vec<Job> = self
            .store
            .published_jobs()?
            .into_iter()
            .filter(|job| filter.matches(job))
            .collect();
        jobs.sort_by(|left, right| right.published_at.cmp(&left.published_at));

        let mut names: HashMap<EmployerId, Option<String>> = HashMap::new();
        let mut views = Vec::with_capacity(jobs.len());
        for job in jobs {
            let company_name = match names.get(&job.employer) {
                Some(name) => name.clone(),
                None => {
                    let name = self.company_name(&job.employer)?;
                    names.insert(job.employer, name.clone());
                    name
                }
            };
            views.push(self.view(job, company_name)?);
        }
        Ok(views)
    }

    pub fn get(&self, id: &JobId) -> Result<JobView, ServiceError> {
        let job = self
            .store
            .fetch_job(id)?
            .ok_or_else(|| ServiceError::not_found("job not found"))?;
        let company_name = self.company_name(&job.employer)?;
        self.view(job, company_name)
    }

    pub fn update(
        &self,
        actor: &Actor,
        id: &JobId,
        update: JobUpdate,
    ) -> Result<JobView, ServiceError> {
        let mut job = self.owned(actor, id)?;
        let previous = job.status;
        job.apply(update, Utc::now());
        validate(&job)?;

        match self.store.update_job(&job) {
            Ok(()) => {}
            Err(RepositoryError::NotFound) => return Err(ServiceError::not_found("job not found")),
            Err(other) => return Err(other.into()),
        }
        if previous != job.status {
            info!(job_id = %job.id, from = %previous, status = %job.status, "job status changed");
        }
        let company_name = self.company_name(&job.employer)?;
        self.view(job, company_name)
    }

    /// Deletes the job and, with it, every application submitted to it.
    pub fn delete(&self, actor: &Actor, id: &JobId) -> Result<usize, ServiceError> {
        let job = self.owned(actor, id)?;
        let removed = match self.store.delete_job(&job.id) {
            Ok(removed) => removed,
            Err(RepositoryError::NotFound) => return Err(ServiceError::not_found("job not found")),
            Err(other) => return Err(other.into()),
        };
        info!(job_id = %job.id, removed_applications = removed, "job deleted");
        Ok(removed)
    }

    /// The calling employer's jobs in every status, newest first.
    pub fn mine(&self, actor: &Actor) -> Result<Vec<JobView>, ServiceError> {
        let employer = require_employer(actor)?;
        let mut jobs = self.store.jobs_by_employer(&employer)?;
        jobs.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        let company_name = self.company_name(&employer)?;
        jobs.into_iter()
            .map(|job| self.view(job, company_name.clone()))
            .collect()
    }
}
