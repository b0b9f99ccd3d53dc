use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::dashboard::{self, Dashboard};
use super::domain::{
    Application, ApplicationStatus, ApplicationView, Interview, InterviewOutcome, InterviewStatus,
    Note, ScheduleInterview, StatusUpdate, SubmitApplication, Withdrawal, WithdrawnBy,
};
use crate::access::{
    require_application_access, require_employer, require_job_owner, require_job_seeker,
    resolve_actor, Actor,
};
use crate::auth::{Identity, Role};
use crate::error::ServiceError;
use crate::ids::{ApplicationId, EmployerId, JobId};
use crate::jobs::domain::{Job, JobSummary};
use crate::repository::{PortalStore, RepositoryError};

const INTERVIEW_SCHEDULED: &str = "interview scheduled";

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn newest_first(applications: &mut [Application]) {
    applications.sort_by(|left, right| right.created_at.cmp(&left.created_at));
}

/// Application lifecycle: submission, employer decisions, withdrawal, interviews and the
/// read models built on top of them.
pub struct ApplicationService<S> {
    store: Arc<S>,
}

impl<S> ApplicationService<S>
where
    S: PortalStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn actor(&self, identity: &Identity) -> Result<Actor, ServiceError> {
        resolve_actor(self.store.as_ref(), identity)
    }

    fn job(&self, id: &JobId) -> Result<Job, ServiceError> {
        self.store
            .fetch_job(id)?
            .ok_or_else(|| ServiceError::not_found("job not found"))
    }

    fn load(&self, id: &ApplicationId) -> Result<(Application, Job), ServiceError> {
        let application = self
            .store
            .fetch_application(id)?
            .ok_or_else(|| ServiceError::not_found("application not found"))?;
        let job = self.job(&application.job)?;
        Ok((application, job))
    }

    /// Writes back over the revision that was read, bumping it.
    fn persist(&self, application: &mut Application) -> Result<(), ServiceError> {
        let expected = application.revision;
        application.revision = expected + 1;
        match self.store.replace_application(application, expected) {
            Ok(()) => Ok(()),
            Err(RepositoryError::Stale) => Err(ServiceError::conflict(
                "application was modified concurrently",
            )),
            Err(RepositoryError::NotFound) => {
                Err(ServiceError::not_found("application not found"))
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Creates a `pending` application for the calling job seeker.
    pub fn submit(
        &self,
        actor: &Actor,
        submission: SubmitApplication,
    ) -> Result<Application, ServiceError> {
        let job_seeker = require_job_seeker(actor)?;
        let job = self.job(&submission.job_id)?;

        let now = Utc::now();
        if !job.accepts_applications(now) {
            return Err(ServiceError::conflict("job is not accepting applications"));
        }

        let profile = self
            .store
            .fetch_job_seeker(&job_seeker)?
            .ok_or_else(|| ServiceError::not_found("job seeker profile not found"))?;

        let application = Application::new(job.id, job_seeker, submission, profile.resume, now);
        let stored = match self.store.insert_application(application) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => {
                return Err(ServiceError::conflict(
                    "you have already applied for this job",
                ))
            }
            Err(RepositoryError::NotFound) => return Err(ServiceError::not_found("job not found")),
            Err(other) => return Err(other.into()),
        };

        info!(
            application_id = %stored.id,
            job_id = %stored.job,
            job_seeker_id = %stored.job_seeker,
            "application submitted"
        );
        Ok(stored)
    }

    /// Employer decision on an application of one of their jobs.
    pub fn update_status(
        &self,
        actor: &Actor,
        id: &ApplicationId,
        update: StatusUpdate,
    ) -> Result<Application, ServiceError> {
        let (mut application, job) = self.load(id)?;
        require_application_access(actor, &application, &job, Role::Employer)?;

        let previous = application.status;
        if previous.is_terminal() {
            return Err(ServiceError::conflict(format!(
                "application is already {previous} and can no longer change"
            )));
        }
        if !update.status.is_employer_settable() {
            return Err(ServiceError::validation(format!(
                "employers cannot set status '{}'",
                update.status
            )));
        }

        let now = Utc::now();
        application.transition(update.status, *actor, non_blank(update.reason), now);
        if let Some(content) = non_blank(update.note) {
            application.notes.push(Note {
                content,
                author: *actor,
                created_at: now,
            });
        }

        self.persist(&mut application)?;
        info!(
            application_id = %application.id,
            job_id = %application.job,
            from = %previous,
            status = %application.status,
            "application status updated"
        );
        Ok(application)
    }

    pub fn withdraw(
        &self,
        actor: &Actor,
        id: &ApplicationId,
        withdrawal: Withdrawal,
    ) -> Result<Application, ServiceError> {
        let (mut application, job) = self.load(id)?;
        require_application_access(actor, &application, &job, Role::JobSeeker)?;

        let previous = application.status;
        if previous.is_terminal() {
            return Err(ServiceError::conflict(format!(
                "cannot withdraw an application that is already {previous}"
            )));
        }

        let reason = non_blank(withdrawal.reason);
        application.transition(
            ApplicationStatus::Withdrawn,
            *actor,
            reason.clone(),
            Utc::now(),
        );
        application.withdrawn_by = Some(WithdrawnBy::JobSeeker);
        application.withdrawn_reason = reason;

        self.persist(&mut application)?;
        info!(
            application_id = %application.id,
            job_id = %application.job,
            from = %previous,
            "application withdrawn"
        );
        Ok(application)
    }

    /// Adds an interview round and moves the application to `shortlisted`.
    pub fn schedule_interview(
        &self,
        actor: &Actor,
        id: &ApplicationId,
        request: ScheduleInterview,
    ) -> Result<Application, ServiceError> {
        let (mut application, job) = self.load(id)?;
        require_application_access(actor, &application, &job, Role::Employer)?;

        let previous = application.status;
        if previous.is_terminal() {
            return Err(ServiceError::conflict(format!(
                "cannot schedule an interview on a {previous} application"
            )));
        }

        let round = match request.round {
            Some(0) => {
                return Err(ServiceError::validation(
                    "interview rounds are numbered from 1",
                ))
            }
            Some(round) => round,
            None => application.interview_schedule.len() as u32 + 1,
        };
        if application
            .interview_schedule
            .iter()
            .any(|interview| interview.round == round)
        {
            return Err(ServiceError::conflict(format!(
                "interview round {round} is already on the schedule"
            )));
        }

        let now = Utc::now();
        application.interview_schedule.push(Interview {
            round,
            date_time: request.date_time,
            kind: request.kind,
            status: InterviewStatus::Scheduled,
            feedback: None,
        });
        if previous == ApplicationStatus::Shortlisted {
            application.updated_at = now;
        } else {
            application.transition(
                ApplicationStatus::Shortlisted,
                *actor,
                Some(INTERVIEW_SCHEDULED.to_string()),
                now,
            );
        }

        self.persist(&mut application)?;
        info!(
            application_id = %application.id,
            job_id = %application.job,
            round,
            date_time = %request.date_time,
            "interview scheduled"
        );
        Ok(application)
    }

    pub fn record_interview_outcome(
        &self,
        actor: &Actor,
        id: &ApplicationId,
        round: u32,
        outcome: InterviewOutcome,
    ) -> Result<Application, ServiceError> {
        let (mut application, job) = self.load(id)?;
        require_application_access(actor, &application, &job, Role::Employer)?;

        if outcome.status == InterviewStatus::Scheduled {
            return Err(ServiceError::validation(
                "an interview outcome must be completed, cancelled or rescheduled",
            ));
        }

        let interview = application
            .interview_schedule
            .iter_mut()
            .find(|interview| interview.round == round)
            .ok_or_else(|| ServiceError::not_found(format!("interview round {round} not found")))?;

        if !interview.status.is_open() {
            return Err(ServiceError::conflict(format!(
                "interview round {round} is already closed"
            )));
        }

        if outcome.status == InterviewStatus::Rescheduled {
            let Some(date_time) = outcome.date_time else {
                return Err(ServiceError::validation(
                    "a rescheduled interview needs a new date_time",
                ));
            };
            interview.date_time = date_time;
        }
        interview.status = outcome.status;
        if let Some(feedback) = non_blank(outcome.feedback) {
            interview.feedback = Some(feedback);
        }
        let recorded = interview.status;
        application.updated_at = Utc::now();

        self.persist(&mut application)?;
        info!(
            application_id = %application.id,
            round,
            outcome = ?recorded,
            "interview outcome recorded"
        );
        Ok(application)
    }

    /// Single application, visible to its job seeker and to the employer owning the job.
    pub fn get(&self, actor: &Actor, id: &ApplicationId) -> Result<ApplicationView, ServiceError> {
        let (application, job) = self.load(id)?;
        require_application_access(actor, &application, &job, actor.role())?;

        let company_name = self.company_name(&job.employer)?;
        Ok(ApplicationView {
            application,
            job_summary: Some(JobSummary::of(&job, company_name)),
        })
    }

    pub fn list_for_job(
        &self,
        actor: &Actor,
        job_id: &JobId,
    ) -> Result<Vec<Application>, ServiceError> {
        let job = self.job(job_id)?;
        require_job_owner(actor, &job)?;

        let mut applications = self.store.applications_for_job(&job.id)?;
        newest_first(&mut applications);
        Ok(applications)
    }

    pub fn list_mine(&self, actor: &Actor) -> Result<Vec<ApplicationView>, ServiceError> {
        let job_seeker = require_job_seeker(actor)?;
        let mut applications = self.store.applications_for_job_seeker(&job_seeker)?;
        newest_first(&mut applications);
        self.with_summaries(applications)
    }

    pub fn recent_mine(&self, actor: &Actor) -> Result<Vec<ApplicationView>, ServiceError> {
        self.list_mine(actor).map(dashboard::recent)
    }

    /// Every application across the calling employer's jobs.
    pub fn received(&self, actor: &Actor) -> Result<Vec<ApplicationView>, ServiceError> {
        let employer = require_employer(actor)?;
        let jobs = self.store.jobs_by_employer(&employer)?;
        self.received_for(&jobs)
    }

    fn received_for(&self, jobs: &[Job]) -> Result<Vec<ApplicationView>, ServiceError> {
        let ids: Vec<JobId> = jobs.iter().map(|job| job.id).collect();
        let mut applications = self.store.applications_for_jobs(&ids)?;
        newest_first(&mut applications);
        self.with_summaries(applications)
    }

    pub fn dashboard(&self, actor: &Actor) -> Result<Dashboard, ServiceError> {
        match actor {
            Actor::JobSeeker(_) => Ok(Dashboard::tally(
                Role::JobSeeker,
                self.list_mine(actor)?,
                None,
            )),
            Actor::Employer(employer) => {
                let jobs = self.store.jobs_by_employer(employer)?;
                let received = self.received_for(&jobs)?;
                Ok(Dashboard::tally(
                    Role::Employer,
                    received,
                    Some(jobs.as_slice()),
                ))
            }
        }
    }

    fn company_name(&self, employer: &EmployerId) -> Result<Option<String>, ServiceError> {
        Ok(self
            .store
            .fetch_employer(employer)?
            .map(|profile| profile.company_name))
    }

    fn with_summaries(
        &self,
        applications: Vec<Application>,
    ) -> Result<Vec<ApplicationView>, ServiceError> {
        let mut summaries: HashMap<JobId, Option<JobSummary>> = HashMap::new();
        let mut views = Vec::with_capacity(applications.len());

        for application in applications {
            let job_summary = match summaries.get(&application.job) {
                Some(summary) => summary.clone(),
                None => {
                    let summary = match self.store.fetch_job(&application.job)? {
                        Some(job) => {
                            let company_name = self.company_name(&job.employer)?;
                            Some(JobSummary::of(&job, company_name))
                        }
                        None => {
                            debug!(job_id = %application.job, "application references a missing job");
                            None
                        }
                    };
                    summaries.insert(application.job, summary.clone());
                    summary
                }
            };
            views.push(ApplicationView {
                application,
                job_summary,
            });
        }

        Ok(views)
    }
}
