//! Authorization guard.
//!
//! The caller's identity is resolved once into an [`Actor`] carrying the profile id; the
//! predicates below are pure ownership checks over current state. The `require_*` helpers turn a
//! failed check into [`ServiceError::Forbidden`] so no mutation ever proceeds silently.

use serde::{Deserialize, Serialize};

use crate::applications::domain::Application;
use crate::auth::{Identity, Role};
use crate::error::ServiceError;
use crate::ids::{EmployerId, JobSeekerId};
use crate::jobs::domain::Job;
use crate::repository::ProfileRepository;

/// Acting party, tagged by role and keyed by profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "profile_id", rename_all = "lowercase")]
pub enum Actor {
    Employer(EmployerId),
    JobSeeker(JobSeekerId),
}

impl Actor {
    pub const fn role(self) -> Role {
        match self {
            Actor::Employer(_) => Role::Employer,
            Actor::JobSeeker(_) => Role::JobSeeker,
        }
    }
}

/// Maps an authenticated identity onto its profile.
pub fn resolve_actor<P>(profiles: &P, identity: &Identity) -> Result<Actor, ServiceError>
where
    P: ProfileRepository + ?Sized,
{
    match identity.role {
        Role::Employer => profiles
            .employer_by_user(&identity.user_id)?
            .map(|profile| Actor::Employer(profile.id))
            .ok_or_else(|| ServiceError::not_found("employer profile not found")),
        Role::JobSeeker => profiles
            .job_seeker_by_user(&identity.user_id)?
            .map(|profile| Actor::JobSeeker(profile.id))
            .ok_or_else(|| ServiceError::not_found("job seeker profile not found")),
    }
}

pub fn can_act_on_job(actor: &Actor, job: &Job) -> bool {
    matches!(actor, Actor::Employer(id) if *id == job.employer)
}

/// `job` must be the parent of `application`; the employer side is judged through it.
pub fn can_act_on_application(
    actor: &Actor,
    application: &Application,
    job: &Job,
    role: Role,
) -> bool {
    debug_assert_eq!(application.job, job.id);
    match (role, actor) {
        (Role::JobSeeker, Actor::JobSeeker(id)) => *id == application.job_seeker,
        (Role::Employer, Actor::Employer(_)) => can_act_on_job(actor, job),
        _ => false,
    }
}

pub fn require_employer(actor: &Actor) -> Result<EmployerId, ServiceError> {
    match actor {
        Actor::Employer(id) => Ok(*id),
        Actor::JobSeeker(_) => Err(ServiceError::forbidden(
            "this action is reserved for employers",
        )),
    }
}

pub fn require_job_seeker(actor: &Actor) -> Result<JobSeekerId, ServiceError> {
    match actor {
        Actor::JobSeeker(id) => Ok(*id),
        Actor::Employer(_) => Err(ServiceError::forbidden(
            "this action is reserved for job seekers",
        )),
    }
}

pub fn require_job_owner(actor: &Actor, job: &Job) -> Result<EmployerId, ServiceError> {
    let employer = require_employer(actor)?;
    if can_act_on_job(actor, job) {
        Ok(employer)
    } else {
        Err(ServiceError::forbidden("not authorized to manage this job"))
    }
}

pub fn require_application_access(
    actor: &Actor,
    application: &Application,
    job: &Job,
    role: Role,
) -> Result<(), ServiceError> {
    if actor.role() != role {
        return Err(ServiceError::forbidden(format!(
            "this action is reserved for {} accounts",
            role.label()
        )));
    }

    if can_act_on_application(actor, application, job, role) {
        Ok(())
    } else {
        Err(ServiceError::forbidden(
            "not authorized to act on this application",
        ))
    }
}
