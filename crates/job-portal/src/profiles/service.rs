use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    EmployerDraft, EmployerListing, EmployerProfile, EmployerUpdate, JobSeekerDraft,
    JobSeekerListing, JobSeekerProfile, JobSeekerUpdate,
};
use super::filter::{EmployerFilter, JobSeekerFilter};
use crate::access::{require_employer, resolve_actor, Actor};
use crate::auth::{Identity, Role};
use crate::error::ServiceError;
use crate::repository::{PortalStore, RepositoryError};

fn require_role(identity: &Identity, role: Role) -> Result<(), ServiceError> {
    if identity.role == role {
        Ok(())
    } else {
        Err(ServiceError::forbidden(format!(
            "only {} accounts can manage this profile",
            role.label()
        )))
    }
}

fn require_text(value: &str, field: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        Err(ServiceError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn validate_employer(profile: &EmployerProfile) -> Result<(), ServiceError> {
    require_text(&profile.company_name, "company name")?;
    require_text(&profile.industry, "industry")?;
    require_text(&profile.company_description, "company description")
}

/// Employer and job seeker profiles, one of each kind per user at most.
pub struct ProfileService<S> {
    store: Arc<S>,
}

impl<S> ProfileService<S>
where
    S: PortalStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn actor(&self, identity: &Identity) -> Result<Actor, ServiceError> {
        resolve_actor(self.store.as_ref(), identity)
    }

    pub fn create_employer(
        &self,
        identity: &Identity,
        draft: EmployerDraft,
    ) -> Result<EmployerProfile, ServiceError> {
        require_role(identity, Role::Employer)?;
        let profile = EmployerProfile::new(identity.user_id, draft, Utc::now());
        validate_employer(&profile)?;

        match self.store.insert_employer(profile) {
            Ok(stored) => {
                info!(employer_id = %stored.id, user_id = %stored.user, "employer profile created");
                Ok(stored)
            }
            Err(RepositoryError::Conflict) => {
                Err(ServiceError::conflict("employer profile already exists"))
            }
            Err(other) => Err(other.into()),
        }
    }

    pub fn employer_profile(&self, identity: &Identity) -> Result<EmployerProfile, ServiceError> {
        require_role(identity, Role::Employer)?;
        self.store
            .employer_by_user(&identity.user_id)?
            .ok_or_else(|| ServiceError::not_found("employer profile not found"))
    }

    pub fn update_employer(
        &self,
        identity: &Identity,
        update: EmployerUpdate,
    ) -> Result<EmployerProfile, ServiceError> {
        let mut profile = self.employer_profile(identity)?;
        profile.apply(update, Utc::now());
        validate_employer(&profile)?;
        self.store.update_employer(&profile)?;
        Ok(profile)
    }

    /// Public directory, ordered by company name.
    pub fn employers(&self, filter: &EmployerFilter) -> Result<Vec<EmployerListing>, ServiceError> {
        let criteria = filter.compile()?;
        let mut matching: Vec<EmployerProfile> = self
            .store
            .employers()?
            .into_iter()
            .filter(|profile| criteria.matches(profile))
            .collect();
        matching.sort_by(|left, right| {
            left.company_name
                .to_lowercase()
                .cmp(&right.company_name.to_lowercase())
        });
        Ok(matching.into_iter().map(EmployerListing::from).collect())
    }

    pub fn create_job_seeker(
        &self,
        identity: &Identity,
        draft: JobSeekerDraft,
    ) -> Result<JobSeekerProfile, ServiceError> {
        require_role(identity, Role::JobSeeker)?;
        let profile = JobSeekerProfile::new(identity.user_id, draft, Utc::now());

        match self.store.insert_job_seeker(profile) {
            Ok(stored) => {
                info!(job_seeker_id = %stored.id, user_id = %stored.user, "job seeker profile created");
                Ok(stored)
            }
            Err(RepositoryError::Conflict) => {
                Err(ServiceError::conflict("job seeker profile already exists"))
            }
            Err(other) => Err(other.into()),
        }
    }

    pub fn job_seeker_profile(&self, identity: &Identity) -> Result<JobSeekerProfile, ServiceError> {
        require_role(identity, Role::JobSeeker)?;
        self.store
            .job_seeker_by_user(&identity.user_id)?
            .ok_or_else(|| ServiceError::not_found("job seeker profile not found"))
    }

    pub fn update_job_seeker(
        &self,
        identity: &Identity,
        update: JobSeekerUpdate,
    ) -> Result<JobSeekerProfile, ServiceError> {
        let mut profile = self.job_seeker_profile(identity)?;
        profile.apply(update, Utc::now());
        self.store.update_job_seeker(&profile)?;
        Ok(profile)
    }

    /// Candidate search, reserved for employers.
    pub fn job_seekers(
        &self,
        actor: &Actor,
        filter: &JobSeekerFilter,
    ) -> Result<Vec<JobSeekerListing>, ServiceError> {
        require_employer(actor)?;
        let criteria = filter.compile()?;
        let mut matching: Vec<JobSeekerProfile> = self
            .store
            .job_seekers()?
            .into_iter()
            .filter(|profile| criteria.matches(profile))
            .collect();
        matching.sort_by(|left, right| right.updated_at.cmp(&left.updated_at));
        Ok(matching.into_iter().map(JobSeekerListing::from).collect())
    }
}
