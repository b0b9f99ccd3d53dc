use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::domain::{
    CompanySize, EmployerProfile, InclusivityProgram, JobSeekerProfile, RemoteWorkPolicy,
    SeekerCategory,
};
use crate::error::ServiceError;

/// Parses a query value using the same spelling as the JSON wire format.
fn wire_value<T: DeserializeOwned>(field: &str, raw: &str) -> Result<T, ServiceError> {
    serde_json::from_value(Value::String(raw.trim().to_string()))
        .map_err(|_| ServiceError::validation(format!("'{}' is not a valid {field}", raw.trim())))
}

fn optional<T: DeserializeOwned>(field: &str, raw: Option<&str>) -> Result<Option<T>, ServiceError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => wire_value(field, value).map(Some),
        None => Ok(None),
    }
}

fn comma_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn contains_ignore_case(haystack: &[String], wanted: &[String]) -> bool {
    wanted.iter().any(|wanted| {
        haystack
            .iter()
            .any(|value| value.eq_ignore_ascii_case(wanted))
    })
}

/// Query filters for the public employer directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployerFilter {
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub company_size: Option<String>,
    /// Comma separated; an employer matches when it runs any of them.
    #[serde(default)]
    pub inclusivity_programs: Option<String>,
    #[serde(default)]
    pub workplace_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmployerCriteria {
    industry: Option<String>,
    company_size: Option<CompanySize>,
    inclusivity_programs: Vec<InclusivityProgram>,
    remote_work_policy: Option<RemoteWorkPolicy>,
}

impl EmployerFilter {
    pub fn compile(&self) -> Result<EmployerCriteria, ServiceError> {
        let inclusivity_programs = comma_list(self.inclusivity_programs.as_deref())
            .iter()
            .map(|program| wire_value("inclusivity program", program))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EmployerCriteria {
            industry: self
                .industry
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
            company_size: optional("company size", self.company_size.as_deref())?,
            inclusivity_programs,
            remote_work_policy: optional("workplace type", self.workplace_type.as_deref())?,
        })
    }
}

impl EmployerCriteria {
    pub fn matches(&self, profile: &EmployerProfile) -> bool {
        if let Some(industry) = &self.industry {
            if !profile.industry.eq_ignore_ascii_case(industry) {
                return false;
            }
        }
        if self
            .company_size
            .is_some_and(|size| size != profile.company_size)
        {
            return false;
        }
        if !self.inclusivity_programs.is_empty()
            && !self
                .inclusivity_programs
                .iter()
                .any(|program| profile.inclusivity_programs.contains(program))
        {
            return false;
        }
        if let Some(policy) = self.remote_work_policy {
            if profile.workplace_features.remote_work_policy != Some(policy) {
                return false;
            }
        }
        true
    }
}

/// Query filters employers use to browse job seekers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSeekerFilter {
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// `true` keeps only candidates available immediately.
    #[serde(default)]
    pub availability: Option<bool>,
    #[serde(default)]
    pub preferred_locations: Option<String>,
    #[serde(default)]
    pub remote_work: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct JobSeekerCriteria {
    skills: Vec<String>,
    category: Option<SeekerCategory>,
    immediate: Option<bool>,
    preferred_locations: Vec<String>,
    remote_work: Option<bool>,
}

impl JobSeekerFilter {
    pub fn compile(&self) -> Result<JobSeekerCriteria, ServiceError> {
        Ok(JobSeekerCriteria {
            skills: comma_list(self.skills.as_deref()),
            category: optional("job seeker category", self.category.as_deref())?,
            immediate: self.availability,
            preferred_locations: comma_list(self.preferred_locations.as_deref()),
            remote_work: self.remote_work,
        })
    }
}

impl JobSeekerCriteria {
    pub fn matches(&self, profile: &JobSeekerProfile) -> bool {
        if !self.skills.is_empty() && !contains_ignore_case(&profile.skills, &self.skills) {
            return false;
        }
        if self
            .category
            .is_some_and(|category| category != profile.category)
        {
            return false;
        }
        if self
            .immediate
            .is_some_and(|immediate| immediate != profile.availability.immediate)
        {
            return false;
        }
        if !self.preferred_locations.is_empty()
            && !contains_ignore_case(
                &profile.preferences.preferred_locations,
                &self.preferred_locations,
            )
        {
            return false;
        }
        if self
            .remote_work
            .is_some_and(|remote| remote != profile.preferences.remote_work)
        {
            return false;
        }
        true
    }
}
