use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EmployerId, JobId};

/// Posting lifecycle. Only published jobs are listed publicly and accept applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Draft,
    Published,
    Closed,
    Paused,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Published => "published",
            JobStatus::Closed => "closed",
            JobStatus::Paused => "paused",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Temporary,
    Internship,
}

impl FromStr for EmploymentType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full-time" => Ok(Self::FullTime),
            "part-time" => Ok(Self::PartTime),
            "contract" => Ok(Self::Contract),
            "temporary" => Ok(Self::Temporary),
            "internship" => Ok(Self::Internship),
            other => Err(format!("unknown employment type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkplaceType {
    Remote,
    OnSite,
    Hybrid,
}

impl FromStr for WorkplaceType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "on-site" | "onsite" => Ok(Self::OnSite),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(format!("unknown workplace type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRange {
    #[serde(default)]
    pub minimum: Option<u32>,
    #[serde(default)]
    pub preferred: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationRequirement {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: ExperienceRange,
    #[serde(default)]
    pub education: EducationRequirement,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobLocation {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub remote: bool,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    #[serde(default)]
    pub min: Option<u32>,
    #[serde(default)]
    pub max: Option<u32>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub is_negotiable: bool,
}

impl Default for SalaryRange {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            currency: default_currency(),
            is_negotiable: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accommodations {
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// A posting owned by exactly one employer profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub employer: EmployerId,
    pub title: String,
    pub description: String,
    pub requirements: Requirements,
    pub employment_type: EmploymentType,
    pub workplace_type: WorkplaceType,
    pub location: JobLocation,
    pub salary: SalaryRange,
    pub benefits: Vec<String>,
    pub flexible_schedule: bool,
    pub accommodations: Accommodations,
    pub status: JobStatus,
    pub application_deadline: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Builds a posting from the employer's draft. A job created as published is stamped at once.
    pub fn new(employer: EmployerId, draft: JobDraft, now: DateTime<Utc>) -> Self {
        let published_at = (draft.status == JobStatus::Published).then_some(now);
        Self {
            id: JobId::new(),
            employer,
            title: draft.title,
            description: draft.description,
            requirements: draft.requirements,
            employment_type: draft.employment_type,
            workplace_type: draft.workplace_type,
            location: draft.location,
            salary: draft.salary,
            benefits: draft.benefits,
            flexible_schedule: draft.flexible_schedule,
            accommodations: draft.accommodations,
            status: draft.status,
            application_deadline: draft.application_deadline,
            published_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update. Moving into `published` from any other status restamps
    /// `published_at`.
    pub fn apply(&mut self, update: JobUpdate, now: DateTime<Utc>) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(requirements) = update.requirements {
            self.requirements = requirements;
        }
        if let Some(employment_type) = update.employment_type {
            self.employment_type = employment_type;
        }
        if let Some(workplace_type) = update.workplace_type {
            self.workplace_type = workplace_type;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(salary) = update.salary {
            self.salary = salary;
        }
        if let Some(benefits) = update.benefits {
            self.benefits = benefits;
        }
        if let Some(flexible_schedule) = update.flexible_schedule {
            self.flexible_schedule = flexible_schedule;
        }
        if let Some(accommodations) = update.accommodations {
            self.accommodations = accommodations;
        }
        if let Some(deadline) = update.application_deadline {
            self.application_deadline = Some(deadline);
        }
        if let Some(status) = update.status {
            if status == JobStatus::Published && self.status != JobStatus::Published {
                self.published_at = Some(now);
            }
            self.status = status;
        }
        self.updated_at = now;
    }

    /// Whether a job seeker may apply at `now`.
    pub fn accepts_applications(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Published
            && self
                .application_deadline
                .map_or(true, |deadline| deadline >= now)
    }
}

/// Employer-supplied fields for a new posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Requirements,
    pub employment_type: EmploymentType,
    pub workplace_type: WorkplaceType,
    #[serde(default)]
    pub location: JobLocation,
    #[serde(default)]
    pub salary: SalaryRange,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub flexible_schedule: bool,
    #[serde(default)]
    pub accommodations: Accommodations,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub application_deadline: Option<DateTime<Utc>>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<Requirements>,
    #[serde(default)]
    pub employment_type: Option<EmploymentType>,
    #[serde(default)]
    pub workplace_type: Option<WorkplaceType>,
    #[serde(default)]
    pub location: Option<JobLocation>,
    #[serde(default)]
    pub salary: Option<SalaryRange>,
    #[serde(default)]
    pub benefits: Option<Vec<String>>,
    #[serde(default)]
    pub flexible_schedule: Option<bool>,
    #[serde(default)]
    pub accommodations: Option<Accommodations>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub application_deadline: Option<DateTime<Utc>>,
}

/// Job as returned over the API, with the derived application count.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    pub applications_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

/// Compact job reference embedded in application listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSummary {
    pub id: JobId,
    pub title: String,
    pub status: JobStatus,
    pub location: JobLocation,
    pub employment_type: EmploymentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl JobSummary {
    pub fn of(job: &Job, company_name: Option<String>) -> Self {
        Self {
            id: job.id,
            title: job.title.clone(),
            status: job.status,
            location: job.location.clone(),
            employment_type: job.employment_type,
            company_name,
        }
    }
}
