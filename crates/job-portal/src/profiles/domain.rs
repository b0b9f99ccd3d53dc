use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EmployerId, JobSeekerId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanySize {
    #[serde(rename = "1-10")]
    Micro,
    #[serde(rename = "11-50")]
    Small,
    #[serde(rename = "51-200")]
    Medium,
    #[serde(rename = "201-500")]
    Large,
    #[serde(rename = "501-1000")]
    Enterprise,
    #[serde(rename = "1000+")]
    Corporation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InclusivityProgram {
    DisabilityFriendly,
    VeteranProgram,
    ReturnToWork,
    RetirementTransition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoteWorkPolicy {
    RemoteOnly,
    Hybrid,
    Flexible,
    OnSite,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkplaceFeatures {
    #[serde(default)]
    pub remote_work_policy: Option<RemoteWorkPolicy>,
    #[serde(default)]
    pub flexible_hours: bool,
    #[serde(default)]
    pub accessibility_features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployerProfile {
    pub id: EmployerId,
    pub user: UserId,
    pub company_name: String,
    pub industry: String,
    pub company_size: CompanySize,
    pub company_description: String,
    pub website: Option<String>,
    pub location: Address,
    pub social_media: SocialMedia,
    pub inclusivity_programs: Vec<InclusivityProgram>,
    pub workplace_features: WorkplaceFeatures,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployerDraft {
    pub company_name: String,
    pub industry: String,
    pub company_size: CompanySize,
    pub company_description: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Address,
    #[serde(default)]
    pub social_media: SocialMedia,
    #[serde(default)]
    pub inclusivity_programs: Vec<InclusivityProgram>,
    #[serde(default)]
    pub workplace_features: WorkplaceFeatures,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployerUpdate {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub company_size: Option<CompanySize>,
    #[serde(default)]
    pub company_description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<Address>,
    #[serde(default)]
    pub social_media: Option<SocialMedia>,
    #[serde(default)]
    pub inclusivity_programs: Option<Vec<InclusivityProgram>>,
    #[serde(default)]
    pub workplace_features: Option<WorkplaceFeatures>,
}

impl EmployerProfile {
    pub fn new(user: UserId, draft: EmployerDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: EmployerId::new(),
            user,
            company_name: draft.company_name,
            industry: draft.industry,
            company_size: draft.company_size,
            company_description: draft.company_description,
            website: draft.website,
            location: draft.location,
            social_media: draft.social_media,
            inclusivity_programs: draft.inclusivity_programs,
            workplace_features: draft.workplace_features,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: EmployerUpdate, now: DateTime<Utc>) {
        if let Some(company_name) = update.company_name {
            self.company_name = company_name;
        }
        if let Some(industry) = update.industry {
            self.industry = industry;
        }
        if let Some(company_size) = update.company_size {
            self.company_size = company_size;
        }
        if let Some(description) = update.company_description {
            self.company_description = description;
        }
        if let Some(website) = update.website {
            self.website = Some(website);
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(social_media) = update.social_media {
            self.social_media = social_media;
        }
        if let Some(programs) = update.inclusivity_programs {
            self.inclusivity_programs = programs;
        }
        if let Some(features) = update.workplace_features {
            self.workplace_features = features;
        }
        self.updated_at = now;
    }
}

/// Public directory entry; social handles stay private.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployerListing {
    pub id: EmployerId,
    pub company_name: String,
    pub industry: String,
    pub company_size: CompanySize,
    pub company_description: String,
    pub website: Option<String>,
    pub location: Address,
    pub inclusivity_programs: Vec<InclusivityProgram>,
    pub workplace_features: WorkplaceFeatures,
}

impl From<EmployerProfile> for EmployerListing {
    fn from(profile: EmployerProfile) -> Self {
        Self {
            id: profile.id,
            company_name: profile.company_name,
            industry: profile.industry,
            company_size: profile.company_size,
            company_description: profile.company_description,
            website: profile.website,
            location: profile.location,
            inclusivity_programs: profile.inclusivity_programs,
            workplace_features: profile.workplace_features,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeekerCategory {
    Regular,
    CareerBreakReturner,
    Disabled,
    Veteran,
    Retiree,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_current_role: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<u16>,
}

/// Pointer to an uploaded resume document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resume {
    pub url: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryExpectation {
    #[serde(default)]
    pub min: Option<u32>,
    #[serde(default)]
    pub max: Option<u32>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub remote_work: bool,
    #[serde(default)]
    pub flexible_schedule: bool,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    #[serde(default)]
    pub expected_salary: Option<SalaryExpectation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessibility {
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub accommodations_needed: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    #[serde(default)]
    pub immediate: bool,
    /// Notice period in days.
    #[serde(default)]
    pub notice_period: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSeekerProfile {
    pub id: JobSeekerId,
    pub user: UserId,
    pub category: SeekerCategory,
    pub skills: Vec<String>,
    pub experience: Vec<WorkExperience>,
    pub education: Vec<EducationEntry>,
    pub resume: Option<Resume>,
    pub preferences: Preferences,
    pub accessibility: Accessibility,
    pub availability: Availability,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSeekerDraft {
    pub category: SeekerCategory,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub availability: Availability,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSeekerUpdate {
    #[serde(default)]
    pub category: Option<SeekerCategory>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub experience: Option<Vec<WorkExperience>>,
    #[serde(default)]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
    #[serde(default)]
    pub accessibility: Option<Accessibility>,
    #[serde(default)]
    pub availability: Option<Availability>,
}

fn resume_at(url: Option<String>, now: DateTime<Utc>) -> Option<Resume> {
    url.map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .map(|url| Resume {
            url,
            updated_at: now,
        })
}

impl JobSeekerProfile {
    pub fn new(user: UserId, draft: JobSeekerDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: JobSeekerId::new(),
            user,
            category: draft.category,
            skills: draft.skills,
            experience: draft.experience,
            education: draft.education,
            resume: resume_at(draft.resume_url, now),
            preferences: draft.preferences,
            accessibility: draft.accessibility,
            availability: draft.availability,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: JobSeekerUpdate, now: DateTime<Utc>) {
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(skills) = update.skills {
            self.skills = skills;
        }
        if let Some(experience) = update.experience {
            self.experience = experience;
        }
        if let Some(education) = update.education {
            self.education = education;
        }
        if let Some(resume) = resume_at(update.resume_url, now) {
            self.resume = Some(resume);
        }
        if let Some(preferences) = update.preferences {
            self.preferences = preferences;
        }
        if let Some(accessibility) = update.accessibility {
            self.accessibility = accessibility;
        }
        if let Some(availability) = update.availability {
            self.availability = availability;
        }
        self.updated_at = now;
    }
}

/// What employers see when browsing candidates; the resume link is withheld until they apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSeekerListing {
    pub id: JobSeekerId,
    pub category: SeekerCategory,
    pub skills: Vec<String>,
    pub experience: Vec<WorkExperience>,
    pub education: Vec<EducationEntry>,
    pub preferences: Preferences,
    pub availability: Availability,
}

impl From<JobSeekerProfile> for JobSeekerListing {
    fn from(profile: JobSeekerProfile) -> Self {
        Self {
            id: profile.id,
            category: profile.category,
            skills: profile.skills,
            experience: profile.experience,
            education: profile.education,
            preferences: profile.preferences,
            availability: profile.availability,
        }
    }
}
