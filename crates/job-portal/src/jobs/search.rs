use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use super::domain::{EmploymentType, Job, JobStatus, WorkplaceType};
use crate::error::ServiceError;

/// Query-string filters accepted by the public job listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSearch {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub workplace_type: Option<String>,
    #[serde(default)]
    pub accommodations: Option<bool>,
    #[serde(default)]
    pub flexible_schedule: Option<bool>,
    #[serde(default)]
    pub salary_min: Option<u32>,
}

/// Compiled form of [`JobSearch`]; keyword and location are literal, case-insensitive matches.
#[derive(Debug, Clone)]
pub struct JobFilter {
    keyword: Option<Regex>,
    location: Option<Regex>,
    employment_type: Option<EmploymentType>,
    workplace_type: Option<WorkplaceType>,
    accommodations: bool,
    flexible_schedule: bool,
    salary_min: Option<u32>,
}

fn literal_pattern(raw: Option<&str>) -> Result<Option<Regex>, ServiceError> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    RegexBuilder::new(&regex::escape(raw))
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|err| ServiceError::validation(format!("invalid search term: {err}")))
}

fn unless_all<T, F>(raw: Option<&str>, parse: F) -> Result<Option<T>, ServiceError>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => parse(value).map(Some).map_err(ServiceError::Validation),
    }
}

impl JobSearch {
    pub fn compile(&self) -> Result<JobFilter, ServiceError> {
        Ok(JobFilter {
            keyword: literal_pattern(self.keyword.as_deref())?,
            location: literal_pattern(self.location.as_deref())?,
            employment_type: unless_all(self.employment_type.as_deref(), |value| {
                value.parse::<EmploymentType>()
            })?,
            workplace_type: unless_all(self.workplace_type.as_deref(), |value| {
                value.parse::<WorkplaceType>()
            })?,
            accommodations: self.accommodations.unwrap_or(false),
            flexible_schedule: self.flexible_schedule.unwrap_or(false),
            salary_min: self.salary_min,
        })
    }
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if job.status != JobStatus::Published {
            return false;
        }

        if let Some(keyword) = &self.keyword {
            let hit = keyword.is_match(&job.title)
                || keyword.is_match(&job.description)
                || job
                    .requirements
                    .skills
                    .iter()
                    .any(|skill| keyword.is_match(skill));
            if !hit {
                return false;
            }
        }

        if let Some(location) = &self.location {
            match job.location.city.as_deref() {
                Some(city) if location.is_match(city) => {}
                _ => return false,
            }
        }

        if self
            .employment_type
            .is_some_and(|wanted| wanted != job.employment_type)
        {
            return false;
        }

        if self
            .workplace_type
            .is_some_and(|wanted| wanted != job.workplace_type)
        {
            return false;
        }

        if self.accommodations && !job.accommodations.available {
            return false;
        }

        if self.flexible_schedule && !job.flexible_schedule {
            return false;
        }

        // Postings without a stated minimum never satisfy a salary floor.
        if let Some(floor) = self.salary_min {
            if job.salary.min.map_or(true, |min| min < floor) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{EmployerId, JobId};
    use crate::jobs::domain::{Accommodations, JobLocation, Requirements, SalaryRange};
    use chrono::Utc;

    fn job() -> Job {
        let now = Utc::now();
        Job {
            id: JobId::new(),
            employer: EmployerId::new(),
            title: "Backend Engineer".to_string(),
            description: "Own the payments API".to_string(),
            requirements: Requirements {
                skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
                ..Requirements::default()
            },
            employment_type: EmploymentType::FullTime,
            workplace_type: WorkplaceType::Hybrid,
            location: JobLocation {
                city: Some("Des Moines".to_string()),
                ..JobLocation::default()
            },
            salary: SalaryRange {
                min: Some(90_000),
                max: Some(120_000),
                ..SalaryRange::default()
            },
            benefits: Vec::new(),
            flexible_schedule: true,
            accommodations: Accommodations {
                available: true,
                description: None,
            },
            status: JobStatus::Published,
            application_deadline: None,
            published_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    fn filter(search: JobSearch) -> JobFilter {
        search.compile().expect("search compiles")
    }

    #[test]
    fn keyword_matches_skills_case_insensitively() {
        let search = JobSearch {
            keyword: Some("rust".to_string()),
            ..JobSearch::default()
        };
        assert!(filter(search).matches(&job()));
    }

    #[test]
    fn keyword_is_treated_literally() {
        let search = JobSearch {
            keyword: Some(".*".to_string()),
            ..JobSearch::default()
        };
        assert!(!filter(search).matches(&job()));
    }

    #[test]
    fn unpublished_jobs_never_match() {
        let mut draft = job();
        draft.status = JobStatus::Draft;
        assert!(!filter(JobSearch::default()).matches(&draft));
    }

    #[test]
    fn all_disables_type_filters() {
        let search = JobSearch {
            employment_type: Some("all".to_string()),
            workplace_type: Some("remote".to_string()),
            ..JobSearch::default()
        };
        assert!(!filter(search).matches(&job()));

        let search = JobSearch {
            employment_type: Some("all".to_string()),
            workplace_type: Some("all".to_string()),
            ..JobSearch::default()
        };
        assert!(filter(search).matches(&job()));
    }

    #[test]
    fn unknown_employment_type_is_a_validation_error() {
        let search = JobSearch {
            employment_type: Some("gig".to_string()),
            ..JobSearch::default()
        };
        assert!(matches!(search.compile(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn salary_floor_and_location_apply() {
        let search = JobSearch {
            location: Some("des moines".to_string()),
            salary_min: Some(95_000),
            ..JobSearch::default()
        };
        assert!(!filter(search).matches(&job()));

        let search = JobSearch {
            location: Some("moines".to_string()),
            salary_min: Some(90_000),
            accommodations: Some(true),
            flexible_schedule: Some(true),
            ..JobSearch::default()
        };
        assert!(filter(search).matches(&job()));
    }
}
