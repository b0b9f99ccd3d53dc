use std::collections::HashMap;

use serde::Serialize;

use super::domain::{ApplicationStatus, ApplicationView};
use crate::auth::Role;
use crate::jobs::domain::{Job, JobStatus};

const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCountEntry {
    pub status: ApplicationStatus,
    pub count: usize,
}

/// Per-role overview: totals, the latest applications and a count for every status.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub role: Role,
    pub total_applications: usize,
    pub status_counts: Vec<StatusCountEntry>,
    pub recent_applications: Vec<ApplicationView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_jobs: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_jobs: Option<usize>,
}

impl Dashboard {
    /// `applications` must already be ordered newest first.
    pub fn tally(role: Role, applications: Vec<ApplicationView>, jobs: Option<&[Job]>) -> Self {
        let mut counts: HashMap<ApplicationStatus, usize> = HashMap::new();
        for view in &applications {
            *counts.entry(view.application.status).or_default() += 1;
        }

        let status_counts = ApplicationStatus::ALL
            .into_iter()
            .map(|status| StatusCountEntry {
                status,
                count: counts.get(&status).copied().unwrap_or(0),
            })
            .collect();

        let total_applications = applications.len();
        let recent_applications = applications.into_iter().take(RECENT_LIMIT).collect();

        Self {
            role,
            total_applications,
            status_counts,
            recent_applications,
            total_jobs: jobs.map(<[Job]>::len),
            active_jobs: jobs.map(|jobs| {
                jobs.iter()
                    .filter(|job| job.status == JobStatus::Published)
                    .count()
            }),
        }
    }

    pub fn count(&self, status: ApplicationStatus) -> usize {
        self.status_counts
            .iter()
            .find(|entry| entry.status == status)
            .map_or(0, |entry| entry.count)
    }
}

pub(crate) fn recent(mut views: Vec<ApplicationView>) -> Vec<ApplicationView> {
    views.truncate(RECENT_LIMIT);
    views
}
