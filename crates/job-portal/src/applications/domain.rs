use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access::Actor;
use crate::ids::{ApplicationId, JobId, JobSeekerId};
use crate::jobs::domain::JobSummary;
use crate::profiles::domain::Resume;

/// Candidacy status. `Rejected`, `Hired` and `Withdrawn` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Shortlisted,
    Rejected,
    Hired,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Hired,
        ApplicationStatus::Withdrawn,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected | ApplicationStatus::Hired | ApplicationStatus::Withdrawn
        )
    }

    /// Statuses an employer may assign directly; withdrawal belongs to the job seeker.
    pub const fn is_employer_settable(self) -> bool {
        !matches!(self, ApplicationStatus::Withdrawn)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.label() == wanted)
            .ok_or_else(|| format!("'{}' is not a valid application status", value.trim()))
    }
}

/// One entry of the append-only audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: ApplicationStatus,
    pub updated_by: Actor,
    #[serde(default)]
    pub reason: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub content: String,
    pub author: Actor,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewType {
    Phone,
    Video,
    InPerson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
}

impl InterviewStatus {
    pub const fn is_open(self) -> bool {
        matches!(self, InterviewStatus::Scheduled | InterviewStatus::Rescheduled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub round: u32,
    pub date_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: InterviewType,
    pub status: InterviewStatus,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawnBy {
    JobSeeker,
    Employer,
}

/// One job seeker's candidacy for one job. At most one exists per (job, job seeker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job: JobId,
    pub job_seeker: JobSeekerId,
    pub status: ApplicationStatus,
    pub status_history: Vec<StatusChange>,
    pub cover_letter: Option<String>,
    pub resume: Option<Resume>,
    pub answers: Vec<Answer>,
    pub notes: Vec<Note>,
    pub interview_schedule: Vec<Interview>,
    pub withdrawn_by: Option<WithdrawnBy>,
    pub withdrawn_reason: Option<String>,
    /// Write counter for optimistic concurrency; every accepted write stores `revision + 1`.
    #[serde(default)]
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Fresh `pending` candidacy with an empty history.
    pub fn new(
        job: JobId,
        job_seeker: JobSeekerId,
        submission: SubmitApplication,
        resume: Option<Resume>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ApplicationId::new(),
            job,
            job_seeker,
            status: ApplicationStatus::Pending,
            status_history: Vec::new(),
            cover_letter: submission
                .cover_letter
                .filter(|letter| !letter.trim().is_empty()),
            resume,
            answers: submission.answers,
            notes: Vec::new(),
            interview_schedule: Vec::new(),
            withdrawn_by: None,
            withdrawn_reason: None,
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends the audit entry and moves to `status`.
    pub(crate) fn transition(
        &mut self,
        status: ApplicationStatus,
        actor: Actor,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.status_history.push(StatusChange {
            status,
            updated_by: actor,
            reason,
            updated_at: now,
        });
        self.status = status;
        self.updated_at = now;
    }
}

/// Job seeker input for `submit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitApplication {
    pub job_id: JobId,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// Employer input for `update_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInterview {
    #[serde(default)]
    pub round: Option<u32>,
    pub date_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: InterviewType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewOutcome {
    pub status: InterviewStatus,
    #[serde(default)]
    pub feedback: Option<String>,
    /// New slot when the outcome is `rescheduled`.
    #[serde(default)]
    pub date_time: Option<DateTime<Utc>>,
}

/// Application together with a read-only summary of its job.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_summary: Option<JobSummary>,
}
