use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::applications::domain::{Application, ApplicationStatus};
use crate::ids::{ApplicationId, EmployerId, JobId, JobSeekerId, UserId};
use crate::jobs::domain::{Job, JobStatus};
use crate::profiles::domain::{EmployerProfile, JobSeekerProfile};
use crate::repository::{
    ApplicationRepository, JobRepository, ProfileRepository, RepositoryError,
};

const SCHEMA: &str = r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS employers (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL UNIQUE,
        body TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS job_seekers (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL UNIQUE,
        body TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS jobs (
        id TEXT PRIMARY KEY,
        employer_id TEXT NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('draft', 'published', 'closed', 'paused')),
        body TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS applications (
        id TEXT PRIMARY KEY,
        job_id TEXT NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
        job_seeker_id TEXT NOT NULL,
        status TEXT NOT NULL CHECK (status IN
            ('pending', 'reviewed', 'shortlisted', 'rejected', 'hired', 'withdrawn')),
        revision INTEGER NOT NULL DEFAULT 0,
        body TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_jobs_employer ON jobs(employer_id);
    CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status);
    CREATE UNIQUE INDEX IF NOT EXISTS idx_applications_job_seeker
        ON applications(job_id, job_seeker_id);
    CREATE INDEX IF NOT EXISTS idx_applications_seeker ON applications(job_seeker_id);
"#;

const SQLITE_CONSTRAINT_FOREIGNKEY: std::os::raw::c_int = 787;

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.extended_code == SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                RepositoryError::NotFound
            }
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                RepositoryError::Conflict
            }
            _ => RepositoryError::Unavailable(err.to_string()),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, RepositoryError> {
    serde_json::to_string(value).map_err(|err| RepositoryError::Corrupted(err.to_string()))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, RepositoryError> {
    serde_json::from_str(body).map_err(|err| RepositoryError::Corrupted(err.to_string()))
}

fn decode_all<T: DeserializeOwned>(bodies: Vec<String>) -> Result<Vec<T>, RepositoryError> {
    bodies.iter().map(|body| decode(body)).collect()
}

fn query_bodies<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<String>, RepositoryError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| row.get::<_, String>(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn query_body<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Option<String>, RepositoryError> {
    Ok(conn
        .query_row(sql, params, |row| row.get::<_, String>(0))
        .optional()?)
}

fn row_exists(conn: &Connection, table: &str, id: &str) -> Result<bool, RepositoryError> {
    let sql = format!("SELECT 1 FROM {table} WHERE id = ?1");
    Ok(conn
        .query_row(&sql, [id], |row| row.get::<_, i64>(0))
        .optional()?
        .is_some())
}

/// SQLite-backed store. Documents are kept as JSON bodies next to the indexed columns the
/// queries and constraints need.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        }
        debug!(path = %path.display(), "opening sqlite store");
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, RepositoryError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

impl JobRepository for SqliteStore {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO jobs (id, employer_id, status, body) VALUES (?1, ?2, ?3, ?4)",
            params![
                job.id.to_string(),
                job.employer.to_string(),
                job.status.label(),
                encode(&job)?
            ],
        )?;
        Ok(job)
    }

    fn update_job(&self, job: &Job) -> Result<(), RepositoryError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE jobs SET status = ?1, body = ?2 WHERE id = ?3 AND employer_id = ?4",
            params![
                job.status.label(),
                encode(job)?,
                job.id.to_string(),
                job.employer.to_string()
            ],
        )?;
        if changed == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        let conn = self.lock()?;
        query_body(&conn, "SELECT body FROM jobs WHERE id = ?1", [id.to_string()])?
            .map(|body| decode(&body))
            .transpose()
    }

    fn jobs_by_employer(&self, employer: &EmployerId) -> Result<Vec<Job>, RepositoryError> {
        let conn = self.lock()?;
        decode_all(query_bodies(
            &conn,
            "SELECT body FROM jobs WHERE employer_id = ?1",
            [employer.to_string()],
        )?)
    }

    fn published_jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        let conn = self.lock()?;
        decode_all(query_bodies(
            &conn,
            "SELECT body FROM jobs WHERE status = ?1",
            [JobStatus::Published.label()],
        )?)
    }

    fn delete_job(&self, id: &JobId) -> Result<usize, RepositoryError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM applications WHERE job_id = ?1",
            [id.to_string()],
        )?;
        let deleted = tx.execute("DELETE FROM jobs WHERE id = ?1", [id.to_string()])?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        tx.commit()?;
        Ok(removed)
    }
}

impl ApplicationRepository for SqliteStore {
    fn insert_application(&self, application: Application) -> Result<Application, RepositoryError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO applications (id, job_id, job_seeker_id, status, revision, body)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                application.id.to_string(),
                application.job.to_string(),
                application.job_seeker.to_string(),
                application.status.label(),
                application.revision as i64,
                encode(&application)?
            ],
        )?;
        Ok(application)
    }

    fn replace_application(
        &self,
        application: &Application,
        expected_revision: u64,
    ) -> Result<(), RepositoryError> {
        let conn = self.lock()?;
        let id = application.id.to_string();
        let changed = conn.execute(
            "UPDATE applications SET status = ?1, revision = ?2, body = ?3
             WHERE id = ?4 AND revision = ?5",
            params![
                application.status.label(),
                application.revision as i64,
                encode(application)?,
                id,
                expected_revision as i64
            ],
        )?;
        if changed == 0 {
            return Err(if row_exists(&conn, "applications", &id)? {
                RepositoryError::Stale
            } else {
                RepositoryError::NotFound
            });
        }
        Ok(())
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        let conn = self.lock()?;
        query_body(
            &conn,
            "SELECT body FROM applications WHERE id = ?1",
            [id.to_string()],
        )?
        .map(|body| decode(&body))
        .transpose()
    }

    fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, RepositoryError> {
        let conn = self.lock()?;
        decode_all(query_bodies(
            &conn,
            "SELECT body FROM applications WHERE job_id = ?1",
            [job.to_string()],
        )?)
    }

    fn applications_for_job_seeker(
        &self,
        job_seeker: &JobSeekerId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let conn = self.lock()?;
        decode_all(query_bodies(
            &conn,
            "SELECT body FROM applications WHERE job_seeker_id = ?1",
            [job_seeker.to_string()],
        )?)
    }

    fn applications_for_jobs(&self, jobs: &[JobId]) -> Result<Vec<Application>, RepositoryError> {
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (1..=jobs.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("SELECT body FROM applications WHERE job_id IN ({placeholders})");

        let conn = self.lock()?;
        decode_all(query_bodies(
            &conn,
            &sql,
            params_from_iter(jobs.iter().map(|job| job.to_string())),
        )?)
    }

    fn count_active_applications(&self, job: &JobId) -> Result<u64, RepositoryError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM applications WHERE job_id = ?1 AND status != ?2",
            params![job.to_string(), ApplicationStatus::Withdrawn.label()],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }
}

impl ProfileRepository for SqliteStore {
    fn insert_employer(&self, profile: EmployerProfile) -> Result<EmployerProfile, RepositoryError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO employers (id, user_id, body) VALUES (?1, ?2, ?3)",
            params![
                profile.id.to_string(),
                profile.user.to_string(),
                encode(&profile)?
            ],
        )?;
        Ok(profile)
    }

    fn update_employer(&self, profile: &EmployerProfile) -> Result<(), RepositoryError> {
        let conn = self.lock()?;
        let id = profile.id.to_string();
        let changed = conn.execute(
            "UPDATE employers SET body = ?1 WHERE id = ?2 AND user_id = ?3",
            params![encode(profile)?, id, profile.user.to_string()],
        )?;
        if changed == 0 {
            return Err(if row_exists(&conn, "employers", &id)? {
                RepositoryError::Conflict
            } else {
                RepositoryError::NotFound
            });
        }
        Ok(())
    }

    fn fetch_employer(&self, id: &EmployerId) -> Result<Option<EmployerProfile>, RepositoryError> {
        let conn = self.lock()?;
        query_body(
            &conn,
            "SELECT body FROM employers WHERE id = ?1",
            [id.to_string()],
        )?
        .map(|body| decode(&body))
        .transpose()
    }

    fn employer_by_user(&self, user: &UserId) -> Result<Option<EmployerProfile>, RepositoryError> {
        let conn = self.lock()?;
        query_body(
            &conn,
            "SELECT body FROM employers WHERE user_id = ?1",
            [user.to_string()],
        )?
        .map(|body| decode(&body))
        .transpose()
    }

    fn employers(&self) -> Result<Vec<EmployerProfile>, RepositoryError> {
        let conn = self.lock()?;
        decode_all(query_bodies(&conn, "SELECT body FROM employers", [])?)
    }

    fn insert_job_seeker(
        &self,
        profile: JobSeekerProfile,
    ) -> Result<JobSeekerProfile, RepositoryError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO job_seekers (id, user_id, body) VALUES (?1, ?2, ?3)",
            params![
                profile.id.to_string(),
                profile.user.to_string(),
                encode(&profile)?
            ],
        )?;
        Ok(profile)
    }

    fn update_job_seeker(&self, profile: &JobSeekerProfile) -> Result<(), RepositoryError> {
        let conn = self.lock()?;
        let id = profile.id.to_string();
        let changed = conn.execute(
            "UPDATE job_seekers SET body = ?1 WHERE id = ?2 AND user_id = ?3",
            params![encode(profile)?, id, profile.user.to_string()],
        )?;
        if changed == 0 {
            return Err(if row_exists(&conn, "job_seekers", &id)? {
                RepositoryError::Conflict
            } else {
                RepositoryError::NotFound
            });
        }
        Ok(())
    }

    fn fetch_job_seeker(
        &self,
        id: &JobSeekerId,
    ) -> Result<Option<JobSeekerProfile>, RepositoryError> {
        let conn = self.lock()?;
        query_body(
            &conn,
            "SELECT body FROM job_seekers WHERE id = ?1",
            [id.to_string()],
        )?
        .map(|body| decode(&body))
        .transpose()
    }

    fn job_seeker_by_user(
        &self,
        user: &UserId,
    ) -> Result<Option<JobSeekerProfile>, RepositoryError> {
        let conn = self.lock()?;
        query_body(
            &conn,
            "SELECT body FROM job_seekers WHERE user_id = ?1",
            [user.to_string()],
        )?
        .map(|body| decode(&body))
        .transpose()
    }

    fn job_seekers(&self) -> Result<Vec<JobSeekerProfile>, RepositoryError> {
        let conn = self.lock()?;
        decode_all(query_bodies(&conn, "SELECT body FROM job_seekers", [])?)
    }
}
