//! Backing stores for the portal repositories.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::applications::domain::{Application, ApplicationStatus, SubmitApplication};
    use crate::ids::{EmployerId, JobSeekerId, UserId};
    use crate::jobs::domain::{
        Accommodations, EmploymentType, Job, JobDraft, JobLocation, JobStatus, Requirements,
        SalaryRange, WorkplaceType,
    };
    use crate::profiles::domain::{CompanySize, EmployerDraft, EmployerProfile};
    use crate::repository::{JobRepository, PortalStore, RepositoryError};

    fn job(employer: EmployerId) -> Job {
        Job::new(
            employer,
            JobDraft {
                title: "Warehouse Lead".to_string(),
                description: "Run the night shift".to_string(),
                requirements: Requirements::default(),
                employment_type: EmploymentType::FullTime,
                workplace_type: WorkplaceType::OnSite,
                location: JobLocation::default(),
                salary: SalaryRange::default(),
                benefits: Vec::new(),
                flexible_schedule: false,
                accommodations: Accommodations::default(),
                status: JobStatus::Published,
                application_deadline: None,
            },
            Utc::now(),
        )
    }

    fn application(job: &Job, seeker: JobSeekerId) -> Application {
        Application::new(
            job.id,
            seeker,
            SubmitApplication {
                job_id: job.id,
                cover_letter: None,
                answers: Vec::new(),
            },
            None,
            Utc::now(),
        )
    }

    fn employer(user: UserId) -> EmployerProfile {
        EmployerProfile::new(
            user,
            EmployerDraft {
                company_name: "Prairie Freight".to_string(),
                industry: "logistics".to_string(),
                company_size: CompanySize::Medium,
                company_description: "Regional carrier".to_string(),
                website: None,
                location: Default::default(),
                social_media: Default::default(),
                inclusivity_programs: Vec::new(),
                workplace_features: Default::default(),
            },
            Utc::now(),
        )
    }

    fn rejects_duplicate_pairs(store: &impl PortalStore) {
        let posting = store.insert_job(job(EmployerId::new())).expect("job stored");
        let seeker = JobSeekerId::new();

        store
            .insert_application(application(&posting, seeker))
            .expect("first application stored");
        let duplicate = store.insert_application(application(&posting, seeker));
        assert!(matches!(duplicate, Err(RepositoryError::Conflict)));

        store
            .insert_application(application(&posting, JobSeekerId::new()))
            .expect("other seekers may apply");
        assert_eq!(
            store
                .count_active_applications(&posting.id)
                .expect("count reads"),
            2
        );
    }

    fn replace_detects_stale_writes(store: &impl PortalStore) {
        let posting = store.insert_job(job(EmployerId::new())).expect("job stored");
        let stored = store
            .insert_application(application(&posting, JobSeekerId::new()))
            .expect("application stored");

        let mut reviewed = stored.clone();
        reviewed.status = ApplicationStatus::Reviewed;
        reviewed.revision += 1;
        store
            .replace_application(&reviewed, stored.revision)
            .expect("first writer wins");

        let mut rejected = stored.clone();
        rejected.status = ApplicationStatus::Rejected;
        rejected.revision += 1;
        assert!(matches!(
            store.replace_application(&rejected, stored.revision),
            Err(RepositoryError::Stale)
        ));

        let fetched = store
            .fetch_application(&stored.id)
            .expect("fetch works")
            .expect("application exists");
        assert_eq!(fetched.status, ApplicationStatus::Reviewed);
        assert_eq!(fetched.revision, stored.revision + 1);
    }

    fn same_status_writers_still_race(store: &impl PortalStore) {
        let posting = store.insert_job(job(EmployerId::new())).expect("job stored");
        let stored = store
            .insert_application(application(&posting, JobSeekerId::new()))
            .expect("application stored");

        let mut first = stored.clone();
        first.cover_letter = Some("first reviewer".to_string());
        first.revision += 1;
        store
            .replace_application(&first, stored.revision)
            .expect("first writer wins");

        let mut second = stored.clone();
        second.cover_letter = Some("second reviewer".to_string());
        second.revision += 1;
        assert!(matches!(
            store.replace_application(&second, stored.revision),
            Err(RepositoryError::Stale)
        ));

        let fetched = store
            .fetch_application(&stored.id)
            .expect("fetch works")
            .expect("application exists");
        assert_eq!(fetched.status, ApplicationStatus::Pending);
        assert_eq!(fetched.cover_letter.as_deref(), Some("first reviewer"));
    }

    fn rejects_applications_for_missing_jobs(store: &impl PortalStore) {
        let unsaved = job(EmployerId::new());
        assert!(matches!(
            store.insert_application(application(&unsaved, JobSeekerId::new())),
            Err(RepositoryError::NotFound)
        ));
        assert!(store
            .applications_for_job(&unsaved.id)
            .expect("list works")
            .is_empty());
    }

    fn delete_cascades_and_frees_the_pair(store: &impl PortalStore) {
        let posting = store.insert_job(job(EmployerId::new())).expect("job stored");
        let seeker = JobSeekerId::new();
        store
            .insert_application(application(&posting, seeker))
            .expect("application stored");
        let mut withdrawn = application(&posting, JobSeekerId::new());
        withdrawn.status = ApplicationStatus::Withdrawn;
        store
            .insert_application(withdrawn)
            .expect("application stored");

        assert_eq!(store.count_active_applications(&posting.id).expect("count"), 1);
        assert_eq!(store.delete_job(&posting.id).expect("job deleted"), 2);
        assert!(store.fetch_job(&posting.id).expect("fetch").is_none());
        assert!(store
            .applications_for_job_seeker(&seeker)
            .expect("list")
            .is_empty());
        assert!(matches!(
            store.delete_job(&posting.id),
            Err(RepositoryError::NotFound)
        ));
    }

    fn one_profile_per_user(store: &impl PortalStore) {
        let user = UserId::new();
        let stored = store.insert_employer(employer(user)).expect("profile stored");
        assert!(matches!(
            store.insert_employer(employer(user)),
            Err(RepositoryError::Conflict)
        ));
        let found = store
            .employer_by_user(&user)
            .expect("lookup works")
            .expect("profile exists");
        assert_eq!(found.id, stored.id);
    }

    fn run_contract(store: &impl PortalStore) {
        rejects_duplicate_pairs(store);
        replace_detects_stale_writes(store);
        same_status_writers_still_race(store);
        rejects_applications_for_missing_jobs(store);
        delete_cascades_and_frees_the_pair(store);
        one_profile_per_user(store);
    }

    #[test]
    fn memory_store_honours_repository_contract() {
        run_contract(&MemoryStore::new());
    }

    #[test]
    fn sqlite_store_honours_repository_contract() {
        run_contract(&SqliteStore::open_in_memory().expect("sqlite opens"));
    }

    #[test]
    fn sqlite_store_persists_across_reopen() {
        let dir = std::env::temp_dir().join(format!("job-portal-{}", UserId::new()));
        let path = dir.join("portal.db");
        let posting = {
            let store = SqliteStore::open(&path).expect("sqlite opens");
            store.insert_job(job(EmployerId::new())).expect("job stored")
        };

        let reopened = SqliteStore::open(&path).expect("sqlite reopens");
        let fetched = reopened
            .fetch_job(&posting.id)
            .expect("fetch works")
            .expect("job persisted");
        assert_eq!(fetched, posting);
        assert_eq!(reopened.published_jobs().expect("list").len(), 1);

        drop(reopened);
        let _ = std::fs::remove_dir_all(dir);
    }
}
