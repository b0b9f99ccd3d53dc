use chrono::{Duration, Utc};
use clap::Args;
use job_portal::applications::{
    ApplicationService, ApplicationStatus, InterviewOutcome, InterviewStatus, InterviewType,
    ScheduleInterview, StatusUpdate, SubmitApplication, Withdrawal,
};
use job_portal::auth::{Identity, Role};
use job_portal::error::{AppError, ServiceError};
use job_portal::ids::UserId;
use job_portal::jobs::{
    Accommodations, EmploymentType, JobDraft, JobLocation, JobService, JobStatus, Requirements,
    SalaryRange, WorkplaceType,
};
use job_portal::profiles::domain::{
    Accessibility, Availability, CompanySize, EmployerDraft, InclusivityProgram, JobSeekerDraft,
    Preferences, SeekerCategory,
};
use job_portal::profiles::ProfileService;
use job_portal::store::MemoryStore;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Have the candidate withdraw after the interview instead of being hired
    #[arg(long)]
    pub(crate) withdraw: bool,
    /// Skip the interview round and decide straight after review
    #[arg(long)]
    pub(crate) skip_interview: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Job portal application lifecycle demo");
    if let Err(err) = walk_lifecycle(&args) {
        println!("  Demo stopped: {} ({})", err, err.kind());
    }
    Ok(())
}

fn user(role: Role) -> Identity {
    Identity {
        user_id: UserId::new(),
        role,
    }
}

fn walk_lifecycle(args: &DemoArgs) -> Result<(), ServiceError> {
    let store = Arc::new(MemoryStore::new());
    let profiles = ProfileService::new(store.clone());
    let jobs = JobService::new(store.clone());
    let applications = ApplicationService::new(store);

    let employer_user = user(Role::Employer);
    let seeker_user = user(Role::JobSeeker);
    let company = profiles.create_employer(&employer_user, demo_employer())?;
    let candidate = profiles.create_job_seeker(&seeker_user, demo_job_seeker())?;
    println!("- Employer profile {} ({})", company.id, company.company_name);
    println!(
        "- Job seeker profile {} ({} skills)",
        candidate.id,
        candidate.skills.len()
    );

    let employer = applications.actor(&employer_user)?;
    let seeker = applications.actor(&seeker_user)?;

    let posting = jobs.create(&employer, demo_job())?;
    println!(
        "- Published '{}' -> {} applications",
        posting.job.title, posting.applications_count
    );

    let submitted = applications.submit(
        &seeker,
        SubmitApplication {
            job_id: posting.job.id,
            cover_letter: Some("Ten years keeping regional fleets on schedule.".to_string()),
            answers: Vec::new(),
        },
    )?;
    println!("- Application {} submitted -> {}", submitted.id, submitted.status);

    match applications.submit(
        &seeker,
        SubmitApplication {
            job_id: posting.job.id,
            cover_letter: None,
            answers: Vec::new(),
        },
    ) {
        Err(err) => println!("  Second submission refused: {err}"),
        Ok(duplicate) => println!("  Unexpected duplicate {}", duplicate.id),
    }
    println!(
        "  Job now shows {} applications",
        jobs.get(&posting.job.id)?.applications_count
    );

    let reviewed = applications.update_status(
        &employer,
        &submitted.id,
        StatusUpdate {
            status: ApplicationStatus::Reviewed,
            reason: Some("screened".to_string()),
            note: Some("Strong dispatch background".to_string()),
        },
    )?;
    println!("- Employer review -> {}", reviewed.status);

    if !args.skip_interview {
        let scheduled = applications.schedule_interview(
            &employer,
            &submitted.id,
            ScheduleInterview {
                round: None,
                date_time: Utc::now() + Duration::days(3),
                kind: InterviewType::Video,
            },
        )?;
        println!(
            "- Interview round {} scheduled -> {}",
            scheduled.interview_schedule.len(),
            scheduled.status
        );
        applications.record_interview_outcome(
            &employer,
            &submitted.id,
            1,
            InterviewOutcome {
                status: InterviewStatus::Completed,
                feedback: Some("Clear communicator".to_string()),
                date_time: None,
            },
        )?;
        println!("  Interview round 1 completed");
    }

    let decided = if args.withdraw {
        applications.withdraw(
            &seeker,
            &submitted.id,
            Withdrawal {
                reason: Some("accepted another offer".to_string()),
            },
        )?
    } else {
        applications.update_status(
            &employer,
            &submitted.id,
            StatusUpdate {
                status: ApplicationStatus::Hired,
                reason: Some("offer accepted".to_string()),
                note: None,
            },
        )?
    };
    println!("- Final status -> {}", decided.status);

    match applications.withdraw(&seeker, &submitted.id, Withdrawal::default()) {
        Err(err) => println!("  Further changes refused: {err}"),
        Ok(application) => println!("  Unexpected change to {}", application.status),
    }

    println!("Status history:");
    for change in &decided.status_history {
        println!(
            "  - {} by {} ({})",
            change.status,
            change.updated_by.role(),
            change.reason.as_deref().unwrap_or("no reason given")
        );
    }

    let dashboard = applications.dashboard(&employer)?;
    println!(
        "Employer dashboard: {} applications across {} jobs",
        dashboard.total_applications,
        dashboard.total_jobs.unwrap_or_default()
    );
    println!(
        "  Job now shows {} applications",
        jobs.get(&posting.job.id)?.applications_count
    );
    Ok(())
}

fn demo_employer() -> EmployerDraft {
    EmployerDraft {
        company_name: "Prairie Freight Co.".to_string(),
        industry: "Logistics".to_string(),
        company_size: CompanySize::Medium,
        company_description: "Regional freight and last-mile delivery".to_string(),
        website: None,
        location: Default::default(),
        social_media: Default::default(),
        inclusivity_programs: vec![InclusivityProgram::VeteranProgram],
        workplace_features: Default::default(),
    }
}

fn demo_job_seeker() -> JobSeekerDraft {
    JobSeekerDraft {
        category: SeekerCategory::Veteran,
        skills: vec!["Dispatch".to_string(), "Fleet maintenance".to_string()],
        experience: Vec::new(),
        education: Vec::new(),
        resume_url: Some("https://cdn.example.com/resumes/demo.pdf".to_string()),
        preferences: Preferences::default(),
        accessibility: Accessibility::default(),
        availability: Availability {
            immediate: true,
            notice_period: None,
        },
    }
}

fn demo_job() -> JobDraft {
    JobDraft {
        title: "Dispatch Lead".to_string(),
        description: "Coordinate daily routes for a thirty-truck fleet".to_string(),
        requirements: Requirements {
            skills: vec!["Dispatch".to_string()],
            ..Requirements::default()
        },
        employment_type: EmploymentType::FullTime,
        workplace_type: WorkplaceType::Hybrid,
        location: JobLocation {
            city: Some("Lincoln".to_string()),
            ..JobLocation::default()
        },
        salary: SalaryRange::default(),
        benefits: Vec::new(),
        flexible_schedule: true,
        accommodations: Accommodations::default(),
        status: JobStatus::Published,
        application_deadline: None,
    }
}
