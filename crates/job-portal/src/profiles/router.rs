use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::domain::{
    EmployerDraft, EmployerListing, EmployerProfile, EmployerUpdate, JobSeekerDraft,
    JobSeekerListing, JobSeekerProfile, JobSeekerUpdate,
};
use super::filter::{EmployerFilter, JobSeekerFilter};
use super::service::ProfileService;
use crate::auth::Identity;
use crate::error::ServiceError;
use crate::repository::PortalStore;

type Service<S> = State<Arc<ProfileService<S>>>;

pub fn profile_router<S>(service: Arc<ProfileService<S>>) -> Router
where
    S: PortalStore + 'static,
{
    Router::new()
        .route(
            "/employers",
            get(employers_handler::<S>).post(create_employer_handler::<S>),
        )
        .route(
            "/employers/profile",
            get(employer_profile_handler::<S>).put(update_employer_handler::<S>),
        )
        .route(
            "/jobseekers",
            get(job_seekers_handler::<S>).post(create_job_seeker_handler::<S>),
        )
        .route(
            "/jobseekers/profile",
            get(job_seeker_profile_handler::<S>).put(update_job_seeker_handler::<S>),
        )
        .with_state(service)
}

async fn employers_handler<S>(
    State(service): Service<S>,
    Query(filter): Query<EmployerFilter>,
) -> Result<Json<Vec<EmployerListing>>, ServiceError>
where
    S: PortalStore + 'static,
{
    service.employers(&filter).map(Json)
}

async fn create_employer_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Json(draft): Json<EmployerDraft>,
) -> Result<(StatusCode, Json<EmployerProfile>), ServiceError>
where
    S: PortalStore + 'static,
{
    let created = service.create_employer(&identity, draft)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn employer_profile_handler<S>(
    State(service): Service<S>,
    identity: Identity,
) -> Result<Json<EmployerProfile>, ServiceError>
where
    S: PortalStore + 'static,
{
    service.employer_profile(&identity).map(Json)
}

async fn update_employer_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Json(update): Json<EmployerUpdate>,
) -> Result<Json<EmployerProfile>, ServiceError>
where
    S: PortalStore + 'static,
{
    service.update_employer(&identity, update).map(Json)
}

async fn job_seekers_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Query(filter): Query<JobSeekerFilter>,
) -> Result<Json<Vec<JobSeekerListing>>, ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    service.job_seekers(&actor, &filter).map(Json)
}

async fn create_job_seeker_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Json(draft): Json<JobSeekerDraft>,
) -> Result<(StatusCode, Json<JobSeekerProfile>), ServiceError>
where
    S: PortalStore + 'static,
{
    let created = service.create_job_seeker(&identity, draft)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn job_seeker_profile_handler<S>(
    State(service): Service<S>,
    identity: Identity,
) -> Result<Json<JobSeekerProfile>, ServiceError>
where
    S: PortalStore + 'static,
{
    service.job_seeker_profile(&identity).map(Json)
}

async fn update_job_seeker_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Json(update): Json<JobSeekerUpdate>,
) -> Result<Json<JobSeekerProfile>, ServiceError>
where
    S: PortalStore + 'static,
{
    service.update_job_seeker(&identity, update).map(Json)
}
