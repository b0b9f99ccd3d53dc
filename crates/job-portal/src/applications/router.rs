use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use super::dashboard::Dashboard;
use super::domain::{
    Application, ApplicationStatus, ApplicationView, InterviewOutcome, ScheduleInterview,
    StatusUpdate, SubmitApplication, Withdrawal,
};
use super::service::ApplicationService;
use crate::auth::Identity;
use crate::error::ServiceError;
use crate::ids::{ApplicationId, JobId};
use crate::repository::PortalStore;

/// Wire form of a status change; the status is checked here so unknown values surface as
/// validation errors rather than body rejections.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    status: String,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

impl TryFrom<StatusUpdateRequest> for StatusUpdate {
    type Error = ServiceError;

    fn try_from(request: StatusUpdateRequest) -> Result<Self, Self::Error> {
        let status = request
            .status
            .parse::<ApplicationStatus>()
            .map_err(ServiceError::Validation)?;
        Ok(StatusUpdate {
            status,
            reason: request.reason,
            note: request.note,
        })
    }
}

type Service<S> = State<Arc<ApplicationService<S>>>;

/// Every `/applications` route; nested under the API prefix by the portal router.
pub fn application_router<S>(service: Arc<ApplicationService<S>>) -> Router
where
    S: PortalStore + 'static,
{
    Router::new()
        .route("/applications", post(submit_handler::<S>))
        .route("/applications/me", get(mine_handler::<S>))
        .route("/applications/my-applications", get(recent_handler::<S>))
        .route("/applications/received", get(received_handler::<S>))
        .route("/applications/dashboard", get(dashboard_handler::<S>))
        .route("/applications/job/:job_id", get(job_handler::<S>))
        .route(
            "/applications/:application_id",
            get(get_handler::<S>).put(status_handler::<S>),
        )
        .route(
            "/applications/:application_id/withdraw",
            put(withdraw_handler::<S>),
        )
        .route(
            "/applications/:application_id/interview",
            post(schedule_handler::<S>),
        )
        .route(
            "/applications/:application_id/interview/:round",
            put(outcome_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Json(submission): Json<SubmitApplication>,
) -> Result<(StatusCode, Json<Application>), ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    let application = service.submit(&actor, submission)?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub(crate) async fn status_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Path(application_id): Path<ApplicationId>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<Application>, ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    let update = StatusUpdate::try_from(request)?;
    service
        .update_status(&actor, &application_id, update)
        .map(Json)
}

async fn withdraw_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Path(application_id): Path<ApplicationId>,
    Json(withdrawal): Json<Withdrawal>,
) -> Result<Json<Application>, ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    service
        .withdraw(&actor, &application_id, withdrawal)
        .map(Json)
}

async fn schedule_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Path(application_id): Path<ApplicationId>,
    Json(request): Json<ScheduleInterview>,
) -> Result<Json<Application>, ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    service
        .schedule_interview(&actor, &application_id, request)
        .map(Json)
}

async fn outcome_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Path((application_id, round)): Path<(ApplicationId, u32)>,
    Json(outcome): Json<InterviewOutcome>,
) -> Result<Json<Application>, ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    service
        .record_interview_outcome(&actor, &application_id, round, outcome)
        .map(Json)
}

async fn get_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Path(application_id): Path<ApplicationId>,
) -> Result<Json<ApplicationView>, ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    service.get(&actor, &application_id).map(Json)
}

async fn job_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Path(job_id): Path<JobId>,
) -> Result<Json<Vec<Application>>, ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    service.list_for_job(&actor, &job_id).map(Json)
}

async fn mine_handler<S>(
    State(service): Service<S>,
    identity: Identity,
) -> Result<Json<Vec<ApplicationView>>, ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    service.list_mine(&actor).map(Json)
}

async fn recent_handler<S>(
    State(service): Service<S>,
    identity: Identity,
) -> Result<Json<Vec<ApplicationView>>, ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    service.recent_mine(&actor).map(Json)
}

async fn received_handler<S>(
    State(service): Service<S>,
    identity: Identity,
) -> Result<Json<Vec<ApplicationView>>, ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    service.received(&actor).map(Json)
}

async fn dashboard_handler<S>(
    State(service): Service<S>,
    identity: Identity,
) -> Result<Json<Dashboard>, ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    service.dashboard(&actor).map(Json)
}
