use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use super::domain::{JobDraft, JobUpdate, JobView};
use super::search::JobSearch;
use super::service::JobService;
use crate::auth::Identity;
use crate::error::ServiceError;
use crate::ids::JobId;
use crate::repository::PortalStore;

type Service<S> = State<Arc<JobService<S>>>;

pub fn job_router<S>(service: Arc<JobService<S>>) -> Router
where
    S: PortalStore + 'static,
{
    Router::new()
        .route("/jobs", get(search_handler::<S>).post(create_handler::<S>))
        .route("/jobs/my-jobs", get(mine_handler::<S>))
        .route(
            "/jobs/:job_id",
            get(get_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .with_state(service)
}

async fn search_handler<S>(
    State(service): Service<S>,
    Query(search): Query<JobSearch>,
) -> Result<Json<Vec<JobView>>, ServiceError>
where
    S: PortalStore + 'static,
{
    service.search(&search).map(Json)
}

async fn get_handler<S>(
    State(service): Service<S>,
    Path(job_id): Path<JobId>,
) -> Result<Json<JobView>, ServiceError>
where
    S: PortalStore + 'static,
{
    service.get(&job_id).map(Json)
}

async fn mine_handler<S>(
    State(service): Service<S>,
    identity: Identity,
) -> Result<Json<Vec<JobView>>, ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    service.mine(&actor).map(Json)
}

async fn create_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Json(draft): Json<JobDraft>,
) -> Result<(StatusCode, Json<JobView>), ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    let created = service.create(&actor, draft)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Path(job_id): Path<JobId>,
    Json(update): Json<JobUpdate>,
) -> Result<Json<JobView>, ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    service.update(&actor, &job_id, update).map(Json)
}

async fn delete_handler<S>(
    State(service): Service<S>,
    identity: Identity,
    Path(job_id): Path<JobId>,
) -> Result<Json<Value>, ServiceError>
where
    S: PortalStore + 'static,
{
    let actor = service.actor(&identity)?;
    let removed = service.delete(&actor, &job_id)?;
    Ok(Json(json!({
        "job_id": job_id,
        "removed_applications": removed,
    })))
}
