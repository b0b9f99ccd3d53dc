use std::sync::Arc;

use axum::{Extension, Router};

use crate::applications::{application_router, ApplicationService};
use crate::auth::Authenticator;
use crate::jobs::{job_router, JobService};
use crate::profiles::{profile_router, ProfileService};
use crate::repository::PortalStore;

pub const API_PREFIX: &str = "/api/v1";

/// Every portal route under [`API_PREFIX`], sharing one store. Authenticated handlers read the
/// [`Authenticator`] from the request extensions.
pub fn portal_router<S>(store: Arc<S>, authenticator: Arc<Authenticator>) -> Router
where
    S: PortalStore + 'static,
{
    let api = Router::new()
        .merge(job_router(Arc::new(JobService::new(store.clone()))))
        .merge(profile_router(Arc::new(ProfileService::new(store.clone()))))
        .merge(application_router(Arc::new(ApplicationService::new(store))));

    Router::new()
        .nest(API_PREFIX, api)
        .layer(Extension(authenticator))
}
