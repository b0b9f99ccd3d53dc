//! End-to-end lifecycle through the public router: profiles, a posting, an application and the
//! employer's decisions, backed by the SQLite store.

mod common {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use chrono::Duration;
    use serde_json::Value;
    use tower::ServiceExt;

    use job_portal::auth::{Authenticator, Identity, Role};
    use job_portal::ids::UserId;
    use job_portal::portal_router;
    use job_portal::store::SqliteStore;

    pub(super) struct Client {
        router: Router,
        authenticator: Arc<Authenticator>,
    }

    pub(super) fn client() -> Client {
        let store = Arc::new(SqliteStore::open_in_memory().expect("sqlite opens"));
        let authenticator = Arc::new(Authenticator::from_secret(
            b"lifecycle-integration",
            Duration::minutes(15),
        ));
        Client {
            router: portal_router(store, authenticator.clone()),
            authenticator,
        }
    }

    pub(super) fn user(role: Role) -> Identity {
        Identity {
            user_id: UserId::new(),
            role,
        }
    }

    impl Client {
        pub(super) async fn send(
            &self,
            method: Method,
            uri: &str,
            identity: Option<Identity>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut request = Request::builder().method(method).uri(uri);
            if let Some(identity) = identity {
                let token = self.authenticator.issue(identity).expect("token issues");
                request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let request = match body {
                Some(body) => request
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string())),
                None => request.body(Body::empty()),
            }
            .expect("request builds");

            let response = self
                .router
                .clone()
                .oneshot(request)
                .await
                .expect("route executes");
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), 256 * 1024)
                .await
                .expect("read body");
            (status, serde_json::from_slice(&bytes).expect("json payload"))
        }
    }
}

use axum::http::{Method, StatusCode};
use common::{client, user};
use job_portal::auth::Role;
use serde_json::json;

fn employer_profile() -> serde_json::Value {
    json!({
        "company_name": "Northwind Logistics",
        "industry": "Transportation",
        "company_size": "201-500",
        "company_description": "Cold-chain freight across the Midwest",
        "inclusivity_programs": ["veteran-program"],
        "workplace_features": { "remote_work_policy": "hybrid", "flexible_hours": true }
    })
}

fn job_seeker_profile() -> serde_json::Value {
    json!({
        "category": "veteran",
        "skills": ["Fleet management", "Routing"],
        "resume_url": "https://cdn.example.com/resumes/jordan.pdf",
        "availability": { "immediate": true }
    })
}

fn posting(status: &str) -> serde_json::Value {
    json!({
        "title": "Fleet Supervisor",
        "description": "Lead a team of twelve drivers",
        "requirements": { "skills": ["Fleet management"] },
        "employment_type": "full-time",
        "workplace_type": "hybrid",
        "location": { "city": "Omaha", "country": "US" },
        "salary": { "min": 70000, "max": 85000 },
        "accommodations": { "available": true },
        "status": status
    })
}

#[tokio::test]
async fn candidate_journey_from_posting_to_withdrawal() {
    let client = client();
    let employer = user(Role::Employer);
    let seeker = user(Role::JobSeeker);

    let (status, _) = client
        .send(Method::POST, "/api/v1/employers", Some(employer), Some(employer_profile()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, profile) = client
        .send(Method::POST, "/api/v1/jobseekers", Some(seeker), Some(job_seeker_profile()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        profile["resume"]["url"],
        "https://cdn.example.com/resumes/jordan.pdf"
    );

    let (status, job) = client
        .send(Method::POST, "/api/v1/jobs", Some(employer), Some(posting("draft")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let job_id = job["id"].as_str().expect("job id").to_string();
    assert!(job["published_at"].is_null());

    let (status, listed) = client.send(Method::GET, "/api/v1/jobs", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));

    let application_body = json!({ "job_id": job_id, "cover_letter": "Twelve years on the road" });
    let (status, _) = client
        .send(
            Method::POST,
            "/api/v1/applications",
            Some(seeker),
            Some(application_body.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "drafts do not take applications");

    let (status, job) = client
        .send(
            Method::PUT,
            &format!("/api/v1/jobs/{job_id}"),
            Some(employer),
            Some(json!({ "status": "published" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(job["published_at"].is_string());

    let (status, application) = client
        .send(
            Method::POST,
            "/api/v1/applications",
            Some(seeker),
            Some(application_body.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let application_id = application["id"].as_str().expect("application id").to_string();

    let (_, job) = client
        .send(Method::GET, &format!("/api/v1/jobs/{job_id}"), None, None)
        .await;
    assert_eq!(job["applications_count"], 1);

    let (status, shortlisted) = client
        .send(
            Method::PUT,
            &format!("/api/v1/applications/{application_id}"),
            Some(employer),
            Some(json!({ "status": "shortlisted", "note": "fast-track" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shortlisted["status_history"].as_array().map(Vec::len), Some(1));
    assert_eq!(shortlisted["notes"][0]["content"], "fast-track");

    let (status, withdrawn) = client
        .send(
            Method::PUT,
            &format!("/api/v1/applications/{application_id}/withdraw"),
            Some(seeker),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(withdrawn["status"], "withdrawn");

    let (status, _) = client
        .send(
            Method::PUT,
            &format!("/api/v1/applications/{application_id}/withdraw"),
            Some(seeker),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, job) = client
        .send(Method::GET, &format!("/api/v1/jobs/{job_id}"), None, None)
        .await;
    assert_eq!(job["applications_count"], 0);

    let (status, dashboard) = client
        .send(Method::GET, "/api/v1/applications/dashboard", Some(seeker), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["total_applications"], 1);
    assert_eq!(dashboard["role"], "jobseeker");
}

#[tokio::test]
async fn deleting_a_job_cascades_to_its_applications() {
    let client = client();
    let employer = user(Role::Employer);
    let seeker = user(Role::JobSeeker);
    client
        .send(Method::POST, "/api/v1/employers", Some(employer), Some(employer_profile()))
        .await;
    client
        .send(Method::POST, "/api/v1/jobseekers", Some(seeker), Some(job_seeker_profile()))
        .await;

    let (_, job) = client
        .send(Method::POST, "/api/v1/jobs", Some(employer), Some(posting("published")))
        .await;
    let job_id = job["id"].as_str().expect("job id").to_string();
    let (status, application) = client
        .send(
            Method::POST,
            "/api/v1/applications",
            Some(seeker),
            Some(json!({ "job_id": job_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let application_id = application["id"].as_str().expect("application id").to_string();

    let intruder = user(Role::Employer);
    let mut other_profile = employer_profile();
    other_profile["company_name"] = json!("Rival Freight");
    client
        .send(Method::POST, "/api/v1/employers", Some(intruder), Some(other_profile))
        .await;
    let (status, _) = client
        .send(Method::DELETE, &format!("/api/v1/jobs/{job_id}"), Some(intruder), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, deleted) = client
        .send(Method::DELETE, &format!("/api/v1/jobs/{job_id}"), Some(employer), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["removed_applications"], 1);

    let (status, _) = client
        .send(
            Method::GET,
            &format!("/api/v1/applications/{application_id}"),
            Some(seeker),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, mine) = client
        .send(Method::GET, "/api/v1/applications/my-applications", Some(seeker), None)
        .await;
    assert_eq!(mine, json!([]));
}

#[tokio::test]
async fn candidate_search_requires_an_employer_profile() {
    let client = client();
    let employer = user(Role::Employer);
    let seeker = user(Role::JobSeeker);
    client
        .send(Method::POST, "/api/v1/jobseekers", Some(seeker), Some(job_seeker_profile()))
        .await;

    let (status, _) = client
        .send(Method::GET, "/api/v1/jobseekers", Some(seeker), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = client
        .send(Method::GET, "/api/v1/jobseekers", Some(employer), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    client
        .send(Method::POST, "/api/v1/employers", Some(employer), Some(employer_profile()))
        .await;
    let (status, found) = client
        .send(
            Method::GET,
            "/api/v1/jobseekers?skills=routing&category=veteran&availability=true",
            Some(employer),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().map(Vec::len), Some(1));
    assert!(found[0].get("resume").is_none());
}
