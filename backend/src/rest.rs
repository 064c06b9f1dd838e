//! HTTP boundary: application state, handlers for every schedule
//! operation, and the mapping from domain errors to responses.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use shared::{NotificationsResponse, ScheduleInput, ScheduleListRequest};
use tracing::{error, info};

use crate::auth::{AccessPolicy, Action, Authenticated};
use crate::db::DbConnection;
use crate::domain::error::DomainError;
use crate::domain::schedule_service::{self, ScheduleService};
use crate::domain::{ChildService, NotificationQueue};
use crate::storage::UserRepository;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub schedule_service: ScheduleService,
    pub child_service: ChildService,
    pub notifications: NotificationQueue,
    pub users: UserRepository,
    pub policy: AccessPolicy,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        Self {
            schedule_service: ScheduleService::new(db.clone()),
            child_service: ChildService::new(db.clone()),
            notifications: NotificationQueue::new(db.clone()),
            users: UserRepository::new(db),
            policy: AccessPolicy,
        }
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        match self {
            DomainError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Authentication required").into_response()
            }
            DomainError::AccessDenied(_) => {
                (StatusCode::FORBIDDEN, self.to_string()).into_response()
            }
            DomainError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            DomainError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": fields })),
            )
                .into_response(),
            DomainError::Internal(e) => {
                error!("Internal error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Query parameters for the schedule list endpoint
#[derive(Deserialize, Debug)]
pub struct ScheduleListQuery {
    pub child_id: Option<String>,
    pub day: Option<u8>,
}

/// Axum handler function for GET /api/schedule
pub async fn list_schedules(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Query(query): Query<ScheduleListQuery>,
) -> Result<Response, DomainError> {
    info!("GET /api/schedule - query: {:?}", query);
    state.policy.has_access_or_fail(&user, Action::List)?;

    let request = ScheduleListRequest {
        child_id: query.child_id,
        day: query.day,
    };
    let response = state.schedule_service.list(request).await?;
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Axum handler function for GET /api/schedule/create
pub async fn create_form(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
) -> Result<Response, DomainError> {
    info!("GET /api/schedule/create");
    state.policy.has_access_or_fail(&user, Action::Create)?;

    let response = state.schedule_service.create_form().await?;
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Axum handler function for GET /api/schedule/:id/edit
pub async fn edit_form(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
) -> Result<Response, DomainError> {
    info!("GET /api/schedule/{}/edit", id);
    state.policy.has_access_or_fail(&user, Action::Update)?;

    let response = state.schedule_service.edit_form(&id).await?;
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Axum handler function for POST /api/schedule
pub async fn store(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Json(input): Json<ScheduleInput>,
) -> Result<Response, DomainError> {
    info!("POST /api/schedule");
    state.policy.has_access_or_fail(&user, Action::Create)?;

    let response = state.schedule_service.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Axum handler function for PUT /api/schedule/:id
pub async fn update(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
    Json(input): Json<ScheduleInput>,
) -> Result<Response, DomainError> {
    info!("PUT /api/schedule/{}", id);
    state.policy.has_access_or_fail(&user, Action::Update)?;

    let response = state.schedule_service.update(&user, &id, input).await?;
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Axum handler function for DELETE /api/schedule/:id
pub async fn destroy(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
) -> Result<Response, DomainError> {
    info!("DELETE /api/schedule/{}", id);
    state.policy.has_access_or_fail(&user, Action::Delete)?;

    state.schedule_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Axum handler function for GET /api/schedule/:id/clone.
/// Redirects to the new entry's edit view, and only once the duplicate is
/// confirmed persisted.
pub async fn clone_schedule(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
) -> Result<Response, DomainError> {
    info!("GET /api/schedule/{}/clone", id);
    state.policy.has_access_or_fail(&user, Action::Clone)?;

    let entry = state.schedule_service.clone_entry(&id).await?;
    Ok(Redirect::to(&schedule_service::edit_path(&entry.id)).into_response())
}

/// Axum handler function for GET /api/children
pub async fn list_children(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
) -> Result<Response, DomainError> {
    info!("GET /api/children");
    state.policy.has_access_or_fail(&user, Action::List)?;

    let children = state.child_service.list_children().await?;
    let dtos: Vec<shared::Child> = children.iter().map(|c| c.to_dto()).collect();
    Ok((StatusCode::OK, Json(dtos)).into_response())
}

/// Axum handler function for GET /api/notifications
pub async fn notifications(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
) -> Result<Response, DomainError> {
    let messages = state.notifications.drain(&user.id).await?;
    Ok((StatusCode::OK, Json(NotificationsResponse { messages })).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthUser, Role, USER_ID_HEADER};
    use crate::domain::models::Child;
    use crate::storage::{ChildRepository, ScheduleRepository};
    use axum::extract::FromRequestParts;
    use axum::http::{header::LOCATION, Request};

    struct TestContext {
        state: AppState,
        schedules: ScheduleRepository,
        admin: AuthUser,
        viewer: AuthUser,
        child_id: String,
    }

    async fn setup() -> TestContext {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let state = AppState::new(db.clone());

        let admin = AuthUser {
            id: "user::admin".to_string(),
            name: "Pentadbir".to_string(),
            role: Role::Admin,
        };
        let viewer = AuthUser {
            id: "user::viewer".to_string(),
            name: "Pemerhati".to_string(),
            role: Role::Viewer,
        };
        state.users.store_user(&admin).await.expect("Failed to seed admin");
        state.users.store_user(&viewer).await.expect("Failed to seed viewer");

        let child = Child {
            id: Child::generate_id(),
            name: "Aiman".to_string(),
        };
        ChildRepository::new(db.clone())
            .store_child(&child)
            .await
            .expect("Failed to seed child");

        TestContext {
            state,
            schedules: ScheduleRepository::new(db),
            admin,
            viewer,
            child_id: child.id,
        }
    }

    fn input(child_id: &str) -> ScheduleInput {
        ScheduleInput {
            child_id: child_id.to_string(),
            day: 3,
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            name: "Matematik".to_string(),
            class_url: None,
            user_id: None,
            save_action: None,
        }
    }

    #[tokio::test]
    async fn store_returns_created_for_an_admin() {
        let ctx = setup().await;

        let response = store(
            State(ctx.state.clone()),
            Authenticated(ctx.admin.clone()),
            Json(input(&ctx.child_id)),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn store_is_denied_for_a_viewer() {
        let ctx = setup().await;

        let result = store(
            State(ctx.state.clone()),
            Authenticated(ctx.viewer.clone()),
            Json(input(&ctx.child_id)),
        )
        .await;

        assert!(matches!(result, Err(DomainError::AccessDenied(_))));
        assert_eq!(ctx.schedules.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn clone_redirects_to_the_new_entry_edit_view() {
        let ctx = setup().await;
        let created = ctx
            .state
            .schedule_service
            .create(&ctx.admin, input(&ctx.child_id))
            .await
            .unwrap()
            .entry;

        let response = clone_schedule(
            State(ctx.state.clone()),
            Authenticated(ctx.admin.clone()),
            Path(created.id.clone()),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response
            .headers()
            .get(LOCATION)
            .expect("redirect should carry a location")
            .to_str()
            .unwrap()
            .to_string();
        assert!(location.starts_with("/api/schedule/"));
        assert!(location.ends_with("/edit"));
        assert!(!location.contains(&created.id), "redirect must target the clone");
    }

    #[tokio::test]
    async fn clone_is_denied_for_a_viewer_before_any_write() {
        let ctx = setup().await;
        let created = ctx
            .state
            .schedule_service
            .create(&ctx.admin, input(&ctx.child_id))
            .await
            .unwrap()
            .entry;

        let result = clone_schedule(
            State(ctx.state.clone()),
            Authenticated(ctx.viewer.clone()),
            Path(created.id),
        )
        .await;

        assert!(matches!(result, Err(DomainError::AccessDenied(_))));
        assert_eq!(ctx.schedules.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn clone_of_unknown_id_is_not_found() {
        let ctx = setup().await;

        let result = clone_schedule(
            State(ctx.state.clone()),
            Authenticated(ctx.admin.clone()),
            Path("schedule::missing".to_string()),
        )
        .await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
        assert_eq!(ctx.schedules.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_handler_allows_a_viewer() {
        let ctx = setup().await;

        let response = list_schedules(
            State(ctx.state.clone()),
            Authenticated(ctx.viewer.clone()),
            Query(ScheduleListQuery {
                child_id: None,
                day: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn destroy_returns_no_content() {
        let ctx = setup().await;
        let created = ctx
            .state
            .schedule_service
            .create(&ctx.admin, input(&ctx.child_id))
            .await
            .unwrap()
            .entry;

        let response = destroy(
            State(ctx.state.clone()),
            Authenticated(ctx.admin.clone()),
            Path(created.id),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn validation_errors_render_as_unprocessable_entity() {
        let err = DomainError::validation("day", "day must be between 1 and 7");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unknown_or_missing_user_is_unauthorized() {
        let ctx = setup().await;

        let request = Request::builder()
            .uri("/api/schedule")
            .header(USER_ID_HEADER, "user::ghost")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        let result = Authenticated::from_request_parts(&mut parts, &ctx.state).await;
        assert!(matches!(result, Err(DomainError::Unauthorized)));

        let request = Request::builder().uri("/api/schedule").body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        let result = Authenticated::from_request_parts(&mut parts, &ctx.state).await;
        assert!(matches!(result, Err(DomainError::Unauthorized)));
    }

    #[tokio::test]
    async fn known_user_is_resolved_by_the_extractor() {
        let ctx = setup().await;

        let request = Request::builder()
            .uri("/api/schedule")
            .header(USER_ID_HEADER, &ctx.admin.id)
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        let Authenticated(user) = Authenticated::from_request_parts(&mut parts, &ctx.state)
            .await
            .expect("seeded user should authenticate");
        assert_eq!(user, ctx.admin);
    }
}
