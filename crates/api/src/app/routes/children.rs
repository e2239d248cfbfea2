use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use lumora_auth::{Permission, Role};
use lumora_core::{AccountId, ChildId, ChildRecord, ProgressSnapshot};

use crate::app::dto::{CreateChildRequest, RecordProgressRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

/// POST /api/children - register a child under the calling parent.
pub async fn create(
    Extension(services): Extension<AppServices>,
    Extension(principal): Extension<PrincipalContext>,
    payload: Result<Json<CreateChildRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChildRecord>), ApiError> {
    authz::require(&principal, Permission::ChildrenCreate)?;
    let Json(req) = payload?;

    let school_id = match req.school_id.as_deref() {
        Some(raw) => Some(resolve_school(&services, raw).await?),
        None => None,
    };

    let child = ChildRecord::new(&req.name, req.age, principal.account_id(), school_id, Utc::now())?;
    let child = services.children.insert(child).await?;

    tracing::info!(child_id = %child.id, parent_id = %child.parent_id, "child registered");
    Ok((StatusCode::CREATED, Json(child)))
}

/// GET /api/children - children the caller is parent or school of.
pub async fn list(
    Extension(services): Extension<AppServices>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Json<Vec<ChildRecord>>, ApiError> {
    authz::require(&principal, Permission::ChildrenRead)?;
    let children = services.children.list_visible_to(principal.account_id()).await?;
    Ok(Json(children))
}

/// POST /api/children/:id/progress - append a prediction snapshot.
pub async fn record_progress(
    Extension(services): Extension<AppServices>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    payload: Result<Json<RecordProgressRequest>, JsonRejection>,
) -> Result<Json<ChildRecord>, ApiError> {
    authz::require(&principal, Permission::ProgressWrite)?;
    let id: ChildId = id.parse()?;
    let Json(req) = payload?;

    let child = services
        .children
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("child not found".to_string()))?;

    if !child.is_visible_to(principal.account_id()) {
        return Err(ApiError::Forbidden(
            "only the child's parent or school may record progress".to_string(),
        ));
    }

    let snapshot = ProgressSnapshot {
        recorded_at: Utc::now(),
        recorded_by: principal.account_id(),
        prediction: req.prediction,
    };
    let child = services.children.append_progress(id, snapshot).await?;

    Ok(Json(child))
}

/// A linked school must be an existing account with the school role.
async fn resolve_school(services: &AppServices, raw: &str) -> Result<AccountId, ApiError> {
    let id: AccountId = raw.parse()?;
    match services.accounts.find_by_id(id).await? {
        Some(account) if account.role == Role::School => Ok(id),
        _ => Err(ApiError::Validation(
            "school_id must reference a school account".to_string(),
        )),
    }
}
