//! Thin REST handlers: extract, delegate to the CRUD service, wrap the
//! result in the response envelope. Failures leave through `?` and are
//! shaped by the toolkit's translation table.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use storekit_db::CrudService;
use storekit_http::{ApiError, OperationResult, PagedResponse};
use uuid::Uuid;

use crate::domain::{ProjectCreate, ProjectFilter, ProjectMapper, ProjectPatch, ProjectView};

use super::routes::AppState;
use super::scope::CallerScope;

fn service(state: &AppState) -> CrudService<ProjectMapper> {
    CrudService::new(Arc::new(state.store.begin_work()), ProjectMapper)
}

pub async fn create_project(
    State(state): State<AppState>,
    CallerScope(scope): CallerScope,
    Json(create): Json<ProjectCreate>,
) -> Result<Json<OperationResult<Uuid>>, ApiError> {
    let id = service(&state).add(&scope, create).await?;
    Ok(Json(OperationResult::ok(id)))
}

pub async fn get_project(
    State(state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(id): Path<Uuid>,
) -> Result<Json<OperationResult<ProjectView>>, ApiError> {
    let view = service(&state).get(&scope, id).await?;
    Ok(Json(OperationResult::ok(view)))
}

pub async fn update_project(
    State(state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProjectPatch>,
) -> Result<Json<OperationResult<Uuid>>, ApiError> {
    let id = service(&state).update(&scope, id, patch).await?;
    Ok(Json(OperationResult::ok(id)))
}

pub async fn delete_project(
    State(state): State<AppState>,
    CallerScope(scope): CallerScope,
    Path(id): Path<Uuid>,
) -> Result<Json<OperationResult<Uuid>>, ApiError> {
    let id = service(&state).delete(&scope, id).await?;
    Ok(Json(OperationResult::ok(id)))
}

pub async fn list_projects(
    State(state): State<AppState>,
    CallerScope(scope): CallerScope,
    Query(filter): Query<ProjectFilter>,
) -> Result<Json<PagedResponse<ProjectView>>, ApiError> {
    let page = service(&state).get_paged(&scope, filter).await?;
    Ok(Json(page.into()))
}
