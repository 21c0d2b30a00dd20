//! Permission record endpoints. None of these routes declares guards, so
//! every input is parsed here and failures are handler errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use rolegate_core::AppError;

use crate::context::RequestContext;
use crate::modules::directory::Directory;
use crate::validator::ResourceId;

use super::model::{CreatePermissionDto, UpdatePermissionDto};
use super::service;

pub async fn list_permissions(
    directory: &Directory,
    _ctx: RequestContext,
) -> Result<Response, AppError> {
    let permissions = service::list_permissions(&directory.store).await;
    Ok(Json(permissions).into_response())
}

pub async fn get_permission(
    directory: &Directory,
    ctx: RequestContext,
) -> Result<Response, AppError> {
    let ResourceId { id } = ctx.parse()?;
    let permission = service::get_permission(&directory.store, id).await?;
    Ok(Json(permission).into_response())
}

pub async fn create_permission(
    directory: &Directory,
    ctx: RequestContext,
) -> Result<Response, AppError> {
    let dto: CreatePermissionDto = ctx.parse()?;
    let permission = service::create_permission(&directory.store, dto).await?;
    Ok((StatusCode::CREATED, Json(permission)).into_response())
}

pub async fn update_permission(
    directory: &Directory,
    ctx: RequestContext,
) -> Result<Response, AppError> {
    let dto: UpdatePermissionDto = ctx.parse()?;
    let permission = service::update_permission(&directory.store, dto).await?;
    Ok(Json(permission).into_response())
}

pub async fn delete_permission(
    directory: &Directory,
    ctx: RequestContext,
) -> Result<Response, AppError> {
    let ResourceId { id } = ctx.parse()?;
    service::delete_permission(&directory.store, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
