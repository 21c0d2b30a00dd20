use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use rolegate_core::AppError;

use crate::context::RequestContext;
use crate::modules::directory::Directory;
use crate::validator::ResourceId;

use super::model::{CreateRoleDto, UpdateRoleDto};
use super::service;

pub async fn list_roles(directory: &Directory, _ctx: RequestContext) -> Result<Response, AppError> {
    let roles = service::list_roles(&directory.store).await;
    Ok(Json(roles).into_response())
}

pub async fn get_role(directory: &Directory, ctx: RequestContext) -> Result<Response, AppError> {
    let ResourceId { id } = ctx.parse()?;
    let role = service::get_role(&directory.store, id).await?;
    Ok(Json(role).into_response())
}

/// No guard declares a schema for this route, so the body is checked here
/// and failures are handler errors.
pub async fn create_role(directory: &Directory, ctx: RequestContext) -> Result<Response, AppError> {
    let dto: CreateRoleDto = ctx.parse()?;
    let role = service::create_role(&directory.store, dto).await?;
    Ok((StatusCode::CREATED, Json(role)).into_response())
}

pub async fn update_role(directory: &Directory, ctx: RequestContext) -> Result<Response, AppError> {
    let dto: UpdateRoleDto = ctx.parse()?;
    let role = service::update_role(&directory.store, dto).await?;
    Ok(Json(role).into_response())
}

pub async fn delete_role(directory: &Directory, ctx: RequestContext) -> Result<Response, AppError> {
    let ResourceId { id } = ctx.parse()?;
    service::delete_role(&directory.store, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
