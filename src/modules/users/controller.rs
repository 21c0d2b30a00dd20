use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use rolegate_core::AppError;

use crate::context::RequestContext;
use crate::modules::directory::Directory;
use crate::validator::ResourceId;

use super::model::{CreateUserDto, UpdateUserDto};
use super::service;

pub async fn list_users(directory: &Directory, _ctx: RequestContext) -> Result<Response, AppError> {
    let users = service::list_users(&directory.store).await;
    Ok(Json(users).into_response())
}

pub async fn get_user(directory: &Directory, ctx: RequestContext) -> Result<Response, AppError> {
    let ResourceId { id } = ctx.parse()?;
    let user = service::get_user(&directory.store, id).await?;
    Ok(Json(user).into_response())
}

pub async fn create_user(directory: &Directory, ctx: RequestContext) -> Result<Response, AppError> {
    let dto: CreateUserDto = ctx.parse()?;
    let user = service::create_user(&directory.store, dto, directory.hash_cost).await?;
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

pub async fn update_user(directory: &Directory, ctx: RequestContext) -> Result<Response, AppError> {
    let dto: UpdateUserDto = ctx.parse()?;
    let user = service::update_user(&directory.store, dto).await?;
    Ok(Json(user).into_response())
}

pub async fn delete_user(directory: &Directory, ctx: RequestContext) -> Result<Response, AppError> {
    let ResourceId { id } = ctx.parse()?;
    service::delete_user(&directory.store, id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
