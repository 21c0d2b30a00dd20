use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use rolegate_core::AppError;

use crate::context::RequestContext;
use crate::modules::directory::Directory;

use super::model::{ForgetPasswordDto, LoginDto, RegisterDto};
use super::service;

pub async fn register(directory: &Directory, ctx: RequestContext) -> Result<Response, AppError> {
    let dto: RegisterDto = ctx.parse()?;
    let user = service::register_user(&directory.store, dto, directory.hash_cost).await?;
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

pub async fn login(directory: &Directory, ctx: RequestContext) -> Result<Response, AppError> {
    let dto: LoginDto = ctx.parse()?;
    let response = service::login_user(
        &directory.store,
        dto,
        &directory.jwt_config,
        directory.hash_cost,
    )
    .await?;
    Ok(Json(response).into_response())
}

pub async fn forget_password(
    directory: &Directory,
    ctx: RequestContext,
) -> Result<Response, AppError> {
    let dto: ForgetPasswordDto = ctx.parse()?;
    let response =
        service::forget_password(&directory.store, dto, &directory.jwt_config).await?;
    Ok(Json(response).into_response())
}
