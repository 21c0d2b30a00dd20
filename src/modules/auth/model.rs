use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::users::model::User;
use crate::validator::{Field, FieldType, InputSource, RequestSchema};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterDto {
    #[validate(length(min = 1, max = 100, message = "first_name must be between 1 and 100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last_name must be between 1 and 100 characters"))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

impl RequestSchema for RegisterDto {
    const SOURCE: InputSource = InputSource::Body;
    const FIELDS: &'static [Field] = &[
        Field::required("first_name", FieldType::String),
        Field::required("last_name", FieldType::String),
        Field::required("email", FieldType::String),
        Field::required("password", FieldType::String),
    ];
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginDto {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

impl RequestSchema for LoginDto {
    const SOURCE: InputSource = InputSource::Body;
    const FIELDS: &'static [Field] = &[
        Field::required("email", FieldType::String),
        Field::required("password", FieldType::String),
    ];
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgetPasswordDto {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
}

impl RequestSchema for ForgetPasswordDto {
    const SOURCE: InputSource = InputSource::Body;
    const FIELDS: &'static [Field] = &[Field::required("email", FieldType::String)];
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
