//! Error registry and the HTTP error envelope.
//!
//! Every handled failure becomes `{"code": i32, "message": String}`. The
//! numeric codes and messages are a stable contract with existing clients;
//! the HTTP status is derived from the error class.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

pub mod code {
    pub const PARSE: i32 = 20000;
    pub const DATABASE: i32 = 20001;
    pub const CONVERT: i32 = 20002;
    pub const VALIDATE: i32 = 20003;

    pub const USERNAME_OCCUPY: i32 = 30000;
    pub const USER_NOT_EXIST: i32 = 30001;

    pub const ROLE_CODE_OCCUPY: i32 = 40000;
    pub const ROLE_NOT_EXIST: i32 = 40001;

    pub const MENU_CODE_OCCUPY: i32 = 50000;
    pub const MENU_NOT_EXIST: i32 = 50001;
    pub const MENU_HAS_CHILDREN: i32 = 50002;
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("convert error: {0}")]
    Convert(String),
    #[error("validate error: {0}")]
    Validate(String),

    #[error("username occupy")]
    UsernameOccupy,
    #[error("user not exist")]
    UserNotExist,

    #[error("role code occupy")]
    RoleCodeOccupy,
    #[error("role not exist")]
    RoleNotExist,

    #[error("menu code occupy")]
    MenuCodeOccupy,
    #[error("menu not exist")]
    MenuNotExist,
    #[error("menu has children")]
    MenuHasChildren,
}

impl AppError {
    pub fn code(&self) -> i32 {
        match self {
            AppError::Parse(_) => code::PARSE,
            AppError::Database(_) => code::DATABASE,
            AppError::Convert(_) => code::CONVERT,
            AppError::Validate(_) => code::VALIDATE,
            AppError::UsernameOccupy => code::USERNAME_OCCUPY,
            AppError::UserNotExist => code::USER_NOT_EXIST,
            AppError::RoleCodeOccupy => code::ROLE_CODE_OCCUPY,
            AppError::RoleNotExist => code::ROLE_NOT_EXIST,
            AppError::MenuCodeOccupy => code::MENU_CODE_OCCUPY,
            AppError::MenuNotExist => code::MENU_NOT_EXIST,
            AppError::MenuHasChildren => code::MENU_HAS_CHILDREN,
        }
    }

    /// Client-facing message; never carries driver or parser details.
    pub fn message(&self) -> &'static str {
        match self {
            AppError::Parse(_) => "parse error",
            AppError::Database(_) => "database error",
            AppError::Convert(_) => "convert error",
            AppError::Validate(_) => "validate error",
            AppError::UsernameOccupy => "username occupy",
            AppError::UserNotExist => "user not exist",
            AppError::RoleCodeOccupy => "role code occupy",
            AppError::RoleNotExist => "role not exist",
            AppError::MenuCodeOccupy => "menu code occupy",
            AppError::MenuNotExist => "menu not exist",
            AppError::MenuHasChildren => "menu has children",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Parse(_) | AppError::Convert(_) => StatusCode::BAD_REQUEST,
            AppError::Validate(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UserNotExist | AppError::RoleNotExist | AppError::MenuNotExist => {
                StatusCode::NOT_FOUND
            }
            AppError::UsernameOccupy
            | AppError::RoleCodeOccupy
            | AppError::MenuCodeOccupy
            | AppError::MenuHasChildren => StatusCode::CONFLICT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code(),
            message: err.message().to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(err) => error!(error = %err, "database error"),
            other => warn!(code = other.code(), error = %other, "request failed"),
        }

        (self.status(), Json(ErrorResponse::from(&self))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Parse(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Parse(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Parse(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validate(errors.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
