use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use minibank_core::AccountId;

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::AccountContext;

pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreateAccountRequest>, JsonRejection>,
) -> Result<axum::response::Response, ApiError> {
    let Json(body) = body?;

    let (account, token) = services
        .create_account(body.first_name, body.last_name, body.secret)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "account": dto::account_to_json(&account),
            "token": token,
        })),
    )
        .into_response())
}

/// Scoped to the caller: the list holds only the account its token names.
pub async fn list_accounts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<AccountContext>,
) -> Result<axum::response::Response, ApiError> {
    let items = services
        .list_accounts(caller.claims())
        .await?
        .iter()
        .map(dto::account_to_json)
        .collect::<Vec<_>>();
    Ok((StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response())
}

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<AccountContext>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let id: AccountId = id.parse()?;
    let account = services.get_account(caller.claims(), id).await?;
    Ok((StatusCode::OK, Json(dto::account_to_json(&account))).into_response())
}

pub async fn delete_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<AccountContext>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, ApiError> {
    let id: AccountId = id.parse()?;
    services.delete_account(caller.claims(), id).await?;
    Ok((StatusCode::OK, Json(serde_json::json!({ "deleted": id }))).into_response())
}
