use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use minibank_accounts::TransferRequest;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::AccountContext;

/// Credit `toAccount` with `amount`. Any valid token may do this; no source
/// account is debited.
pub async fn transfer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<AccountContext>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<axum::response::Response, ApiError> {
    let Json(request) = body?;
    tracing::debug!(caller = %caller.account_number(), to_account = %request.to_account, "transfer requested");
    let confirmation = services.transfer(request).await?;
    Ok((StatusCode::OK, Json(confirmation)).into_response())
}
