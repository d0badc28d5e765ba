use axum::{
    routing::{get, post},
    Router,
};

pub mod accounts;
pub mod login;
pub mod system;
pub mod transfer;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/account", post(accounts::create_account))
        .route("/login", post(login::login))
}

/// Endpoints behind the bearer-token middleware.
pub fn protected_router() -> Router {
    Router::new()
        .route("/account", get(accounts::list_accounts))
        .route(
            "/account/:id",
            get(accounts::get_account).delete(accounts::delete_account),
        )
        .route("/transfer", post(transfer::transfer))
}
