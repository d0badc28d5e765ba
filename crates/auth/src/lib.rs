//! `minibank-auth` — bearer tokens and account ownership checks.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod claims;
pub mod token;

pub use authorize::{authorize_owner, AuthzError, DenialReason};
pub use claims::{validate_claims, AccountClaims, TokenValidationError};
pub use token::{Hs256Jwt, JwtIssuer, JwtValidator, TokenIssueError};
