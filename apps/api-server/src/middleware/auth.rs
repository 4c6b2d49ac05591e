//! Session cookie handling and the authentication extractor.

use std::future::{Ready, ready};

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};

use nexthire_core::ports::{AuthError, TokenClaims};

use crate::config::Environment;
use crate::middleware::error::AppError;
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "token";

/// Attributes of the session cookie.
///
/// Production frontends live on another site, so the cookie must be
/// `Secure; SameSite=None` there; local development uses `SameSite=Strict`.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookiePolicy {
    pub fn for_environment(environment: Environment) -> Self {
        if environment.is_production() {
            Self {
                secure: true,
                same_site: SameSite::None,
            }
        } else {
            Self {
                secure: false,
                same_site: SameSite::Strict,
            }
        }
    }

    /// Cookie carrying a freshly issued token.
    pub fn session(&self, token: String, max_age_seconds: i64) -> Cookie<'static> {
        Cookie::build(TOKEN_COOKIE, token)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(Duration::seconds(max_age_seconds))
            .finish()
    }

    /// Empty, already-expired cookie that makes the browser drop the token.
    pub fn removal(&self) -> Cookie<'static> {
        Cookie::build(TOKEN_COOKIE, "")
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(Duration::ZERO)
            .finish()
    }
}

/// Authenticated user identity extractor.
///
/// Use this in handlers to require a valid `token` cookie:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub email: String,
}

impl Identity {
    /// Only the owner of `email` may see resources scoped to it.
    pub fn ensure_owner(&self, email: &str) -> Result<(), AppError> {
        if self.email == email {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            email: claims.email,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub enum AuthenticationError {
    /// The request carried no usable session token.
    Token(AuthError),
    /// The extractor ran without `AppState` registered.
    MissingState,
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(e) => write!(f, "{e}"),
            Self::MissingState => f.write_str("application state not configured"),
        }
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            Self::Token(
                AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::MissingAuth,
            ) => actix_web::http::StatusCode::UNAUTHORIZED,
            Self::Token(AuthError::Signing(_)) | Self::MissingState => {
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        use nexthire_shared::ErrorResponse;

        let error = match self {
            Self::Token(AuthError::TokenExpired) => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your session has expired. Please sign in again."),
            Self::Token(AuthError::InvalidToken(_)) => {
                ErrorResponse::new(401, "Invalid Token").with_detail("unauthorized access")
            }
            Self::Token(AuthError::MissingAuth) => ErrorResponse::new(401, "Authentication Required")
                .with_detail("unauthorized access"),
            Self::Token(AuthError::Signing(_)) | Self::MissingState => ErrorResponse::internal_error(),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState not found in app data");
            return ready(Err(AuthenticationError::MissingState));
        };

        let token = match req.cookie(TOKEN_COOKIE) {
            Some(cookie) if !cookie.value().is_empty() => cookie.value().to_string(),
            _ => return ready(Err(AuthenticationError::Token(AuthError::MissingAuth))),
        };

        match state.tokens.validate_token(&token) {
            Ok(claims) => ready(Ok(Identity::from(claims))),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected session token");
                ready(Err(AuthenticationError::Token(e)))
            }
        }
    }
}
