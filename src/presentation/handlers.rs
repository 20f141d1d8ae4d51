use crate::application::auth_service::AuthService;
use crate::application::payment_service::PaymentService;
use crate::application::user_service::UserService;
use crate::data::payment_repository::InMemoryPaymentRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::page::PageRequest;
use crate::domain::payment::CreatePayment;
use crate::presentation::auth::{login, signup};
use crate::presentation::links::{
    self, LinkBuilder, PAYMENTS_PATH, REL_CREATE, REL_PAYMENTS, REL_USERS, USERS_PATH,
};
use crate::presentation::middleware::{AuthenticatedUser, HEALTH_PATH};
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::num::NonZeroU64;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub struct AppState {
    pub auth_service: AuthService<InMemoryUserRepository>,
    pub user_service: UserService<InMemoryUserRepository>,
    pub payment_service: PaymentService<InMemoryPaymentRepository, InMemoryUserRepository>,
}

impl AppState {
    /// Wires all services over fresh in-memory stores.
    pub fn in_memory(jwt_secret: String, jwt_validity_secs: u64) -> Self {
        Self::with_repositories(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPaymentRepository::new()),
            jwt_secret,
            jwt_validity_secs,
        )
    }

    pub fn with_repositories(
        users: Arc<InMemoryUserRepository>,
        payments: Arc<InMemoryPaymentRepository>,
        jwt_secret: String,
        jwt_validity_secs: u64,
    ) -> Self {
        Self {
            auth_service: AuthService::new(users.clone(), jwt_secret, jwt_validity_secs),
            user_service: UserService::new(users.clone()),
            payment_service: PaymentService::new(payments, users),
        }
    }
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::InvalidState(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidState(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        if status.is_server_error() {
            error!(error = %error_msg, status = %status, "Request failed");
        } else {
            warn!(error = %error_msg, status = %status, "Request rejected");
        }

        let error_response = ErrorResponse {
            details: serde_json::json!({ "message": self.message() }),
            error: error_msg,
        };

        HttpResponse::build(status).json(error_response)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            DomainError::InvalidState(msg) => ApiError::InvalidState(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => ApiError::from(domain),
            Err(other) => ApiError::Internal(other.to_string()),
        }
    }
}

// AuthenticatedUser extractor
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        Box::pin(async move {
            user.ok_or_else(|| ApiError::Unauthorized("User not authenticated".to_string()))
        })
    }
}

/// Extractor settings that turn malformed bodies, paths and queries into 400s.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}

/// Registers every route and the extractor configs.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .route(HEALTH_PATH, web::get().to(health_check))
        .service(
            web::scope(USERS_PATH)
                .route("", web::get().to(list_users))
                .route("/login", web::post().to(login))
                .route("/signup", web::post().to(signup))
                .route("/{user_id}", web::get().to(get_user))
                .route("/{user_id}/payments", web::get().to(list_user_payments)),
        )
        .service(
            web::scope(PAYMENTS_PATH)
                .route("", web::post().to(create_payment))
                .route("/{payment_id}", web::get().to(get_payment)),
        );
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}

#[instrument(skip(state, req, caller), fields(page = query.page, size = query.size))]
pub async fn list_users(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<PageRequest>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    info!(caller = %caller.email, "Listing users");
    let users = state
        .user_service
        .find_all_users(query.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to list users");
            e
        })?;

    let link_builder = LinkBuilder::from_request(&req);
    let model = links::paged_model(
        users,
        &link_builder.users(),
        REL_USERS,
        &link_builder,
        links::user_model,
    );
    Ok(HttpResponse::Ok().json(model))
}

#[instrument(skip(state, req), fields(user_id = %*path))]
pub async fn get_user(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<NonZeroU64>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner().get();
    let user = state.user_service.find_user(user_id).await?;

    let link_builder = LinkBuilder::from_request(&req);
    let model = links::user_model(&link_builder, user).with_link(REL_USERS, link_builder.users());
    Ok(HttpResponse::Ok().json(model))
}

/// Payments are listed for any authenticated caller; ownership is not checked.
#[instrument(skip(state, req, caller), fields(user_id = %*path, page = query.page, size = query.size))]
pub async fn list_user_payments(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<NonZeroU64>,
    query: web::Query<PageRequest>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner().get();
    info!(user_id = user_id, caller = %caller.email, "Listing user payments");

    let payments = state
        .payment_service
        .find_payments_by_user_id(user_id, query.into_inner())
        .await
        .map_err(|e| {
            error!(user_id = user_id, error = %e, "Failed to list payments");
            e
        })?;

    let link_builder = LinkBuilder::from_request(&req);
    let model = links::paged_model(
        payments,
        &link_builder.user_payments(user_id),
        REL_PAYMENTS,
        &link_builder,
        links::payment_model,
    )
    .with_link(REL_USERS, link_builder.users())
    .with_link(REL_CREATE, link_builder.payments());
    Ok(HttpResponse::Ok().json(model))
}

#[instrument(skip(state, req, body, caller), fields(user_id = body.user_id, payment_id))]
pub async fn create_payment(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreatePayment>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    info!(caller = %caller.email, cost = body.cost.inner(), "Creating payment");
    let payment = state
        .payment_service
        .create_payment(body.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create payment");
            e
        })?;
    tracing::Span::current().record("payment_id", payment.id);

    let link_builder = LinkBuilder::from_request(&req);
    Ok(HttpResponse::Created().json(links::payment_model(&link_builder, payment)))
}

#[instrument(skip(state, req), fields(payment_id = %*path))]
pub async fn get_payment(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<NonZeroU64>,
) -> Result<HttpResponse, ApiError> {
    let payment = state
        .payment_service
        .find_payment(path.into_inner().get())
        .await?;

    let link_builder = LinkBuilder::from_request(&req);
    Ok(HttpResponse::Ok().json(links::payment_model(&link_builder, payment)))
}
