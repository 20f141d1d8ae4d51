use crate::domain::user::{CreateUser, LoginRequest};
use crate::domain::validation::Validate;
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::links::{self, LinkBuilder, REL_LOGIN, REL_USERS};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{error, info, instrument};

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");
    req.validate()?;

    let user_read = state
        .auth_service
        .login(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to login");
            ApiError::from(e)
        })?;

    info!(user_id = user_read.id, role = %user_read.role, "Login successful");
    Ok(HttpResponse::Ok().json(user_read))
}

#[instrument(skip(state, http_req, req), fields(email = %req.email))]
pub async fn signup(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    info!("Registration request received");

    let user = state
        .user_service
        .create_user(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register user");
            ApiError::from(e)
        })?;

    info!(user_id = user.id, "User registered successfully");

    let link_builder = LinkBuilder::from_request(&http_req);
    let model = links::user_model(&link_builder, user)
        .with_link(REL_LOGIN, link_builder.login())
        .with_link(REL_USERS, link_builder.users());
    Ok(HttpResponse::Created().json(model))
}
