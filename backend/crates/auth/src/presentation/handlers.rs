//! HTTP Handlers

use axum::extract::State;
use kernel::extract::{Json, Path, Query};
use kernel::pagination::{Page, PageRequest};
use kernel::response::{ApiResponse, MessageData};
use platform::credential::CredentialCodec;
use platform::token::TokenService;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    AuditLog, CreateUserInput, SignInInput, SignInUseCase, SignOutUseCase, UpdateUserInput,
    UserService,
};
use crate::domain::repository::{OperationRepository, UserRepository};
use crate::domain::value_object::user_id::{OperationId, UserId};
use crate::error::AuthResult;
use crate::presentation::dto::{
    CreateUserRequest, LoginRequest, LoginResponse, OperationResponse, UpdateUserRequest,
    UserResponse,
};
use crate::presentation::middleware::{ClientMeta, Identity};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + OperationRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<TokenService>,
    pub codec: Arc<CredentialCodec>,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + OperationRepository + Clone + Send + Sync + 'static,
{
    /// Build the token service and codec from `config`
    ///
    /// Fails when the codec key is not 8 bytes.
    pub fn new(repo: R, config: AuthConfig) -> AuthResult<Self> {
        let codec = config.credential_codec()?;
        let tokens = config.token_service();

        Ok(Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            codec: Arc::new(codec),
        })
    }

    fn users(&self) -> UserService<R> {
        UserService::new(self.repo.clone(), self.codec.clone())
    }
}

// ============================================================================
// Login / Logout
// ============================================================================

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ClientMeta(client): ClientMeta,
    Json(req): Json<LoginRequest>,
) -> AuthResult<ApiResponse<LoginResponse>>
where
    R: UserRepository + OperationRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.codec.clone(),
        state.tokens.clone(),
    );

    let input = SignInInput {
        user_name: req.user_name,
        password: req.password,
    };

    let output = use_case.execute(input, &client).await?;

    Ok(ApiResponse::ok(LoginResponse {
        token: output.token,
        user: output.user.into(),
    }))
}

/// POST /auth/logout
///
/// Tokens are not revoked; the client drops its copy.
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    identity: Identity,
    ClientMeta(client): ClientMeta,
) -> AuthResult<ApiResponse<MessageData>>
where
    R: UserRepository + OperationRepository + Clone + Send + Sync + 'static,
{
    SignOutUseCase::new(state.repo.clone())
        .execute(identity.user_id, &identity.user_name, &client)
        .await;

    Ok(ApiResponse::ok(MessageData::LOGGED_OUT))
}

// ============================================================================
// Users
// ============================================================================

/// POST /users
pub async fn create_user<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<CreateUserRequest>,
) -> AuthResult<ApiResponse<UserResponse>>
where
    R: UserRepository + OperationRepository + Clone + Send + Sync + 'static,
{
    let user = state
        .users()
        .create(CreateUserInput {
            user_name: req.user_name,
            password: req.password,
            role: req.role,
            extra_info: req.extra_info,
        })
        .await?;

    Ok(ApiResponse::ok(user.into()))
}

/// GET /users
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
    Query(request): Query<PageRequest>,
) -> AuthResult<ApiResponse<Page<UserResponse>>>
where
    R: UserRepository + OperationRepository + Clone + Send + Sync + 'static,
{
    let page = state.users().list(request).await?;
    Ok(ApiResponse::ok(page.map(UserResponse::from)))
}

/// GET /users/{id}
pub async fn get_user<R>(
    State(state): State<AuthAppState<R>>,
    Path(id): Path<i64>,
) -> AuthResult<ApiResponse<UserResponse>>
where
    R: UserRepository + OperationRepository + Clone + Send + Sync + 'static,
{
    let user = state.users().get(UserId::parse(id)?).await?;
    Ok(ApiResponse::ok(user.into()))
}

/// PUT /users/{id}
pub async fn update_user<R>(
    State(state): State<AuthAppState<R>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> AuthResult<ApiResponse<MessageData>>
where
    R: UserRepository + OperationRepository + Clone + Send + Sync + 'static,
{
    let input = UpdateUserInput {
        password: req.password,
        role: req.role,
        is_locked: req.is_locked,
        extra_info: req.extra_info,
    };

    state.users().update(UserId::parse(id)?, input).await?;
    Ok(ApiResponse::ok(MessageData::UPDATED))
}

/// DELETE /users/{id}
pub async fn delete_user<R>(
    State(state): State<AuthAppState<R>>,
    Path(id): Path<i64>,
) -> AuthResult<ApiResponse<MessageData>>
where
    R: UserRepository + OperationRepository + Clone + Send + Sync + 'static,
{
    state.users().delete(UserId::parse(id)?).await?;
    Ok(ApiResponse::ok(MessageData::DELETED))
}

// ============================================================================
// Operation Log
// ============================================================================

/// GET /operations
pub async fn list_operations<R>(
    State(state): State<AuthAppState<R>>,
    Query(request): Query<PageRequest>,
) -> AuthResult<ApiResponse<Page<OperationResponse>>>
where
    R: UserRepository + OperationRepository + Clone + Send + Sync + 'static,
{
    let page = AuditLog::new(state.repo.clone()).list(request).await?;
    Ok(ApiResponse::ok(page.map(OperationResponse::from)))
}

/// GET /operations/{id}
pub async fn get_operation<R>(
    State(state): State<AuthAppState<R>>,
    Path(id): Path<i64>,
) -> AuthResult<ApiResponse<OperationResponse>>
where
    R: UserRepository + OperationRepository + Clone + Send + Sync + 'static,
{
    let record = AuditLog::new(state.repo.clone())
        .get(OperationId::parse(id)?)
        .await?;
    Ok(ApiResponse::ok(record.into()))
}
