//! Auth Router
//!
//! Routes are relative; the binary nests them under `/api/v1`.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};

use crate::domain::repository::{OperationRepository, UserRepository};
use crate::domain::value_object::permission::Permission;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{gate, require_auth};

/// Create the Auth router for any repository implementation
///
/// `/auth/login` is the only route outside the token check.
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + OperationRepository + Clone + Send + Sync + 'static,
{
    let protected = Router::new()
        .route("/auth/logout", post(handlers::logout::<R>))
        .route(
            "/users",
            gate(
                post(handlers::create_user::<R>),
                &[Permission::UserManage],
            )
            .merge(gate(
                get(handlers::list_users::<R>),
                &[Permission::UserView],
            )),
        )
        .route(
            "/users/{id}",
            gate(get(handlers::get_user::<R>), &[Permission::UserView])
                .merge(gate(
                    put(handlers::update_user::<R>),
                    &[Permission::UserManage],
                ))
                .merge(gate(
                    delete(handlers::delete_user::<R>),
                    &[Permission::UserManage],
                )),
        )
        .route(
            "/operations",
            gate(
                get(handlers::list_operations::<R>),
                &[Permission::OperationView],
            ),
        )
        .route(
            "/operations/{id}",
            gate(
                get(handlers::get_operation::<R>),
                &[Permission::OperationView],
            ),
        )
        .route_layer(from_fn_with_state(state.tokens.clone(), require_auth));

    Router::new()
        .route("/auth/login", post(handlers::login::<R>))
        .merge(protected)
        .with_state(state)
}
