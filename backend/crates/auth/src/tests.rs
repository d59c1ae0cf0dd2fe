//! Scenario tests for the auth crate
//! The HTTP tests drive the router in-process over `MemoryAuthRepository`.

#[cfg(test)]
mod support {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::application::{CreateUserInput, UpdateUserInput, UserService};
    use crate::domain::entity::user::User;
    use crate::infra::MemoryAuthRepository;
    use crate::{AuthAppState, AuthConfig, auth_router};

    pub type State = AuthAppState<MemoryAuthRepository>;

    pub fn app() -> (Router, State) {
        let state = AuthAppState::new(MemoryAuthRepository::new(), AuthConfig::development())
            .unwrap();
        (auth_router(state.clone()), state)
    }

    pub async fn seed(state: &State, name: &str, password: &str, role: &str) -> User {
        UserService::new(state.repo.clone(), state.codec.clone())
            .create(CreateUserInput {
                user_name: name.to_string(),
                password: password.to_string(),
                role: role.to_string(),
                extra_info: None,
            })
            .await
            .unwrap()
    }

    pub async fn lock(state: &State, user: &User) {
        UserService::new(state.repo.clone(), state.codec.clone())
            .update(
                user.id,
                UpdateUserInput {
                    is_locked: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    pub fn token_for(state: &State, user_id: i64, name: &str, role: &str) -> String {
        state.tokens.issue(user_id, name, role).unwrap()
    }

    pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

#[cfg(test)]
mod login_tests {
    use super::support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_success_returns_token_and_user() {
        let (app, state) = app();
        seed(&state, "alice", "secret1", "operator").await;

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/auth/login",
                None,
                Some(json!({"userName": "alice", "password": "secret1"})),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 0);
        assert_eq!(body["message"], "success");
        assert_eq!(body["data"]["user"]["userName"], "alice");
        assert_eq!(body["data"]["user"]["role"], "operator");
        assert!(body["data"]["user"].get("password").is_none());

        let token = body["data"]["token"].as_str().unwrap();
        let claims = state.tokens.validate(token).unwrap();
        assert_eq!(claims.user_name, "alice");
        assert_eq!(claims.role, "operator");
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_user_look_the_same() {
        let (app, state) = app();
        seed(&state, "alice", "secret1", "operator").await;

        for (name, password) in [("alice", "wrong-pass"), ("nobody", "secret1")] {
            let (status, body) = send(
                &app,
                request(
                    "POST",
                    "/auth/login",
                    None,
                    Some(json!({"userName": name, "password": password})),
                ),
            )
            .await;

            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["code"], 401);
            assert_eq!(body["message"], "Invalid user name or password");
            assert!(body["data"].is_null());
        }
    }

    #[tokio::test]
    async fn test_locked_user_is_refused_regardless_of_password() {
        let (app, state) = app();
        let user = seed(&state, "locked", "secret1", "user").await;
        lock(&state, &user).await;

        for password in ["secret1", "not-the-password"] {
            let (status, body) = send(
                &app,
                request(
                    "POST",
                    "/auth/login",
                    None,
                    Some(json!({"userName": "locked", "password": password})),
                ),
            )
            .await;

            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert!(body["message"].as_str().unwrap().contains("locked"));
        }
    }

    #[tokio::test]
    async fn test_login_writes_audit_record() {
        let (app, state) = app();
        seed(&state, "alice", "secret1", "operator").await;

        let mut req = request(
            "POST",
            "/auth/login",
            None,
            Some(json!({"userName": "alice", "password": "secret1"})),
        );
        req.headers_mut()
            .insert("x-forwarded-for", "203.0.113.7".parse().unwrap());
        req.headers_mut()
            .insert("user-agent", "fleet-console/1.0".parse().unwrap());
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);

        let admin = token_for(&state, 99, "root", "administrator");
        let (status, body) = send(&app, request("GET", "/operations", Some(&admin), None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 1);
        let record = &body["data"]["list"][0];
        assert_eq!(record["operation"], "login");
        assert_eq!(record["module"], "auth");
        assert_eq!(record["userName"], "alice");
        assert_eq!(record["ip"], "203.0.113.7");
        assert_eq!(record["userAgent"], "fleet-console/1.0");

        let id = record["id"].as_i64().unwrap();
        let (status, body) = send(
            &app,
            request("GET", &format!("/operations/{id}"), Some(&admin), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["operation"], "login");
    }

    #[tokio::test]
    async fn test_malformed_login_body_is_enveloped() {
        let (app, _) = app();

        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{\"userName\":"))
            .unwrap();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_logout_records_and_succeeds() {
        let (app, state) = app();
        let user = seed(&state, "alice", "secret1", "user").await;
        let token = token_for(&state, user.id.value(), "alice", "user");

        let (status, body) =
            send(&app, request("POST", "/auth/logout", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], "logged out");

        // the same token still works: logout revokes nothing
        let (status, _) = send(&app, request("GET", "/users", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, request("GET", "/operations", Some(&token), None)).await;
        assert_eq!(body["data"]["list"][0]["operation"], "logout");
    }
}

#[cfg(test)]
mod pipeline_tests {
    use super::support::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::middleware::from_fn_with_state;
    use axum::routing::post;
    use chrono::{Duration, Utc};
    use platform::token::TokenService;
    use serde_json::json;

    use crate::{Permission, gate, require_auth};

    #[tokio::test]
    async fn test_missing_and_malformed_header() {
        let (app, _) = app();

        let (status, body) = send(&app, request("GET", "/users", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 401);

        let req = axum::http::Request::builder()
            .uri("/users")
            .header("authorization", "Token abc")
            .body(axum::body::Body::empty())
            .unwrap();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_and_foreign_tokens() {
        let (app, state) = app();

        let expired = state
            .tokens
            .issue_at(1, "alice", "administrator", Utc::now() - Duration::hours(48))
            .unwrap();
        let (status, body) = send(&app, request("GET", "/users", Some(&expired), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Token has expired");

        let foreign = TokenService::new("some-other-secret", 24)
            .issue(1, "alice", "administrator")
            .unwrap();
        let (status, body) = send(&app, request("GET", "/users", Some(&foreign), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token");
    }

    #[tokio::test]
    async fn test_manager_cannot_manage_users() {
        let (app, state) = app();
        let manager = token_for(&state, 2, "mgr", "manager");

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/users",
                Some(&manager),
                Some(json!({"userName": "bob", "password": "secret1", "role": "user"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], 403);

        // reading is still allowed
        let (status, _) = send(&app, request("GET", "/users", Some(&manager), None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    fn map_router(tokens: std::sync::Arc<TokenService>) -> Router {
        Router::new()
            .route(
                "/maps/pcd-files",
                gate(
                    post(|| async { kernel::response::ApiResponse::ok("created") }),
                    &[Permission::MapManage],
                ),
            )
            .route_layer(from_fn_with_state(tokens, require_auth))
    }

    #[tokio::test]
    async fn test_manager_passes_map_manage_gate() {
        let (_, state) = app();
        let router = map_router(state.tokens.clone());

        let manager = token_for(&state, 2, "mgr", "manager");
        let (status, body) = send(
            &router,
            request("POST", "/maps/pcd-files", Some(&manager), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "created");

        let viewer = token_for(&state, 3, "viewer", "user");
        let (status, _) = send(
            &router,
            request("POST", "/maps/pcd-files", Some(&viewer), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_gate_without_bound_identity_is_forbidden() {
        let router: Router = Router::new().route(
            "/maps/pcd-files",
            gate(
                post(|| async { kernel::response::ApiResponse::ok("created") }),
                &[Permission::MapManage],
            ),
        );

        let (status, _) = send(&router, request("POST", "/maps/pcd-files", None, None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_role_is_authenticated_but_has_no_permissions() {
        let (app, state) = app();
        let token = token_for(&state, 5, "ghost", "root");

        let (status, _) = send(&app, request("GET", "/users", Some(&token), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, request("POST", "/auth/logout", Some(&token), None)).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[cfg(test)]
mod user_api_tests {
    use super::support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_user_crud_round() {
        let (app, state) = app();
        let admin = token_for(&state, 1, "root", "administrator");

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/users",
                Some(&admin),
                Some(json!({"userName": "bob", "password": "secret1", "role": "user"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = body["data"]["id"].as_i64().unwrap();
        assert!(id > 0);

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/users",
                Some(&admin),
                Some(json!({"userName": "bob", "password": "secret1", "role": "user"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], 409);

        let (status, body) = send(
            &app,
            request(
                "PUT",
                &format!("/users/{id}"),
                Some(&admin),
                Some(json!({"role": "operator", "extraInfo": "night shift"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], "updated");

        let (_, body) = send(&app, request("GET", &format!("/users/{id}"), Some(&admin), None)).await;
        assert_eq!(body["data"]["role"], "operator");
        assert_eq!(body["data"]["extraInfo"], "night shift");

        let (status, body) =
            send(&app, request("DELETE", &format!("/users/{id}"), Some(&admin), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], "deleted");

        let (status, body) =
            send(&app, request("GET", &format!("/users/{id}"), Some(&admin), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], format!("user {id} not found"));

        let (status, _) =
            send(&app, request("DELETE", &format!("/users/{id}"), Some(&admin), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // the name is free again once the holder is soft-deleted
        let (status, _) = send(
            &app,
            request(
                "POST",
                "/users",
                Some(&admin),
                Some(json!({"userName": "bob", "password": "secret1", "role": "user"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_ids_are_bad_requests() {
        let (app, state) = app();
        let admin = token_for(&state, 1, "root", "administrator");

        for uri in ["/users/0", "/users/-4", "/users/abc"] {
            let (status, body) = send(&app, request("GET", uri, Some(&admin), None)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["code"], 400);
        }
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let (app, state) = app();
        let admin = token_for(&state, 1, "root", "administrator");

        for payload in [
            json!({"userName": "ab", "password": "secret1", "role": "user"}),
            json!({"userName": "carol", "password": "12345", "role": "user"}),
            json!({"userName": "carol", "password": "secret1", "role": "superuser"}),
        ] {
            let (status, _) = send(&app, request("POST", "/users", Some(&admin), Some(payload))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_list_defaults_and_paging() {
        let (app, state) = app();
        let admin = token_for(&state, 1, "root", "administrator");
        for name in ["user1", "user2", "user3", "user4", "user5"] {
            seed(&state, name, "secret1", "user").await;
        }

        let (_, body) = send(
            &app,
            request("GET", "/users?page=0&pageSize=0", Some(&admin), None),
        )
        .await;
        assert_eq!(body["data"]["page"], 1);
        assert_eq!(body["data"]["pageSize"], 10);
        assert_eq!(body["data"]["total"], 5);
        assert_eq!(body["data"]["pages"], 1);

        let (_, body) = send(
            &app,
            request("GET", "/users?page=2&pageSize=3", Some(&admin), None),
        )
        .await;
        assert_eq!(body["data"]["pages"], 2);
        assert_eq!(body["data"]["list"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"]["list"][0]["userName"], "user4");
    }

    #[tokio::test]
    async fn test_list_with_max_page_size() {
        let (app, state) = app();
        let admin = token_for(&state, 1, "root", "administrator");
        seed(&state, "user1", "secret1", "user").await;
        seed(&state, "user2", "secret1", "user").await;

        let (status, body) = send(
            &app,
            request("GET", "/users?pageSize=9223372036854775807", Some(&admin), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 2);
        assert_eq!(body["data"]["pages"], 1);
        assert_eq!(body["data"]["list"].as_array().unwrap().len(), 2);
    }
}

#[cfg(test)]
mod bootstrap_tests {
    use super::support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{SUPER_ADMIN_NAME, ensure_super_admin};

    #[tokio::test]
    async fn test_super_admin_created_once_and_can_log_in() {
        let (app, state) = app();

        let created = ensure_super_admin(state.repo.as_ref(), &state.codec)
            .await
            .unwrap();
        let created = created.unwrap();
        assert_eq!(created.user_name.as_str(), SUPER_ADMIN_NAME);
        assert_eq!(created.role, "administrator");

        let again = ensure_super_admin(state.repo.as_ref(), &state.codec)
            .await
            .unwrap();
        assert!(again.is_none());

        let (status, body) = send(
            &app,
            request(
                "POST",
                "/auth/login",
                None,
                Some(json!({"userName": "superAdmin", "password": "superAdmin"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"]["role"], "administrator");
    }
}
