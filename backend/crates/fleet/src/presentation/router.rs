//! Fleet Router
//!
//! Routes are relative; the binary nests them under `/api/v1`.

use auth::{Permission, gate, require_auth};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};

use crate::domain::repository::FleetRepository;
use crate::domain::storage::ObjectStorage;
use crate::presentation::handlers::{self, FleetAppState};

/// Create the Fleet router; every route requires a valid token
pub fn fleet_router<R, S>(state: FleetAppState<R, S>) -> Router
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    use Permission::{DeviceManage, DeviceView, MapManage, MapView, TaskManage, TaskView};

    Router::new()
        // Devices
        .route(
            "/devices",
            gate(post(handlers::create_device::<R, S>), &[DeviceManage])
                .merge(gate(get(handlers::list_devices::<R, S>), &[DeviceView])),
        )
        .route(
            "/devices/{id}",
            gate(get(handlers::get_device::<R, S>), &[DeviceView])
                .merge(gate(put(handlers::update_device::<R, S>), &[DeviceManage]))
                .merge(gate(delete(handlers::delete_device::<R, S>), &[DeviceManage])),
        )
        // PCD files
        .route(
            "/maps/pcd-files",
            gate(post(handlers::create_pcd_file::<R, S>), &[MapManage])
                .merge(gate(get(handlers::list_pcd_files::<R, S>), &[MapView])),
        )
        .route(
            "/maps/pcd-files/upload-token",
            gate(post(handlers::issue_upload_token::<R, S>), &[MapManage]),
        )
        .route(
            "/maps/pcd-files/{id}",
            gate(get(handlers::get_pcd_file::<R, S>), &[MapView])
                .merge(gate(put(handlers::update_pcd_file::<R, S>), &[MapManage]))
                .merge(gate(delete(handlers::delete_pcd_file::<R, S>), &[MapManage])),
        )
        // Semantic maps
        .route(
            "/maps/semantic-maps",
            gate(post(handlers::create_semantic_map::<R, S>), &[MapManage])
                .merge(gate(get(handlers::list_semantic_maps::<R, S>), &[MapView])),
        )
        .route(
            "/maps/semantic-maps/{id}",
            gate(get(handlers::get_semantic_map::<R, S>), &[MapView])
                .merge(gate(put(handlers::update_semantic_map::<R, S>), &[MapManage]))
                .merge(gate(delete(handlers::delete_semantic_map::<R, S>), &[MapManage])),
        )
        // Tasks
        .route(
            "/tasks",
            gate(post(handlers::create_task::<R, S>), &[TaskManage])
                .merge(gate(get(handlers::list_tasks::<R, S>), &[TaskView])),
        )
        .route(
            "/tasks/{id}",
            gate(get(handlers::get_task::<R, S>), &[TaskView])
                .merge(gate(put(handlers::update_task::<R, S>), &[TaskManage]))
                .merge(gate(delete(handlers::delete_task::<R, S>), &[TaskManage])),
        )
        .route_layer(from_fn_with_state(state.tokens.clone(), require_auth))
        .with_state(state)
}
