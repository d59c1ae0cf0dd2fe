//! HTTP Handlers

use auth::Identity;
use axum::extract::State;
use kernel::extract::{Json, Path, Query};
use kernel::pagination::{Page, PageRequest};
use kernel::response::{ApiResponse, MessageData};
use platform::token::TokenService;
use std::sync::Arc;

use crate::application::config::StorageConfig;
use crate::application::{
    CreateDeviceInput, CreatePcdFileInput, CreateSemanticMapInput, CreateTaskInput,
    DeviceService, PcdFileService, SemanticMapService, TaskService, UpdateDeviceInput,
    UpdatePcdFileInput, UpdateSemanticMapInput, UpdateTaskInput, UploadTokenInput,
    UploadTokenIssuer,
};
use crate::domain::repository::FleetRepository;
use crate::domain::storage::ObjectStorage;
use crate::domain::value_object::ids::{DeviceId, PcdFileId, SemanticMapId, TaskId};
use crate::error::FleetResult;
use crate::presentation::dto::{
    CreateDeviceRequest, CreatePcdFileRequest, CreateSemanticMapRequest, CreateTaskRequest,
    DeviceResponse, PcdFileResponse, SemanticMapResponse, TaskResponse, UpdateDeviceRequest,
    UpdatePcdFileRequest, UpdateSemanticMapRequest, UpdateTaskRequest, UploadTokenRequest,
    UploadTokenResponse,
};

/// Shared state for fleet handlers
///
/// `tokens` must be the same token service the auth router validates with.
pub struct FleetAppState<R, S>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    pub repo: Arc<R>,
    pub storage: Arc<S>,
    pub storage_config: Arc<StorageConfig>,
    pub tokens: Arc<TokenService>,
}

impl<R, S> Clone for FleetAppState<R, S>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            storage: self.storage.clone(),
            storage_config: self.storage_config.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<R, S> FleetAppState<R, S>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    pub fn new(
        repo: R,
        storage: S,
        storage_config: StorageConfig,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            repo: Arc::new(repo),
            storage: Arc::new(storage),
            storage_config: Arc::new(storage_config),
            tokens,
        }
    }

    fn devices(&self) -> DeviceService<R> {
        DeviceService::new(self.repo.clone())
    }

    fn pcd_files(&self) -> PcdFileService<R> {
        PcdFileService::new(self.repo.clone())
    }

    fn semantic_maps(&self) -> SemanticMapService<R, R> {
        SemanticMapService::new(self.repo.clone(), self.repo.clone())
    }

    fn tasks(&self) -> TaskService<R, R> {
        TaskService::new(self.repo.clone(), self.repo.clone())
    }
}

// ============================================================================
// Devices
// ============================================================================

/// POST /devices
pub async fn create_device<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Json(req): Json<CreateDeviceRequest>,
) -> FleetResult<ApiResponse<DeviceResponse>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let device = state
        .devices()
        .create(CreateDeviceInput {
            device_type: req.device_type,
            company: req.company,
            ip: req.ip,
            port: req.port,
            user_name: req.user_name,
            password: req.password,
            extra_info: req.extra_info,
        })
        .await?;

    Ok(ApiResponse::ok(device.into()))
}

/// GET /devices
pub async fn list_devices<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Query(request): Query<PageRequest>,
) -> FleetResult<ApiResponse<Page<DeviceResponse>>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let page = state.devices().list(request).await?;
    Ok(ApiResponse::ok(page.map(DeviceResponse::from)))
}

/// GET /devices/{id}
pub async fn get_device<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Path(id): Path<i64>,
) -> FleetResult<ApiResponse<DeviceResponse>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let device = state.devices().get(DeviceId::parse(id)?).await?;
    Ok(ApiResponse::ok(device.into()))
}

/// PUT /devices/{id}
pub async fn update_device<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDeviceRequest>,
) -> FleetResult<ApiResponse<MessageData>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let input = UpdateDeviceInput {
        device_type: req.device_type,
        company: req.company,
        ip: req.ip,
        port: req.port,
        user_name: req.user_name,
        password: req.password,
        status: req.status,
        extra_info: req.extra_info,
    };

    state.devices().update(DeviceId::parse(id)?, input).await?;
    Ok(ApiResponse::ok(MessageData::UPDATED))
}

/// DELETE /devices/{id}
pub async fn delete_device<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Path(id): Path<i64>,
) -> FleetResult<ApiResponse<MessageData>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    state.devices().delete(DeviceId::parse(id)?).await?;
    Ok(ApiResponse::ok(MessageData::DELETED))
}

// ============================================================================
// PCD Files
// ============================================================================

/// POST /maps/pcd-files
pub async fn create_pcd_file<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Json(req): Json<CreatePcdFileRequest>,
) -> FleetResult<ApiResponse<PcdFileResponse>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let file = state
        .pcd_files()
        .create(CreatePcdFileInput {
            name: req.name,
            area: req.area,
            path: req.path,
            user_name: req.user_name,
            size: req.size,
            minio_path: req.minio_path,
            extra_info: req.extra_info,
        })
        .await?;

    Ok(ApiResponse::ok(file.into()))
}

/// GET /maps/pcd-files
pub async fn list_pcd_files<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Query(request): Query<PageRequest>,
) -> FleetResult<ApiResponse<Page<PcdFileResponse>>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let page = state.pcd_files().list(request).await?;
    Ok(ApiResponse::ok(page.map(PcdFileResponse::from)))
}

/// GET /maps/pcd-files/{id}
pub async fn get_pcd_file<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Path(id): Path<i64>,
) -> FleetResult<ApiResponse<PcdFileResponse>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let file = state.pcd_files().get(PcdFileId::parse(id)?).await?;
    Ok(ApiResponse::ok(file.into()))
}

/// PUT /maps/pcd-files/{id}
pub async fn update_pcd_file<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePcdFileRequest>,
) -> FleetResult<ApiResponse<MessageData>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let input = UpdatePcdFileInput {
        name: req.name,
        area: req.area,
        path: req.path,
        user_name: req.user_name,
        size: req.size,
        minio_path: req.minio_path,
        extra_info: req.extra_info,
    };

    state.pcd_files().update(PcdFileId::parse(id)?, input).await?;
    Ok(ApiResponse::ok(MessageData::UPDATED))
}

/// DELETE /maps/pcd-files/{id}
pub async fn delete_pcd_file<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Path(id): Path<i64>,
) -> FleetResult<ApiResponse<MessageData>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    state.pcd_files().delete(PcdFileId::parse(id)?).await?;
    Ok(ApiResponse::ok(MessageData::DELETED))
}

/// POST /maps/pcd-files/upload-token
///
/// The object key is owned by the caller's user name, `unknown` without one.
pub async fn issue_upload_token<R, S>(
    State(state): State<FleetAppState<R, S>>,
    identity: Option<Identity>,
    Json(req): Json<UploadTokenRequest>,
) -> FleetResult<ApiResponse<UploadTokenResponse>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let issuer = UploadTokenIssuer::new(state.storage.clone(), state.storage_config.clone());
    let input = UploadTokenInput {
        file_name: req.file_name,
        size: req.size,
    };

    let token = issuer
        .issue(input, identity.as_ref().map(|id| id.user_name.as_str()))
        .await?;
    Ok(ApiResponse::ok(token.into()))
}

// ============================================================================
// Semantic Maps
// ============================================================================

/// POST /maps/semantic-maps
pub async fn create_semantic_map<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Json(req): Json<CreateSemanticMapRequest>,
) -> FleetResult<ApiResponse<SemanticMapResponse>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let map = state
        .semantic_maps()
        .create(CreateSemanticMapInput {
            pcd_file_id: PcdFileId::parse(req.pcd_file_id)?,
            user_name: req.user_name,
            semantic_info: req.semantic_info,
            extra_info: req.extra_info,
        })
        .await?;

    Ok(ApiResponse::ok(map.into()))
}

/// GET /maps/semantic-maps
pub async fn list_semantic_maps<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Query(request): Query<PageRequest>,
) -> FleetResult<ApiResponse<Page<SemanticMapResponse>>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let page = state.semantic_maps().list(request).await?;
    Ok(ApiResponse::ok(page.map(SemanticMapResponse::from)))
}

/// GET /maps/semantic-maps/{id}
pub async fn get_semantic_map<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Path(id): Path<i64>,
) -> FleetResult<ApiResponse<SemanticMapResponse>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let map = state.semantic_maps().get(SemanticMapId::parse(id)?).await?;
    Ok(ApiResponse::ok(map.into()))
}

/// PUT /maps/semantic-maps/{id}
pub async fn update_semantic_map<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSemanticMapRequest>,
) -> FleetResult<ApiResponse<MessageData>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let input = UpdateSemanticMapInput {
        pcd_file_id: req.pcd_file_id.map(PcdFileId::parse).transpose()?,
        user_name: req.user_name,
        semantic_info: req.semantic_info,
        extra_info: req.extra_info,
    };

    state
        .semantic_maps()
        .update(SemanticMapId::parse(id)?, input)
        .await?;
    Ok(ApiResponse::ok(MessageData::UPDATED))
}

/// DELETE /maps/semantic-maps/{id}
pub async fn delete_semantic_map<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Path(id): Path<i64>,
) -> FleetResult<ApiResponse<MessageData>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    state.semantic_maps().delete(SemanticMapId::parse(id)?).await?;
    Ok(ApiResponse::ok(MessageData::DELETED))
}

// ============================================================================
// Tasks
// ============================================================================

/// POST /tasks
pub async fn create_task<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Json(req): Json<CreateTaskRequest>,
) -> FleetResult<ApiResponse<TaskResponse>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let task = state
        .tasks()
        .create(CreateTaskInput {
            semantic_map_id: SemanticMapId::parse(req.semantic_map_id)?,
            user_name: req.user_name,
            task_info: req.task_info,
            extra_info: req.extra_info,
        })
        .await?;

    Ok(ApiResponse::ok(task.into()))
}

/// GET /tasks
pub async fn list_tasks<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Query(request): Query<PageRequest>,
) -> FleetResult<ApiResponse<Page<TaskResponse>>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let page = state.tasks().list(request).await?;
    Ok(ApiResponse::ok(page.map(TaskResponse::from)))
}

/// GET /tasks/{id}
pub async fn get_task<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Path(id): Path<i64>,
) -> FleetResult<ApiResponse<TaskResponse>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let task = state.tasks().get(TaskId::parse(id)?).await?;
    Ok(ApiResponse::ok(task.into()))
}

/// PUT /tasks/{id}
pub async fn update_task<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> FleetResult<ApiResponse<MessageData>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    let input = UpdateTaskInput {
        semantic_map_id: req.semantic_map_id.map(SemanticMapId::parse).transpose()?,
        user_name: req.user_name,
        task_info: req.task_info,
        status: req.status,
        extra_info: req.extra_info,
    };

    state.tasks().update(TaskId::parse(id)?, input).await?;
    Ok(ApiResponse::ok(MessageData::UPDATED))
}

/// DELETE /tasks/{id}
pub async fn delete_task<R, S>(
    State(state): State<FleetAppState<R, S>>,
    Path(id): Path<i64>,
) -> FleetResult<ApiResponse<MessageData>>
where
    R: FleetRepository,
    S: ObjectStorage + Sync + 'static,
{
    state.tasks().delete(TaskId::parse(id)?).await?;
    Ok(ApiResponse::ok(MessageData::DELETED))
}
