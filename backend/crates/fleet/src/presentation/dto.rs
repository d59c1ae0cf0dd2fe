//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::patch::Patch;
use serde::{Deserialize, Serialize};

use crate::application::upload_token::UploadToken;
use crate::domain::entity::{
    device::Device, pcd_file::PcdFile, semantic_map::SemanticMap, task::Task,
};
use crate::domain::value_object::{
    device_kind::{Company, DeviceStatus, DeviceType},
    ids::{DeviceId, PcdFileId, SemanticMapId, TaskId},
    task_status::TaskStatus,
};

// ============================================================================
// Devices
// ============================================================================

/// Device as returned by the API; the device password is never included
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub id: DeviceId,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub company: Company,
    pub ip: Option<String>,
    pub port: i32,
    pub user_name: Option<String>,
    pub status: DeviceStatus,
    pub extra_info: Option<String>,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        Self {
            id: device.id,
            device_type: device.device_type,
            company: device.company,
            ip: device.ip,
            port: device.port,
            user_name: device.user_name,
            status: device.status,
            extra_info: device.extra_info,
            create_time: device.created_at,
            update_time: device.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeviceRequest {
    #[serde(rename = "type")]
    pub device_type: String,
    pub company: String,
    pub ip: Option<String>,
    pub port: i32,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub extra_info: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceRequest {
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub ip: Patch<String>,
    pub port: Option<i32>,
    #[serde(default)]
    pub user_name: Patch<String>,
    #[serde(default)]
    pub password: Patch<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub extra_info: Patch<String>,
}

// ============================================================================
// PCD Files
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PcdFileResponse {
    pub id: PcdFileId,
    pub name: String,
    pub area: String,
    pub path: String,
    pub user_name: String,
    pub size: i64,
    pub minio_path: Option<String>,
    pub extra_info: Option<String>,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<PcdFile> for PcdFileResponse {
    fn from(file: PcdFile) -> Self {
        Self {
            id: file.id,
            name: file.name,
            area: file.area,
            path: file.path,
            user_name: file.user_name,
            size: file.size,
            minio_path: file.minio_path,
            extra_info: file.extra_info,
            create_time: file.created_at,
            update_time: file.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePcdFileRequest {
    pub name: String,
    pub area: String,
    pub path: String,
    pub user_name: String,
    pub size: i64,
    pub minio_path: Option<String>,
    pub extra_info: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePcdFileRequest {
    pub name: Option<String>,
    pub area: Option<String>,
    pub path: Option<String>,
    pub user_name: Option<String>,
    pub size: Option<i64>,
    #[serde(default)]
    pub minio_path: Patch<String>,
    #[serde(default)]
    pub extra_info: Patch<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTokenRequest {
    pub file_name: String,
    pub size: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTokenResponse {
    pub upload_url: String,
    pub bucket: String,
    pub object_key: String,
    /// Unix seconds
    pub expire_at: i64,
}

impl From<UploadToken> for UploadTokenResponse {
    fn from(token: UploadToken) -> Self {
        Self {
            upload_url: token.upload_url,
            bucket: token.bucket,
            object_key: token.object_key,
            expire_at: token.expire_at,
        }
    }
}

// ============================================================================
// Semantic Maps
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticMapResponse {
    pub id: SemanticMapId,
    pub pcd_file_id: PcdFileId,
    pub user_name: String,
    pub semantic_info: String,
    pub extra_info: Option<String>,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<SemanticMap> for SemanticMapResponse {
    fn from(map: SemanticMap) -> Self {
        Self {
            id: map.id,
            pcd_file_id: map.pcd_file_id,
            user_name: map.user_name,
            semantic_info: map.semantic_info,
            extra_info: map.extra_info,
            create_time: map.created_at,
            update_time: map.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSemanticMapRequest {
    pub pcd_file_id: i64,
    pub user_name: String,
    pub semantic_info: String,
    pub extra_info: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSemanticMapRequest {
    pub pcd_file_id: Option<i64>,
    pub user_name: Option<String>,
    pub semantic_info: Option<String>,
    #[serde(default)]
    pub extra_info: Patch<String>,
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: TaskId,
    pub semantic_map_id: SemanticMapId,
    pub user_name: String,
    pub task_info: String,
    pub status: TaskStatus,
    pub extra_info: Option<String>,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            semantic_map_id: task.semantic_map_id,
            user_name: task.user_name,
            task_info: task.task_info,
            status: task.status,
            extra_info: task.extra_info,
            create_time: task.created_at,
            update_time: task.updated_at,
        }
    }
}

/// New tasks are always `pending`; a `status` field here is ignored
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub semantic_map_id: i64,
    pub user_name: String,
    pub task_info: String,
    pub extra_info: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub semantic_map_id: Option<i64>,
    pub user_name: Option<String>,
    pub task_info: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub extra_info: Patch<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_response_hides_password() {
        let mut device = Device::new(DeviceType::RobotBiped, Company::Cyborg, 22);
        device.password = Some("root".into());

        let json = serde_json::to_value(DeviceResponse::from(device)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["type"], "robot_biped");
        assert_eq!(json["status"], "offline");
        assert!(json.get("updateTime").is_some());
    }

    #[test]
    fn test_semantic_map_response_carries_reference_id_only() {
        let map = SemanticMap::new(PcdFileId::from_raw(7), "alice".into(), "{}".into());
        let json = serde_json::to_value(SemanticMapResponse::from(map)).unwrap();
        assert_eq!(json["pcdFileId"], 7);
        assert!(json.get("pcdFile").is_none());
    }

    #[test]
    fn test_update_device_request_patches() {
        let req: UpdateDeviceRequest =
            serde_json::from_str(r#"{"ip":null,"userName":"ops","status":"busy"}"#).unwrap();
        assert!(matches!(req.ip, Patch::Null));
        assert!(matches!(req.user_name, Patch::Value(ref v) if v == "ops"));
        assert!(req.password.is_absent());
        assert_eq!(req.status.as_deref(), Some("busy"));
    }

    #[test]
    fn test_create_task_request_ignores_status() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{"semanticMapId":1,"userName":"a","taskInfo":"{}","status":"running"}"#,
        )
        .unwrap();
        assert_eq!(req.semantic_map_id, 1);
    }
}
