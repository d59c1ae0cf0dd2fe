//! PostgreSQL Repository Implementations
//!
//! Tables: `device`, `pcd_file`, `semantic_map`, `task`. Every read filters
//! `deleted_at IS NULL`; delete only stamps `deleted_at`.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::error::kind::ErrorKind;
use kernel::id::Id;
use kernel::pagination::{PageWindow, fetch_page};
use kernel::repository::{Repository, not_found};
use sqlx::PgPool;

use crate::domain::entity::{
    device::Device, pcd_file::PcdFile, semantic_map::SemanticMap, task::Task,
};
use crate::domain::repository::PcdFileRepository;
use crate::domain::value_object::{
    device_kind::{Company, DeviceStatus, DeviceType},
    ids::{DeviceId, PcdFileId, SemanticMapId, TaskId},
    task_status::TaskStatus,
};

/// PostgreSQL-backed fleet repository
#[derive(Clone)]
pub struct PgFleetRepository {
    pool: PgPool,
}

impl PgFleetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Soft-delete one row of `table`
    async fn soft_delete(&self, table: &str, id: i64) -> AppResult<u64> {
        let affected = sqlx::query(&format!(
            "UPDATE {table} SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected)
    }

    async fn live_count(&self, table: &str) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {table} WHERE deleted_at IS NULL"
        ))
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}

// ============================================================================
// Device Repository Implementation
// ============================================================================

const DEVICE_COLUMNS: &str = "id, type, company, ip, port, user_name, password, status, \
     extra_info, created_at, updated_at";

impl Repository<Device> for PgFleetRepository {
    async fn create(&self, mut device: Device) -> AppResult<Device> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO device (
                type,
                company,
                ip,
                port,
                user_name,
                password,
                status,
                extra_info,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(device.device_type.code())
        .bind(device.company.code())
        .bind(&device.ip)
        .bind(device.port)
        .bind(&device.user_name)
        .bind(&device.password)
        .bind(device.status.code())
        .bind(&device.extra_info)
        .bind(device.created_at)
        .bind(device.updated_at)
        .fetch_one(&self.pool)
        .await?;

        device.id = Id::from_raw(id);
        Ok(device)
    }

    async fn update(&self, device: &Device) -> AppResult<()> {
        let affected = sqlx::query(
            r#"
            UPDATE device SET
                type = $2,
                company = $3,
                ip = $4,
                port = $5,
                user_name = $6,
                password = $7,
                status = $8,
                extra_info = $9,
                updated_at = $10
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(device.id.value())
        .bind(device.device_type.code())
        .bind(device.company.code())
        .bind(&device.ip)
        .bind(device.port)
        .bind(&device.user_name)
        .bind(&device.password)
        .bind(device.status.code())
        .bind(&device.extra_info)
        .bind(device.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(not_found(device.id));
        }
        Ok(())
    }

    async fn delete(&self, id: DeviceId) -> AppResult<()> {
        if self.soft_delete("device", id.value()).await? == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: DeviceId) -> AppResult<Option<Device>> {
        let row = sqlx::query_as::<_, DeviceRow>(&format!(
            "SELECT {DEVICE_COLUMNS} FROM device WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(DeviceRow::into_device).transpose()
    }

    async fn find_page(&self, window: PageWindow) -> AppResult<(Vec<Device>, i64)> {
        let total = self.live_count("device").await?;

        fetch_page(total, || async {
            let rows = sqlx::query_as::<_, DeviceRow>(&format!(
                "SELECT {DEVICE_COLUMNS} FROM device WHERE deleted_at IS NULL \
                 ORDER BY id ASC LIMIT $1 OFFSET $2"
            ))
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await?;

            rows.into_iter()
                .map(DeviceRow::into_device)
                .collect::<AppResult<Vec<_>>>()
        })
        .await
    }
}

// ============================================================================
// PCD File Repository Implementation
// ============================================================================

const PCD_FILE_COLUMNS: &str =
    "id, name, area, path, user_name, size, minio_path, extra_info, created_at, updated_at";

impl Repository<PcdFile> for PgFleetRepository {
    async fn create(&self, mut file: PcdFile) -> AppResult<PcdFile> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO pcd_file (
                name,
                area,
                path,
                user_name,
                size,
                minio_path,
                extra_info,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&file.name)
        .bind(&file.area)
        .bind(&file.path)
        .bind(&file.user_name)
        .bind(file.size)
        .bind(&file.minio_path)
        .bind(&file.extra_info)
        .bind(file.created_at)
        .bind(file.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| rename_conflict(e.into(), "pcd file name already exists"))?;

        file.id = Id::from_raw(id);
        Ok(file)
    }

    async fn update(&self, file: &PcdFile) -> AppResult<()> {
        let affected = sqlx::query(
            r#"
            UPDATE pcd_file SET
                name = $2,
                area = $3,
                path = $4,
                user_name = $5,
                size = $6,
                minio_path = $7,
                extra_info = $8,
                updated_at = $9
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(file.id.value())
        .bind(&file.name)
        .bind(&file.area)
        .bind(&file.path)
        .bind(&file.user_name)
        .bind(file.size)
        .bind(&file.minio_path)
        .bind(&file.extra_info)
        .bind(file.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| rename_conflict(e.into(), "pcd file name already exists"))?
        .rows_affected();

        if affected == 0 {
            return Err(not_found(file.id));
        }
        Ok(())
    }

    async fn delete(&self, id: PcdFileId) -> AppResult<()> {
        if self.soft_delete("pcd_file", id.value()).await? == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: PcdFileId) -> AppResult<Option<PcdFile>> {
        let row = sqlx::query_as::<_, PcdFileRow>(&format!(
            "SELECT {PCD_FILE_COLUMNS} FROM pcd_file WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PcdFileRow::into_pcd_file))
    }

    async fn find_page(&self, window: PageWindow) -> AppResult<(Vec<PcdFile>, i64)> {
        let total = self.live_count("pcd_file").await?;

        fetch_page(total, || async {
            let rows = sqlx::query_as::<_, PcdFileRow>(&format!(
                "SELECT {PCD_FILE_COLUMNS} FROM pcd_file WHERE deleted_at IS NULL \
                 ORDER BY id ASC LIMIT $1 OFFSET $2"
            ))
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await?;

            Ok::<_, AppError>(rows.into_iter().map(PcdFileRow::into_pcd_file).collect())
        })
        .await
    }
}

impl PcdFileRepository for PgFleetRepository {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<PcdFile>> {
        let row = sqlx::query_as::<_, PcdFileRow>(&format!(
            "SELECT {PCD_FILE_COLUMNS} FROM pcd_file WHERE name = $1 AND deleted_at IS NULL"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PcdFileRow::into_pcd_file))
    }
}

// ============================================================================
// Semantic Map Repository Implementation
// ============================================================================

const SEMANTIC_MAP_COLUMNS: &str =
    "id, pcd_file_id, user_name, semantic_info, extra_info, created_at, updated_at";

impl Repository<SemanticMap> for PgFleetRepository {
    async fn create(&self, mut map: SemanticMap) -> AppResult<SemanticMap> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO semantic_map (
                pcd_file_id,
                user_name,
                semantic_info,
                extra_info,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(map.pcd_file_id.value())
        .bind(&map.user_name)
        .bind(&map.semantic_info)
        .bind(&map.extra_info)
        .bind(map.created_at)
        .bind(map.updated_at)
        .fetch_one(&self.pool)
        .await?;

        map.id = Id::from_raw(id);
        Ok(map)
    }

    async fn update(&self, map: &SemanticMap) -> AppResult<()> {
        let affected = sqlx::query(
            r#"
            UPDATE semantic_map SET
                pcd_file_id = $2,
                user_name = $3,
                semantic_info = $4,
                extra_info = $5,
                updated_at = $6
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(map.id.value())
        .bind(map.pcd_file_id.value())
        .bind(&map.user_name)
        .bind(&map.semantic_info)
        .bind(&map.extra_info)
        .bind(map.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(not_found(map.id));
        }
        Ok(())
    }

    async fn delete(&self, id: SemanticMapId) -> AppResult<()> {
        if self.soft_delete("semantic_map", id.value()).await? == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: SemanticMapId) -> AppResult<Option<SemanticMap>> {
        let row = sqlx::query_as::<_, SemanticMapRow>(&format!(
            "SELECT {SEMANTIC_MAP_COLUMNS} FROM semantic_map WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SemanticMapRow::into_semantic_map))
    }

    async fn find_page(&self, window: PageWindow) -> AppResult<(Vec<SemanticMap>, i64)> {
        let total = self.live_count("semantic_map").await?;

        fetch_page(total, || async {
            let rows = sqlx::query_as::<_, SemanticMapRow>(&format!(
                "SELECT {SEMANTIC_MAP_COLUMNS} FROM semantic_map WHERE deleted_at IS NULL \
                 ORDER BY id ASC LIMIT $1 OFFSET $2"
            ))
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await?;

            Ok::<_, AppError>(
                rows.into_iter()
                    .map(SemanticMapRow::into_semantic_map)
                    .collect(),
            )
        })
        .await
    }
}

// ============================================================================
// Task Repository Implementation
// ============================================================================

const TASK_COLUMNS: &str =
    "id, semantic_map_id, user_name, task_info, status, extra_info, created_at, updated_at";

impl Repository<Task> for PgFleetRepository {
    async fn create(&self, mut task: Task) -> AppResult<Task> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO task (
                semantic_map_id,
                user_name,
                task_info,
                status,
                extra_info,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(task.semantic_map_id.value())
        .bind(&task.user_name)
        .bind(&task.task_info)
        .bind(task.status.code())
        .bind(&task.extra_info)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await?;

        task.id = Id::from_raw(id);
        Ok(task)
    }

    async fn update(&self, task: &Task) -> AppResult<()> {
        let affected = sqlx::query(
            r#"
            UPDATE task SET
                semantic_map_id = $2,
                user_name = $3,
                task_info = $4,
                status = $5,
                extra_info = $6,
                updated_at = $7
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(task.id.value())
        .bind(task.semantic_map_id.value())
        .bind(&task.user_name)
        .bind(&task.task_info)
        .bind(task.status.code())
        .bind(&task.extra_info)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(not_found(task.id));
        }
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> AppResult<()> {
        if self.soft_delete("task", id.value()).await? == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> AppResult<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM task WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TaskRow::into_task).transpose()
    }

    async fn find_page(&self, window: PageWindow) -> AppResult<(Vec<Task>, i64)> {
        let total = self.live_count("task").await?;

        fetch_page(total, || async {
            let rows = sqlx::query_as::<_, TaskRow>(&format!(
                "SELECT {TASK_COLUMNS} FROM task WHERE deleted_at IS NULL \
                 ORDER BY id ASC LIMIT $1 OFFSET $2"
            ))
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await?;

            rows.into_iter()
                .map(TaskRow::into_task)
                .collect::<AppResult<Vec<_>>>()
        })
        .await
    }
}

/// Give a unique-violation a message naming the clashing field
fn rename_conflict(err: AppError, message: &'static str) -> AppError {
    if err.kind() == ErrorKind::Conflict {
        AppError::conflict(message).with_source(err)
    } else {
        err
    }
}

fn unknown_code(column: &str, code: &str) -> AppError {
    AppError::internal(format!("Unknown {column} code: {code}"))
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct DeviceRow {
    id: i64,
    #[sqlx(rename = "type")]
    device_type: String,
    company: String,
    ip: Option<String>,
    port: i32,
    user_name: Option<String>,
    password: Option<String>,
    status: String,
    extra_info: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DeviceRow {
    fn into_device(self) -> AppResult<Device> {
        let device_type = DeviceType::from_code(&self.device_type)
            .ok_or_else(|| unknown_code("device type", &self.device_type))?;
        let company = Company::from_code(&self.company)
            .ok_or_else(|| unknown_code("company", &self.company))?;
        let status = DeviceStatus::from_code(&self.status)
            .ok_or_else(|| unknown_code("device status", &self.status))?;

        Ok(Device {
            id: Id::from_raw(self.id),
            device_type,
            company,
            ip: self.ip,
            port: self.port,
            user_name: self.user_name,
            password: self.password,
            status,
            extra_info: self.extra_info,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PcdFileRow {
    id: i64,
    name: String,
    area: String,
    path: String,
    user_name: String,
    size: i64,
    minio_path: Option<String>,
    extra_info: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PcdFileRow {
    fn into_pcd_file(self) -> PcdFile {
        PcdFile {
            id: Id::from_raw(self.id),
            name: self.name,
            area: self.area,
            path: self.path,
            user_name: self.user_name,
            size: self.size,
            minio_path: self.minio_path,
            extra_info: self.extra_info,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SemanticMapRow {
    id: i64,
    pcd_file_id: i64,
    user_name: String,
    semantic_info: String,
    extra_info: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SemanticMapRow {
    fn into_semantic_map(self) -> SemanticMap {
        SemanticMap {
            id: Id::from_raw(self.id),
            pcd_file_id: Id::from_raw(self.pcd_file_id),
            user_name: self.user_name,
            semantic_info: self.semantic_info,
            extra_info: self.extra_info,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i64,
    semantic_map_id: i64,
    user_name: String,
    task_info: String,
    status: String,
    extra_info: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskRow {
    fn into_task(self) -> AppResult<Task> {
        let status = TaskStatus::from_code(&self.status)
            .ok_or_else(|| unknown_code("task status", &self.status))?;

        Ok(Task {
            id: Id::from_raw(self.id),
            semantic_map_id: Id::from_raw(self.semantic_map_id),
            user_name: self.user_name,
            task_info: self.task_info,
            status,
            extra_info: self.extra_info,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
