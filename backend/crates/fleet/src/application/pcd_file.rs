//! PCD file management
//!
//! File names are unique among live files; the check runs here so the
//! caller gets a clear message, and the storage layer enforces it again.

use std::sync::Arc;

use kernel::pagination::{Page, PageRequest};
use kernel::patch::Patch;
use kernel::repository::not_found;

use crate::application::rules;
use crate::domain::entity::pcd_file::PcdFile;
use crate::domain::repository::PcdFileRepository;
use crate::domain::value_object::ids::PcdFileId;
use crate::error::{FleetError, FleetResult};

const NAME_TAKEN: &str = "pcd file name already exists";

pub struct CreatePcdFileInput {
    pub name: String,
    pub area: String,
    pub path: String,
    pub user_name: String,
    pub size: i64,
    pub minio_path: Option<String>,
    pub extra_info: Option<String>,
}

/// Absent fields are left unchanged
#[derive(Default)]
pub struct UpdatePcdFileInput {
    pub name: Option<String>,
    pub area: Option<String>,
    pub path: Option<String>,
    pub user_name: Option<String>,
    pub size: Option<i64>,
    pub minio_path: Patch<String>,
    pub extra_info: Patch<String>,
}

pub struct PcdFileService<P>
where
    P: PcdFileRepository,
{
    files: Arc<P>,
}

impl<P> PcdFileService<P>
where
    P: PcdFileRepository,
{
    pub fn new(files: Arc<P>) -> Self {
        Self { files }
    }

    pub async fn create(&self, input: CreatePcdFileInput) -> FleetResult<PcdFile> {
        let name = rules::pcd_name(&input.name)?;
        let mut file = PcdFile::new(
            name,
            rules::required("area", &input.area)?,
            rules::required("path", &input.path)?,
            rules::required("userName", &input.user_name)?,
            rules::size(input.size)?,
        );
        file.minio_path = input.minio_path;
        file.extra_info = input.extra_info;

        if self.files.find_by_name(&file.name).await?.is_some() {
            return Err(FleetError::Conflict(NAME_TAKEN.to_string()));
        }

        let file = self.files.create(file).await?;
        tracing::info!(pcd_file_id = %file.id, name = %file.name, size = file.size, "PCD file created");
        Ok(file)
    }

    pub async fn update(&self, id: PcdFileId, input: UpdatePcdFileInput) -> FleetResult<()> {
        let mut file = self.get(id).await?;

        if let Some(name) = input.name {
            let name = rules::pcd_name(&name)?;
            if name != file.name {
                let taken = self.files.find_by_name(&name).await?;
                if taken.is_some_and(|other| other.id != id) {
                    return Err(FleetError::Conflict(NAME_TAKEN.to_string()));
                }
                file.name = name;
            }
        }
        if let Some(area) = input.area {
            file.area = rules::required("area", &area)?;
        }
        if let Some(path) = input.path {
            file.path = rules::required("path", &path)?;
        }
        if let Some(user_name) = input.user_name {
            file.user_name = rules::required("userName", &user_name)?;
        }
        if let Some(size) = input.size {
            file.size = rules::size(size)?;
        }
        input.minio_path.apply_to(&mut file.minio_path);
        input.extra_info.apply_to(&mut file.extra_info);
        file.touch();

        self.files.update(&file).await?;
        tracing::info!(pcd_file_id = %id, "PCD file updated");
        Ok(())
    }

    pub async fn delete(&self, id: PcdFileId) -> FleetResult<()> {
        self.files.delete(id).await?;
        tracing::info!(pcd_file_id = %id, "PCD file deleted");
        Ok(())
    }

    pub async fn get(&self, id: PcdFileId) -> FleetResult<PcdFile> {
        self.files
            .find_by_id(id)
            .await?
            .ok_or_else(|| FleetError::from(not_found(id)))
    }

    pub async fn list(&self, request: PageRequest) -> FleetResult<Page<PcdFile>> {
        let window = request.resolve();
        let (items, total) = self.files.find_page(window).await?;
        Ok(Page::new(items, total, window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryFleetRepository;
    use kernel::ErrorKind;

    fn service() -> PcdFileService<MemoryFleetRepository> {
        PcdFileService::new(Arc::new(MemoryFleetRepository::new()))
    }

    fn input(name: &str) -> CreatePcdFileInput {
        CreatePcdFileInput {
            name: name.to_string(),
            area: "warehouse".into(),
            path: "/maps/warehouse".into(),
            user_name: "alice".into(),
            size: 2048,
            minio_path: None,
            extra_info: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let file = service.create(input("floor-1")).await.unwrap();

        let loaded = service.get(file.id).await.unwrap();
        assert_eq!(loaded.name, "floor-1");
        assert_eq!(loaded.size, 2048);
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let service = service();
        service.create(input("floor-1")).await.unwrap();

        let err = service.create(input("floor-1")).await.unwrap_err();
        assert!(matches!(err, FleetError::Conflict(ref m) if m == NAME_TAKEN));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_name_is_free_again_after_delete() {
        let service = service();
        let file = service.create(input("floor-1")).await.unwrap();
        service.delete(file.id).await.unwrap();

        assert!(service.create(input("floor-1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_validation() {
        let service = service();

        let mut bad = input(&"x".repeat(101));
        assert!(matches!(service.create(bad).await, Err(FleetError::Validation(_))));

        bad = input("ok");
        bad.size = -5;
        assert!(matches!(service.create(bad).await, Err(FleetError::Validation(_))));

        bad = input("ok");
        bad.area = " ".into();
        assert!(matches!(service.create(bad).await, Err(FleetError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_conflicts() {
        let service = service();
        service.create(input("a")).await.unwrap();
        let b = service.create(input("b")).await.unwrap();

        let err = service
            .update(
                b.id,
                UpdatePcdFileInput {
                    name: Some("a".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, FleetError::Conflict(_)));

        service
            .update(
                b.id,
                UpdatePcdFileInput {
                    name: Some("b".into()),
                    minio_path: Patch::Value("pcd/alice/b.pcd".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let updated = service.get(b.id).await.unwrap();
        assert_eq!(updated.minio_path.as_deref(), Some("pcd/alice/b.pcd"));
    }
}
