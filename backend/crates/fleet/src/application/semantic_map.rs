//! Semantic map management
//!
//! A map must point at a live PCD file; a dangling reference is a `Conflict`.

use std::sync::Arc;

use kernel::pagination::{Page, PageRequest};
use kernel::patch::Patch;
use kernel::repository::not_found;

use crate::application::rules;
use crate::domain::entity::semantic_map::SemanticMap;
use crate::domain::repository::{PcdFileRepository, SemanticMapRepository};
use crate::domain::value_object::ids::{PcdFileId, SemanticMapId};
use crate::error::{FleetError, FleetResult};

pub struct CreateSemanticMapInput {
    pub pcd_file_id: PcdFileId,
    pub user_name: String,
    pub semantic_info: String,
    pub extra_info: Option<String>,
}

/// Absent fields are left unchanged
#[derive(Default)]
pub struct UpdateSemanticMapInput {
    pub pcd_file_id: Option<PcdFileId>,
    pub user_name: Option<String>,
    pub semantic_info: Option<String>,
    pub extra_info: Patch<String>,
}

pub struct SemanticMapService<M, P>
where
    M: SemanticMapRepository,
    P: PcdFileRepository,
{
    maps: Arc<M>,
    files: Arc<P>,
}

impl<M, P> SemanticMapService<M, P>
where
    M: SemanticMapRepository,
    P: PcdFileRepository,
{
    pub fn new(maps: Arc<M>, files: Arc<P>) -> Self {
        Self { maps, files }
    }

    pub async fn create(&self, input: CreateSemanticMapInput) -> FleetResult<SemanticMap> {
        let mut map = SemanticMap::new(
            input.pcd_file_id,
            rules::required("userName", &input.user_name)?,
            rules::required("semanticInfo", &input.semantic_info)?,
        );
        map.extra_info = input.extra_info;
        self.ensure_pcd_file(map.pcd_file_id).await?;

        let map = self.maps.create(map).await?;
        tracing::info!(semantic_map_id = %map.id, pcd_file_id = %map.pcd_file_id, "Semantic map created");
        Ok(map)
    }

    pub async fn update(&self, id: SemanticMapId, input: UpdateSemanticMapInput) -> FleetResult<()> {
        let mut map = self.get(id).await?;

        if let Some(pcd_file_id) = input.pcd_file_id {
            if pcd_file_id != map.pcd_file_id {
                self.ensure_pcd_file(pcd_file_id).await?;
                map.pcd_file_id = pcd_file_id;
            }
        }
        if let Some(user_name) = input.user_name {
            map.user_name = rules::required("userName", &user_name)?;
        }
        if let Some(info) = input.semantic_info {
            map.semantic_info = rules::required("semanticInfo", &info)?;
        }
        input.extra_info.apply_to(&mut map.extra_info);
        map.touch();

        self.maps.update(&map).await?;
        tracing::info!(semantic_map_id = %id, "Semantic map updated");
        Ok(())
    }

    pub async fn delete(&self, id: SemanticMapId) -> FleetResult<()> {
        self.maps.delete(id).await?;
        tracing::info!(semantic_map_id = %id, "Semantic map deleted");
        Ok(())
    }

    pub async fn get(&self, id: SemanticMapId) -> FleetResult<SemanticMap> {
        self.maps
            .find_by_id(id)
            .await?
            .ok_or_else(|| FleetError::from(not_found(id)))
    }

    pub async fn list(&self, request: PageRequest) -> FleetResult<Page<SemanticMap>> {
        let window = request.resolve();
        let (items, total) = self.maps.find_page(window).await?;
        Ok(Page::new(items, total, window))
    }

    async fn ensure_pcd_file(&self, id: PcdFileId) -> FleetResult<()> {
        match self.files.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(FleetError::Conflict(format!("pcd file {id} does not exist"))),
        }
    }
}
