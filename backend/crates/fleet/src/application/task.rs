//! Task management
//!
//! Tasks point at a live semantic map and are always created `pending`.

use std::sync::Arc;

use kernel::pagination::{Page, PageRequest};
use kernel::patch::Patch;
use kernel::repository::not_found;

use crate::application::rules;
use crate::domain::entity::task::Task;
use crate::domain::repository::{SemanticMapRepository, TaskRepository};
use crate::domain::value_object::{
    ids::{SemanticMapId, TaskId},
    task_status::TaskStatus,
};
use crate::error::{FleetError, FleetResult};

pub struct CreateTaskInput {
    pub semantic_map_id: SemanticMapId,
    pub user_name: String,
    pub task_info: String,
    pub extra_info: Option<String>,
}

/// Absent fields are left unchanged
#[derive(Default)]
pub struct UpdateTaskInput {
    pub semantic_map_id: Option<SemanticMapId>,
    pub user_name: Option<String>,
    pub task_info: Option<String>,
    pub status: Option<String>,
    pub extra_info: Patch<String>,
}

pub struct TaskService<T, M>
where
    T: TaskRepository,
    M: SemanticMapRepository,
{
    tasks: Arc<T>,
    maps: Arc<M>,
}

impl<T, M> TaskService<T, M>
where
    T: TaskRepository,
    M: SemanticMapRepository,
{
    pub fn new(tasks: Arc<T>, maps: Arc<M>) -> Self {
        Self { tasks, maps }
    }

    pub async fn create(&self, input: CreateTaskInput) -> FleetResult<Task> {
        let mut task = Task::new(
            input.semantic_map_id,
            rules::required("userName", &input.user_name)?,
            rules::required("taskInfo", &input.task_info)?,
        );
        task.extra_info = input.extra_info;
        self.ensure_semantic_map(task.semantic_map_id).await?;

        let task = self.tasks.create(task).await?;
        tracing::info!(task_id = %task.id, semantic_map_id = %task.semantic_map_id, "Task created");
        Ok(task)
    }

    pub async fn update(&self, id: TaskId, input: UpdateTaskInput) -> FleetResult<()> {
        let mut task = self.get(id).await?;

        if let Some(semantic_map_id) = input.semantic_map_id {
            if semantic_map_id != task.semantic_map_id {
                self.ensure_semantic_map(semantic_map_id).await?;
                task.semantic_map_id = semantic_map_id;
            }
        }
        if let Some(user_name) = input.user_name {
            task.user_name = rules::required("userName", &user_name)?;
        }
        if let Some(info) = input.task_info {
            task.task_info = rules::required("taskInfo", &info)?;
        }
        if let Some(code) = input.status {
            task.set_status(parse_status(&code)?);
        }
        input.extra_info.apply_to(&mut task.extra_info);
        task.touch();

        self.tasks.update(&task).await?;
        tracing::info!(task_id = %id, status = %task.status, "Task updated");
        Ok(())
    }

    pub async fn delete(&self, id: TaskId) -> FleetResult<()> {
        self.tasks.delete(id).await?;
        tracing::info!(task_id = %id, "Task deleted");
        Ok(())
    }

    pub async fn get(&self, id: TaskId) -> FleetResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| FleetError::from(not_found(id)))
    }

    pub async fn list(&self, request: PageRequest) -> FleetResult<Page<Task>> {
        let window = request.resolve();
        let (items, total) = self.tasks.find_page(window).await?;
        Ok(Page::new(items, total, window))
    }

    async fn ensure_semantic_map(&self, id: SemanticMapId) -> FleetResult<()> {
        match self.maps.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(FleetError::Conflict(format!(
                "semantic map {id} does not exist"
            ))),
        }
    }
}

fn parse_status(code: &str) -> FleetResult<TaskStatus> {
    TaskStatus::from_code(code).ok_or_else(|| {
        FleetError::Validation(
            "status must be one of pending, running, completed, failed, cancelled".to_string(),
        )
    })
}
