//! Mapping between wire DTOs and the stored row.

use sea_orm::{IntoActiveModel, Set};
use serde_json::json;
use storekit_db::{ResourceMapper, ValidationFailure};
use uuid::Uuid;

use crate::infra::storage::entity::project;

use super::{ProjectCreate, ProjectFilter, ProjectPatch, ProjectView};

/// Longest accepted project name, in characters.
pub const NAME_MAX: usize = 200;

/// Wires the `projects` resource into the generic CRUD service.
pub struct ProjectMapper;

impl ResourceMapper for ProjectMapper {
    type Entity = project::Entity;
    type View = ProjectView;
    type Create = ProjectCreate;
    type Patch = ProjectPatch;
    type Filter = ProjectFilter;

    const RESOURCE: &'static str = "project";

    fn new_row(&self, create: ProjectCreate) -> Result<project::ActiveModel, ValidationFailure> {
        let name = checked_name(create.name)?;
        Ok(project::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name),
            description: Set(create.description),
            is_deleted: Set(false),
            ..Default::default()
        })
    }

    fn merge_row(
        &self,
        current: project::Model,
        patch: ProjectPatch,
    ) -> Result<project::ActiveModel, ValidationFailure> {
        let mut row = current.into_active_model();
        if let Some(name) = patch.name {
            row.name = Set(checked_name(name)?);
        }
        if let Some(description) = patch.description {
            row.description = Set(Some(description));
        }
        Ok(row)
    }

    fn view(&self, model: project::Model) -> ProjectView {
        ProjectView {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn checked_name(name: String) -> Result<String, ValidationFailure> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationFailure::new("project name must not be empty")
            .with_errors(json!({ "name": ["must not be empty"] })));
    }
    if trimmed.chars().count() > NAME_MAX {
        return Err(ValidationFailure::new("project name is too long")
            .with_errors(json!({ "name": [format!("must be at most {NAME_MAX} characters")] })));
    }
    Ok(trimmed.to_owned())
}
