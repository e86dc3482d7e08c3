use serde::{Deserialize, Serialize};

use super::repo_types::PlantGroup;
use crate::{error::AppResult, validation::Violations};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlantGroupRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_id: Option<String>,
}

impl CreatePlantGroupRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut v = Violations::new();
        v.text("id", "ID", &self.id, 100);
        v.text("name", "Name", &self.name, 255);
        v.finish()
    }
}

/// The id is fixed at creation and is taken from the path.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlantGroupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_id: Option<String>,
}

impl UpdatePlantGroupRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut v = Violations::new();
        v.text("name", "Name", &self.name, 255);
        v.finish()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantGroupResponse {
    pub id: String,
    pub name: String,
    pub image_id: Option<String>,
}

impl From<PlantGroup> for PlantGroupResponse {
    fn from(g: PlantGroup) -> Self {
        Self {
            id: g.id,
            name: g.name,
            image_id: g.image_id,
        }
    }
}
