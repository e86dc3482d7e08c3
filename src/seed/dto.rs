use serde::{Deserialize, Serialize};

use crate::plants::dto::{CareGuideDto, IssueDto};

/// Fixture document `plants-data.json`. Images are referenced by filename
/// under the fixture's `images/` directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedData {
    pub plant_groups: Vec<SeedPlantGroup>,
    pub plants: Vec<SeedPlant>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedPlantGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_filename: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedPlant {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub scientific_name: String,
    #[serde(default)]
    pub thumbnail_filename: Option<String>,
    #[serde(default)]
    pub image_filenames: Vec<String>,
    pub description: String,
    pub size: String,
    pub toxicity: String,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub care: CareGuideDto,
    #[serde(default)]
    pub common_issues: Vec<IssueDto>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
