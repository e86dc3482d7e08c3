use serde::{Deserialize, Serialize};

use super::repo_types::{CareGuide, Issue, PlantDetail, PlantSummaryRow};
use crate::{error::AppResult, validation::Violations};

const SHORT_TEXT: usize = 255;
const LONG_TEXT: usize = 5000;
const DESCRIPTION_TEXT: usize = 10000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CareGuideDto {
    pub watering: String,
    pub light: String,
    pub temperature: String,
    pub humidity: String,
    pub soil: String,
    pub fertilizing: String,
}

impl CareGuideDto {
    fn validate(&self, v: &mut Violations) {
        v.text("care.watering", "Watering information", &self.watering, LONG_TEXT);
        v.text("care.light", "Light information", &self.light, LONG_TEXT);
        v.text("care.temperature", "Temperature information", &self.temperature, LONG_TEXT);
        v.text("care.humidity", "Humidity information", &self.humidity, LONG_TEXT);
        v.text("care.soil", "Soil information", &self.soil, LONG_TEXT);
        v.text("care.fertilizing", "Fertilizing information", &self.fertilizing, LONG_TEXT);
    }
}

impl From<CareGuide> for CareGuideDto {
    fn from(c: CareGuide) -> Self {
        Self {
            watering: c.watering,
            light: c.light,
            temperature: c.temperature,
            humidity: c.humidity,
            soil: c.soil,
            fertilizing: c.fertilizing,
        }
    }
}

impl From<CareGuideDto> for CareGuide {
    fn from(c: CareGuideDto) -> Self {
        Self {
            watering: c.watering,
            light: c.light,
            temperature: c.temperature,
            humidity: c.humidity,
            soil: c.soil,
            fertilizing: c.fertilizing,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueDto {
    pub issue: String,
    pub solution: String,
}

impl From<Issue> for IssueDto {
    fn from(i: Issue) -> Self {
        Self {
            issue: i.issue,
            solution: i.solution,
        }
    }
}

/// Body of PUT /admin/plants/{id}; also the shared part of a create.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePlantRequest {
    pub group_id: String,
    pub name: String,
    pub scientific_name: String,
    pub thumbnail_id: String,
    pub image_ids: Vec<String>,
    pub description: String,
    pub size: String,
    pub toxicity: String,
    pub benefits: Vec<String>,
    pub care: Option<CareGuideDto>,
    pub common_issues: Vec<IssueDto>,
}

impl UpdatePlantRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut v = Violations::new();
        self.validate_into(&mut v);
        v.finish()
    }

    fn validate_into(&self, v: &mut Violations) {
        v.text("groupId", "Group ID", &self.group_id, SHORT_TEXT);
        v.text("name", "Plant name", &self.name, SHORT_TEXT);
        v.text("scientificName", "Scientific name", &self.scientific_name, SHORT_TEXT);
        v.text("thumbnailId", "Thumbnail ID", &self.thumbnail_id, SHORT_TEXT);

        if self.image_ids.is_empty() {
            v.push("imageIds", "At least one image is required");
        } else {
            v.count("imageIds", self.image_ids.len(), 1, 3, "Must have between 1 and 3 images");
        }

        v.text("description", "Description", &self.description, DESCRIPTION_TEXT);
        v.text("size", "Size information", &self.size, LONG_TEXT);
        v.text("toxicity", "Toxicity information", &self.toxicity, LONG_TEXT);

        if self.benefits.is_empty() {
            v.push("benefits", "At least one benefit is required");
        } else {
            v.count("benefits", self.benefits.len(), 4, 5, "Must have between 4 and 5 benefits");
        }

        match &self.care {
            Some(care) => care.validate(v),
            None => v.push("care", "Care guide is required"),
        }

        if self.common_issues.is_empty() {
            v.push("commonIssues", "At least one common issue is required");
        } else {
            v.count(
                "commonIssues",
                self.common_issues.len(),
                2,
                4,
                "Must have between 2 and 4 common issues",
            );
        }
        for (n, issue) in self.common_issues.iter().enumerate() {
            v.text(
                &format!("commonIssues[{n}].issue"),
                "Issue description",
                &issue.issue,
                LONG_TEXT,
            );
            v.text(
                &format!("commonIssues[{n}].solution"),
                "Solution",
                &issue.solution,
                LONG_TEXT,
            );
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePlantRequest {
    pub id: String,
    #[serde(flatten)]
    pub plant: UpdatePlantRequest,
}

impl CreatePlantRequest {
    pub fn validate(&self) -> AppResult<()> {
        let mut v = Violations::new();
        v.text("id", "Plant ID", &self.id, SHORT_TEXT);
        self.plant.validate_into(&mut v);
        v.finish()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantSummaryResponse {
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    pub thumbnail_id: Option<String>,
}

impl From<PlantSummaryRow> for PlantSummaryResponse {
    fn from(p: PlantSummaryRow) -> Self {
        Self {
            id: p.id,
            name: p.name,
            scientific_name: p.scientific_name,
            thumbnail_id: p.thumbnail_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantResponse {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub scientific_name: String,
    pub thumbnail_id: Option<String>,
    pub image_ids: Vec<String>,
    pub description: String,
    pub size: String,
    pub toxicity: String,
    pub benefits: Vec<String>,
    pub care: CareGuideDto,
    pub common_issues: Vec<IssueDto>,
}

impl From<PlantDetail> for PlantResponse {
    fn from(d: PlantDetail) -> Self {
        let p = d.row;
        Self {
            id: p.id,
            group_id: p.group_id,
            name: p.name,
            scientific_name: p.scientific_name,
            thumbnail_id: p.thumbnail_id,
            image_ids: d.image_ids,
            description: p.description,
            size: p.size,
            toxicity: p.toxicity,
            benefits: p.benefits,
            care: p.care.into(),
            common_issues: d.issues.into_iter().map(IssueDto::from).collect(),
        }
    }
}
