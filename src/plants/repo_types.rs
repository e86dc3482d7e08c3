use sqlx::FromRow;

/// Embedded care instructions, stored as `care_*` columns on `plants`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CareGuide {
    #[sqlx(rename = "care_watering")]
    pub watering: String,
    #[sqlx(rename = "care_light")]
    pub light: String,
    #[sqlx(rename = "care_temperature")]
    pub temperature: String,
    #[sqlx(rename = "care_humidity")]
    pub humidity: String,
    #[sqlx(rename = "care_soil")]
    pub soil: String,
    #[sqlx(rename = "care_fertilizing")]
    pub fertilizing: String,
}

/// Scalar columns of a plant.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PlantRow {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub scientific_name: String,
    pub thumbnail_id: Option<String>,
    pub description: String,
    pub size: String,
    pub toxicity: String,
    pub benefits: Vec<String>,
    #[sqlx(flatten)]
    pub care: CareGuide,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PlantSummaryRow {
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    pub thumbnail_id: Option<String>,
}

impl From<&PlantRow> for PlantSummaryRow {
    fn from(p: &PlantRow) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            scientific_name: p.scientific_name.clone(),
            thumbnail_id: p.thumbnail_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Issue {
    pub id: i64,
    pub plant_id: String,
    pub issue: String,
    pub solution: String,
}

/// Issue waiting for its generated id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub plant_id: String,
    pub issue: String,
    pub solution: String,
}

/// Everything written for one plant in a single unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlant {
    pub row: PlantRow,
    /// Gallery in display order.
    pub image_ids: Vec<String>,
    pub issues: Vec<NewIssue>,
}

/// Plant with its gallery and issues loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantDetail {
    pub row: PlantRow,
    pub image_ids: Vec<String>,
    pub issues: Vec<Issue>,
}
