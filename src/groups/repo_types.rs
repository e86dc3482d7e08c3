use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PlantGroup {
    pub id: String,
    pub name: String,
    /// Weak reference; the image may have been deleted since.
    pub image_id: Option<String>,
}
