use sqlx::FromRow;
use time::OffsetDateTime;

/// Stored image including its bytes.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Image {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub created_date: OffsetDateTime,
}

/// Image metadata without the payload, for listings.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ImageMeta {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub created_date: OffsetDateTime,
}

impl From<&Image> for ImageMeta {
    fn from(img: &Image) -> Self {
        Self {
            id: img.id.clone(),
            filename: img.filename.clone(),
            content_type: img.content_type.clone(),
            created_date: img.created_date,
        }
    }
}
