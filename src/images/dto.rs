use serde::Serialize;
use time::OffsetDateTime;

use super::repo_types::ImageMeta;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_date: OffsetDateTime,
}

impl From<ImageMeta> for ImageResponse {
    fn from(m: ImageMeta) -> Self {
        Self {
            id: m.id,
            filename: m.filename,
            content_type: m.content_type,
            created_date: m.created_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageResponse {
    pub image_id: String,
}
