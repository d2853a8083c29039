//! Request DTOs.

use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};

use ziply_entity::share::FileDescriptor;
use ziply_service::share::{CreateShareInput, FileSource};

/// Upload grant request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    /// Name of the file about to be uploaded.
    #[serde(default)]
    pub file_name: String,
    /// MIME type the client will upload with.
    #[serde(default)]
    pub file_type: String,
}

/// JSON create-share request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    /// `text`, `link`, or `file`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Text or link content.
    pub content: Option<String>,
    /// Expiry keyword (`10m`, `1h`, `1d`, `7d`).
    pub duration: Option<String>,
    /// Delete after the first read.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub burn_on_read: bool,
    /// Short id issued by an upload grant.
    pub short_id: Option<String>,
    /// Descriptor of a file uploaded through a grant.
    pub file_data: Option<FileDescriptor>,
}

impl CreateShareRequest {
    /// Convert into the service input.
    pub fn into_input(self) -> CreateShareInput {
        CreateShareInput {
            kind: self.kind,
            content: self.content,
            file: self.file_data.map(FileSource::Uploaded),
            duration: self.duration,
            burn_on_read: self.burn_on_read,
            short_id: self.short_id.filter(|id| !id.is_empty()),
        }
    }
}

/// Owner delete request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteShareRequest {
    /// Owner key returned at creation.
    #[serde(default)]
    pub owner_key: String,
}

/// Query string of a signed blob URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobQuery {
    /// Unix expiry timestamp.
    pub expires: i64,
    /// Hex signature.
    pub signature: String,
    /// Suggested download filename.
    pub download: Option<String>,
    /// Content type bound into an upload signature.
    pub content_type: Option<String>,
}

/// Parses a form or JSON flag. Only `true` and `"true"` enable it.
pub fn parse_flag(value: &str) -> bool {
    value == "true"
}

/// Accepts `true`, `"true"`, or anything else (treated as `false`).
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Text(s)) => parse_flag(&s),
        Some(Flag::Other(_)) | None => false,
    })
}
