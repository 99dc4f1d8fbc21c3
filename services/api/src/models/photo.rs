//! Photo models for the capsule collections

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAuthor {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Photo stored in a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub edited: String,
    #[serde(default)]
    pub votes: u32,
    #[serde(rename = "type", default)]
    pub photo_type: String,
    #[serde(default)]
    pub available_to_share: bool,
    #[serde(default)]
    pub available_for_others: bool,
    pub author: Option<PhotoAuthor>,
}

/// One photo in an upload request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUpload {
    /// Base64 payload without any data-URL prefix
    pub file: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub available_for_others: bool,
    pub available_to_share: bool,
}

/// Body of `POST capsule/photos/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPhotosRequest {
    pub collection_id: String,
    pub photos: Vec<PhotoUpload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPhotosResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub photos: Vec<serde_json::Value>,
    #[serde(default)]
    pub collection_id: String,
}
