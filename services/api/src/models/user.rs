//! User, signin and invitation models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateInvitationRequest {
    pub collection_id: String,
}

/// Result of invitation validation; the backend shape is loosely defined
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InvitationResponse {
    #[serde(default)]
    pub valid: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST capsule/users/signup`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub firebase_token: String,
    pub email: String,
    pub collection_id: String,
    pub name: String,
    pub lastname: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserToken {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Body of `POST capsule/users/signin`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    pub user_token: UserToken,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BackendUser {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Response of signin and signup
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SigninResponse {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user: Option<BackendUser>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BackendUser {
    fn backend_id(&self) -> Option<&str> {
        non_empty(&self.id).or_else(|| non_empty(&self.user_id))
    }
}

impl SigninResponse {
    /// Backend user id, top-level first, then nested under `user`
    ///
    /// At each level `_id` wins over `userId`.
    pub fn user_id(&self) -> Option<&str> {
        non_empty(&self.id)
            .or_else(|| non_empty(&self.user_id))
            .or_else(|| self.user.as_ref().and_then(BackendUser::backend_id))
    }
}

fn non_empty(id: &Option<String>) -> Option<&str> {
    id.as_deref().filter(|id| !id.is_empty())
}
