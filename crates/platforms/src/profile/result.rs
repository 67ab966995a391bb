use serde::{Deserialize, Serialize};

use super::ProfileInfo;
use crate::extractor::error::ExtractorError;

/// Caller-facing outcome of one follower query.
///
/// Exactly one side is populated, gated by `success`: the profile triple
/// (`username`, `avatar`, `follower`) on success, `message` on failure.
/// This is the only place extractor errors are flattened to strings, so
/// nothing past the dispatch boundary ever has to handle a fault.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProfileResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follower: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProfileResult {
    pub fn ok(info: ProfileInfo) -> Self {
        Self {
            success: true,
            username: Some(info.username),
            avatar: info.avatar_url,
            follower: Some(info.followers),
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            username: None,
            avatar: None,
            follower: None,
            message: Some(message.into()),
        }
    }
}

impl From<Result<ProfileInfo, ExtractorError>> for ProfileResult {
    fn from(result: Result<ProfileInfo, ExtractorError>) -> Self {
        match result {
            Ok(info) => Self::ok(info),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}
