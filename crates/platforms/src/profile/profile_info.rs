use serde::{Deserialize, Serialize};

/// Normalized public metrics for one account on one platform.
///
/// Every adapter produces this shape regardless of how the upstream
/// reports it (typed JSON payload, scraped page text, rendered DOM).
///
/// # Fields
///
/// * `username` - Display name of the account
/// * `avatar_url` - Optional avatar or thumbnail URL; scrape targets with
///   no addressable image use a static placeholder reference
/// * `followers` - Follower/subscriber/fan/member count, always a plain
///   non-negative integer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProfileInfo {
    pub username: String,
    pub avatar_url: Option<String>,
    pub followers: u64,
}

#[derive(Debug, Clone)]
pub struct ProfileInfoBuilder {
    username: String,
    avatar_url: Option<String>,
    followers: u64,
}

impl ProfileInfo {
    pub fn builder(username: impl Into<String>, followers: u64) -> ProfileInfoBuilder {
        ProfileInfoBuilder::new(username, followers)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl ProfileInfoBuilder {
    pub fn new(username: impl Into<String>, followers: u64) -> Self {
        Self {
            username: username.into(),
            avatar_url: None,
            followers,
        }
    }

    pub fn avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    pub fn avatar_url_opt(mut self, avatar_url: Option<String>) -> Self {
        self.avatar_url = avatar_url;
        self
    }

    pub fn build(self) -> ProfileInfo {
        ProfileInfo {
            username: self.username,
            avatar_url: self.avatar_url,
            followers: self.followers,
        }
    }
}
