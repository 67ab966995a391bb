use serde::Deserialize;

/// `GET /x/web-interface/card` response envelope.
#[derive(Debug, Deserialize)]
pub struct CardResponse {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<CardData>,
}

#[derive(Debug, Deserialize)]
pub struct CardData {
    pub card: Option<Card>,
}

#[derive(Debug, Deserialize)]
pub struct Card {
    pub name: String,
    // avatar URL
    pub face: String,
    pub fans: Option<u64>,
}

/// `GET /x/relation/stat` response envelope.
#[derive(Debug, Deserialize)]
pub struct RelationStatResponse {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<RelationStat>,
}

#[derive(Debug, Deserialize)]
pub struct RelationStat {
    pub follower: u64,
}
