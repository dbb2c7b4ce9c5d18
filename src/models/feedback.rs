use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, de};
use sqlx::FromRow;

/// Size of the "latest feedback" window returned by every read.
pub const LATEST_WINDOW: i64 = 5;

/// A stored feedback row. Serialized with the column names of the
/// `feedbacks` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FeedbackEntry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub course: String,
    pub howheard: Option<String>,
    pub rating: i64,
    pub created_at: NaiveDateTime,
}

/// Body of `POST /api/feedback`.
///
/// Fields are optional on purpose: the server stores what the client sent and
/// lets the table's NOT NULL constraints reject missing values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedbackRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: Option<i64>,
    #[serde(default)]
    pub how_heard: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Browser forms post the star rating as a string ("4"), API callers as a
/// number. Both are accepted; `""` and `null` mean no rating.
fn deserialize_rating<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRating {
        Number(i64),
        Text(String),
    }

    match Option::<RawRating>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawRating::Number(n)) => Ok(Some(n)),
        Some(RawRating::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawRating::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid rating: {:?}", s))),
    }
}
