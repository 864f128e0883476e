//! Wire shapes exchanged with the score gateway.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// An account as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: i32,
    username: String,
    email: String,
    role: String,
    created_at: NaiveDateTime,
}

/// A token and the account it identifies.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Deserialize)]
pub struct AuthSession {
    user: Account,
    token: String,
}

/// A game known to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    id: String,
    name: String,
    description: Option<String>,
}

/// A stored best score.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    id: i32,
    user_id: i32,
    username: String,
    game_id: String,
    game_name: String,
    points: i32,
    date: NaiveDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitScore<'a> {
    pub game_id: &'a str,
    pub points: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreEnvelope {
    pub score: ScoreRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoresEnvelope {
    pub scores: Vec<ScoreRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GamesEnvelope {
    pub games: Vec<GameInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: Account,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MessageEnvelope {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_record_reads_gateway_json() {
        let json = r#"{"id":3,"userId":1,"username":"ada","gameId":"snake",
            "gameName":"Snake","points":120,"date":"2026-01-01T10:00:00"}"#;
        let record: ScoreRecord = serde_json::from_str(json).expect("decode");
        assert_eq!(record.game_id(), "snake");
        assert_eq!(*record.points(), 120);
    }

    #[test]
    fn test_submit_body_is_camel_case() {
        let body = serde_json::to_value(SubmitScore {
            game_id: "connect4",
            points: 100,
        })
        .expect("encode");
        assert_eq!(body, serde_json::json!({"gameId": "connect4", "points": 100}));
    }
}
