//! Database models and wire shapes.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::schema;

/// Registered account.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::users)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: i32,
    username: String,
    email: String,
    #[serde(skip_serializing)]
    password_hash: String,
    role: String,
    created_at: NaiveDateTime,
}

impl User {
    /// Whether the account may manage users and games.
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Role of ordinary players.
pub const ROLE_USER: &str = "user";
/// Role allowed to manage users and games.
pub const ROLE_ADMIN: &str = "admin";

/// Insertable user model for creating new accounts.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    username: String,
    email: String,
    password_hash: String,
}

/// A game that accepts scores.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters, Serialize, Deserialize)]
#[diesel(table_name = schema::games)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    id: String,
    name: String,
    description: Option<String>,
    created_at: NaiveDateTime,
}

/// Insertable game for the admin catalogue.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::games)]
pub struct NewGame {
    id: String,
    name: String,
    description: Option<String>,
}

/// Stored best score of one user in one game.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::scores)]
#[diesel(belongs_to(User))]
#[diesel(belongs_to(Game))]
pub struct Score {
    id: i32,
    user_id: i32,
    game_id: String,
    points: i32,
    date: NaiveDateTime,
}

/// Insertable score.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::scores)]
pub struct NewScore {
    user_id: i32,
    game_id: String,
    points: i32,
}

/// Insertable bearer token.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::tokens)]
pub struct NewToken {
    token: String,
    user_id: i32,
}

/// A score joined with its user and game names, as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    id: i32,
    user_id: i32,
    username: String,
    game_id: String,
    game_name: String,
    points: i32,
    date: NaiveDateTime,
}
