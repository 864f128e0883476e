//! Persistence layer for accounts, tokens and scores.

mod error;
mod models;
mod repository;
mod schema;

pub use error::{DbError, DbErrorKind};
pub use models::{
    Game, NewGame, NewScore, NewToken, NewUser, ROLE_ADMIN, ROLE_USER, Score, ScoreEntry, User,
};
pub use repository::{MIGRATIONS, ScoreRepository};
