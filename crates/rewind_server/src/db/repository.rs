//! Database repository for accounts, tokens, games and scores.

use chrono::Utc;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::schema::{games, scores, tokens, users};
use crate::db::{DbError, Game, NewGame, NewScore, NewToken, NewUser, Score, ScoreEntry, User};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits for another writer before giving up.
pub const BUSY_TIMEOUT_MS: u32 = 5000;

/// Columns selected for a [`ScoreEntry`], in field order.
type EntryColumns = (
    scores::id,
    users::id,
    users::username,
    games::id,
    games::name,
    scores::points,
    scores::date,
);

const ENTRY_COLUMNS: EntryColumns = (
    scores::id,
    users::id,
    users::username,
    games::id,
    games::name,
    scores::points,
    scores::date,
);

/// Database repository for the score gateway.
#[derive(Debug, Clone)]
pub struct ScoreRepository {
    db_path: String,
}

impl ScoreRepository {
    /// Creates a repository for the SQLite database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating ScoreRepository");
        Ok(Self { db_path })
    }

    /// Path of the backing database.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    ///
    /// Every connection waits on locks held by concurrent writers and
    /// enforces foreign keys, so deletes cascade to scores and tokens.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            BUSY_TIMEOUT_MS
        ))?;
        Ok(conn)
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Accounts
    // ─────────────────────────────────────────────────────────────

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns a conflict [`DbError`] if the email or username is taken.
    #[instrument(skip(self, password_hash))]
    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: String,
    ) -> Result<User, DbError> {
        let mut conn = self.connection()?;
        conn.immediate_transaction(|conn| Self::insert_user(conn, username, email, password_hash))
    }

    fn insert_user(
        conn: &mut SqliteConnection,
        username: &str,
        email: &str,
        password_hash: String,
    ) -> Result<User, DbError> {
        let email_taken = users::table
            .filter(users::email.eq(email))
            .select(users::id)
            .first::<i32>(conn)
            .optional()?
            .is_some();
        if email_taken {
            return Err(DbError::conflict("Email already exists"));
        }

        let username_taken = users::table
            .filter(users::username.eq(username))
            .select(users::id)
            .first::<i32>(conn)
            .optional()?
            .is_some();
        if username_taken {
            return Err(DbError::conflict("Username already exists"));
        }

        let new_user = NewUser::new(username.to_string(), email.to_string(), password_hash);
        let user = diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(conn)?;

        info!(user_id = user.id(), username = %user.username(), "User created");
        Ok(user)
    }

    /// Looks up an account by email.
    #[instrument(skip(self))]
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let mut conn = self.connection()?;
        let user = users::table
            .filter(users::email.eq(email))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;
        debug!(found = user.is_some(), "User lookup by email");
        Ok(user)
    }

    /// Looks up an account by id.
    #[instrument(skip(self))]
    pub fn get_user(&self, user_id: i32) -> Result<Option<User>, DbError> {
        let mut conn = self.connection()?;
        let user = users::table
            .find(user_id)
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(user)
    }

    /// Every account, oldest first.
    #[instrument(skip(self))]
    pub fn list_users(&self) -> Result<Vec<User>, DbError> {
        let mut conn = self.connection()?;
        let users = users::table
            .order(users::id.asc())
            .select(User::as_select())
            .load(&mut conn)?;
        debug!(count = users.len(), "Users loaded");
        Ok(users)
    }

    /// Deletes an account together with its tokens and scores.
    ///
    /// # Errors
    ///
    /// Returns a not-found [`DbError`] if no such account exists.
    #[instrument(skip(self))]
    pub fn delete_user(&self, user_id: i32) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(users::table.find(user_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(DbError::not_found("User not found"));
        }
        info!(user_id, "User deleted");
        Ok(())
    }

    /// Changes an account's role.
    ///
    /// # Errors
    ///
    /// Returns a not-found [`DbError`] if no such account exists.
    #[instrument(skip(self))]
    pub fn set_role(&self, user_id: i32, role: &str) -> Result<User, DbError> {
        let mut conn = self.connection()?;
        let user = diesel::update(users::table.find(user_id))
            .set(users::role.eq(role))
            .returning(User::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::not_found("User not found"))?;
        info!(user_id, role, "Role changed");
        Ok(user)
    }

    /// Stores a bearer token for `user_id`.
    #[instrument(skip(self, token))]
    pub fn store_token(&self, user_id: i32, token: &str) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        diesel::insert_into(tokens::table)
            .values(&NewToken::new(token.to_string(), user_id))
            .execute(&mut conn)?;
        debug!(user_id, "Token stored");
        Ok(())
    }

    /// Resolves a bearer token to its account.
    #[instrument(skip(self, token))]
    pub fn user_for_token(&self, token: &str) -> Result<Option<User>, DbError> {
        let mut conn = self.connection()?;
        let user = tokens::table
            .inner_join(users::table)
            .filter(tokens::token.eq(token))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(user)
    }

    // ─────────────────────────────────────────────────────────────
    //  Games
    // ─────────────────────────────────────────────────────────────

    /// Lists every game, ordered by name.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<Game>, DbError> {
        let mut conn = self.connection()?;
        let games = games::table
            .order(games::name.asc())
            .select(Game::as_select())
            .load(&mut conn)?;
        debug!(count = games.len(), "Games loaded");
        Ok(games)
    }

    /// Looks up a game by id.
    #[instrument(skip(self))]
    pub fn get_game(&self, game_id: &str) -> Result<Option<Game>, DbError> {
        let mut conn = self.connection()?;
        let game = games::table
            .find(game_id)
            .select(Game::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(game)
    }

    /// Adds a game to the catalogue.
    ///
    /// # Errors
    ///
    /// Returns a conflict [`DbError`] if the id is taken.
    #[instrument(skip(self))]
    pub fn create_game(
        &self,
        game_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Game, DbError> {
        let mut conn = self.connection()?;
        conn.immediate_transaction::<_, DbError, _>(|conn| {
            let taken = games::table
                .find(game_id)
                .select(games::id)
                .first::<String>(conn)
                .optional()?
                .is_some();
            if taken {
                return Err(DbError::conflict("Game ID already exists"));
            }
            let new_game = NewGame::new(
                game_id.to_string(),
                name.to_string(),
                description.map(str::to_string),
            );
            let created = diesel::insert_into(games::table)
                .values(&new_game)
                .returning(Game::as_returning())
                .get_result(conn)?;
            info!(game_id, "Game added");
            Ok(created)
        })
    }

    /// Renames a game and replaces its description.
    ///
    /// # Errors
    ///
    /// Returns a not-found [`DbError`] if no such game exists.
    #[instrument(skip(self))]
    pub fn update_game(
        &self,
        game_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Game, DbError> {
        let mut conn = self.connection()?;
        let game = diesel::update(games::table.find(game_id))
            .set((games::name.eq(name), games::description.eq(description)))
            .returning(Game::as_returning())
            .get_result(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::not_found("Game not found"))?;
        info!(game_id, "Game updated");
        Ok(game)
    }

    /// Removes a game and every score recorded for it.
    ///
    /// # Errors
    ///
    /// Returns a not-found [`DbError`] if no such game exists.
    #[instrument(skip(self))]
    pub fn delete_game(&self, game_id: &str) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(games::table.find(game_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(DbError::not_found("Game not found"));
        }
        info!(game_id, "Game deleted");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Scores
    // ─────────────────────────────────────────────────────────────

    /// Records `points` for a user in a game, keeping the best result.
    ///
    /// The stored record (points and date) is replaced only when `points`
    /// beats it; otherwise the existing record is returned unchanged. The
    /// merge holds the write lock from its first read.
    ///
    /// # Errors
    ///
    /// Returns a not-found [`DbError`] if the game or user does not exist.
    #[instrument(skip(self))]
    pub fn submit_score(
        &self,
        user_id: i32,
        game_id: &str,
        points: i32,
    ) -> Result<ScoreEntry, DbError> {
        let mut conn = self.connection()?;

        conn.immediate_transaction::<_, DbError, _>(|conn| {
            let game_exists = games::table
                .find(game_id)
                .select(games::id)
                .first::<String>(conn)
                .optional()?
                .is_some();
            if !game_exists {
                return Err(DbError::not_found("Game not found"));
            }
            let user_exists = users::table
                .find(user_id)
                .select(users::id)
                .first::<i32>(conn)
                .optional()?
                .is_some();
            if !user_exists {
                return Err(DbError::not_found("User not found"));
            }

            let existing = scores::table
                .filter(scores::user_id.eq(user_id))
                .filter(scores::game_id.eq(game_id))
                .select(Score::as_select())
                .first(conn)
                .optional()?;

            let score_id = match existing {
                Some(score) if *score.points() >= points => {
                    debug!(best = score.points(), points, "Kept existing best score");
                    *score.id()
                }
                Some(score) => {
                    diesel::update(scores::table.find(*score.id()))
                        .set((
                            scores::points.eq(points),
                            scores::date.eq(Utc::now().naive_utc()),
                        ))
                        .execute(conn)?;
                    info!(previous = score.points(), points, "New best score");
                    *score.id()
                }
                None => {
                    let score = diesel::insert_into(scores::table)
                        .values(&NewScore::new(user_id, game_id.to_string(), points))
                        .returning(Score::as_returning())
                        .get_result(conn)?;
                    info!(points, "First score recorded");
                    *score.id()
                }
            };

            let entry = scores::table
                .inner_join(users::table)
                .inner_join(games::table)
                .filter(scores::id.eq(score_id))
                .select(ENTRY_COLUMNS)
                .first::<ScoreEntry>(conn)?;
            Ok(entry)
        })
    }

    /// Every score, highest first.
    #[instrument(skip(self))]
    pub fn all_scores(&self) -> Result<Vec<ScoreEntry>, DbError> {
        let mut conn = self.connection()?;
        let entries = scores::table
            .inner_join(users::table)
            .inner_join(games::table)
            .order((scores::points.desc(), scores::date.asc()))
            .select(ENTRY_COLUMNS)
            .load::<ScoreEntry>(&mut conn)?;
        Ok(entries)
    }

    /// Top `limit` scores of one game, highest first.
    #[instrument(skip(self))]
    pub fn top_scores(&self, game_id: &str, limit: i64) -> Result<Vec<ScoreEntry>, DbError> {
        let mut conn = self.connection()?;
        let entries = scores::table
            .inner_join(users::table)
            .inner_join(games::table)
            .filter(scores::game_id.eq(game_id))
            .order((scores::points.desc(), scores::date.asc()))
            .limit(limit)
            .select(ENTRY_COLUMNS)
            .load::<ScoreEntry>(&mut conn)?;
        debug!(count = entries.len(), "Leaderboard loaded");
        Ok(entries)
    }

    /// All scores of one user, most recent first.
    #[instrument(skip(self))]
    pub fn user_scores(&self, user_id: i32) -> Result<Vec<ScoreEntry>, DbError> {
        let mut conn = self.connection()?;
        let entries = scores::table
            .inner_join(users::table)
            .inner_join(games::table)
            .filter(scores::user_id.eq(user_id))
            .order(scores::date.desc())
            .select(ENTRY_COLUMNS)
            .load::<ScoreEntry>(&mut conn)?;
        Ok(entries)
    }
}
