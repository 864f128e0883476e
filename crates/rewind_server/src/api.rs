//! HTTP handlers for the score and auth gateway.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::auth;
use crate::db::{
    DbError, DbErrorKind, Game, ROLE_ADMIN, ROLE_USER, ScoreEntry, ScoreRepository, User,
};

/// Leaderboard size when the client does not ask for one.
pub const DEFAULT_LIMIT: i64 = 10;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    repo: ScoreRepository,
}

impl AppState {
    /// Wraps a repository.
    pub fn new(repo: ScoreRepository) -> Self {
        Self { repo }
    }

    /// Runs a blocking repository call off the async runtime.
    async fn blocking<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&ScoreRepository) -> Result<T, DbError> + Send + 'static,
    {
        let repo = self.repo.clone();
        tokio::task::spawn_blocking(move || f(&repo))
            .await
            .map_err(|e| ApiError::internal(format!("Worker failed: {}", e)))?
            .map_err(ApiError::from)
    }
}

/// Error returned to clients as `{message}` with a status code.
#[derive(Debug, Clone, derive_more::Display)]
#[display("{} {}", status, message)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Creates an error with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err.kind {
            DbErrorKind::Conflict => Self::new(StatusCode::CONFLICT, err.message),
            DbErrorKind::NotFound => Self::not_found(err.message),
            DbErrorKind::Query => {
                error!(error = %err, "Database failure");
                Self::internal("Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(MessageBody { message: self.message })).into_response()
    }
}

// ─────────────────────────────────────────────────────────────
//  Wire shapes
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

/// Registration payload. Missing fields are rejected with 400.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

/// Login payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    email: String,
    password: String,
}

/// Score submission payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    game_id: String,
    points: Option<i64>,
}

/// Role change payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoleRequest {
    role: String,
}

/// New catalogue entry.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateGameRequest {
    id: String,
    name: String,
    description: Option<String>,
}

/// Catalogue entry changes.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateGameRequest {
    name: String,
    description: Option<String>,
}

/// Leaderboard query string.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    limit: Option<i64>,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    message: &'static str,
    user: User,
    token: String,
}

#[derive(Debug, Serialize)]
struct UserResponse {
    user: User,
}

#[derive(Debug, Serialize)]
struct UsersResponse {
    users: Vec<User>,
}

#[derive(Debug, Serialize)]
struct UserChangedResponse {
    message: &'static str,
    user: User,
}

#[derive(Debug, Serialize)]
struct GameChangedResponse {
    message: &'static str,
    game: Game,
}

#[derive(Debug, Serialize)]
struct GamesResponse {
    games: Vec<Game>,
}

#[derive(Debug, Serialize)]
struct GameResponse {
    game: Game,
}

#[derive(Debug, Serialize)]
struct ScoresResponse {
    scores: Vec<ScoreEntry>,
}

#[derive(Debug, Serialize)]
struct ScoreCreatedResponse {
    message: &'static str,
    score: ScoreEntry,
}

// ─────────────────────────────────────────────────────────────
//  Router
// ─────────────────────────────────────────────────────────────

/// Builds the gateway's routes over `repo`.
pub fn router(repo: ScoreRepository) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/users", get(list_users))
        .route("/auth/users/{id}", delete(delete_user))
        .route("/auth/users/{id}/role", patch(set_role))
        .route("/games", get(list_games).post(create_game))
        .route("/games/{id}", get(get_game).put(update_game).delete(delete_game))
        .route("/scores", get(all_scores).post(submit_score))
        .route("/scores/game/{game_id}", get(game_scores))
        .route("/scores/user/{user_id}", get(user_scores))
        .with_state(AppState::new(repo))
}

/// Resolves the caller from the `Authorization` header.
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(auth::parse_bearer)
        .map(str::to_string)
        .ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    state
        .blocking(move |repo| repo.user_for_token(&token))
        .await?
        .ok_or_else(|| {
            warn!("Rejected unknown token");
            ApiError::unauthorized("Invalid token")
        })
}

/// Resolves the caller and requires the admin role.
async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let user = authenticate(state, headers).await?;
    if !user.is_admin() {
        warn!(user_id = user.id(), "Admin route refused");
        return Err(ApiError::forbidden("Requires admin privileges"));
    }
    Ok(user)
}

// ─────────────────────────────────────────────────────────────
//  Auth
// ─────────────────────────────────────────────────────────────

#[instrument(skip(state, body), fields(username = %body.username))]
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    if body.username.trim().is_empty() || body.email.trim().is_empty() || body.password.is_empty()
    {
        return Err(ApiError::bad_request("All fields are required"));
    }

    let hash = auth::hash_password(&body.password);
    let token = auth::new_token();
    let issued = token.clone();
    let user = state
        .blocking(move |repo| {
            let user = repo.create_user(body.username.trim(), body.email.trim(), hash)?;
            repo.store_token(*user.id(), &issued)?;
            Ok(user)
        })
        .await?;

    info!(user_id = user.id(), "Registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            user,
            token,
        }),
    ))
}

#[instrument(skip(state, body), fields(email = %body.email))]
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let email = body.email.trim().to_string();
    let user = state
        .blocking(move |repo| repo.find_user_by_email(&email))
        .await?
        .filter(|user| auth::verify_password(&body.password, user.password_hash()))
        .ok_or_else(|| {
            warn!("Login rejected");
            ApiError::unauthorized("Invalid credentials")
        })?;

    let token = auth::new_token();
    let issued = token.clone();
    let user_id = *user.id();
    state
        .blocking(move |repo| repo.store_token(user_id, &issued))
        .await?;

    info!(user_id, "Logged in");
    Ok(Json(AuthResponse {
        message: "Login successful",
        user,
        token,
    }))
}

#[instrument(skip(state, headers))]
async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, ApiError> {
    let user = authenticate(&state, &headers).await?;
    Ok(Json(UserResponse { user }))
}

#[instrument(skip(state, headers))]
async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UsersResponse>, ApiError> {
    require_admin(&state, &headers).await?;
    let users = state.blocking(|repo| repo.list_users()).await?;
    Ok(Json(UsersResponse { users }))
}

#[instrument(skip(state, headers))]
async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<MessageBody>, ApiError> {
    let admin = require_admin(&state, &headers).await?;
    if *admin.id() == id {
        return Err(ApiError::bad_request("Cannot delete your own account"));
    }
    state.blocking(move |repo| repo.delete_user(id)).await?;
    Ok(Json(MessageBody {
        message: "User deleted successfully".to_string(),
    }))
}

#[instrument(skip(state, headers, body), fields(role = %body.role))]
async fn set_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(body): Json<RoleRequest>,
) -> Result<Json<UserChangedResponse>, ApiError> {
    let admin = require_admin(&state, &headers).await?;
    if body.role != ROLE_USER && body.role != ROLE_ADMIN {
        return Err(ApiError::bad_request("Invalid role"));
    }
    if *admin.id() == id {
        return Err(ApiError::bad_request("Cannot change your own role"));
    }
    let user = state
        .blocking(move |repo| repo.set_role(id, &body.role))
        .await?;
    Ok(Json(UserChangedResponse {
        message: "User role updated successfully",
        user,
    }))
}

// ─────────────────────────────────────────────────────────────
//  Games
// ─────────────────────────────────────────────────────────────

#[instrument(skip(state))]
async fn list_games(State(state): State<AppState>) -> Result<Json<GamesResponse>, ApiError> {
    let games = state.blocking(|repo| repo.list_games()).await?;
    Ok(Json(GamesResponse { games }))
}

#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let game = state
        .blocking(move |repo| repo.get_game(&id))
        .await?
        .ok_or_else(|| ApiError::not_found("Game not found"))?;
    Ok(Json(GameResponse { game }))
}

#[instrument(skip(state, headers, body), fields(id = %body.id))]
async fn create_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameChangedResponse>), ApiError> {
    require_admin(&state, &headers).await?;
    if body.id.trim().is_empty() || body.name.trim().is_empty() {
        return Err(ApiError::bad_request("Game ID and name are required"));
    }
    let game = state
        .blocking(move |repo| {
            repo.create_game(body.id.trim(), body.name.trim(), body.description.as_deref())
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(GameChangedResponse {
            message: "Game added successfully",
            game,
        }),
    ))
}

#[instrument(skip(state, headers, body))]
async fn update_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateGameRequest>,
) -> Result<Json<GameChangedResponse>, ApiError> {
    require_admin(&state, &headers).await?;
    if body.name.trim().is_empty() {
        return Err(ApiError::bad_request("Game name is required"));
    }
    let game = state
        .blocking(move |repo| {
            repo.update_game(&id, body.name.trim(), body.description.as_deref())
        })
        .await?;
    Ok(Json(GameChangedResponse {
        message: "Game updated successfully",
        game,
    }))
}

#[instrument(skip(state, headers))]
async fn delete_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    require_admin(&state, &headers).await?;
    state.blocking(move |repo| repo.delete_game(&id)).await?;
    Ok(Json(MessageBody {
        message: "Game deleted successfully".to_string(),
    }))
}

// ─────────────────────────────────────────────────────────────
//  Scores
// ─────────────────────────────────────────────────────────────

#[instrument(skip(state))]
async fn all_scores(State(state): State<AppState>) -> Result<Json<ScoresResponse>, ApiError> {
    let scores = state.blocking(|repo| repo.all_scores()).await?;
    Ok(Json(ScoresResponse { scores }))
}

#[instrument(skip(state))]
async fn game_scores(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ScoresResponse>, ApiError> {
    let limit = query.limit.filter(|&n| n > 0).unwrap_or(DEFAULT_LIMIT);
    let scores = state
        .blocking(move |repo| repo.top_scores(&game_id, limit))
        .await?;
    Ok(Json(ScoresResponse { scores }))
}

#[instrument(skip(state))]
async fn user_scores(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<ScoresResponse>, ApiError> {
    let scores = state
        .blocking(move |repo| repo.user_scores(user_id))
        .await?;
    Ok(Json(ScoresResponse { scores }))
}

#[instrument(skip(state, headers, body), fields(game_id = %body.game_id, points = ?body.points))]
async fn submit_score(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SubmitScoreRequest>,
) -> Result<(StatusCode, Json<ScoreCreatedResponse>), ApiError> {
    let user = authenticate(&state, &headers).await?;

    let points = match body.points {
        _ if body.game_id.trim().is_empty() => {
            return Err(ApiError::bad_request("Game ID and points are required"));
        }
        None => return Err(ApiError::bad_request("Game ID and points are required")),
        Some(p) if p < 0 => return Err(ApiError::bad_request("Points must not be negative")),
        Some(p) => i32::try_from(p).map_err(|_| ApiError::bad_request("Points out of range"))?,
    };

    let user_id = *user.id();
    let game_id = body.game_id;
    let score = state
        .blocking(move |repo| repo.submit_score(user_id, &game_id, points))
        .await?;

    debug!(score_id = score.id(), best = score.points(), "Score accepted");
    Ok((
        StatusCode::CREATED,
        Json(ScoreCreatedResponse {
            message: "Score added successfully",
            score,
        }),
    ))
}
