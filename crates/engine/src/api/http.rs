//! HTTP routes.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path, Query, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use tapestry_domain::rules::{
    apply_character_rules, aspect_range_description, AspectFamily, CharacterRuleData,
    RuleValidationError, RuleViolation, ASPECT_MAX, ASPECT_MIN, BASE_HP, THREADS_MAX, THREADS_MIN,
};
use tapestry_domain::value_objects::SettingMetadata;
use tapestry_domain::{
    CampaignId, Character, CharacterId, CharacterStatus, GameSetting, PlayerId,
};

use super::auth::PlayerAuth;
use crate::app::App;
use crate::use_cases::characters::{
    CharacterPage, CreateCharacterInput, ListQuery, SnapshotView, UpdateCharacterInput,
};
use crate::use_cases::ManagementError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/rules/aspects", get(aspect_rules))
        .route("/api/rules/apply", post(apply_rules))
        .route("/api/settings", get(list_settings))
        .route(
            "/api/characters",
            get(list_characters).post(create_character),
        )
        .route(
            "/api/characters/{id}",
            get(get_character)
                .patch(update_character)
                .delete(delete_character),
        )
        .route("/api/characters/{id}/fork", post(fork_character))
        .route(
            "/api/characters/{id}/campaign",
            post(join_campaign).delete(leave_campaign),
        )
        .route("/api/characters/{id}/snapshot", get(character_snapshot))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Rules
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AspectRules {
    description: String,
    min: i32,
    max: i32,
    families: Vec<AspectFamilyInfo>,
    base_hp: i32,
    threads_min: i32,
    threads_max: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AspectFamilyInfo {
    family: AspectFamily,
    sub_aspects: Vec<&'static str>,
}

async fn aspect_rules() -> Json<AspectRules> {
    let families = AspectFamily::ALL
        .iter()
        .map(|family| AspectFamilyInfo {
            family: *family,
            sub_aspects: family.sub_aspects().iter().map(|s| s.as_str()).collect(),
        })
        .collect();

    Json(AspectRules {
        description: aspect_range_description(),
        min: ASPECT_MIN,
        max: ASPECT_MAX,
        families,
        base_hp: BASE_HP,
        threads_min: THREADS_MIN,
        threads_max: THREADS_MAX,
    })
}

async fn apply_rules(
    ApiJson(mut character): ApiJson<CharacterRuleData>,
) -> Result<Json<CharacterRuleData>, ApiError> {
    apply_character_rules(&mut character)?;
    Ok(Json(character))
}

// =============================================================================
// Settings
// =============================================================================

async fn list_settings() -> Json<Vec<SettingMetadata>> {
    Json(GameSetting::all().iter().map(GameSetting::metadata).collect())
}

// =============================================================================
// Characters
// =============================================================================

/// Query string for `GET /api/characters`.
///
/// Without `player` the caller's own characters are listed.
#[derive(Debug, Default, Deserialize)]
struct ListParams {
    player: Option<Uuid>,
    status: Option<String>,
    q: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinCampaignRequest {
    campaign_id: Uuid,
}

async fn list_characters(
    State(app): State<Arc<App>>,
    PlayerAuth(player_id): PlayerAuth,
    Query(params): Query<ListParams>,
) -> Result<Json<CharacterPage>, ApiError> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<CharacterStatus>)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let query = ListQuery {
        player_id: Some(params.player.map(PlayerId::from_uuid).unwrap_or(player_id)),
        status,
        query: params.q,
        page: params.page,
        limit: params.limit,
    };
    let page = app.use_cases.characters.list(query).await?;
    Ok(Json(page))
}

async fn create_character(
    State(app): State<Arc<App>>,
    PlayerAuth(player_id): PlayerAuth,
    ApiJson(input): ApiJson<CreateCharacterInput>,
) -> Result<(StatusCode, Json<Character>), ApiError> {
    let character = app.use_cases.characters.create(player_id, input).await?;
    Ok((StatusCode::CREATED, Json(character)))
}

async fn get_character(
    State(app): State<Arc<App>>,
    PlayerAuth(_): PlayerAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Character>, ApiError> {
    let character = app
        .use_cases
        .characters
        .get(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(character))
}

async fn update_character(
    State(app): State<Arc<App>>,
    PlayerAuth(player_id): PlayerAuth,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<UpdateCharacterInput>,
) -> Result<Json<Character>, ApiError> {
    let character = app
        .use_cases
        .characters
        .update(player_id, CharacterId::from_uuid(id), input)
        .await?;
    Ok(Json(character))
}

async fn delete_character(
    State(app): State<Arc<App>>,
    PlayerAuth(player_id): PlayerAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .characters
        .delete(player_id, CharacterId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn fork_character(
    State(app): State<Arc<App>>,
    PlayerAuth(player_id): PlayerAuth,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Character>), ApiError> {
    let forked = app
        .use_cases
        .characters
        .fork(player_id, CharacterId::from_uuid(id))
        .await?;
    Ok((StatusCode::CREATED, Json(forked)))
}

async fn join_campaign(
    State(app): State<Arc<App>>,
    PlayerAuth(player_id): PlayerAuth,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<JoinCampaignRequest>,
) -> Result<Json<Character>, ApiError> {
    let character = app
        .use_cases
        .characters
        .join_campaign(
            player_id,
            CharacterId::from_uuid(id),
            CampaignId::from_uuid(request.campaign_id),
        )
        .await?;
    Ok(Json(character))
}

async fn leave_campaign(
    State(app): State<Arc<App>>,
    PlayerAuth(player_id): PlayerAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Character>, ApiError> {
    let character = app
        .use_cases
        .characters
        .leave_campaign(player_id, CharacterId::from_uuid(id))
        .await?;
    Ok(Json(character))
}

async fn character_snapshot(
    State(app): State<Arc<App>>,
    PlayerAuth(player_id): PlayerAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<SnapshotView>, ApiError> {
    let view = app
        .use_cases
        .characters
        .snapshot(player_id, CharacterId::from_uuid(id))
        .await?;
    Ok(Json(view))
}

// =============================================================================
// Errors
// =============================================================================

/// `Json` body extractor whose rejections use the `ApiError` body shape.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Rules(RuleValidationError),
    Forbidden,
    NotFound,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Rules(e) => {
                let violations: &[RuleViolation] = e.violations();
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": e.to_string(), "violations": violations })),
                )
                    .into_response()
            }
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Character belongs to another player" })),
            )
                .into_response(),
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<RuleValidationError> for ApiError {
    fn from(e: RuleValidationError) -> Self {
        ApiError::Rules(e)
    }
}

impl From<ManagementError> for ApiError {
    fn from(e: ManagementError) -> Self {
        match e {
            ManagementError::NotFound => ApiError::NotFound,
            ManagementError::Forbidden => ApiError::Forbidden,
            ManagementError::InvalidInput(msg) => ApiError::BadRequest(msg),
            ManagementError::Rules(rules) => ApiError::Rules(rules),
            ManagementError::Domain(domain) => ApiError::BadRequest(domain.to_string()),
            ManagementError::Repo(repo) => ApiError::Internal(repo.to_string()),
        }
    }
}
