//! Room management endpoints.
//!
//! This module provides the API-key protected CRUD handlers under `/api/rooms`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use groom_auth::IdentityProvider;
use groom_control::{CreateRoomRequest, Room, RoomControl, UpdateRoomRequest};

use crate::auth::ApiKey;
use crate::error::ApiError;
use crate::extract::Json as JsonBody;
use crate::state::GatewayState;

// =============================================================================
// Handlers
// =============================================================================

/// List all rooms.
///
/// `GET /api/rooms`
pub async fn list_rooms<C, P>(
    State(state): State<Arc<GatewayState<C, P>>>,
    _key: ApiKey,
) -> Result<Json<Vec<Room>>, ApiError>
where
    C: RoomControl + 'static,
    P: IdentityProvider + 'static,
{
    let rooms = state.rooms.list_rooms().await?;
    Ok(Json(rooms))
}

/// Create a new room and its Meet space.
///
/// `POST /api/rooms`
pub async fn create_room<C, P>(
    State(state): State<Arc<GatewayState<C, P>>>,
    _key: ApiKey,
    JsonBody(body): JsonBody<CreateRoomRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    C: RoomControl + 'static,
    P: IdentityProvider + 'static,
{
    let room = state.rooms.create_room(&body.slug).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// Get a room by ID.
///
/// `GET /api/rooms/:id`
pub async fn get_room<C, P>(
    State(state): State<Arc<GatewayState<C, P>>>,
    _key: ApiKey,
    Path(id): Path<String>,
) -> Result<Json<Room>, ApiError>
where
    C: RoomControl + 'static,
    P: IdentityProvider + 'static,
{
    let id = parse_room_id(&id)?;
    let room = state.rooms.get_room(id).await?;
    Ok(Json(room))
}

/// Point a room at a different space.
///
/// `PUT /api/rooms/:id`
pub async fn update_room<C, P>(
    State(state): State<Arc<GatewayState<C, P>>>,
    _key: ApiKey,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateRoomRequest>,
) -> Result<Json<Room>, ApiError>
where
    C: RoomControl + 'static,
    P: IdentityProvider + 'static,
{
    let id = parse_room_id(&id)?;
    let room = state.rooms.update_room(id, body).await?;
    Ok(Json(room))
}

/// Delete a room.
///
/// `DELETE /api/rooms/:id`
pub async fn delete_room<C, P>(
    State(state): State<Arc<GatewayState<C, P>>>,
    _key: ApiKey,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    C: RoomControl + 'static,
    P: IdentityProvider + 'static,
{
    let id = parse_room_id(&id)?;
    state.rooms.delete_room(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse a room ID from a path parameter.
fn parse_room_id(s: &str) -> Result<i64, ApiError> {
    s.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid room ID: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_room_id() {
        assert_eq!(parse_room_id("42").unwrap(), 42);
    }

    #[test]
    fn parse_invalid_room_id() {
        assert!(matches!(
            parse_room_id("abc"),
            Err(ApiError::BadRequest(_))
        ));
    }
}
