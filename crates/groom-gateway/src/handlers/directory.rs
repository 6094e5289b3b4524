//! Browser-facing room directory and slug redirects.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};

use groom_auth::IdentityProvider;
use groom_control::{RoomControl, RoomOccupancy};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::GatewayState;

/// Render the room list with live occupancy.
pub async fn index<C, P>(
    State(state): State<Arc<GatewayState<C, P>>>,
    user: AuthUser,
) -> Result<Html<String>, ApiError>
where
    C: RoomControl + 'static,
    P: IdentityProvider + 'static,
{
    let rooms = state.rooms.list_rooms_with_occupancy().await?;
    Ok(Html(render_index(user.email(), &rooms)))
}

/// Redirect to the meeting behind `slug`.
pub async fn redirect<C, P>(
    State(state): State<Arc<GatewayState<C, P>>>,
    _user: AuthUser,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    C: RoomControl + 'static,
    P: IdentityProvider + 'static,
{
    let uri = state.rooms.resolve_slug(&slug).await?;

    tracing::debug!(slug = %slug, uri = %uri, "Redirecting to meeting");
    Ok((StatusCode::FOUND, [(header::LOCATION, uri)]))
}

fn render_index(email: &str, rooms: &[RoomOccupancy]) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Rooms</title></head>\n<body>\n",
    );

    let _ = writeln!(
        page,
        "<p>Signed in as {} (<a href=\"/auth/logout\">log out</a>)</p>",
        escape_html(email)
    );
    page.push_str("<h1>Rooms</h1>\n<ul>\n");

    for entry in rooms {
        let slug = escape_html(&entry.room.slug);
        let status = if entry.is_occupied {
            format!("occupied, {} connected", entry.participant_count)
        } else {
            "free".to_string()
        };
        let _ = writeln!(
            page,
            "<li><a href=\"/{slug}\" target=\"_blank\"><strong>{slug}</strong></a>: {status}</li>"
        );
    }

    page.push_str("</ul>\n</body>\n</html>\n");
    page
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use groom_control::Room;

    fn occupancy(slug: &str, participants: Option<usize>) -> RoomOccupancy {
        RoomOccupancy {
            room: Room {
                id: 1,
                slug: slug.to_string(),
                space_id: "spaces/abc".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            is_occupied: participants.is_some(),
            participant_count: participants.unwrap_or(0),
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn index_lists_rooms_with_occupancy() {
        let page = render_index(
            "alice@example.com",
            &[occupancy("standup", Some(3)), occupancy("retro", None)],
        );

        assert!(page.contains("alice@example.com"));
        assert!(page.contains("href=\"/standup\""));
        assert!(page.contains("occupied, 3 connected"));
        assert!(page.contains("<strong>retro</strong></a>: free"));
        assert!(page.contains("/auth/logout"));
    }
}
