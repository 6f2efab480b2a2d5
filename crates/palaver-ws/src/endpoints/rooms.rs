//! Rooms endpoint: create, join, leave, invite, and discovery
//!
//! All room operations require an authenticated session. The endpoint only
//! claims `/rooms` paths; everything else stays available to later
//! endpoints in the dispatch order.

use super::check_version;
use crate::endpoint::Endpoint;
use crate::protocol::{Frame, HeaderBlock, Response};
use crate::rooms::RoomRegistry;
use crate::session::Session;
use crate::types::{SessionId, WsError, WsResult};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Protocol version accepted by this endpoint
pub const ROOMS_VERSION: &str = "1.0";

/// Handles room lifecycle and discovery requests
pub struct RoomsEndpoint {
    rooms: Arc<RoomRegistry>,
}

impl RoomsEndpoint {
    pub fn new(rooms: Arc<RoomRegistry>) -> Self {
        Self { rooms }
    }

    async fn get(&self, session: &Arc<Session>, path: &str) -> WsResult<bool> {
        match path {
            "/rooms" => {
                let names = self.rooms.public_room_names().await;
                session.send_response(
                    &Response::new(200, names.join("\n"))
                        .set("Room-Count", names.len().to_string())
                        .set("Endpoint", "/rooms")
                        .set("Content-Type", "application/text"),
                )?;
            }
            _ => session.send_response(&Response::new(501, "Not Implemented"))?,
        }
        Ok(true)
    }

    async fn post(&self, session: &Arc<Session>, path: &str, block: &HeaderBlock) -> WsResult<bool> {
        if !matches!(
            path,
            "/rooms/create" | "/rooms/join" | "/rooms/leave" | "/rooms/invite"
        ) {
            return Ok(false);
        }

        // every room operation names its room
        let Some(name) = block.get("name") else {
            session.send_response(&Response::new(
                400,
                "Missing Required Fields.\nSend valid name",
            ))?;
            return Ok(true);
        };

        match path {
            "/rooms/create" => {
                let is_private = block.get("private") == Some("true");
                match self.rooms.create(name, Some(session), is_private).await {
                    Ok(_) => session
                        .send_response(&Response::new(201, "Room Created.").set("Room", name))?,
                    Err(WsError::RoomExists(_)) => {
                        session.send_response(&Response::new(409, "Room Already Exists."))?
                    }
                    Err(error) => return Err(error),
                }
            }
            "/rooms/join" => {
                let Some(room) = self.rooms.get(name).await else {
                    session.send_response(&Response::new(404, "Room Not Found"))?;
                    return Ok(true);
                };
                let invited = room.owner() == Some(session.id())
                    || room.has_invite(session.id()).await;
                if room.is_private() && !invited {
                    session.send_response(&Response::new(403, "Invite Required."))?;
                    return Ok(true);
                }
                self.rooms.add_member(&room, session.id()).await;
                session.send_response(&Response::new(200, "Joined Room.").set("Room", name))?;
            }
            "/rooms/leave" => {
                let Some(room) = self.rooms.get(name).await else {
                    session.send_response(&Response::new(404, "Room Not Found"))?;
                    return Ok(true);
                };
                self.rooms.remove_member(&room, session.id()).await;
                session.send_response(&Response::new(200, "Left Room.").set("Room", name))?;
            }
            "/rooms/invite" => {
                let Some(room) = self.rooms.get(name).await else {
                    session.send_response(&Response::new(404, "Room Not Found"))?;
                    return Ok(true);
                };
                if room.owner() != Some(session.id()) {
                    session.send_response(&Response::new(403, "Not Room Owner."))?;
                    return Ok(true);
                }
                let Some(user_uuid) = block.get("user-uuid") else {
                    session.send_response(&Response::new(
                        400,
                        "Missing Required Fields.\nSend valid user-uuid",
                    ))?;
                    return Ok(true);
                };
                let Ok(uuid) = Uuid::parse_str(user_uuid) else {
                    session.send_response(&Response::new(400, "Invalid User UUID."))?;
                    return Ok(true);
                };
                room.invite(SessionId(uuid)).await;
                session.send_response(&Response::new(200, "User Invited.").set("Room", name))?;
            }
            _ => unreachable!("path was validated above"),
        }
        Ok(true)
    }
}

#[async_trait]
impl Endpoint for RoomsEndpoint {
    async fn on_message(&self, session: &Arc<Session>, frame: &Frame) -> WsResult<bool> {
        let Some(block) = frame.as_header() else {
            return Ok(false);
        };

        let mut parts = block.request_line.split_whitespace();
        let Some(method) = parts.next() else {
            return Ok(false);
        };
        if method != "GET" && method != "POST" {
            return Ok(false);
        }

        let Some(path) = parts.next() else {
            session.send_response(&Response::new(
                400,
                "Missing Required Fields.\nSend valid Endpoint",
            ))?;
            return Ok(true);
        };
        if path != "/rooms" && !path.starts_with("/rooms/") {
            return Ok(false);
        }

        let version = parts.next();
        if !check_version(session, version, ROOMS_VERSION)? {
            return Ok(true);
        }

        if !session.is_authenticated() {
            session.send_response(
                &Response::new(401, "Not Authorized.").set("Content-Type", "application/text"),
            )?;
            return Ok(true);
        }

        if method == "GET" {
            self.get(session, path).await
        } else {
            self.post(session, path, block).await
        }
    }
}
