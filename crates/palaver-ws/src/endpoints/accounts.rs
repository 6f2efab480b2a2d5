//! Account endpoint: registration, login, and user lookup
//!
//! Speaks the header-block protocol over `/register`, `/login`, and `/user`,
//! backed by whatever [`UserStore`] the host wires in.

use super::check_version;
use crate::endpoint::Endpoint;
use crate::protocol::{Frame, HeaderBlock, Response};
use crate::session::Session;
use crate::types::WsResult;
use async_trait::async_trait;
use palaver_auth::{validate_email, validate_password, Argon2Hasher, User, UserStore};
use std::sync::Arc;
use tracing::info;

/// Protocol version accepted by this endpoint
pub const ACCOUNTS_VERSION: &str = "1.0";

/// Handles account registration, login, and lookup requests
pub struct AccountsEndpoint {
    store: Arc<dyn UserStore>,
    hasher: Argon2Hasher,
}

impl AccountsEndpoint {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self::with_hasher(store, Argon2Hasher::default())
    }

    pub fn with_hasher(store: Arc<dyn UserStore>, hasher: Argon2Hasher) -> Self {
        Self { store, hasher }
    }

    async fn login(&self, session: &Arc<Session>, block: &HeaderBlock) -> WsResult<Response> {
        let (Some(email), Some(password)) = (block.get("email"), block.get("password")) else {
            return Ok(Response::new(
                400,
                "Missing Required Fields.\nUse email and password.",
            ));
        };

        let Some(user) = self.store.find_by_email(email).await? else {
            return Ok(Response::new(401, "Invalid Credentials."));
        };
        if !Argon2Hasher::verify_password(password, &user.password_hash)? {
            return Ok(Response::new(401, "Invalid Credentials."));
        }

        session.set_authenticated(true);
        session.set_metadata("user", user.summary()).await;
        info!(session = %session.id(), "login successful");
        Ok(Response::new(200, "Login Successful!").set("UUID", session.id().to_string()))
    }

    async fn user_info(&self, block: &HeaderBlock) -> WsResult<Response> {
        let Some(email) = block.get("email") else {
            return Ok(Response::new(400, "Missing Required Fields.\nUse email."));
        };

        let Some(user) = self.store.find_by_email(email).await? else {
            return Ok(Response::new(404, "User Not Found."));
        };

        let mut response = Response::new(200, "User Found.")
            .set("Username", &user.username)
            .set("Email", &user.email);
        if let Some(discord_id) = &user.discord_id {
            response = response.set("Discord ID", discord_id);
        }
        if let Some(discord_name) = &user.discord_name {
            response = response.set("Discord Name", discord_name);
        }
        if !user.friends.is_empty() {
            response = response.set("Friends", user.friends.join(","));
        }
        Ok(response)
    }

    async fn register(&self, block: &HeaderBlock) -> WsResult<Response> {
        let (Some(email), Some(username), Some(password)) = (
            block.get("email"),
            block.get("username"),
            block.get("password"),
        ) else {
            return Ok(Response::new(
                400,
                "Missing Required Fields.\nUse email, username, and password.",
            ));
        };

        if validate_email(email).is_err() {
            return Ok(Response::new(400, "Invalid Email."));
        }
        if validate_password(password).is_err() {
            return Ok(Response::new(
                400,
                "Invalid Password.\nIt must be 6-32 characters long, contain a number, \
                 capital letter, and a symbol.",
            ));
        }

        if self.store.exists(email).await? {
            return Ok(Response::new(409, "Account Already Exists with this Email."));
        }

        let user = User::new(username, email, self.hasher.hash_password(password)?);
        self.store.create_or_update(user).await?;
        info!(email, "account created");
        Ok(Response::new(201, "Account Created Successfully!"))
    }
}

#[async_trait]
impl Endpoint for AccountsEndpoint {
    async fn on_message(&self, session: &Arc<Session>, frame: &Frame) -> WsResult<bool> {
        let Some(block) = frame.as_header() else {
            return Ok(false);
        };

        let mut parts = block.request_line.split_whitespace();
        let method = parts.next();
        let path = parts.next();
        let version = parts.next();

        match (method, path) {
            (Some("GET"), Some("/user")) => {
                if !check_version(session, version, ACCOUNTS_VERSION)? {
                    return Ok(true);
                }
                let response = self.user_info(block).await?;
                session.send_response(
                    &response
                        .set("Endpoint", "/user")
                        .set("Content-Type", "application/text"),
                )?;
                Ok(true)
            }
            (Some("POST"), Some("/login")) => {
                if !check_version(session, version, ACCOUNTS_VERSION)? {
                    return Ok(true);
                }
                if session.is_authenticated() {
                    session.send_response(&Response::new(400, "Already validated."))?;
                    return Ok(true);
                }
                let response = self.login(session, block).await?;
                session.send_response(
                    &response
                        .set("Endpoint", "/login")
                        .set("Content-Type", "application/text"),
                )?;
                Ok(true)
            }
            (Some("POST"), Some("/register")) => {
                if !check_version(session, version, ACCOUNTS_VERSION)? {
                    return Ok(true);
                }
                let response = self.register(block).await?;
                session.send_response(
                    &response
                        .set("Endpoint", "/register")
                        .set("Content-Type", "application/text"),
                )?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::classify;
    use crate::test_support::recv_envelope;
    use crate::types::WsMessage;
    use palaver_auth::MemoryUserStore;
    use tokio::sync::mpsc::UnboundedReceiver;

    const EMAIL: &str = "frosty@example.com";
    const PASSWORD: &str = "Sup3r!pass";

    async fn endpoint_with_account() -> (AccountsEndpoint, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        let hash = Argon2Hasher::development().hash_password(PASSWORD).unwrap();
        store
            .create_or_update(User::new("frosty", EMAIL, hash))
            .await
            .unwrap();
        let endpoint =
            AccountsEndpoint::with_hasher(store.clone(), Argon2Hasher::development());
        (endpoint, store)
    }

    fn request(line: &str, headers: &[(&str, &str)]) -> Frame {
        let mut text = format!("{line}\r\n");
        for (key, value) in headers {
            text.push_str(&format!("{key}: {value}\r\n"));
        }
        text.push_str("\r\n");
        let frame = classify(text.into_bytes());
        assert!(frame.as_header().is_some(), "test request must classify");
        frame
    }

    async fn roundtrip(
        endpoint: &AccountsEndpoint,
        session: &Arc<Session>,
        receiver: &mut UnboundedReceiver<WsMessage>,
        frame: &Frame,
    ) -> crate::test_support::Envelope {
        let handled = endpoint.on_message(session, frame).await.unwrap();
        assert!(handled, "request should be handled");
        recv_envelope(receiver)
    }

    #[tokio::test]
    async fn login_marks_the_session_authenticated() {
        let (endpoint, _store) = endpoint_with_account().await;
        let (session, mut rx) = Session::pair();
        let frame = request(
            "POST /login Version/1.0",
            &[("email", EMAIL), ("password", PASSWORD)],
        );

        let envelope = roundtrip(&endpoint, &session, &mut rx, &frame).await;

        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.header("UUID"), Some(session.id().to_string()));
        assert_eq!(envelope.header("Endpoint"), Some("/login".to_string()));
        assert!(session.is_authenticated());
        let user = session.metadata("user").await.unwrap();
        assert_eq!(user["username"], "frosty");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let (endpoint, _store) = endpoint_with_account().await;
        let (session, mut rx) = Session::pair();
        let frame = request(
            "POST /login Version/1.0",
            &[("email", EMAIL), ("password", "Wrong1!pw")],
        );

        let envelope = roundtrip(&endpoint, &session, &mut rx, &frame).await;

        assert_eq!(envelope.status, 401);
        assert_eq!(envelope.body_text(), "Invalid Credentials.");
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn unknown_email_gets_the_same_rejection() {
        let (endpoint, _store) = endpoint_with_account().await;
        let (session, mut rx) = Session::pair();
        let frame = request(
            "POST /login Version/1.0",
            &[("email", "nobody@example.com"), ("password", PASSWORD)],
        );

        let envelope = roundtrip(&endpoint, &session, &mut rx, &frame).await;
        assert_eq!(envelope.status, 401);
    }

    #[tokio::test]
    async fn second_login_is_rejected() {
        let (endpoint, _store) = endpoint_with_account().await;
        let (session, mut rx) = Session::pair();
        session.set_authenticated(true);
        let frame = request(
            "POST /login Version/1.0",
            &[("email", EMAIL), ("password", PASSWORD)],
        );

        let envelope = roundtrip(&endpoint, &session, &mut rx, &frame).await;

        assert_eq!(envelope.status, 400);
        assert_eq!(envelope.body_text(), "Already validated.");
    }

    #[tokio::test]
    async fn missing_credentials_are_a_client_error() {
        let (endpoint, _store) = endpoint_with_account().await;
        let (session, mut rx) = Session::pair();
        let frame = request("POST /login Version/1.0", &[("email", EMAIL)]);

        let envelope = roundtrip(&endpoint, &session, &mut rx, &frame).await;
        assert_eq!(envelope.status, 400);
    }

    #[tokio::test]
    async fn registration_stores_a_hashed_account() {
        let (endpoint, store) = endpoint_with_account().await;
        let (session, mut rx) = Session::pair();
        let frame = request(
            "POST /register Version/1.0",
            &[
                ("email", "new@example.com"),
                ("username", "newcomer"),
                ("password", "Fresh1!pw"),
            ],
        );

        let envelope = roundtrip(&endpoint, &session, &mut rx, &frame).await;

        assert_eq!(envelope.status, 201);
        let stored = store.find_by_email("new@example.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "Fresh1!pw");
        assert!(Argon2Hasher::verify_password("Fresh1!pw", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (endpoint, _store) = endpoint_with_account().await;
        let (session, mut rx) = Session::pair();
        let frame = request(
            "POST /register Version/1.0",
            &[("email", EMAIL), ("username", "other"), ("password", "Fresh1!pw")],
        );

        let envelope = roundtrip(&endpoint, &session, &mut rx, &frame).await;

        assert_eq!(envelope.status, 409);
        assert_eq!(envelope.body_text(), "Account Already Exists with this Email.");
    }

    #[tokio::test]
    async fn malformed_email_and_weak_password_are_rejected() {
        let (endpoint, _store) = endpoint_with_account().await;
        let (session, mut rx) = Session::pair();

        let bad_email = request(
            "POST /register Version/1.0",
            &[("email", "not-an-email"), ("username", "x"), ("password", "Fresh1!pw")],
        );
        let envelope = roundtrip(&endpoint, &session, &mut rx, &bad_email).await;
        assert_eq!(envelope.status, 400);
        assert_eq!(envelope.body_text(), "Invalid Email.");

        let weak_password = request(
            "POST /register Version/1.0",
            &[("email", "ok@example.com"), ("username", "x"), ("password", "weak")],
        );
        let envelope = roundtrip(&endpoint, &session, &mut rx, &weak_password).await;
        assert_eq!(envelope.status, 400);
    }

    #[tokio::test]
    async fn user_lookup_by_email() {
        let (endpoint, _store) = endpoint_with_account().await;
        let (session, mut rx) = Session::pair();

        let found = request("GET /user HTTP/1.0", &[("email", EMAIL)]);
        let envelope = roundtrip(&endpoint, &session, &mut rx, &found).await;
        assert_eq!(envelope.status, 200);
        assert_eq!(envelope.header("Username"), Some("frosty".to_string()));
        assert_eq!(envelope.header("Email"), Some(EMAIL.to_string()));

        let missing = request("GET /user HTTP/1.0", &[("email", "nobody@example.com")]);
        let envelope = roundtrip(&endpoint, &session, &mut rx, &missing).await;
        assert_eq!(envelope.status, 404);
        assert_eq!(envelope.body_text(), "User Not Found.");
    }

    #[tokio::test]
    async fn version_mismatch_names_the_expected_version() {
        let (endpoint, _store) = endpoint_with_account().await;
        let (session, mut rx) = Session::pair();
        let frame = request(
            "POST /login Version/2.0",
            &[("email", EMAIL), ("password", PASSWORD)],
        );

        let envelope = roundtrip(&endpoint, &session, &mut rx, &frame).await;

        assert_eq!(envelope.status, 400);
        assert_eq!(envelope.body_text(), "Invalid Version.\nUse 1.0");
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn binary_frames_and_foreign_paths_are_not_claimed() {
        let (endpoint, _store) = endpoint_with_account().await;
        let (session, _rx) = Session::pair();

        let binary = Frame::Binary(vec![1, 2, 3]);
        assert!(!endpoint.on_message(&session, &binary).await.unwrap());

        let foreign = request("POST /rooms/create Version/1.0", &[("name", "den")]);
        assert!(!endpoint.on_message(&session, &foreign).await.unwrap());
    }
}
