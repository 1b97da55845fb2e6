//! Typed Moxfield API client.
//!
//! Sole owner of network IO against the deck host. The write surface is
//! deliberately narrow because the remote API is: deck creation is
//! create-only, the card import is additive-only, and there is no supported
//! delete or per-card update. The client never pretends otherwise.
//!
//! The remote edge layer rejects bare HTTP clients with 403, so every
//! request carries a browser-like fingerprint (Chrome user agent, `origin`,
//! `referer`, and the web client's version header).

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    Board, CardLine, CreatedDeck, RemoteCard, RemoteDeckSnapshot, RemoteDeckSummary, Visibility,
};

const DEFAULT_API_BASE: &str = "https://api2.moxfield.com";
const WEB_ORIGIN: &str = "https://moxfield.com";
const WEB_CLIENT_VERSION: &str = "2026.02.16.1";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);
const LIST_PAGE_SIZE: u32 = 100;

/// Errors surfaced by the remote deck client
#[derive(Debug, Error)]
pub enum ClientError {
    /// 401/403: the bearer token is expired or invalid. Fatal for a whole
    /// batch run; never retried and never silently refreshed (a fresh token
    /// has to be extracted by a human, out of band).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The remote id no longer resolves (deck deleted out-of-band)
    #[error("Remote deck not found: {0}")]
    NotFound(String),

    /// Timeout / 5xx; retried with backoff before being surfaced
    #[error("Transient remote error: {0}")]
    Transient(String),

    /// Unexpected status or a payload missing required fields
    #[error("Remote protocol error: {0}")]
    Protocol(String),

    /// Reserved for optimistic-concurrency version mismatches; the current
    /// supersede policy never updates in place, so this is not yet produced
    #[error("Version conflict: {0}")]
    Conflict(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            Self::Transient(error.to_string())
        } else {
            Self::Protocol(error.to_string())
        }
    }
}

/// Remote operations the sync orchestrator depends on.
///
/// `MoxfieldClient` is the production implementation; tests drive the
/// orchestrator through an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait DeckHost {
    /// All decks owned by the configured user, fetched to completeness
    /// across pages
    async fn list_owned_decks(&self) -> ClientResult<Vec<RemoteDeckSummary>>;

    /// Full deck state by public or internal id
    async fn fetch_deck(&self, remote_id: &str) -> ClientResult<RemoteDeckSnapshot>;

    /// Create an empty deck. The engine always requests `Public` visibility;
    /// any other value makes the deck undiscoverable by `list_owned_decks`
    /// and therefore unverifiable.
    async fn create_deck(
        &self,
        name: &str,
        format: &str,
        visibility: Visibility,
    ) -> ClientResult<CreatedDeck>;

    /// Append cards to a deck. Additive only: calling this twice with the
    /// same lines doubles quantities, and there is no remote operation to
    /// remove or shrink a line afterwards.
    async fn import_cards(
        &self,
        internal_id: &str,
        cards: &[CardLine],
    ) -> ClientResult<RemoteDeckSnapshot>;
}

/// HTTP client for the Moxfield API.
///
/// The bearer token is supplied once at construction and lives only inside
/// the prepared request headers; nothing in this module reads ambient
/// process state.
#[derive(Debug, Clone)]
pub struct MoxfieldClient {
    api_base: String,
    owner: String,
    client: Client,
}

impl MoxfieldClient {
    pub fn new(owner: impl Into<String>, bearer_token: &str) -> ClientResult<Self> {
        let bearer_token = bearer_token.trim();
        if bearer_token.is_empty() {
            return Err(ClientError::Auth(
                "bearer token must not be empty".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {bearer_token}"))
                .map_err(|_| ClientError::Auth("bearer token is not a valid header value".to_string()))?,
        );
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(reqwest::header::ORIGIN, HeaderValue::from_static(WEB_ORIGIN));
        headers.insert(
            reqwest::header::REFERER,
            HeaderValue::from_static("https://moxfield.com/"),
        );
        headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(BROWSER_USER_AGENT),
        );
        headers.insert(
            HeaderName::from_static("x-moxfield-version"),
            HeaderValue::from_static(WEB_CLIENT_VERSION),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            api_base: DEFAULT_API_BASE.to_string(),
            owner: owner.into(),
            client,
        })
    }

    /// Override the API base URL (tests, proxies)
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request_json(Method::GET, path, None::<&()>, &[]).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.request_json(Method::POST, path, Some(body), &[]).await
    }

    async fn request_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        extra_headers: &[(&'static str, String)],
    ) -> ClientResult<T> {
        let response = self.request_raw(method, path, body, extra_headers).await?;
        Ok(response.json::<T>().await?)
    }

    /// Issue one request with the bounded retry policy: only `Transient`
    /// errors are retried, with exponential backoff, up to `MAX_ATTEMPTS`.
    /// `extra_headers` supplements the client's defaults for endpoints that
    /// demand per-request state (deck version, public id). Returns the raw
    /// success response; callers that only care about the status discard it.
    async fn request_raw<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        extra_headers: &[(&'static str, String)],
    ) -> ClientResult<reqwest::Response> {
        let url = format!("{}{path}", self.api_base);
        let mut attempt = 1;
        loop {
            let mut request = self.client.request(method.clone(), &url);
            for (name, value) in extra_headers {
                request = request.header(*name, value);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            match Self::send_checked(request).await {
                Err(ClientError::Transient(detail)) if attempt < MAX_ATTEMPTS => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        "Transient error from {url} (attempt {attempt}/{MAX_ATTEMPTS}): \
                         {detail}; retrying in {delay:?}"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn send_checked(request: reqwest::RequestBuilder) -> ClientResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }
        Ok(response)
    }
}

impl DeckHost for MoxfieldClient {
    async fn list_owned_decks(&self) -> ClientResult<Vec<RemoteDeckSummary>> {
        let mut summaries = Vec::new();
        let mut page_number = 1u32;
        loop {
            let page: DeckListPage = self
                .get_json(&format!(
                    "/v2/users/{}/decks?pageNumber={page_number}&pageSize={LIST_PAGE_SIZE}",
                    self.owner
                ))
                .await?;

            let batch = page.data.ok_or_else(|| {
                ClientError::Protocol("deck listing response did not include data".to_string())
            })?;
            let batch_len = batch.len();
            for payload in batch {
                summaries.push(RemoteDeckSummary::try_from(payload)?);
            }

            let finished = match page.total_pages {
                Some(total_pages) => page_number >= total_pages,
                None => batch_len < LIST_PAGE_SIZE as usize,
            };
            if finished {
                return Ok(summaries);
            }
            page_number += 1;
        }
    }

    async fn fetch_deck(&self, remote_id: &str) -> ClientResult<RemoteDeckSnapshot> {
        let payload: DeckPayload = self.get_json(&format!("/v3/decks/all/{remote_id}")).await?;
        RemoteDeckSnapshot::try_from(payload)
    }

    async fn create_deck(
        &self,
        name: &str,
        format: &str,
        visibility: Visibility,
    ) -> ClientResult<CreatedDeck> {
        let body = serde_json::json!({
            "name": name,
            "format": format,
            "visibility": visibility.as_str(),
        });
        let payload: DeckPayload = self.post_json("/v3/decks", &body).await?;

        let public_id = payload.public_id.clone().ok_or_else(|| {
            ClientError::Protocol("create response did not include publicId".to_string())
        })?;
        let internal_id = match payload.id {
            Some(internal_id) => internal_id,
            // Some create responses omit the short id; the full fetch
            // always carries it.
            None => self.fetch_deck(&public_id).await?.internal_id,
        };

        tracing::info!("Created remote deck {public_id} ({name})");
        Ok(CreatedDeck {
            public_id,
            internal_id,
        })
    }

    async fn import_cards(
        &self,
        internal_id: &str,
        cards: &[CardLine],
    ) -> ClientResult<RemoteDeckSnapshot> {
        let body = serde_json::json!({ "importText": render_import_text(cards) });
        let payload: DeckPayload = self
            .post_json(&format!("/v2/decks/{internal_id}/import"), &body)
            .await?;
        tracing::info!("Imported {} card lines into deck {internal_id}", cards.len());
        let mut snapshot = RemoteDeckSnapshot::try_from(payload)?;

        // The import endpoint files everything into the mainboard; commander
        // lines are moved to the command zone afterwards, one zone POST per
        // line. Each move bumps the deck version, so re-fetch between moves.
        for line in cards.iter().filter(|line| line.board == Board::Commander) {
            self.move_to_commanders(&snapshot, line).await?;
            snapshot = self.fetch_deck(&snapshot.public_id).await?;
        }
        for line in cards.iter().filter(|line| line.board == Board::Commander) {
            if snapshot
                .board(Board::Main)
                .any(|card| card.name.eq_ignore_ascii_case(&line.name))
            {
                return Err(ClientError::Protocol(format!(
                    "commander {:?} remained in the mainboard after the zone move",
                    line.name
                )));
            }
        }
        Ok(snapshot)
    }
}

impl MoxfieldClient {
    /// Move one imported card from the mainboard into the command zone.
    ///
    /// The service removes the mainboard copy itself when the zone POST
    /// succeeds; `import_cards` verifies that afterwards and fails closed if
    /// the copy lingers, since a deck with its commander in the mainboard
    /// would never compare equal to its source file again.
    async fn move_to_commanders(
        &self,
        snapshot: &RemoteDeckSnapshot,
        line: &CardLine,
    ) -> ClientResult<()> {
        if snapshot
            .board(Board::Commander)
            .any(|card| card.name.eq_ignore_ascii_case(&line.name))
        {
            return Ok(());
        }

        let card = snapshot
            .board(Board::Main)
            .find(|card| card.name.eq_ignore_ascii_case(&line.name))
            .ok_or_else(|| {
                ClientError::Protocol(format!(
                    "imported deck {} is missing commander {:?}",
                    snapshot.public_id, line.name
                ))
            })?;

        let body = serde_json::json!({ "cardId": card.card_id, "quantity": line.quantity });
        self.request_raw(
            Method::POST,
            &format!("/v2/decks/{}/cards/commanders", snapshot.internal_id),
            Some(&body),
            &[
                ("x-deck-version", snapshot.version.to_string()),
                ("x-public-deck-id", snapshot.public_id.clone()),
            ],
        )
        .await?;
        tracing::info!(
            "Moved {:?} into the command zone of deck {}",
            line.name,
            snapshot.public_id
        );
        Ok(())
    }
}

/// Render card lines as Moxfield bulk-import text, commander lines first.
/// Import text carries no zone information; commander placement happens via
/// a separate zone move after the import lands.
fn render_import_text(cards: &[CardLine]) -> String {
    let mut lines = Vec::with_capacity(cards.len());
    for line in cards.iter().filter(|line| line.board == Board::Commander) {
        lines.push(format!("{} {}", line.quantity, line.name));
    }
    for line in cards.iter().filter(|line| line.board == Board::Main) {
        lines.push(format!("{} {}", line.quantity, line.name));
    }
    lines.join("\n")
}

fn backoff_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY * 2u32.saturating_pow(attempt.saturating_sub(1))
}

fn classify_status(status: StatusCode, body: &str) -> ClientError {
    let detail = parse_api_error(status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Auth(format!(
            "{detail}; bearer token may be expired or invalid"
        )),
        StatusCode::NOT_FOUND => ClientError::NotFound(detail),
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            ClientError::Transient(detail)
        }
        status if status.is_server_error() => ClientError::Transient(detail),
        _ => ClientError::Protocol(detail),
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

// ---------------------------------------------------------------------------
// Wire payloads. Every shape consumed from the API is modelled explicitly
// and validated on conversion; missing fields fail closed with `Protocol`
// instead of propagating nulls.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeckListPage {
    data: Option<Vec<DeckSummaryPayload>>,
    total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeckSummaryPayload {
    public_id: Option<String>,
    name: Option<String>,
    format: Option<String>,
}

impl TryFrom<DeckSummaryPayload> for RemoteDeckSummary {
    type Error = ClientError;

    fn try_from(payload: DeckSummaryPayload) -> ClientResult<Self> {
        Ok(Self {
            public_id: payload.public_id.ok_or_else(|| {
                ClientError::Protocol("deck summary did not include publicId".to_string())
            })?,
            name: payload.name.ok_or_else(|| {
                ClientError::Protocol("deck summary did not include name".to_string())
            })?,
            format: payload.format.unwrap_or_else(|| "unknown".to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeckPayload {
    id: Option<String>,
    public_id: Option<String>,
    version: Option<i64>,
    boards: Option<HashMap<String, BoardPayload>>,
}

#[derive(Debug, Deserialize)]
struct BoardPayload {
    #[serde(default)]
    cards: HashMap<String, BoardEntryPayload>,
}

#[derive(Debug, Deserialize)]
struct BoardEntryPayload {
    quantity: Option<u32>,
    card: Option<CardInfoPayload>,
}

#[derive(Debug, Deserialize)]
struct CardInfoPayload {
    id: Option<String>,
    name: Option<String>,
}

impl TryFrom<DeckPayload> for RemoteDeckSnapshot {
    type Error = ClientError;

    fn try_from(payload: DeckPayload) -> ClientResult<Self> {
        let public_id = payload.public_id.ok_or_else(|| {
            ClientError::Protocol("deck payload did not include publicId".to_string())
        })?;
        let internal_id = payload
            .id
            .ok_or_else(|| ClientError::Protocol("deck payload did not include id".to_string()))?;
        let version = payload.version.ok_or_else(|| {
            ClientError::Protocol("deck payload did not include version".to_string())
        })?;

        let mut cards = Vec::new();
        if let Some(boards) = payload.boards {
            for (board_name, board) in boards {
                // Zones the sync engine does not model (sideboard,
                // maybeboard, tokens) are skipped.
                let target = match board_name.as_str() {
                    "mainboard" => Board::Main,
                    "commanders" => Board::Commander,
                    _ => continue,
                };
                for entry in board.cards.into_values() {
                    cards.push(remote_card(entry, target)?);
                }
            }
        }
        // HashMap iteration order is arbitrary; keep snapshots deterministic.
        cards.sort_by(|a, b| {
            (a.board, a.name.to_lowercase(), &a.card_id)
                .cmp(&(b.board, b.name.to_lowercase(), &b.card_id))
        });

        Ok(Self {
            public_id,
            internal_id,
            version,
            cards,
        })
    }
}

fn remote_card(entry: BoardEntryPayload, board: Board) -> ClientResult<RemoteCard> {
    let card = entry.card.ok_or_else(|| {
        ClientError::Protocol("board entry did not include card details".to_string())
    })?;
    Ok(RemoteCard {
        card_id: card.id.ok_or_else(|| {
            ClientError::Protocol("board entry did not include a card id".to_string())
        })?,
        name: card.name.ok_or_else(|| {
            ClientError::Protocol("board entry did not include a card name".to_string())
        })?,
        quantity: entry.quantity.ok_or_else(|| {
            ClientError::Protocol("board entry did not include a quantity".to_string())
        })?,
        board,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_classification_covers_the_taxonomy() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, ""),
            ClientError::Auth(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, ""),
            ClientError::Auth(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, ""),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, ""),
            ClientError::Transient(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ClientError::Transient(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::UNPROCESSABLE_ENTITY, ""),
            ClientError::Protocol(_)
        ));
    }

    #[test]
    fn api_error_prefers_structured_message() {
        let detail = parse_api_error(
            StatusCode::BAD_REQUEST,
            r#"{"message": "Deck name is required"}"#,
        );
        assert_eq!(detail, "Deck name is required (400)");

        let fallback = parse_api_error(StatusCode::BAD_GATEWAY, "");
        assert_eq!(fallback, "HTTP 502");
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_delay(1), Duration::from_millis(250));
        assert_eq!(backoff_delay(2), Duration::from_millis(500));
        assert_eq!(backoff_delay(3), Duration::from_millis(1000));
    }

    #[test]
    fn import_text_is_plain_lines_commander_first() {
        let cards = vec![
            CardLine::main("Sol Ring", 1),
            CardLine::commander("Hakbal of the Surging Soul", 1),
            CardLine::main("Forest", 12),
        ];
        assert_eq!(
            render_import_text(&cards),
            "1 Hakbal of the Surging Soul\n1 Sol Ring\n12 Forest"
        );
    }

    #[test]
    fn deck_payload_converts_to_sorted_snapshot() {
        let raw = r#"{
            "id": "JrQQDg",
            "publicId": "296iUZy-SU-dWA6iFuR1Rg",
            "version": 4,
            "boards": {
                "mainboard": {
                    "cards": {
                        "u1": {"quantity": 12, "card": {"id": "c-forest", "name": "Forest"}},
                        "u2": {"quantity": 1, "card": {"id": "c-sol", "name": "Sol Ring"}}
                    }
                },
                "commanders": {
                    "cards": {
                        "u3": {"quantity": 1, "card": {"id": "c-hak", "name": "Hakbal of the Surging Soul"}}
                    }
                },
                "maybeboard": {
                    "cards": {
                        "u4": {"quantity": 1, "card": {"id": "c-x", "name": "Craterhoof Behemoth"}}
                    }
                }
            }
        }"#;
        let payload: DeckPayload = serde_json::from_str(raw).unwrap();
        let snapshot = RemoteDeckSnapshot::try_from(payload).unwrap();

        assert_eq!(snapshot.public_id, "296iUZy-SU-dWA6iFuR1Rg");
        assert_eq!(snapshot.internal_id, "JrQQDg");
        assert_eq!(snapshot.version, 4);
        // maybeboard skipped, mainboard sorted by name, commander first
        let names: Vec<&str> = snapshot
            .cards
            .iter()
            .map(|card| card.name.as_str())
            .collect();
        assert_eq!(names, vec!["Forest", "Sol Ring", "Hakbal of the Surging Soul"]);
        assert_eq!(snapshot.cards[2].board, Board::Commander);
    }

    #[test]
    fn deck_payload_missing_fields_fails_closed() {
        let payload: DeckPayload =
            serde_json::from_str(r#"{"publicId": "296iUZy", "version": 1}"#).unwrap();
        assert!(matches!(
            RemoteDeckSnapshot::try_from(payload),
            Err(ClientError::Protocol(_))
        ));

        let payload: DeckPayload = serde_json::from_str(
            r#"{
                "id": "JrQQDg",
                "publicId": "296iUZy",
                "version": 1,
                "boards": {"mainboard": {"cards": {"u1": {"quantity": 1}}}}
            }"#,
        )
        .unwrap();
        assert!(matches!(
            RemoteDeckSnapshot::try_from(payload),
            Err(ClientError::Protocol(_))
        ));
    }

    #[test]
    fn summary_payload_requires_id_and_name() {
        let payload: DeckSummaryPayload =
            serde_json::from_str(r#"{"publicId": "296iUZy", "name": "Hakbal"}"#).unwrap();
        let summary = RemoteDeckSummary::try_from(payload).unwrap();
        assert_eq!(summary.format, "unknown");

        let payload: DeckSummaryPayload = serde_json::from_str(r#"{"name": "Hakbal"}"#).unwrap();
        assert!(matches!(
            RemoteDeckSummary::try_from(payload),
            Err(ClientError::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn commander_move_is_skipped_when_already_in_zone() {
        // Unroutable base: these paths must decide before any request.
        let client = MoxfieldClient::new("dvidal", "token")
            .unwrap()
            .with_api_base("http://127.0.0.1:9");
        let line = CardLine::commander("Hakbal of the Surging Soul", 1);

        let settled = RemoteDeckSnapshot {
            public_id: "296iUZy".to_string(),
            internal_id: "JrQQDg".to_string(),
            version: 2,
            cards: vec![RemoteCard {
                card_id: "c-hak".to_string(),
                name: "Hakbal of the Surging Soul".to_string(),
                quantity: 1,
                board: Board::Commander,
            }],
        };
        client.move_to_commanders(&settled, &line).await.unwrap();

        let missing = RemoteDeckSnapshot {
            public_id: "296iUZy".to_string(),
            internal_id: "JrQQDg".to_string(),
            version: 1,
            cards: Vec::new(),
        };
        assert!(matches!(
            client.move_to_commanders(&missing, &line).await,
            Err(ClientError::Protocol(_))
        ));
    }

    #[test]
    fn empty_bearer_token_is_rejected_up_front() {
        assert!(matches!(
            MoxfieldClient::new("dvidal", "  "),
            Err(ClientError::Auth(_))
        ));
    }
}
