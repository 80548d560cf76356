//! GraphQL client for the managed note API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::NoteApi;
use crate::error::{Error, Result};
use crate::models::{CreateNoteInput, Note, NoteId};
use crate::util::{compact_text, is_http_url};

/// Request timeout unless configured otherwise.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const LIST_NOTES_QUERY: &str = r"query ListNotes($limit: Int, $nextToken: String) {
  listNotes(limit: $limit, nextToken: $nextToken) {
    items {
      id
      name
      description
      image
      createdAt
      updatedAt
    }
    nextToken
  }
}";

const CREATE_NOTE_MUTATION: &str = r"mutation CreateNote($input: CreateNoteInput!) {
  createNote(input: $input) {
    id
    name
    description
    image
    createdAt
    updatedAt
  }
}";

const DELETE_NOTE_MUTATION: &str = r"mutation DeleteNote($input: DeleteNoteInput!) {
  deleteNote(input: $input) {
    id
  }
}";

const LIST_PAGE_SIZE: u32 = 100;

/// Connection settings for the note API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// Optional API key sent as `x-api-key`.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ApiConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for the note API's GraphQL endpoint.
#[derive(Clone)]
pub struct GraphqlNoteApi {
    endpoint: String,
    api_key: Option<String>,
    session_token: Option<String>,
    client: reqwest::Client,
}

impl GraphqlNoteApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let endpoint = normalize_endpoint(&config.endpoint)?;
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            endpoint,
            api_key: config.api_key.clone(),
            session_token: None,
            client,
        })
    }

    /// Attach the signed-in user's token as the `Authorization` header.
    #[must_use]
    pub fn with_session_token(mut self, token: Option<String>) -> Self {
        self.session_token = token;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        tracing::debug!(operation, endpoint = %self.endpoint, "Sending GraphQL request");

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }));
        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key);
        }
        if let Some(token) = &self.session_token {
            request = request.header(reqwest::header::AUTHORIZATION, token);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        parse_graphql_response(operation, status, &body)
    }
}

impl NoteApi for GraphqlNoteApi {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        let mut notes = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let data: ListNotesData = self
                .execute(
                    "listNotes",
                    LIST_NOTES_QUERY,
                    serde_json::json!({
                        "limit": LIST_PAGE_SIZE,
                        "nextToken": next_token,
                    }),
                )
                .await?;

            notes.extend(data.list_notes.items.into_iter().flatten());
            next_token = data.list_notes.next_token;
            if next_token.is_none() {
                break;
            }
        }

        Ok(notes)
    }

    async fn create_note(&self, input: &CreateNoteInput) -> Result<Note> {
        let data: CreateNoteData = self
            .execute(
                "createNote",
                CREATE_NOTE_MUTATION,
                serde_json::json!({ "input": input }),
            )
            .await?;
        Ok(data.create_note)
    }

    async fn delete_note(&self, id: &NoteId) -> Result<()> {
        let data: DeleteNoteData = self
            .execute(
                "deleteNote",
                DELETE_NOTE_MUTATION,
                serde_json::json!({ "input": { "id": id } }),
            )
            .await?;

        if data.delete_note.is_none() {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListNotesData {
    list_notes: NoteConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteConnection {
    #[serde(default)]
    items: Vec<Option<Note>>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateNoteData {
    create_note: Note,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteNoteData {
    delete_note: Option<DeletedNote>,
}

#[derive(Debug, Deserialize)]
struct DeletedNote {
    #[allow(dead_code)]
    id: NoteId,
}

fn parse_graphql_response<T: DeserializeOwned>(
    operation: &str,
    status: u16,
    body: &str,
) -> Result<T> {
    if !(200..300).contains(&status) {
        return Err(Error::Api(format!(
            "{operation} failed with HTTP {status}: {}",
            compact_text(body)
        )));
    }

    let payload: GraphqlResponse<T> = serde_json::from_str(body)?;
    if let Some(errors) = payload.errors.filter(|errors| !errors.is_empty()) {
        let messages = errors
            .into_iter()
            .map(|error| error.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(Error::Api(format!("{operation} rejected: {messages}")));
    }

    payload
        .data
        .ok_or_else(|| Error::Api(format!("{operation} response contained no data")))
}

fn normalize_endpoint(raw: &str) -> Result<String> {
    let endpoint = raw.trim().trim_end_matches('/').to_string();
    if endpoint.is_empty() {
        return Err(Error::Config("API endpoint must not be empty".to_string()));
    }
    if !is_http_url(&endpoint) {
        return Err(Error::Config(
            "API endpoint must include http:// or https://".to_string(),
        ));
    }
    Ok(endpoint)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_endpoint_rejects_invalid_values() {
        assert!(normalize_endpoint("").is_err());
        assert!(normalize_endpoint("api.example.com/graphql").is_err());
    }

    #[test]
    fn normalize_endpoint_trims_trailing_slash() {
        assert_eq!(
            normalize_endpoint("https://api.example.com/graphql/").unwrap(),
            "https://api.example.com/graphql"
        );
    }

    #[test]
    fn parse_list_response_skips_null_items() {
        let body = r#"{
          "data": {
            "listNotes": {
              "items": [
                {"id": "1", "name": "A", "description": "B", "image": "A", "__typename": "Note"},
                null,
                {"id": "2", "name": "C", "description": "D", "image": null}
              ],
              "nextToken": "page-2"
            }
          }
        }"#;

        let data: ListNotesData = parse_graphql_response("listNotes", 200, body).unwrap();
        let ids = data
            .list_notes
            .items
            .into_iter()
            .flatten()
            .map(|note| note.id.to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(data.list_notes.next_token.as_deref(), Some("page-2"));
    }

    #[test]
    fn parse_response_surfaces_graphql_errors() {
        let body = r#"{
          "data": null,
          "errors": [
            {"message": "Not Authorized to access listNotes"},
            {"message": "second problem"}
          ]
        }"#;

        let err = parse_graphql_response::<ListNotesData>("listNotes", 200, body).unwrap_err();
        match err {
            Error::Api(message) => {
                assert!(message.contains("Not Authorized"));
                assert!(message.contains("second problem"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_response_rejects_http_failure() {
        let err =
            parse_graphql_response::<ListNotesData>("listNotes", 401, "{\"message\":\"nope\"}")
                .unwrap_err();
        match err {
            Error::Api(message) => assert!(message.contains("HTTP 401")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_delete_response_with_null_payload() {
        let data: DeleteNoteData =
            parse_graphql_response("deleteNote", 200, r#"{"data":{"deleteNote":null}}"#).unwrap();
        assert!(data.delete_note.is_none());
    }

    #[test]
    fn create_input_serializes_null_image() {
        let input = CreateNoteInput {
            name: "A".to_string(),
            description: "B".to_string(),
            image: None,
        };
        let json = serde_json::json!({ "input": input });
        assert_eq!(
            json,
            serde_json::json!({"input": {"name": "A", "description": "B", "image": null}})
        );
    }

    #[test]
    fn api_config_debug_redacts_key() {
        let config = ApiConfig {
            endpoint: "https://api.example.com/graphql".to_string(),
            api_key: Some("da2-secret".to_string()),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("da2-secret"));
    }

    #[test]
    fn client_rejects_invalid_endpoint() {
        let config = ApiConfig {
            endpoint: "not-a-url".to_string(),
            api_key: None,
            timeout: Duration::from_secs(1),
        };
        assert!(matches!(GraphqlNoteApi::new(&config), Err(Error::Config(_))));
    }
}
