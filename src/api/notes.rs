//! # Notes service client.
//!
//! Typed calls over a [`FetchClient`]:
//!
//! | Call             | Request                        | Result             |
//! |------------------|--------------------------------|--------------------|
//! | `categories`     | `GET /category`                | `Vec<Category>`    |
//! | `search_memos`   | `GET /memo?category_id={id}`   | `Vec<MemoSummary>` |
//! | `create_memo`    | `POST /memo`                   | `Memo`             |
//! | `memo`           | `GET /memo/{id}`               | `Memo`             |
//! | `update_memo`    | `PUT /memo/{id}`               | `Memo`             |
//! | `delete_memo`    | `DELETE /memo/{id}`            | `()`               |
//!
//! `login` does not touch the network: it stores the token that later requests
//! send as `X-ACCESS-TOKEN`.

use crate::{
    api::models::{Category, Memo, MemoParams, MemoSummary},
    error::FetchError,
    fetch::{FetchClient, FetchClientBuilder, RequestSpec, SharedToken, Transport},
};

/// Notes service bound to one client and its token cell.
#[derive(Clone)]
pub struct NotesApi {
    client: FetchClient,
    token: SharedToken,
}

impl NotesApi {
    /// Wraps `client`; `token` must be the credentials the client was built with.
    pub fn new(client: FetchClient, token: SharedToken) -> Self {
        Self { client, token }
    }

    /// Builds a client over `transport` with a fresh token cell.
    pub fn with_transport(transport: impl Transport, base_url: impl Into<String>) -> Self {
        let token = SharedToken::new();
        let client = FetchClientBuilder::new(transport)
            .with_base_url(base_url)
            .with_credentials(token.clone())
            .build();
        Self::new(client, token)
    }

    /// Underlying client.
    pub fn client(&self) -> &FetchClient {
        &self.client
    }

    /// Stores the access token; an empty token keeps the previous one.
    pub fn login(&self, token: impl AsRef<str>) {
        self.token.set(token);
    }

    pub async fn categories(&self) -> Result<Vec<Category>, FetchError> {
        self.client.fetch_json(&RequestSpec::get("/category")).await
    }

    pub async fn search_memos(&self, category_id: u64) -> Result<Vec<MemoSummary>, FetchError> {
        let spec = RequestSpec::get("/memo").with_query("category_id", category_id);
        self.client.fetch_json(&spec).await
    }

    pub async fn create_memo(&self, params: &MemoParams) -> Result<Memo, FetchError> {
        let spec = RequestSpec::post("/memo").with_json(params)?;
        self.client.fetch_json(&spec).await
    }

    pub async fn memo(&self, id: u64) -> Result<Memo, FetchError> {
        self.client
            .fetch_json(&RequestSpec::get(format!("/memo/{id}")))
            .await
    }

    pub async fn update_memo(&self, id: u64, params: &MemoParams) -> Result<Memo, FetchError> {
        let spec = RequestSpec::put(format!("/memo/{id}")).with_json(params)?;
        self.client.fetch_json(&spec).await
    }

    /// Deletes a memo; the response body is ignored.
    pub async fn delete_memo(&self, id: u64) -> Result<(), FetchError> {
        self.client
            .fetch(&RequestSpec::delete(format!("/memo/{id}")))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fetch::Method, testing::MockTransport};

    fn params() -> MemoParams {
        MemoParams {
            category_id: 2,
            title: "groceries".to_string(),
            content: "milk".to_string(),
        }
    }

    #[tokio::test]
    async fn test_categories_decode() {
        let mock = MockTransport::new().respond(200, r#"[{"id":1,"name":"work"}]"#);
        let api = NotesApi::with_transport(mock.clone(), "http://notes.test");

        let cats = api.categories().await.unwrap();

        assert_eq!(cats, vec![Category { id: 1, name: "work".to_string() }]);
        let req = mock.last_request().unwrap();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.url, "http://notes.test/category");
    }

    #[tokio::test]
    async fn test_search_sends_category_query() {
        let mock = MockTransport::new().respond(200, r#"[{"id":5,"title":"t"}]"#);
        let api = NotesApi::with_transport(mock.clone(), "http://notes.test");

        let found = api.search_memos(2).await.unwrap();

        assert_eq!(found, vec![MemoSummary { id: 5, title: "t".to_string() }]);
        let req = mock.last_request().unwrap();
        assert_eq!(req.url, "http://notes.test/memo");
        assert_eq!(req.query, vec![("category_id".to_string(), "2".to_string())]);
    }

    #[tokio::test]
    async fn test_create_and_update_send_json_body() {
        let memo = r#"{"id":9,"category_id":2,"title":"groceries","content":"milk"}"#;
        let mock = MockTransport::new().respond(201, memo).respond(200, memo);
        let api = NotesApi::with_transport(mock.clone(), "http://notes.test");

        let created = api.create_memo(&params()).await.unwrap();
        let updated = api.update_memo(created.id, &MemoParams::from(&created)).await.unwrap();

        assert_eq!(created, updated);
        let sent = mock.requests();
        assert_eq!((sent[0].method, sent[0].url.as_str()), (Method::Post, "http://notes.test/memo"));
        assert_eq!((sent[1].method, sent[1].url.as_str()), (Method::Put, "http://notes.test/memo/9"));
        assert_eq!(sent[0].body, Some(serde_json::to_value(params()).unwrap()));
    }

    #[tokio::test]
    async fn test_delete_ignores_empty_body() {
        let mock = MockTransport::new().respond(204, "");
        let api = NotesApi::with_transport(mock.clone(), "http://notes.test");

        api.delete_memo(3).await.unwrap();

        let req = mock.last_request().unwrap();
        assert_eq!((req.method, req.url.as_str()), (Method::Delete, "http://notes.test/memo/3"));
    }

    #[tokio::test]
    async fn test_login_sets_token_for_later_calls() {
        let mock = MockTransport::new().always(200, "[]");
        let api = NotesApi::with_transport(mock.clone(), "http://notes.test");

        api.categories().await.unwrap();
        api.login("");
        api.categories().await.unwrap();
        api.login("t0k3n");
        api.categories().await.unwrap();

        let tokens: Vec<_> = mock
            .requests()
            .iter()
            .map(|r| r.header("X-ACCESS-TOKEN").map(str::to_string))
            .collect();
        assert_eq!(tokens, vec![None, None, Some("t0k3n".to_string())]);
    }

    #[tokio::test]
    async fn test_missing_memo_is_client_error() {
        let mock = MockTransport::new().respond(404, "no such memo");
        let api = NotesApi::with_transport(mock, "http://notes.test");

        let err = api.memo(77).await.unwrap_err();

        assert_eq!(err, FetchError::from_status(404, "no such memo"));
    }
}
