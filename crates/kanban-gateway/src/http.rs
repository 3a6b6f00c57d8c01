use async_trait::async_trait;
use kanban_core::{ClientConfig, KanbanError, KanbanResult};
use kanban_domain::{
    Board, BoardDraft, Column, ColumnDraft, ColumnsSet, Task, TaskDraft, TasksSet,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::traits::PersistenceGateway;

/// `PersistenceGateway` backed by the board service's REST API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> KanbanResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| KanbanError::Config(format!("invalid api url {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(KanbanError::Config(format!(
                "{} cannot be used as a base url",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kanban-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| KanbanError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn from_config(config: &ClientConfig) -> KanbanResult<Self> {
        Self::new(
            config.require_api_url()?,
            config.token.clone(),
            config.request_timeout(),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot-be-a-base urls are rejected in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> KanbanResult<T> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            tracing::warn!("No response from board service: {}", e);
            KanbanError::Transport(e.to_string())
        })?;

        let status = response.status();
        let url = response.url().clone();

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let payload = serde_json::from_slice(&body).ok();
            tracing::warn!("{} rejected with status {}", url.path(), status);
            return Err(KanbanError::Rejected {
                status: status.as_u16(),
                payload,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| KanbanError::Transport(e.to_string()))?;
        tracing::debug!("{} answered {} ({} bytes)", url.path(), status, body.len());

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl PersistenceGateway for HttpGateway {
    async fn get_boards(&self) -> KanbanResult<Vec<Board>> {
        self.send(self.client.get(self.endpoint(&["boards"]))).await
    }

    async fn get_board(&self, board_id: &str) -> KanbanResult<Board> {
        self.send(self.client.get(self.endpoint(&["boards", board_id])))
            .await
    }

    async fn add_board(&self, board: &BoardDraft) -> KanbanResult<Board> {
        self.send(self.client.post(self.endpoint(&["boards"])).json(board))
            .await
    }

    async fn edit_board(&self, board_id: &str, board: &BoardDraft) -> KanbanResult<Board> {
        self.send(
            self.client
                .put(self.endpoint(&["boards", board_id]))
                .json(board),
        )
        .await
    }

    async fn delete_board(&self, board_id: &str) -> KanbanResult<Board> {
        self.send(self.client.delete(self.endpoint(&["boards", board_id])))
            .await
    }

    async fn get_columns_by_board(&self, board_id: &str) -> KanbanResult<Vec<Column>> {
        self.send(
            self.client
                .get(self.endpoint(&["boards", board_id, "columns"])),
        )
        .await
    }

    async fn add_column(&self, board_id: &str, column: &ColumnDraft) -> KanbanResult<Column> {
        self.send(
            self.client
                .post(self.endpoint(&["boards", board_id, "columns"]))
                .json(column),
        )
        .await
    }

    async fn delete_column(&self, board_id: &str, column_id: &str) -> KanbanResult<Column> {
        self.send(
            self.client
                .delete(self.endpoint(&["boards", board_id, "columns", column_id])),
        )
        .await
    }

    async fn edit_column(
        &self,
        board_id: &str,
        column_id: &str,
        column: &ColumnDraft,
    ) -> KanbanResult<Column> {
        self.send(
            self.client
                .put(self.endpoint(&["boards", board_id, "columns", column_id]))
                .json(column),
        )
        .await
    }

    async fn update_columns_order(&self, set: &[ColumnsSet]) -> KanbanResult<Vec<Column>> {
        self.send(self.client.patch(self.endpoint(&["columnsSet"])).json(set))
            .await
    }

    async fn get_tasks_by_board(&self, board_id: &str) -> KanbanResult<Vec<Task>> {
        self.send(self.client.get(self.endpoint(&["tasksSet", board_id])))
            .await
    }

    async fn add_task(
        &self,
        board_id: &str,
        column_id: &str,
        task: &TaskDraft,
    ) -> KanbanResult<Task> {
        self.send(
            self.client
                .post(self.endpoint(&["boards", board_id, "columns", column_id, "tasks"]))
                .json(task),
        )
        .await
    }

    async fn delete_task(
        &self,
        board_id: &str,
        column_id: &str,
        task_id: &str,
    ) -> KanbanResult<Task> {
        self.send(self.client.delete(self.endpoint(&[
            "boards", board_id, "columns", column_id, "tasks", task_id,
        ])))
        .await
    }

    async fn edit_task(
        &self,
        board_id: &str,
        column_id: &str,
        task_id: &str,
        task: &TaskDraft,
    ) -> KanbanResult<Task> {
        self.send(
            self.client
                .put(self.endpoint(&[
                    "boards", board_id, "columns", column_id, "tasks", task_id,
                ]))
                .json(task),
        )
        .await
    }

    async fn update_tasks_order(&self, set: &[TasksSet]) -> KanbanResult<Vec<Column>> {
        self.send(self.client.patch(self.endpoint(&["tasksSet"])).json(set))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> HttpGateway {
        HttpGateway::new(
            &server.uri(),
            Some("secret".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn column_json(id: &str, order: i32) -> serde_json::Value {
        json!({"_id": id, "boardId": "b1", "title": id, "order": order, "tasks": []})
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = HttpGateway::new("not a url", None, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, KanbanError::Config(_)));
    }

    #[test]
    fn test_endpoint_escapes_segments_and_keeps_prefix() {
        let gw = HttpGateway::new("http://localhost/api/", None, Duration::from_secs(1)).unwrap();
        let url = gw.endpoint(&["boards", "a b", "columns"]);
        assert_eq!(url.as_str(), "http://localhost/api/boards/a%20b/columns");
    }

    #[tokio::test]
    async fn test_add_column_sends_draft_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/boards/b1/columns"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({"title": "Todo", "order": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_json(column_json("c9", 2)))
            .expect(1)
            .mount(&server)
            .await;

        let draft = ColumnDraft {
            title: "Todo".into(),
            order: 2,
        };
        let column = gateway(&server).add_column("b1", &draft).await.unwrap();
        assert_eq!(column.id, "c9");
        assert_eq!(column.order, 2);
    }

    #[tokio::test]
    async fn test_update_columns_order_patches_bulk_payload() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/columnsSet"))
            .and(body_json(json!([
                {"_id": "c2", "order": 0},
                {"_id": "c1", "order": 1}
            ])))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([column_json("c2", 0), column_json("c1", 1)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let set = vec![
            ColumnsSet {
                id: "c2".into(),
                order: 0,
            },
            ColumnsSet {
                id: "c1".into(),
                order: 1,
            },
        ];
        let columns = gateway(&server).update_columns_order(&set).await.unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].id, "c2");
    }

    #[tokio::test]
    async fn test_update_tasks_order_includes_column_id() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/tasksSet"))
            .and(body_json(json!([{"_id": "t1", "order": 0, "columnId": "c2"}])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let set = vec![TasksSet {
            id: "t1".into(),
            order: 0,
            column_id: "c2".into(),
        }];
        gateway(&server).update_tasks_order(&set).await.unwrap();
    }

    #[tokio::test]
    async fn test_error_status_becomes_rejection_with_payload() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/boards/b1/columns/c1/tasks/t1"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Task was not founded!"})),
            )
            .mount(&server)
            .await;

        let err = gateway(&server)
            .delete_task("b1", "c1", "t1")
            .await
            .unwrap_err();

        match &err {
            KanbanError::Rejected { status, payload } => {
                assert_eq!(*status, 404);
                assert_eq!(payload.as_ref().unwrap()["message"], "Task was not founded!");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_status_without_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boards"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = gateway(&server).get_boards().await.unwrap_err();
        assert!(matches!(
            err,
            KanbanError::Rejected {
                status: 500,
                payload: None
            }
        ));
    }

    #[tokio::test]
    async fn test_no_response_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let gw = HttpGateway::new(&uri, None, Duration::from_secs(2)).unwrap();
        let err = gw.get_board("b1").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_serialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasksSet/b1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = gateway(&server).get_tasks_by_board("b1").await.unwrap_err();
        assert!(matches!(err, KanbanError::Serialization(_)));
    }
}
