use async_trait::async_trait;
use kbnav_protocol::BackendSettings;
use kbnav_protocol::ChildFilter;
use kbnav_protocol::ChildSort;
use kbnav_protocol::DetailRequest;
use kbnav_protocol::DocumentService;
use kbnav_protocol::Envelope;
use kbnav_protocol::HistorySnapshot;
use kbnav_protocol::Located;
use kbnav_protocol::ModuleListing;
use kbnav_protocol::NavigateReply;
use kbnav_protocol::NodeId;
use kbnav_protocol::NodeRecord;
use kbnav_protocol::NodeSummary;
use kbnav_protocol::NodeView;
use kbnav_protocol::ResolveReply;
use kbnav_protocol::SearchHit;
use kbnav_protocol::SearchOptions;
use kbnav_protocol::ServiceError;
use kbnav_protocol::ServiceResult;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP gateway to the document service.
#[derive(Clone)]
pub struct DocumentClient {
    http: reqwest::Client,
    base_url: String,
}

impl DocumentClient {
    pub fn new(opts: ClientOptions) -> ServiceResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(opts.timeout)
            .build()
            .map_err(|err| ServiceError::transport("client setup", err.to_string()))?;
        let base_url = opts.base_url.trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> ServiceResult<Envelope> {
        let resp = request
            .send()
            .await
            .map_err(|err| ServiceError::transport(operation, err.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                operation,
                status: status.as_u16(),
                body,
            });
        }
        let envelope: Envelope = resp
            .json()
            .await
            .map_err(|err| ServiceError::decode(operation, err.to_string()))?;
        if !envelope.success {
            return Err(ServiceError::rejected(operation, envelope.error_message()));
        }
        debug!(operation, "document service call succeeded");
        Ok(envelope)
    }

    async fn send_data<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> ServiceResult<T> {
        let envelope = self.send(operation, request).await?;
        decode_data(operation, envelope.data)
    }

    async fn send_located(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> ServiceResult<Located> {
        let envelope = self.send(operation, request).await?;
        let breadcrumb = envelope.breadcrumb();
        let node = decode_data(operation, envelope.data)?;
        Ok(Located { node, breadcrumb })
    }
}

fn decode_data<T: DeserializeOwned>(operation: &'static str, data: Value) -> ServiceResult<T> {
    serde_json::from_value(data).map_err(|err| ServiceError::decode(operation, err.to_string()))
}

/// The navigate endpoint either nests the node under `node` or returns it
/// flat next to `already_at_target`.
fn parse_navigate(envelope: Envelope) -> NavigateReply {
    let breadcrumb = envelope.breadcrumb();
    let data = envelope.data;
    let already_at_target = data
        .get("already_at_target")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let node = match data.get("node") {
        Some(nested) if nested.is_object() => serde_json::from_value(nested.clone()).ok(),
        _ => serde_json::from_value::<NodeRecord>(data).ok(),
    };
    NavigateReply {
        already_at_target,
        node,
        breadcrumb,
    }
}

#[async_trait]
impl DocumentService for DocumentClient {
    async fn list_modules(&self) -> ServiceResult<ModuleListing> {
        let request = self.http.get(self.url("/modules/"));
        self.send_data("list modules", request).await
    }

    async fn load_module(&self, name: &str) -> ServiceResult<()> {
        let request = self
            .http
            .post(self.url("/modules/load"))
            .query(&[("module_name", name)]);
        self.send("load module", request).await.map(|_| ())
    }

    async fn unload_module(&self, name: &str) -> ServiceResult<()> {
        let request = self
            .http
            .delete(self.url("/modules/unload"))
            .query(&[("module_name", name)]);
        self.send("unload module", request).await.map(|_| ())
    }

    async fn purge_modules(&self) -> ServiceResult<()> {
        let request = self.http.post(self.url("/modules/purge"));
        self.send("purge modules", request).await.map(|_| ())
    }

    async fn loaded_roots(&self) -> ServiceResult<Vec<NodeRecord>> {
        let request = self.http.get(self.url("/modules/roots"));
        self.send_data("loaded roots", request).await
    }

    async fn current_node(&self) -> ServiceResult<Located> {
        let request = self.http.get(self.url("/nodes/current"));
        self.send_located("current node", request).await
    }

    async fn resolve(&self, target: &str) -> ServiceResult<ResolveReply> {
        let request = self
            .http
            .get(self.url("/nodes/resolve"))
            .query(&[("target", target)]);
        self.send_data("resolve", request).await
    }

    async fn node_detail(&self, id: &str, detail: &DetailRequest) -> ServiceResult<NodeView> {
        let mut params: Vec<(&str, String)> = vec![
            ("node_id", id.to_string()),
            ("depth", detail.depth.to_string()),
            ("format", detail.format.as_str().to_string()),
        ];
        if let Some(include_content) = detail.include_content {
            params.push(("include_content", include_content.to_string()));
        }
        if let Some(include_see_also) = detail.include_see_also {
            params.push(("include_see_also", include_see_also.to_string()));
        }
        if let Some(show_metadata) = detail.show_metadata {
            params.push(("show_metadata", show_metadata.to_string()));
        }
        if let Some(display_mode) = detail.display_mode {
            params.push(("display_mode", display_mode.as_str().to_string()));
        }
        let request = self.http.get(self.url("/nodes/detail")).query(&params);
        self.send_data("node detail", request).await
    }

    async fn children(&self, id: &str) -> ServiceResult<Vec<NodeId>> {
        let request = self
            .http
            .get(self.url("/nodes/children"))
            .query(&[("node_id", id)]);
        self.send_data("children", request).await
    }

    async fn preview_children(
        &self,
        id: &str,
        filter: ChildFilter,
        sort: ChildSort,
    ) -> ServiceResult<Vec<NodeSummary>> {
        let request = self.http.get(self.url("/nodes/preview_children")).query(&[
            ("node_id", id),
            ("node_type", filter.as_str()),
            ("sort_by", sort.as_str()),
        ]);
        self.send_data("preview children", request).await
    }

    async fn navigate(&self, id: &str) -> ServiceResult<NavigateReply> {
        let request = self
            .http
            .post(self.url("/nodes/navigate"))
            .query(&[("target", id)]);
        let envelope = self.send("navigate", request).await?;
        Ok(parse_navigate(envelope))
    }

    async fn back(&self, steps: u32) -> ServiceResult<Located> {
        let request = self
            .http
            .post(self.url("/nodes/back"))
            .query(&[("steps", steps.max(1))]);
        self.send_located("navigate back", request).await
    }

    async fn forward(&self, steps: u32) -> ServiceResult<Located> {
        let request = self
            .http
            .post(self.url("/nodes/forward"))
            .query(&[("steps", steps.max(1))]);
        self.send_located("navigate forward", request).await
    }

    async fn up(&self, levels: u32) -> ServiceResult<Located> {
        let request = self
            .http
            .post(self.url("/nodes/up"))
            .query(&[("levels", levels.max(1))]);
        self.send_located("navigate up", request).await
    }

    async fn history(&self) -> ServiceResult<HistorySnapshot> {
        let request = self.http.get(self.url("/nodes/history"));
        self.send_data("history", request).await
    }

    async fn search(&self, query: &str, options: &SearchOptions) -> ServiceResult<Vec<SearchHit>> {
        let request = self.http.get(self.url("/search/")).query(&[
            ("q", query.to_string()),
            ("scope", options.scope.as_str().to_string()),
            ("max_results", options.max_results.to_string()),
            ("whole_word", options.whole_word.to_string()),
            ("case_sensitive", options.case_sensitive.to_string()),
            ("use_regex", options.use_regex.to_string()),
        ]);
        self.send_data("search", request).await
    }

    async fn status(&self) -> ServiceResult<Value> {
        let request = self.http.get(self.url("/status/"));
        let envelope = self.send("status", request).await?;
        Ok(envelope.data)
    }

    async fn settings(&self) -> ServiceResult<BackendSettings> {
        let request = self.http.get(self.url("/settings/"));
        self.send_data("settings", request).await
    }

    async fn apply_settings(&self, settings: &BackendSettings) -> ServiceResult<()> {
        let request = self.http.post(self.url("/settings/apply")).json(settings);
        self.send("apply settings", request).await.map(|_| ())
    }
}
