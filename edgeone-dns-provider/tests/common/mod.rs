//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::env;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use edgeone_dns_provider::{EdgeOneProvider, Result, SignedHeaders, Transport};
use serde_json::{Value, json};

pub const ENV_SECRET_ID: &str = "TC_SECRET_ID";
pub const ENV_SECRET_KEY: &str = "TC_SECRET_KEY";
pub const ENV_ZONE: &str = "TC_ZONE";

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 生成唯一的测试记录名称
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// 测试上下文 - 封装 Provider 和测试站点
pub struct TestContext {
    pub provider: EdgeOneProvider,
    pub zone: String,
}

impl TestContext {
    /// 从环境变量创建 EdgeOne 测试上下文
    pub fn edgeone() -> Option<Self> {
        let zone = env::var(ENV_ZONE).ok()?;
        let provider = EdgeOneProvider::builder_from_env().ok()?.build().ok()?;
        Some(Self { provider, zone })
    }
}

// ============ Mock transport ============

/// One request as the mock transport received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub endpoint: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn action(&self) -> &str {
        self.header("X-TC-Action").unwrap_or_default()
    }
}

/// Transport that records requests and answers from per-action queues.
///
/// An action with nothing queued gets an empty success response.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<Value>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the `Response` payload for the next call of `action`.
    pub fn respond(&self, action: &str, mut payload: Value) {
        payload["RequestId"] = json!(format!("mock-{action}"));
        self.responses
            .lock()
            .unwrap()
            .entry(action.to_string())
            .or_default()
            .push_back(json!({ "Response": payload }));
    }

    /// Queue an `Error` response for the next call of `action`.
    pub fn respond_error(&self, action: &str, code: &str, message: &str) {
        self.respond(
            action,
            json!({ "Error": { "Code": code, "Message": message } }),
        );
    }

    /// Queue a `DescribeZones` answer with a single site.
    pub fn respond_zone(&self, zone_name: &str, zone_id: &str) {
        self.respond(
            "DescribeZones",
            json!({ "TotalCount": 1, "Zones": [{ "ZoneId": zone_id, "ZoneName": zone_name }] }),
        );
    }

    /// Queue a `DescribeDnsRecords` answer.
    pub fn respond_records(&self, records: Vec<Value>) {
        self.respond(
            "DescribeDnsRecords",
            json!({ "TotalCount": records.len(), "DnsRecords": records }),
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.action().to_string())
            .collect()
    }

    /// Bodies of every request sent for `action`, in order.
    pub fn bodies(&self, action: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|r| r.action() == action)
            .map(|r| r.body)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        endpoint: &str,
        headers: &SignedHeaders,
        body: String,
    ) -> Result<Vec<u8>> {
        let request = RecordedRequest {
            endpoint: endpoint.to_string(),
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            body: serde_json::from_str(&body).unwrap(),
        };
        let action = request.action().to_string();
        self.requests.lock().unwrap().push(request);

        let response = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&action)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| json!({ "Response": { "RequestId": "mock-default" } }));
        Ok(serde_json::to_vec(&response).unwrap())
    }
}

/// Wire record as `DescribeDnsRecords` returns it.
pub fn wire_record(id: &str, name: &str, record_type: &str, content: &str, status: &str) -> Value {
    json!({
        "ZoneId": "zone-1",
        "RecordId": id,
        "Name": name,
        "Type": record_type,
        "Content": content,
        "Location": "Default",
        "TTL": 300,
        "Weight": -1,
        "Status": status,
    })
}

/// Provider wired to `mock`.
pub fn mock_provider(mock: &Arc<MockTransport>) -> EdgeOneProvider {
    EdgeOneProvider::builder("AKIDEXAMPLE".to_string(), "secret-key-example".to_string())
        .transport(mock.clone())
        .build()
        .unwrap()
}
