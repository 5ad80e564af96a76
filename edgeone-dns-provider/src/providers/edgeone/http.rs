//! EdgeOne HTTP 请求方法

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::parse_json;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::types::TencentResponse;
use super::{EdgeOneProvider, sign};

impl EdgeOneProvider {
    /// 执行腾讯云 API 请求
    pub(crate) async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        action: &str,
        body: &B,
    ) -> Result<T> {
        // 1. 序列化请求体
        let payload =
            serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
                detail: e.to_string(),
            })?;

        log::debug!("[{action}] Request Body: {}", truncate_for_log(&payload));

        // 2. 生成签名
        let headers = sign(&self.credentials, action, &payload, Utc::now());

        // 3. 发送请求
        let response = self
            .transport
            .send(&self.endpoint, &headers, payload)
            .await?;

        // 4. 解析响应
        let tc_response: TencentResponse = parse_json(&response)?;

        // 5. 处理错误（Error 存在但无法解析时同样视为失败）
        let api_error = tc_response
            .error()
            .map_err(|e| self.parse_error(format!("{action}: malformed Error: {e}")))?;
        if let Some(error) = api_error {
            log::warn!(
                "[{action}] API error: {} - {} (RequestId: {})",
                error.code,
                error.message,
                tc_response.request_id().unwrap_or("-")
            );
            return Err(self.map_error(
                RawApiError::with_code(error.code, error.message),
                ErrorContext::for_action(action),
            ));
        }

        // 6. 提取数据
        serde_json::from_value(tc_response.response)
            .map_err(|e| self.parse_error(format!("{action}: {e}")))
    }
}
