use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::reconcile::{DesiredRecord, RecordQuery, RecordUpdate};
use crate::types::DnsRecord;

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码，如 `AuthFailure.SignatureFailure`
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 出错的 API Action
    pub action: String,
}

impl ErrorContext {
    pub fn for_action(action: &str) -> Self {
        Self {
            action: action.to_string(),
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            detail: format!("[{}] {}", self.provider_name(), detail.to_string()),
        }
    }

    /// 快捷方法：通用 API 错误（fallback）
    fn api_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        ProviderError::ApiError {
            action: context.action,
            raw_code: raw.code.unwrap_or_default(),
            message: raw.message,
        }
    }
}

/// Looks up existing provider record identifiers.
#[async_trait]
pub trait RecordFinder: Send + Sync {
    /// Identifiers of the enabled records in `zone_id` matching `query`,
    /// oldest first.
    async fn find_record_ids(&self, zone_id: &str, query: &RecordQuery) -> Result<Vec<String>>;
}

/// Creates, updates and deletes provider records.
#[async_trait]
pub trait RecordMutator: Send + Sync {
    /// Create one record and return its identifier.
    async fn create_record(&self, zone_id: &str, record: &DesiredRecord) -> Result<String>;

    /// Update existing records in place, all in one call.
    async fn modify_records(&self, zone_id: &str, updates: &[RecordUpdate]) -> Result<()>;

    /// Delete records by identifier in one call.
    async fn delete_record_ids(&self, zone_id: &str, record_ids: &[String]) -> Result<()>;
}

/// DNS 记录操作 Trait
///
/// `zone` is the zone's domain name, with or without the trailing dot.
/// Record names are relative to it. Operations that issue several API calls
/// stop at the first failure and leave earlier changes in place.
#[async_trait]
pub trait DnsRecordProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// 获取域名下的全部记录
    async fn get_records(&self, zone: &str) -> Result<Vec<DnsRecord>>;

    /// 逐条创建记录，不做匹配或去重
    async fn append_records(&self, zone: &str, records: &[DnsRecord]) -> Result<Vec<DnsRecord>>;

    /// 按 (name, type) 复用已有记录 ID 更新，不足部分新建
    async fn set_records(&self, zone: &str, records: &[DnsRecord]) -> Result<Vec<DnsRecord>>;

    /// 删除匹配的记录；内容为空时删除该 (name, type) 下全部记录
    async fn delete_records(&self, zone: &str, records: &[DnsRecord]) -> Result<Vec<DnsRecord>>;
}
