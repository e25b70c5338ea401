// ==========================================
// 批量导入管道 - 导入API
// ==========================================
// 职责: 上传文件 → 导入报告（调用方契约）
// 契约: 每种实体一个入口，上传字段名 `file`
// - 200: {total, successful, failed, errors}
// - 400: 缺少文件 / 格式不支持 / 空文件 / 无法解码
// - 500: 意外故障
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ImportConfigReader, ImportSettings};
use crate::domain::entity::EntityKind;
use crate::domain::record::DecodedTable;
use crate::domain::report::ImportReport;
use crate::importer::error::ImportError;
use crate::importer::field_mapper::ColumnMapping;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::import_coordinator::ImportCoordinator;
use crate::importer::importer_trait::RowTransformer;
use crate::importer::{ContactTransformer, LeadCompanyTransformer};
use crate::repository::{EntityStore, HttpEntityStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

/// 上传的文件（multipart 中名为 `file` 的部分）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// 从磁盘读取（文件名取路径末段）
    pub fn from_path<P: AsRef<Path>>(path: P) -> ApiResult<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let bytes = std::fs::read(path).map_err(ImportError::from)?;
        Ok(Self { file_name, bytes })
    }
}

/// 导入API响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportApiResponse {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// 逐行错误（文件顺序）
    pub errors: Vec<String>,
}

impl From<ImportReport> for ImportApiResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            total: report.total,
            successful: report.successful,
            failed: report.failed,
            errors: report.errors,
        }
    }
}

/// 预演响应（不创建任何实体）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportPreview {
    pub entity: EntityKind,
    pub total: usize,
    pub mapping: ColumnMapping,
    pub ambiguous_columns: Vec<String>,
    pub accepted: usize,
    pub rejected: usize,
    pub errors: Vec<String>,
}

/// HTTP 风格的响应（状态码 + JSON 体）
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

// ==========================================
// ImportApi
// ==========================================
pub struct ImportApi {
    store: Arc<dyn EntityStore>,
    settings: ImportSettings,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    ///
    /// # 参数
    /// - store: 创建协作者
    /// - settings: 导入设置
    pub fn new(store: Arc<dyn EntityStore>, settings: ImportSettings) -> Self {
        Self { store, settings }
    }

    /// 按配置装配
    ///
    /// 配置了内容 API 时使用 HttpEntityStore，否则使用 `local_store`
    pub async fn from_config<C>(config: &C, local_store: Arc<dyn EntityStore>) -> ApiResult<Self>
    where
        C: ImportConfigReader,
    {
        let settings = config
            .load_settings()
            .await
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        let store: Arc<dyn EntityStore> = match &settings.content_api_base_url {
            Some(base_url) => {
                info!(base_url = %base_url, "使用内容 API 存储");
                Arc::new(HttpEntityStore::new(
                    base_url.clone(),
                    settings.content_api_token.clone(),
                    Duration::from_secs(settings.request_timeout_secs),
                )?)
            }
            None => local_store,
        };

        Ok(Self::new(store, settings))
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    fn transformer(kind: EntityKind) -> Box<dyn RowTransformer> {
        match kind {
            EntityKind::Contact => Box::new(ContactTransformer::new()),
            EntityKind::LeadCompany => Box::new(LeadCompanyTransformer::new()),
        }
    }

    fn coordinator(&self) -> ImportCoordinator {
        ImportCoordinator::new(self.settings.mapping)
    }

    /// 解码上传文件；任何失败都终止整个调用
    fn decode(&self, upload: Option<&UploadedFile>) -> ApiResult<DecodedTable> {
        let upload = upload.ok_or(ImportError::MissingFile)?;
        let parser = UniversalFileParser::new(self.settings.file_size_limit());

        parser.parse_named(&upload.file_name, &upload.bytes).map_err(|e| {
            error!(file = %upload.file_name, error = %e, "文件解码失败");
            ApiError::from(e)
        })
    }

    /// 导入一个上传文件
    ///
    /// # 返回
    /// - Ok: 汇总报告（所有行失败时依然为 Ok）
    /// - Err: 文件级错误，未处理任何行
    #[instrument(skip(self, upload), fields(file = upload.as_ref().map(|u| u.file_name.as_str()).unwrap_or("")))]
    pub async fn import(
        &self,
        kind: EntityKind,
        upload: Option<UploadedFile>,
    ) -> ApiResult<ImportApiResponse> {
        let table = self.decode(upload.as_ref())?;
        let transformer = Self::transformer(kind);

        let report = self
            .coordinator()
            .run(&table, transformer.as_ref(), self.store.as_ref())
            .await;

        Ok(report.into())
    }

    pub async fn import_contacts(&self, upload: Option<UploadedFile>) -> ApiResult<ImportApiResponse> {
        self.import(EntityKind::Contact, upload).await
    }

    pub async fn import_leads(&self, upload: Option<UploadedFile>) -> ApiResult<ImportApiResponse> {
        self.import(EntityKind::LeadCompany, upload).await
    }

    /// 预演：解码 + 映射 + 转换，不调用创建协作者
    #[instrument(skip(self, upload))]
    pub fn preview(&self, kind: EntityKind, upload: Option<UploadedFile>) -> ApiResult<ImportPreview> {
        let table = self.decode(upload.as_ref())?;
        let transformer = Self::transformer(kind);
        let outcome = self.coordinator().dry_run(&table, transformer.as_ref());

        Ok(ImportPreview {
            entity: kind,
            total: table.len(),
            mapping: outcome.resolution.mapping,
            ambiguous_columns: outcome.resolution.ambiguous_columns,
            accepted: outcome.accepted,
            rejected: outcome.rejections.len(),
            errors: outcome.rejections.iter().map(ToString::to_string).collect(),
        })
    }

    /// HTTP 契约映射：200 + 报告，或 400/500 + 错误体
    pub async fn handle_upload(&self, kind: EntityKind, upload: Option<UploadedFile>) -> ApiResponse {
        match self.import(kind, upload).await {
            Ok(response) => match serde_json::to_value(&response) {
                Ok(body) => ApiResponse { status: 200, body },
                Err(e) => {
                    let err = ApiError::InternalError(e.to_string());
                    ApiResponse {
                        status: err.status_code(),
                        body: err.error_body(),
                    }
                }
            },
            Err(err) => ApiResponse {
                status: err.status_code(),
                body: err.error_body(),
            },
        }
    }
}
