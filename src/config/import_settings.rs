// ==========================================
// 批量导入管道 - 导入设置
// ==========================================
// 职责: 一次导入调用所需的全部可调参数
// 来源: ConfigManager（config_kv）或直接构造
// ==========================================

use crate::importer::field_mapper::MappingOptions;
use serde::{Deserialize, Serialize};

/// 默认文件大小上限: 10 MiB
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// 默认内容 API 请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// 列映射严格度
    pub mapping: MappingOptions,
    /// 上传文件大小上限（字节），0 表示不限
    pub max_file_bytes: u64,
    /// 内容 API 根地址（未配置时使用本地 SQLite 存储）
    pub content_api_base_url: Option<String>,
    pub content_api_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl ImportSettings {
    /// 解码器使用的大小上限
    pub fn file_size_limit(&self) -> Option<u64> {
        (self.max_file_bytes > 0).then_some(self.max_file_bytes)
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            mapping: MappingOptions::default(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            content_api_base_url: None,
            content_api_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ImportSettings::default();
        assert_eq!(settings.file_size_limit(), Some(10 * 1024 * 1024));
        assert!(settings.mapping.substring_match);
        assert!(settings.mapping.allow_shared_columns);
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn test_zero_limit_disables_size_check() {
        let settings = ImportSettings {
            max_file_bytes: 0,
            ..Default::default()
        };
        assert_eq!(settings.file_size_limit(), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: ImportSettings =
            serde_json::from_str(r#"{"mapping": {"allow_shared_columns": false}}"#).unwrap();
        assert!(!settings.mapping.allow_shared_columns);
        assert!(settings.mapping.substring_match);
        assert_eq!(settings.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
    }
}
