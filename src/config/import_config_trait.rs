// ==========================================
// 批量导入管道 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入管道所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::import_settings::ImportSettings;
use crate::importer::field_mapper::MappingOptions;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入 API 启动时加载设置
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    // ===== 映射配置 =====

    /// 获取列映射严格度
    ///
    /// # 默认值
    /// - substring_match = true, allow_shared_columns = true
    async fn get_mapping_options(&self) -> Result<MappingOptions, Box<dyn Error>>;

    // ===== 文件配置 =====

    /// 获取上传文件大小上限（字节，0 = 不限）
    ///
    /// # 默认值
    /// - 10 MiB
    async fn get_max_file_bytes(&self) -> Result<u64, Box<dyn Error>>;

    // ===== 内容 API 配置 =====

    async fn get_content_api_base_url(&self) -> Result<Option<String>, Box<dyn Error>>;

    async fn get_content_api_token(&self) -> Result<Option<String>, Box<dyn Error>>;

    /// # 默认值
    /// - 30 秒
    async fn get_request_timeout_secs(&self) -> Result<u64, Box<dyn Error>>;

    /// 汇总为完整设置
    async fn load_settings(&self) -> Result<ImportSettings, Box<dyn Error>> {
        let mapping = self.get_mapping_options().await?;
        let max_file_bytes = self.get_max_file_bytes().await?;
        let content_api_base_url = self.get_content_api_base_url().await?;
        let content_api_token = self.get_content_api_token().await?;
        let request_timeout_secs = self.get_request_timeout_secs().await?;

        Ok(ImportSettings {
            mapping,
            max_file_bytes,
            content_api_base_url,
            content_api_token,
            request_timeout_secs,
        })
    }
}
