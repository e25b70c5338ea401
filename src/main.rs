// ==========================================
// 批量导入管道 - 命令行入口
// ==========================================
// 用法:
//   crm-bulk-import <contacts|leads> <file> [db_path]
//   crm-bulk-import preview <contacts|leads> <file> [db_path]
//
// 未配置内容 API 时写入本地 SQLite；报告以 JSON 输出到 stdout
// ==========================================

use anyhow::{anyhow, bail, Context};
use crm_import::config::ConfigManager;
use crm_import::db::get_default_db_path;
use crm_import::repository::SqliteEntityStore;
use crm_import::{logging, EntityKind, ImportApi, UploadedFile};
use std::sync::Arc;

const USAGE: &str = "usage: crm-bulk-import [preview] <contacts|leads> <file> [db_path]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let preview = args.first().map(String::as_str) == Some("preview");
    if preview {
        args.remove(0);
    }

    let mut args = args.into_iter();
    let kind_arg = args.next().ok_or_else(|| anyhow!(USAGE))?;
    let kind = EntityKind::parse(&kind_arg)
        .with_context(|| format!("unknown entity type '{}'\n{}", kind_arg, USAGE))?;
    let file_path = args.next().ok_or_else(|| anyhow!(USAGE))?;
    let db_path = args.next().unwrap_or_else(get_default_db_path);

    tracing::info!("==================================================");
    tracing::info!("批量导入管道 v{}", crm_import::VERSION);
    tracing::info!("使用数据库: {}", db_path);
    tracing::info!("==================================================");

    let config = ConfigManager::new(&db_path).map_err(|e| anyhow!("配置初始化失败: {}", e))?;
    let store = Arc::new(SqliteEntityStore::new(&db_path)?);
    let api = ImportApi::from_config(&config, store).await?;
    tracing::debug!(settings = ?api.settings(), "导入设置");

    let upload = UploadedFile::from_path(&file_path)?;

    if preview {
        let result = api.preview(kind, Some(upload))?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let response = api.handle_upload(kind, Some(upload)).await;
    println!("{}", serde_json::to_string_pretty(&response.body)?);

    if response.status != 200 {
        bail!("import failed with status {}", response.status);
    }
    Ok(())
}
