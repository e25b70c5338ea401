// ==========================================
// 批量导入管道 - 导入模块错误类型
// ==========================================
// 范围: 整个文件不可处理的致命错误（输入错误 / 解码错误）
// 逐行问题不走此类型，见 RowRejection
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 输入错误 =====
    #[error("No file provided")]
    MissingFile,

    #[error("Unsupported file format: {0} (expected .csv, .xlsx or .xls)")]
    UnsupportedFormat(String),

    #[error("File is empty or could not be parsed")]
    EmptyFile,

    #[error("File exceeds maximum size of {limit} bytes (got {actual})")]
    FileTooLarge { limit: u64, actual: u64 },

    #[error("File read failed: {0}")]
    FileReadError(#[from] std::io::Error),

    // ===== 解码错误（保留底层原因）=====
    #[error("Failed to decode CSV file: {0}")]
    CsvDecode(#[from] csv::Error),

    #[error("Failed to decode workbook: {0}")]
    WorkbookDecode(#[from] calamine::Error),

    #[error("Workbook contains no worksheets")]
    NoWorksheet,

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否属于调用方输入问题（而非内部故障）
    pub fn is_input_error(&self) -> bool {
        !matches!(self, ImportError::Other(_) | ImportError::FileReadError(_))
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
