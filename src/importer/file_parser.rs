// ==========================================
// 批量导入管道 - 表格解码器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 职责: 原始文件 → 标准化记录序列（不含任何业务字段知识）
// ==========================================

use crate::domain::record::{DecodedTable, Record};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{Reader, Xls, Xlsx};
use csv::ReaderBuilder;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

/// 列名标准化
///
/// 规则: TRIM → 去 BOM → 小写 → 空白/连字符/下划线连续段折叠为单个 `_`
///
/// `"Company Name"`、`"company_name"`、`"COMPANY-NAME"` 均得到 `company_name`
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;

    for ch in raw.trim().trim_start_matches('\u{feff}').chars() {
        if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_sep = true;
            continue;
        }
        if pending_sep && !out.is_empty() {
            out.push('_');
        }
        pending_sep = false;
        out.extend(ch.to_lowercase());
    }

    out
}

/// 由表头 + 数据行构造解码结果
///
/// - 同名列只保留首次出现
/// - 缺失单元格补空字符串
/// - 跳过完全空白的行
fn build_table<I>(raw_headers: &[String], rows: I) -> DecodedTable
where
    I: IntoIterator<Item = Vec<String>>,
{
    let headers: Vec<String> = raw_headers.iter().map(|h| normalize_header(h)).collect();

    let mut columns: Vec<String> = Vec::with_capacity(headers.len());
    for header in &headers {
        if !header.is_empty() && !columns.contains(header) {
            columns.push(header.clone());
        }
    }

    let mut records = Vec::new();
    for row in rows {
        let mut record = Record::new();
        for (col_idx, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = row.get(col_idx).map(String::as_str).unwrap_or("");
            record.insert_first(header, value);
        }

        if record.is_blank() {
            continue;
        }
        records.push(record);
    }

    DecodedTable { columns, records }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<DecodedTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|v| v.trim().to_string()).collect());
        }

        let table = build_table(&headers, rows);
        debug!(
            columns = table.columns.len(),
            records = table.records.len(),
            "CSV 解码完成"
        );
        Ok(table)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    Xlsx,
    Xls,
}

pub struct ExcelParser {
    pub format: WorkbookFormat,
}

impl ExcelParser {
    pub fn new(format: WorkbookFormat) -> Self {
        Self { format }
    }
}

/// 只读取第一个工作表，首行作为表头
fn read_first_sheet<RS, R>(mut workbook: R) -> ImportResult<DecodedTable>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Into<calamine::Error>,
{
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::NoWorksheet)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::WorkbookDecode(e.into()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(|cell| cell.to_string()).collect(),
        None => return Ok(DecodedTable::default()),
    };

    let data_rows = rows.map(|row| {
        row.iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect::<Vec<_>>()
    });

    let table = build_table(&headers, data_rows);
    debug!(
        sheet = %sheet_name,
        columns = table.columns.len(),
        records = table.records.len(),
        "工作簿解码完成"
    );
    Ok(table)
}

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<DecodedTable> {
        let cursor = Cursor::new(bytes.to_vec());
        match self.format {
            WorkbookFormat::Xlsx => {
                let workbook: Xlsx<_> = Xlsx::new(cursor)
                    .map_err(|e| ImportError::WorkbookDecode(calamine::Error::from(e)))?;
                read_first_sheet(workbook)
            }
            WorkbookFormat::Xls => {
                let workbook: Xls<_> = Xls::new(cursor)
                    .map_err(|e| ImportError::WorkbookDecode(calamine::Error::from(e)))?;
                read_first_sheet(workbook)
            }
        }
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct UniversalFileParser {
    /// 文件大小上限（字节），None 表示不限
    pub max_file_bytes: Option<u64>,
}

impl UniversalFileParser {
    pub fn new(max_file_bytes: Option<u64>) -> Self {
        Self { max_file_bytes }
    }

    /// 按文件名后缀选择解码器
    pub fn parser_for(file_name: &str) -> ImportResult<Box<dyn FileParser>> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(Box::new(CsvParser)),
            "xlsx" => Ok(Box::new(ExcelParser::new(WorkbookFormat::Xlsx))),
            "xls" => Ok(Box::new(ExcelParser::new(WorkbookFormat::Xls))),
            _ => Err(ImportError::UnsupportedFormat(if ext.is_empty() {
                file_name.to_string()
            } else {
                format!(".{}", ext)
            })),
        }
    }

    /// 解码上传文件（文件名决定格式）
    ///
    /// # 返回
    /// - Ok(DecodedTable): 至少一条数据记录
    /// - Err(EmptyFile): 空文件或仅有表头
    pub fn parse_named(&self, file_name: &str, bytes: &[u8]) -> ImportResult<DecodedTable> {
        let parser = Self::parser_for(file_name)?;

        if let Some(limit) = self.max_file_bytes {
            let actual = bytes.len() as u64;
            if actual > limit {
                return Err(ImportError::FileTooLarge { limit, actual });
            }
        }

        let table = parser.parse_bytes(bytes)?;
        if table.is_empty() {
            return Err(ImportError::EmptyFile);
        }
        Ok(table)
    }

    /// 从磁盘路径解码
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<DecodedTable> {
        let path = file_path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        // 先校验扩展名，避免读取不支持的文件
        Self::parser_for(&file_name)?;
        let bytes = std::fs::read(path)?;
        self.parse_named(&file_name, &bytes)
    }
}
