// ==========================================
// 批量导入管道 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 枚举翻译 / 宽松数值解析
// 原则: 宽容未知取值（原样大写/小写透传），不因清洗失败拒绝整行
// ==========================================

pub struct DataCleaner;

impl DataCleaner {
    /// 标准化 NULL 值（空字符串/空白 → None）
    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 邮箱统一小写
    pub fn clean_email(&self, value: Option<&str>) -> Option<String> {
        self.normalize_null(value).map(|v| v.to_lowercase())
    }

    /// 宽松数值解析
    ///
    /// - 去除货币符号、千分位、空白
    /// - 支持 k / m / b 量级后缀
    /// - 解析失败返回 None（按未提供处理）
    pub fn parse_tolerant_number(&self, value: Option<&str>) -> Option<f64> {
        let raw = value?.trim();
        if raw.is_empty() {
            return None;
        }

        let mut cleaned: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '$' | '€' | '£' | '¥' | ',' | '_'))
            .collect();

        let multiplier = match cleaned.chars().last().map(|c| c.to_ascii_lowercase()) {
            Some('k') => 1_000.0,
            Some('m') => 1_000_000.0,
            Some('b') => 1_000_000_000.0,
            _ => 1.0,
        };
        if multiplier != 1.0 {
            cleaned.pop();
        }

        cleaned
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v * multiplier)
    }
}

/// 枚举查表键：大写，空白 / 连字符 / 下划线连续段折叠为单个 `_`
///
/// 与列名标准化同一规则，"cold-call"、"Cold Call"、"COLD_CALL" 视为同一键
pub fn enum_key(value: &str) -> String {
    value
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_uppercase()
}

// ==========================================
// EnumTable - 枚举翻译表
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCase {
    Upper,
    Lower,
}

/// 自由文本 → 固定取值的字面翻译表
///
/// 查表前两侧统一为 [`enum_key`]；未命中时按 `passthrough` 大小写原样透传
#[derive(Debug, Clone, Copy)]
pub struct EnumTable {
    pub entries: &'static [(&'static str, &'static str)],
    pub passthrough: TokenCase,
}

impl EnumTable {
    pub const fn new(entries: &'static [(&'static str, &'static str)], passthrough: TokenCase) -> Self {
        Self {
            entries,
            passthrough,
        }
    }

    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let key = enum_key(trimmed);

        if let Some((_, token)) = self.entries.iter().find(|(k, _)| enum_key(k) == key) {
            return (*token).to_string();
        }

        match self.passthrough {
            TokenCase::Upper => trimmed.to_uppercase(),
            TokenCase::Lower => trimmed.to_lowercase(),
        }
    }

    /// 有值则翻译，无值回落到默认 token
    pub fn normalize_or(&self, raw: Option<&str>, default: &str) -> String {
        raw.map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| self.normalize(v))
            .unwrap_or_else(|| default.to_string())
    }
}
