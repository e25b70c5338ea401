// ==========================================
// 批量导入管道 - 派生字段服务
// ==========================================
// 职责: 必需展示字段缺失时的兜底派生
// - 公司名: 邮箱域名 → 网站域名 → 行号占位
// - 姓名: 全名列拆分为名/姓
// ==========================================

pub struct DerivationService;

impl DerivationService {
    /// 由邮箱域名派生公司名
    ///
    /// `sales@widgetco.com` → `Widgetco Company`
    pub fn company_from_email(&self, email: &str) -> Option<String> {
        let (_, domain) = email.trim().rsplit_once('@')?;
        self.company_from_domain(domain)
    }

    /// 由网站地址派生公司名
    ///
    /// `https://www.acme.io/about` → `Acme Company`
    pub fn company_from_website(&self, website: &str) -> Option<String> {
        let trimmed = website.trim();
        let without_scheme = trimmed
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(trimmed);
        let host = without_scheme
            .split(['/', '?', '#', ':'])
            .next()
            .unwrap_or_default();
        self.company_from_domain(host)
    }

    /// 行号占位公司名
    pub fn placeholder_company(&self, row_number: usize) -> String {
        format!("Imported Company {}", row_number)
    }

    /// 公司名兜底链：邮箱 → 网站 → 行号占位
    pub fn derive_company_name(
        &self,
        email: Option<&str>,
        website: Option<&str>,
        row_number: usize,
    ) -> String {
        email
            .and_then(|e| self.company_from_email(e))
            .or_else(|| website.and_then(|w| self.company_from_website(w)))
            .unwrap_or_else(|| self.placeholder_company(row_number))
    }

    /// 全名拆分为 (名, 姓)，以首个空白分隔
    pub fn split_full_name(&self, full_name: &str) -> (Option<String>, Option<String>) {
        let trimmed = full_name.trim();
        if trimmed.is_empty() {
            return (None, None);
        }
        match trimmed.split_once(char::is_whitespace) {
            Some((first, rest)) => {
                let last = rest.trim();
                (
                    Some(first.to_string()),
                    (!last.is_empty()).then(|| last.to_string()),
                )
            }
            None => (Some(trimmed.to_string()), None),
        }
    }

    fn company_from_domain(&self, domain: &str) -> Option<String> {
        let domain = domain.trim().to_lowercase();
        let domain = domain.strip_prefix("www.").unwrap_or(&domain);
        let label = domain.split('.').next()?.trim();
        if label.is_empty() {
            return None;
        }

        let mut chars = label.chars();
        let first = chars.next()?;
        let capitalized: String = first.to_uppercase().chain(chars).collect();
        Some(format!("{} Company", capitalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_from_email() {
        let service = DerivationService;
        assert_eq!(
            service.company_from_email("sales@widgetco.com"),
            Some("Widgetco Company".to_string())
        );
        assert_eq!(
            service.company_from_email("ops@www.Acme.co.uk"),
            Some("Acme Company".to_string())
        );
        assert_eq!(service.company_from_email("not-an-email"), None);
        assert_eq!(service.company_from_email("broken@"), None);
    }

    #[test]
    fn test_company_from_website() {
        let service = DerivationService;
        assert_eq!(
            service.company_from_website("https://www.acme.io/about"),
            Some("Acme Company".to_string())
        );
        assert_eq!(
            service.company_from_website("globex.com"),
            Some("Globex Company".to_string())
        );
        assert_eq!(service.company_from_website("https://"), None);
    }

    #[test]
    fn test_derive_company_name_fallback_chain() {
        let service = DerivationService;
        assert_eq!(
            service.derive_company_name(Some("a@initech.com"), Some("globex.com"), 4),
            "Initech Company"
        );
        assert_eq!(
            service.derive_company_name(None, Some("globex.com"), 4),
            "Globex Company"
        );
        assert_eq!(service.derive_company_name(None, None, 7), "Imported Company 7");
    }

    #[test]
    fn test_split_full_name() {
        let service = DerivationService;
        assert_eq!(
            service.split_full_name("Ada  King Lovelace"),
            (Some("Ada".to_string()), Some("King Lovelace".to_string()))
        );
        assert_eq!(
            service.split_full_name("Cher"),
            (Some("Cher".to_string()), None)
        );
        assert_eq!(service.split_full_name("   "), (None, None));
    }
}
