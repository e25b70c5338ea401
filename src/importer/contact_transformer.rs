// ==========================================
// 批量导入管道 - 联系人行转换器
// ==========================================
// 必填: 姓名（名/姓/全名任一）或邮箱
// 默认: status = prospect, leadSource = import
// ==========================================

use crate::domain::entity::{ContactPayload, EntityKind, EntityPayload};
use crate::domain::record::Record;
use crate::importer::data_cleaner::{DataCleaner, EnumTable, TokenCase};
use crate::importer::derivation::DerivationService;
use crate::importer::field_mapper::{AliasTable, ColumnMapping, FieldLookup};
use crate::importer::importer_trait::{RowRejection, RowTransformer};

pub const DEFAULT_CONTACT_STATUS: &str = "prospect";
pub const DEFAULT_LEAD_SOURCE: &str = "import";

const CONTACT_ALIASES: &[(&str, &[&str])] = &[
    ("firstName", &["first_name", "firstname", "given_name", "forename"]),
    ("lastName", &["last_name", "lastname", "surname", "family_name"]),
    ("fullName", &["full_name", "contact_name", "name"]),
    ("email", &["email", "e_mail", "email_address", "mail"]),
    ("phone", &["phone", "phone_number", "telephone", "mobile", "tel"]),
    ("jobTitle", &["job_title", "title", "position", "role"]),
    ("companyName", &["company_name", "company", "organization", "account"]),
    ("city", &["city", "town"]),
    ("country", &["country"]),
    ("notes", &["notes", "note", "comments", "description"]),
    ("status", &["status", "contact_status", "stage"]),
    ("leadSource", &["lead_source", "source", "channel"]),
];

// 解析器漏配时直接按原始列名兜底
const FIRST_NAME: FieldLookup = FieldLookup::new("firstName", &["first_name", "firstname", "first"]);
const LAST_NAME: FieldLookup = FieldLookup::new("lastName", &["last_name", "lastname", "last"]);
const FULL_NAME: FieldLookup = FieldLookup::new("fullName", &["full_name", "name", "contact_name"]);
const EMAIL: FieldLookup = FieldLookup::new("email", &["email", "e_mail", "email_address"]);
const PHONE: FieldLookup = FieldLookup::new("phone", &["phone", "phone_number", "mobile"]);
const JOB_TITLE: FieldLookup = FieldLookup::new("jobTitle", &["job_title", "title"]);
const COMPANY_NAME: FieldLookup = FieldLookup::new("companyName", &["company_name", "company"]);
const CITY: FieldLookup = FieldLookup::new("city", &["city"]);
const COUNTRY: FieldLookup = FieldLookup::new("country", &["country"]);
const NOTES: FieldLookup = FieldLookup::new("notes", &["notes", "note"]);
const STATUS: FieldLookup = FieldLookup::new("status", &["status"]);
const LEAD_SOURCE: FieldLookup = FieldLookup::new("leadSource", &["lead_source", "source"]);

const STATUS_TABLE: EnumTable = EnumTable::new(
    &[
        ("PROSPECT", "prospect"),
        ("LEAD", "prospect"),
        ("NEW", "prospect"),
        ("ACTIVE", "active"),
        ("CUSTOMER", "customer"),
        ("CLIENT", "customer"),
        ("INACTIVE", "inactive"),
        ("FORMER", "inactive"),
    ],
    TokenCase::Lower,
);

const LEAD_SOURCE_TABLE: EnumTable = EnumTable::new(
    &[
        ("IMPORT", "import"),
        ("WEBSITE", "website"),
        ("WEB", "website"),
        ("REFERRAL", "referral"),
        ("EVENT", "event"),
        ("TRADE_SHOW", "event"),
        ("COLD_CALL", "cold_call"),
        ("CALL", "cold_call"),
    ],
    TokenCase::Lower,
);

pub struct ContactTransformer {
    aliases: AliasTable,
    cleaner: DataCleaner,
    derivation: DerivationService,
}

impl ContactTransformer {
    pub fn new() -> Self {
        Self {
            aliases: AliasTable::new(CONTACT_ALIASES),
            cleaner: DataCleaner,
            derivation: DerivationService,
        }
    }

    fn text(&self, lookup: &FieldLookup, record: &Record, mapping: &ColumnMapping) -> Option<String> {
        self.cleaner.normalize_null(lookup.resolve(record, mapping))
    }
}

impl Default for ContactTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl RowTransformer for ContactTransformer {
    fn kind(&self) -> EntityKind {
        EntityKind::Contact
    }

    fn alias_table(&self) -> &AliasTable {
        &self.aliases
    }

    fn transform(
        &self,
        record: &Record,
        mapping: &ColumnMapping,
        row_number: usize,
    ) -> Result<EntityPayload, RowRejection> {
        // 名、姓共用同一列（如单独的 "Name" 列）时按全名处理
        let name_column_shared = matches!(
            (mapping.get(FIRST_NAME.field), mapping.get(LAST_NAME.field)),
            (Some(first), Some(last)) if first == last
        );
        let (mut first_name, mut last_name) = if name_column_shared {
            (None, None)
        } else {
            (
                self.text(&FIRST_NAME, record, mapping),
                self.text(&LAST_NAME, record, mapping),
            )
        };
        let email = self.cleaner.clean_email(EMAIL.resolve(record, mapping));

        // 仅有全名列时拆分
        if first_name.is_none() && last_name.is_none() {
            if let Some(full_name) = FULL_NAME.resolve(record, mapping) {
                let (first, last) = self.derivation.split_full_name(full_name);
                first_name = first;
                last_name = last;
            }
        }

        if first_name.is_none() && last_name.is_none() && email.is_none() {
            return Err(RowRejection::missing_required(row_number, "name or email"));
        }

        Ok(EntityPayload::Contact(ContactPayload {
            first_name,
            last_name,
            email,
            phone: self.text(&PHONE, record, mapping),
            job_title: self.text(&JOB_TITLE, record, mapping),
            company_name: self.text(&COMPANY_NAME, record, mapping),
            city: self.text(&CITY, record, mapping),
            country: self.text(&COUNTRY, record, mapping),
            notes: self.text(&NOTES, record, mapping),
            status: STATUS_TABLE.normalize_or(STATUS.resolve(record, mapping), DEFAULT_CONTACT_STATUS),
            lead_source: LEAD_SOURCE_TABLE
                .normalize_or(LEAD_SOURCE.resolve(record, mapping), DEFAULT_LEAD_SOURCE),
        }))
    }
}
