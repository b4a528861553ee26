use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::AttemptError;

/// Identity of one tracked question for one user.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttemptKey {
    pub user_id: String,
    pub workbook: String,
    pub page: String,
    pub question_no: String,
}

/// The (user, workbook, page) a lock listing is scoped to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockScope {
    pub user_id: String,
    pub workbook: String,
    pub page: String,
}

/// Key fields as they arrive from a client, before validation.
///
/// `page` and `questionNo` are sent as numbers by some pages and strings by
/// others, so both are accepted.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptKeyFields {
    #[serde(default, deserialize_with = "lenient_field")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub workbook: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub page: Option<String>,
    #[serde(default, deserialize_with = "lenient_field")]
    pub question_no: Option<String>,
}

impl AttemptKeyFields {
    pub fn into_key(self) -> Result<AttemptKey, AttemptError> {
        Ok(AttemptKey {
            user_id: required(self.user_id, "userId")?,
            workbook: required(self.workbook, "workbook")?,
            page: required(self.page, "page")?,
            question_no: required(self.question_no, "questionNo")?,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockScopeFields {
    pub user_id: Option<String>,
    pub workbook: Option<String>,
    pub page: Option<String>,
}

impl LockScopeFields {
    pub fn into_scope(self) -> Result<LockScope, AttemptError> {
        Ok(LockScope {
            user_id: required(self.user_id, "userId")?,
            workbook: required(self.workbook, "workbook")?,
            page: required(self.page, "page")?,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, AttemptError> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(AttemptError::InvalidRequest(field))
}

fn lenient_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct AttemptRecord {
    pub user_id: String,
    pub workbook: String,
    pub page: String,
    pub question_no: String,

    pub wrong_count: i64,
    pub is_locked: bool,

    pub locked_at: Option<NaiveDateTime>,
    pub unlocked_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl AttemptRecord {
    #[must_use]
    pub fn new(key: &AttemptKey, now: NaiveDateTime) -> Self {
        Self {
            user_id: key.user_id.clone(),
            workbook: key.workbook.clone(),
            page: key.page.clone(),
            question_no: key.question_no.clone(),
            wrong_count: 0,
            is_locked: false,
            locked_at: None,
            unlocked_at: None,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct LockedQuestion {
    pub question_no: String,
    pub wrong_count: i64,
}
