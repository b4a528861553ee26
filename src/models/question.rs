use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// One row of the answer key.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Question {
    pub workbook: String,
    pub page: i64,
    pub number: i64,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub type_: String,

    pub answer: String,
}

impl Question {
    pub async fn for_page(
        db: &SqlitePool,
        workbook: Option<&str>,
        page: i64,
    ) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, Question>(
            r"SELECT workbook, page, number, type, answer
            FROM grading_data
            WHERE page = ?1 AND (?2 IS NULL OR workbook = ?2)
            ORDER BY number ASC, workbook ASC",
        )
        .bind(page)
        .bind(workbook)
        .fetch_all(db)
        .await
    }

    pub async fn workbooks(db: &SqlitePool) -> sqlx::Result<Vec<String>> {
        sqlx::query_scalar("SELECT DISTINCT workbook FROM grading_data ORDER BY workbook")
            .fetch_all(db)
            .await
    }

    pub async fn pages(db: &SqlitePool, workbook: &str) -> sqlx::Result<Vec<i64>> {
        sqlx::query_scalar(
            "SELECT DISTINCT page FROM grading_data WHERE workbook = ? ORDER BY page",
        )
        .bind(workbook)
        .fetch_all(db)
        .await
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionType {
    MultipleChoice,
    /// Short answer, essay and anything unrecognised.
    Other(String),
}

impl QuestionType {
    /// Only multiple-choice questions accumulate wrong answers and lock.
    #[must_use]
    pub const fn supports_locking(&self) -> bool {
        matches!(self, Self::MultipleChoice)
    }
}

impl From<&str> for QuestionType {
    fn from(value: &str) -> Self {
        let value = value.trim();
        match value.to_lowercase().as_str() {
            "multiple" | "mc" | "multiple_choice" | "객관식" => Self::MultipleChoice,
            _ => Self::Other(value.to_owned()),
        }
    }
}
