use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use sqlx::SqlitePool;

use crate::{error::LookupError, models::Question, pages::group_by_tens, state::GraderState};

pub fn router() -> Router<GraderState> {
    Router::new()
        .route("/questions", get(get_questions))
        .route("/workbooks", get(get_workbooks))
        .route("/pages", get(get_pages))
}

#[derive(Debug, Deserialize)]
struct QuestionsQuery {
    page: Option<String>,
    workbook: Option<String>,
}

/// Answers for one page, keyed `q{number}`.
async fn get_questions(
    State(db): State<SqlitePool>,
    Query(QuestionsQuery { page, workbook }): Query<QuestionsQuery>,
) -> Result<Json<Map<String, Value>>, LookupError> {
    let page = page
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(LookupError::MissingParam("page"))?
        .parse::<i64>()
        .map_err(|_| LookupError::NotANumber("page"))?;

    let workbook = workbook.as_deref().map(str::trim).filter(|w| !w.is_empty());

    let answers = Question::for_page(&db, workbook, page)
        .await?
        .into_iter()
        .map(|q| {
            (
                format!("q{}", q.number),
                json!({
                    "workbook": q.workbook,
                    "page": q.page,
                    "type": q.type_,
                    "ans": q.answer,
                }),
            )
        })
        .collect();

    Ok(Json(answers))
}

async fn get_workbooks(State(db): State<SqlitePool>) -> Result<Json<Value>, LookupError> {
    let workbooks = Question::workbooks(&db).await?;
    Ok(Json(json!({ "workbooks": workbooks })))
}

#[derive(Debug, Deserialize)]
struct PagesQuery {
    workbook: Option<String>,
}

async fn get_pages(
    State(db): State<SqlitePool>,
    Query(PagesQuery { workbook }): Query<PagesQuery>,
) -> Result<Json<Value>, LookupError> {
    let workbook = workbook
        .as_deref()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .ok_or(LookupError::MissingParam("workbook"))?;

    let pages = Question::pages(&db, workbook).await?;
    let rows = group_by_tens(&pages);

    Ok(Json(json!({ "pages": pages, "rows": rows })))
}
