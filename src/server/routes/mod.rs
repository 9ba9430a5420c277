mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

use axum::Json;
use itertools::Itertools;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::queries::categories::get_categories_by_ids;
use crate::db::{Category, Question};
use crate::server::error::ApiError;
use crate::server::pagination::paginate;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

pub type ApiResponse<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

/// Category id to label, serialized as a JSON object keyed by id.
pub type CategoryMap = BTreeMap<i64, String>;

pub fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

#[derive(Debug, Serialize)]
pub struct QuestionsPage {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryMap>,
    pub current_category: Vec<Category>,
}

impl QuestionsPage {
    /// Cuts `page` out of `selection` and looks up the categories its
    /// questions belong to. `total_questions` counts the whole selection.
    pub async fn paginate(
        pool: &SqlitePool,
        selection: Vec<Question>,
        page: usize,
    ) -> Result<Self, ApiError> {
        let total_questions = selection.len();
        let questions = paginate(selection, page);
        let ids: Vec<i64> = questions.iter().map(|q| q.category).unique().collect();
        let current_category = get_categories_by_ids(pool, &ids).await?;
        Ok(QuestionsPage {
            questions,
            total_questions,
            categories: None,
            current_category,
        })
    }

    pub fn with_categories(self, categories: CategoryMap) -> Self {
        QuestionsPage {
            categories: Some(categories),
            ..self
        }
    }
}
