use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::queries::{categories::get_all_categories, questions::get_questions_for_category},
    server::{app::AppState, deserializers::PageQuery, error::ApiError},
};

use super::{category_map, ApiResponse, CategoryMap, QuestionsPage};

#[derive(Serialize)]
struct CategoriesBody {
    categories: CategoryMap,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesBody> {
    let categories = get_all_categories(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesBody {
        categories: category_map(categories),
    }))
}

// an unknown category and a category without questions both end up as 404
async fn category_questions(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let selection = get_questions_for_category(&pool, id).await?;
    if selection.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(QuestionsPage::paginate(&pool, selection, page).await?))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(category_questions))
        .with_state(state)
}
