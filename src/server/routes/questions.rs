use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::get_all_categories,
            questions::{self, get_all_questions, get_question_by_id, search_questions},
        },
        NewQuestion,
    },
    server::{app::AppState, deserializers::PageQuery, error::ApiError},
};

use super::{category_map, ApiResponse, QuestionsPage, Success};

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    Query(PageQuery { page }): Query<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let selection = get_all_questions(&pool).await?;
    let listing = QuestionsPage::paginate(&pool, selection, page).await?;
    if listing.questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    let categories = category_map(get_all_categories(&pool).await?);
    Ok(Json(listing.with_categories(categories)))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Success> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    if get_question_by_id(&pool, id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    questions::delete_question(&pool, id).await.map_err(|err| {
        tracing::warn!("Failed to delete question {id}: {err}");
        ApiError::Unprocessable
    })?;
    tracing::info!("Deleted question {id}");
    Ok(Json(Success { success: true }))
}

/// `POST /questions` searches when the body carries `searchTerm` and
/// creates a question otherwise.
async fn create_or_search(
    State(pool): State<SqlitePool>,
    Query(PageQuery { page }): Query<PageQuery>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let Value::Object(mut fields) = body else {
        return Err(ApiError::BadRequest);
    };
    match fields.remove("searchTerm") {
        Some(Value::String(term)) => Ok(search(&pool, &term, page).await?.into_response()),
        Some(_) => Err(ApiError::BadRequest),
        None => Ok(create(&pool, fields).await?.into_response()),
    }
}

// misses are an empty page, not a 404
async fn search(pool: &SqlitePool, term: &str, page: usize) -> ApiResponse<QuestionsPage> {
    let selection = search_questions(pool, term).await?;
    tracing::debug!("Search for {term:?} matched {} questions", selection.len());
    Ok(Json(QuestionsPage::paginate(pool, selection, page).await?))
}

async fn create(pool: &SqlitePool, fields: Map<String, Value>) -> ApiResponse<Created> {
    let new_question: NewQuestion =
        serde_json::from_value(Value::Object(fields)).map_err(|err| {
            tracing::debug!("Invalid question payload: {err}");
            ApiError::Unprocessable
        })?;
    let id = questions::create_question(pool, &new_question)
        .await
        .map_err(|err| {
            tracing::warn!("Failed to create question: {err}");
            ApiError::Unprocessable
        })?;
    tracing::info!("Created question {id}");
    Ok(Json(Created {
        success: true,
        created: id,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_or_search))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::db::queries::questions::get_question_by_id;
    use crate::db::testing::{empty_pool, seeded_pool};
    use crate::server::app::build_app;
    use crate::server::app::testing::{call, delete, get, post_json, post_raw};

    #[tokio::test]
    async fn lists_first_page_with_categories() {
        let app = build_app(seeded_pool().await);
        let (status, body) = call(app, get("/questions")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_questions"], 12);
        assert_eq!(body["questions"].as_array().unwrap().len(), 10);
        assert_eq!(body["categories"].as_object().unwrap().len(), 6);
        assert_eq!(body["categories"]["2"], "Art");
        // first ten questions span every category except Entertainment
        let current: Vec<i64> = body["current_category"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_i64().unwrap())
            .collect();
        assert_eq!(current, vec![1, 2, 3, 4, 6]);
    }

    #[tokio::test]
    async fn question_has_exactly_formatted_fields() {
        let app = build_app(seeded_pool().await);
        let (_, body) = call(app, get("/questions")).await;
        assert_eq!(
            body["questions"][0],
            json!({
                "id": 1,
                "question": "What is the heaviest organ in the human body?",
                "answer": "The Liver",
                "difficulty": 4,
                "category": 1,
            })
        );
    }

    #[tokio::test]
    async fn second_page_holds_the_rest() {
        let app = build_app(seeded_pool().await);
        let (status, body) = call(app, get("/questions?page=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_questions"], 12);
        assert_eq!(body["questions"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn page_beyond_end_is_not_found() {
        let app = build_app(seeded_pool().await);
        let (status, body) = call(app, get("/questions?page=9999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "resource not found");
    }

    #[tokio::test]
    async fn overflowing_page_is_not_found() {
        let app = build_app(seeded_pool().await);
        let (status, body) = call(app, get("/questions?page=99999999999999999999999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], 404);
    }

    #[tokio::test]
    async fn no_questions_is_not_found() {
        let app = build_app(empty_pool().await);
        let (status, _) = call(app, get("/questions")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unparsable_page_reads_first_page() {
        let app = build_app(seeded_pool().await);
        let (status, body) = call(app, get("/questions?page=abc")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["questions"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn search_with_results() {
        let app = build_app(seeded_pool().await);
        let (status, body) = call(app, post_json("/questions", json!({"searchTerm": "paint"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_questions"], 2);
        assert_eq!(body["questions"].as_array().unwrap().len(), 2);
        assert_eq!(body["current_category"], json!([{"id": 2, "type": "Art"}]));
        assert!(body.get("categories").is_none());
    }

    #[tokio::test]
    async fn search_without_results() {
        let app = build_app(seeded_pool().await);
        let (status, body) = call(
            app,
            post_json("/questions", json!({"searchTerm": "bhjabdjkhasvbk"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_questions"], 0);
        assert_eq!(body["questions"], json!([]));
        assert_eq!(body["current_category"], json!([]));
    }

    #[tokio::test]
    async fn non_string_search_term_is_bad_request() {
        let app = build_app(seeded_pool().await);
        let (status, body) = call(app, post_json("/questions", json!({"searchTerm": 5}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "bad request");
    }

    #[tokio::test]
    async fn creates_question() {
        let pool = seeded_pool().await;
        let payload = json!({
            "question": "Test Question",
            "answer": "Test Answer",
            "difficulty": 5,
            "category": "1",
        });
        let (status, body) = call(build_app(pool.clone()), post_json("/questions", payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let id = body["created"].as_i64().unwrap();
        let stored = get_question_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored.question, "Test Question");
        assert_eq!(stored.category, 1);
    }

    #[tokio::test]
    async fn incomplete_question_is_unprocessable() {
        let app = build_app(seeded_pool().await);
        let (status, body) = call(app, post_json("/questions", json!({"question": "Q?"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body,
            json!({"success": false, "error": 422, "message": "unprocessable"})
        );
    }

    #[tokio::test]
    async fn question_in_unknown_category_is_unprocessable() {
        let app = build_app(seeded_pool().await);
        let payload = json!({
            "question": "Q?",
            "answer": "A",
            "difficulty": 1,
            "category": 999,
        });
        let (status, _) = call(app, post_json("/questions", payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let pool = seeded_pool().await;
        let (status, body) = call(build_app(pool.clone()), post_raw("/questions", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], 400);

        let (status, _) = call(build_app(pool), post_json("/questions", json!([1, 2]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn deletes_question() {
        let pool = seeded_pool().await;
        let (status, body) = call(build_app(pool.clone()), delete("/questions/6")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
        assert!(get_question_by_id(&pool, 6).await.unwrap().is_none());

        let (status, _) = call(build_app(pool), delete("/questions/6")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn failed_delete_is_unprocessable() {
        let pool = seeded_pool().await;
        sqlx::query(
            r#"
            CREATE TRIGGER keep_questions BEFORE DELETE ON questions
            BEGIN SELECT RAISE(ABORT, 'questions are read-only'); END
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let (status, body) = call(build_app(pool.clone()), delete("/questions/3")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body,
            json!({"success": false, "error": 422, "message": "unprocessable"})
        );
        assert!(get_question_by_id(&pool, 3).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deleting_missing_question_is_not_found() {
        let app = build_app(seeded_pool().await);
        let (status, body) = call(app, delete("/questions/9999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "resource not found");
    }

    #[tokio::test]
    async fn posting_to_single_question_is_not_allowed() {
        let app = build_app(seeded_pool().await);
        let payload = json!({
            "question": "Test Question",
            "answer": "Test Answer",
            "difficulty": 5,
            "category": 1,
        });
        let (status, body) = call(app, post_json("/questions/45", payload)).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "method not allowed");
    }
}
