use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::find_categories_by_type,
            questions::{get_all_questions, get_questions_for_category},
        },
        Question,
    },
    server::{app::AppState, error::ApiError},
    telemetry::QUIZ_QUESTIONS_CNTR,
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuizRequest {
    quiz_category: QuizCategory,
    #[serde(default)]
    previous_questions: Vec<i64>,
}

// the frontend also sends an `id`, the label is what selects the category
#[derive(Deserialize)]
struct QuizCategory {
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum NextQuestion {
    Question(Question),
    /// Serialized as `false` once every candidate has been seen.
    Exhausted(bool),
}

#[derive(Serialize)]
struct QuizBody {
    question: NextQuestion,
}

fn pick_unseen(candidates: Vec<Question>, seen: &[i64]) -> Option<Question> {
    let unseen: Vec<Question> = candidates
        .into_iter()
        .filter(|q| !seen.contains(&q.id))
        .collect();
    unseen.choose(&mut rand::thread_rng()).cloned()
}

async fn next_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<QuizBody> {
    let Json(QuizRequest {
        quiz_category,
        previous_questions,
    }) = body?;

    // anything but a single match plays over every category
    let mut matches = find_categories_by_type(&pool, &quiz_category.kind).await?;
    let (scope, candidates) = match (matches.pop(), matches.is_empty()) {
        (Some(category), true) => {
            let questions = get_questions_for_category(&pool, category.id).await?;
            (category.kind, questions)
        }
        _ => ("all".to_owned(), get_all_questions(&pool).await?),
    };

    let question = match pick_unseen(candidates, &previous_questions) {
        Some(question) => {
            QUIZ_QUESTIONS_CNTR.with_label_values(&[scope.as_str()]).inc();
            NextQuestion::Question(question)
        }
        None => {
            tracing::debug!("Quiz over {scope} has no unseen questions left");
            NextQuestion::Exhausted(false)
        }
    };
    Ok(Json(QuizBody { question }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
