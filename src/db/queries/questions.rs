use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{contains_ignore_case, IMPORT_CHUNK};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub difficulty: i64,
    pub category: i64,
}

/// Payload of a question that is not stored yet. Forms post numbers as
/// strings, so both shapes are accepted for the numeric fields.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub difficulty: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub category: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, difficulty, category FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, difficulty, category FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, difficulty, category FROM questions WHERE questions.category = ?1 ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring search over the question text. Case folding is
/// Unicode aware, so "ÉCOLE" finds "école".
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let questions = get_all_questions(pool).await?;
    Ok(questions
        .into_iter()
        .filter(|q| contains_ignore_case(&q.question, term))
        .collect())
}

pub async fn create_question(pool: &SqlitePool, new_question: &NewQuestion) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, difficulty, category) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(new_question.question.as_str())
    .bind(new_question.answer.as_str())
    .bind(new_question.difficulty)
    .bind(new_question.category)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns the number of deleted rows.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let deleted = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(deleted)
}

/// Inserts questions keeping their ids. Categories must be imported first.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    for chunk in questions.chunks(IMPORT_CHUNK) {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO questions (id, question, answer, difficulty, category) ",
        );
        query.push_values(chunk, |mut row, question| {
            row.push_bind(question.id)
                .push_bind(question.question.as_str())
                .push_bind(question.answer.as_str())
                .push_bind(question.difficulty)
                .push_bind(question.category);
        });
        query.build().execute(pool).await?;
    }
    tracing::info!("Imported {} questions", questions.len());
    Ok(())
}
