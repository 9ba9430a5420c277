use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{contains_ignore_case, IMPORT_CHUNK};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, type
FROM categories
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Categories whose id is in `ids`, ordered by id. Duplicated ids are fine.
pub async fn get_categories_by_ids(pool: &SqlitePool, ids: &[i64]) -> sqlx::Result<Vec<Category>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, type FROM categories WHERE id IN (");
    let mut separated = query.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY id");

    query.build_query_as::<Category>().fetch_all(pool).await
}

/// Case-insensitive substring match on the category label, folding
/// non-ASCII letters too.
pub async fn find_categories_by_type(
    pool: &SqlitePool,
    label: &str,
) -> sqlx::Result<Vec<Category>> {
    let categories = get_all_categories(pool).await?;
    Ok(categories
        .into_iter()
        .filter(|c| contains_ignore_case(&c.kind, label))
        .collect())
}

pub async fn create_category(pool: &SqlitePool, kind: &str) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
INSERT INTO categories (type) VALUES (?1)
        "#,
    )
    .bind(kind)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Inserts categories keeping their ids, so that imported questions keep
/// pointing at the right rows.
pub async fn import_categories(pool: &SqlitePool, categories: Vec<Category>) -> sqlx::Result<()> {
    for chunk in categories.chunks(IMPORT_CHUNK) {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("INSERT INTO categories (id, type) ");
        query.push_values(chunk, |mut row, category| {
            row.push_bind(category.id).push_bind(category.kind.as_str());
        });
        query.build().execute(pool).await?;
    }
    tracing::info!("Imported {} categories", categories.len());
    Ok(())
}
