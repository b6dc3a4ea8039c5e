use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres, QueryBuilder};

use crate::{
    config::DbConfig,
    error::{ApiError, Error},
};

use super::{
    error::QueryError,
    predicate::{Predicate, Selection},
    schema::{
        encode_list, BarShelfItem, Cocktail, CocktailRow, Favorite, NewUserCocktail, UserCocktail,
        UserCocktailRow, UserId,
    },
    store::CatalogStore,
};

/// Postgres-backed store. Every call checks a connection out of the pool for
/// the duration of one statement.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DbConfig) -> Result<Self, Error> {
        log::info!("Connecting to database (pool size {})", config.max_connections);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(QueryError::from)?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

/// Creates the tables if they are missing. Safe to run on every start.
pub async fn run_migrations(pool: &Pool<Postgres>) -> Result<(), Error> {
    log::info!("Running database migrations...");

    let statements = [
        "
        CREATE TABLE IF NOT EXISTS cocktails (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            category TEXT,
            alcoholic TEXT,
            glass TEXT,
            instructions TEXT,
            image TEXT,
            ingredients_json TEXT,
            video TEXT,
            tags_json TEXT,
            iba TEXT,
            date_modified TEXT,
            garnish TEXT
        )
        ",
        "
        CREATE TABLE IF NOT EXISTS user_bar_shelf (
            id SERIAL PRIMARY KEY,
            user_id INTEGER NOT NULL,
            ingredient_name TEXT NOT NULL,
            quantity TEXT,
            date_added TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        ",
        "CREATE INDEX IF NOT EXISTS idx_user_bar_shelf_user ON user_bar_shelf(user_id)",
        "
        CREATE TABLE IF NOT EXISTS user_favorites (
            id SERIAL PRIMARY KEY,
            user_id INTEGER NOT NULL,
            cocktail_id TEXT NOT NULL,
            date_added TIMESTAMPTZ NOT NULL DEFAULT now(),
            UNIQUE (user_id, cocktail_id)
        )
        ",
        "
        CREATE TABLE IF NOT EXISTS user_cocktails (
            id SERIAL PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            category TEXT,
            glass TEXT,
            instructions TEXT,
            ingredients_json TEXT,
            tags_json TEXT,
            garnish TEXT,
            date_created TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        ",
        "CREATE INDEX IF NOT EXISTS idx_user_cocktails_user ON user_cocktails(user_id)",
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(QueryError::from)?;
    }

    log::info!("Database migrations completed");
    Ok(())
}

/// `%needle%` for ILIKE, with the needle's own wildcards escaped so it
/// matches literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::True => {
            builder.push("TRUE");
        }
        Predicate::Equals(column, value) => {
            builder
                .push(column.as_sql())
                .push(" = ")
                .push_bind(value.to_owned());
        }
        Predicate::Contains(column, needle) => {
            builder
                .push(column.as_sql())
                .push(" ILIKE ")
                .push_bind(like_pattern(needle))
                .push(" ESCAPE '\\'");
        }
        Predicate::NotEmpty(column) => {
            builder
                .push("(")
                .push(column.as_sql())
                .push(" IS NOT NULL AND ")
                .push(column.as_sql())
                .push(" <> '')");
        }
        Predicate::And(predicates) => push_joined(builder, predicates, " AND ", "TRUE"),
        Predicate::Or(predicates) => push_joined(builder, predicates, " OR ", "FALSE"),
    }
}

fn push_joined(
    builder: &mut QueryBuilder<'_, Postgres>,
    predicates: &[Predicate],
    separator: &str,
    empty: &str,
) {
    if predicates.is_empty() {
        builder.push(empty);
        return;
    }

    builder.push("(");
    for (i, predicate) in predicates.iter().enumerate() {
        if i > 0 {
            builder.push(separator);
        }
        push_predicate(builder, predicate);
    }
    builder.push(")");
}

fn into_cocktails(rows: Vec<CocktailRow>) -> Result<Vec<Cocktail>, Error> {
    rows.into_iter()
        .map(|row| Cocktail::try_from(row).map_err(Error::from))
        .collect()
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn insert_cocktail(&self, cocktail: &Cocktail) -> Result<(), Error> {
        let row = CocktailRow::try_from(cocktail)?;

        sqlx::query(
            "
            INSERT INTO cocktails (id, name, category, alcoholic, glass, instructions, image,
                ingredients_json, video, tags_json, iba, date_modified, garnish)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        ",
        )
        .bind(row.id)
        .bind(row.name)
        .bind(row.category)
        .bind(row.alcoholic)
        .bind(row.glass)
        .bind(row.instructions)
        .bind(row.image)
        .bind(row.ingredients_json)
        .bind(row.video)
        .bind(row.tags_json)
        .bind(row.iba)
        .bind(row.date_modified)
        .bind(row.garnish)
        .execute(&self.pool)
        .await
        .map_err(QueryError::from)?;

        Ok(())
    }

    async fn clear_cocktails(&self) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM cocktails")
            .execute(&self.pool)
            .await
            .map_err(QueryError::from)?;

        Ok(result.rows_affected())
    }

    async fn get_cocktail(&self, id: &str) -> Result<Option<Cocktail>, Error> {
        let row: Option<CocktailRow> = sqlx::query_as("SELECT * FROM cocktails WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(QueryError::from)?;

        Ok(row.map(Cocktail::try_from).transpose()?)
    }

    async fn select_cocktails(&self, selection: &Selection) -> Result<Vec<Cocktail>, Error> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM cocktails WHERE ");
        push_predicate(&mut builder, &selection.predicate);
        builder.push(" ORDER BY id");
        if let Some(limit) = selection.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }
        if selection.offset > 0 {
            builder.push(" OFFSET ").push_bind(selection.offset);
        }

        let rows: Vec<CocktailRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(QueryError::from)?;

        into_cocktails(rows)
    }

    async fn count_cocktails(&self, predicate: &Predicate) -> Result<i64, Error> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM cocktails WHERE ");
        push_predicate(&mut builder, predicate);

        let count: (i64,) = builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(QueryError::from)?;

        Ok(count.0)
    }

    async fn list_bar_shelf(&self, user_id: UserId) -> Result<Vec<BarShelfItem>, Error> {
        let rows: Vec<BarShelfItem> =
            sqlx::query_as("SELECT * FROM user_bar_shelf WHERE user_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .map_err(QueryError::from)?;

        Ok(rows)
    }

    async fn find_bar_shelf_item(
        &self,
        user_id: UserId,
        ingredient_name: &str,
    ) -> Result<Option<BarShelfItem>, Error> {
        let row: Option<BarShelfItem> = sqlx::query_as(
            "
            SELECT * FROM user_bar_shelf
            WHERE user_id = $1 AND ingredient_name = $2
            ORDER BY id LIMIT 1
        ",
        )
        .bind(user_id)
        .bind(ingredient_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(QueryError::from)?;

        Ok(row)
    }

    async fn insert_bar_shelf_item(
        &self,
        user_id: UserId,
        ingredient_name: &str,
        quantity: &str,
    ) -> Result<BarShelfItem, Error> {
        let row: BarShelfItem = sqlx::query_as(
            "
            INSERT INTO user_bar_shelf (user_id, ingredient_name, quantity)
            VALUES ($1, $2, $3)
            RETURNING *
        ",
        )
        .bind(user_id)
        .bind(ingredient_name)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(QueryError::from)?;

        Ok(row)
    }

    async fn update_bar_shelf_quantity(
        &self,
        item_id: i32,
        quantity: &str,
    ) -> Result<BarShelfItem, Error> {
        let row: BarShelfItem =
            sqlx::query_as("UPDATE user_bar_shelf SET quantity = $1 WHERE id = $2 RETURNING *")
                .bind(quantity)
                .bind(item_id)
                .fetch_one(&self.pool)
                .await
                .map_err(QueryError::from)?;

        Ok(row)
    }

    async fn delete_bar_shelf_item(&self, user_id: UserId, item_id: i32) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM user_bar_shelf WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(QueryError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_favorite(
        &self,
        user_id: UserId,
        cocktail_id: &str,
    ) -> Result<Option<Favorite>, Error> {
        let row: Option<Favorite> = sqlx::query_as(
            "SELECT * FROM user_favorites WHERE user_id = $1 AND cocktail_id = $2",
        )
        .bind(user_id)
        .bind(cocktail_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(QueryError::from)?;

        Ok(row)
    }

    async fn insert_favorite(&self, user_id: UserId, cocktail_id: &str) -> Result<Favorite, Error> {
        let inserted: Option<Favorite> = sqlx::query_as(
            "
            INSERT INTO user_favorites (user_id, cocktail_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, cocktail_id) DO NOTHING
            RETURNING *
        ",
        )
        .bind(user_id)
        .bind(cocktail_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(QueryError::from)?;

        if let Some(row) = inserted {
            return Ok(row);
        }

        // Lost a race with a concurrent insert of the same pair.
        self.find_favorite(user_id, cocktail_id)
            .await?
            .ok_or_else(|| ApiError::Internal.new("Favorite vanished after conflicting insert"))
    }

    async fn delete_favorite(&self, user_id: UserId, cocktail_id: &str) -> Result<bool, Error> {
        let result =
            sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND cocktail_id = $2")
                .bind(user_id)
                .bind(cocktail_id)
                .execute(&self.pool)
                .await
                .map_err(QueryError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn favorite_cocktails(&self, user_id: UserId) -> Result<Vec<Cocktail>, Error> {
        let rows: Vec<CocktailRow> = sqlx::query_as(
            "
            SELECT c.*
            FROM user_favorites f
            INNER JOIN cocktails c ON c.id = f.cocktail_id
            WHERE f.user_id = $1
            ORDER BY f.id
        ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(QueryError::from)?;

        into_cocktails(rows)
    }

    async fn list_user_cocktails(&self, user_id: UserId) -> Result<Vec<UserCocktail>, Error> {
        let rows: Vec<UserCocktailRow> =
            sqlx::query_as("SELECT * FROM user_cocktails WHERE user_id = $1 ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .map_err(QueryError::from)?;

        rows.into_iter()
            .map(|row| UserCocktail::try_from(row).map_err(Error::from))
            .collect()
    }

    async fn insert_user_cocktail(
        &self,
        user_id: UserId,
        name: &str,
        cocktail: &NewUserCocktail,
    ) -> Result<UserCocktail, Error> {
        let row: UserCocktailRow = sqlx::query_as(
            "
            INSERT INTO user_cocktails (user_id, name, category, glass, instructions,
                ingredients_json, tags_json, garnish)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
        ",
        )
        .bind(user_id)
        .bind(name)
        .bind(cocktail.category.as_deref())
        .bind(cocktail.glass.as_deref())
        .bind(cocktail.instructions.as_deref())
        .bind(encode_list(&cocktail.ingredients)?)
        .bind(encode_list(&cocktail.tags)?)
        .bind(cocktail.garnish.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(QueryError::from)?;

        Ok(UserCocktail::try_from(row)?)
    }
}
