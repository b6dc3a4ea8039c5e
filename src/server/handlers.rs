use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use warp::{http::StatusCode, reply::Response, Reply};

use crate::{
    catalog::{
        custom, favorites, featured, makeable, metadata,
        query::{self, CocktailFilters},
        shelf, shopping,
    },
    constants::{COCKTAIL_COUNT_PER_PAGE, DEFAULT_PAGE},
    error::Error,
    form::{Form, FormData},
    schema::{NewUserCocktail, UpsertStatus, UserId},
};

use super::{filters::Store, rejection::error_reply};

/// Query string of `GET /cocktails`.
#[derive(Debug, Default, Deserialize)]
pub struct CocktailQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub alcoholic: Option<String>,
    pub glass: Option<String>,
    pub ingredient: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl CocktailQuery {
    pub fn filters(&self) -> CocktailFilters {
        CocktailFilters {
            search: self.search.to_owned(),
            category: self.category.to_owned(),
            alcoholic: self.alcoholic.to_owned(),
            glass: self.glass.to_owned(),
            ingredient: self.ingredient.to_owned(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

fn reply_with<T: Serialize>(result: Result<T, Error>, status: StatusCode) -> Response {
    match result {
        Ok(value) => warp::reply::with_status(warp::reply::json(&value), status).into_response(),
        Err(error) => error_reply(&error),
    }
}

fn ok<T: Serialize>(result: Result<T, Error>) -> Result<Response, Infallible> {
    Ok(reply_with(result, StatusCode::OK))
}

fn upserted<T: Serialize>(result: Result<(T, UpsertStatus), Error>) -> Result<Response, Infallible> {
    Ok(match result {
        Ok((value, UpsertStatus::Created)) => reply_with(Ok(value), StatusCode::CREATED),
        Ok((value, UpsertStatus::Updated)) => reply_with(Ok(value), StatusCode::OK),
        Err(error) => error_reply(&error),
    })
}

pub async fn list_cocktails(params: CocktailQuery, store: Store) -> Result<Response, Infallible> {
    let page = params.page.unwrap_or(DEFAULT_PAGE);
    let per_page = params.per_page.unwrap_or(COCKTAIL_COUNT_PER_PAGE);

    ok(query::query_cocktails(&params.filters(), page, per_page, store.as_ref()).await)
}

pub async fn get_cocktail(id: String, store: Store) -> Result<Response, Infallible> {
    ok(query::get_cocktail(&id, store.as_ref()).await)
}

pub async fn random_cocktail(store: Store) -> Result<Response, Infallible> {
    ok(query::random_cocktail(store.as_ref()).await)
}

pub async fn featured_cocktails(store: Store) -> Result<Response, Infallible> {
    ok(featured::featured_cocktails(store.as_ref()).await)
}

pub async fn seasonal_cocktails(store: Store) -> Result<Response, Infallible> {
    ok(featured::seasonal_cocktails(store.as_ref()).await)
}

pub async fn get_metadata(store: Store) -> Result<Response, Infallible> {
    ok(metadata::get_metadata(store.as_ref()).await)
}

pub async fn list_bar_shelf(user_id: UserId, store: Store) -> Result<Response, Infallible> {
    ok(shelf::list_bar_shelf(user_id, store.as_ref()).await)
}

pub async fn add_to_bar_shelf(
    user_id: UserId,
    data: FormData,
    store: Store,
) -> Result<Response, Infallible> {
    let form = Form::from_data(data);
    let fields = form
        .get_str("ingredient_name", "Ingredient name is required")
        .and_then(|name| Ok((name, form.get_optional_str("quantity")?.unwrap_or_default())));

    let (name, quantity) = match fields {
        Ok(fields) => fields,
        Err(e) => return Ok(error_reply(&e.into())),
    };

    upserted(shelf::add_ingredient(user_id, &name, &quantity, store.as_ref()).await)
}

pub async fn remove_from_bar_shelf(
    user_id: UserId,
    item_id: i32,
    store: Store,
) -> Result<Response, Infallible> {
    ok(shelf::remove_ingredient(user_id, item_id, store.as_ref())
        .await
        .map(|_| MessageResponse {
            message: "Ingredient removed successfully",
        }))
}

pub async fn list_favorites(user_id: UserId, store: Store) -> Result<Response, Infallible> {
    ok(favorites::list_favorites(user_id, store.as_ref()).await)
}

pub async fn add_favorite(
    user_id: UserId,
    data: FormData,
    store: Store,
) -> Result<Response, Infallible> {
    let cocktail_id = match Form::from_data(data).get_str("cocktail_id", "Cocktail id is required")
    {
        Ok(cocktail_id) => cocktail_id,
        Err(e) => return Ok(error_reply(&e.into())),
    };

    upserted(favorites::add_favorite(user_id, &cocktail_id, store.as_ref()).await)
}

pub async fn remove_favorite(
    user_id: UserId,
    cocktail_id: String,
    store: Store,
) -> Result<Response, Infallible> {
    ok(favorites::remove_favorite(user_id, &cocktail_id, store.as_ref())
        .await
        .map(|_| MessageResponse {
            message: "Favorite removed successfully",
        }))
}

pub async fn list_user_cocktails(user_id: UserId, store: Store) -> Result<Response, Infallible> {
    ok(custom::list_user_cocktails(user_id, store.as_ref()).await)
}

pub async fn create_user_cocktail(
    user_id: UserId,
    cocktail: NewUserCocktail,
    store: Store,
) -> Result<Response, Infallible> {
    Ok(reply_with(
        custom::create_user_cocktail(user_id, &cocktail, store.as_ref()).await,
        StatusCode::CREATED,
    ))
}

pub async fn makeable_cocktails(user_id: UserId, store: Store) -> Result<Response, Infallible> {
    ok(makeable::makeable_cocktails(user_id, store.as_ref()).await)
}

pub async fn shopping_list(user_id: UserId, store: Store) -> Result<Response, Infallible> {
    ok(shopping::shopping_list(user_id, store.as_ref()).await)
}

pub async fn health() -> Result<Response, Infallible> {
    Ok(warp::reply::json(&serde_json::json!({ "status": "ok" })).into_response())
}
