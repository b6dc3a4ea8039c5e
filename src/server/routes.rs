use std::convert::Infallible;

use warp::{Filter, Reply};

use crate::{
    form::FormData,
    schema::{NewUserCocktail, UserId},
};

use super::{
    filters::{json_body, with_store, Store},
    handlers,
    rejection::handle_rejection,
};

fn cocktail_routes(
    store: Store,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let list = warp::path!("cocktails")
        .and(warp::get())
        .and(warp::query::<handlers::CocktailQuery>())
        .and(with_store(store.clone()))
        .and_then(handlers::list_cocktails);

    // Fixed segments go before the `{id}` route so they are not read as ids.
    let random = warp::path!("cocktails" / "random")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::random_cocktail);

    let featured = warp::path!("cocktails" / "featured")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::featured_cocktails);

    let seasonal = warp::path!("cocktails" / "seasonal")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::seasonal_cocktails);

    let single = warp::path!("cocktails" / String)
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::get_cocktail);

    let metadata = warp::path!("metadata")
        .and(warp::get())
        .and(with_store(store))
        .and_then(handlers::get_metadata);

    list.or(random)
        .or(featured)
        .or(seasonal)
        .or(single)
        .or(metadata)
}

fn user_routes(
    store: Store,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let shelf = warp::path!("users" / UserId / "bar-shelf")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::list_bar_shelf);

    let add_to_shelf = warp::path!("users" / UserId / "bar-shelf")
        .and(warp::post())
        .and(json_body::<FormData>())
        .and(with_store(store.clone()))
        .and_then(handlers::add_to_bar_shelf);

    let remove_from_shelf = warp::path!("users" / UserId / "bar-shelf" / i32)
        .and(warp::delete())
        .and(with_store(store.clone()))
        .and_then(handlers::remove_from_bar_shelf);

    let favorites = warp::path!("users" / UserId / "favorites")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::list_favorites);

    let add_favorite = warp::path!("users" / UserId / "favorites")
        .and(warp::post())
        .and(json_body::<FormData>())
        .and(with_store(store.clone()))
        .and_then(handlers::add_favorite);

    let remove_favorite = warp::path!("users" / UserId / "favorites" / String)
        .and(warp::delete())
        .and(with_store(store.clone()))
        .and_then(handlers::remove_favorite);

    let cocktails = warp::path!("users" / UserId / "cocktails")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::list_user_cocktails);

    let create_cocktail = warp::path!("users" / UserId / "cocktails")
        .and(warp::post())
        .and(json_body::<NewUserCocktail>())
        .and(with_store(store.clone()))
        .and_then(handlers::create_user_cocktail);

    let makeable = warp::path!("users" / UserId / "makeable")
        .and(warp::get())
        .and(with_store(store.clone()))
        .and_then(handlers::makeable_cocktails);

    let shopping_list = warp::path!("users" / UserId / "shopping-list")
        .and(warp::get())
        .and(with_store(store))
        .and_then(handlers::shopping_list);

    shelf
        .or(add_to_shelf)
        .or(remove_from_shelf)
        .or(favorites)
        .or(add_favorite)
        .or(remove_favorite)
        .or(cocktails)
        .or(create_cocktail)
        .or(makeable)
        .or(shopping_list)
}

/// The whole HTTP surface: `/api/...` plus `/health`, with every rejection
/// rendered as a JSON error.
pub fn routes(store: Store) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let api = warp::path("api").and(cocktail_routes(store.clone()).or(user_routes(store)));

    let health = warp::path!("health")
        .and(warp::get())
        .and_then(handlers::health);

    api.or(health)
        .recover(handle_rejection)
        .with(warp::log("cocktail_catalog::api"))
}
