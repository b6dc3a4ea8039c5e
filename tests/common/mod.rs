use std::sync::Arc;

use cocktail_catalog::{
    memory::MemoryStore,
    schema::{Cocktail, Ingredient},
    server::Store,
    store::CatalogStore,
};
use serde_json::Value;
use warp::{http::StatusCode, Filter, Reply};

pub fn cocktail(id: &str, name: &str, ingredients: &[&str]) -> Cocktail {
    let mut cocktail = Cocktail::new(id, name);
    cocktail.ingredients = ingredients
        .iter()
        .map(|name| Ingredient::new(name, Some("1 oz")))
        .collect();
    cocktail
}

/// A small catalog covering the filters, the featured fallback and the
/// seasonal keywords.
pub async fn seeded_store() -> Store {
    let store = MemoryStore::new();

    let mut gin_fizz = cocktail("c1", "Gin Fizz", &["Gin", "Lemon Juice", "Sugar", "Soda Water"]);
    gin_fizz.category = Some("Ordinary Drink".to_owned());
    gin_fizz.alcoholic = Some("Alcoholic".to_owned());
    gin_fizz.glass = Some("Highball glass".to_owned());
    gin_fizz.iba = Some("Unforgettables".to_owned());
    gin_fizz.tags = vec!["IBA".to_owned(), "Classic".to_owned()];

    let mut negroni = cocktail("c2", "Negroni", &["Gin", "Campari", "Sweet Vermouth"]);
    negroni.category = Some("Ordinary Drink".to_owned());
    negroni.alcoholic = Some("Alcoholic".to_owned());
    negroni.glass = Some("Old-fashioned glass".to_owned());
    negroni.iba = Some("Unforgettables".to_owned());

    let mut cider = cocktail("c3", "Hot Apple Cider", &["Apple Cider", "Cinnamon"]);
    cider.category = Some("Punch / Party Drink".to_owned());
    cider.alcoholic = Some("Non alcoholic".to_owned());
    cider.glass = Some("Coffee mug".to_owned());
    cider.instructions = Some("Warm gently and serve.".to_owned());

    for cocktail in [gin_fizz, negroni, cider] {
        store.insert_cocktail(&cocktail).await.unwrap();
    }

    Arc::new(store)
}

pub fn api(store: Store) -> impl Filter<Extract = (impl Reply,), Error = std::convert::Infallible> + Clone {
    cocktail_catalog::server::routes(store)
}

pub fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

pub fn assert_error(status: StatusCode, expected: StatusCode, body: &[u8]) {
    assert_eq!(status, expected, "unexpected status, body: {:?}", body_json(body));
    assert!(body_json(body)["error"].is_string());
}
