use crate::{
    constants::{
        FEATURED_FALLBACK_LIMIT, FEATURED_TAG, SEASONAL_INGREDIENTS, SEASONAL_LIMIT, SEASONAL_TAG,
    },
    error::Error,
    predicate::{Column, Predicate, Selection},
    schema::Cocktail,
    store::CatalogStore,
};

use super::query::{legacy_substring_search, SerializedList};

/// Recipes tagged "signature". When there are none, up to ten IBA recipes.
pub async fn featured_cocktails(store: &dyn CatalogStore) -> Result<Vec<Cocktail>, Error> {
    let signature = legacy_substring_search(SerializedList::Tags, FEATURED_TAG);
    let featured = store
        .select_cocktails(&Selection::filtered(signature))
        .await?;

    if !featured.is_empty() {
        return Ok(featured);
    }

    log::debug!("No signature cocktails, falling back to IBA list");
    store
        .select_cocktails(
            &Selection::filtered(Predicate::NotEmpty(Column::Iba)).limit(FEATURED_FALLBACK_LIMIT),
        )
        .await
}

pub fn seasonal_predicate() -> Predicate {
    let mut predicates = vec![legacy_substring_search(SerializedList::Tags, SEASONAL_TAG)];
    predicates.extend(
        SEASONAL_INGREDIENTS
            .iter()
            .map(|keyword| legacy_substring_search(SerializedList::Ingredients, keyword)),
    );

    Predicate::any(predicates)
}

pub async fn seasonal_cocktails(store: &dyn CatalogStore) -> Result<Vec<Cocktail>, Error> {
    store
        .select_cocktails(&Selection::filtered(seasonal_predicate()).limit(SEASONAL_LIMIT))
        .await
}
