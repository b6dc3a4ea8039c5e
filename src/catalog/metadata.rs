use std::collections::BTreeSet;

use serde::Serialize;

use crate::{error::Error, predicate::Selection, schema::Cocktail, store::CatalogStore};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub categories: Vec<String>,
    pub glasses: Vec<String>,
    pub ingredients: Vec<String>,
}

impl Metadata {
    /// Distinct non-empty values, each list sorted.
    pub fn collect<'a>(cocktails: impl IntoIterator<Item = &'a Cocktail>) -> Self {
        let mut categories = BTreeSet::new();
        let mut glasses = BTreeSet::new();
        let mut ingredients = BTreeSet::new();

        for cocktail in cocktails {
            if let Some(category) = cocktail.category.as_deref().filter(|c| !c.is_empty()) {
                categories.insert(category.to_owned());
            }
            if let Some(glass) = cocktail.glass.as_deref().filter(|g| !g.is_empty()) {
                glasses.insert(glass.to_owned());
            }
            for ingredient in cocktail.ingredients.iter() {
                if !ingredient.name.is_empty() {
                    ingredients.insert(ingredient.name.to_owned());
                }
            }
        }

        Self {
            categories: categories.into_iter().collect(),
            glasses: glasses.into_iter().collect(),
            ingredients: ingredients.into_iter().collect(),
        }
    }
}

/// Full scan of the recipe table. Fine for a few thousand recipes.
pub async fn get_metadata(store: &dyn CatalogStore) -> Result<Metadata, Error> {
    let cocktails = store.select_cocktails(&Selection::all()).await?;
    Ok(Metadata::collect(cocktails.iter()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Ingredient;

    #[test]
    fn collects_sorted_distinct_values() {
        let mut a = Cocktail::new("a", "A");
        a.category = Some("Shot".to_owned());
        a.glass = Some("Shot glass".to_owned());
        a.ingredients = vec![Ingredient::new("Vodka", None), Ingredient::new("Kahlua", None)];

        let mut b = Cocktail::new("b", "B");
        b.category = Some("Cocktail".to_owned());
        b.glass = Some(String::new());
        b.ingredients = vec![Ingredient::new("Vodka", None), Ingredient::new("", None)];

        let metadata = Metadata::collect([&a, &b, &Cocktail::new("c", "C")]);
        assert_eq!(metadata.categories, vec!["Cocktail", "Shot"]);
        assert_eq!(metadata.glasses, vec!["Shot glass"]);
        assert_eq!(metadata.ingredients, vec!["Kahlua", "Vodka"]);
    }
}
