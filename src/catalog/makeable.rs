use std::collections::HashSet;

use crate::{
    error::Error,
    predicate::Selection,
    schema::{BarShelfItem, Cocktail, UserId},
    store::CatalogStore,
};

/// Lowercased names of everything on a bar shelf.
pub fn owned_ingredient_names(shelf: &[BarShelfItem]) -> HashSet<String> {
    shelf
        .iter()
        .map(|item| item.ingredient_name.to_lowercase())
        .collect()
}

/// True when every ingredient of the recipe is owned. Measures are ignored;
/// a recipe without ingredients is always makeable.
pub fn is_makeable(cocktail: &Cocktail, owned: &HashSet<String>) -> bool {
    cocktail
        .ingredients
        .iter()
        .all(|ingredient| owned.contains(&ingredient.name.to_lowercase()))
}

/// Recipes the user can make from their bar shelf, in id order. An empty
/// shelf yields nothing without touching the recipe table.
pub async fn makeable_cocktails(
    user_id: UserId,
    store: &dyn CatalogStore,
) -> Result<Vec<Cocktail>, Error> {
    let shelf = store.list_bar_shelf(user_id).await?;
    let owned = owned_ingredient_names(&shelf);

    if owned.is_empty() {
        return Ok(vec![]);
    }

    let cocktails = store.select_cocktails(&Selection::all()).await?;
    let makeable: Vec<Cocktail> = cocktails
        .into_iter()
        .filter(|cocktail| is_makeable(cocktail, &owned))
        .collect();

    log::debug!(
        "User {user_id} owns {} ingredients and can make {} cocktails",
        owned.len(),
        makeable.len()
    );
    Ok(makeable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{memory::MemoryStore, schema::Ingredient};

    fn gin_fizz() -> Cocktail {
        let mut cocktail = Cocktail::new("c1", "Gin Fizz");
        cocktail.ingredients = vec![
            Ingredient::new("Gin", Some("2 oz")),
            Ingredient::new("Soda Water", None),
        ];
        cocktail
    }

    fn owned(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_lowercase()).collect()
    }

    #[test]
    fn needs_every_ingredient() {
        assert!(!is_makeable(&gin_fizz(), &owned(&["gin"])));
        assert!(is_makeable(&gin_fizz(), &owned(&["GIN", "soda water", "lime"])));
    }

    #[test]
    fn empty_recipes_are_vacuously_makeable() {
        assert!(is_makeable(&Cocktail::new("e", "Air"), &owned(&["gin"])));
    }

    #[tokio::test]
    async fn empty_shelf_makes_nothing() {
        let store = MemoryStore::new();
        store.insert_cocktail(&Cocktail::new("e", "Air")).await.unwrap();

        assert!(makeable_cocktails(1, &store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn shelf_additions_unlock_recipes() {
        let store = MemoryStore::new();
        store.insert_cocktail(&gin_fizz()).await.unwrap();
        store.insert_bar_shelf_item(1, "gin", "").await.unwrap();

        assert!(makeable_cocktails(1, &store).await.unwrap().is_empty());

        store.insert_bar_shelf_item(1, "Soda Water", "").await.unwrap();
        let makeable = makeable_cocktails(1, &store).await.unwrap();
        assert_eq!(makeable.len(), 1);
        assert_eq!(makeable[0].id, "c1");

        // Another user's shelf is not consulted.
        assert!(makeable_cocktails(2, &store).await.unwrap().is_empty());
    }
}
