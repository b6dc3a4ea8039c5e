use crate::{
    error::{ApiError, Error},
    schema::{Cocktail, Favorite, UpsertStatus, UserId},
    store::CatalogStore,
};

pub async fn list_favorites(
    user_id: UserId,
    store: &dyn CatalogStore,
) -> Result<Vec<Cocktail>, Error> {
    store.favorite_cocktails(user_id).await
}

/// Favorites are unique per (user, recipe); favoriting twice returns the
/// existing entry. Two concurrent first adds both report `Created` for the
/// same row; the store's insert is idempotent so neither fails.
pub async fn add_favorite(
    user_id: UserId,
    cocktail_id: &str,
    store: &dyn CatalogStore,
) -> Result<(Favorite, UpsertStatus), Error> {
    if store.get_cocktail(cocktail_id).await?.is_none() {
        return Err(ApiError::NotFound.new("Cocktail not found"));
    }

    if let Some(existing) = store.find_favorite(user_id, cocktail_id).await? {
        return Ok((existing, UpsertStatus::Updated));
    }

    let favorite = store.insert_favorite(user_id, cocktail_id).await?;
    Ok((favorite, UpsertStatus::Created))
}

pub async fn remove_favorite(
    user_id: UserId,
    cocktail_id: &str,
    store: &dyn CatalogStore,
) -> Result<(), Error> {
    if !store.delete_favorite(user_id, cocktail_id).await? {
        return Err(ApiError::NotFound.new("Favorite not found"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn favoriting_is_idempotent() {
        let store = MemoryStore::new();
        store.insert_cocktail(&Cocktail::new("c1", "Gin Fizz")).await.unwrap();

        let (first, status) = add_favorite(1, "c1", &store).await.unwrap();
        assert_eq!(status, UpsertStatus::Created);
        let (again, status) = add_favorite(1, "c1", &store).await.unwrap();
        assert_eq!(status, UpsertStatus::Updated);
        assert_eq!(again.id, first.id);

        let favorites = list_favorites(1, &store).await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, "c1");
    }

    #[tokio::test]
    async fn concurrent_adds_share_one_row() {
        let store = MemoryStore::new();
        store.insert_cocktail(&Cocktail::new("c1", "Gin Fizz")).await.unwrap();

        let (a, b) = tokio::join!(add_favorite(1, "c1", &store), add_favorite(1, "c1", &store));
        assert_eq!(a.unwrap().0.id, b.unwrap().0.id);
        assert_eq!(list_favorites(1, &store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_recipes_cannot_be_favorited() {
        let store = MemoryStore::new();
        assert!(add_favorite(1, "ghost", &store).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn removing_unfavorites() {
        let store = MemoryStore::new();
        store.insert_cocktail(&Cocktail::new("c1", "Gin Fizz")).await.unwrap();
        add_favorite(1, "c1", &store).await.unwrap();

        remove_favorite(1, "c1", &store).await.unwrap();
        assert!(list_favorites(1, &store).await.unwrap().is_empty());
        assert!(remove_favorite(1, "c1", &store).await.unwrap_err().is_not_found());
    }
}
