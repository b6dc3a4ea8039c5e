use async_trait::async_trait;

use crate::error::Error;

use super::{
    predicate::{Predicate, Selection},
    schema::{BarShelfItem, Cocktail, Favorite, NewUserCocktail, UserCocktail, UserId},
};

/// Persistence seam shared by every catalog engine.
///
/// Implementations hold no per-request state; each call acquires whatever
/// connection it needs and releases it before returning. Cocktail selections
/// are always ordered by id so paging is stable.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_cocktail(&self, cocktail: &Cocktail) -> Result<(), Error>;

    /// Removes every recipe. User tables are left alone.
    async fn clear_cocktails(&self) -> Result<u64, Error>;

    async fn get_cocktail(&self, id: &str) -> Result<Option<Cocktail>, Error>;

    async fn select_cocktails(&self, selection: &Selection) -> Result<Vec<Cocktail>, Error>;

    async fn count_cocktails(&self, predicate: &Predicate) -> Result<i64, Error>;

    async fn list_bar_shelf(&self, user_id: UserId) -> Result<Vec<BarShelfItem>, Error>;

    /// Exact, case-sensitive match on the ingredient name.
    async fn find_bar_shelf_item(
        &self,
        user_id: UserId,
        ingredient_name: &str,
    ) -> Result<Option<BarShelfItem>, Error>;

    async fn insert_bar_shelf_item(
        &self,
        user_id: UserId,
        ingredient_name: &str,
        quantity: &str,
    ) -> Result<BarShelfItem, Error>;

    async fn update_bar_shelf_quantity(
        &self,
        item_id: i32,
        quantity: &str,
    ) -> Result<BarShelfItem, Error>;

    /// Returns false when the user owns no entry with that id.
    async fn delete_bar_shelf_item(&self, user_id: UserId, item_id: i32) -> Result<bool, Error>;

    async fn find_favorite(
        &self,
        user_id: UserId,
        cocktail_id: &str,
    ) -> Result<Option<Favorite>, Error>;

    /// Idempotent per (user, recipe): an existing entry is returned as is.
    async fn insert_favorite(&self, user_id: UserId, cocktail_id: &str) -> Result<Favorite, Error>;

    async fn delete_favorite(&self, user_id: UserId, cocktail_id: &str) -> Result<bool, Error>;

    /// Favorites joined with their recipes, in the order they were added.
    async fn favorite_cocktails(&self, user_id: UserId) -> Result<Vec<Cocktail>, Error>;

    async fn list_user_cocktails(&self, user_id: UserId) -> Result<Vec<UserCocktail>, Error>;

    /// `cocktail.name` must already be validated.
    async fn insert_user_cocktail(
        &self,
        user_id: UserId,
        name: &str,
        cocktail: &NewUserCocktail,
    ) -> Result<UserCocktail, Error>;
}
