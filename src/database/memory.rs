use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{ApiError, Error};

use super::{
    predicate::{Predicate, Selection},
    schema::{
        encode_list, BarShelfItem, Cocktail, CocktailRow, Favorite, NewUserCocktail, UserCocktail,
        UserCocktailRow, UserId,
    },
    store::CatalogStore,
};

#[derive(Default)]
struct Tables {
    // BTreeMap keeps id order for free.
    cocktails: BTreeMap<String, CocktailRow>,
    bar_shelf: Vec<BarShelfItem>,
    favorites: Vec<Favorite>,
    user_cocktails: Vec<UserCocktailRow>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process store used when no database is configured, and by the tests.
/// Rows are kept in their stored form so filters see the same serialized
/// text the Postgres store would.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_cocktail(&self, cocktail: &Cocktail) -> Result<(), Error> {
        let row = CocktailRow::try_from(cocktail)?;
        let mut tables = self.tables.write().await;

        if tables.cocktails.contains_key(&row.id) {
            return Err(ApiError::Internal.new(&format!(
                "duplicate key value violates unique constraint: cocktail {}",
                row.id
            )));
        }
        tables.cocktails.insert(row.id.to_owned(), row);

        Ok(())
    }

    async fn clear_cocktails(&self) -> Result<u64, Error> {
        let mut tables = self.tables.write().await;
        let removed = tables.cocktails.len() as u64;
        tables.cocktails.clear();

        Ok(removed)
    }

    async fn get_cocktail(&self, id: &str) -> Result<Option<Cocktail>, Error> {
        let tables = self.tables.read().await;

        Ok(tables
            .cocktails
            .get(id)
            .cloned()
            .map(Cocktail::try_from)
            .transpose()?)
    }

    async fn select_cocktails(&self, selection: &Selection) -> Result<Vec<Cocktail>, Error> {
        let tables = self.tables.read().await;
        let offset = selection.offset.max(0) as usize;
        let limit = selection
            .limit
            .map(|l| l.max(0) as usize)
            .unwrap_or(usize::MAX);

        tables
            .cocktails
            .values()
            .filter(|row| selection.predicate.matches(row))
            .skip(offset)
            .take(limit)
            .map(|row| Cocktail::try_from(row.clone()).map_err(Error::from))
            .collect()
    }

    async fn count_cocktails(&self, predicate: &Predicate) -> Result<i64, Error> {
        let tables = self.tables.read().await;

        Ok(tables
            .cocktails
            .values()
            .filter(|row| predicate.matches(row))
            .count() as i64)
    }

    async fn list_bar_shelf(&self, user_id: UserId) -> Result<Vec<BarShelfItem>, Error> {
        let tables = self.tables.read().await;

        Ok(tables
            .bar_shelf
            .iter()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_bar_shelf_item(
        &self,
        user_id: UserId,
        ingredient_name: &str,
    ) -> Result<Option<BarShelfItem>, Error> {
        let tables = self.tables.read().await;

        Ok(tables
            .bar_shelf
            .iter()
            .find(|item| item.user_id == user_id && item.ingredient_name == ingredient_name)
            .cloned())
    }

    async fn insert_bar_shelf_item(
        &self,
        user_id: UserId,
        ingredient_name: &str,
        quantity: &str,
    ) -> Result<BarShelfItem, Error> {
        let mut tables = self.tables.write().await;
        let item = BarShelfItem {
            id: tables.next_id(),
            user_id,
            ingredient_name: ingredient_name.to_owned(),
            quantity: Some(quantity.to_owned()),
            date_added: Utc::now(),
        };
        tables.bar_shelf.push(item.clone());

        Ok(item)
    }

    async fn update_bar_shelf_quantity(
        &self,
        item_id: i32,
        quantity: &str,
    ) -> Result<BarShelfItem, Error> {
        let mut tables = self.tables.write().await;

        match tables.bar_shelf.iter_mut().find(|item| item.id == item_id) {
            Some(item) => {
                item.quantity = Some(quantity.to_owned());
                Ok(item.clone())
            }
            None => Err(ApiError::NotFound.new("Ingredient not found")),
        }
    }

    async fn delete_bar_shelf_item(&self, user_id: UserId, item_id: i32) -> Result<bool, Error> {
        let mut tables = self.tables.write().await;
        let before = tables.bar_shelf.len();
        tables
            .bar_shelf
            .retain(|item| !(item.id == item_id && item.user_id == user_id));

        Ok(tables.bar_shelf.len() < before)
    }

    async fn find_favorite(
        &self,
        user_id: UserId,
        cocktail_id: &str,
    ) -> Result<Option<Favorite>, Error> {
        let tables = self.tables.read().await;

        Ok(tables
            .favorites
            .iter()
            .find(|f| f.user_id == user_id && f.cocktail_id == cocktail_id)
            .cloned())
    }

    async fn insert_favorite(&self, user_id: UserId, cocktail_id: &str) -> Result<Favorite, Error> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables
            .favorites
            .iter()
            .find(|f| f.user_id == user_id && f.cocktail_id == cocktail_id)
        {
            return Ok(existing.clone());
        }

        let favorite = Favorite {
            id: tables.next_id(),
            user_id,
            cocktail_id: cocktail_id.to_owned(),
            date_added: Utc::now(),
        };
        tables.favorites.push(favorite.clone());

        Ok(favorite)
    }

    async fn delete_favorite(&self, user_id: UserId, cocktail_id: &str) -> Result<bool, Error> {
        let mut tables = self.tables.write().await;
        let before = tables.favorites.len();
        tables
            .favorites
            .retain(|f| !(f.user_id == user_id && f.cocktail_id == cocktail_id));

        Ok(tables.favorites.len() < before)
    }

    async fn favorite_cocktails(&self, user_id: UserId) -> Result<Vec<Cocktail>, Error> {
        let tables = self.tables.read().await;

        tables
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .filter_map(|f| tables.cocktails.get(&f.cocktail_id))
            .map(|row| Cocktail::try_from(row.clone()).map_err(Error::from))
            .collect()
    }

    async fn list_user_cocktails(&self, user_id: UserId) -> Result<Vec<UserCocktail>, Error> {
        let tables = self.tables.read().await;

        tables
            .user_cocktails
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| UserCocktail::try_from(row.clone()).map_err(Error::from))
            .collect()
    }

    async fn insert_user_cocktail(
        &self,
        user_id: UserId,
        name: &str,
        cocktail: &NewUserCocktail,
    ) -> Result<UserCocktail, Error> {
        let ingredients_json = encode_list(&cocktail.ingredients)?;
        let tags_json = encode_list(&cocktail.tags)?;

        let mut tables = self.tables.write().await;
        let row = UserCocktailRow {
            id: tables.next_id(),
            user_id,
            name: name.to_owned(),
            category: cocktail.category.to_owned(),
            glass: cocktail.glass.to_owned(),
            instructions: cocktail.instructions.to_owned(),
            ingredients_json,
            tags_json,
            garnish: cocktail.garnish.to_owned(),
            date_created: Utc::now(),
        };
        tables.user_cocktails.push(row.clone());

        Ok(UserCocktail::try_from(row)?)
    }
}
