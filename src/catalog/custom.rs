use crate::{
    error::{ApiError, Error},
    schema::{NewUserCocktail, UserCocktail, UserId},
    store::CatalogStore,
};

pub async fn list_user_cocktails(
    user_id: UserId,
    store: &dyn CatalogStore,
) -> Result<Vec<UserCocktail>, Error> {
    store.list_user_cocktails(user_id).await
}

pub async fn create_user_cocktail(
    user_id: UserId,
    cocktail: &NewUserCocktail,
    store: &dyn CatalogStore,
) -> Result<UserCocktail, Error> {
    let name = cocktail
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::InvalidRequest.new("Cocktail name is required"))?;

    let created = store.insert_user_cocktail(user_id, name, cocktail).await?;
    log::info!("User {user_id} created cocktail {} ({})", created.id, created.name);

    Ok(created)
}
