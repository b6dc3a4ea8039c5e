use std::{convert::Infallible, sync::Arc};

use serde::de::DeserializeOwned;
use warp::{reject::Rejection, Filter};

use crate::store::CatalogStore;

pub type Store = Arc<dyn CatalogStore>;

const MAX_BODY_BYTES: u64 = 64 * 1024;

pub fn with_store(store: Store) -> impl Filter<Extract = (Store,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

pub fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}
