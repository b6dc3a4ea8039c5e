mod database {
    pub mod error;
    pub mod form;
    pub mod memory;
    pub mod pagination;
    pub mod postgres;
    pub mod predicate;
    pub mod schema;
    pub mod store;
}
pub mod catalog {
    pub mod custom;
    pub mod favorites;
    pub mod featured;
    pub mod makeable;
    pub mod metadata;
    pub mod query;
    pub mod shelf;
    pub mod shopping;
}
pub mod server {
    pub mod filters;
    pub mod handlers;
    pub mod rejection;
    pub mod routes;

    pub use filters::Store;
    pub use routes::routes;
}
pub mod config;
pub mod constants;
pub mod error;
pub mod loader;
pub mod logging;

pub use database::*;
