pub mod backend;
pub mod models;

pub use backend::SeaOrmStore;
pub use models::Link;
