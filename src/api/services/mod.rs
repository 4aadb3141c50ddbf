pub mod export;
pub mod health;
pub mod links;
pub mod redirect;

pub use health::AppStartTime;
