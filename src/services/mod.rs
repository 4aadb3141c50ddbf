pub mod cooldown;
pub mod link_service;
pub mod resolver;

pub use cooldown::CooldownRegistry;
pub use link_service::{CreateLinkRequest, LinkCreateResult, LinkService};
pub use resolver::{Resolution, ResolverService};
