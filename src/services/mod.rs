pub mod auth_service;
pub mod country_service;
pub mod explore_service;

pub use auth_service::*;
pub use country_service::*;
pub use explore_service::*;
