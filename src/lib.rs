//! Country exploration backend: a REST Countries data client plus a demo
//! session & favorites store persisted through a pluggable key-value store.
//!
//! The embedding application is the composition root: it builds an
//! [`services::auth_service::AuthService`] over a [`database::KeyValueStore`]
//! and a [`services::auth_service::UserDirectory`], calls
//! [`AuthService::init_auth`](services::auth_service::AuthService::init_auth)
//! once at startup, and reads country data through [`services::country_service`].

pub mod database;
pub mod models;
pub mod seeds;
pub mod services;
pub mod utils;
