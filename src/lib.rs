pub mod api;
pub mod config;
pub mod error;
pub mod i18n;
pub mod model;
pub mod resolver;
pub mod retry;
pub mod security;
pub mod smoke;
pub mod synthesis;
