pub mod bindings;
pub mod config;
pub mod i18n;
pub mod preference;
pub mod retry;
