pub mod application;
pub mod catalog;
pub mod commands;
pub mod description;
pub mod http;
pub mod provider;
pub mod runtime;
