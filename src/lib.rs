pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod prompts;
pub mod relay;
pub mod web;
