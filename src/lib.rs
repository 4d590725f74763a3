pub mod access;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod content;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod media;
pub mod state;
pub mod storage;
