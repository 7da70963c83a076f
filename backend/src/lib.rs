//! APIBoy Backend Library
//!
//! Multi-tenant backend of an API testing tool: accounts and sessions,
//! projects shared between members, and the folders, saved requests and
//! environments that live in them. Exposed as a library for tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod pipeline;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
