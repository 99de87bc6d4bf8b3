//! Movie homepage cache service
//!
//! Agrega el catálogo Ophim en secciones del homepage y las sirve desde
//! cache, refrescándolas por grupos con respaldo y rollback.

pub mod cache;
pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
