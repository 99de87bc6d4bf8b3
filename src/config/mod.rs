//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de variables de entorno del
//! servidor y de la API Ophim. La configuración del cache vive en
//! `cache::cache_config`.

pub mod environment;

pub use environment::*;
