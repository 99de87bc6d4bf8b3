//! Clientes HTTP de APIs externas
//!
//! Por ahora sólo el catálogo de Ophim.

pub mod ophim_client;

// Re-exports de los tipos principales
pub use ophim_client::{CatalogApi, ListQuery, OphimClient};
