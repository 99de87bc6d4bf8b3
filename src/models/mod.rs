//! Modelos del sistema
//!
//! Este módulo contiene los modelos de la API Ophim y las respuestas
//! del homepage que se guardan en cache.

pub mod homepage;
pub mod ophim;

pub use homepage::{HomepageGroupResponse, HomepageResponse, MovieItem, Section2Data};
pub use ophim::{
    OphimHomepageResponse, OphimListResponse, OphimMovieDetail, OphimMovieDetailResponse,
    OphimMovieItem,
};
