//! Modelos del homepage
//!
//! Estructuras que se guardan en cache por sección y las respuestas
//! agrupadas/completas que se devuelven al frontend.

use serde::{Deserialize, Serialize};

use super::ophim::{OphimHomepageResponse, OphimMovieItem};

/// Película lista para el homepage: item de Ophim + contenido e imágenes optimizadas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieItem {
    #[serde(flatten)]
    pub base: OphimMovieItem,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "optimizedThumb", default)]
    pub optimized_thumb: Option<String>,
    #[serde(rename = "optimizedPoster", default)]
    pub optimized_poster: Option<String>,
}

impl MovieItem {
    pub fn from_item(base: OphimMovieItem) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }

    pub fn slug(&self) -> &str {
        &self.base.slug
    }
}

/// Sección 2: tres listas por país
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section2Data {
    #[serde(rename = "ListKorea")]
    pub list_korea: Vec<MovieItem>,
    #[serde(rename = "ListChina")]
    pub list_china: Vec<MovieItem>,
    #[serde(rename = "ListUSAndUK")]
    pub list_us_and_uk: Vec<MovieItem>,
}

/// Respuesta de `/homepage/{group}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomepageGroupResponse {
    pub message: String,
    pub cached_at: i64,
    pub group: String,
    pub has_more: bool,
    pub next_group: Option<String>,
    /// Sólo en el grupo `initial`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub seo_on_page: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section1: Option<Vec<MovieItem>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section2: Option<Section2Data>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section3: Option<Vec<MovieItem>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section4: Option<Vec<MovieItem>>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section5: Option<Vec<MovieItem>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section6: Option<Vec<MovieItem>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section7: Option<Vec<MovieItem>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section8: Option<Vec<MovieItem>>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section9: Option<Vec<MovieItem>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section10: Option<Vec<MovieItem>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section11: Option<Vec<MovieItem>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub section12: Option<Vec<MovieItem>>,
}

/// Respuesta de `/fullHomepage` (las 12 secciones + feed crudo)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomepageResponse {
    pub message: String,
    pub cached_at: i64,
    pub raw_data: OphimHomepageResponse,
    #[serde(default)]
    pub seo_on_page: serde_json::Value,
    pub section1: Vec<MovieItem>,
    pub section2: Section2Data,
    pub section3: Vec<MovieItem>,
    pub section4: Vec<MovieItem>,
    pub section5: Vec<MovieItem>,
    pub section6: Vec<MovieItem>,
    pub section7: Vec<MovieItem>,
    pub section8: Vec<MovieItem>,
    pub section9: Vec<MovieItem>,
    pub section10: Vec<MovieItem>,
    pub section11: Vec<MovieItem>,
    pub section12: Vec<MovieItem>,
}
