//! Modelos de la API Ophim
//!
//! Estructuras que mapean exactamente las respuestas JSON del catálogo
//! remoto (home, danh-sach, phim).

use serde::{Deserialize, Serialize};

/// Respuesta del endpoint `/home`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OphimHomepageResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: FeedData,
}

/// Respuesta del endpoint `/danh-sach/{slug}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OphimListResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: FeedData,
}

/// Bloque `data` compartido por home y listas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedData {
    #[serde(default)]
    pub items: Vec<OphimMovieItem>,
    #[serde(rename = "seoOnPage", default, skip_serializing_if = "Option::is_none")]
    pub seo_on_page: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

/// Respuesta del endpoint `/phim/{slug}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OphimMovieDetailResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: MovieDetailData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetailData {
    pub item: OphimMovieDetail,
}

/// Película con contenido largo y episodios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OphimMovieDetail {
    #[serde(flatten)]
    pub base: OphimMovieItem,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub is_ai: Option<bool>,
    #[serde(default)]
    pub server_data: Vec<EpisodeData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub link_embed: Option<String>,
    #[serde(default)]
    pub link_m3u8: Option<String>,
}

/// Película tal como aparece en home y listas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OphimMovieItem {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub slug: String,
    pub origin_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub thumb_url: Option<String>,
    pub poster_url: Option<String>,
    pub is_copyright: Option<bool>,
    pub trailer_url: Option<String>,
    pub time: Option<String>,
    pub episode_current: Option<String>,
    pub episode_total: Option<String>,
    pub quality: Option<String>,
    pub lang: Option<String>,
    pub year: Option<i32>,
    pub actor: Option<Vec<String>>,
    pub director: Option<Vec<String>>,
    pub tmdb: Option<Tmdb>,
    pub imdb: Option<Imdb>,
    pub modified: Option<Modified>,
    pub category: Option<Vec<Taxonomy>>,
    pub country: Option<Vec<Taxonomy>>,
    pub alternative_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tmdb {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub id: Option<String>,
    pub season: Option<i32>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Imdb {
    pub id: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modified {
    pub time: Option<String>,
}

/// Categoría o país (misma forma en la API)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    pub id: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
}
