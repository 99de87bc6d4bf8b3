//! Claves de cache del homepage
//!
//! Cada sección tiene exactamente una clave canónica (`homepage::<nombre>`)
//! y, durante un refresco, una clave de respaldo (`homepage::temp::<nombre>`).

use std::fmt;

use serde::Serialize;

use crate::utils::errors::{AppError, AppResult};

/// Prefijo de todas las claves del homepage
pub const HOMEPAGE_PREFIX: &str = "homepage::";

/// Prefijo de los respaldos temporales
pub const TEMP_PREFIX: &str = "homepage::temp::";

/// Secciones cacheadas independientemente
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Raw,
    Section1,
    Section2,
    Section3,
    Section4,
    Section5,
    Section6,
    Section7,
    Section8,
    Section9,
    Section10,
    Section11,
    Section12,
}

impl SectionKey {
    pub const ALL: [SectionKey; 13] = [
        SectionKey::Raw,
        SectionKey::Section1,
        SectionKey::Section2,
        SectionKey::Section3,
        SectionKey::Section4,
        SectionKey::Section5,
        SectionKey::Section6,
        SectionKey::Section7,
        SectionKey::Section8,
        SectionKey::Section9,
        SectionKey::Section10,
        SectionKey::Section11,
        SectionKey::Section12,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Raw => "raw",
            SectionKey::Section1 => "section1",
            SectionKey::Section2 => "section2",
            SectionKey::Section3 => "section3",
            SectionKey::Section4 => "section4",
            SectionKey::Section5 => "section5",
            SectionKey::Section6 => "section6",
            SectionKey::Section7 => "section7",
            SectionKey::Section8 => "section8",
            SectionKey::Section9 => "section9",
            SectionKey::Section10 => "section10",
            SectionKey::Section11 => "section11",
            SectionKey::Section12 => "section12",
        }
    }

    /// Nombre recibido del admin, insensible a mayúsculas y espacios
    pub fn parse(name: &str) -> AppResult<Self> {
        let normalized = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| AppError::InvalidSection(name.to_string()))
    }

    /// Clave canónica en el cache
    pub fn cache_key(&self) -> String {
        format!("{}{}", HOMEPAGE_PREFIX, self.as_str())
    }

    /// Clave del respaldo temporal
    pub fn temp_key(&self) -> String {
        format!("{}{}", TEMP_PREFIX, self.as_str())
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grupos de refresco: particiones fijas de secciones con su propio horario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshGroup {
    Initial,
    Group1,
    Group2,
}

impl RefreshGroup {
    /// En orden de toma de locks
    pub const ALL: [RefreshGroup; 3] = [RefreshGroup::Initial, RefreshGroup::Group1, RefreshGroup::Group2];

    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshGroup::Initial => "initial",
            RefreshGroup::Group1 => "group1",
            RefreshGroup::Group2 => "group2",
        }
    }

    pub fn parse(name: &str) -> AppResult<Self> {
        let normalized = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == normalized)
            .ok_or_else(|| AppError::InvalidGroup(name.to_string()))
    }

    pub fn index(&self) -> usize {
        match self {
            RefreshGroup::Initial => 0,
            RefreshGroup::Group1 => 1,
            RefreshGroup::Group2 => 2,
        }
    }

    /// Secciones del grupo; `initial` incluye también el feed crudo
    pub fn sections(&self) -> &'static [SectionKey] {
        match self {
            RefreshGroup::Initial => &[
                SectionKey::Raw,
                SectionKey::Section1,
                SectionKey::Section2,
                SectionKey::Section3,
                SectionKey::Section4,
            ],
            RefreshGroup::Group1 => &[
                SectionKey::Section5,
                SectionKey::Section6,
                SectionKey::Section7,
                SectionKey::Section8,
            ],
            RefreshGroup::Group2 => &[
                SectionKey::Section9,
                SectionKey::Section10,
                SectionKey::Section11,
                SectionKey::Section12,
            ],
        }
    }

    pub fn next_group(&self) -> Option<RefreshGroup> {
        match self {
            RefreshGroup::Initial => Some(RefreshGroup::Group1),
            RefreshGroup::Group1 => Some(RefreshGroup::Group2),
            RefreshGroup::Group2 => None,
        }
    }

    pub fn has_more(&self) -> bool {
        self.next_group().is_some()
    }

    /// Grupo dueño de una sección
    pub fn of_section(section: SectionKey) -> RefreshGroup {
        Self::ALL
            .into_iter()
            .find(|group| group.sections().contains(&section))
            .unwrap_or(RefreshGroup::Initial)
    }
}

impl fmt::Display for RefreshGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
