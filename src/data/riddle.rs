//! Riddles and the riddle catalog
//!
//! The catalog is the ordered list of stages a player walks through. It is
//! built once at startup and never changes during a session.

use crate::VendetaError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// One stage of the hunt: a clue and the QR payload that solves it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Riddle {
    pub clue: String,
    pub answer: String,
}

impl Riddle {
    pub fn new(clue: &str, answer: &str) -> Self {
        Self {
            clue: clue.to_string(),
            answer: answer.to_string(),
        }
    }

    /// Exact, case-sensitive comparison against a scanned payload
    pub fn is_solved_by(&self, payload: &str) -> bool {
        self.answer == payload
    }
}

/// On-disk layout of a catalog file
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "riddle")]
    riddles: Vec<Riddle>,
}

/// Ordered, non-empty, read-only list of riddles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiddleCatalog {
    riddles: Vec<Riddle>,
}

impl RiddleCatalog {
    /// Build a catalog, rejecting empty catalogs, blank fields and repeated answers
    pub fn new(riddles: Vec<Riddle>) -> Result<Self, VendetaError> {
        validate(&riddles)?;
        Ok(Self { riddles })
    }

    /// The campus hunt the game ships with
    pub fn builtin() -> Self {
        Self {
            riddles: vec![
                Riddle::new(
                    "Me abres todos los días pero no soy una puerta. Tengo hojas pero no soy un árbol. ¿Dónde estoy?",
                    "BIBLIOTECA_NIVEL_1",
                ),
                Riddle::new(
                    "El lugar donde el conocimiento se sirve caliente y el sueño se combate a sorbos.",
                    "CAFETERIA_NIVEL_2",
                ),
                Riddle::new(
                    "Aquí es donde las ideas cobran vida en pantallas y teclados. Es el corazón digital de la escuela.",
                    "LABORATORIO_NIVEL_3",
                ),
                Riddle::new(
                    "Donde las voces se elevan sin gritar y las emociones se representan sin palabras. ¿Dónde estoy?",
                    "AUDITORIO_NIVEL_4",
                ),
                Riddle::new(
                    "Aquí se cultiva el cuerpo con esfuerzo y disciplina. El sudor es parte del aprendizaje.",
                    "CANCHAS_NIVEL_5",
                ),
            ],
        }
    }

    /// Plain scanner mode: a single stage solved by one payload
    pub fn single(answer: &str) -> Result<Self, VendetaError> {
        Self::new(vec![Riddle::new("Scan the code to finish.", answer)])
    }

    /// Parse a catalog from TOML (`[[riddle]]` tables with `clue` and `answer`)
    pub fn from_toml_str(contents: &str) -> Result<Self, VendetaError> {
        let file: CatalogFile = toml::from_str(contents)
            .map_err(|e| VendetaError::InvalidCatalog(e.to_string()))?;
        Self::new(file.riddles)
    }

    /// Load a catalog file from disk
    pub fn load(path: &Path) -> Result<Self, VendetaError> {
        debug!(path = %path.display(), "Loading riddle catalog");
        let contents = fs::read_to_string(path).map_err(|e| {
            VendetaError::InvalidCatalog(format!("cannot read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), riddles = catalog.len(), "Riddle catalog loaded");
        Ok(catalog)
    }

    /// The riddle at `index`.
    ///
    /// Indices come from the game state, which keeps them in range.
    pub fn get(&self, index: usize) -> &Riddle {
        &self.riddles[index]
    }

    pub fn len(&self) -> usize {
        self.riddles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.riddles.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.riddles.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &Riddle> {
        self.riddles.iter()
    }
}

fn validate(riddles: &[Riddle]) -> Result<(), VendetaError> {
    if riddles.is_empty() {
        return Err(VendetaError::InvalidCatalog(
            "catalog must contain at least one riddle".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for (index, riddle) in riddles.iter().enumerate() {
        if riddle.clue.trim().is_empty() {
            return Err(VendetaError::InvalidCatalog(format!(
                "riddle {} has an empty clue",
                index + 1
            )));
        }
        if riddle.answer.is_empty() {
            return Err(VendetaError::InvalidCatalog(format!(
                "riddle {} has an empty answer",
                index + 1
            )));
        }
        if !seen.insert(riddle.answer.as_str()) {
            return Err(VendetaError::InvalidCatalog(format!(
                "answer {:?} is used by more than one riddle",
                riddle.answer
            )));
        }
    }
    Ok(())
}

impl Default for RiddleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
