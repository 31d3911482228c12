#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

/// Top-level keys the extraction prompt asks the model to produce. The
/// profile stays loosely typed (the model owns the field contents), but this
/// list is the documented contract:
///
/// - `interesses_principais`: string
/// - `objetivos_carreira_inferidos`: string
/// - `soft_skills_identificadas_com_evidencia`: array of `{skill, evidencia}`
/// - `soft_skills_faltantes_para_area`: array of `{skill, evidencia}`
/// - `hard_skills_mencionadas_ou_desejadas`: array of strings
/// - `areas_de_potencial_desenvolvimento_sugeridas`: string
/// - `sugestoes_de_carreira_inicial_exploratoria`: array of strings
/// - `observacoes_gerais_sobre_interacao`: string
///
/// `aspiracoes_declaradas` (object with `empresa_sonhos_mencionada`,
/// `cargo_desejado_mencionado`, `outros_objetivos_claros_mencionados`) is
/// optional by contract and intentionally not listed here.
pub const EXPECTED_PROFILE_KEYS: &[&str] = &[
    "interesses_principais",
    "objetivos_carreira_inferidos",
    "soft_skills_identificadas_com_evidencia",
    "soft_skills_faltantes_para_area",
    "hard_skills_mencionadas_ou_desejadas",
    "areas_de_potencial_desenvolvimento_sugeridas",
    "sugestoes_de_carreira_inicial_exploratoria",
    "observacoes_gerais_sobre_interacao",
];

/// Career profile distilled from a finished conversation: a JSON object with
/// the keys documented on [`EXPECTED_PROFILE_KEYS`]. Created once per session
/// by the extractor and replaced wholesale on re-generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);

impl Profile {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Expected keys the model left out. Surfaced as a warning by the
    /// extractor; an incomplete profile is still a profile.
    pub fn missing_expected_keys(&self) -> Vec<&'static str> {
        EXPECTED_PROFILE_KEYS
            .iter()
            .filter(|key| !self.0.contains_key(**key))
            .copied()
            .collect()
    }
}

/// One persisted profile per session id, replaced on conflict.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub session_id: String,
    pub profile_json: String,
    pub created_at: DateTime<Utc>,
}
