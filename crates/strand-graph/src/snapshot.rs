//! Serializable graph state for reuse across processes.
//!
//! A server build rehydrates the graph the client build produced from a
//! snapshot shaped like `{ "modules": [...], "initialVersion": n }`.
//! Reading is lenient: a record that does not decode as a [`Module`]
//! (missing `specifier`, non-numeric `version`, wrong field types) is
//! dropped instead of failing the whole load.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use crate::{Error, Module, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    #[serde(default, deserialize_with = "lenient_modules")]
    pub modules: Vec<Module>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_version: Option<u64>,
}

fn lenient_modules<'de, D>(deserializer: D) -> std::result::Result<Vec<Module>, D::Error>
where
    D: Deserializer<'de>,
{
    let records = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    let total = records.len();
    let modules: Vec<Module> = records
        .into_iter()
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect();
    if modules.len() < total {
        tracing::debug!(
            skipped = total - modules.len(),
            "ignored malformed module records in graph snapshot"
        );
    }
    Ok(modules)
}

impl GraphSnapshot {
    pub fn new(modules: Vec<Module>, initial_version: Option<u64>) -> Self {
        Self {
            modules,
            initial_version,
        }
    }

    /// Parse a JSON snapshot.
    ///
    /// Only a document that is not an object at all (or whose `modules` is
    /// not an array) is an error; bad records inside are skipped.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Render the snapshot as an ES module whose default export is the
    /// snapshot object, the form server entries import.
    pub fn to_js_module(&self) -> Result<String> {
        Ok(format!("export default {}", self.to_json()?))
    }

    pub fn get(&self, specifier: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.specifier == specifier)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl TryFrom<&str> for GraphSnapshot {
    type Error = Error;

    fn try_from(json: &str) -> Result<Self> {
        Self::from_json(json)
    }
}
