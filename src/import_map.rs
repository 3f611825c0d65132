//! about import-map.json

use std::{
    fs::{read_to_string, File},
    io::Write,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ImtError;


/// File names probed by [`ImportMap::load`], in order.
pub const CANDIDATES: [&str; 4] = [
    "import-map.json",
    "importMap.json",
    "importmap.json",
    "import_map.json",
];

pub type Specifiers = IndexMap<String, String>;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ImportMap {
    #[serde(default, deserialize_with = "nullable")]
    pub(crate) imports: Specifiers,

    #[serde(default, deserialize_with = "nullable")]
    pub(crate) scopes: IndexMap<String, Specifiers>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ImportMap {
    pub fn new() -> ImportMap {
        Self::default()
    }

    /// Loads the first candidate file in `dir` that parses as an import map.
    pub fn load(dir: &Path) -> Result<ImportMap, ImtError> {
        Self::locate(dir).map(|(_, map)| map)
    }

    /// Like [`ImportMap::load`], also returning the file the map came from.
    pub fn locate(dir: &Path) -> Result<(PathBuf, ImportMap), ImtError> {
        for name in CANDIDATES {
            let path = dir.join(name);
            match Self::from_file(&path) {
                Ok(map) => {
                    log::debug!("loaded import map from {}", path.display());
                    return Ok((path, map));
                }
                Err(e) => log::debug!("skipping {}: {}", path.display(), e),
            }
        }

        Err(ImtError::NotFoundImportMap(
            CANDIDATES.iter().map(|s| s.to_string()).collect(),
        ))
    }

    pub fn from_file(path: &Path) -> Result<ImportMap, ImtError> {
        Self::from_json(&read_to_string(path)?)
    }

    pub fn from_json(text: &str) -> Result<ImportMap, ImtError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn get(&self, specifier: &str) -> Result<&str, ImtError> {
        match self.imports.get(specifier) {
            Some(target) if !target.is_empty() => Ok(target),
            _ => Err(ImtError::NotFoundSpecifier(specifier.to_owned())),
        }
    }

    pub fn has(&self, specifier: &str) -> bool {
        self.get(specifier).is_ok()
    }

    pub fn add(&mut self, specifier: &str, target: &str) {
        self.imports
            .insert(specifier.to_owned(), target.to_owned());
    }

    pub fn remove(&mut self, specifier: &str) {
        self.imports.shift_remove(specifier);
    }

    pub fn imports(&self) -> impl Iterator<Item = (&str, &str)> {
        self.imports.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn scopes(&self) -> &IndexMap<String, Specifiers> {
        &self.scopes
    }

    /// Pretty JSON object with both `imports` and `scopes` keys.
    pub fn to_json(&self) -> Result<String, ImtError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ImtError> {
        let mut f = File::create(path).map_err(|e| ImtError::fs(path, e))?;
        f.write_all(self.to_json()?.as_bytes())
            .map_err(|e| ImtError::fs(path, e))?;

        Ok(())
    }
}
