use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub name: String,
    #[serde(rename = "loaded", default)]
    pub is_loaded: bool,
    #[serde(default)]
    pub file_count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleListing {
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
    #[serde(default)]
    pub available_modules: Vec<String>,
    #[serde(default)]
    pub loaded_modules: Vec<String>,
}
