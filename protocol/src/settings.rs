use serde::Deserialize;
use serde::Serialize;

/// Backend paths and language the document service was started with.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(rename = "kerag_home", default)]
    pub home: String,
    #[serde(rename = "kerag_local", default)]
    pub local: String,
    #[serde(rename = "kerag_lang", default)]
    pub lang: String,
}
