use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// REST Countries v3.1 record. List endpoints are queried with a field
// projection, so everything outside the projection must decode via defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Country {
    pub name: CountryName,
    #[serde(default)]
    pub cca2: String,
    pub cca3: String,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub languages: Option<HashMap<String, String>>,
    #[serde(default)]
    pub currencies: Option<HashMap<String, Currency>>,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default)]
    pub borders: Vec<String>,
    #[serde(default)]
    pub tld: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CountryName {
    pub common: String,
    #[serde(default)]
    pub official: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Currency {
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Flags {
    #[serde(default)]
    pub svg: String,
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl Country {
    /// Nomes de exibição dos idiomas do país (vazio quando a API não retorna)
    pub fn language_names(&self) -> Vec<String> {
        self.languages
            .as_ref()
            .map(|langs| langs.values().cloned().collect())
            .unwrap_or_default()
    }
}
