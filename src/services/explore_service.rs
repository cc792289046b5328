use std::collections::BTreeSet;

use crate::models::Country;
use crate::services::country_service;
use crate::utils::AppError;

/// Pipeline de filtros da exploração: termo de busca > região > idioma.
/// Um idioma combinado com busca ou região vira filtro local sobre o
/// resultado remoto.
pub async fn explore_countries(
    search: Option<&str>,
    region: Option<&str>,
    language: Option<&str>,
) -> Result<Vec<Country>, AppError> {
    let search = search.map(str::trim).filter(|s| !s.is_empty());
    let region = region.map(str::trim).filter(|s| !s.is_empty());
    let language = language.map(str::trim).filter(|s| !s.is_empty());

    let countries = if let Some(term) = search {
        country_service::get_countries_by_name(term).await?
    } else if let Some(region) = region {
        country_service::get_countries_by_region(region).await?
    } else if let Some(language) = language {
        return country_service::get_countries_by_language(language).await;
    } else {
        return country_service::get_all_countries_cached().await;
    };

    Ok(match language {
        Some(language) => filter_by_language(&countries, language),
        None => countries,
    })
}

/// Filtro local: mantém países cujo nome de idioma contém o termo
/// (case-insensitive), como a busca combinada da página Explore.
pub fn filter_by_language(countries: &[Country], language: &str) -> Vec<Country> {
    let needle = language.to_lowercase();
    countries
        .iter()
        .filter(|country| {
            country
                .language_names()
                .iter()
                .any(|name| name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Idiomas únicos, ordenados, para o dropdown de filtro
pub fn available_languages(countries: &[Country]) -> Vec<String> {
    let languages: BTreeSet<String> = countries
        .iter()
        .flat_map(|c| c.language_names())
        .collect();
    languages.into_iter().collect()
}
