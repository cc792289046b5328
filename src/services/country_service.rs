use lazy_static::lazy_static;
use std::env;
use std::time::Duration;

use crate::models::Country;
use crate::utils::{cache, AppError};

// REST Countries v3.1
const DEFAULT_API_BASE: &str = "https://restcountries.com/v3.1";

// Projeção de campos das listagens (payload menor)
const LIST_FIELDS: &str = "name,cca3,flags,capital,region,languages,population";
const SUGGESTION_FIELDS: &str = "name,cca3,flags";

const ALL_COUNTRIES_CACHE_KEY: &str = "countries:all";
const ALL_COUNTRIES_CACHE_TTL_SECONDS: u64 = 3600; // 1 hora

lazy_static! {
    static ref API_BASE: String = {
        dotenv::dotenv().ok();
        env::var("COUNTRIES_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
    };
}

pub async fn get_all_countries() -> Result<Vec<Country>, AppError> {
    log::info!("🌍 Fetching all countries");

    let url = format!("{}/all?fields={}", *API_BASE, LIST_FIELDS);

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| AppError::FetchFailure(format!("Failed to fetch countries: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::FetchFailure(format!(
            "Countries API error: {}",
            response.status()
        )));
    }

    let countries: Vec<Country> = response
        .json()
        .await
        .map_err(|e| AppError::FetchFailure(format!("Failed to parse countries: {}", e)))?;

    log::info!("✅ Retrieved {} countries", countries.len());

    Ok(countries)
}

/// Lista completa com cache de 1 hora (a lista de países muda raramente)
pub async fn get_all_countries_cached() -> Result<Vec<Country>, AppError> {
    if let Some(raw) = cache::get_cached(ALL_COUNTRIES_CACHE_KEY, ALL_COUNTRIES_CACHE_TTL_SECONDS) {
        if let Ok(countries) = serde_json::from_str::<Vec<Country>>(&raw) {
            return Ok(countries);
        }
    }

    let countries = get_all_countries().await?;

    if let Ok(raw) = serde_json::to_string(&countries) {
        cache::set_cache(ALL_COUNTRIES_CACHE_KEY.to_string(), raw);
    }

    Ok(countries)
}

/// Busca países por nome (match parcial do lado da API)
pub async fn get_countries_by_name(name: &str) -> Result<Vec<Country>, AppError> {
    log::info!("🔍 Searching countries by name: {}", name);

    let url = format!(
        "{}/name/{}?fields={}",
        *API_BASE,
        urlencoding::encode(name),
        LIST_FIELDS
    );

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| AppError::FetchFailure(format!("Failed to fetch country '{}': {}", name, e)))?;

    if !response.status().is_success() {
        return Err(AppError::FetchFailure(format!(
            "Countries API error for name '{}': {}",
            name,
            response.status()
        )));
    }

    let countries: Vec<Country> = response
        .json()
        .await
        .map_err(|e| AppError::FetchFailure(format!("Failed to parse countries: {}", e)))?;

    log::info!("✅ Found {} countries for '{}'", countries.len(), name);

    Ok(countries)
}

pub async fn get_countries_by_region(region: &str) -> Result<Vec<Country>, AppError> {
    log::info!("🌍 Fetching countries in region: {}", region);

    let url = format!(
        "{}/region/{}?fields={}",
        *API_BASE,
        urlencoding::encode(region),
        LIST_FIELDS
    );

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| {
            AppError::FetchFailure(format!("Failed to fetch region '{}': {}", region, e))
        })?;

    if !response.status().is_success() {
        return Err(AppError::FetchFailure(format!(
            "Countries API error for region '{}': {}",
            region,
            response.status()
        )));
    }

    let countries: Vec<Country> = response
        .json()
        .await
        .map_err(|e| AppError::FetchFailure(format!("Failed to parse countries: {}", e)))?;

    log::info!("✅ Retrieved {} countries in {}", countries.len(), region);

    Ok(countries)
}

pub async fn get_countries_by_language(lang: &str) -> Result<Vec<Country>, AppError> {
    log::info!("🗣️ Fetching countries speaking: {}", lang);

    let url = format!(
        "{}/lang/{}?fields={}",
        *API_BASE,
        urlencoding::encode(lang),
        LIST_FIELDS
    );

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| AppError::FetchFailure(format!("Failed to fetch language '{}': {}", lang, e)))?;

    if !response.status().is_success() {
        return Err(AppError::FetchFailure(format!(
            "Countries API error for language '{}': {}",
            lang,
            response.status()
        )));
    }

    let countries: Vec<Country> = response
        .json()
        .await
        .map_err(|e| AppError::FetchFailure(format!("Failed to parse countries: {}", e)))?;

    log::info!("✅ Retrieved {} countries speaking {}", countries.len(), lang);

    Ok(countries)
}

/// Registro completo de um país pelo código alpha-2/alpha-3.
/// A v3.1 responde `/alpha/{code}` com um array de um elemento.
pub async fn get_country_by_code(code: &str) -> Result<Country, AppError> {
    log::info!("🌍 Fetching country by code: {}", code);

    let url = format!("{}/alpha/{}", *API_BASE, urlencoding::encode(code));

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| AppError::FetchFailure(format!("Failed to fetch code '{}': {}", code, e)))?;

    if !response.status().is_success() {
        return Err(AppError::FetchFailure(format!(
            "Countries API error for code '{}': {}",
            code,
            response.status()
        )));
    }

    let mut countries: Vec<Country> = response
        .json()
        .await
        .map_err(|e| AppError::FetchFailure(format!("Failed to parse country: {}", e)))?;

    if countries.is_empty() {
        return Err(AppError::NotFound(format!("country with code: {}", code)));
    }

    log::info!("✅ Retrieved country {}", code);

    Ok(countries.remove(0))
}

/// Sugestões de autocomplete. Consultas com menos de 2 caracteres não fazem
/// requisição; qualquer falha degrada para lista vazia.
pub async fn get_country_suggestions(query: &str) -> Vec<Country> {
    if query.chars().count() < 2 {
        return Vec::new();
    }

    let url = format!(
        "{}/name/{}?fields={}",
        *API_BASE,
        urlencoding::encode(query),
        SUGGESTION_FIELDS
    );

    let client = reqwest::Client::new();
    let response = match client
        .get(&url)
        .header("Accept", "application/json")
        .timeout(Duration::from_secs(10))
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            log::debug!("Suggestion fetch failed for '{}': {}", query, e);
            return Vec::new();
        }
    };

    if !response.status().is_success() {
        return Vec::new();
    }

    response.json().await.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_short_query_returns_no_suggestions() {
        assert!(get_country_suggestions("").await.is_empty());
        assert!(get_country_suggestions("a").await.is_empty());
    }

    // Live API tests — run with `cargo test -- --ignored` when online

    #[tokio::test]
    #[ignore]
    async fn test_get_all_countries_live() {
        let countries = get_all_countries().await.unwrap();
        assert!(countries.len() > 190);
        assert!(countries.iter().any(|c| c.cca3 == "BRA"));
    }

    #[tokio::test]
    #[ignore]
    async fn test_get_country_by_code_live() {
        let country = get_country_by_code("JPN").await.unwrap();
        assert_eq!(country.name.common, "Japan");
        assert!(country.capital.contains(&"Tokyo".to_string()));
    }
}
