// Cache de respostas de API (em memória, TTL por leitura)
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

struct CachedEntry {
    value: String,
    stored_at: Instant,
}

lazy_static::lazy_static! {
    static ref CACHE: RwLock<HashMap<String, CachedEntry>> = RwLock::new(HashMap::new());
}

pub fn get_cached(key: &str, ttl_seconds: u64) -> Option<String> {
    let cache = CACHE.read().ok()?;
    let entry = cache.get(key)?;
    let age = entry.stored_at.elapsed().as_secs();
    if age < ttl_seconds {
        log::debug!("📦 Cache hit for {} (age: {}s)", key, age);
        Some(entry.value.clone())
    } else {
        None
    }
}

pub fn set_cache(key: String, value: String) {
    if let Ok(mut cache) = CACHE.write() {
        log::debug!("💾 Cached {} ({} bytes)", key, value.len());
        cache.insert(key, CachedEntry {
            value,
            stored_at: Instant::now(),
        });
    }
}
