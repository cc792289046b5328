use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::database::{KeyValueStore, AUTH_TOKEN_KEY, USER_KEY};
use crate::models::User;
use crate::utils::AppError;

// The only credential this demo domain accepts
const DEMO_PASSWORD: &str = "password";

// Latências simuladas para dar forma de chamada remota às operações
const LOGIN_DELAY_MS: u64 = 500;
const FAVORITE_DELAY_MS: u64 = 300;

/// Lookup port over the user directory. Production wires the seed directory
/// (`crate::seeds::SeedUserDirectory`); tests may substitute their own.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, username: &str) -> Option<User>;
}

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

/// Sessão e favoritos do usuário logado, com persistência em um
/// key-value store durável.
///
/// One instance per process, owned by the composition root and shared by
/// reference. All session transitions go through `login`, `init_auth` and
/// `logout`, which keep token and user set or cleared together; the favorite
/// mutations are the single choke point enforcing "must be authenticated"
/// and "no duplicate codes".
pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
    login_delay: Duration,
    favorite_delay: Duration,
}

impl AuthService {
    pub fn new(directory: Arc<dyn UserDirectory>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_delays(
            directory,
            store,
            Duration::from_millis(LOGIN_DELAY_MS),
            Duration::from_millis(FAVORITE_DELAY_MS),
        )
    }

    /// The delays are injection points: tests pass `Duration::ZERO`.
    pub fn with_delays(
        directory: Arc<dyn UserDirectory>,
        store: Arc<dyn KeyValueStore>,
        login_delay: Duration,
        favorite_delay: Duration,
    ) -> Self {
        Self {
            directory,
            store,
            state: RwLock::new(SessionState::default()),
            login_delay,
            favorite_delay,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().unwrap().token.is_some()
    }

    /// Login com as credenciais demo. Qualquer senha diferente de
    /// `"password"` ou usuário fora do diretório rejeita com
    /// `InvalidCredentials`, sem tocar no estado.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AppError> {
        // Remote-call shape: the delay happens before any lookup or mutation
        tokio::time::sleep(self.login_delay).await;

        match self.directory.find_user(username).await {
            Some(user) if password == DEMO_PASSWORD => {
                let token = format!(
                    "mock-token-{}-{}",
                    user.id,
                    chrono::Utc::now().timestamp_millis()
                );

                let mut state = self.state.write().unwrap();
                state.token = Some(token.clone());
                state.user = Some(user.clone());
                self.store.set(AUTH_TOKEN_KEY, &token);
                self.persist_user(&user);

                log::info!("✅ User logged in: {}", user.username);
                Ok(user)
            }
            _ => {
                log::warn!("⚠️  Login failed for '{}'", username);
                Err(AppError::InvalidCredentials)
            }
        }
    }

    /// Idempotent: calling while already logged out is a no-op.
    pub fn logout(&self) {
        let mut state = self.state.write().unwrap();
        state.token = None;
        state.user = None;
        self.store.remove(AUTH_TOKEN_KEY);
        self.store.remove(USER_KEY);
    }

    /// In-memory user if set, otherwise a one-shot rehydration of the stored
    /// record (cached on read, never overwriting a live session). A record
    /// that fails to parse reads as absent.
    pub fn get_current_user(&self) -> Option<User> {
        if let Some(user) = self.state.read().unwrap().user.clone() {
            return Some(user);
        }

        let user = match self.read_stored_user() {
            Ok(user) => user?,
            Err(e) => {
                log::warn!("⚠️  Ignoring stored user record: {}", e);
                return None;
            }
        };

        let mut state = self.state.write().unwrap();
        // A login that raced this read wins
        let cached = state.user.get_or_insert(user);
        Some(cached.clone())
    }

    /// Restauração de sessão no início do processo. Só popula a sessão quando
    /// token E usuário estão presentes no store — um par pela metade é
    /// ignorado, nunca restaurado.
    pub fn init_auth(&self) {
        let stored_token = self.store.get(AUTH_TOKEN_KEY);
        let stored_user = match self.read_stored_user() {
            Ok(user) => user,
            Err(e) => {
                log::warn!("⚠️  Ignoring stored session: {}", e);
                None
            }
        };

        if let (Some(token), Some(user)) = (stored_token, stored_user) {
            log::info!("🔑 Session restored for {}", user.username);
            let mut state = self.state.write().unwrap();
            state.token = Some(token);
            state.user = Some(user);
        }
    }

    /// Adiciona um código de país aos favoritos do usuário logado.
    /// Duplicatas são no-ops que ainda resolvem com o usuário atual.
    pub async fn add_favorite_country(&self, code: &str) -> Result<User, AppError> {
        // Fail fast, before the simulated round-trip and before any I/O
        self.require_session()?;

        tokio::time::sleep(self.favorite_delay).await;

        let mut state = self.state.write().unwrap();
        let user = state.user.as_mut().ok_or(AppError::NotAuthenticated)?;
        if !user.favorite_countries.iter().any(|c| c == code) {
            user.favorite_countries.push(code.to_string());
            let snapshot = user.clone();
            self.persist_user(&snapshot);
            log::info!("⭐ Added favorite {} for {}", code, snapshot.username);
            return Ok(snapshot);
        }
        Ok(user.clone())
    }

    /// Remove todas as ocorrências do código dos favoritos. Código ausente é
    /// um no-op, não um erro.
    pub async fn remove_favorite_country(&self, code: &str) -> Result<User, AppError> {
        self.require_session()?;

        tokio::time::sleep(self.favorite_delay).await;

        let mut state = self.state.write().unwrap();
        let user = state.user.as_mut().ok_or(AppError::NotAuthenticated)?;
        user.favorite_countries.retain(|c| c != code);
        let snapshot = user.clone();
        self.persist_user(&snapshot);
        log::info!("💫 Removed favorite {} for {}", code, snapshot.username);
        Ok(snapshot)
    }

    fn require_session(&self) -> Result<(), AppError> {
        let state = self.state.read().unwrap();
        if state.token.is_some() && state.user.is_some() {
            Ok(())
        } else {
            Err(AppError::NotAuthenticated)
        }
    }

    fn read_stored_user(&self) -> Result<Option<User>, AppError> {
        match self.store.get(USER_KEY) {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| AppError::MalformedStoredState(e.to_string())),
            None => Ok(None),
        }
    }

    fn persist_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.store.set(USER_KEY, &json),
            Err(e) => log::warn!("⚠️  Could not serialize user record: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::seeds::SeedUserDirectory;

    fn service_with_store(store: Arc<MemoryStore>) -> AuthService {
        let _ = env_logger::builder().is_test(true).try_init();
        AuthService::with_delays(
            Arc::new(SeedUserDirectory::new()),
            store,
            Duration::ZERO,
            Duration::ZERO,
        )
    }

    fn service() -> AuthService {
        service_with_store(Arc::new(MemoryStore::new()))
    }

    fn sorted(mut codes: Vec<String>) -> Vec<String> {
        codes.sort();
        codes
    }

    #[tokio::test]
    async fn test_login_resolves_seeded_favorites() {
        let store = Arc::new(MemoryStore::new());
        let auth = service_with_store(store.clone());

        let user = auth.login("demo", "password").await.unwrap();
        assert_eq!(user.favorite_countries, vec!["USA", "CAN", "JPN"]);
        assert!(auth.is_authenticated());

        let token = store.get(AUTH_TOKEN_KEY).unwrap();
        assert!(token.starts_with("mock-token-1-"));
        assert!(store.get(USER_KEY).unwrap().contains("\"favoriteCountries\""));
    }

    #[tokio::test]
    async fn test_login_wrong_password_rejects() {
        let store = Arc::new(MemoryStore::new());
        let auth = service_with_store(store.clone());

        let err = auth.login("demo", "hunter2").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert!(!auth.is_authenticated());
        assert!(store.get(AUTH_TOKEN_KEY).is_none());
        assert!(store.get(USER_KEY).is_none());
    }

    #[tokio::test]
    async fn test_login_unknown_user_rejects() {
        let auth = service();
        let err = auth.login("nobody", "password").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_existing_session() {
        let auth = service();
        auth.login("demo", "password").await.unwrap();

        let err = auth.login("demo", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert!(auth.is_authenticated());
        assert_eq!(auth.get_current_user().unwrap().username, "demo");
    }

    #[tokio::test]
    async fn test_add_favorite_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let auth = service_with_store(store.clone());
        auth.login("demo", "password").await.unwrap();

        auth.add_favorite_country("FRA").await.unwrap();
        let user = auth.add_favorite_country("FRA").await.unwrap();

        let count = user.favorite_countries.iter().filter(|c| *c == "FRA").count();
        assert_eq!(count, 1);

        let persisted: User = serde_json::from_str(&store.get(USER_KEY).unwrap()).unwrap();
        assert_eq!(
            persisted.favorite_countries.iter().filter(|c| *c == "FRA").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_add_then_remove_restores_prior_set() {
        let auth = service();
        let before = auth.login("demo", "password").await.unwrap().favorite_countries;

        auth.add_favorite_country("GBR").await.unwrap();
        let after = auth.remove_favorite_country("GBR").await.unwrap().favorite_countries;

        assert_eq!(sorted(after), sorted(before));
    }

    #[tokio::test]
    async fn test_remove_absent_code_is_noop() {
        let auth = service();
        let before = auth.login("demo", "password").await.unwrap().favorite_countries;

        let after = auth.remove_favorite_country("ZZZ").await.unwrap().favorite_countries;
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_mutations_require_session() {
        let store = Arc::new(MemoryStore::new());
        let auth = service_with_store(store.clone());

        let err = auth.add_favorite_country("FRA").await.unwrap_err();
        assert!(matches!(err, AppError::NotAuthenticated));
        let err = auth.remove_favorite_country("FRA").await.unwrap_err();
        assert!(matches!(err, AppError::NotAuthenticated));

        // Nothing reached the durable store
        assert!(store.get(AUTH_TOKEN_KEY).is_none());
        assert!(store.get(USER_KEY).is_none());
    }

    #[tokio::test]
    async fn test_rehydration_round_trip() {
        let store = Arc::new(MemoryStore::new());

        let first = service_with_store(store.clone());
        let logged_in = first.login("test", "password").await.unwrap();

        // Fresh service over the same store simulates a process restart
        let second = service_with_store(store);
        assert!(!second.is_authenticated());

        second.init_auth();
        assert!(second.is_authenticated());
        assert_eq!(second.get_current_user().unwrap(), logged_in);
    }

    #[tokio::test]
    async fn test_init_auth_ignores_half_present_pair() {
        let store = Arc::new(MemoryStore::new());
        store.set(AUTH_TOKEN_KEY, "mock-token-1-1700000000000");

        let auth = service_with_store(store);
        auth.init_auth();
        assert!(!auth.is_authenticated());

        let store = Arc::new(MemoryStore::new());
        store.set(USER_KEY, r#"{"id":"1","username":"demo","email":"demo@example.com","favoriteCountries":[]}"#);

        let auth = service_with_store(store);
        auth.init_auth();
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_init_auth_malformed_user_fails_closed() {
        let store = Arc::new(MemoryStore::new());
        store.set(AUTH_TOKEN_KEY, "mock-token-1-1700000000000");
        store.set(USER_KEY, "{not json");

        let auth = service_with_store(store);
        auth.init_auth();
        assert!(!auth.is_authenticated());
        assert!(auth.get_current_user().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_store() {
        let store = Arc::new(MemoryStore::new());
        let auth = service_with_store(store.clone());
        auth.login("demo", "password").await.unwrap();

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(auth.get_current_user().is_none());
        assert!(store.get(AUTH_TOKEN_KEY).is_none());
        assert!(store.get(USER_KEY).is_none());

        // Idempotent when already logged out
        auth.logout();
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_get_current_user_rehydrates_stored_record() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_KEY, r#"{"id":"2","username":"test","email":"test@example.com","favoriteCountries":["FRA"]}"#);

        let auth = service_with_store(store);
        let user = auth.get_current_user().unwrap();
        assert_eq!(user.username, "test");
        assert_eq!(user.favorite_countries, vec!["FRA"]);
        // A lone user record never counts as an authenticated session
        assert!(!auth.is_authenticated());
        assert!(matches!(
            auth.add_favorite_country("ITA").await.unwrap_err(),
            AppError::NotAuthenticated
        ));
    }

    #[tokio::test]
    async fn test_get_current_user_never_overwrites_live_session() {
        let store = Arc::new(MemoryStore::new());
        let auth = service_with_store(store.clone());
        auth.login("demo", "password").await.unwrap();

        // A stale record written behind the service's back must not win
        store.set(USER_KEY, r#"{"id":"2","username":"test","email":"test@example.com","favoriteCountries":[]}"#);
        assert_eq!(auth.get_current_user().unwrap().username, "demo");
    }
}
