use crate::models::User;
use crate::services::auth_service::UserDirectory;

/// Diretório fixo de usuários demo — o stand-in deste domínio para um
/// diretório de usuários real.
pub struct SeedUserDirectory {
    users: Vec<User>,
}

impl SeedUserDirectory {
    pub fn new() -> Self {
        Self {
            users: build_seed_users(),
        }
    }

    /// Directory over custom users, for tests and embedders with their own set.
    pub fn with_users(users: Vec<User>) -> Self {
        Self { users }
    }
}

impl Default for SeedUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserDirectory for SeedUserDirectory {
    async fn find_user(&self, username: &str) -> Option<User> {
        // Exact, case-sensitive match on the login handle
        self.users.iter().find(|u| u.username == username).cloned()
    }
}

fn build_seed_users() -> Vec<User> {
    vec![
        User {
            id: "1".into(),
            username: "demo".into(),
            email: "demo@example.com".into(),
            favorite_countries: vec!["USA".into(), "CAN".into(), "JPN".into()],
        },
        User {
            id: "2".into(),
            username: "test".into(),
            email: "test@example.com".into(),
            favorite_countries: vec!["FRA".into(), "ITA".into(), "ESP".into()],
        },
    ]
}
