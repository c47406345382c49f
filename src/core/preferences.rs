use crate::domain::model::User;
use crate::domain::ports::PreferenceStore;
use crate::utils::error::Result;

pub const USER_KEY: &str = "campus_p2p_user";
pub const DARK_MODE_KEY: &str = "campus_p2p_dark_mode";

/// The slice of session state that survives a restart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    pub user: Option<User>,
    pub dark_mode: bool,
}

impl Preferences {
    /// Reads both keys. Unreadable or corrupt values fall back to signed-out, light mode.
    pub async fn load<S: PreferenceStore>(store: &S) -> Self {
        let user = match store.load(USER_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Ignoring stored user: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Could not read {}: {}", USER_KEY, e);
                None
            }
        };

        let dark_mode = match store.load(DARK_MODE_KEY).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                tracing::warn!("Could not read {}: {}", DARK_MODE_KEY, e);
                false
            }
        };

        Self { user, dark_mode }
    }

    pub async fn persist<S: PreferenceStore>(&self, store: &S) -> Result<()> {
        match &self.user {
            Some(user) => store.save(USER_KEY, &serde_json::to_string(user)?).await?,
            None => store.remove(USER_KEY).await?,
        }
        store
            .save(DARK_MODE_KEY, if self.dark_mode { "true" } else { "false" })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryPreferences;
    use crate::domain::seed::demo_users;

    #[tokio::test]
    async fn test_empty_store_means_signed_out_light_mode() {
        let store = MemoryPreferences::new();
        assert_eq!(Preferences::load(&store).await, Preferences::default());
    }

    #[tokio::test]
    async fn test_persist_then_load() {
        let store = MemoryPreferences::new();
        let prefs = Preferences {
            user: Some(demo_users()[0].clone()),
            dark_mode: true,
        };
        prefs.persist(&store).await.unwrap();

        assert_eq!(store.get(DARK_MODE_KEY).await.as_deref(), Some("true"));
        assert_eq!(Preferences::load(&store).await, prefs);
    }

    #[tokio::test]
    async fn test_sign_out_removes_user_key() {
        let store = MemoryPreferences::new();
        store.save(USER_KEY, "{}").await.unwrap();

        Preferences::default().persist(&store).await.unwrap();
        assert!(store.get(USER_KEY).await.is_none());
        assert_eq!(store.get(DARK_MODE_KEY).await.as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn test_corrupt_user_is_ignored() {
        let store = MemoryPreferences::new();
        store.save(USER_KEY, "{not json").await.unwrap();
        store.save(DARK_MODE_KEY, "TRUE").await.unwrap();

        let prefs = Preferences::load(&store).await;
        assert!(prefs.user.is_none());
        assert!(!prefs.dark_mode);
    }
}
