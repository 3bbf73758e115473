use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use super::repository::{CalculationRepository, RepositoryError};

/// Where saved calculations live.
///
/// `backend` selects a registered [`RepositoryFactory`] by name and
/// `connection_string` is handed to it as is.
///
/// | backend  | connection_string examples                |
/// |----------|-------------------------------------------|
/// | `sqlite` | `ngtax.db`, `sqlite:ngtax.db`, `:memory:` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

/// Opens a [`CalculationRepository`] for one storage backend.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Opens the store described by `config`, creating and migrating it
    /// if needed.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn CalculationRepository>, RepositoryError>;
}

/// Backend factories keyed by name. The CLI registers every compiled-in
/// backend at startup and picks one from configuration.
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Adds a factory, replacing any earlier one with the same name.
    pub fn register(&mut self, factory: Box<dyn RepositoryFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens a repository with the factory named by `config.backend`.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::Configuration`] for an unknown backend, otherwise
    /// whatever the factory returns.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn CalculationRepository>, RepositoryError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                RepositoryError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        debug!(backend = %config.backend, "opening calculation store");
        factory.create(config).await
    }
}

impl Default for RepositoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::{CalculationRepository, DbConfig, RepositoryError, RepositoryFactory, RepositoryRegistry};
    use crate::calculations::compute_paye;
    use crate::models::{CalculationKind, NewCalculation, SavedCalculation, TaxInput};

    // ── in-memory repository ─────────────────────────────────────────────
    #[derive(Default)]
    struct MemoryRepository {
        rows: Mutex<Vec<SavedCalculation>>,
    }

    #[async_trait]
    impl CalculationRepository for MemoryRepository {
        async fn save_calculation(
            &self,
            calc: NewCalculation,
        ) -> Result<SavedCalculation, RepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let saved = calc.into_saved(rows.len() as i64 + 1, Utc::now());
            rows.push(saved.clone());
            Ok(saved)
        }

        async fn get_calculation(&self, id: i64) -> Result<SavedCalculation, RepositoryError> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or(RepositoryError::NotFound)
        }

        async fn list_calculations(
            &self,
            owner_id: &str,
            kind: Option<CalculationKind>,
        ) -> Result<Vec<SavedCalculation>, RepositoryError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .rev()
                .filter(|c| c.owner_id == owner_id)
                .filter(|c| kind.is_none_or(|k| c.kind == k))
                .cloned()
                .collect())
        }

        async fn delete_calculation(&self, id: i64) -> Result<(), RepositoryError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|c| c.id != id);
            if rows.len() == before {
                return Err(RepositoryError::NotFound);
            }
            Ok(())
        }
    }

    // ── stub factories ───────────────────────────────────────────────────
    struct MemoryFactory {
        name: &'static str,
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl RepositoryFactory for MemoryFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }

        async fn create(
            &self,
            _config: &DbConfig,
        ) -> Result<Box<dyn CalculationRepository>, RepositoryError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(Box::new(MemoryRepository::default()))
        }
    }

    struct FailingFactory;

    #[async_trait]
    impl RepositoryFactory for FailingFactory {
        fn backend_name(&self) -> &'static str {
            "failing"
        }

        async fn create(
            &self,
            _config: &DbConfig,
        ) -> Result<Box<dyn CalculationRepository>, RepositoryError> {
            Err(RepositoryError::Connection("refused".to_string()))
        }
    }

    fn memory_factory(name: &'static str) -> (Box<dyn RepositoryFactory>, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Box::new(MemoryFactory {
                name,
                called: flag.clone(),
            }),
            flag,
        )
    }

    fn config(backend: &str) -> DbConfig {
        DbConfig {
            backend: backend.to_string(),
            connection_string: ":memory:".to_string(),
        }
    }

    // ── registry ─────────────────────────────────────────────────────────
    #[test]
    fn default_config_is_in_memory_sqlite() {
        assert_eq!(DbConfig::default(), config("sqlite"));
    }

    #[test]
    fn empty_registry_has_no_backends() {
        assert!(RepositoryRegistry::default().available_backends().is_empty());
    }

    #[test]
    fn available_backends_is_sorted_and_deduplicated() {
        let mut reg = RepositoryRegistry::new();
        reg.register(memory_factory("sqlite").0);
        reg.register(memory_factory("memory").0);
        reg.register(memory_factory("sqlite").0);

        assert_eq!(reg.available_backends(), vec!["memory", "sqlite"]);
    }

    #[tokio::test]
    async fn create_dispatches_to_named_factory_only() {
        let mut reg = RepositoryRegistry::new();
        let (sqlite, sqlite_called) = memory_factory("sqlite");
        let (memory, memory_called) = memory_factory("memory");
        reg.register(sqlite);
        reg.register(memory);

        assert!(reg.create(&config("memory")).await.is_ok());
        assert!(memory_called.load(Ordering::SeqCst));
        assert!(!sqlite_called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unknown_backend_error_lists_what_is_available() {
        let mut reg = RepositoryRegistry::new();
        reg.register(memory_factory("sqlite").0);

        match reg.create(&config("postgres")).await {
            Err(RepositoryError::Configuration(msg)) => {
                assert!(msg.contains("postgres"));
                assert!(msg.contains("sqlite"));
            }
            Err(other) => panic!("expected Configuration error, got {other:?}"),
            Ok(_) => panic!("expected Configuration error, got a repository"),
        }
    }

    #[tokio::test]
    async fn create_propagates_factory_error() {
        let mut reg = RepositoryRegistry::new();
        reg.register(Box::new(FailingFactory));

        let err = reg.create(&config("failing")).await.err();

        assert_eq!(err, Some(RepositoryError::Connection("refused".to_string())));
    }

    // ── repository contract ──────────────────────────────────────────────
    #[tokio::test]
    async fn repository_from_registry_round_trips_a_calculation() {
        let mut reg = RepositoryRegistry::new();
        reg.register(memory_factory("memory").0);
        let repo = reg.create(&config("memory")).await.unwrap();

        let input = TaxInput::basic(dec!(400000));
        let result = compute_paye(&input);
        let saved = repo
            .save_calculation(NewCalculation::paye("ada", &input, &result).unwrap())
            .await
            .unwrap();

        let fetched = repo.get_calculation(saved.id).await.unwrap();
        assert_eq!(fetched.paye().unwrap().1, result);
        assert_eq!(repo.list_calculations("ada", Some(CalculationKind::Cit)).await.unwrap().len(), 0);

        repo.delete_calculation(saved.id).await.unwrap();
        assert_eq!(
            repo.delete_calculation(saved.id).await,
            Err(RepositoryError::NotFound)
        );
    }
}
