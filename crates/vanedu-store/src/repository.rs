//! Record collections behind an async, object-safe interface

use async_trait::async_trait;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use vanedu_core::types::Identifiable;
use vanedu_core::{Error, ListQuery, Page, Result, Searchable};

/// Bounds shared by every stored record type
pub trait Record: Identifiable + Searchable + Clone + fmt::Debug + Send + Sync + 'static {}

impl<T> Record for T where T: Identifiable + Searchable + Clone + fmt::Debug + Send + Sync + 'static
{}

/// A collection of records keyed by string id
///
/// Handlers hold `Arc<dyn Repository<T>>`, so a persistent backend can
/// replace [`InMemoryRepository`] without touching them.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync + fmt::Debug {
    /// Search, filter and paginate the collection in insertion order
    async fn list(&self, query: &ListQuery) -> Result<Page<T>>;

    /// Every record in insertion order
    async fn all(&self) -> Result<Vec<T>>;

    /// Look up a record by id
    async fn get(&self, id: &str) -> Result<Option<T>>;

    /// Append a record under a freshly assigned id and return it
    async fn create(&self, record: T) -> Result<T>;

    /// Replace the record stored under `id`; the stored id is always `id`
    async fn replace(&self, id: &str, record: T) -> Result<T>;

    /// Remove and return the record stored under `id`
    async fn delete(&self, id: &str) -> Result<T>;

    /// Number of records
    async fn count(&self) -> Result<usize>;
}

/// Process-local repository, reset on restart
///
/// Ids come from a monotonic counter and are never handed out twice, even
/// after the record holding one is deleted.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    records: RwLock<Vec<T>>,
    next_id: AtomicU64,
}

impl<T: Record> InMemoryRepository<T> {
    /// Empty repository; the first id is `"1"`
    #[must_use]
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Repository preloaded with records, ids continue after the highest
    /// numeric id present
    #[must_use]
    pub fn with_records(records: Vec<T>) -> Self {
        let highest = records
            .iter()
            .filter_map(|record| record.id().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let next_id = highest.max(records.len() as u64).saturating_add(1);

        Self {
            records: RwLock::new(records),
            next_id: AtomicU64::new(next_id),
        }
    }

    fn allocate_id(&self, records: &[T]) -> String {
        loop {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
            if !records.iter().any(|record| record.id() == id) {
                return id;
            }
        }
    }

    fn position(records: &[T], id: &str) -> Result<usize> {
        records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| Error::not_found(T::KIND, id))
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> Repository<T> for InMemoryRepository<T> {
    async fn list(&self, query: &ListQuery) -> Result<Page<T>> {
        Ok(query.apply(self.records.read().iter()))
    }

    async fn all(&self) -> Result<Vec<T>> {
        Ok(self.records.read().clone())
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        Ok(self
            .records
            .read()
            .iter()
            .find(|record| record.id() == id)
            .cloned())
    }

    async fn create(&self, mut record: T) -> Result<T> {
        let mut records = self.records.write();
        let id = self.allocate_id(&records);
        record.set_id(id);
        records.push(record.clone());

        debug!(kind = T::KIND, id = record.id(), "Record created");
        Ok(record)
    }

    async fn replace(&self, id: &str, mut record: T) -> Result<T> {
        let mut records = self.records.write();
        let index = Self::position(&records, id)?;
        record.set_id(id.to_string());

        if let Some(slot) = records.get_mut(index) {
            *slot = record.clone();
        }

        debug!(kind = T::KIND, id, "Record replaced");
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<T> {
        let mut records = self.records.write();
        let index = Self::position(&records, id)?;
        let removed = records.remove(index);

        debug!(kind = T::KIND, id, "Record deleted");
        Ok(removed)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Note {
        id: String,
        title: String,
        tag: String,
    }

    impl Identifiable for Note {
        const KIND: &'static str = "Note";

        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }
    }

    impl Searchable for Note {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.title.as_str()]
        }

        fn filter_value(&self, field: &str) -> Option<&str> {
            (field == "tag").then_some(self.tag.as_str())
        }
    }

    fn note(id: &str, title: &str, tag: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            tag: tag.to_string(),
        }
    }

    fn seeded() -> InMemoryRepository<Note> {
        InMemoryRepository::with_records(vec![
            note("1", "Groceries", "home"),
            note("2", "Standup notes", "work"),
            note("3", "Garden plan", "home"),
        ])
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let repo = seeded();
        let created = repo.create(note("ignored", "Taxes", "home")).await.unwrap();

        assert_eq!(created.id, "4");
        assert_eq!(repo.count().await.unwrap(), 4);
        assert_eq!(repo.all().await.unwrap().last().unwrap(), &created);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = seeded();
        let removed = repo.delete("3").await.unwrap();
        assert_eq!(removed.title, "Garden plan");

        let created = repo.create(note("", "Replacement", "home")).await.unwrap();
        assert_eq!(created.id, "4");
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_empty_repository_starts_at_one() {
        let repo = InMemoryRepository::<Note>::default();
        let first = repo.create(note("", "First", "x")).await.unwrap();
        let second = repo.create(note("", "Second", "x")).await.unwrap();

        assert_eq!(first.id, "1");
        assert_eq!(second.id, "2");
    }

    #[tokio::test]
    async fn test_non_numeric_ids_do_not_collide() {
        let repo = InMemoryRepository::with_records(vec![note("a", "Alpha", "x"), note("2", "Two", "x")]);
        let created = repo.create(note("", "Three", "x")).await.unwrap();

        assert_eq!(created.id, "3");
    }

    #[tokio::test]
    async fn test_replace_forces_path_id() {
        let repo = seeded();
        let replaced = repo
            .replace("2", note("99", "Retro notes", "work"))
            .await
            .unwrap();

        assert_eq!(replaced.id, "2");
        assert_eq!(repo.get("2").await.unwrap().unwrap().title, "Retro notes");
        assert!(repo.get("99").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let repo = seeded();

        let err = repo.delete("999").await.unwrap_err();
        assert!(matches!(err, Error::NotFound { ref resource, ref id } if resource == "Note" && id == "999"));
        assert!(repo.replace("999", note("", "x", "x")).await.is_err());
        assert!(repo.get("999").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_list_runs_query_pipeline() {
        let repo = seeded();
        let query = ListQuery::new(1, 10).with_filter("tag", Some("home"));
        let page = repo.list(&query).await.unwrap();

        let titles: Vec<_> = page.data.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Groceries", "Garden plan"]);
        assert_eq!(page.meta.total, 2);
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let repo: Arc<dyn Repository<Note>> = Arc::new(InMemoryRepository::new());

        let tasks = (0..50).map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.create(note("", &format!("n{i}"), "x")).await })
        });
        let created = futures::future::join_all(tasks).await;

        let mut ids: Vec<u64> = created
            .into_iter()
            .map(|joined| joined.unwrap().unwrap().id.parse().unwrap())
            .collect();
        ids.sort_unstable();

        assert_eq!(ids, (1..=50).collect::<Vec<_>>());
    }
}
