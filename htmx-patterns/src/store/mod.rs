//! Monster storage
//!
//! Handlers only see the [`MonsterStore`] trait through `Arc<dyn MonsterStore>`
//! in the application state. The bundled implementation keeps everything in
//! memory; records live for the lifetime of the process.
//!
//! ```rust,ignore
//! use htmx_patterns::store::{InMemoryMonsterStore, MonsterStore, Ordering};
//!
//! let store = InMemoryMonsterStore::new();
//! let boris = store.create(NewMonster::new("Boris")).await?;
//! let all = store.list(Ordering::ByName).await?;
//! ```

mod error;
mod memory;

pub use error::{StoreError, StoreErrorKind, StoreOperation};
pub use memory::InMemoryMonsterStore;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{random_monsters, Monster, MonsterId, NewMonster, Transition};

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Ordering for [`MonsterStore::list`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ordering {
    /// Creation order
    #[default]
    ById,
    /// Alphabetical, ties broken by id
    ByName,
}

/// Persistence for monsters.
#[async_trait]
pub trait MonsterStore: Send + Sync {
    /// Fetch one monster, failing with a not-found error if it does not exist
    async fn get(&self, id: MonsterId) -> StoreResult<Monster>;

    /// The monster with the lowest id, if any
    async fn first(&self) -> StoreResult<Option<Monster>>;

    /// All monsters in the requested order
    async fn list(&self, ordering: Ordering) -> StoreResult<Vec<Monster>>;

    async fn count(&self) -> StoreResult<usize>;

    /// Insert a new monster and return it with its assigned id
    async fn create(&self, new: NewMonster) -> StoreResult<Monster>;

    /// Persist every field of an existing monster
    async fn save(&self, monster: &Monster) -> StoreResult<()>;

    async fn delete(&self, id: MonsterId) -> StoreResult<()>;
}

/// Load a monster, apply `transition` and persist the result.
pub async fn transition(
    store: &dyn MonsterStore,
    id: MonsterId,
    transition: Transition,
) -> StoreResult<Monster> {
    let mut monster = store.get(id).await?;
    monster.apply(transition);
    store.save(&monster).await?;
    tracing::debug!(monster_id = id, %transition, is_happy = monster.is_happy, "Monster transitioned");
    Ok(monster)
}

/// Generate and store `count` random monsters.
pub async fn make_monsters(
    store: &dyn MonsterStore,
    count: usize,
    today: NaiveDate,
) -> StoreResult<Vec<Monster>> {
    let mut created = Vec::with_capacity(count);
    for new in random_monsters(count, today) {
        created.push(store.create(new).await?);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transition_persists() {
        let store = InMemoryMonsterStore::new();
        let m = store.create(NewMonster::new("Agnes").happy(true)).await.unwrap();

        let kicked = transition(&store, m.id, Transition::Kick).await.unwrap();
        assert!(!kicked.is_happy);
        assert!(!store.get(m.id).await.unwrap().is_happy);

        let toggled = transition(&store, m.id, Transition::Toggle).await.unwrap();
        assert!(toggled.is_happy);
        assert!(store.get(m.id).await.unwrap().is_happy);
    }

    #[tokio::test]
    async fn test_transition_missing_monster() {
        let store = InMemoryMonsterStore::new();
        let err = transition(&store, 99, Transition::Hug).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_make_monsters() {
        let store = InMemoryMonsterStore::new();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let created = make_monsters(&store, 4, today).await.unwrap();
        assert_eq!(created.len(), 4);
        assert_eq!(store.count().await.unwrap(), 4);
    }
}
