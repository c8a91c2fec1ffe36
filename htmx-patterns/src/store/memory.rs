//! In-process monster store backed by an ordered map.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MonsterStore, Ordering, StoreError, StoreOperation, StoreResult};
use crate::models::{Monster, MonsterId, NewMonster};

#[derive(Debug, Default)]
struct Inner {
    monsters: BTreeMap<MonsterId, Monster>,
    next_id: MonsterId,
}

/// Store that keeps monsters in memory.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMonsterStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryMonsterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MonsterStore for InMemoryMonsterStore {
    async fn get(&self, id: MonsterId) -> StoreResult<Monster> {
        let inner = self.inner.read().await;
        inner
            .monsters
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn first(&self) -> StoreResult<Option<Monster>> {
        let inner = self.inner.read().await;
        Ok(inner.monsters.values().next().cloned())
    }

    async fn list(&self, ordering: Ordering) -> StoreResult<Vec<Monster>> {
        let inner = self.inner.read().await;
        let mut monsters: Vec<Monster> = inner.monsters.values().cloned().collect();
        if ordering == Ordering::ByName {
            // stable sort keeps id order for equal names
            monsters.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(monsters)
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.inner.read().await.monsters.len())
    }

    async fn create(&self, new: NewMonster) -> StoreResult<Monster> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let monster = Monster::from_new(inner.next_id, new);
        inner.monsters.insert(monster.id, monster.clone());
        tracing::debug!(monster_id = monster.id, name = %monster.name, "Monster created");
        Ok(monster)
    }

    async fn save(&self, monster: &Monster) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        match inner.monsters.get_mut(&monster.id) {
            Some(existing) => {
                *existing = monster.clone();
                Ok(())
            }
            None => Err(StoreError::not_found(monster.id).during(StoreOperation::Save)),
        }
    }

    async fn delete(&self, id: MonsterId) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .monsters
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(id).during(StoreOperation::Delete))
    }
}
