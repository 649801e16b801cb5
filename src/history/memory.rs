use async_trait::async_trait;
use std::collections::{ HashMap, VecDeque };
use std::sync::Arc;
use tokio::sync::{ Mutex, RwLock };

use super::{ HistoryStore, UserGuard };
use crate::models::chat::ConversationTurn;

/// Process-local history. Created at startup, dropped at shutdown, never
/// persisted.
pub struct InMemoryHistoryStore {
    limit: usize,
    conversations: RwLock<HashMap<String, VecDeque<ConversationTurn>>>,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl InMemoryHistoryStore {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            conversations: RwLock::new(HashMap::new()),
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    async fn user_count(&self) -> usize {
        self.conversations.read().await.len()
    }

    #[cfg(test)]
    async fn tracked_locks(&self) -> usize {
        self.user_locks.lock().await.len()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn get_conversation(&self, user_id: &str) -> Vec<ConversationTurn> {
        self.conversations
            .read().await
            .get(user_id)
            .map(|turns| turns.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn append_turns(&self, user_id: &str, turns: Vec<ConversationTurn>) {
        let mut conversations = self.conversations.write().await;
        let entry = conversations.entry(user_id.to_string()).or_default();
        entry.extend(turns);
        while entry.len() > self.limit {
            entry.pop_front();
        }
    }

    async fn lock_user(&self, user_id: &str) -> UserGuard {
        let lock = {
            let mut locks = self.user_locks.lock().await;
            // Only the map holds an idle lock; drop those so the table tracks
            // active users, not every user ever seen.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(user_id.to_string()).or_default())
        };
        UserGuard::new(lock.lock_owned().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn exchange(i: usize) -> Vec<ConversationTurn> {
        vec![
            ConversationTurn::user(format!("q{}", i)),
            ConversationTurn::assistant(format!("a{}", i))
        ]
    }

    #[tokio::test]
    async fn unknown_user_has_empty_history() {
        let store = InMemoryHistoryStore::new(10);
        assert!(store.get_conversation("nobody").await.is_empty());
    }

    #[tokio::test]
    async fn keeps_most_recent_turns_in_order() {
        let store = InMemoryHistoryStore::new(10);
        for m in 1..=7 {
            store.append_turns("u1", exchange(m)).await;
            let history = store.get_conversation("u1").await;
            assert_eq!(history.len(), (2 * m).min(10));
        }

        let history = store.get_conversation("u1").await;
        let contents: Vec<_> = history.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, ["q3", "a3", "q4", "a4", "q5", "a5", "q6", "a6", "q7", "a7"]);
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = InMemoryHistoryStore::new(4);
        store.append_turns("alice", exchange(1)).await;
        store.append_turns("bob", exchange(2)).await;

        assert_eq!(store.get_conversation("alice").await[0].content, "q1");
        assert_eq!(store.get_conversation("bob").await[0].content, "q2");
        assert_eq!(store.user_count().await, 2);
    }

    #[tokio::test]
    async fn odd_limit_evicts_fifo() {
        let store = InMemoryHistoryStore::new(3);
        store.append_turns("u", exchange(1)).await;
        store.append_turns("u", exchange(2)).await;

        let contents: Vec<_> = store
            .get_conversation("u").await
            .into_iter()
            .map(|t| t.content)
            .collect();
        assert_eq!(contents, ["a1", "q2", "a2"]);
    }

    #[tokio::test]
    async fn same_user_cycles_do_not_interleave() {
        let store = Arc::new(InMemoryHistoryStore::new(100));
        let mut tasks = Vec::new();

        for i in 0..8 {
            let store = Arc::clone(&store);
            tasks.push(
                tokio::spawn(async move {
                    let _guard = store.lock_user("shared").await;
                    let before = store.get_conversation("shared").await.len();
                    store.append_turns("shared", vec![ConversationTurn::user(format!("q{}", i))]).await;
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    store.append_turns("shared", vec![ConversationTurn::assistant(format!("a{}", i))]).await;
                    before
                })
            );
        }

        let mut seen = Vec::new();
        for task in tasks {
            seen.push(task.await.unwrap());
        }
        seen.sort();
        assert_eq!(seen, (0..8).map(|i| i * 2).collect::<Vec<_>>());

        let history = store.get_conversation("shared").await;
        assert_eq!(history.len(), 16);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].content[1..], pair[1].content[1..]);
        }
    }

    #[tokio::test]
    async fn different_users_do_not_block_each_other() {
        let store = InMemoryHistoryStore::new(10);
        let _alice = store.lock_user("alice").await;
        let bob = tokio::time::timeout(Duration::from_millis(100), store.lock_user("bob")).await;
        assert!(bob.is_ok());
    }

    #[tokio::test]
    async fn released_locks_are_pruned() {
        let store = InMemoryHistoryStore::new(10);
        for i in 0..50 {
            let _guard = store.lock_user(&format!("user-{}", i)).await;
        }
        assert_eq!(store.tracked_locks().await, 1);

        let held = store.lock_user("alice").await;
        let _other = store.lock_user("bob").await;
        assert_eq!(store.tracked_locks().await, 2);

        drop(held);
        let _again = store.lock_user("alice").await;
        assert_eq!(store.tracked_locks().await, 2);
    }

    #[tokio::test]
    async fn held_lock_survives_pruning() {
        let store = Arc::new(InMemoryHistoryStore::new(10));
        let guard = store.lock_user("shared").await;

        let waiter = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let _guard = store.lock_user("shared").await;
            })
        };
        for i in 0..5 {
            let _guard = store.lock_user(&format!("other-{}", i)).await;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
    }
}
