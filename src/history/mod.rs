mod memory;

use async_trait::async_trait;
use log::info;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

use crate::cli::Args;
use crate::models::chat::ConversationTurn;

pub use memory::InMemoryHistoryStore;

/// Held while a user's turn is in flight; dropping it lets the next request
/// for the same user proceed.
pub struct UserGuard {
    _guard: OwnedMutexGuard<()>,
}

impl UserGuard {
    pub(crate) fn new(guard: OwnedMutexGuard<()>) -> Self {
        Self { _guard: guard }
    }
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Turns for `user_id`, oldest first. Unknown users have an empty history.
    async fn get_conversation(&self, user_id: &str) -> Vec<ConversationTurn>;

    /// Appends `turns` in order, then drops the oldest turns beyond the limit.
    async fn append_turns(&self, user_id: &str, turns: Vec<ConversationTurn>);

    /// Serializes read-process-append cycles for one user.
    async fn lock_user(&self, user_id: &str) -> UserGuard;
}

pub fn create_history_store(
    args: &Args
) -> Result<Arc<dyn HistoryStore>, Box<dyn Error + Send + Sync>> {
    match args.history_type.to_lowercase().as_str() {
        "memory" => Ok(Arc::new(InMemoryHistoryStore::new(args.history_limit))),
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported history store type: {}", args.history_type)
                    )
                )
            ),
    }
}

pub fn initialize_history_store(
    args: &Args
) -> Result<Arc<dyn HistoryStore>, Box<dyn Error + Send + Sync>> {
    info!(
        "Chat history will be kept in: {} (last {} turns per user)",
        args.history_type,
        args.history_limit
    );
    create_history_store(args)
}
