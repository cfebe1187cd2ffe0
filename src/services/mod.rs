// Service exports
pub mod directory;
pub mod events;
pub mod memory;
pub mod postgres;
pub mod store;

pub use directory::{DirectoryClient, ProfileProvider, ProviderError};
pub use events::{EventSink, LogSink, RecordingSink};
pub use memory::{MemoryDirectory, MemoryEngagementStore};
pub use postgres::PgEngagementStore;
pub use store::{EngagementStore, InsertOutcome, MatchWrite, RevokeOutcome, StoreError};
