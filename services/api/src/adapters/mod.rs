pub mod identity;
pub mod kv_store;
pub mod mock_reply;

pub use identity::KvIdentityAdapter;
pub use kv_store::InMemoryKeyValueStore;
pub use mock_reply::MockReplyComposer;
