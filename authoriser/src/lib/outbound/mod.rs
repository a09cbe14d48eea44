pub mod backend;
pub mod choice;
pub mod session;

pub use backend::RpcBackend;
pub use choice::StaticChoice;
pub use session::MemorySessionStore;
