pub mod account;
pub mod memory;
pub mod retry;
pub mod session;

pub use account::PostgresAccountRepository;
pub use memory::InMemoryAccountRepository;
pub use memory::InMemorySessionRepository;
pub use retry::RetryPolicy;
pub use session::PostgresSessionRepository;
