//! Users Domain
//!
//! In-memory user registry with declarative field validation and an
//! append-only error log.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │ UserManager │  ← Validation, uniqueness, ids, save step, error log
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Ordered storage (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← NewUser (validated candidate), User, UserResponse
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{Console, NewUser, UserManager};
//!
//! let mut manager = UserManager::in_memory("errors.log", 0.3, Console::stdout());
//!
//! let candidate = NewUser::new("Иван Иванов", "ivan@example.com", "Password123", 25);
//! match manager.add_user(candidate) {
//!     Ok(user) => println!("stored {}", user.id()),
//!     Err(err) if err.is_handled() => {} // already logged and reported
//!     Err(err) => panic!("{err}"),
//! }
//! ```

pub mod console;
pub mod error;
pub mod error_log;
pub mod models;
pub mod persistence;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use console::{CapturedLines, Console, COMPLETION_NOTICE};
pub use error::{ErrorKind, UserError, UserResult};
pub use error_log::ErrorLog;
pub use models::{NewUser, User, UserResponse};
pub use persistence::{PersistenceStep, SimulatedPersistence};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserManager;
