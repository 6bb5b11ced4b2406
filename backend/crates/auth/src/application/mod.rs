//! Application Layer
//!
//! Use cases and application services.

pub mod change_password;
pub mod config;
pub mod manage_users;
pub mod resolve_session;
pub mod sign_in;
pub mod sign_up;

// Re-exports
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use config::AuthConfig;
pub use manage_users::{CreateUserInput, ManageUsersUseCase, UpdateUserInput};
pub use resolve_session::{ResolveSessionUseCase, SessionResolution};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
