//! Users module - account holders and the provider-driven onboarding lifecycle.

mod lifecycle_model;
mod lifecycle_service;
mod users_model;
mod users_traits;


pub use lifecycle_model::{LifecycleEvent, LifecycleOutcome};
pub use lifecycle_service::AccountLifecycleService;
pub use users_model::{User, UserStatus};
pub use users_traits::{AccountLifecycleServiceTrait, UserRepositoryTrait};
