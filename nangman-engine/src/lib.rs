pub mod notifier;
pub mod session;
pub mod traits;
