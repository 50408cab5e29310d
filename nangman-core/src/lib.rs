pub mod briefing;
pub mod bundle;
pub mod chunk;
pub mod config;
pub mod error;
pub mod news;
pub mod pipeline;
pub mod prompts;
pub mod stage;
pub mod text;
pub mod types;

// Keep the public surface small and intentional.
pub use briefing::*;
pub use bundle::*;
pub use chunk::*;
pub use config::*;
pub use error::*;
pub use news::*;
pub use pipeline::*;
pub use prompts::*;
pub use stage::*;
pub use text::*;
pub use types::*;
