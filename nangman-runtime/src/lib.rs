pub mod bundle_export;
pub mod config_store;
pub mod files;
pub mod llm;
pub mod news_store;
pub mod runtime_engine;
pub mod secrets;
pub mod telegram;
pub mod tts;
