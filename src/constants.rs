//! Constants used throughout the application
//!
//! This module centralizes user-facing messages and default values.

// Config defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://kanboard.db?mode=rwc";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_CHAT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_CHAT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_CHAT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Environment overrides
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_PORT: &str = "PORT";
pub const ENV_LOG_LEVEL: &str = "KANBOARD_LOG";

// Config file locations
pub const CONFIG_FILE_NAME: &str = "kanboard.toml";
pub const CONFIG_DIR_NAME: &str = "kanboard";

// Success Messages
pub const SUCCESS_COLUMN_DELETED: &str = "Column deleted successfully";
pub const SUCCESS_TASK_DELETED: &str = "Task deleted successfully";
pub const SUCCESS_LABEL_DELETED: &str = "Label deleted successfully";
pub const CHAT_STATUS_SUCCESS: &str = "success";

// Error Messages
pub const ERROR_CHAT_NO_MESSAGES: &str = "No messages provided";
pub const ERROR_CHAT_QUOTA_EXCEEDED: &str = "OpenAI API quota exceeded. Please check your billing settings.";
pub const ERROR_INTERNAL: &str = "Internal server error";
