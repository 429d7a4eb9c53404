// API Constants
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful assistant.";

pub const TITLE_PROMPT: &str =
    "Generate a short title (max 6 words) for this conversation based on the first message.";

// Shown in place of an assistant reply when the completion call fails.
pub const ERROR_REPLY: &str = "Error: Unable to fetch response";
pub const ERROR_NOTIFICATION: &str =
    "Failed to fetch response. Please check your API key and try again.";

// Storage keys
pub const API_KEY_KEY: &str = "openai_api_key";
pub const SYSTEM_MESSAGE_KEY: &str = "system_message";
pub const CONVERSATIONS_KEY: &str = "conversations";

pub const INITIAL_SCORE: u8 = 50;
