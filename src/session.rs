// src/session.rs

use crate::api::CompletionClient;
use crate::config::Config;
use crate::constants::{
    API_KEY_KEY, CONVERSATIONS_KEY, DEFAULT_SYSTEM_MESSAGE, ERROR_NOTIFICATION, ERROR_REPLY,
    INITIAL_SCORE, SYSTEM_MESSAGE_KEY,
};
use crate::conversations::ConversationList;
use crate::errors::{ColloquyError, ColloquyResult};
use crate::models::{Conversation, Message, Role};
use crate::notify::{Notifier, NotifyKind};
use crate::scorer::{ResponseScorer, ScoreResult};
use crate::store::KeyValueStore;
use log::{debug, warn};

/// Top-level session controller. Owns the conversation list and the
/// ephemeral UI state, drives the completion client, and mirrors every
/// conversation mutation into the key-value store.
///
/// At most one `submit` may be in flight; `&mut self` enforces that for a
/// single owner, and multi-owner embedders must serialize access (for
/// example one `tokio::sync::Mutex` per session).
pub struct ChatSession {
    client: CompletionClient,
    store: Box<dyn KeyValueStore + Send>,
    scorer: Box<dyn ResponseScorer + Send>,
    notifier: Box<dyn Notifier + Send>,
    conversations: ConversationList,

    api_key: String,
    system_message: String,
    input: String,
    search_query: String,
    selected_role: Option<Role>,
    pdf_content: String,

    score: u8,
    last_score_change: i32,
    last_feedback: String,
    current_prompt_index: usize,
    is_streaming: bool,
    is_sidebar_open: bool,
}

impl ChatSession {
    /// Builds a session from persisted state. A malformed conversation
    /// payload falls back to an empty list rather than failing startup.
    pub fn new(
        config: Config,
        store: Box<dyn KeyValueStore + Send>,
        scorer: Box<dyn ResponseScorer + Send>,
        notifier: Box<dyn Notifier + Send>,
    ) -> ColloquyResult<Self> {
        config.validate()?;

        let api_key = store.load(API_KEY_KEY).unwrap_or_default();
        let system_message = store
            .load(SYSTEM_MESSAGE_KEY)
            .unwrap_or_else(|| DEFAULT_SYSTEM_MESSAGE.to_string());

        let conversations = match store.load(CONVERSATIONS_KEY) {
            Some(raw) => match serde_json::from_str::<Vec<Conversation>>(&raw) {
                Ok(list) => list,
                Err(e) => {
                    warn!("persisted conversations are malformed ({}), starting empty", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        debug!("session loaded with {} conversations", conversations.len());

        Ok(ChatSession {
            client: CompletionClient::new(config.api_url.clone(), config.model.clone()),
            store,
            scorer,
            notifier,
            conversations: ConversationList::new(conversations),
            api_key,
            system_message,
            input: String::new(),
            search_query: String::new(),
            selected_role: None,
            pdf_content: String::new(),
            score: INITIAL_SCORE,
            last_score_change: 0,
            last_feedback: String::new(),
            current_prompt_index: 0,
            is_streaming: false,
            is_sidebar_open: true,
        })
    }

    /// Appends a fresh conversation and makes it current. With a role, the
    /// role also becomes the selected one and supplies the system message.
    pub fn start_new_conversation(&mut self, role: Option<Role>) -> ColloquyResult<usize> {
        let index = self.conversations.start_new(role.clone());
        self.input.clear();
        self.current_prompt_index = 0;
        if let Some(role) = role {
            self.system_message = role.system_message.clone();
            self.selected_role = Some(role);
        }
        self.persist_conversations()?;
        Ok(index)
    }

    /// Makes an existing conversation current. If it carries a role, the
    /// role is restored; a roleless conversation leaves the previously
    /// selected role in place.
    pub fn switch_conversation(&mut self, index: usize) -> ColloquyResult<()> {
        let role = self.conversations.switch(index)?.role.clone();
        self.input.clear();
        if let Some(role) = role {
            self.system_message = role.system_message.clone();
            self.selected_role = Some(role);
        }
        Ok(())
    }

    /// Sends the buffered input to the completion endpoint and folds the
    /// outcome back into the active conversation. Strict ordering: user
    /// message first (persisted before the network call), then on success
    /// the reply, the score, and on the first exchange a best-effort
    /// title; on failure a fallback reply plus exactly one notification.
    /// The streaming flag clears on every path.
    pub async fn submit(&mut self) -> ColloquyResult<()> {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return Err(ColloquyError::EmptyInput);
        }
        if self.conversations.is_empty() {
            return Err(ColloquyError::NoActiveConversation);
        }
        let index = self.conversations.current_index();

        // Checked before the user message lands so the title request can
        // fire on the conversation's first exchange.
        let first_exchange = self
            .conversations
            .get(index)
            .map(|c| c.messages.is_empty())
            .unwrap_or(false);

        self.conversations.append_message(index, Message::user(input.clone()))?;
        self.persist_conversations()?;
        self.input.clear();
        self.is_streaming = true;

        let outcome = self.exchange(index, &input, first_exchange).await;
        self.is_streaming = false;
        outcome
    }

    async fn exchange(
        &mut self,
        index: usize,
        input: &str,
        first_exchange: bool,
    ) -> ColloquyResult<()> {
        let system_message = self
            .selected_role
            .as_ref()
            .map(|r| r.system_message.clone())
            .unwrap_or_else(|| self.system_message.clone());
        let history = self
            .conversations
            .get(index)
            .map(|c| c.messages.clone())
            .unwrap_or_default();

        match self.client.complete(&self.api_key, &system_message, &history).await {
            Ok(reply) => {
                self.conversations.append_message(index, Message::assistant(reply.clone()))?;
                self.persist_conversations()?;

                let result = self.scorer.score(input, &reply);
                self.apply_score(result);

                if first_exchange {
                    match self.client.generate_title(&self.api_key, input).await {
                        Ok(title) if !title.is_empty() => {
                            self.conversations.rename(index, title)?;
                            self.persist_conversations()?;
                        }
                        Ok(_) => {}
                        // Titles are best-effort; the failure stays silent.
                        Err(e) => debug!("title generation failed: {}", e),
                    }
                }

                if let Some(role) = &self.selected_role {
                    if !role.assistant_prompts.is_empty() {
                        self.current_prompt_index =
                            (self.current_prompt_index + 1) % role.assistant_prompts.len();
                    }
                }
            }
            Err(e) => {
                warn!("completion request failed: {}", e);
                self.conversations
                    .append_message(index, Message::assistant(ERROR_REPLY))?;
                self.persist_conversations()?;
                self.notifier.notify(NotifyKind::Error, "Error", ERROR_NOTIFICATION);
            }
        }
        Ok(())
    }

    fn apply_score(&mut self, result: ScoreResult) {
        self.score = clamp_score(self.score, result.score_change);
        self.last_score_change = result.score_change;
        self.last_feedback = result.feedback;
    }

    fn persist_conversations(&mut self) -> ColloquyResult<()> {
        let raw = serde_json::to_string(self.conversations.as_slice())
            .map_err(|e| ColloquyError::storage(format!("failed to serialize conversations: {}", e)))?;
        self.store.save(CONVERSATIONS_KEY, &raw)
    }

    pub fn toggle_sidebar(&mut self) {
        self.is_sidebar_open = !self.is_sidebar_open;
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) -> ColloquyResult<()> {
        self.api_key = api_key.into();
        let api_key = self.api_key.clone();
        self.store.save(API_KEY_KEY, &api_key)
    }

    pub fn set_system_message(&mut self, system_message: impl Into<String>) -> ColloquyResult<()> {
        self.system_message = system_message.into();
        let system_message = self.system_message.clone();
        self.store.save(SYSTEM_MESSAGE_KEY, &system_message)
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_selected_role(&mut self, role: Option<Role>) {
        self.selected_role = role;
    }

    /// Stores externally extracted document text verbatim. The session
    /// never interprets it.
    pub fn set_pdf_content(&mut self, content: impl Into<String>) {
        self.pdf_content = content.into();
    }

    /// Indices of conversations whose title matches the search query,
    /// case-insensitively. An empty query matches everything.
    pub fn matching_conversations(&self) -> Vec<usize> {
        let query = self.search_query.to_lowercase();
        self.conversations
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(_, c)| query.is_empty() || c.title.to_lowercase().contains(&query))
            .map(|(i, _)| i)
            .collect()
    }

    /// The suggested assistant prompt the role cycle currently points at.
    pub fn current_prompt(&self) -> Option<&str> {
        let role = self.selected_role.as_ref()?;
        role.assistant_prompts
            .get(self.current_prompt_index)
            .map(|s| s.as_str())
    }

    pub fn conversations(&self) -> &ConversationList {
        &self.conversations
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn system_message(&self) -> &str {
        &self.system_message
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selected_role(&self) -> Option<&Role> {
        self.selected_role.as_ref()
    }

    pub fn pdf_content(&self) -> &str {
        &self.pdf_content
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn last_score_change(&self) -> i32 {
        self.last_score_change
    }

    pub fn last_feedback(&self) -> &str {
        &self.last_feedback
    }

    pub fn current_prompt_index(&self) -> usize {
        self.current_prompt_index
    }

    pub fn is_streaming(&self) -> bool {
        self.is_streaming
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.is_sidebar_open
    }
}

/// Applies a score delta, saturating at the [0, 100] bounds.
fn clamp_score(score: u8, change: i32) -> u8 {
    (score as i32 + change).clamp(0, 100) as u8
}
