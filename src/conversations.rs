// src/conversations.rs

use crate::errors::{ColloquyError, ColloquyResult};
use crate::models::{Conversation, Message, Role};

/// Ordered list of conversations plus the index of the active one.
///
/// Operations are index-based (positions double as the UI handle); every
/// mutating operation bounds-checks first rather than panicking. The
/// invariant maintained throughout: whenever the list is non-empty,
/// `current` indexes an existing conversation.
#[derive(Debug, Default)]
pub struct ConversationList {
    conversations: Vec<Conversation>,
    current: usize,
}

impl ConversationList {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        ConversationList {
            conversations,
            current: 0,
        }
    }

    /// Appends a fresh conversation and makes it current. Returns the
    /// index it landed at (the prior length).
    pub fn start_new(&mut self, role: Option<Role>) -> usize {
        self.conversations.push(Conversation::new(role));
        self.current = self.conversations.len() - 1;
        self.current
    }

    pub fn switch(&mut self, index: usize) -> ColloquyResult<&Conversation> {
        self.check_bounds(index)?;
        self.current = index;
        Ok(&self.conversations[index])
    }

    pub fn append_message(&mut self, index: usize, message: Message) -> ColloquyResult<()> {
        self.check_bounds(index)?;
        self.conversations[index].messages.push(message);
        Ok(())
    }

    pub fn rename(&mut self, index: usize, title: impl Into<String>) -> ColloquyResult<()> {
        self.check_bounds(index)?;
        self.conversations[index].title = title.into();
        Ok(())
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The active conversation, or `None` when the list is empty.
    pub fn current(&self) -> Option<&Conversation> {
        self.conversations.get(self.current)
    }

    pub fn get(&self, index: usize) -> Option<&Conversation> {
        self.conversations.get(index)
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn as_slice(&self) -> &[Conversation] {
        &self.conversations
    }

    fn check_bounds(&self, index: usize) -> ColloquyResult<()> {
        if index < self.conversations.len() {
            Ok(())
        } else {
            Err(ColloquyError::IndexOutOfBounds {
                index,
                len: self.conversations.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;

    fn tutor_role() -> Role {
        Role {
            name: "Tutor".to_string(),
            system_message: "Be a tutor".to_string(),
            assistant_prompts: vec!["Hi".to_string()],
        }
    }

    #[test]
    fn test_start_new_without_role() {
        let mut list = ConversationList::default();
        let index = list.start_new(None);
        assert_eq!(index, 0);
        let conversation = list.current().unwrap();
        assert_eq!(conversation.title, "New Conversation");
        assert!(conversation.messages.is_empty());
    }

    #[test]
    fn test_start_new_with_role_titles_after_it() {
        let mut list = ConversationList::default();
        list.start_new(None);
        let index = list.start_new(Some(tutor_role()));
        // Current index lands at the prior length.
        assert_eq!(index, 1);
        assert_eq!(list.current_index(), 1);
        assert_eq!(list.current().unwrap().title, "New Tutor Conversation");
    }

    #[test]
    fn test_switch_out_of_bounds_fails() {
        let mut list = ConversationList::default();
        list.start_new(None);
        let err = list.switch(5).unwrap_err();
        assert!(matches!(
            err,
            ColloquyError::IndexOutOfBounds { index: 5, len: 1 }
        ));
        // The active index is untouched by a failed switch.
        assert_eq!(list.current_index(), 0);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut list = ConversationList::default();
        list.start_new(None);
        list.append_message(0, Message::user("Hello")).unwrap();
        list.append_message(0, Message::assistant("Hi there")).unwrap();

        let messages = &list.get(0).unwrap().messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].role, MessageRole::Assistant);
    }

    #[test]
    fn test_rename_touches_title_only() {
        let mut list = ConversationList::default();
        list.start_new(None);
        list.append_message(0, Message::user("Hello")).unwrap();
        let id = list.get(0).unwrap().id;

        list.rename(0, "Rust questions").unwrap();
        let conversation = list.get(0).unwrap();
        assert_eq!(conversation.title, "Rust questions");
        assert_eq!(conversation.id, id);
        assert_eq!(conversation.messages.len(), 1);
    }
}
