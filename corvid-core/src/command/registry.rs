use std::collections::HashMap;
use std::sync::Arc;

use super::Command;
use crate::events::EventListener;

/// In-memory mapping from name/alias to command or event listener.
///
/// Commands are keyed under their primary name and every alias. The
/// registry does not arbitrate duplicate names; the handler's
/// registration path rejects those before insertion.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<Command>>,
    events: HashMap<String, Arc<EventListener>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn insert_command(&mut self, command: Arc<Command>) {
        for alias in &command.aliases {
            self.commands.insert(alias.clone(), command.clone());
        }
        self.commands.insert(command.name.clone(), command);
    }

    /// Finds a command by its primary name or any alias.
    pub fn find_command(&self, name: &str) -> Option<Arc<Command>> {
        self.commands.get(name).cloned()
    }

    /// Removes a command by its primary name, clearing its alias entries
    /// too. Subsequent lookups on any of them return `None`.
    pub fn remove_command(&mut self, name: &str) -> Option<Arc<Command>> {
        let command = self.commands.get(name).cloned()?;
        self.commands.remove(&command.name);
        for alias in &command.aliases {
            self.commands.remove(alias);
        }
        Some(command)
    }

    /// Every registered command once, regardless of how many aliases it
    /// is reachable under.
    pub fn commands(&self) -> Vec<Arc<Command>> {
        self.commands
            .iter()
            .filter(|(key, command)| **key == command.name)
            .map(|(_, command)| command.clone())
            .collect()
    }

    pub fn contains_event(&self, name: &str) -> bool {
        self.events.contains_key(name)
    }

    pub fn insert_event(&mut self, event: Arc<EventListener>) {
        self.events.insert(event.name.clone(), event);
    }

    pub fn find_event(&self, name: &str) -> Option<Arc<EventListener>> {
        self.events.get(name).cloned()
    }

    pub fn remove_event(&mut self, name: &str) -> Option<Arc<EventListener>> {
        self.events.remove(name)
    }
}
