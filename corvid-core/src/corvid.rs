use std::sync::{Arc, RwLock};

use corvid_common::config::CorvidConfig;

use crate::command::errors::RegistrationError;
use crate::command::registry::CommandRegistry;
use crate::command::Command;
use crate::cooldowns::CooldownStore;
use crate::events::EventListener;
use crate::platform::Platform;

/// The handler object: one explicit value owning the configuration, the
/// registry, the cooldown store and the platform handle. Constructed
/// once at startup and threaded through everything that needs it; there
/// is no ambient or global instance.
pub struct Corvid {
    config: CorvidConfig,
    registry: RwLock<CommandRegistry>,
    cooldowns: CooldownStore,
    platform: Arc<dyn Platform>,
}

/// Alias for sharing the handler across tasks.
pub type ThreadSafeCorvid = Arc<Corvid>;

impl Corvid {
    pub fn new(config: CorvidConfig, platform: Arc<dyn Platform>) -> Self {
        Self {
            config,
            registry: RwLock::new(CommandRegistry::new()),
            cooldowns: CooldownStore::new(),
            platform,
        }
    }

    pub fn config(&self) -> &CorvidConfig {
        &self.config
    }

    pub fn platform(&self) -> &dyn Platform {
        &*self.platform
    }

    pub fn cooldowns(&self) -> &CooldownStore {
        &self.cooldowns
    }

    /// Registers a command. A name or alias collision with anything
    /// already registered is a [RegistrationError]; nothing is inserted
    /// in that case.
    pub fn register_command(&self, command: Command) -> Result<Arc<Command>, RegistrationError> {
        let mut registry = self.registry.write().unwrap();

        if registry.contains_command(&command.name) {
            return Err(RegistrationError::DuplicateCommandName(command.name.clone()));
        }
        for alias in &command.aliases {
            if registry.contains_command(alias) {
                return Err(RegistrationError::DuplicateCommandName(alias.clone()));
            }
        }

        let command = Arc::new(command);
        registry.insert_command(command.clone());
        Ok(command)
    }

    /// Removes a command by primary name or alias, clearing its cooldown
    /// records along with it.
    pub fn unregister_command(&self, name: &str) -> Option<Arc<Command>> {
        let removed = self.registry.write().unwrap().remove_command(name);
        if let Some(ref command) = removed {
            self.cooldowns.clear_command(&command.name);
        }
        removed
    }

    /// Finds a command by primary name or alias.
    pub fn find_command(&self, name: &str) -> Option<Arc<Command>> {
        self.registry.read().unwrap().find_command(name)
    }

    /// Every registered command, once each.
    pub fn commands(&self) -> Vec<Arc<Command>> {
        self.registry.read().unwrap().commands()
    }

    pub fn register_event(&self, listener: EventListener) -> Result<Arc<EventListener>, RegistrationError> {
        let mut registry = self.registry.write().unwrap();

        if registry.contains_event(&listener.name) {
            return Err(RegistrationError::DuplicateEventName(listener.name.clone()));
        }

        let listener = Arc::new(listener);
        registry.insert_event(listener.clone());
        Ok(listener)
    }

    pub fn unregister_event(&self, name: &str) -> Option<Arc<EventListener>> {
        self.registry.write().unwrap().remove_event(name)
    }

    pub fn find_event(&self, name: &str) -> Option<Arc<EventListener>> {
        self.registry.read().unwrap().find_event(name)
    }
}
