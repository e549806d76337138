use std::fmt::Display;

use crate::command::tags::CommandTag;
use crate::cooldowns::CooldownInfo;

/// The closed set of reasons a command invocation can be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandErrorKind {
    ClientMissingPermissions,
    UserMissingPermissions,
    MissingTags,
    WrongChannel,
    Cooldown,
    ArgumentNotFound,
    InvalidArgument,
    Other,
}

/// Structured payload attached to a [CommandError], carrying everything a
/// renderer needs without re-deriving it.
#[derive(Clone, Debug)]
pub enum CommandErrorData {
    /// Sorted missing permission names.
    Permissions(Vec<String>),
    /// The declared tags the context failed to meet.
    Tags(Vec<CommandTag>),
    Cooldown(CooldownInfo),
    Argument { name: String },
    None,
}

/// A classified refusal from the validation pipeline or the argument
/// resolver. Immutable once constructed.
#[derive(Clone, Debug)]
pub struct CommandError {
    pub kind: CommandErrorKind,
    pub message: String,
    pub data: CommandErrorData,
}

impl CommandError {
    pub fn client_missing_permissions(missing: Vec<String>) -> Self {
        CommandError {
            kind: CommandErrorKind::ClientMissingPermissions,
            message: format!("the bot is missing required permissions: {}", missing.join(", ")),
            data: CommandErrorData::Permissions(missing),
        }
    }

    pub fn user_missing_permissions(missing: Vec<String>) -> Self {
        CommandError {
            kind: CommandErrorKind::UserMissingPermissions,
            message: format!("you are missing required permissions: {}", missing.join(", ")),
            data: CommandErrorData::Permissions(missing),
        }
    }

    pub fn missing_tags(unmet: Vec<CommandTag>) -> Self {
        let names = unmet.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ");
        CommandError {
            kind: CommandErrorKind::MissingTags,
            message: format!("this command cannot run here: {names}"),
            data: CommandErrorData::Tags(unmet),
        }
    }

    pub fn wrong_channel() -> Self {
        CommandError {
            kind: CommandErrorKind::WrongChannel,
            message: "this command is not allowed in this channel".to_owned(),
            data: CommandErrorData::None,
        }
    }

    pub fn cooldown(info: CooldownInfo) -> Self {
        CommandError {
            kind: CommandErrorKind::Cooldown,
            message: format!(
                "this command is on cooldown for another {:.1}s",
                info.wait_more.as_secs_f32()
            ),
            data: CommandErrorData::Cooldown(info),
        }
    }

    pub fn argument_not_found(name: &str) -> Self {
        CommandError {
            kind: CommandErrorKind::ArgumentNotFound,
            message: format!("required argument '{name}' was not provided"),
            data: CommandErrorData::Argument { name: name.to_owned() },
        }
    }

    pub fn invalid_argument(name: &str, reason: impl Display) -> Self {
        CommandError {
            kind: CommandErrorKind::InvalidArgument,
            message: format!("invalid value for argument '{name}': {reason}"),
            data: CommandErrorData::Argument { name: name.to_owned() },
        }
    }

    pub fn other(message: impl Display) -> Self {
        CommandError {
            kind: CommandErrorKind::Other,
            message: message.to_string(),
            data: CommandErrorData::None,
        }
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
impl std::error::Error for CommandError {}

/// A malformed command or event declaration, raised at registration time.
/// Fatal to that one registration, never to the process; nothing is
/// half-registered when one of these is returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistrationError {
    EmptyCommandName,
    MissingRunFunction(String),
    DuplicateCommandName(String),
    DuplicateEventName(String),
    DuplicateArgumentName(String, String),
    CoalescingArgumentNotLast(String, String),
}

impl Display for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCommandName => f.write_str("command name must not be empty"),
            Self::MissingRunFunction(name) => {
                write!(f, "command '{name}' has no run function")
            },
            Self::DuplicateCommandName(name) => {
                write!(f, "a command or alias named '{name}' is already registered")
            },
            Self::DuplicateEventName(name) => {
                write!(f, "an event listener named '{name}' is already registered")
            },
            Self::DuplicateArgumentName(command, argument) => {
                write!(f, "command '{command}' declares argument '{argument}' more than once")
            },
            Self::CoalescingArgumentNotLast(command, argument) => {
                write!(
                    f,
                    "command '{command}' declares coalescing argument '{argument}' before the end of its argument list"
                )
            },
        }
    }
}
impl std::error::Error for RegistrationError {}

/// An error produced while executing a command end to end.
#[derive(Debug)]
pub enum ExecutionError {
    /// A validation gate or the argument resolver refused the invocation.
    Check(CommandError),
    /// The command body itself failed. Propagated, never caught by the
    /// pipeline.
    Command(anyhow::Error),
}

impl Display for ExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Check(err) => write!(f, "{err}"),
            Self::Command(err) => write!(f, "command execution failed: {err}"),
        }
    }
}

impl From<CommandError> for ExecutionError {
    fn from(v: CommandError) -> Self {
        Self::Check(v)
    }
}

impl From<anyhow::Error> for ExecutionError {
    fn from(v: anyhow::Error) -> Self {
        Self::Command(v)
    }
}
