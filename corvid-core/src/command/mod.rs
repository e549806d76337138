//! The command system.
//!
//! The key things that make up the command system are:
//!
//! - The [`Command`] value type: a command is plain data (metadata, a
//!   declared argument list, and a `run` function reference). There is no
//!   command trait to implement and no inheritance; subcommands are just
//!   more command values attached to a parent.
//!
//! - [`arguments::ArgumentDescriptor`]: a declarative description of one
//!   argument (type tag, validator, parser, modifiers). Descriptors are
//!   built once at declaration time through per-type builder functions
//!   and are immutable afterward.
//!
//! - [`resolver`]: walks a command's declared arguments against raw text
//!   (or structured interaction options) and produces a
//!   [`resolver::ResolvedArguments`] map of typed values and classified
//!   per-argument errors.
//!
//! - [`checks`]: the validation pipeline: cooldown, channel,
//!   permissions, tags, then arguments, in that order, first failure
//!   wins.
//!
//! - [`registry::CommandRegistry`]: the name/alias map. Owned by the
//!   [`crate::corvid::Corvid`] handler, never by a global.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use futures_util::future::BoxFuture;
use twilight_model::channel::Message;
use twilight_model::guild::Permissions;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, InteractionMarker};
use twilight_model::id::Id;
use twilight_model::user::User;

use self::arguments::{ArgumentDescriptor, CommandArgument, ResolvedValue};
use self::category::Category;
use self::errors::RegistrationError;
use self::messagebuilder::MessageBuilder;
use self::resolver::ResolvedArguments;
use self::source::Source;
use self::tags::CommandTag;
use crate::corvid::ThreadSafeCorvid;

pub mod arguments;
pub mod category;
pub mod checks;
pub mod embed;
pub mod errors;
pub mod messagebuilder;
pub mod registry;
pub mod resolver;
pub mod source;
pub mod tags;
pub mod tokenizer;

/// A command body: a plain function value taking the finished context.
pub type CommandRun = Arc<dyn Fn(CommandContext) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Wraps an async function into a [CommandRun].
pub fn command_run<F, Fut>(f: F) -> CommandRun
where
    F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |ctxt| Box::pin(f(ctxt)))
}

/// A declared command. Constructed through [CommandBuilder], immutable
/// once registered.
pub struct Command {
    /// Primary name; the command's identity in the registry and the
    /// cooldown store.
    pub name: String,
    /// Alternative invocation names.
    pub aliases: Vec<String>,
    pub description: String,
    /// Usage syntax for help output. Derived from the argument list when
    /// not set explicitly.
    pub usage: String,
    pub examples: Vec<String>,
    pub category: Category,
    /// Declarative preconditions checked by the validation pipeline.
    pub tags: Vec<CommandTag>,
    /// Per-subject cooldown. Zero means no cooldown is ever recorded.
    pub cooldown: Duration,
    /// Permissions the bot itself needs.
    pub client_permissions: Permissions,
    /// Permissions the invoking user needs.
    pub user_permissions: Permissions,
    /// Channel allow-list. Empty means any channel.
    pub channels: Vec<Id<ChannelMarker>>,
    /// Declared arguments, in declaration order.
    pub arguments: Vec<CommandArgument>,
    pub run: CommandRun,
    pub subcommands: Vec<Arc<Command>>,
}

impl Command {
    /// Finds a subcommand by name or alias.
    pub fn find_subcommand(&self, name: &str) -> Option<Arc<Command>> {
        self.subcommands
            .iter()
            .find(|sub| sub.name == name || sub.aliases.iter().any(|a| a == name))
            .cloned()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("category", &self.category)
            .field("arguments", &self.arguments)
            .field("subcommands", &self.subcommands)
            .finish_non_exhaustive()
    }
}

/// Builder utility structure to create a [Command] value.
///
/// `build` validates the declaration; a malformed command is a
/// registration-time error, never a half-registered command.
pub struct CommandBuilder {
    name: String,
    aliases: Vec<String>,
    description: String,
    usage: Option<String>,
    examples: Vec<String>,
    category: Category,
    tags: Vec<CommandTag>,
    cooldown: Duration,
    client_permissions: Permissions,
    user_permissions: Permissions,
    channels: Vec<Id<ChannelMarker>>,
    arguments: Vec<CommandArgument>,
    run: Option<CommandRun>,
    subcommands: Vec<Arc<Command>>,
}

impl CommandBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            aliases: vec![],
            description: String::new(),
            usage: None,
            examples: vec![],
            category: Category::None(String::new()),
            tags: vec![],
            cooldown: Duration::ZERO,
            client_permissions: Permissions::empty(),
            user_permissions: Permissions::empty(),
            channels: vec![],
            arguments: vec![],
            run: None,
            subcommands: vec![],
        }
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_owned());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    pub fn usage(mut self, usage: &str) -> Self {
        self.usage = Some(usage.to_owned());
        self
    }

    pub fn example(mut self, example: &str) -> Self {
        self.examples.push(example.to_owned());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn tag(mut self, tag: CommandTag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn client_permissions(mut self, permissions: Permissions) -> Self {
        self.client_permissions = permissions;
        self
    }

    pub fn user_permissions(mut self, permissions: Permissions) -> Self {
        self.user_permissions = permissions;
        self
    }

    pub fn channel(mut self, channel: Id<ChannelMarker>) -> Self {
        self.channels.push(channel);
        self
    }

    /// Declares the next argument. Order of calls is declaration order.
    pub fn argument(mut self, name: &str, descriptor: ArgumentDescriptor) -> Self {
        self.arguments.push(CommandArgument {
            name: name.to_owned(),
            index: self.arguments.len(),
            descriptor,
        });
        self
    }

    pub fn run<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.run = Some(command_run(f));
        self
    }

    /// Attaches a subcommand. A duplicate subcommand name under the same
    /// parent is silently ignored.
    pub fn subcommand(mut self, subcommand: Command) -> Self {
        if !self.subcommands.iter().any(|s| s.name == subcommand.name) {
            self.subcommands.push(Arc::new(subcommand));
        }
        self
    }

    pub fn build(self) -> Result<Command, RegistrationError> {
        if self.name.is_empty() {
            return Err(RegistrationError::EmptyCommandName);
        }

        let Some(run) = self.run else {
            return Err(RegistrationError::MissingRunFunction(self.name));
        };

        for (i, argument) in self.arguments.iter().enumerate() {
            if self.arguments[..i]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&argument.name))
            {
                return Err(RegistrationError::DuplicateArgumentName(
                    self.name.clone(),
                    argument.name.clone(),
                ));
            }
            if argument.descriptor.is_coalescing() && i != self.arguments.len() - 1 {
                return Err(RegistrationError::CoalescingArgumentNotLast(
                    self.name.clone(),
                    argument.name.clone(),
                ));
            }
        }

        let usage = self.usage.unwrap_or_else(|| {
            self.arguments
                .iter()
                .map(|a| a.descriptor.usage(&a.name))
                .collect::<Vec<_>>()
                .join(" ")
        });

        Ok(Command {
            name: self.name,
            aliases: self.aliases,
            description: self.description,
            usage,
            examples: self.examples,
            category: self.category,
            tags: self.tags,
            cooldown: self.cooldown,
            client_permissions: self.client_permissions,
            user_permissions: self.user_permissions,
            channels: self.channels,
            arguments: self.arguments,
            run,
            subcommands: self.subcommands,
        })
    }
}

/// The identity and location of a single invocation, shared by every
/// stage of the pipeline. Derived from a message or an interaction.
#[derive(Clone, Debug)]
pub struct TriggerData {
    pub source: Source,
    pub channel_id: Id<ChannelMarker>,
    pub guild_id: Option<Id<GuildMarker>>,
    pub author: User,
    pub message: Option<Box<Message>>,
    pub interaction_id: Option<Id<InteractionMarker>>,
    pub interaction_token: Option<String>,
    pub calling_prefix: String,
}

impl TriggerData {
    /// The identity cooldowns and owner checks are keyed against. One
    /// derivation, used identically on every read and write.
    pub fn subject_id(&self) -> u64 {
        self.author.id.get()
    }
}

/// Passed to command bodies. Carries the handler, the trigger data, the
/// raw argument text and the memoized resolved arguments.
#[derive(Clone)]
pub struct CommandContext {
    corvid: ThreadSafeCorvid,
    pub data: Arc<TriggerData>,
    raw_args: String,
    args: OnceLock<ResolvedArguments>,
}

impl CommandContext {
    pub fn new(corvid: ThreadSafeCorvid, data: Arc<TriggerData>, raw_args: String) -> Self {
        Self {
            corvid,
            data,
            raw_args,
            args: OnceLock::new(),
        }
    }

    pub fn corvid(&self) -> &ThreadSafeCorvid {
        &self.corvid
    }

    /// The argument text as it was typed, before resolution.
    pub fn raw_args(&self) -> &str {
        &self.raw_args
    }

    /// The raw whitespace-delimited token list.
    pub fn tokens(&self) -> Vec<&str> {
        self.raw_args.split_ascii_whitespace().collect()
    }

    /// Stores the result of argument resolution. The first caller wins;
    /// a context never re-runs resolution for the same input.
    pub(crate) fn memoize_args(&self, args: ResolvedArguments) -> &ResolvedArguments {
        self.args.get_or_init(|| args)
    }

    pub fn args(&self) -> Option<&ResolvedArguments> {
        self.args.get()
    }

    /// A successfully resolved argument value, by declared name.
    pub fn argument(&self, name: &str) -> Option<&ResolvedValue> {
        self.args.get().and_then(|args| args.value(name))
    }

    pub async fn reply(&self, builder: impl Into<MessageBuilder>) -> anyhow::Result<()> {
        self.corvid.platform().reply(&self.data, builder.into()).await
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("data", &self.data)
            .field("raw_args", &self.raw_args)
            .finish_non_exhaustive()
    }
}
