/// Where a command invocation came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    /// A prefixed text message.
    Message,
    /// An application command interaction with structured options.
    Interaction,
}
