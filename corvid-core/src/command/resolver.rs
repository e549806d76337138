//! The argument resolution algorithm.
//!
//! Walks a command's declared arguments, in declaration order, against
//! tokenized free text or structured interaction options, and produces a
//! [ResolvedArguments] map: one entry per visited argument holding either
//! a typed value, an "absent" marker, or a classified error. Malformed
//! user input never surfaces as a raw error from here; the resolver
//! always terminates with a map.

use std::collections::HashMap;

use twilight_model::application::interaction::application_command::{CommandDataOption, CommandOptionValue};

use super::arguments::{ArgumentShape, CommandArgument, ResolvedValue};
use super::errors::CommandError;
use super::tokenizer::TokenCursor;
use super::TriggerData;
use crate::corvid::Corvid;

/// Ambient context available to validators and parsers while an
/// invocation is being resolved.
pub struct ResolutionContext<'a> {
    pub corvid: &'a Corvid,
    pub data: &'a TriggerData,
}

/// The outcome for a single declared argument.
#[derive(Clone, Debug)]
pub enum ResolvedArgument {
    Value(ResolvedValue),
    /// Declared skippable and not provided.
    Absent,
    Errored(CommandError),
}

/// One resolution attempt's results, keyed by declared argument name.
/// Built incrementally, finalized once every declared argument has been
/// visited, and memoized on the command context afterwards.
#[derive(Clone, Debug, Default)]
pub struct ResolvedArguments {
    map: HashMap<String, ResolvedArgument>,
}

impl ResolvedArguments {
    pub fn get(&self, name: &str) -> Option<&ResolvedArgument> {
        self.map.get(name)
    }

    /// A successfully parsed value, if the argument resolved to one.
    pub fn value(&self, name: &str) -> Option<&ResolvedValue> {
        match self.map.get(name) {
            Some(ResolvedArgument::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn insert(&mut self, name: String, result: ResolvedArgument) {
        self.map.insert(name, result);
    }

    /// The first classified error in declaration order, if any.
    pub fn first_error(&self, declared: &[CommandArgument]) -> Option<&CommandError> {
        declared.iter().find_map(|argument| match self.map.get(&argument.name) {
            Some(ResolvedArgument::Errored(error)) => Some(error),
            _ => None,
        })
    }
}

/// Result of resolving free text: the finished map plus the input left
/// over for subcommand dispatch.
#[derive(Clone, Debug)]
pub struct TextResolution {
    pub arguments: ResolvedArguments,
    pub remainder: String,
}

/// Resolves raw text against a declared argument list.
///
/// Named `name:value` overrides are collected in a pre-pass and stripped
/// from the positional stream; positional parsing prefers an override
/// whenever one names the argument being parsed. Failed trial parses of
/// skippable arguments restore the cursor to its exact prior index so a
/// later argument can claim the same tokens.
pub async fn resolve_text(
    declared: &[CommandArgument],
    raw: &str,
    ctxt: &ResolutionContext<'_>,
) -> TextResolution {
    // pre-pass: named overrides, matched case-insensitively against
    // declared names. Tokens that name no declared argument stay in the
    // positional stream untouched.
    let mut overrides: HashMap<String, Vec<String>> = HashMap::new();
    let mut spans = vec![];
    for token in TokenCursor::new(raw).parse_named() {
        let Some(argument) = declared.iter().find(|a| a.name.to_lowercase() == token.name) else {
            continue;
        };
        overrides.entry(argument.name.clone()).or_default().push(token.data);
        spans.push(token.span);
    }

    let mut positional = String::with_capacity(raw.len());
    let mut copied_to = 0;
    for (start, end) in spans {
        positional.push_str(&raw[copied_to..start]);
        copied_to = end;
    }
    positional.push_str(&raw[copied_to..]);

    let mut cursor = TokenCursor::new(&positional);
    let mut results = ResolvedArguments::default();

    for (index, argument) in declared.iter().enumerate() {
        let descriptor = &argument.descriptor;
        let named_values = overrides.get(&argument.name);
        let more_remaining = index + 1 < declared.len();

        // nothing anywhere for this argument: leave it unrecorded and let
        // the post-pass decide whether that is an error. Required
        // arguments reached later through out-of-order named overrides
        // must not have their tokens eaten here.
        if !cursor.has_next() && named_values.is_none() && descriptor.default().is_none() {
            continue;
        }

        let snapshot = cursor.index();
        let mut to_parse = match named_values {
            Some(values) => values.first().cloned().unwrap_or_default(),
            None => cursor.parse_next().unwrap_or("").to_owned(),
        };

        let mut pending_error = None;
        if !descriptor.kind().validate(&to_parse, ctxt).await {
            pending_error = Some(CommandError::invalid_argument(
                &argument.name,
                format_args!("expected {}", descriptor.kind().name()),
            ));
        }

        let parsed = descriptor.kind().parse(&to_parse, ctxt).await;

        if let Some(values) = named_values {
            if values.len() != 1 {
                pending_error = Some(CommandError::invalid_argument(
                    &argument.name,
                    "requires exactly one value",
                ));
            }
        }

        let result = match descriptor.shape() {
            ArgumentShape::Simple => {
                if let Some(error) = pending_error {
                    ResolvedArgument::Errored(error)
                } else if let Some(value) = parsed {
                    ResolvedArgument::Value(value)
                } else {
                    ResolvedArgument::Errored(CommandError::argument_not_found(&argument.name))
                }
            },
            ArgumentShape::Defaulted => {
                if let Some(value) = parsed {
                    ResolvedArgument::Value(value)
                } else {
                    // give the failed token back so a later argument can
                    // claim it
                    if more_remaining && named_values.is_none() {
                        cursor.set_index(snapshot);
                    }
                    match descriptor.default() {
                        Some(default) => ResolvedArgument::Value(default.clone()),
                        None => ResolvedArgument::Errored(CommandError::other(
                            "argument declaration reached an impossible shape",
                        )),
                    }
                }
            },
            ArgumentShape::Optional => {
                if let Some(value) = parsed {
                    ResolvedArgument::Value(value)
                } else if more_remaining {
                    if named_values.is_none() {
                        cursor.set_index(snapshot);
                    }
                    // treated as absent; not recorded this round
                    continue;
                } else {
                    ResolvedArgument::Absent
                }
            },
            ArgumentShape::Coalescing => {
                match named_values {
                    Some(_) => {
                        // a named override stands in for the remainder;
                        // conflicting leftover positional text is an
                        // error, never a silent truncation
                        let leftover = cursor.clone().consume_remaining().to_owned();
                        if !leftover.is_empty() && leftover != to_parse {
                            pending_error = Some(CommandError::invalid_argument(
                                &argument.name,
                                "conflicting positional and named values",
                            ));
                        }
                    },
                    None => {
                        cursor.set_index(snapshot);
                        to_parse = cursor.consume_remaining().to_owned();
                    },
                }

                if !descriptor.kind().validate(&to_parse, ctxt).await && pending_error.is_none() {
                    pending_error = Some(CommandError::invalid_argument(
                        &argument.name,
                        format_args!("expected {}", descriptor.kind().name()),
                    ));
                }
                let parsed = descriptor.kind().parse(&to_parse, ctxt).await;

                match parsed {
                    // a successfully coalesced value beats the default
                    Some(value) if pending_error.is_none() || descriptor.is_skippable() => {
                        ResolvedArgument::Value(value)
                    },
                    _ => {
                        if let Some(default) = descriptor.default() {
                            ResolvedArgument::Value(default.clone())
                        } else if descriptor.is_optional() {
                            ResolvedArgument::Absent
                        } else if let Some(error) = pending_error {
                            ResolvedArgument::Errored(error)
                        } else {
                            ResolvedArgument::Errored(CommandError::argument_not_found(&argument.name))
                        }
                    },
                }
            },
        };

        results.insert(argument.name.clone(), result);
    }

    // every required argument still missing after the whole list has been
    // walked gets an explicit error entry, never a silently-missing key
    for argument in declared {
        if !argument.descriptor.is_skippable() && results.get(&argument.name).is_none() {
            results.insert(
                argument.name.clone(),
                ResolvedArgument::Errored(CommandError::argument_not_found(&argument.name)),
            );
        }
    }

    let remainder = cursor.consume_remaining().to_owned();

    TextResolution {
        arguments: results,
        remainder,
    }
}

fn option_value_to_raw(value: &CommandOptionValue) -> Option<String> {
    match value {
        CommandOptionValue::String(v) => Some(v.clone()),
        CommandOptionValue::Integer(v) => Some(v.to_string()),
        CommandOptionValue::Number(v) => Some(v.to_string()),
        CommandOptionValue::Boolean(v) => Some(v.to_string()),
        CommandOptionValue::User(id) => Some(id.to_string()),
        CommandOptionValue::Channel(id) => Some(id.to_string()),
        CommandOptionValue::Role(id) => Some(id.to_string()),
        CommandOptionValue::Mentionable(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Resolves structured interaction options against a declared argument
/// list. Bypasses the tokenizer but produces the same map shape as
/// [resolve_text], so everything downstream is source-agnostic.
pub async fn resolve_options(
    declared: &[CommandArgument],
    options: &[CommandDataOption],
    ctxt: &ResolutionContext<'_>,
) -> ResolvedArguments {
    let mut results = ResolvedArguments::default();

    for argument in declared {
        let descriptor = &argument.descriptor;
        let option = options.iter().find(|o| o.name.eq_ignore_ascii_case(&argument.name));

        let Some(option) = option else {
            if let Some(default) = descriptor.default() {
                results.insert(argument.name.clone(), ResolvedArgument::Value(default.clone()));
            } else if !descriptor.is_optional() {
                results.insert(
                    argument.name.clone(),
                    ResolvedArgument::Errored(CommandError::argument_not_found(&argument.name)),
                );
            }
            continue;
        };

        let result = match option_value_to_raw(&option.value) {
            None => ResolvedArgument::Errored(CommandError::invalid_argument(
                &argument.name,
                "unsupported option type",
            )),
            Some(raw) => {
                let valid = descriptor.kind().validate(&raw, ctxt).await;
                let parsed = descriptor.kind().parse(&raw, ctxt).await;

                match parsed {
                    Some(value) if valid || descriptor.is_skippable() => ResolvedArgument::Value(value),
                    _ => {
                        if let Some(default) = descriptor.default() {
                            ResolvedArgument::Value(default.clone())
                        } else if descriptor.is_optional() {
                            ResolvedArgument::Absent
                        } else if valid {
                            ResolvedArgument::Errored(CommandError::argument_not_found(&argument.name))
                        } else {
                            ResolvedArgument::Errored(CommandError::invalid_argument(
                                &argument.name,
                                format_args!("expected {}", descriptor.kind().name()),
                            ))
                        }
                    },
                }
            },
        };

        results.insert(argument.name.clone(), result);
    }

    results
}
