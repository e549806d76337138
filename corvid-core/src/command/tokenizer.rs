use corvid_common::util::regex::NAMED_ARGUMENT;

/// An explicitly-named `name:value` token found anywhere in the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedToken {
    /// Lowercased token name.
    pub name: String,
    pub data: String,
    /// Byte span of the whole token in the original input, for stripping.
    pub span: (usize, usize),
}

/// A cursor over the raw argument string.
///
/// The cursor position is a plain byte offset, snapshotted and restored
/// by value when a trial parse has to be undone. All methods are purely
/// lexical; no validation happens here.
#[derive(Clone, Debug)]
pub struct TokenCursor<'a> {
    input: &'a str,
    index: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, index: 0 }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index.min(self.input.len());
    }

    pub fn has_next(&self) -> bool {
        !self.input[self.index..].trim_start().is_empty()
    }

    /// Returns the next whitespace-delimited token and advances the
    /// cursor past it.
    pub fn parse_next(&mut self) -> Option<&'a str> {
        let rest = &self.input[self.index..];
        let skipped = rest.len() - rest.trim_start().len();
        let start = self.index + skipped;

        if start >= self.input.len() {
            self.index = self.input.len();
            return None;
        }

        let token = &self.input[start..];
        let length = token.find(char::is_whitespace).unwrap_or(token.len());
        self.index = start + length;
        Some(&self.input[start..start + length])
    }

    /// Returns everything from the cursor to the end of input, with
    /// internal spacing preserved, and advances the cursor to the end.
    pub fn consume_remaining(&mut self) -> &'a str {
        let rest = self.input[self.index..].trim_start();
        self.index = self.input.len();
        rest
    }

    /// Pre-pass: finds every `name:value` token in the whole input
    /// without consuming the cursor. Values may be bare words or
    /// double-quoted to include whitespace.
    pub fn parse_named(&self) -> Vec<NamedToken> {
        let mut named = vec![];

        for captures in NAMED_ARGUMENT.captures_iter(self.input) {
            let whole = captures.get(0).unwrap();

            // only whole tokens count; `name:value` embedded in the middle
            // of a larger token (e.g. a URL path) is not a named token
            let starts_token = whole.start() == 0
                || self.input[..whole.start()].ends_with(char::is_whitespace);
            let ends_token = whole.end() == self.input.len()
                || self.input[whole.end()..].starts_with(char::is_whitespace);
            if !starts_token || !ends_token {
                continue;
            }

            let data = captures
                .get(2)
                .or_else(|| captures.get(3))
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default();

            named.push(NamedToken {
                name: captures[1].to_lowercase(),
                data,
                span: (whole.start(), whole.end()),
            });
        }

        named
    }
}
