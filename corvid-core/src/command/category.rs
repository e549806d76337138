use std::fmt::Display;

/// Command category, used for grouping in help output.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Category {
    Fun,
    Misc,
    Moderation,
    Utility,
    None(String),
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Fun => "fun",
                Self::Misc => "misc",
                Self::Moderation => "moderation",
                Self::Utility => "utility",
                Self::None(t) => &**t,
            }
        )
    }
}

impl From<String> for Category {
    fn from(v: String) -> Category {
        match &*v {
            "fun" => Category::Fun,
            "misc" => Category::Misc,
            "moderation" => Category::Moderation,
            "utility" => Category::Utility,
            t => Category::None(t.to_string()),
        }
    }
}
