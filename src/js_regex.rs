//! The regular-expression collaborator. The interpreter core never matches
//! text itself; it hands patterns to this wrapper, which keeps the backend
//! swappable behind a narrow seam.

use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone)]
pub(crate) struct Regex {
    backend: fancy_regex::Regex,
}

impl Regex {
    pub(crate) fn compile(
        pattern: &str,
        case_insensitive: bool,
        multi_line: bool,
    ) -> Result<Self, RegexError> {
        let mut builder = fancy_regex::RegexBuilder::new(pattern);
        builder.case_insensitive(case_insensitive);
        builder.multi_line(multi_line);
        let backend = builder.build().map_err(RegexError::from)?;
        Ok(Self { backend })
    }

    pub(crate) fn captures_from_pos(
        &self,
        input: &str,
        start: usize,
    ) -> Result<Option<Captures>, RegexError> {
        if start > input.len() {
            return Ok(None);
        }
        let captures = self
            .backend
            .captures_from_pos(input, start)
            .map_err(RegexError::from)?;
        Ok(captures.as_ref().map(Captures::from_backend))
    }

    pub(crate) fn find(&self, input: &str) -> Result<Option<Match>, RegexError> {
        let matched = self.backend.find(input).map_err(RegexError::from)?;
        Ok(matched.map(Match::from_backend))
    }

    pub(crate) fn find_all(&self, input: &str) -> Result<Vec<Match>, RegexError> {
        let mut out = Vec::new();
        for matched in self.backend.find_iter(input) {
            out.push(Match::from_backend(matched.map_err(RegexError::from)?));
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Captures {
    groups: Vec<Option<Match>>,
}

impl Captures {
    fn from_backend(captures: &fancy_regex::Captures<'_>) -> Self {
        let groups = (0..captures.len())
            .map(|idx| captures.get(idx).map(Match::from_backend))
            .collect();
        Self { groups }
    }

    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Match> {
        self.groups.get(index).and_then(Option::as_ref)
    }

    pub(crate) fn whole(&self) -> &Match {
        self.groups[0].as_ref().expect("group 0 always participates")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Match {
    start: usize,
    end: usize,
    text: String,
}

impl Match {
    fn from_backend(matched: fancy_regex::Match<'_>) -> Self {
        Self {
            start: matched.start(),
            end: matched.end(),
            text: matched.as_str().to_string(),
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        self.text.as_str()
    }

    pub(crate) fn start(&self) -> usize {
        self.start
    }

    pub(crate) fn end(&self) -> usize {
        self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RegexError {
    message: String,
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RegexError {}

impl From<fancy_regex::Error> for RegexError {
    fn from(value: fancy_regex::Error) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

pub(crate) fn escape(value: &str) -> Cow<'_, str> {
    let mut out = String::with_capacity(value.len());
    let mut changed = false;

    for ch in value.chars() {
        if is_regex_meta(ch) {
            out.push('\\');
            changed = true;
        }
        out.push(ch);
    }

    if changed { Cow::Owned(out) } else { Cow::Borrowed(value) }
}

fn is_regex_meta(ch: char) -> bool {
    matches!(
        ch,
        '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$' | '/'
    )
}
