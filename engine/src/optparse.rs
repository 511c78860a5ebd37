//! Option-parsing delegate.
//!
//! The engine treats flag parsing as an opaque, GNU-flavored concern behind
//! the [`OptionParser`] trait: given the effective option schema and a token
//! vector (with the matched command-name words already stripped), produce a
//! map of matched options and the leftover positional tokens.
//!
//! [`GnuTokenParser`] is the default implementation. It accepts
//! single-dash short options (possibly multi-character, e.g. `-kv1`),
//! double-dash long options, inline `=value` forms, separate-token values,
//! and `--` as an end-of-options marker. Short-flag clustering is not
//! supported because short names may be multi-character.

use std::collections::HashMap;

use command_shell_core::{OptionSpec, ParseError};

/// Raw result of the option-parsing delegate: matched options (keyed by
/// canonical name) with their raw values, and the positional residual.
#[derive(Debug, Clone, Default)]
pub struct RawMatches {
    options: HashMap<String, Option<String>>,
    positionals: Vec<String>,
}

impl RawMatches {
    /// Whether the given option was matched. Checks both of its names.
    pub fn has(&self, spec: &OptionSpec) -> bool {
        self.lookup(spec).is_some()
    }

    /// The raw value matched for the given option, if the option was
    /// present. The inner `Option` is `None` for valueless options.
    pub fn value_of(&self, spec: &OptionSpec) -> Option<&Option<String>> {
        self.lookup(spec)
    }

    /// Leftover positional tokens in input order.
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// Records a matched option under its canonical name.
    pub fn insert(&mut self, spec: &OptionSpec, value: Option<String>) {
        self.options
            .insert(spec.canonical_name().to_string(), value);
    }

    /// Appends a positional token.
    pub fn push_positional(&mut self, token: String) {
        self.positionals.push(token);
    }

    fn lookup(&self, spec: &OptionSpec) -> Option<&Option<String>> {
        if let Some(short) = &spec.short
            && let Some(v) = self.options.get(short)
        {
            return Some(v);
        }
        if let Some(long) = &spec.long
            && let Some(v) = self.options.get(long)
        {
            return Some(v);
        }
        None
    }
}

/// The option-parsing delegate seam.
pub trait OptionParser {
    /// Parses `tokens` against the given option schema.
    fn parse(&self, options: &[OptionSpec], tokens: &[String]) -> Result<RawMatches, ParseError>;
}

/// Default GNU-style token parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct GnuTokenParser;

impl OptionParser for GnuTokenParser {
    fn parse(&self, options: &[OptionSpec], tokens: &[String]) -> Result<RawMatches, ParseError> {
        let mut matches = RawMatches::default();
        let mut no_more_options = false;

        let mut iter = tokens.iter();
        while let Some(token) = iter.next() {
            if !no_more_options && token == "--" {
                no_more_options = true;
                continue;
            }

            if no_more_options || !is_option_token(token) {
                matches.push_positional(token.clone());
                continue;
            }

            let body = token.trim_start_matches('-');
            debug_assert!(token.len() - body.len() <= 2);
            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (body, None),
            };

            let Some(spec) = options.iter().find(|o| o.matches(name)) else {
                return Err(ParseError::UnknownOption(token.clone()));
            };

            if spec.takes_value {
                let value = match inline {
                    Some(v) => v,
                    None => iter
                        .next()
                        .cloned()
                        .ok_or_else(|| ParseError::MissingOptionValue(name.to_string()))?,
                };
                matches.insert(spec, Some(value));
            } else {
                if inline.is_some() {
                    return Err(ParseError::UnexpectedOptionValue(name.to_string()));
                }
                matches.insert(spec, None);
            }
        }

        Ok(matches)
    }
}

/// A token is treated as an option when it starts with a dash and has a
/// non-dash body (`-` alone and `--` are handled by the caller).
fn is_option_token(token: &str) -> bool {
    let body = token.trim_start_matches('-');
    let dashes = token.len() - body.len();
    (dashes == 1 || dashes == 2) && !body.is_empty()
}
