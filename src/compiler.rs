//! Variable resolution for SCSS source text
//!
//! Compilation is a short text pipeline with no I/O:
//!
//! 1. Collect `$name: value;` declarations into a name -> value map
//! 2. Collect every `$name` usage (declaration names included)
//! 3. Strip the declarations from the text
//! 4. Substitute the remaining usages with their declared values
//! 5. Prepend one `/* Error: $name not defined. */` line per undefined name

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Sigil that starts every variable name
pub const VARIABLE_SIGIL: char = '$';

/// A bare variable token: `$` followed by word or hyphen characters
static VARIABLE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$[-\w]+").unwrap());

/// A full declaration, trailing whitespace included so stripping it does not
/// leave the line break behind.
static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<name>\$[-\w]+)[ \t]*:[ \t]*(?P<value>[^;\n]*[^;\s])[ \t]*;\s*").unwrap()
});

/// Output of a single compile, with the assignment map exposed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileResult {
    /// Final text: declarations stripped, usages substituted, diagnostics prepended
    pub css: String,

    /// The name -> value map actually used for substitution
    pub variables: HashMap<String, String>,

    /// Undefined names in first-seen order, one diagnostic line each
    pub undefined: Vec<String>,
}

impl CompileResult {
    pub fn has_errors(&self) -> bool {
        !self.undefined.is_empty()
    }
}

/// Stateless SCSS variable compiler
#[derive(Debug, Clone, Copy, Default)]
pub struct ScssCompiler;

impl ScssCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Compile `scss` and return only the final text
    pub fn compile(&self, scss: &str) -> String {
        self.debug_compile(scss).css
    }

    /// Compile `scss` and return the full result
    pub fn debug_compile(&self, scss: &str) -> CompileResult {
        let usages = self.usages(scss);
        let variables = self.assignments(scss);
        let stripped = self.strip_declarations(scss);
        let body = self.substitute(&stripped, &variables);

        let undefined: Vec<String> = usages
            .into_iter()
            .filter(|name| !variables.contains_key(name))
            .collect();

        let css = if undefined.is_empty() {
            body
        } else {
            for name in &undefined {
                log::warn!("Variable '{}' used but not defined", name);
            }
            let mut lines: Vec<String> = undefined.iter().map(|name| undefined_comment(name)).collect();
            lines.push(body);
            lines.join("\n")
        };

        CompileResult {
            css,
            variables,
            undefined,
        }
    }

    /// All declarations in source order, duplicates included
    pub fn declarations(&self, scss: &str) -> Vec<(String, String)> {
        DECLARATION
            .captures_iter(scss)
            .map(|caps| (caps["name"].to_string(), caps["value"].trim().to_string()))
            .collect()
    }

    /// Distinct variable names in first-seen order, declaration names included
    pub fn usages(&self, scss: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        VARIABLE_NAME
            .find_iter(scss)
            .map(|m| m.as_str())
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect()
    }

    /// Declaration map; a later declaration of the same name wins
    fn assignments(&self, scss: &str) -> HashMap<String, String> {
        let mut variables = HashMap::new();
        for (name, value) in self.declarations(scss) {
            log::debug!("Declared {} = '{}'", name, value);
            if let Some(previous) = variables.insert(name.clone(), value) {
                log::warn!("Variable '{}' redeclared, previous value '{}' discarded", name, previous);
            }
        }
        variables
    }

    fn strip_declarations(&self, scss: &str) -> String {
        DECLARATION.replace_all(scss, "").into_owned()
    }

    /// One replacement pass per map entry. Unlike a literal substring replace,
    /// only whole tokens are replaced, so `$c` never rewrites the front of
    /// `$color`. A value that itself contains another declared name may or may
    /// not be rewritten again, depending on map order.
    fn substitute(&self, text: &str, variables: &HashMap<String, String>) -> String {
        variables.iter().fold(text.to_string(), |current, (name, value)| {
            log::trace!("Substituting {} -> '{}'", name, value);
            VARIABLE_NAME
                .replace_all(&current, |caps: &Captures| {
                    if &caps[0] == name {
                        value.clone()
                    } else {
                        caps[0].to_string()
                    }
                })
                .into_owned()
        })
    }
}

/// True when `name` is a complete variable token such as `$font-stack`
pub fn is_variable_name(name: &str) -> bool {
    VARIABLE_NAME
        .find(name)
        .map_or(false, |m| m.start() == 0 && m.end() == name.len())
}

fn undefined_comment(name: &str) -> String {
    format!("/* Error: {} not defined. */", name)
}
