//! Name derivation for generated artifacts.
//!
//! A free-form name such as `"blog post"`, `"BlogPost"` or `"blog_post"` is
//! split into lowercase words once; every casing the templates need is
//! derived from those words.
//!
//! ## Word Boundary Detection
//!
//! 1. **Explicit separators:** `_`, `-`, whitespace
//! 2. **camelCase transition:** `aB` splits between `a` and `B`
//! 3. **Acronym boundary:** `HTTPServer` splits between `P` and `S`
//!
//! | Input | stem | type | camel |
//! |-------|------|------|-------|
//! | `"user"` | `user` | `User` | `user` |
//! | `"BlogPost"` | `blog-post` | `BlogPost` | `blogPost` |
//! | `"HTTPServer"` | `http-server` | `HttpServer` | `httpServer` |
//! | `"UserController"` (controller) | `user` | `UserController` | `userController` |
//! | `"UserController"` (resource) | `user` | `User` | `user` |

use crate::domain::value_objects::SchematicKind;

/// Words of a name, with any role suffix already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameConvention {
    words: Vec<String>,
}

impl NameConvention {
    /// Split a name into words without role handling.
    pub fn parse(raw: &str) -> Self {
        Self {
            words: split_words(raw),
        }
    }

    /// Split a name and strip a trailing role suffix for `kind`.
    ///
    /// `UserController` for the controller role yields the words `[user]`.
    /// A name that is only the suffix keeps its words.
    pub fn for_role(raw: &str, kind: SchematicKind) -> Self {
        let mut words = split_words(raw);

        for suffix in kind.role_suffixes() {
            let suffix_words = split_words(suffix);
            if words.len() > suffix_words.len() && words.ends_with(&suffix_words) {
                words.truncate(words.len() - suffix_words.len());
                break;
            }
        }

        Self { words }
    }

    /// Split a name and strip whichever member role suffix it ends with.
    ///
    /// A resource fans out to several roles, so `UserController` and
    /// `UserService` both name the `user` resource.
    pub fn for_resource(raw: &str) -> Self {
        SchematicKind::ALL
            .iter()
            .map(|&kind| Self::for_role(raw, kind))
            .min_by_key(|name| name.words.len())
            .unwrap_or_else(|| Self::parse(raw))
    }

    /// Whether `raw` already ends with one of `kind`'s role suffixes.
    pub fn has_role_suffix(raw: &str, kind: SchematicKind) -> bool {
        let words = split_words(raw);
        kind.role_suffixes()
            .iter()
            .any(|suffix| words.ends_with(&split_words(suffix)))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// lower-kebab file stem.
    pub fn file_stem(&self) -> String {
        self.words.join("-")
    }

    pub fn snake_name(&self) -> String {
        self.words.join("_")
    }

    /// SCREAMING_SNAKE, for environment keys.
    pub fn constant_name(&self) -> String {
        self.snake_name().to_uppercase()
    }

    /// PascalCase type identifier.
    pub fn type_name(&self) -> String {
        self.words.iter().map(|w| capitalize(w)).collect()
    }

    pub fn camel_name(&self) -> String {
        let mut iter = self.words.iter();
        let mut out = iter.next().cloned().unwrap_or_default();
        for word in iter {
            out.push_str(&capitalize(word));
        }
        out
    }

    /// Type identifier with `suffix` appended exactly once.
    pub fn type_name_with(&self, suffix: &str) -> String {
        append_once(self.type_name(), suffix)
    }

    /// camelCase identifier with `suffix` appended exactly once.
    pub fn camel_name_with(&self, suffix: &str) -> String {
        append_once(self.camel_name(), suffix)
    }

    /// Plural kebab form, used for route paths (`blog-post` -> `blog-posts`).
    pub fn plural_stem(&self) -> String {
        let stem = self.file_stem();
        pluralize(&stem)
    }
}

fn append_once(base: String, suffix: &str) -> String {
    if suffix.is_empty() || base.ends_with(suffix) {
        base
    } else {
        base + suffix
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

fn pluralize(word: &str) -> String {
    if word.ends_with('s') || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh")
    {
        if word.ends_with('s') {
            return word.to_string();
        }
        return format!("{word}es");
    }

    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last();
        if before.is_some_and(|c| !"aeiou".contains(c)) {
            return format!("{stem}ies");
        }
    }

    format!("{word}s")
}

fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            // myApp -> my + App
            if (c.is_lowercase() || c.is_ascii_digit()) && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            // HTTPServer -> HTTP + Server
            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
