//! Dialect-aware template rendering.
//!
//! Every artifact kind has one template. Dialect differences live inside it:
//!
//! ```text
//! import { Router } from 'express';
//! {{#typed}}
//! import type { Request, Response } from 'express';
//! {{/typed}}
//! export function list{{NAME}}(req{{#typed}}: Request{{/typed}}, res) { ... }
//! ```
//!
//! ## Rules
//!
//! - `{{#flag}}...{{/flag}}` keeps its body when `flag` is set, drops it
//!   otherwise. `typed` and `untyped` are always defined by the dialect.
//! - A section tag alone on its line takes its line break with it, so
//!   sections never leave blank lines behind.
//! - `{{KEY}}` is replaced by its variable. Unknown keys and sections with
//!   an unknown flag stay verbatim.
//!
//! Variables and flags live in `BTreeMap`s: rendering the same template with
//! the same context always produces the same bytes.

use std::collections::BTreeMap;

use crate::domain::naming::NameConvention;
use crate::domain::value_objects::Dialect;

#[derive(Debug, Clone)]
pub struct RenderContext {
    dialect: Dialect,
    variables: BTreeMap<String, String>,
    flags: BTreeMap<String, bool>,
}

impl RenderContext {
    /// Context with the dialect variables and flags filled in.
    ///
    /// | Variable | Typed | Untyped |
    /// |----------|-------|---------|
    /// | `EXT` | `ts` | `js` |
    /// | `DIALECT` | `typed` | `untyped` |
    /// | `LANGUAGE` | `TypeScript` | `JavaScript` |
    pub fn new(dialect: Dialect) -> Self {
        let mut variables = BTreeMap::new();
        variables.insert("EXT".to_string(), dialect.extension().to_string());
        variables.insert("DIALECT".to_string(), dialect.as_str().to_string());
        variables.insert("LANGUAGE".to_string(), dialect.language_name().to_string());

        let mut flags = BTreeMap::new();
        flags.insert("typed".to_string(), dialect.is_typed());
        flags.insert("untyped".to_string(), !dialect.is_typed());

        Self {
            dialect,
            variables,
            flags,
        }
    }

    /// Adds `NAME`, `NAME_CAMEL`, `NAME_KEBAB`, `NAME_SNAKE`, `NAME_CONST`
    /// and `NAME_PLURAL` derived from `name`.
    pub fn with_name(self, name: &NameConvention) -> Self {
        self.with_variable("NAME", name.type_name())
            .with_variable("NAME_CAMEL", name.camel_name())
            .with_variable("NAME_KEBAB", name.file_stem())
            .with_variable("NAME_SNAKE", name.snake_name())
            .with_variable("NAME_CONST", name.constant_name())
            .with_variable("NAME_PLURAL", name.plural_stem())
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>, enabled: bool) -> Self {
        self.flags.insert(flag.into(), enabled);
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn render(&self, template: &str) -> String {
        let sectioned = self.render_sections(template);
        self.substitute(&sectioned)
    }

    fn render_sections(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find("{{#") {
            let after_open = &rest[start + 3..];
            let Some(name_len) = after_open.find("}}") else {
                break;
            };
            let flag = &after_open[..name_len];
            let body_start = start + 3 + name_len + 2;

            let close_tag = format!("{{{{/{flag}}}}}");
            let (Some(active), Some(body_len)) = (
                self.flags.get(flag).copied(),
                rest[body_start..].find(&close_tag),
            ) else {
                out.push_str(&rest[..body_start]);
                rest = &rest[body_start..];
                continue;
            };

            out.push_str(&rest[..start]);
            let open_standalone = out.is_empty() || out.ends_with('\n');

            let mut body = &rest[body_start..body_start + body_len];
            let mut after_close = &rest[body_start + body_len + close_tag.len()..];

            if open_standalone {
                if let Some(stripped) = body.strip_prefix('\n') {
                    body = stripped;
                }
                if body.is_empty() || body.ends_with('\n') {
                    if let Some(stripped) = after_close.strip_prefix('\n') {
                        after_close = stripped;
                    }
                }
            }

            if active {
                out.push_str(&self.render_sections(body));
            }
            rest = after_close;
        }

        out.push_str(rest);
        out
    }

    fn substitute(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            match after.find("}}") {
                Some(end) if is_variable_key(&after[..end]) => {
                    let key = &after[..end];
                    match self.variables.get(key) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push_str("{{");
                            out.push_str(key);
                            out.push_str("}}");
                        }
                    }
                    rest = &after[end + 2..];
                }
                _ => {
                    out.push('{');
                    rest = &rest[start + 1..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

fn is_variable_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_sections_select_one_branch() {
        let template = "a{{#typed}}T{{/typed}}{{#untyped}}U{{/untyped}}b";
        assert_eq!(RenderContext::new(Dialect::Typed).render(template), "aTb");
        assert_eq!(RenderContext::new(Dialect::Untyped).render(template), "aUb");
    }

    #[test]
    fn standalone_section_lines_leave_no_blank_lines() {
        let template = "one\n{{#typed}}\ntyped line\n{{/typed}}\ntwo\n";
        assert_eq!(
            RenderContext::new(Dialect::Typed).render(template),
            "one\ntyped line\ntwo\n"
        );
        assert_eq!(
            RenderContext::new(Dialect::Untyped).render(template),
            "one\ntwo\n"
        );
    }

    #[test]
    fn inline_section_keeps_surrounding_text() {
        let template = "fn(req{{#typed}}: Request{{/typed}}, res)\n";
        assert_eq!(
            RenderContext::new(Dialect::Typed).render(template),
            "fn(req: Request, res)\n"
        );
        assert_eq!(
            RenderContext::new(Dialect::Untyped).render(template),
            "fn(req, res)\n"
        );
    }

    #[test]
    fn custom_flags_nest_inside_dialect_sections() {
        let ctx = RenderContext::new(Dialect::Typed).with_flag("redis", true);
        let template = "{{#typed}}[{{#redis}}r{{/redis}}]{{/typed}}";
        assert_eq!(ctx.render(template), "[r]");
        let ctx = RenderContext::new(Dialect::Typed).with_flag("redis", false);
        assert_eq!(ctx.render(template), "[]");
    }

    #[test]
    fn unknown_placeholders_and_sections_are_left_verbatim() {
        let ctx = RenderContext::new(Dialect::Untyped);
        assert_eq!(ctx.render("{{MISSING}}"), "{{MISSING}}");
        assert_eq!(ctx.render("{{#nope}}x{{/nope}}"), "{{#nope}}x{{/nope}}");
    }

    #[test]
    fn substitutes_name_variables() {
        let ctx = RenderContext::new(Dialect::Typed).with_name(&NameConvention::parse("blog post"));
        assert_eq!(
            ctx.render("{{NAME}} {{NAME_CAMEL}} {{NAME_KEBAB}} {{NAME_PLURAL}}.{{EXT}}"),
            "BlogPost blogPost blog-post blog-posts.ts"
        );
    }

    #[test]
    fn javascript_braces_survive() {
        let ctx = RenderContext::new(Dialect::Untyped).with_variable("NAME", "User");
        assert_eq!(
            ctx.render("res.json({{ ok: true }}); {{{NAME}}}"),
            "res.json({{ ok: true }}); {User}"
        );
    }

    #[test]
    fn values_are_not_rescanned() {
        let ctx = RenderContext::new(Dialect::Untyped).with_variable("A", "{{B}}");
        let ctx = ctx.with_variable("B", "no");
        assert_eq!(ctx.render("{{A}}"), "{{B}}");
    }

    #[test]
    fn rendering_is_deterministic() {
        let ctx = RenderContext::new(Dialect::Typed)
            .with_variable("Z", "1")
            .with_variable("A", "2");
        let template = "{{A}}{{Z}}{{#typed}}t{{/typed}}";
        assert_eq!(ctx.render(template), ctx.clone().render(template));
    }
}
