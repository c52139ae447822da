//! # Usage and Help Rendering
//!
//! Help pages are rendered from the same schemas the parser binds against, so
//! the two can never drift apart.
//!
//! Layout math (column alignment, wrapping long labels onto their own line)
//! stays in Rust because it needs display widths. The template only decides
//! section structure and which style a piece of text gets. Styles are applied
//! through a `style` filter; with colors off the filter is a no-op.
//!
//! Short usage lines (the ones attached to parse errors) are always plain.

use crate::schema::{DefaultSpec, OptionField, OptionKind, OptionSchema};
use console::{Style, Term};
use minijinja::{Environment, Value};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use unicode_width::UnicodeWidthStr;

const HELP_COLUMN: usize = 26;
const ROW_INDENT: &str = "  ";
const COMMAND_INDENT: &str = "    ";

static HELP_THEME: Lazy<HashMap<&'static str, Style>> = Lazy::new(|| {
    HashMap::from([
        ("usage", Style::new().bold()),
        ("heading", Style::new().yellow().bold()),
        ("flag", Style::new().green()),
        ("positional", Style::new().cyan()),
        ("command", Style::new().cyan().bold()),
        ("hint", Style::new().dim()),
    ])
});

const HELP_TEMPLATE: &str = r#"{{ usage | style("usage") }}
{%- if about %}

{{ about }}
{%- endif %}
{%- for section in sections %}

{{ section.title | style("heading") }}
{%- for row in section.rows %}
{{ row.indent }}{{ row.label | style(row.style) }}{{ row.pad }}{{ row.help }}{% if row.help and row.hint %} {% endif %}{% if row.hint %}{{ row.hint | style("hint") }}{% endif %}
{%- endfor %}
{%- endfor %}
{%- if epilog %}

{{ epilog }}
{%- endif %}"#;

/// Everything needed to render one help page.
pub(crate) struct HelpPage<'a> {
    pub usage: String,
    pub about: &'a str,
    pub schema: &'a OptionSchema,
    /// (name, description) of the commands reachable through the selector.
    pub commands: Vec<(&'a str, &'a str)>,
    pub epilog: &'a str,
}

#[derive(Serialize)]
struct HelpData {
    usage: String,
    about: String,
    sections: Vec<Section>,
    epilog: String,
}

#[derive(Serialize)]
struct Section {
    title: &'static str,
    rows: Vec<Row>,
}

#[derive(Serialize)]
struct Row {
    indent: &'static str,
    label: String,
    pad: String,
    help: String,
    hint: String,
    style: &'static str,
}

impl Row {
    fn new(
        indent: &'static str,
        label: String,
        help: &str,
        hint: String,
        style: &'static str,
    ) -> Self {
        let pad = if help.is_empty() && hint.is_empty() {
            String::new()
        } else {
            let used = indent.width() + label.width();
            if used + 2 <= HELP_COLUMN {
                " ".repeat(HELP_COLUMN - used)
            } else {
                format!("\n{}", " ".repeat(HELP_COLUMN))
            }
        };
        Self {
            indent,
            label,
            pad,
            help: help.to_string(),
            hint,
            style,
        }
    }
}

pub(crate) fn colors_supported() -> bool {
    Term::stdout().features().colors_supported()
}

/// One-line synopsis: flags first, then positionals, then the selector.
pub(crate) fn usage_line(path: &str, schema: &OptionSchema) -> String {
    let mut parts = vec![format!("usage: {}", path)];

    for field in schema.flags() {
        let synopsis = match field.kind() {
            OptionKind::Bool => format!("--{}", field.name()),
            _ => format!("--{} {}", field.name(), field.display_metavar()),
        };
        if field.is_required() {
            parts.push(synopsis);
        } else {
            parts.push(format!("[{}]", synopsis));
        }
    }
    for field in schema.positionals() {
        if field.is_required() {
            parts.push(format!("<{}>", field.display_metavar()));
        } else {
            parts.push(format!("[<{}>]", field.display_metavar()));
        }
    }
    if let Some(selector) = schema.selector() {
        parts.push(format!("<{}> ...", selector.display_metavar()));
    }

    parts.join(" ")
}

fn hint(field: &OptionField) -> String {
    let mut hints = Vec::new();
    if field.is_required() {
        hints.push("(required)".to_string());
    }
    match field.default_spec() {
        DefaultSpec::None => {}
        DefaultSpec::Literal(text) => hints.push(format!("[default: {}]", text)),
        DefaultSpec::Env { var, fallback } => {
            hints.push(format!("[env: {}]", var));
            if let Some(fallback) = fallback {
                hints.push(format!("[default: {}]", fallback));
            }
        }
    }
    hints.join(" ")
}

fn build_sections(page: &HelpPage<'_>) -> Vec<Section> {
    let mut sections = Vec::new();

    let mut positional_rows: Vec<Row> = page
        .schema
        .positionals()
        .map(|field| {
            Row::new(
                ROW_INDENT,
                format!("<{}>", field.display_metavar()),
                field.help_text(),
                hint(field),
                "positional",
            )
        })
        .collect();
    if let Some(selector) = page.schema.selector() {
        positional_rows.push(Row::new(
            ROW_INDENT,
            format!("<{}>", selector.display_metavar()),
            selector.help_text(),
            String::new(),
            "positional",
        ));
        positional_rows.extend(page.commands.iter().map(|(name, description)| {
            Row::new(
                COMMAND_INDENT,
                name.to_string(),
                description,
                String::new(),
                "command",
            )
        }));
    }
    if !positional_rows.is_empty() {
        sections.push(Section {
            title: "Positional arguments:",
            rows: positional_rows,
        });
    }

    let mut flag_rows = Vec::new();
    if page.schema.flag("help").is_none() {
        flag_rows.push(Row::new(
            ROW_INDENT,
            "-h, --help".to_string(),
            "Show help",
            String::new(),
            "flag",
        ));
    }
    for field in page.schema.flags() {
        let label = match (field.kind(), field.name()) {
            (OptionKind::Bool, "help") => "-h, --help".to_string(),
            (OptionKind::Bool, name) => format!("--{}", name),
            (_, name) => format!("--{} {}", name, field.display_metavar()),
        };
        flag_rows.push(Row::new(
            ROW_INDENT,
            label,
            field.help_text(),
            hint(field),
            "flag",
        ));
    }
    sections.push(Section {
        title: "Optional arguments:",
        rows: flag_rows,
    });

    sections
}

fn register_style_filter(env: &mut Environment<'static>, use_color: bool) {
    env.add_filter("style", move |value: Value, name: String| -> String {
        let text = value.to_string();
        match HELP_THEME.get(name.as_str()) {
            Some(style) if use_color => {
                style.clone().force_styling(true).apply_to(text).to_string()
            }
            _ => text,
        }
    });
}

/// Renders a full help page; the result ends with a newline.
pub(crate) fn render_help(page: &HelpPage<'_>, use_color: bool) -> String {
    let data = HelpData {
        usage: page.usage.clone(),
        about: page.about.to_string(),
        sections: build_sections(page),
        epilog: page.epilog.to_string(),
    };

    let mut env = Environment::new();
    register_style_filter(&mut env, use_color);

    let rendered = env
        .template_from_str(HELP_TEMPLATE)
        .and_then(|tmpl| tmpl.render(&data));
    match rendered {
        Ok(text) => format!("{}\n", text),
        Err(err) => {
            tracing::warn!(%err, "help template failed to render");
            format!("{}\n", page.usage)
        }
    }
}
