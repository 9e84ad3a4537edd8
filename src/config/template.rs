//! URL and path templates.
//!
//! Download locations are written with Go-template style placeholders so the
//! same string can be resolved for every platform.
//!
//! # Syntax
//!
//! - `{{.VERSION}}` - the tool version being installed
//! - `{{.GOOS}}` - operating system, after any vendor rename
//! - `{{.GOARCH}}` - architecture, after any vendor rename
//! - `{{.EXT}}` - archive or executable extension, depending on context
//!
//! Whitespace inside the braces is ignored, so `{{ .VERSION }}` also works.
//!
//! # Example
//!
//! ```
//! use toolgate::config::{render, TemplateVars};
//!
//! let vars = TemplateVars {
//!     version: "v0.10.0".to_string(),
//!     goos: "linux".to_string(),
//!     goarch: "amd64".to_string(),
//!     ext: String::new(),
//! };
//! let url = render("kind-{{.GOOS}}-{{.GOARCH}}/{{.VERSION}}", &vars).unwrap();
//! assert_eq!(url, "kind-linux-amd64/v0.10.0");
//! ```

use crate::error::{Result, ToolsError};

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Placeholder reference: {{.NAME}}
    Field(String),
}

/// Values substituted into a template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateVars {
    pub version: String,
    pub goos: String,
    pub goarch: String,
    pub ext: String,
}

impl TemplateVars {
    /// Resolve a placeholder name to its value.
    pub fn resolve(&self, field: &str) -> Option<&str> {
        match field {
            "VERSION" => Some(&self.version),
            "GOOS" => Some(&self.goos),
            "GOARCH" => Some(&self.goarch),
            "EXT" => Some(&self.ext),
            _ => None,
        }
    }
}

fn template_error(template: &str, message: impl Into<String>) -> ToolsError {
    ToolsError::Template {
        template: template.to_string(),
        message: message.into(),
    }
}

/// Parse a template into literal and placeholder segments.
///
/// # Errors
///
/// Returns `Template` for an unterminated `{{` or a placeholder that is not
/// a `.FIELD` reference.
pub fn parse_template(input: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = input;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            segments.push(Segment::Literal(rest[..start].to_string()));
        }

        let after_open = &rest[start + 2..];
        let end = after_open
            .find("}}")
            .ok_or_else(|| template_error(input, "unterminated '{{'"))?;

        let action = after_open[..end].trim();
        let field = action
            .strip_prefix('.')
            .filter(|name| !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
            .ok_or_else(|| template_error(input, format!("unsupported action '{{{{{}}}}}'", action)))?;

        segments.push(Segment::Field(field.to_string()));
        rest = &after_open[end + 2..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }

    Ok(segments)
}

/// Render a template with the given values.
///
/// # Errors
///
/// Returns `Template` if the template is malformed or names a field that
/// [`TemplateVars`] does not provide.
pub fn render(input: &str, vars: &TemplateVars) -> Result<String> {
    let mut result = String::with_capacity(input.len());

    for segment in parse_template(input)? {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Field(name) => {
                let value = vars
                    .resolve(&name)
                    .ok_or_else(|| template_error(input, format!("unknown field '.{}'", name)))?;
                result.push_str(value);
            }
        }
    }

    Ok(result)
}
