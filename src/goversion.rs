//! Go toolchain version gate.
//!
//! Builds often need a minimum Go release. [`enforce_go_version`] asks the
//! installed toolchain for its version and checks it against a semver
//! constraint such as `>=1.16`.
//!
//! Go reports versions like `go1.16` or `go1.22rc1`, which are not strict
//! semver, so parsing is lenient: missing components become `0` and a
//! Go-style pre-release suffix becomes a semver pre-release
//! (`1.22rc1` → `1.22.0-rc1`).
//!
//! Constraints accept comma- or space-separated comparators, `||`
//! alternatives, hyphen ranges and `!=`: `>=1.16, <2 || =1.15.15`,
//! `1.16 - 1.18`, `>=1.16 !=1.17.0`.

use crate::config::ToolsConfig;
use crate::error::{Result, ToolsError};
use crate::shell::{execute, CommandOptions};
use regex::Regex;
use semver::{Version, VersionReq};
use std::fmt;
use std::sync::LazyLock;

static RE_LENIENT_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^v?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z.-]+)|((?:alpha|beta|rc)\d*))?(?:\+([0-9A-Za-z.-]+))?$",
    )
    .expect("version pattern is valid")
});

const OPERATOR_CHARS: &str = "=<>~^!";

/// A parsed version constraint: any one of the comparator sets must match.
#[derive(Debug, Clone)]
pub struct Constraint {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl Constraint {
    /// Parse a constraint expression.
    ///
    /// # Errors
    ///
    /// Returns `ConstraintParse` if any alternative is empty or invalid.
    pub fn parse(constraint: &str) -> Result<Self> {
        let invalid = |message: String| ToolsError::ConstraintParse {
            constraint: constraint.to_string(),
            message,
        };

        let mut alternatives = Vec::new();
        for part in constraint.split("||") {
            for normalized in normalize_comparators(part) {
                if normalized.is_empty() {
                    return Err(invalid("empty comparator set".to_string()));
                }
                let req = VersionReq::parse(&normalized).map_err(|e| invalid(e.to_string()))?;
                alternatives.push(req);
            }
        }

        Ok(Self {
            raw: constraint.trim().to_string(),
            alternatives,
        })
    }

    /// Whether `version` satisfies any alternative.
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

enum Comparator {
    Required(String),
    /// `!=X`, satisfied by anything below or above `X`.
    Excluded(String),
}

fn strip_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        .unwrap_or(version)
}

/// Rewrite a comparator set into the comma-separated sets `VersionReq`
/// expects. More than one set comes back when the input uses `!=`.
///
/// - a bare operator stays attached to its version (`>= 1.16 < 2` →
///   `>=1.16, <2`)
/// - a `v` before the version is dropped (`>=v1.16` → `>=1.16`)
/// - a version without an operator means exactly that release when all
///   three components are given, otherwise the tilde range (`1.16` →
///   `~1.16`)
/// - a hyphen range is inclusive at both ends (`1.16 - 1.18` →
///   `>=1.16, <=1.18`)
/// - `!=X` splits the set in two (`>=1.16 !=1.17.0` → `>=1.16, <1.17.0`
///   and `>=1.16, >1.17.0`)
fn normalize_comparators(part: &str) -> Vec<String> {
    let tokens: Vec<&str> = part
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect();

    let mut comparators = Vec::new();
    let mut pending_op: Option<&str> = None;
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];

        if pending_op.is_none() && tokens.get(i + 1) == Some(&"-") {
            if let Some(upper) = tokens.get(i + 2) {
                comparators.push(Comparator::Required(format!(">={}", strip_v(token))));
                comparators.push(Comparator::Required(format!("<={}", strip_v(upper))));
                i += 3;
                continue;
            }
        }
        i += 1;

        let split = token
            .find(|c: char| !OPERATOR_CHARS.contains(c))
            .unwrap_or(token.len());
        let (glued_op, version) = token.split_at(split);

        if version.is_empty() {
            pending_op = Some(glued_op);
            continue;
        }

        let mut op = pending_op.take().unwrap_or_default().to_string();
        op.push_str(glued_op);
        let version = strip_v(version);

        if op == "!=" {
            comparators.push(Comparator::Excluded(version.to_string()));
            continue;
        }

        if op.is_empty() && version.chars().all(|c| c.is_ascii_digit() || c == '.') {
            op = if version.split('.').count() >= 3 { "=" } else { "~" }.to_string();
        }

        comparators.push(Comparator::Required(format!("{}{}", op, version)));
    }

    if let Some(op) = pending_op {
        // Dangling operator; let VersionReq report it.
        comparators.push(Comparator::Required(op.to_string()));
    }

    let mut sets: Vec<Vec<String>> = vec![Vec::new()];
    for comparator in comparators {
        match comparator {
            Comparator::Required(c) => sets.iter_mut().for_each(|set| set.push(c.clone())),
            Comparator::Excluded(version) => {
                sets = sets
                    .into_iter()
                    .flat_map(|set| {
                        ["<", ">"].map(|op| {
                            let mut split = set.clone();
                            split.push(format!("{}{}", op, version));
                            split
                        })
                    })
                    .collect();
            }
        }
    }

    sets.into_iter().map(|set| set.join(", ")).collect()
}

/// Parse a version string leniently (see module docs).
///
/// # Errors
///
/// Returns `VersionParse` if the string is not a recognizable version.
pub fn parse_version(value: &str) -> Result<Version> {
    let invalid = |message: &str| ToolsError::VersionParse {
        value: value.to_string(),
        message: message.to_string(),
    };

    let caps = RE_LENIENT_VERSION
        .captures(value.trim())
        .ok_or_else(|| invalid("not a semantic version"))?;

    let component = |i: usize| caps.get(i).map_or("0", |m| m.as_str());
    let mut normalized = format!("{}.{}.{}", component(1), component(2), component(3));

    if let Some(pre) = caps.get(4).or_else(|| caps.get(5)) {
        normalized.push('-');
        normalized.push_str(pre.as_str());
    }
    if let Some(build) = caps.get(6) {
        normalized.push('+');
        normalized.push_str(build.as_str());
    }

    Version::parse(&normalized).map_err(|e| invalid(&e.to_string()))
}

/// Extract the version token from `go version` output.
///
/// `go version go1.21.5 linux/amd64` → `go1.21.5`
pub fn version_from_output(output: &str) -> Option<&str> {
    let mut fields = output.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some("go"), Some("version"), Some(version)) => Some(version),
        _ => None,
    }
}

/// Ask the configured Go toolchain for its version string.
pub fn toolchain_version(config: &ToolsConfig) -> Result<String> {
    let result = execute(&config.go_command, &["version"], &CommandOptions::captured()).map_err(
        |e| ToolsError::ToolchainVersion {
            message: format!("failed to run '{} version': {}", config.go_command, e),
        },
    )?;

    if !result.success {
        return Err(ToolsError::ToolchainVersion {
            message: format!(
                "'{} version' exited with code {:?}: {}",
                config.go_command,
                result.exit_code,
                result.stderr.trim()
            ),
        });
    }

    version_from_output(&result.stdout)
        .map(String::from)
        .ok_or_else(|| ToolsError::ToolchainVersion {
            message: format!("unexpected output: {}", result.stdout.trim()),
        })
}

/// Check a reported Go version (e.g. `go1.16.3`) against a constraint.
///
/// Returns the parsed version when it satisfies the constraint.
pub fn check_go_version(reported: &str, constraint: &str) -> Result<Version> {
    let value = reported.trim();
    let value = value.strip_prefix("go").unwrap_or(value);

    let version = parse_version(value)?;
    let required = Constraint::parse(constraint)?;

    if !required.matches(&version) {
        return Err(ToolsError::VersionMismatch {
            version: version.to_string(),
            constraint: required.to_string(),
        });
    }

    Ok(version)
}

/// Fail if the installed Go version doesn't satisfy `constraint`.
///
/// Example constraint: `>=1.16`.
pub fn enforce_go_version(config: &ToolsConfig, constraint: &str) -> Result<Version> {
    tracing::info!("Checking go version against constraint {}...", constraint);
    let reported = toolchain_version(config)?;
    check_go_version(&reported, constraint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_version() {
        assert_eq!(parse_version("1.21.5").unwrap(), Version::new(1, 21, 5));
    }

    #[test]
    fn parse_fills_missing_components() {
        assert_eq!(parse_version("1.16").unwrap(), Version::new(1, 16, 0));
        assert_eq!(parse_version("2").unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn parse_accepts_leading_v() {
        assert_eq!(parse_version("v1.2.3").unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn parse_go_style_prerelease() {
        let v = parse_version("1.22rc1").unwrap();
        assert_eq!(v.to_string(), "1.22.0-rc1");

        let v = parse_version("1.21beta2").unwrap();
        assert_eq!(v.to_string(), "1.21.0-beta2");
    }

    #[test]
    fn parse_semver_prerelease_and_build() {
        let v = parse_version("1.2.3-alpha.1+build.5").unwrap();
        assert_eq!(v.pre.as_str(), "alpha.1");
        assert_eq!(v.build.as_str(), "build.5");
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "devel", "1.x", "one.two", "1.2.3.4"] {
            let err = parse_version(bad).unwrap_err();
            assert!(
                matches!(err, ToolsError::VersionParse { .. }),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn constraint_simple_comparator() {
        let c = Constraint::parse(">=1.16").unwrap();
        assert!(c.matches(&Version::new(1, 16, 0)));
        assert!(c.matches(&Version::new(1, 21, 5)));
        assert!(!c.matches(&Version::new(1, 15, 15)));
    }

    #[test]
    fn constraint_space_separated_and() {
        let c = Constraint::parse(">= 1.16 < 2").unwrap();
        assert!(c.matches(&Version::new(1, 20, 0)));
        assert!(!c.matches(&Version::new(2, 0, 0)));
    }

    #[test]
    fn constraint_comma_separated_and() {
        let c = Constraint::parse(">=1.16, <1.18").unwrap();
        assert!(c.matches(&Version::new(1, 17, 3)));
        assert!(!c.matches(&Version::new(1, 18, 0)));
    }

    #[test]
    fn constraint_or_alternatives() {
        let c = Constraint::parse("~1.15.0 || >=1.17").unwrap();
        assert!(c.matches(&Version::new(1, 15, 9)));
        assert!(!c.matches(&Version::new(1, 16, 0)));
        assert!(c.matches(&Version::new(1, 17, 0)));
    }

    #[test]
    fn constraint_caret_and_tilde() {
        assert!(Constraint::parse("^1.2").unwrap().matches(&Version::new(1, 9, 0)));
        assert!(!Constraint::parse("~1.2").unwrap().matches(&Version::new(1, 3, 0)));
    }

    #[test]
    fn constraint_bare_partial_version_is_tilde_range() {
        let c = Constraint::parse("1.16").unwrap();
        assert!(c.matches(&Version::new(1, 16, 5)));
        assert!(!c.matches(&Version::new(1, 17, 0)));
    }

    #[test]
    fn constraint_bare_full_version_is_exact() {
        let c = Constraint::parse("1.16.3").unwrap();
        assert!(c.matches(&Version::new(1, 16, 3)));
        assert!(!c.matches(&Version::new(1, 16, 4)));
    }

    #[test]
    fn constraint_strips_v_prefix() {
        let c = Constraint::parse(">=v1.16").unwrap();
        assert!(c.matches(&Version::new(1, 16, 0)));
    }

    #[test]
    fn normalize_joins_detached_operators() {
        assert_eq!(normalize_comparators(">= 1.16  < 2"), vec![">=1.16, <2"]);
        assert_eq!(normalize_comparators(">=1.16,<2"), vec![">=1.16, <2"]);
        assert_eq!(normalize_comparators("1.x"), vec!["1.x"]);
    }

    #[test]
    fn normalize_expands_hyphen_range() {
        assert_eq!(normalize_comparators("1.16 - 1.18"), vec![">=1.16, <=1.18"]);
        assert_eq!(
            normalize_comparators("v1.16.0 - v1.18.3, <2"),
            vec![">=1.16.0, <=1.18.3, <2"]
        );
    }

    #[test]
    fn normalize_splits_not_equal() {
        assert_eq!(normalize_comparators("!=1.16.0"), vec!["<1.16.0", ">1.16.0"]);
        assert_eq!(
            normalize_comparators(">=1.16 != 1.17.0 <2"),
            vec![">=1.16, <1.17.0, <2", ">=1.16, >1.17.0, <2"]
        );
    }

    #[test]
    fn constraint_hyphen_range_is_inclusive() {
        let c = Constraint::parse("1.16 - 1.18").unwrap();
        assert!(c.matches(&Version::new(1, 16, 0)));
        assert!(c.matches(&Version::new(1, 17, 2)));
        assert!(c.matches(&Version::new(1, 18, 9)));
        assert!(!c.matches(&Version::new(1, 15, 9)));
        assert!(!c.matches(&Version::new(1, 19, 0)));

        let full = Constraint::parse("1.16.3 - 1.18.0").unwrap();
        assert!(full.matches(&Version::new(1, 18, 0)));
        assert!(!full.matches(&Version::new(1, 18, 1)));
        assert!(!full.matches(&Version::new(1, 16, 2)));
    }

    #[test]
    fn constraint_not_equal_excludes_one_release() {
        let c = Constraint::parse("!=1.16.0").unwrap();
        assert!(!c.matches(&Version::new(1, 16, 0)));
        assert!(c.matches(&Version::new(1, 16, 1)));
        assert!(c.matches(&Version::new(1, 15, 9)));
    }

    #[test]
    fn constraint_not_equal_partial_excludes_minor_line() {
        let c = Constraint::parse("!=1.16").unwrap();
        assert!(!c.matches(&Version::new(1, 16, 5)));
        assert!(c.matches(&Version::new(1, 17, 0)));
        assert!(c.matches(&Version::new(1, 15, 0)));
    }

    #[test]
    fn constraint_not_equal_within_range() {
        let c = Constraint::parse(">=1.16, !=1.17.0 || =1.10.0").unwrap();
        assert!(c.matches(&Version::new(1, 16, 4)));
        assert!(!c.matches(&Version::new(1, 17, 0)));
        assert!(c.matches(&Version::new(1, 17, 1)));
        assert!(c.matches(&Version::new(1, 10, 0)));
        assert!(!c.matches(&Version::new(1, 15, 0)));
        assert_eq!(c.to_string(), ">=1.16, !=1.17.0 || =1.10.0");
    }

    #[test]
    fn check_go_version_with_hyphen_range() {
        let version = check_go_version("go1.17.2", "1.16 - 1.18").unwrap();
        assert_eq!(version, Version::new(1, 17, 2));
        assert!(matches!(
            check_go_version("go1.19.0", "1.16 - 1.18"),
            Err(ToolsError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn check_go_version_with_not_equal() {
        assert!(check_go_version("go1.17.2", "!=1.16.0").is_ok());
        assert!(matches!(
            check_go_version("go1.16.0", "!=1.16.0"),
            Err(ToolsError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn constraint_prerelease_excluded_by_default() {
        let c = Constraint::parse(">=1.16").unwrap();
        assert!(!c.matches(&parse_version("1.22rc1").unwrap()));
    }

    #[test]
    fn constraint_rejects_invalid() {
        for bad in ["", "||", ">=abc", ">=", "1.16 ||"] {
            let err = Constraint::parse(bad).unwrap_err();
            assert!(
                matches!(err, ToolsError::ConstraintParse { .. }),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn constraint_displays_as_written() {
        assert_eq!(Constraint::parse(" >=1.16 ").unwrap().to_string(), ">=1.16");
    }

    #[test]
    fn version_from_output_takes_third_field() {
        assert_eq!(
            version_from_output("go version go1.21.5 linux/amd64\n"),
            Some("go1.21.5")
        );
        assert_eq!(
            version_from_output("go version devel go1.22-3f8f929 linux/amd64"),
            Some("devel")
        );
        assert_eq!(version_from_output("command not found"), None);
        assert_eq!(version_from_output(""), None);
    }

    #[test]
    fn check_go_version_accepts_satisfying_version() {
        let v = check_go_version("go1.16.3", ">=1.16").unwrap();
        assert_eq!(v, Version::new(1, 16, 3));
    }

    #[test]
    fn check_go_version_accepts_two_part_release() {
        assert!(check_go_version("go1.16", ">=1.16").is_ok());
    }

    #[test]
    fn check_go_version_rejects_older_version() {
        let err = check_go_version("go1.15.8", ">=1.16").unwrap_err();
        assert_eq!(
            err.to_string(),
            "your version of Go, 1.15.8, does not meet the requirement >=1.16"
        );
    }

    #[test]
    fn check_go_version_rejects_unparsable_version() {
        let err = check_go_version("devel", ">=1.16").unwrap_err();
        assert!(matches!(err, ToolsError::VersionParse { .. }));
        assert!(err.to_string().contains("'devel'"));
    }

    #[test]
    fn check_go_version_rejects_unparsable_constraint() {
        let err = check_go_version("go1.16.0", "at least 1.16").unwrap_err();
        assert!(matches!(err, ToolsError::ConstraintParse { .. }));
    }

    #[test]
    fn check_go_version_strips_prefix_once() {
        assert!(check_go_version("gogo1.16", ">=1").is_err());
    }

    #[test]
    fn enforce_with_missing_toolchain_fails() {
        let mut config = ToolsConfig::from_env_with(|_| Err(std::env::VarError::NotPresent));
        config.go_command = "toolgate-no-such-go".to_string();
        let err = enforce_go_version(&config, ">=1.16").unwrap_err();
        assert!(matches!(err, ToolsError::ToolchainVersion { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn enforce_reads_fake_toolchain() {
        use crate::probe::test_support::fake_tool;
        use tempfile::TempDir;

        let temp = TempDir::new().unwrap();
        let go = fake_tool(temp.path(), "go", "echo \"go version go1.17.2 linux/amd64\"");
        let mut config = ToolsConfig::from_env_with(|_| Err(std::env::VarError::NotPresent));
        config.go_command = go.display().to_string();

        assert_eq!(
            enforce_go_version(&config, ">=1.16").unwrap(),
            Version::new(1, 17, 2)
        );
        assert!(matches!(
            enforce_go_version(&config, ">=1.18"),
            Err(ToolsError::VersionMismatch { .. })
        ));
    }
}
