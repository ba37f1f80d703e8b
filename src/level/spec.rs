//! Level specification parsing and resolution.
//!
//! # Grammar
//! ```text
//! spec    := segment (":" segment)*
//! segment := level | names "=" level
//! names   := name ("," name)*
//! ```
//!
//! A bare level sets the default (the last one wins). `a.b=debug` applies to
//! the logger `a.b` and all of its dotted descendants; `a.b.=debug` applies
//! to `a.b` only.
//!
//! # Resolution
//! Exact rule first, then the longest dotted prefix with a subtree rule, then
//! the default.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::level::name::is_valid_logger_name;
use crate::level::severity::Severity;

/// Errors produced while parsing a level specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// Segment is neither a level nor a `names=level` pair, or names an
    /// unknown level.
    #[error("invalid logging specification '{spec}': bad segment '{segment}'")]
    BadSegment { spec: String, segment: String },

    /// Segment of the form `=level`.
    #[error("invalid logging specification '{spec}': no logger specified in segment '{segment}'")]
    MissingLogger { spec: String, segment: String },

    /// A logger name in a `names=level` segment failed validation.
    #[error("invalid logging specification '{spec}': bad logger name '{name}'")]
    BadLoggerName { spec: String, name: String },
}

/// The name pattern of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pattern {
    /// Matches the logger and every dotted descendant.
    Subtree(String),
    /// Matches only the named logger (written with a trailing dot).
    Exact(String),
}

impl Pattern {
    fn parse(raw: &str) -> Option<Self> {
        let pattern = match raw.strip_suffix('.') {
            Some(name) => Pattern::Exact(name.to_string()),
            None => Pattern::Subtree(raw.to_string()),
        };
        is_valid_logger_name(pattern.name()).then_some(pattern)
    }

    /// Logger name without the trailing-dot marker.
    pub fn name(&self) -> &str {
        match self {
            Pattern::Subtree(name) | Pattern::Exact(name) => name,
        }
    }

    /// Returns true when the pattern applies to `logger`.
    pub fn matches(&self, logger: &str) -> bool {
        match self {
            Pattern::Exact(name) => logger == name,
            Pattern::Subtree(name) => {
                logger == name
                    || (logger.starts_with(name.as_str())
                        && logger.as_bytes().get(name.len()) == Some(&b'.'))
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Subtree(name) => f.write_str(name),
            Pattern::Exact(name) => write!(f, "{name}."),
        }
    }
}

/// A single `pattern=level` override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: Pattern,
    pub level: Severity,
}

/// An immutable, parsed level specification.
#[derive(Debug, Clone)]
pub struct LevelSpec {
    default: Severity,
    /// Declaration order, one entry per pattern.
    rules: Vec<Rule>,
    exact: HashMap<String, Severity>,
    subtree: HashMap<String, Severity>,
}

impl LevelSpec {
    /// A spec with the given default and no rules.
    pub fn new(default: Severity) -> Self {
        Self::from_parts(default, Vec::new())
    }

    /// Parse a spec string. The empty string yields the default spec.
    pub fn parse(spec: &str) -> Result<Self, SpecError> {
        let mut default = Severity::Info;
        let mut rules: Vec<Rule> = Vec::new();

        for segment in spec.split(':').map(str::trim) {
            if segment.is_empty() {
                continue;
            }

            let bad_segment = || SpecError::BadSegment {
                spec: spec.to_string(),
                segment: segment.to_string(),
            };

            let parts: Vec<&str> = segment.split('=').map(str::trim).collect();
            match parts.as_slice() {
                [level] => {
                    default = level.parse().map_err(|_| bad_segment())?;
                }
                [names, level] => {
                    if names.is_empty() {
                        return Err(SpecError::MissingLogger {
                            spec: spec.to_string(),
                            segment: segment.to_string(),
                        });
                    }
                    let level: Severity = level.parse().map_err(|_| bad_segment())?;

                    for name in names.split(',').map(str::trim) {
                        let pattern =
                            Pattern::parse(name).ok_or_else(|| SpecError::BadLoggerName {
                                spec: spec.to_string(),
                                name: name.to_string(),
                            })?;
                        rules.retain(|rule| rule.pattern != pattern);
                        rules.push(Rule { pattern, level });
                    }
                }
                _ => return Err(bad_segment()),
            }
        }

        Ok(Self::from_parts(default, rules))
    }

    fn from_parts(default: Severity, rules: Vec<Rule>) -> Self {
        let mut exact = HashMap::new();
        let mut subtree = HashMap::new();
        for rule in &rules {
            match &rule.pattern {
                Pattern::Exact(name) => exact.insert(name.clone(), rule.level),
                Pattern::Subtree(name) => subtree.insert(name.clone(), rule.level),
            };
        }
        Self {
            default,
            rules,
            exact,
            subtree,
        }
    }

    /// The level applied to loggers no rule matches.
    pub fn default_level(&self) -> Severity {
        self.default
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Effective threshold for `name`.
    pub fn level(&self, name: &str) -> Severity {
        if self.rules.is_empty() {
            return self.default;
        }
        if let Some(level) = self.exact.get(name) {
            return *level;
        }

        let mut candidate = name;
        loop {
            if let Some(level) = self.subtree.get(candidate) {
                return *level;
            }
            match candidate.rfind('.') {
                Some(idx) if idx > 0 => candidate = &candidate[..idx],
                _ => return self.default,
            }
        }
    }

    /// Returns true when `severity` passes the threshold for `name`.
    pub fn is_enabled(&self, name: &str, severity: Severity) -> bool {
        severity >= self.level(name)
    }

    /// The lowest threshold any logger can resolve to.
    pub fn min_level(&self) -> Severity {
        self.rules
            .iter()
            .map(|rule| rule.level)
            .fold(self.default, Severity::min)
    }
}

impl Default for LevelSpec {
    fn default() -> Self {
        Self::new(Severity::Info)
    }
}

impl PartialEq for LevelSpec {
    fn eq(&self, other: &Self) -> bool {
        self.default == other.default && self.exact == other.exact && self.subtree == other.subtree
    }
}

impl Eq for LevelSpec {}

impl FromStr for LevelSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Normalized form: rules sorted by pattern, then the default level.
impl fmt::Display for LevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<String> = self
            .rules
            .iter()
            .map(|rule| format!("{}={}", rule.pattern, rule.level))
            .collect();
        fields.sort();
        for field in &fields {
            write!(f, "{field}:")?;
        }
        f.write_str(self.default.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_spec_is_default() {
        for spec in ["", "   ", ":", " : "] {
            let parsed = LevelSpec::parse(spec).unwrap();
            assert_eq!(parsed, LevelSpec::default());
            assert_eq!(parsed.default_level(), Severity::Info);
            assert!(parsed.rules().is_empty());
        }
    }

    #[test]
    fn test_unmentioned_names_use_default() {
        let spec = LevelSpec::parse("warn:moduleA=debug:peer.gossip=error").unwrap();
        for name in ["moduleB", "peer", "peer2", "gossip", "moduleAB", "x.y.z"] {
            assert_eq!(spec.level(name), Severity::Warn, "{name}");
        }
    }

    #[test]
    fn test_round_trip_example() {
        let spec = LevelSpec::parse("warn:moduleA=debug").unwrap();
        assert_eq!(spec.level("moduleA"), Severity::Debug);
        assert_eq!(spec.level("moduleB"), Severity::Warn);
    }

    #[test]
    fn test_grpc_override_example() {
        let spec = LevelSpec::parse("info:grpc=error").unwrap();
        assert!(!spec.is_enabled("grpc", Severity::Warn));
        assert!(spec.is_enabled("grpc", Severity::Error));
        assert!(spec.is_enabled("app", Severity::Info));
    }

    #[test]
    fn test_last_bare_level_wins() {
        let spec = LevelSpec::parse("debug:a=error:warn").unwrap();
        assert_eq!(spec.default_level(), Severity::Warn);
        assert_eq!(spec.level("a"), Severity::Error);
    }

    #[test]
    fn test_duplicate_name_last_write_wins() {
        let spec = LevelSpec::parse("a=debug:b=info:a=error").unwrap();
        assert_eq!(spec.level("a"), Severity::Error);
        assert_eq!(spec.rules().len(), 2);
        assert_eq!(spec.rules()[1].pattern, Pattern::Subtree("a".into()));
    }

    #[test]
    fn test_subtree_rules_apply_to_descendants() {
        let spec = LevelSpec::parse("info:peer=debug:peer.gossip=error").unwrap();
        assert_eq!(spec.level("peer"), Severity::Debug);
        assert_eq!(spec.level("peer.chaincode"), Severity::Debug);
        assert_eq!(spec.level("peer.gossip"), Severity::Error);
        assert_eq!(spec.level("peer.gossip.state.sync"), Severity::Error);
        assert_eq!(spec.level("peers"), Severity::Info);
    }

    #[test]
    fn test_exact_rule_does_not_apply_to_descendants() {
        let spec = LevelSpec::parse("info:peer.=debug").unwrap();
        assert_eq!(spec.level("peer"), Severity::Debug);
        assert_eq!(spec.level("peer.gossip"), Severity::Info);
    }

    #[test]
    fn test_exact_rule_beats_subtree_rule() {
        let spec = LevelSpec::parse("info:a.b=warn:a.b.=debug").unwrap();
        assert_eq!(spec.level("a.b"), Severity::Debug);
        assert_eq!(spec.level("a.b.c"), Severity::Warn);
    }

    #[test]
    fn test_matching_rule_level_applies() {
        let spec = LevelSpec::parse("error:a=debug:a.b=warn:c.=info").unwrap();
        for rule in spec.rules() {
            assert_eq!(spec.level(rule.pattern.name()), rule.level);
        }
        for name in ["a", "a.x", "a.bc", "a.b", "a.b.c", "c", "c.d"] {
            // the longest matching pattern decides
            let expected = spec
                .rules()
                .iter()
                .filter(|rule| rule.pattern.matches(name))
                .max_by_key(|rule| rule.pattern.name().len())
                .map(|rule| rule.level)
                .unwrap_or(spec.default_level());
            assert_eq!(spec.level(name), expected, "{name}");
        }
    }

    #[test]
    fn test_comma_separated_names() {
        let spec = LevelSpec::parse("a,b.c , d.=warn").unwrap();
        assert_eq!(spec.level("a"), Severity::Warn);
        assert_eq!(spec.level("b.c.e"), Severity::Warn);
        assert_eq!(spec.level("d"), Severity::Warn);
        assert_eq!(spec.level("d.e"), Severity::Info);
    }

    #[test]
    fn test_whitespace_and_case() {
        let spec = LevelSpec::parse("  WARNING : Peer = DEBUG ").unwrap();
        assert_eq!(spec.default_level(), Severity::Warn);
        assert_eq!(spec.level("Peer"), Severity::Debug);
    }

    #[test]
    fn test_bad_level_is_rejected() {
        let err = LevelSpec::parse("info:a=loud").unwrap_err();
        assert_eq!(
            err,
            SpecError::BadSegment {
                spec: "info:a=loud".into(),
                segment: "a=loud".into()
            }
        );

        assert!(LevelSpec::parse("verbose").is_err());
        assert!(LevelSpec::parse("a=").is_err());
        assert!(LevelSpec::parse("a=b=debug").is_err());
    }

    #[test]
    fn test_missing_logger_is_rejected() {
        let err = LevelSpec::parse("=debug").unwrap_err();
        assert!(matches!(err, SpecError::MissingLogger { .. }));
        assert!(err.to_string().contains("no logger specified"));
    }

    #[test]
    fn test_bad_logger_name_is_rejected() {
        for spec in ["a b=debug", "a..b=debug", "a,,b=info", ".=info", "a/b=warn"] {
            let err = LevelSpec::parse(spec).unwrap_err();
            assert!(matches!(err, SpecError::BadLoggerName { .. }), "{spec}");
        }
    }

    #[test]
    fn test_normalized_display() {
        let spec = LevelSpec::parse("warn:b=debug:a.=error").unwrap();
        assert_eq!(spec.to_string(), "a.=error:b=debug:warn");
        assert_eq!(LevelSpec::default().to_string(), "info");

        let reparsed: LevelSpec = spec.to_string().parse().unwrap();
        assert_eq!(reparsed, spec);
    }

    #[test]
    fn test_min_level() {
        assert_eq!(LevelSpec::default().min_level(), Severity::Info);
        let spec = LevelSpec::parse("error:a=warn:b=debug").unwrap();
        assert_eq!(spec.min_level(), Severity::Debug);
    }

    #[test]
    fn test_pattern_matches() {
        let subtree = Pattern::Subtree("a.b".into());
        assert!(subtree.matches("a.b"));
        assert!(subtree.matches("a.b.c"));
        assert!(!subtree.matches("a.bc"));
        assert!(!subtree.matches("a"));

        let exact = Pattern::Exact("a.b".into());
        assert!(exact.matches("a.b"));
        assert!(!exact.matches("a.b.c"));
        assert_eq!(exact.to_string(), "a.b.");
    }
}
