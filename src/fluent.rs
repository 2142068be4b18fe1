use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail};

/// A ground predicate literal, e.g. `At(C1, SFO)` or `In(C2, P1)`.
///
/// Identity is structural: predicate name plus the ordered argument list.
/// Argument order is significant and no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fluent {
    predicate: String,
    args: Vec<String>,
}

impl Fluent {
    pub fn new(predicate: impl Into<String>, args: Vec<String>) -> Self {
        Fluent {
            predicate: predicate.into(),
            args,
        }
    }

    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for Fluent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.predicate, self.args.join(", "))
    }
}

impl FromStr for Fluent {
    type Err = anyhow::Error;

    /// Parses the textual syntax `Predicate(Arg1, Arg2, ...)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let open = s
            .find('(')
            .ok_or_else(|| anyhow!("malformed fluent {s:?}: missing '('"))?;
        let Some(inner) = s[open + 1..].strip_suffix(')') else {
            bail!("malformed fluent {s:?}: missing closing ')'");
        };
        let predicate = s[..open].trim();
        if predicate.is_empty() {
            bail!("malformed fluent {s:?}: empty predicate");
        }
        let args: Vec<String> = inner
            .split(',')
            .map(|arg| arg.trim().to_string())
            .collect();
        if args.iter().any(|arg| arg.is_empty()) {
            bail!("malformed fluent {s:?}: empty argument");
        }
        Ok(Fluent::new(predicate, args))
    }
}

/// Positive and negative fluent sets describing one logical state.
///
/// The two sets must be disjoint and together cover the full fluent
/// universe of the problem (closed-world assumption); the codec in
/// `state` enforces this at encode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FluentState {
    pub pos: Vec<Fluent>,
    pub neg: Vec<Fluent>,
}

impl FluentState {
    pub fn new(pos: Vec<Fluent>, neg: Vec<Fluent>) -> Self {
        FluentState { pos, neg }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fluent() {
        let fluent: Fluent = "At(C1, SFO)".parse().unwrap();
        assert_eq!(fluent.predicate(), "At");
        assert_eq!(fluent.args(), ["C1".to_string(), "SFO".to_string()]);
        assert_eq!(fluent.to_string(), "At(C1, SFO)");
    }

    #[test]
    fn test_parse_ignores_spacing() {
        let a: Fluent = "In(C2,P1)".parse().unwrap();
        let b: Fluent = " In( C2 , P1 ) ".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_argument_order_is_significant() {
        let a: Fluent = "At(C1, SFO)".parse().unwrap();
        let b: Fluent = "At(SFO, C1)".parse().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_reject_malformed() {
        assert!("At C1 SFO".parse::<Fluent>().is_err());
        assert!("At(C1, SFO".parse::<Fluent>().is_err());
        assert!("(C1, SFO)".parse::<Fluent>().is_err());
        assert!("At(C1,)".parse::<Fluent>().is_err());
    }
}
