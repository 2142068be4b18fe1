use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fluent::{Fluent, FluentState};
use crate::problem::Problem;

/// A serializable domain description: the object lists, the initial
/// positive/negative fluent partition, and the goal, all in the textual
/// fluent syntax. This is the construction-time input surface of the
/// core; converting to a [`Problem`] parses and validates everything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainSpec {
    pub cargos: Vec<String>,
    pub planes: Vec<String>,
    pub airports: Vec<String>,
    pub init_pos: Vec<String>,
    pub init_neg: Vec<String>,
    pub goal: Vec<String>,
}

impl DomainSpec {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("failed to open {path:?}"))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).with_context(|| format!("invalid domain file {path:?}"))
    }

    pub fn to_problem(&self) -> Result<Problem> {
        let initial = FluentState::new(
            parse_fluents(&self.init_pos)?,
            parse_fluents(&self.init_neg)?,
        );
        Problem::new(
            self.cargos.clone(),
            self.planes.clone(),
            self.airports.clone(),
            initial,
            parse_fluents(&self.goal)?,
        )
    }
}

fn parse_fluents(raw: &[String]) -> Result<Vec<Fluent>> {
    raw.iter().map(|s| s.parse()).collect()
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// 2 cargos, 2 planes, 2 airports.
pub fn air_cargo_p1() -> DomainSpec {
    DomainSpec {
        cargos: owned(&["C1", "C2"]),
        planes: owned(&["P1", "P2"]),
        airports: owned(&["JFK", "SFO"]),
        init_pos: owned(&[
            "At(C1, SFO)",
            "At(C2, JFK)",
            "At(P1, SFO)",
            "At(P2, JFK)",
        ]),
        init_neg: owned(&[
            "At(C2, SFO)",
            "In(C2, P1)",
            "In(C2, P2)",
            "At(C1, JFK)",
            "In(C1, P1)",
            "In(C1, P2)",
            "At(P1, JFK)",
            "At(P2, SFO)",
        ]),
        goal: owned(&["At(C1, JFK)", "At(C2, SFO)"]),
    }
}

/// 3 cargos, 3 planes, 3 airports.
pub fn air_cargo_p2() -> DomainSpec {
    DomainSpec {
        cargos: owned(&["C1", "C2", "C3"]),
        planes: owned(&["P1", "P2", "P3"]),
        airports: owned(&["JFK", "SFO", "ATL"]),
        init_pos: owned(&[
            "At(C1, SFO)",
            "At(C2, JFK)",
            "At(C3, ATL)",
            "At(P1, SFO)",
            "At(P2, JFK)",
            "At(P3, ATL)",
        ]),
        init_neg: owned(&[
            "At(C1, JFK)",
            "At(C1, ATL)",
            "In(C1, P1)",
            "In(C1, P2)",
            "In(C1, P3)",
            "At(C2, SFO)",
            "At(C2, ATL)",
            "In(C2, P1)",
            "In(C2, P2)",
            "In(C2, P3)",
            "At(C3, JFK)",
            "At(C3, SFO)",
            "In(C3, P1)",
            "In(C3, P2)",
            "In(C3, P3)",
            "At(P1, JFK)",
            "At(P1, ATL)",
            "At(P2, SFO)",
            "At(P2, ATL)",
            "At(P3, JFK)",
            "At(P3, SFO)",
        ]),
        goal: owned(&["At(C1, JFK)", "At(C2, SFO)", "At(C3, SFO)"]),
    }
}

/// 4 cargos, 2 planes, 4 airports.
pub fn air_cargo_p3() -> DomainSpec {
    DomainSpec {
        cargos: owned(&["C1", "C2", "C3", "C4"]),
        planes: owned(&["P1", "P2"]),
        airports: owned(&["SFO", "JFK", "ATL", "ORD"]),
        init_pos: owned(&[
            "At(C1, SFO)",
            "At(C2, JFK)",
            "At(C3, ATL)",
            "At(C4, ORD)",
            "At(P1, SFO)",
            "At(P2, JFK)",
        ]),
        init_neg: owned(&[
            "At(C1, JFK)",
            "At(C1, ATL)",
            "At(C1, ORD)",
            "In(C1, P1)",
            "In(C1, P2)",
            "At(C2, SFO)",
            "At(C2, ATL)",
            "At(C2, ORD)",
            "In(C2, P1)",
            "In(C2, P2)",
            "At(C3, SFO)",
            "At(C3, JFK)",
            "At(C3, ORD)",
            "In(C3, P1)",
            "In(C3, P2)",
            "At(C4, SFO)",
            "At(C4, JFK)",
            "At(C4, ATL)",
            "In(C4, P1)",
            "In(C4, P2)",
            "At(P1, JFK)",
            "At(P1, ATL)",
            "At(P1, ORD)",
            "At(P2, SFO)",
            "At(P2, ATL)",
            "At(P2, ORD)",
        ]),
        goal: owned(&["At(C1, JFK)", "At(C2, SFO)", "At(C3, JFK)", "At(C4, SFO)"]),
    }
}

/// Built-in problem instances, numbered 1 to 3.
pub fn builtin(id: u32) -> Option<DomainSpec> {
    match id {
        1 => Some(air_cargo_p1()),
        2 => Some(air_cargo_p2()),
        3 => Some(air_cargo_p3()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_domain_yaml() {
        let yaml = r#"
cargos: [C1]
planes: [P1]
airports: [SFO, JFK]
init_pos:
  - At(C1, SFO)
  - At(P1, SFO)
init_neg:
  - At(C1, JFK)
  - In(C1, P1)
  - At(P1, JFK)
goal:
  - At(C1, JFK)
"#;
        let spec: DomainSpec = serde_yaml::from_str(yaml).unwrap();
        let problem = spec.to_problem().unwrap();
        assert_eq!(problem.state_map().len(), 5);
        // 2 * |A|*|P|*|C| + |P|*|A|*(|A|-1)
        assert_eq!(problem.actions_list().len(), 2 * 2 + 2);
    }

    #[test]
    fn test_builtin_universes_and_action_counts() {
        let p1 = air_cargo_p1().to_problem().unwrap();
        assert_eq!(p1.state_map().len(), 12);
        assert_eq!(p1.actions_list().len(), 20);

        let p2 = air_cargo_p2().to_problem().unwrap();
        assert_eq!(p2.state_map().len(), 27);
        assert_eq!(p2.actions_list().len(), 2 * 3 * 3 * 3 + 3 * 3 * 2);

        let p3 = air_cargo_p3().to_problem().unwrap();
        assert_eq!(p3.state_map().len(), 32);
        assert_eq!(p3.actions_list().len(), 2 * 4 * 2 * 4 + 2 * 4 * 3);
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(builtin(4).is_none());
    }

    #[test]
    fn test_malformed_fluent_is_rejected() {
        let mut spec = air_cargo_p1();
        spec.goal.push("At C1 JFK".to_string());
        assert!(spec.to_problem().is_err());
    }
}
