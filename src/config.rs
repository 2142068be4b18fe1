use std::time::Duration;

use anyhow::{anyhow, bail};
use clap::Parser;

use crate::bench::default_workers;

#[derive(Parser, Debug)]
#[command(
    name = "Air Cargo Planner",
    about = "STRIPS air-cargo planning benchmarks in Rust.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(
        long,
        help = "Built-in problems to run (1-3)",
        use_value_delimiter = true,
        default_value = "1,2,3"
    )]
    pub problems: Vec<u32>,

    #[arg(long, help = "Extra domain YAML files to run", use_value_delimiter = true)]
    pub domain_paths: Vec<String>,

    #[arg(
        long,
        help = "Search algorithms to benchmark",
        use_value_delimiter = true,
        default_value = "bfs,ucs,greedy,astar"
    )]
    pub algorithms: Vec<String>,

    #[arg(
        long,
        help = "Heuristics for the informed searches",
        use_value_delimiter = true,
        default_value = "unit,ignore-preconditions"
    )]
    pub heuristics: Vec<String>,

    #[arg(long, help = "Per-task timeout in seconds", default_value_t = 600)]
    pub timeout_secs: u64,

    #[arg(long, help = "Worker tasks (defaults to available cores minus one)")]
    pub workers: Option<usize>,

    #[arg(long, help = "Path to write the JSON report")]
    pub output_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub problems: Vec<u32>,
    pub domain_paths: Vec<String>,
    pub algorithms: Vec<String>,
    pub heuristics: Vec<String>,
    pub timeout: Duration,
    pub workers: usize,
    pub output_path: Option<String>,
}

impl Config {
    pub fn new(cli: &Cli) -> Self {
        Self {
            problems: cli.problems.clone(),
            domain_paths: cli.domain_paths.clone(),
            algorithms: cli.algorithms.clone(),
            heuristics: cli.heuristics.clone(),
            timeout: Duration::from_secs(cli.timeout_secs),
            workers: cli.workers.unwrap_or_else(default_workers),
            output_path: cli.output_path.clone(),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.problems.is_empty() && self.domain_paths.is_empty() {
            bail!("no problems selected");
        }
        for problem in &self.problems {
            if !(1..=3).contains(problem) {
                bail!("unknown built-in problem: {problem}");
            }
        }

        if self.algorithms.is_empty() {
            bail!("no search algorithms selected");
        }
        let mut needs_heuristic = false;
        for algorithm in &self.algorithms {
            match algorithm.as_str() {
                "bfs" | "ucs" => {}
                "greedy" | "astar" => needs_heuristic = true,
                other => return Err(anyhow!("unknown search algorithm: {other}")),
            }
        }

        if needs_heuristic && self.heuristics.is_empty() {
            bail!("informed searches selected but no heuristics given");
        }
        for heuristic in &self.heuristics {
            match heuristic.as_str() {
                "unit" | "ignore-preconditions" => {}
                other => return Err(anyhow!("unknown heuristic: {other}")),
            }
        }

        if self.workers == 0 {
            bail!("worker count must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            problems: vec![1],
            domain_paths: vec![],
            algorithms: vec!["bfs".to_string(), "astar".to_string()],
            heuristics: vec!["ignore-preconditions".to_string()],
            timeout: Duration::from_secs(600),
            workers: 2,
            output_path: None,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let mut config = base_config();
        config.algorithms.push("dijkstra".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_heuristic_rejected() {
        let mut config = base_config();
        config.heuristics.push("level-sum".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_informed_search_requires_heuristic() {
        let mut config = base_config();
        config.heuristics.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_builtin_rejected() {
        let mut config = base_config();
        config.problems.push(7);
        assert!(config.validate().is_err());
    }
}
