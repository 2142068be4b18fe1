use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::domain::DomainSpec;
use crate::heuristic::{h_ignore_preconditions, h_unit, HeuristicFn};
use crate::problem::Problem;
use crate::search::{
    astar_search, breadth_first_search, greedy_best_first_search, uniform_cost_search, Plan,
};
use crate::stat::Stats;

/// One (problem, algorithm, heuristic) combination. The task carries the
/// domain description, not a built `Problem`: every worker constructs its
/// own instance, so no grounded action list is aliased across tasks.
#[derive(Debug, Clone)]
pub struct BenchTask {
    pub problem_name: String,
    pub domain: DomainSpec,
    pub algorithm: String,
    pub heuristic: Option<String>,
}

impl BenchTask {
    fn label(&self) -> String {
        match &self.heuristic {
            Some(h) => format!("{} / {} with {}", self.problem_name, self.algorithm, h),
            None => format!("{} / {}", self.problem_name, self.algorithm),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskReport {
    pub problem: String,
    pub algorithm: String,
    pub heuristic: Option<String>,
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Solved {
        plan_length: usize,
        elapsed_ms: u128,
        stats: Stats,
        plan: Vec<String>,
    },
    Unsolved {
        elapsed_ms: u128,
        stats: Stats,
    },
    Timeout {
        limit_secs: u64,
    },
    Error {
        message: String,
    },
}

/// Worker count: available parallel execution units minus one, reserved
/// for coordination, never below one.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .saturating_sub(1)
        .max(1)
}

/// Runs every task on a bounded worker pool with a per-task wall-clock
/// deadline. A timed-out task is reported as such and releases its pool
/// slot; sibling tasks are unaffected. All reports are collected after
/// every task has been dispatched.
pub async fn run_benchmark(
    tasks: Vec<BenchTask>,
    timeout: Duration,
    workers: usize,
) -> Vec<TaskReport> {
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let mut handles = Vec::with_capacity(tasks.len());

    for task in tasks {
        let semaphore = semaphore.clone();
        handles.push(tokio::spawn(async move {
            let permit = semaphore
                .acquire_owned()
                .await
                .expect("benchmark semaphore closed");
            let label = task.label();
            let (problem, algorithm, heuristic) = (
                task.problem_name.clone(),
                task.algorithm.clone(),
                task.heuristic.clone(),
            );

            let work = tokio::task::spawn_blocking(move || run_task(&task));
            let outcome = match tokio::time::timeout(timeout, work).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(join_error)) => Outcome::Error {
                    message: join_error.to_string(),
                },
                // The search thread is left to wind down on its own; only
                // this task's slot and report are affected.
                Err(_) => Outcome::Timeout {
                    limit_secs: timeout.as_secs(),
                },
            };
            drop(permit);

            match &outcome {
                Outcome::Solved {
                    plan_length,
                    elapsed_ms,
                    stats,
                    ..
                } => {
                    info!("Solved {label}: plan length {plan_length}, {elapsed_ms} ms");
                    stats.print();
                }
                Outcome::Unsolved { elapsed_ms, .. } => {
                    warn!("No solution for {label} ({elapsed_ms} ms)");
                }
                Outcome::Timeout { limit_secs } => {
                    warn!("Timeout for {label} after {limit_secs}s");
                }
                Outcome::Error { message } => {
                    warn!("Error for {label}: {message}");
                }
            }

            TaskReport {
                problem,
                algorithm,
                heuristic,
                outcome,
            }
        }));
    }

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(report) => reports.push(report),
            Err(join_error) => warn!("benchmark task panicked: {join_error}"),
        }
    }
    reports
}

fn run_task(task: &BenchTask) -> Outcome {
    let problem = match task.domain.to_problem() {
        Ok(problem) => problem,
        Err(error) => {
            return Outcome::Error {
                message: format!("{error:#}"),
            }
        }
    };

    let mut stats = Stats::default();
    let start = Instant::now();
    let plan = match dispatch(&problem, &task.algorithm, task.heuristic.as_deref(), &mut stats) {
        Ok(plan) => plan,
        Err(error) => {
            return Outcome::Error {
                message: format!("{error:#}"),
            }
        }
    };
    let elapsed_ms = start.elapsed().as_millis();

    match plan {
        Some(plan) => Outcome::Solved {
            plan_length: plan.len(),
            elapsed_ms,
            stats,
            plan: plan.steps,
        },
        None => Outcome::Unsolved { elapsed_ms, stats },
    }
}

fn dispatch(
    problem: &Problem,
    algorithm: &str,
    heuristic: Option<&str>,
    stats: &mut Stats,
) -> Result<Option<Plan>> {
    let h: HeuristicFn = match heuristic {
        None | Some("unit") => h_unit,
        Some("ignore-preconditions") => h_ignore_preconditions,
        Some(other) => bail!("unknown heuristic: {other}"),
    };

    Ok(match algorithm {
        "bfs" => breadth_first_search(problem, stats),
        "ucs" => uniform_cost_search(problem, stats),
        "greedy" => greedy_best_first_search(problem, h, stats),
        "astar" => astar_search(problem, h, stats),
        other => bail!("unknown search algorithm: {other}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::air_cargo_p1;

    #[tokio::test]
    async fn test_benchmark_solves_p1() {
        let tasks = vec![
            BenchTask {
                problem_name: "Air Cargo Problem 1".to_string(),
                domain: air_cargo_p1(),
                algorithm: "bfs".to_string(),
                heuristic: None,
            },
            BenchTask {
                problem_name: "Air Cargo Problem 1".to_string(),
                domain: air_cargo_p1(),
                algorithm: "astar".to_string(),
                heuristic: Some("ignore-preconditions".to_string()),
            },
        ];

        let reports = run_benchmark(tasks, Duration::from_secs(60), 2).await;
        assert_eq!(reports.len(), 2);
        for report in &reports {
            match &report.outcome {
                Outcome::Solved { plan_length, .. } => assert_eq!(*plan_length, 6),
                other => panic!("expected a solution, got {other:?}"),
            }
        }
    }

    /// A domain large enough that uninformed search cannot finish within
    /// the test timeout: 6 cargos spread over 4 airports, 2 planes.
    fn oversized_domain() -> DomainSpec {
        let cargos: Vec<String> = (1..=6).map(|i| format!("C{i}")).collect();
        let planes: Vec<String> = (1..=2).map(|i| format!("P{i}")).collect();
        let airports: Vec<String> = (1..=4).map(|i| format!("A{i}")).collect();

        let mut init_pos = Vec::new();
        let mut init_neg = Vec::new();
        for (idx, cargo) in cargos.iter().enumerate() {
            let home = &airports[idx % airports.len()];
            init_pos.push(format!("At({cargo}, {home})"));
            for airport in airports.iter().filter(|a| *a != home) {
                init_neg.push(format!("At({cargo}, {airport})"));
            }
            for plane in &planes {
                init_neg.push(format!("In({cargo}, {plane})"));
            }
        }
        for (idx, plane) in planes.iter().enumerate() {
            let home = &airports[idx];
            init_pos.push(format!("At({plane}, {home})"));
            for airport in airports.iter().filter(|a| *a != home) {
                init_neg.push(format!("At({plane}, {airport})"));
            }
        }
        // Every cargo one airport over from its start.
        let goal = cargos
            .iter()
            .enumerate()
            .map(|(idx, cargo)| format!("At({cargo}, {})", airports[(idx + 1) % airports.len()]))
            .collect();

        DomainSpec {
            cargos,
            planes,
            airports,
            init_pos,
            init_neg,
            goal,
        }
    }

    #[tokio::test]
    async fn test_timeout_is_isolated() {
        let tasks = vec![
            BenchTask {
                problem_name: "Oversized".to_string(),
                domain: oversized_domain(),
                algorithm: "ucs".to_string(),
                heuristic: None,
            },
            BenchTask {
                problem_name: "Air Cargo Problem 1".to_string(),
                domain: air_cargo_p1(),
                algorithm: "bfs".to_string(),
                heuristic: None,
            },
        ];

        let reports = run_benchmark(tasks, Duration::from_millis(200), 1).await;
        assert_eq!(reports.len(), 2);
        assert!(matches!(reports[0].outcome, Outcome::Timeout { .. }));
        assert!(matches!(reports[1].outcome, Outcome::Solved { .. }));
    }

    #[tokio::test]
    async fn test_unknown_algorithm_is_reported() {
        let tasks = vec![BenchTask {
            problem_name: "Air Cargo Problem 1".to_string(),
            domain: air_cargo_p1(),
            algorithm: "dijkstra".to_string(),
            heuristic: None,
        }];

        let reports = run_benchmark(tasks, Duration::from_secs(10), 1).await;
        assert!(matches!(reports[0].outcome, Outcome::Error { .. }));
    }
}
