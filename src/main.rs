use aircargo_rust::bench::{run_benchmark, BenchTask};
use aircargo_rust::config::{Cli, Config};
use aircargo_rust::domain::{self, DomainSpec};

use anyhow::Context;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();
    let cli = Cli::parse();
    let config = Config::new(&cli);
    config.validate()?;

    let mut instances: Vec<(String, DomainSpec)> = Vec::new();
    for id in &config.problems {
        let spec = domain::builtin(*id).with_context(|| format!("unknown built-in problem {id}"))?;
        instances.push((format!("Air Cargo Problem {id}"), spec));
    }
    for path in &config.domain_paths {
        let spec = DomainSpec::load_from_file(path)
            .with_context(|| format!("error with domain file: {path}"))?;
        instances.push((path.clone(), spec));
    }

    let mut tasks = Vec::new();
    for (name, spec) in &instances {
        for algorithm in &config.algorithms {
            match algorithm.as_str() {
                // Uninformed searches ignore the heuristic list.
                "bfs" | "ucs" => tasks.push(BenchTask {
                    problem_name: name.clone(),
                    domain: spec.clone(),
                    algorithm: algorithm.clone(),
                    heuristic: None,
                }),
                _ => {
                    for heuristic in &config.heuristics {
                        tasks.push(BenchTask {
                            problem_name: name.clone(),
                            domain: spec.clone(),
                            algorithm: algorithm.clone(),
                            heuristic: Some(heuristic.clone()),
                        });
                    }
                }
            }
        }
    }

    info!(
        "Running {} tasks on {} workers, {}s timeout each",
        tasks.len(),
        config.workers,
        config.timeout.as_secs()
    );
    let reports = run_benchmark(tasks, config.timeout, config.workers).await;

    if let Some(path) = &config.output_path {
        let file = std::fs::File::create(path)
            .with_context(|| format!("cannot create report file: {path}"))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &reports)?;
        info!("Report written to {path}");
    }

    Ok(())
}
