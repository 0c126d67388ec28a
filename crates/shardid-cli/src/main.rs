#![doc = include_str!("../README.md")]

mod config;
mod generator;
mod telemetry;

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use config::{AppConfig, CliArgs, Command};
use generator::AnyGenerator;
use shardid::{Cluster, Combiner, Generator};
use telemetry::init_tracing;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_tracing()?;
    let config = AppConfig::try_from(args)?;

    let cluster = config
        .cluster
        .build(AnyGenerator::new(config.generator, config.machine_id))
        .context("failed to build cluster")?;
    log_startup_info(&config, &cluster);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&cluster, &config.command, &mut out)?;
    out.flush()?;
    Ok(())
}

fn log_startup_info<C, G, M>(config: &AppConfig, cluster: &Cluster<C, G, M>)
where
    G: Generator,
    M: Combiner,
{
    if cfg!(debug_assertions) {
        tracing::debug!("Running with full config: {:#?}", config);
    }
    tracing::info!(
        "Cluster ready with {} shards ({} writable), generator {:?}",
        cluster.shard_count(),
        cluster.writable().len(),
        config.generator
    );
}

/// Executes `command` against `cluster`, writing results to `out`.
fn run<C, G, M>(
    cluster: &Cluster<C, G, M>,
    command: &Command,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    G: Generator,
    M: Combiner,
{
    match command {
        Command::Next { count } => {
            for _ in 0..*count {
                let (id, shard) = cluster.next()?;
                writeln!(out, "{id}\t{}", shard.id())?;
            }
        }
        Command::Locate { ids } => {
            let (groups, failure) = match cluster.many(ids) {
                Ok(groups) => (groups, None),
                Err(e) => (e.partial, Some((e.id, e.index, e.error))),
            };
            // Stable output: registration order, then input order per shard.
            for shard in cluster.all() {
                if let Some(members) = groups.get(&shard) {
                    for id in members {
                        writeln!(out, "{}\t{id}", shard.id())?;
                    }
                }
            }
            if let Some((id, index, e)) = failure {
                return Err(e).with_context(|| format!("failed to locate '{id}' at index {index}"));
            }
        }
        Command::Shards => {
            for shard in cluster.all() {
                let writable = cluster.writable().contains(&shard);
                writeln!(
                    out,
                    "{}\tread_only={}\twritable={}",
                    shard.id(),
                    shard.read_only(),
                    writable
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardid::{ClusterConfig, CounterGenerator, ShardConfig};

    fn cluster() -> Cluster<String, CounterGenerator> {
        let config = ClusterConfig {
            shards: vec![
                ShardConfig::new("000001", Some("mem".into()), false),
                ShardConfig::new("000002", Some("mem".into()), true),
                ShardConfig::new("000003", Some("mem".into()), false),
            ],
            ..ClusterConfig::default()
        };
        config.build(CounterGenerator::new(10)).unwrap()
    }

    fn output(
        cluster: &Cluster<String, CounterGenerator>,
        command: Command,
    ) -> (String, anyhow::Result<()>) {
        let mut out = Vec::new();
        let result = run(cluster, &command, &mut out);
        (String::from_utf8(out).unwrap(), result)
    }

    #[test]
    fn next_skips_read_only_shards() {
        let (out, result) = output(&cluster(), Command::Next { count: 3 });
        result.unwrap();
        assert_eq!(out, "a@000001\t000001\nb@000003\t000003\nc@000001\t000001\n");
    }

    #[test]
    fn locate_groups_in_shard_order() {
        let ids = ["1@000003", "2@000001", "3@000003"].map(String::from).to_vec();
        let (out, result) = output(&cluster(), Command::Locate { ids });
        result.unwrap();
        assert_eq!(out, "000001\t2@000001\n000003\t1@000003\n000003\t3@000003\n");
    }

    #[test]
    fn locate_prints_partial_result_before_failing() {
        let ids = ["1@000002", "2@zzzzzz", "3@000001"].map(String::from).to_vec();
        let (out, result) = output(&cluster(), Command::Locate { ids });
        assert_eq!(out, "000002\t1@000002\n");
        let err = result.unwrap_err();
        assert_eq!(err.root_cause().to_string(), "shard not found");
    }

    #[test]
    fn shards_lists_every_shard() {
        let (out, result) = output(&cluster(), Command::Shards);
        result.unwrap();
        assert_eq!(
            out,
            "000001\tread_only=false\twritable=true\n\
             000002\tread_only=true\twritable=false\n\
             000003\tread_only=false\twritable=true\n"
        );
    }
}
