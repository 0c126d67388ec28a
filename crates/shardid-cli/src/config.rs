//! Command-line and environment configuration.
//!
//! Every flag can also be set through a `SHARDID_*` environment variable, and
//! a `.env` file in the working directory is loaded before parsing.
//!
//! Shards come from repeated `--shard` flags, a JSON cluster file, or both
//! (file entries first). See [`parse_shard_spec`] for the flag syntax and
//! [`shardid::ClusterConfig`] for the file format.

use std::{fs, path::PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use shardid::{ClusterConfig, MAX_MACHINE_ID, ShardConfig};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "shardid",
    version,
    about = "Mint and route shard-aware composite IDs"
)]
pub struct CliArgs {
    /// Shard to register, as `ID[=DSN][:ro]`. Repeatable.
    ///
    /// `:ro` marks the shard read-only, so it is never chosen for new IDs.
    /// A shard without a DSN is rejected because it has no connection.
    ///
    /// Environment variable: `SHARDID_SHARDS` (comma separated)
    #[arg(long = "shard", env = "SHARDID_SHARDS", value_delimiter = ',')]
    pub shards: Vec<String>,

    /// JSON file describing the cluster.
    ///
    /// When given, its `separator` and `shard_id_len` take precedence over
    /// the corresponding flags.
    ///
    /// Environment variable: `SHARDID_CLUSTER_FILE`
    #[arg(long, env = "SHARDID_CLUSTER_FILE")]
    pub cluster_file: Option<PathBuf>,

    /// Separator between the ID fragment and the shard ID.
    ///
    /// Environment variable: `SHARDID_SEPARATOR`
    #[arg(long, env = "SHARDID_SEPARATOR", default_value = "@")]
    pub separator: String,

    /// Exact length of every (alphanumeric) shard ID.
    ///
    /// Environment variable: `SHARDID_SHARD_ID_LEN`
    #[arg(long, env = "SHARDID_SHARD_ID_LEN", default_value_t = 6)]
    pub shard_id_len: usize,

    /// Algorithm producing the fragment of new IDs.
    ///
    /// Environment variable: `SHARDID_GENERATOR`
    #[arg(long, env = "SHARDID_GENERATOR", value_enum, default_value_t = GeneratorKind::Snowflake)]
    pub generator: GeneratorKind,

    /// Machine ID embedded in Snowflake fragments. Each process minting IDs
    /// for the same cluster needs its own.
    ///
    /// Environment variable: `SHARDID_MACHINE_ID`
    #[arg(long, env = "SHARDID_MACHINE_ID", default_value_t = 0)]
    pub machine_id: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Mint new composite IDs, round robin over the writable shards.
    Next {
        /// How many IDs to mint.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Print the owning shard of each composite ID.
    Locate {
        /// Composite IDs to resolve.
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List the registered shards.
    Shards,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Hex counter starting at 1. Unique within one process only.
    Counter,
    /// Time-ordered 64-bit IDs, 13 base32 characters.
    Snowflake,
    /// Time-ordered 128-bit IDs with random bits, 26 base32 characters.
    Ulid,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cluster: ClusterConfig,
    pub generator: GeneratorKind,
    pub machine_id: u64,
    pub command: Command,
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.machine_id > MAX_MACHINE_ID {
            bail!(
                "SHARDID_MACHINE_ID ({}) exceeds the Snowflake machine ID space (max = {})",
                args.machine_id,
                MAX_MACHINE_ID
            );
        }

        let mut cluster = match &args.cluster_file {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read cluster file {}", path.display()))?;
                serde_json::from_str::<ClusterConfig>(&raw)
                    .with_context(|| format!("invalid cluster file {}", path.display()))?
            }
            None => ClusterConfig {
                separator: args.separator.clone(),
                shard_id_len: args.shard_id_len,
                shards: Vec::new(),
            },
        };

        for spec in &args.shards {
            cluster.shards.push(parse_shard_spec(spec)?);
        }

        Ok(Self {
            cluster,
            generator: args.generator,
            machine_id: args.machine_id,
            command: args.command,
        })
    }
}

/// Parses `ID[=DSN][:ro]`.
///
/// The `:ro` (or `:rw`) suffix is stripped first, so a DSN may itself contain
/// colons: `000001=postgres://db-1:5432/app:ro`.
pub fn parse_shard_spec(spec: &str) -> anyhow::Result<ShardConfig> {
    let spec = spec.trim();
    let (rest, read_only) = if let Some(rest) = spec.strip_suffix(":ro") {
        (rest, true)
    } else if let Some(rest) = spec.strip_suffix(":rw") {
        (rest, false)
    } else {
        (spec, false)
    };

    let (id, dsn) = match rest.split_once('=') {
        Some((id, dsn)) if dsn.trim().is_empty() => (id, None),
        Some((id, dsn)) => (id, Some(dsn.trim().to_owned())),
        None => (rest, None),
    };

    if id.trim().is_empty() {
        bail!("shard spec '{spec}' has no id");
    }

    Ok(ShardConfig::new(id.trim(), dsn, read_only))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["shardid"];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn parses_plain_id() {
        let shard = parse_shard_spec("000001").unwrap();
        assert_eq!(shard, ShardConfig::new("000001", None, false));
    }

    #[test]
    fn parses_dsn_and_read_only() {
        let shard = parse_shard_spec(" 000002=postgres://db-2:5432/app:ro ").unwrap();
        assert_eq!(
            shard,
            ShardConfig::new("000002", Some("postgres://db-2:5432/app".into()), true)
        );

        let shard = parse_shard_spec("000003=mem:rw").unwrap();
        assert_eq!(shard, ShardConfig::new("000003", Some("mem".into()), false));
    }

    #[test]
    fn empty_dsn_means_no_connection() {
        let shard = parse_shard_spec("000004=").unwrap();
        assert_eq!(shard.dsn, None);
    }

    #[test]
    fn rejects_missing_id() {
        assert!(parse_shard_spec("=mem").is_err());
        assert!(parse_shard_spec(":ro").is_err());
    }

    #[test]
    fn flags_build_cluster_config() {
        let config = AppConfig::try_from(args(&[
            "--shard",
            "000001=mem",
            "--shard",
            "000002=mem:ro",
            "--generator",
            "counter",
            "next",
            "-n",
            "3",
        ]))
        .unwrap();

        assert_eq!(config.generator, GeneratorKind::Counter);
        assert_eq!(config.command, Command::Next { count: 3 });
        assert_eq!(config.cluster.separator, "@");
        assert_eq!(config.cluster.shards.len(), 2);
        assert!(config.cluster.shards[1].read_only);
    }

    #[test]
    fn comma_separated_shards() {
        let config =
            AppConfig::try_from(args(&["--shard", "000001=a,000002=b", "shards"])).unwrap();
        let ids: Vec<_> = config.cluster.shards.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["000001", "000002"]);
    }

    #[test]
    fn cluster_file_comes_first() {
        let path = std::env::temp_dir().join(format!("shardid-cli-{}.json", std::process::id()));
        fs::write(
            &path,
            r##"{"separator":"#","shard_id_len":4,"shards":[{"id":"eu01","dsn":"mem"}]}"##,
        )
        .unwrap();

        let config = AppConfig::try_from(args(&[
            "--cluster-file",
            path.to_str().unwrap(),
            "--shard",
            "us01=mem",
            "locate",
            "1#eu01",
        ]))
        .unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.cluster.separator, "#");
        assert_eq!(config.cluster.shard_id_len, 4);
        let ids: Vec<_> = config.cluster.shards.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["eu01", "us01"]);
        assert_eq!(
            config.command,
            Command::Locate {
                ids: vec!["1#eu01".into()]
            }
        );
    }

    #[test]
    fn rejects_out_of_range_machine_id() {
        let result = AppConfig::try_from(args(&["--machine-id", "1024", "shards"]));
        assert!(result.is_err());
    }

    #[test]
    fn locate_requires_ids() {
        assert!(CliArgs::try_parse_from(["shardid", "locate"]).is_err());
    }
}
