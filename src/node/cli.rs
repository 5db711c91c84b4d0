use clap::{Parser, Subcommand};
use anyhow::Result;
use std::path::PathBuf;
use crate::election::ElectionManager;
use crate::node::config::NodeConfig;
use crate::node::Node;
use crate::utils::init_logging;

/// CLI for the election node.
#[derive(Parser)]
#[clap(name = "ballotchain", version)]
pub struct Cli {
    /// Directory holding ballotchain.toml
    #[clap(long, default_value = "./data")]
    pub data_dir: PathBuf,

    #[clap(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Write a default config file into the data directory
    Init {
        /// overwrite an existing config
        #[clap(long)]
        force: bool,
    },
    /// Run the API server
    Run {
        /// bind address (host:port), overrides the config file
        #[clap(long)]
        bind: Option<String>,

        /// default proof-of-work difficulty for new elections
        #[clap(long)]
        difficulty: Option<u32>,

        /// secret for admin-route HMAC tokens
        #[clap(long, env = "BALLOTCHAIN_ADMIN_SECRET")]
        admin_secret: Option<String>,
    },
    /// Run a short in-process election and print the outcome
    Demo {
        #[clap(long, default_value_t = 2)]
        difficulty: u32,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Init { force } => {
            std::fs::create_dir_all(&cli.data_dir)?;
            let path = NodeConfig::path_in(&cli.data_dir);
            anyhow::ensure!(force || !path.exists(), "{} already exists (use --force)", path.display());
            NodeConfig::default().save(&path)?;
            println!("wrote default config to {}", path.display());
            Ok(())
        }
        Cmd::Run { bind, difficulty, admin_secret } => {
            let mut cfg = NodeConfig::load_or_default(&cli.data_dir)?;
            if let Some(b) = bind {
                cfg.bind_addr = b;
            }
            if let Some(d) = difficulty {
                cfg.default_difficulty = d;
            }
            if admin_secret.is_some() {
                cfg.admin_token = admin_secret;
            }
            cfg.validate()?;
            init_logging(&cfg.log_level, cfg.log_format);

            let svc = Node::new(cfg).start().await?;
            tokio::signal::ctrl_c().await?;
            tracing::info!("shutting down");
            svc.shutdown().await?;
            Ok(())
        }
        Cmd::Demo { difficulty } => {
            init_logging("warn", Default::default());
            let summary = run_demo(difficulty).await?;
            println!("{summary}");
            Ok(())
        }
    }
}

/// Sample election end to end: register, start, vote, mine, verify, tally.
pub async fn run_demo(difficulty: u32) -> Result<String> {
    let manager = ElectionManager::new(difficulty, difficulty);
    let sample = manager.create_sample_data()?;
    let election = sample.election.clone();
    election.start()?;

    let candidates = election.candidates();
    for (i, cred) in sample.credentials.iter().take(12).enumerate() {
        let pick = &candidates[i % candidates.len()];
        election.cast_vote(&cred.voter_id, &pick.candidate_id, &cred.private_key)?;
    }
    let rejected = election
        .cast_vote(&sample.credentials[0].voter_id, &candidates[0].candidate_id, &sample.credentials[0].private_key)
        .is_err();

    let e = election.clone();
    let mined = tokio::task::spawn_blocking(move || e.mine()).await??;
    let report = election.verify_chain();
    let results = election.results();

    let mut out = format!(
        "{}\n  block {} hash {} ({} votes, nonce {})\n  chain valid: {}\n  double vote rejected: {}\n",
        election.name(),
        mined.block_index,
        mined.block_hash,
        mined.transaction_count,
        mined.block_nonce,
        report.is_valid,
        rejected
    );
    for t in &results.candidates {
        out.push_str(&format!("  {:<24} {:>3} votes ({:.2}%)\n", t.name, t.votes, t.percentage));
    }
    out.push_str(&format!("  turnout: {:.2}%", results.turnout));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_overrides() {
        let cli = Cli::try_parse_from(["ballotchain", "run", "--bind", "0.0.0.0:9000", "--difficulty", "3"]).unwrap();
        match cli.cmd {
            Cmd::Run { bind, difficulty, .. } => {
                assert_eq!(bind.as_deref(), Some("0.0.0.0:9000"));
                assert_eq!(difficulty, Some(3));
            }
            _ => panic!("expected run"),
        }
    }

    #[tokio::test]
    async fn demo_runs_to_completion() {
        let out = run_demo(1).await.unwrap();
        assert!(out.contains("chain valid: true"));
        assert!(out.contains("double vote rejected: true"));
        assert!(out.contains("turnout: 60.00%"));
    }
}
