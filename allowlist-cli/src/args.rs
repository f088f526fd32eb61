use std::path::PathBuf;

use clap::{Parser, Subcommand};
use merkle_allowlist::{HashAlgorithm, IdentityEncoding};

/// Build, prove and verify Merkle allowlists.
#[derive(Parser, Debug)]
#[command(name = "allowlist", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the root of every restricted group.
    Root {
        /// Allowlist configuration file (JSON).
        #[arg(long, env = "ALLOWLIST_CONFIG")]
        config: PathBuf,
    },
    /// Print the membership proof of one identity.
    Prove {
        /// Allowlist configuration file (JSON).
        #[arg(long, env = "ALLOWLIST_CONFIG")]
        config: PathBuf,
        /// Mint group label.
        #[arg(long)]
        group: String,
        /// Identity (wallet address) to prove.
        #[arg(long)]
        identity: String,
    },
    /// Check an identity and proof against a committed root.
    Verify {
        /// Committed root, 64 lowercase hex characters.
        #[arg(long)]
        root: String,
        /// Identity (wallet address) to check.
        #[arg(long)]
        identity: String,
        /// Sibling hashes, bottom layer first (comma-separated hex).
        #[arg(long, value_delimiter = ',')]
        proof: Vec<String>,
        /// Hash function the root was built with.
        #[arg(long, default_value_t = HashAlgorithm::Blake3)]
        hash: HashAlgorithm,
        /// Encoding the identity must follow.
        #[arg(long, default_value = "raw")]
        encoding: IdentityEncoding,
    },
    /// Draw every layer of one group's tree.
    Show {
        /// Allowlist configuration file (JSON).
        #[arg(long, env = "ALLOWLIST_CONFIG")]
        config: PathBuf,
        /// Mint group label.
        #[arg(long)]
        group: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verify_args() {
        let cli = Cli::try_parse_from([
            "allowlist",
            "verify",
            "--root",
            "00",
            "--identity",
            "alice",
            "--proof",
            "aa,bb",
            "--hash",
            "keccak256",
        ])
        .expect("valid arguments");
        match cli.command {
            Command::Verify {
                proof,
                hash,
                encoding,
                ..
            } => {
                assert_eq!(proof, vec!["aa".to_string(), "bb".to_string()]);
                assert_eq!(hash, HashAlgorithm::Keccak256);
                assert_eq!(encoding, IdentityEncoding::Raw);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_hash_rejected() {
        let result = Cli::try_parse_from([
            "allowlist", "verify", "--root", "00", "--identity", "a", "--hash", "md5",
        ]);
        assert!(result.is_err());
    }
}
