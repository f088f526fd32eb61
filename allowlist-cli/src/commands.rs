use std::{io::Write, path::Path, process::ExitCode};

use eyre::{WrapErr, eyre};
use merkle_allowlist::{
    Admission, AllowlistConfig, AllowlistProof, AllowlistRegistry, GroupPolicy, Identity,
    hash_from_hex, hash_to_hex, verify_identity, visualize,
};
use tracing::info;

use crate::args::Command;

pub fn run(command: Command, out: &mut impl Write) -> eyre::Result<ExitCode> {
    match command {
        Command::Root { config } => {
            let registry = load_registry(&config)?;
            for (label, policy) in registry.iter() {
                match policy {
                    GroupPolicy::Restricted(tree) => writeln!(
                        out,
                        "{}\t{}\t{} leaves\t{}",
                        label,
                        hash_to_hex(&tree.root()),
                        tree.leaf_count(),
                        tree.algorithm()
                    )?,
                    GroupPolicy::Unrestricted => writeln!(out, "{}\tunrestricted", label)?,
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Prove {
            config,
            group,
            identity,
        } => {
            let config = load_config(&config)?;
            let registry = build_registry(&config)?;
            let encoding = config.group(&group).map(|g| g.encoding).unwrap_or_default();
            let identity = Identity::parse(&identity, encoding)?;
            match registry.check(&group, identity.as_bytes())? {
                Admission::Admitted { index, proof } => {
                    writeln!(out, "index: {}", index)?;
                    writeln!(out, "proof: {}", proof.to_hex_strings().join(","))?;
                    writeln!(out, "bytes: {}", hex::encode(proof.encode_to_vec()?))?;
                    Ok(ExitCode::SUCCESS)
                }
                Admission::Unrestricted => {
                    writeln!(out, "group `{}` is unrestricted, no proof needed", group)?;
                    Ok(ExitCode::SUCCESS)
                }
                Admission::Rejected => {
                    writeln!(out, "`{}` is not on the `{}` allowlist", identity, group)?;
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Verify {
            root,
            identity,
            proof,
            hash,
            encoding,
        } => {
            let root = hash_from_hex(&root).wrap_err("invalid --root")?;
            let identity = Identity::parse(&identity, encoding)?;
            let proof = AllowlistProof::from_hex_strings(&proof).wrap_err("invalid --proof")?;
            let admitted = verify_identity(hash, identity.as_bytes(), &proof, &root);
            info!(identity = %identity, admitted, "verified proof");
            if admitted {
                writeln!(out, "admitted")?;
                Ok(ExitCode::SUCCESS)
            } else {
                writeln!(out, "rejected")?;
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Show { config, group } => {
            let registry = load_registry(&config)?;
            let tree = registry
                .tree(&group)
                .ok_or_else(|| eyre!("group `{}` is unknown or unrestricted", group))?;
            visualize::visualize_to(&mut *out, tree.as_ref())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_registry(path: &Path) -> eyre::Result<AllowlistRegistry> {
    build_registry(&load_config(path)?)
}

fn load_config(path: &Path) -> eyre::Result<AllowlistConfig> {
    AllowlistConfig::from_path(path).wrap_err_with(|| format!("failed to load {}", path.display()))
}

fn build_registry(config: &AllowlistConfig) -> eyre::Result<AllowlistRegistry> {
    let registry = config.build_registry()?;
    info!(
        groups = registry.len(),
        hash_calls = registry.build_cost().total_hash_calls(),
        "allowlist registry ready"
    );
    Ok(registry)
}
