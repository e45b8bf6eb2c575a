//! The generation run: artifacts in, one TypeScript unit per contract plus the shared units out.
use crate::{
    cmd::Command,
    config::{Config, DEFAULT_ARTIFACT_DIR},
    decl::SourceUnit,
    deployments::{generate_deployments, manifest_imports, DeploymentLoader},
    gen::{
        generate_contract, generate_scripts,
        support::{generate_contract_by_code_hash, generate_index, generate_utils},
    },
    render::{RenderedUnit, TypeScript},
    report::RunReport,
};
use abigen_error::GenerateError;
use abigen_tracing::{println_action_green, println_action_red};
use abigen_types::{constants::ARTIFACT_EXTENSION, Artifact, NetworkId, ProjectArtifact};
use anyhow::{Context, Result};
use itertools::Itertools;
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// Subdirectory of the artifact directory the bindings are written to.
pub const OUTPUT_DIR_NAME: &str = "ts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    pub artifact_dir: PathBuf,
    pub deployment_dir: PathBuf,
    /// Generate the deployments unit even when no manifest exists.
    pub deployments_configured: bool,
    pub networks: Vec<NetworkId>,
}

impl CodegenOptions {
    /// Merges the command line over `config`, resolving relative paths against `project_dir`.
    pub fn resolve(command: &Command, config: Config, project_dir: &Path) -> Self {
        let artifact_dir = command
            .artifact_dir
            .clone()
            .or(config.artifact_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_DIR));
        let deployment_dir = command.deployment_dir.clone().or(config.deployment_dir);
        let networks = match (&command.networks[..], config.networks) {
            ([], Some(networks)) => networks,
            ([], None) => NetworkId::ALL.to_vec(),
            (networks, _) => networks.to_vec(),
        };
        Self {
            artifact_dir: project_dir.join(artifact_dir),
            deployments_configured: deployment_dir.is_some(),
            deployment_dir: deployment_dir
                .map(|dir| project_dir.join(dir))
                .unwrap_or_else(|| project_dir.to_path_buf()),
            networks,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.artifact_dir.join(OUTPUT_DIR_NAME)
    }
}

/// Runs the generator as configured by `command` and the project's `abigen.toml`.
pub fn run(command: Command) -> Result<RunReport> {
    let project_dir = match &command.path {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let config = Config::from_dir(&project_dir)?;
    codegen(&CodegenOptions::resolve(&command, config, &project_dir))
}

/// A compiled artifact and its path relative to the artifact directory.
struct ArtifactFile {
    path: String,
    artifact: Artifact,
}

/// Finds every `*.ral.json` under `artifact_dir`, outside the output directory.
///
/// Artifacts that cannot be read are recorded as failures in `report`.
fn discover_artifacts(artifact_dir: &Path, report: &mut RunReport) -> Vec<ArtifactFile> {
    let output_dir = artifact_dir.join(OUTPUT_DIR_NAME);
    let mut artifacts = WalkDir::new(artifact_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.path() != output_dir)
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(ARTIFACT_EXTENSION))
        .filter_map(|entry| {
            let path = entry
                .path()
                .strip_prefix(artifact_dir)
                .unwrap_or(entry.path())
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .join("/");
            match Artifact::from_file(entry.path()) {
                Ok(artifact) => Some(ArtifactFile { path, artifact }),
                Err(err) => {
                    error!("{err:#}");
                    report.fail(&path, format!("{err:#}"));
                    None
                }
            }
        })
        .collect::<Vec<_>>();
    artifacts.sort_by(|a, b| a.artifact.name().cmp(b.artifact.name()));
    artifacts
}

fn write_unit(output_dir: &Path, unit: &SourceUnit, report: &mut RunReport) -> Result<()> {
    let rendered = RenderedUnit::new::<TypeScript>(unit);
    let path = output_dir.join(&rendered.file_name);
    fs::write(&path, &rendered.file_contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    report.generated.push(rendered.file_name);
    Ok(())
}

/// Generates the bindings of every artifact in `options.artifact_dir`.
///
/// A contract that fails is reported and skipped; the others and the shared units are still
/// written. Only I/O failures on the output directory abort the run.
pub fn codegen(options: &CodegenOptions) -> Result<RunReport> {
    let output_dir = options.output_dir();
    if output_dir.exists() {
        fs::remove_dir_all(&output_dir)
            .with_context(|| format!("failed to clear {}", output_dir.display()))?;
    }
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let project = ProjectArtifact::from_dir(&options.artifact_dir)?;

    let mut report = RunReport::default();
    let artifacts = discover_artifacts(&options.artifact_dir, &mut report);
    info!("Found {} artifact(s) in {}", artifacts.len(), options.artifact_dir.display());

    let contracts = artifacts
        .par_iter()
        .filter_map(|file| match &file.artifact {
            Artifact::Contract(contract) => Some((file, contract)),
            Artifact::Script(_) => None,
        })
        .map(|(file, contract)| {
            let unit = contract
                .to_abi()
                .and_then(|abi| generate_contract(&abi, &project, &file.path));
            (file.artifact.name(), unit)
        })
        .collect::<Vec<(&str, Result<SourceUnit, GenerateError>)>>();

    let mut contract_names = Vec::new();
    for (name, unit) in contracts {
        match unit {
            Ok(unit) => {
                println_action_green("Generating", &format!("{name} contract binding"));
                write_unit(&output_dir, &unit, &mut report)?;
                contract_names.push(name.to_string());
            }
            Err(err) => {
                println_action_red("Failed", &format!("{name} contract binding"));
                error!("Failed to generate {name}: {err}");
                report.fail(name, err);
            }
        }
    }

    let mut scripts = Vec::new();
    for file in &artifacts {
        if let Artifact::Script(script) = &file.artifact {
            match script.to_abi() {
                Ok(abi) => scripts.push((abi, file.path.as_str())),
                Err(err) => {
                    println_action_red("Failed", &format!("{} script binding", script.name));
                    error!("Failed to generate {}: {err}", script.name);
                    report.fail(&script.name, err);
                }
            }
        }
    }
    println_action_green("Generating", &format!("{} script binding(s)", scripts.len()));
    let scripts = generate_scripts(scripts.iter().map(|(abi, path)| (abi, *path)));
    write_unit(&output_dir, &scripts, &mut report)?;
    write_unit(&output_dir, &generate_contract_by_code_hash(&contract_names), &mut report)?;
    write_unit(&output_dir, &generate_utils(), &mut report)?;
    write_unit(&output_dir, &generate_index(&contract_names), &mut report)?;

    let loader = DeploymentLoader::from_dir(&options.deployment_dir, &options.networks)?;
    if !loader.is_empty() || options.deployments_configured {
        println_action_green("Generating", "deployments");
        let imports = manifest_imports(&loader, &output_dir)?;
        let unit = generate_deployments(&loader, &imports, &contract_names);
        write_unit(&output_dir, &unit, &mut report)?;
    }

    info!(
        "Generated {} file(s) with {} failure(s)",
        report.generated.len(),
        report.failures.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn command_line_wins_over_config() {
        let command = Command {
            artifact_dir: Some(PathBuf::from("out")),
            ..Default::default()
        };
        let config = Config {
            artifact_dir: Some(PathBuf::from("build")),
            deployment_dir: Some(PathBuf::from("deploy")),
            networks: Some(vec![NetworkId::Devnet]),
        };
        let options = CodegenOptions::resolve(&command, config, Path::new("/project"));
        assert_eq!(
            options,
            CodegenOptions {
                artifact_dir: PathBuf::from("/project/out"),
                deployment_dir: PathBuf::from("/project/deploy"),
                deployments_configured: true,
                networks: vec![NetworkId::Devnet],
            }
        );
        assert_eq!(options.output_dir(), PathBuf::from("/project/out/ts"));
    }

    #[test]
    fn defaults_read_every_network_from_the_project() {
        let options =
            CodegenOptions::resolve(&Command::default(), Config::default(), Path::new("/p"));
        assert_eq!(options.artifact_dir, PathBuf::from("/p/artifacts"));
        assert_eq!(options.deployment_dir, PathBuf::from("/p"));
        assert!(!options.deployments_configured);
        assert_eq!(options.networks, NetworkId::ALL.to_vec());
    }
}
