//! `illustrate-gen` command-line front end.
//!
//! ```text
//! illustrate-gen init job.toml --structure 2hhb.pdb --colors palette
//! illustrate-gen catalogue 2hhb.pdb --chain A --hetatm A:HEM
//! illustrate-gen generate job.toml -o 2hhb.inp
//! illustrate-gen preview job.toml --driver run_illustrate.sh --timeout 60
//! illustrate-gen schema
//! ```

// Results go to stdout; diagnostics go through `log`.
#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use illustrate_gen::job::Job;
use illustrate_gen::options::ViewConfig;
use illustrate_gen::pdb;
use illustrate_gen::script::SCRIPT_EXTENSION;
use illustrate_gen::select::{self, Selection};
use illustrate_gen::style::ColorScheme;
use serde_json::json;

#[derive(Parser)]
#[command(name = "illustrate-gen", version, about = "Script generator for the ILLUSTRATE renderer")]
struct Cli {
    /// Directory for uploaded copies, scripts and images
    #[arg(long, global = true)]
    scratch: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a job file, listing every atom type of a structure when given
    Init {
        /// Job file to create
        job: PathBuf,
        /// Structure to populate the job from
        #[arg(long)]
        structure: Option<PathBuf>,
        /// Starting colors: chain, palette or element
        #[arg(long, default_value_t = ColorScheme::Chain)]
        colors: ColorScheme,
        /// Overwrite an existing job file
        #[arg(long)]
        force: bool,
    },
    /// Print chains, HETATM residues and atom types as JSON
    Catalogue {
        /// PDB file
        pdb: PathBuf,
        /// Chain to include (repeatable; all chains when omitted)
        #[arg(long = "chain")]
        chains: Vec<char>,
        /// HETATM residue as CHAIN:RESIDUE (repeatable; all when omitted)
        #[arg(long)]
        hetatm: Vec<String>,
    },
    /// Build the script for a job and print it
    Generate {
        /// Job file
        job: PathBuf,
        /// Where to write the script (default: next to the job file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate, then run the renderer and print the image path
    Preview {
        /// Job file
        job: PathBuf,
        /// Renderer binary (overrides the job file)
        #[arg(long)]
        renderer: Option<PathBuf>,
        /// Driver script (overrides the job file)
        #[arg(long)]
        driver: Option<PathBuf>,
        /// Timeout in seconds (overrides the job file)
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Print the JSON schema of the view options
    Schema,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let scratch = cli
        .scratch
        .unwrap_or_else(|| std::env::temp_dir().join("illustrate-gen"));

    match cli.command {
        Command::Init {
            job,
            structure,
            colors,
            force,
        } => init(&job, structure.as_deref(), colors, force),
        Command::Catalogue {
            pdb,
            chains,
            hetatm,
        } => catalogue(&pdb, &chains, &hetatm),
        Command::Generate { job, output } => {
            generate(&job, output.as_deref(), &scratch)
        }
        Command::Preview {
            job,
            renderer,
            driver,
            timeout,
        } => {
            let mut loaded = load_job(&job)?;
            if let Some(binary) = renderer {
                loaded.renderer.binary = binary;
            }
            if let Some(driver) = driver {
                loaded.renderer.driver = driver;
            }
            if let Some(secs) = timeout {
                loaded.renderer.timeout_secs = secs;
            }
            let mut session = loaded.session(&scratch)?;
            let image = session
                .preview(&loaded.renderer)
                .context("preview failed")?;
            println!("{}", image.display());
            Ok(())
        }
        Command::Schema => {
            let schema = serde_json::to_string_pretty(&ViewConfig::json_schema())?;
            println!("{schema}");
            Ok(())
        }
    }
}

fn load_job(path: &Path) -> Result<Job> {
    Job::load(path).with_context(|| format!("reading job {}", path.display()))
}

fn init(
    path: &Path,
    structure: Option<&Path>,
    colors: ColorScheme,
    force: bool,
) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let mut job = Job::default();
    if let Some(structure) = structure {
        let bytes = std::fs::read(structure)
            .with_context(|| format!("reading {}", structure.display()))?;
        job.populate(&pdb::scan(&bytes)?, colors);
        job.structure = structure.display().to_string();
    }
    job.save(path)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

fn catalogue(path: &Path, chains: &[char], hetatm: &[String]) -> Result<()> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let scan = pdb::scan(&bytes)?;

    let mut selection = Selection::new();
    let chains: Vec<char> = if chains.is_empty() {
        scan.chains.iter().copied().collect()
    } else {
        chains.to_vec()
    };
    for &chain in &chains {
        selection.select_chain(chain);
        if hetatm.is_empty() {
            for residue in scan.hetatm_residues(chain) {
                selection.select_hetatm(chain, residue);
            }
        }
    }
    for spec in hetatm {
        let Some((chain, residue)) = spec.split_once(':') else {
            bail!("--hetatm expects CHAIN:RESIDUE, got {spec:?}");
        };
        let mut chars = chain.chars();
        let (Some(chain), None) = (chars.next(), chars.next()) else {
            bail!("--hetatm chain must be one character, got {spec:?}");
        };
        selection.select_hetatm(chain, residue);
    }

    let report = json!({
        "chains": scan.chains.iter().map(char::to_string).collect::<Vec<_>>(),
        "hetatm": &scan.hetatm_by_chain,
        "types": select::catalogue(&scan, &selection).to_json(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn generate(path: &Path, output: Option<&Path>, scratch: &Path) -> Result<()> {
    let job = load_job(path)?;
    let mut session = job.session(scratch)?;
    if let Some(upload) = session.current() {
        log::info!("Generating for {} ({:.1} KiB)", upload.name, upload.size_kib);
    }
    let outcome = session.generate()?;
    if let Some(e) = outcome.write_error {
        log::warn!("scratch copy not written: {e}");
    }

    let target = match output {
        Some(target) => target.to_path_buf(),
        None => {
            let name = session.output_name()?;
            let stem = Path::new(&name)
                .file_stem()
                .map_or_else(|| "illustration".into(), |s| s.to_string_lossy());
            path.with_file_name(format!("{stem}.{SCRIPT_EXTENSION}"))
        }
    };
    std::fs::write(&target, &outcome.script)
        .with_context(|| format!("writing {}", target.display()))?;
    log::info!("Wrote {}", target.display());
    println!("{}", outcome.script);
    Ok(())
}
