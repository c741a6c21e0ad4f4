use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use mono_version::config::{self, Config};
use mono_version::domain::ProjectRef;
use mono_version::engine::{compute_version, DecisionInput};
use mono_version::git::{Git2Repository, Repository};
use mono_version::ui::{self, OutputFormat, ReportRow};
use mono_version::MonoVersionError;

#[derive(clap::Parser)]
#[command(
    name = "mono-version",
    about = "Compute per-project semantic versions in a monorepo from git history"
)]
struct Args {
    #[arg(short, long, help = "Custom manifest file path (defaults to monoversion.toml at the repository root)")]
    config: Option<PathBuf>,

    #[arg(long, default_value = ".", help = "Where to start repository discovery")]
    repo: PathBuf,

    #[arg(long, help = "Override the tag prefix from the manifest")]
    tag_prefix: Option<String>,

    #[arg(long, help = "Skip all computation and emit this version")]
    force_version: Option<String>,

    #[arg(long, help = "Also version projects marked as test projects")]
    include_test_projects: bool,

    #[arg(long, help = "Also version projects marked as not packable")]
    include_non_packable: bool,

    #[arg(long, help = "Append base-version detail to rationales")]
    debug: bool,

    #[arg(long, help = "Append tag statistics to rationales (implies --debug)")]
    extra_debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute versions for every project in the manifest
    Report {
        #[arg(short, long, value_enum, default_value = "text")]
        format: FormatArg,
    },
    /// Compute the version of a single project
    Version {
        /// Project name as it appears in the manifest
        project: String,

        #[arg(short, long, value_enum, default_value = "text")]
        format: FormatArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }
    Ok(())
}

fn run(args: Args) -> mono_version::Result<()> {
    let repo = Git2Repository::open(&args.repo)?;
    let root = repo
        .workdir()
        .ok_or_else(|| MonoVersionError::repo_unavailable("repository has no working directory"))?;

    let manifest = config::load_manifest(args.config.as_deref(), &root)?;
    let config = apply_overrides(manifest.settings.clone(), &args);
    let projects = manifest.projects();

    if projects.is_empty() {
        return Err(MonoVersionError::config(format!(
            "no projects configured; add [[projects]] entries to {}",
            config::DEFAULT_MANIFEST_NAME
        )));
    }

    let branch = repo.current_branch()?;

    match &args.command {
        Command::Report { format } => {
            let rows = projects
                .iter()
                .map(|project| decide(&repo, &branch.name, branch.tip, project, &projects, &config))
                .collect::<mono_version::Result<Vec<_>>>()?;
            print_report(&ui::render_report(&rows, (*format).into())?);
        }
        Command::Version { project, format } => {
            let target = projects
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(project))
                .ok_or_else(|| {
                    MonoVersionError::project(format!("unknown project '{}'", project))
                })?;
            let row = decide(&repo, &branch.name, branch.tip, target, &projects, &config)?;
            print_report(&ui::render_report(&[row], (*format).into())?);
        }
    }

    Ok(())
}

fn print_report(rendered: &str) {
    if rendered.ends_with('\n') {
        print!("{}", rendered);
    } else {
        println!("{}", rendered);
    }
}

fn apply_overrides(mut config: Config, args: &Args) -> Config {
    if let Some(tag_prefix) = &args.tag_prefix {
        config.tag_prefix = tag_prefix.clone();
    }
    if let Some(force_version) = &args.force_version {
        config.force_version = Some(force_version.clone());
    }
    if args.include_test_projects {
        config.skip_tests = false;
    }
    if args.include_non_packable {
        config.skip_non_packable = false;
    }
    config.debug |= args.debug || args.extra_debug;
    config.extra_debug |= args.extra_debug;
    config
}

fn decide(
    repo: &Git2Repository,
    branch_name: &str,
    head: git2::Oid,
    project: &ProjectRef,
    projects: &[ProjectRef],
    config: &Config,
) -> mono_version::Result<ReportRow> {
    let input = DecisionInput {
        branch_name: branch_name.to_string(),
        head_commit_id: head,
        project: project.clone(),
        tag_prefix: config.tag_prefix.clone(),
    };
    let output = compute_version(repo, &input, projects, config)?;

    Ok(ReportRow {
        project: project.name.clone(),
        version: output.version,
        changed: output.changed,
        rationale: output.rationale,
    })
}
