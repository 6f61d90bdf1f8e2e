use anyhow::{bail, Context, Result};
use clap::Parser;
use gphighlights::{
    collect_input_files, load_config_or_default, markers_from_highlights, process_files,
    BatchSummary, HighlightReport, ProjectTemplate,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "gp_highlights")]
#[command(author, version, about = "Extract GoPro HiLight tags into editor markers")]
struct Cli {
    /// MP4 files to process
    files: Vec<PathBuf>,

    /// Process every MP4 file in this directory
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project file used as the template for output projects
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Only print results; do not create folders or move videos
    #[arg(long)]
    no_organize: bool,

    /// Print markers as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn print_summary(summary: &BatchSummary, json: bool, edit_rate: u64, label: &str) -> Result<()> {
    for outcome in &summary.outcomes {
        let seconds = outcome.highlights.sorted_seconds();
        if json {
            let markers = markers_from_highlights(&seconds, edit_rate, label);
            println!("{}", serde_json::to_string_pretty(&markers)?);
            continue;
        }

        let file_name = outcome
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("Found {} highlight(s)!", seconds.len());
        print!("{}", HighlightReport::new(file_name, &seconds));
        if let Some(output) = &outcome.output {
            println!("Saved highlights under: {}", output.report_path.display());
        }
    }

    for failure in &summary.failures {
        eprintln!("Error: {}", failure);
    }
    Ok(())
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config_or_default(cli.config.as_deref())?;
    if let Some(template) = cli.template {
        config.template_path = template;
    }
    if cli.no_organize {
        config.organize = false;
    }

    let inputs = collect_input_files(&cli.files, cli.directory.as_deref())
        .context("failed to list input files")?;
    if inputs.is_empty() {
        bail!("no input files; pass MP4 files or --directory");
    }

    let template = if config.organize {
        let template = ProjectTemplate::load(&config.template_path).with_context(|| {
            format!(
                "failed to load project template {}",
                config.template_path.display()
            )
        })?;
        Some(template)
    } else {
        None
    };

    let summary = process_files(&inputs, template.as_ref(), &config);
    print_summary(&summary, cli.json, config.edit_rate, &config.marker_label)?;

    if summary.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
