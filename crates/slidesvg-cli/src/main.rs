use std::path::{Path, PathBuf};

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, WrapErr};
use slidesvg::{BatchConverter, ConvertOptions, Manifest, Theme, load_presentation};
use tracing_subscriber::EnvFilter;

/// Convert the slides of a presentation into flatmap SVG drawings
#[derive(Parser, Debug)]
#[command(name = "slidesvg", version, about)]
struct Args {
    /// Presentation document model (JSON)
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath,
          conflicts_with = "map", required_unless_present = "map")]
    document: Option<PathBuf>,

    /// Flatmap directory whose manifest names the slides source
    #[arg(long, value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    map: Option<PathBuf>,

    /// Read the theme colours from a presentation package
    #[arg(long, value_name = "PPTX", value_hint = clap::ValueHint::FilePath)]
    theme_package: Option<PathBuf>,

    /// Also write each slide's document model as JSON
    #[arg(short, long)]
    debug: bool,

    /// Don't show a progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Convert slides in parallel
    #[arg(long)]
    parallel: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slidesvg=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn progress_bar(slides: usize) -> miette::Result<ProgressBar> {
    let bar = ProgressBar::new(slides as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} slides")
            .into_diagnostic()?,
    );
    Ok(bar)
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    init_tracing();

    // Work out where the deck comes from and where drawings go
    let (mut manifest, document, output_dir) = match (&args.map, &args.document) {
        (Some(map), _) => {
            let manifest = Manifest::load(map)?;
            let document = map.join(manifest.slides_source()?);
            (manifest, document, map.clone())
        }
        (None, Some(document)) => {
            let output_dir = document
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            (Manifest::new(), document.clone(), output_dir)
        }
        (None, None) => miette::bail!("either --document or --map is required"),
    };

    let mut presentation = load_presentation(&document)?;
    if presentation.source_name.is_none() {
        presentation.source_name = document
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
    }

    let options = ConvertOptions {
        debug: args.debug,
        parallel: args.parallel,
        ..ConvertOptions::new(&output_dir)
    };
    let mut converter = BatchConverter::new(&presentation, options);
    if let Some(package) = &args.theme_package {
        let theme = Theme::from_package(package)
            .wrap_err_with(|| format!("reading theme from {}", package.display()))?;
        converter = converter.with_theme(theme);
    }

    let report = if args.quiet {
        converter.run()?
    } else {
        let bar = progress_bar(converter.slide_count())?;
        let report = converter.run_with_progress(&|_| bar.inc(1));
        bar.finish_and_clear();
        report?
    };

    for diagnostic in &report.diagnostics {
        tracing::warn!("{diagnostic}");
    }

    manifest.update(&report)?;
    let saved = manifest.save(&output_dir)?;
    tracing::info!(
        slides = report.saved.len(),
        manifest = %saved.display(),
        "saved drawings"
    );
    Ok(())
}
