//! Build a site with per-step timing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use sitekit_observability::{StepTimer, StructuredLogger};
use walkdir::WalkDir;

use super::BuildArgs;
use crate::context::Context;
use crate::output::format_bytes;

/// Name of the content token file written into the output directory.
pub const TOKEN_FILE: &str = ".sitekit-token";

/// Run the build command.
pub async fn run(args: BuildArgs, ctx: &Context) -> Result<()> {
    let source = match args.source {
        Some(ref path) => ctx.resolve_path(path),
        None => ctx.source_dir(),
    };
    let output = match args.output {
        Some(ref path) => ctx.resolve_path(path),
        None => ctx.output_dir(),
    };
    let title = args.title.unwrap_or_else(|| ctx.config.site.title.clone());

    if !source.is_dir() {
        bail!("Source directory {} does not exist", source.display());
    }

    ctx.output.header(&format!("Building {}", title));
    ctx.output.debug(&format!("{} -> {}", source.display(), output.display()));

    let timer = StepTimer::from_config(&ctx.config.timing);

    ctx.output.step(1, 3, "Scanning sources");
    let files = scan_sources(&timer, &source, &output)?;
    ctx.output.kv("Files", &files.len().to_string());

    ctx.output.step(2, 3, "Copying files");
    let spinner = ctx.output.spinner("Copying...");
    let copied = copy_sources(&timer, &source, &output, &files);
    spinner.finish_and_clear();
    let bytes = copied?;

    ctx.output.step(3, 3, "Writing content token");
    let token = write_token(&timer, &output, files.len())?;
    ctx.output.debug(&format!("token {}", token));

    if ctx.output.is_json() {
        println!("{}", timer.report(&title).to_json());
    } else {
        let logger = StructuredLogger::new().with_site(&title);
        timer.log_report(&title, &logger);
    }

    ctx.output.success("Build complete!");
    ctx.output.kv("Output", &output.display().to_string());
    ctx.output.kv("Size", &format_bytes(bytes));

    Ok(())
}

/// Collect source files as paths relative to `source`, sorted.
///
/// `exclude` is skipped when the output directory lives inside the source.
pub fn scan_sources(timer: &StepTimer, source: &Path, exclude: &Path) -> Result<Vec<PathBuf>> {
    timer.start("scan")?;

    // Symlinked directories are not followed, so link cycles end the walk
    let walker = WalkDir::new(source)
        .into_iter()
        .filter_entry(|entry| entry.path() != exclude);

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", source.display()))?;
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(source) {
            files.push(relative.to_path_buf());
        }
    }
    files.sort();

    timer.stop("scan", files.len() as u64)?;
    Ok(files)
}

/// Copy the scanned files into `output`. Returns the number of bytes copied.
pub fn copy_sources(
    timer: &StepTimer,
    source: &Path,
    output: &Path,
    files: &[PathBuf],
) -> Result<u64> {
    timer.start("copy")?;

    let mut bytes = 0;
    for file in files {
        let from = source.join(file);
        let to = output.join(file);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        bytes += fs::copy(&from, &to)
            .with_context(|| format!("Failed to copy {}", from.display()))?;
    }

    timer.stop("copy", files.len() as u64)?;
    Ok(bytes)
}

/// Write the content token the development server answers pings with.
pub fn write_token(timer: &StepTimer, output: &Path, file_count: usize) -> Result<String> {
    timer.start("stamp")?;

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let token = format!("{}-{}", chrono::Utc::now().timestamp_millis(), file_count);
    let path = output.join(TOKEN_FILE);
    fs::write(&path, &token).with_context(|| format!("Failed to write {}", path.display()))?;

    timer.stop("stamp", 1)?;
    Ok(token)
}
