use std::{
    env,
    io::{self, Write},
    path::{Component, Path, PathBuf},
};

use colored::Colorize;
use log::{debug, trace};

use crate::types::{CheckResult, PublishReport, Staleness};

/// Displays `path` relative to the current directory when possible.
fn display_path(path: &Path) -> String {
    let Ok(cwd) = env::current_dir() else {
        debug!("Failed to get current directory");
        return path.display().to_string();
    };
    match make_relative(path, &cwd) {
        Some(rel) => {
            trace!("Relativized '{}' to '{}'", path.display(), rel.display());
            rel.display().to_string()
        }
        None => path.display().to_string(),
    }
}

/// Create a relative path from `base` to `target`
fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    if target_parts.first() != base_parts.first() {
        return None;
    }

    let common = target_parts.iter().zip(&base_parts).take_while(|(t, b)| t == b).count();

    let mut result = PathBuf::new();
    for _ in &base_parts[common..] {
        result.push("..");
    }
    for component in &target_parts[common..] {
        match component {
            Component::Normal(p) => result.push(p),
            Component::ParentDir => result.push(".."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}

pub fn print_publish_summary<W: Write>(writer: &mut W, report: &PublishReport) -> io::Result<()> {
    debug!("Printing summary for {} job(s)", report.jobs.len());

    for job in &report.jobs {
        writeln!(
            writer,
            "{} {}  {} {} {}",
            "●".bright_blue(),
            job.target.bold(),
            display_path(&job.source_dir).blue(),
            "→".dimmed(),
            display_path(&job.destination_root).blue()
        )?;
        writeln!(
            writer,
            "   {} files: {} rewritten ({} specifiers), {} unchanged, {} copied",
            job.files().to_string().cyan(),
            job.rewritten.to_string().green(),
            job.substitutions.to_string().green(),
            job.unchanged,
            job.copied
        )?;
        if job.skipped > 0 {
            writeln!(
                writer,
                "   {} {} file(s) inside the destination were not republished",
                "⚠".yellow(),
                job.skipped.to_string().yellow()
            )?;
        }
    }

    writeln!(
        writer,
        "\n{} Published {} files in {} jobs ({} specifiers remapped).",
        "✓".green().bold(),
        report.files().to_string().cyan(),
        report.jobs.len().to_string().cyan(),
        report.substitutions().to_string().cyan()
    )?;
    writer.flush()?;
    Ok(())
}

pub fn print_check_result<W: Write>(writer: &mut W, result: &CheckResult) -> io::Result<()> {
    if result.stale.is_empty() {
        writeln!(
            writer,
            "{} All {} published files are up to date.",
            "✓".green().bold(),
            result.files_checked
        )?;
        writer.flush()?;
        return Ok(());
    }

    writeln!(
        writer,
        "{} {} of {} published files are stale\n",
        "⚠".yellow().bold(),
        result.stale.len().to_string().yellow(),
        result.files_checked
    )?;

    for (idx, stale) in result.stale.iter().enumerate() {
        let is_last = idx == result.stale.len() - 1;
        let prefix = if is_last { "└──" } else { "├──" };
        let status = match stale.staleness {
            Staleness::Missing => "missing ".red(),
            Staleness::Outdated => "outdated".yellow(),
        };
        writeln!(
            writer,
            "{}  {} {} {}",
            prefix.dimmed(),
            status,
            display_path(&stale.destination),
            format!("(from {}, target {})", display_path(&stale.source), stale.target).dimmed()
        )?;
    }

    writeln!(writer, "\nRun `modpub build` to republish.")?;
    writer.flush()?;
    Ok(())
}
