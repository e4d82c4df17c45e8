use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use pattern_patch::config::{load_from_path, resolve, PatchParams, TextSource};
use pattern_patch::{Direction, FileOutcome, FilePatcher, Mode, PatchSpec};
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pattern-patch")]
#[command(about = "Apply and revert pattern-based patches to any text file", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG also works)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append, prepend or replace text at pattern matches
    Apply(PatchArgs),

    /// Take an append or prepend patch back out
    Revert(PatchArgs),
}

#[derive(Args)]
struct PatchArgs {
    /// Files to patch
    files: Vec<PathBuf>,

    /// Regular expression to match (^ and $ match at line boundaries)
    #[arg(short, long)]
    regexp: Option<String>,

    /// Text used to modify the match
    #[arg(short, long, conflicts_with = "text_file")]
    text: Option<String>,

    /// Read the patch text from a file
    #[arg(long)]
    text_file: Option<PathBuf>,

    /// append, prepend or replace [default: append]
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Patch all occurrences of the pattern; --global=false overrides a patch file
    #[arg(
        short,
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    global: Option<bool>,

    /// Byte offset from which to start matching [default: 0]
    #[arg(short, long)]
    offset: Option<usize>,

    /// YAML file specifying patch data; arguments override its values
    #[arg(short, long)]
    patch: Option<PathBuf>,

    /// Dry run - show what would be changed without modifying files
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show unified diff of changes
    #[arg(short, long)]
    diff: bool,
}

impl PatchArgs {
    /// Parameters given on the command line, unset where the flag was absent.
    fn direct_params(&self) -> PatchParams {
        let text = match (&self.text, &self.text_file) {
            (Some(text), _) => Some(TextSource::Inline(text.clone())),
            (None, Some(path)) => Some(TextSource::File(path.clone())),
            (None, None) => None,
        };

        PatchParams {
            regexp: self.regexp.clone(),
            text,
            mode: self.mode,
            global: self.global,
            offset: self.offset,
        }
    }

    fn resolve_spec(&self) -> Result<PatchSpec> {
        let file_params = match &self.patch {
            Some(path) => load_from_path(path)?,
            None => PatchParams::default(),
        };
        Ok(resolve(file_params, self.direct_params()).into_spec()?)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Apply(args) => cmd_patch(Direction::Apply, args),
        Commands::Revert(args) => cmd_patch(Direction::Revert, args),
    }
}

/// Print the hunks one file's patch changed, with a few lines of context.
fn display_diff(file: &Path, direction: Direction, before: &str, after: &str) {
    let diff = TextDiff::from_lines(before, after);

    println!(
        "\n{}",
        format!("--- {} (before {})", file.display(), direction).dimmed()
    );
    println!(
        "{}",
        format!("+++ {} (after {})", file.display(), direction).dimmed()
    );

    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        println!("{}", hunk.header().to_string().cyan());
        for change in hunk.iter_changes() {
            let line = match change.tag() {
                ChangeTag::Delete => format!("-{}", change).red(),
                ChangeTag::Insert => format!("+{}", change).green(),
                ChangeTag::Equal => format!(" {}", change).normal(),
            };
            // Display of a Change supplies a missing final newline
            print!("{}", line);
        }
    }
}

fn cmd_patch(direction: Direction, args: PatchArgs) -> Result<()> {
    let spec = args.resolve_spec()?;

    println!(
        "{} /{}/ ({}{})",
        match direction {
            Direction::Apply => "Applying",
            Direction::Revert => "Reverting",
        },
        spec.pattern.as_str(),
        spec.mode,
        if spec.global { ", global" } else { "" }
    );
    if args.dry_run {
        println!("{}", "  [DRY RUN - no files will be written]".cyan());
    }

    let show_diff = args.diff;
    let outcomes = FilePatcher::new(&spec, direction)
        .dry_run(args.dry_run)
        .run(&args.files, |file, before, after| {
            if show_diff {
                display_diff(file, direction, before, after);
            }
        })
        .with_context(|| format!("failed to {} patch", direction))?;

    let mut patched = 0;
    let mut unchanged = 0;

    for outcome in &outcomes {
        match outcome {
            FileOutcome::Patched {
                file,
                bytes_before,
                bytes_after,
            } => {
                let verb = if args.dry_run { "Would patch" } else { "Patched" };
                println!(
                    "{} {} {} ({} -> {} bytes)",
                    "✓".green(),
                    verb,
                    file.display(),
                    bytes_before,
                    bytes_after
                );
                patched += 1;
            }
            FileOutcome::Unchanged { file } => {
                println!("{} {}: no match", "⊙".yellow(), file.display());
                unchanged += 1;
            }
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} patched", format!("{}", patched).green());
    println!("  {} unchanged", format!("{}", unchanged).yellow());

    Ok(())
}
