//! CLI interface for applykit.
//!
//! Each subcommand is non-interactive: arguments in, text out. Command
//! output goes to stdout, confirmations and diagnostics to stderr.
//!
//! Application ids may be given in full or as an unambiguous prefix.

mod format;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;

use crate::config::Config;
use crate::generate::CommandGenerator;
use crate::model::{ApplicationRecord, AssetKind, GeneratedAssets, OverallStatus, RecordId};
use crate::storage::Storage;
use crate::tracker::{NewApplication, SortKey, Tracker};

use format::{format_email_kit, format_interview_prep, format_list_line, format_record};

/// applykit: keep track of job applications and their generated kits.
#[derive(Debug, Parser)]
#[command(name = "applykit", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Storage directory. Overrides `data-dir` from the config file.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: tracking an application
  1. applykit profile set profile.md
  2. applykit save --title 'Platform Engineer' --company Acme \
       --description-file job.txt --resume-file resume.html
     → prints the application id (e.g. 3f2a9c1e-...)
  3. applykit stage add 3f2 'Phone Screen'
  4. applykit stage set 3f2 2
  5. applykit generate 3f2 interview-prep
  6. applykit list --sort progress
  7. applykit export 3f2 resume --out resume.html
     (edit resume.html)
     applykit import 3f2 resume resume.html";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save a generated kit as a new tracked application. Prints its id.
    Save {
        /// Job title.
        #[arg(long)]
        title: String,

        /// Hiring company. Recorded as "Unknown Company" when omitted.
        #[arg(long, default_value = "")]
        company: String,

        /// File holding the job description.
        #[arg(long)]
        description_file: PathBuf,

        /// File holding the candidate profile. Defaults to the saved profile.
        #[arg(long)]
        profile_file: Option<PathBuf>,

        /// Tailored resume (HTML).
        #[arg(long)]
        resume_file: PathBuf,

        /// Cover letter, if already written.
        #[arg(long)]
        cover_letter_file: Option<PathBuf>,

        /// Strategy narrative, if already written.
        #[arg(long)]
        strategy_file: Option<PathBuf>,
    },

    /// List applications with their status.
    List {
        /// Ordering of the list.
        #[arg(long, value_enum, default_value_t = SortArg::Time)]
        sort: SortArg,
    },

    /// Show one application: pipeline and assets.
    Show {
        /// Application id or prefix.
        id: String,
    },

    /// Set the overall status of an application.
    Status {
        /// Application id or prefix.
        id: String,

        #[arg(value_enum)]
        status: StatusArg,
    },

    /// Manage recruitment stages.
    Stage {
        #[command(subcommand)]
        command: StageCommand,
    },

    /// Generate a missing asset with the configured generator.
    ///
    /// Uses the job description and profile captured when the application
    /// was saved.
    Generate {
        /// Application id or prefix.
        id: String,

        #[arg(value_enum)]
        asset: AssetArg,

        /// Regenerate even if the asset is already present.
        #[arg(long)]
        force: bool,
    },

    /// Write an asset to a file or stdout.
    Export {
        /// Application id or prefix.
        id: String,

        #[arg(value_enum)]
        asset: ExportArg,

        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace a saved asset with the contents of a file.
    ///
    /// Pairs with `export`: export, edit, import back.
    Import {
        /// Application id or prefix.
        id: String,

        #[arg(value_enum)]
        asset: ImportArg,

        /// File holding the new content.
        file: PathBuf,
    },

    /// Delete a rejected application. Cannot be undone.
    Delete {
        /// Application id or prefix.
        id: String,

        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },

    /// Manage the saved candidate profile.
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum StageCommand {
    /// Append a custom stage to the end of the pipeline.
    Add {
        /// Application id or prefix.
        id: String,

        /// Stage name, e.g. "Home Assignment".
        label: String,
    },

    /// Mark a stage as current. Earlier stages become completed.
    ///
    /// Reactivates a rejected or ghosted application.
    Set {
        /// Application id or prefix.
        id: String,

        /// Stage position as shown by `show`, starting at 1.
        position: usize,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Save the candidate profile from a Markdown file.
    Set { file: PathBuf },

    /// Print the saved profile.
    Show,
}

/// CLI-facing sort order, mapped to the domain `SortKey`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Newest first.
    Time,
    /// Company A to Z.
    Az,
    /// Furthest along first.
    Progress,
}

impl SortArg {
    fn to_domain(self) -> SortKey {
        match self {
            Self::Time => SortKey::Time,
            Self::Az => SortKey::Az,
            Self::Progress => SortKey::Progress,
        }
    }
}

/// CLI-facing overall status, mapped to the domain `OverallStatus`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Active,
    Rejected,
    Hired,
    /// No response.
    Ghosted,
}

impl StatusArg {
    fn to_domain(self) -> OverallStatus {
        match self {
            Self::Active => OverallStatus::Active,
            Self::Rejected => OverallStatus::Rejected,
            Self::Hired => OverallStatus::Hired,
            Self::Ghosted => OverallStatus::Ghosted,
        }
    }
}

/// CLI-facing generated asset, mapped to the domain `AssetKind`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AssetArg {
    CoverLetter,
    StrategyStory,
    InterviewPrep,
    EmailKit,
}

impl AssetArg {
    fn to_domain(self) -> AssetKind {
        match self {
            Self::CoverLetter => AssetKind::CoverLetter,
            Self::StrategyStory => AssetKind::StrategyStory,
            Self::InterviewPrep => AssetKind::InterviewPrep,
            Self::EmailKit => AssetKind::EmailKit,
        }
    }
}

/// Any asset, including the resume.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportArg {
    Resume,
    CoverLetter,
    StrategyStory,
    InterviewPrep,
    EmailKit,
}

/// Assets that can be edited by hand and imported back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportArg {
    Resume,
    CoverLetter,
    StrategyStory,
}

impl ImportArg {
    fn label(self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::CoverLetter => "cover letter",
            Self::StrategyStory => "strategy story",
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    let root = cli
        .data_dir
        .or_else(|| config.data_dir.clone())
        .or_else(Storage::default_root)
        .ok_or("could not determine home directory")?;
    let storage = Storage::new(&root)
        .map_err(|e| format!("failed to open storage at {}: {e}", root.display()))?;

    let mut tracker =
        Tracker::load(storage).map_err(|e| format!("failed to load history: {e}"))?;

    match cli.command {
        Command::Save {
            title,
            company,
            description_file,
            profile_file,
            resume_file,
            cover_letter_file,
            strategy_file,
        } => {
            let profile_content = match profile_file {
                Some(path) => read_file(&path)?,
                None => tracker
                    .store()
                    .load_profile()
                    .map_err(|e| format!("failed to read saved profile: {e}"))?
                    .ok_or("no saved profile: pass --profile-file or run `applykit profile set`")?,
            };
            let new = NewApplication {
                title,
                company,
                description: read_file(&description_file)?,
                profile_content,
                assets: GeneratedAssets {
                    resume_html: read_file(&resume_file)?,
                    cover_letter: cover_letter_file.as_deref().map(read_file).transpose()?,
                    strategy_story: strategy_file.as_deref().map(read_file).transpose()?,
                    ..Default::default()
                },
            };
            cmd_save(&mut tracker, new)
        }
        Command::List { sort } => {
            cmd_list(&tracker, sort.to_domain());
            Ok(())
        }
        Command::Show { id } => {
            let record = resolve(&tracker, &id)?;
            print!("{}", format_record(record));
            Ok(())
        }
        Command::Status { id, status } => cmd_status(&mut tracker, &id, status.to_domain()),
        Command::Stage { command } => match command {
            StageCommand::Add { id, label } => cmd_stage_add(&mut tracker, &id, &label),
            StageCommand::Set { id, position } => cmd_stage_set(&mut tracker, &id, position),
        },
        Command::Generate { id, asset, force } => {
            cmd_generate(config, &mut tracker, &id, asset.to_domain(), force)
        }
        Command::Export { id, asset, out } => {
            let record = resolve(&tracker, &id)?;
            cmd_export(record, asset, out.as_deref())
        }
        Command::Import { id, asset, file } => cmd_import(&mut tracker, &id, asset, &file),
        Command::Delete { id, yes } => cmd_delete(&mut tracker, &id, yes),
        Command::Profile { command } => cmd_profile(tracker.store(), &command),
    }
}

fn cmd_save(tracker: &mut Tracker<Storage>, new: NewApplication) -> Result<(), String> {
    let record = tracker
        .create(new)
        .map_err(|e| format!("failed to save application: {e}"))?;
    println!("{}", record.id);
    Ok(())
}

fn cmd_list(tracker: &Tracker<Storage>, sort: SortKey) {
    let records = tracker.sorted(sort);
    if records.is_empty() {
        println!("No applications");
        return;
    }
    for record in records {
        println!("{}", format_list_line(record));
    }
}

fn cmd_status(
    tracker: &mut Tracker<Storage>,
    reference: &str,
    status: OverallStatus,
) -> Result<(), String> {
    let id = resolve_id(tracker, reference)?;
    tracker
        .set_overall_status(&id, status)
        .map_err(|e| format!("failed to update status: {e}"))?;
    eprintln!("Application {} marked {status}", id.short());
    Ok(())
}

fn cmd_stage_add(
    tracker: &mut Tracker<Storage>,
    reference: &str,
    label: &str,
) -> Result<(), String> {
    let id = resolve_id(tracker, reference)?;
    let record = tracker
        .add_stage(&id, label)
        .map_err(|e| format!("failed to add stage: {e}"))?;
    eprintln!("Added stage {}: {}", record.stages.len(), label.trim());
    Ok(())
}

fn cmd_stage_set(
    tracker: &mut Tracker<Storage>,
    reference: &str,
    position: usize,
) -> Result<(), String> {
    let index = position
        .checked_sub(1)
        .ok_or("stage positions start at 1")?;
    let id = resolve_id(tracker, reference)?;
    let record = tracker
        .set_stage_current(&id, index)
        .map_err(|e| format!("failed to set stage: {e}"))?;
    eprintln!(
        "Application {} now at: {} [{}]",
        id.short(),
        record.stages[index].label,
        record.overall_status
    );
    Ok(())
}

fn cmd_generate(
    config: &Config,
    tracker: &mut Tracker<Storage>,
    reference: &str,
    kind: AssetKind,
    force: bool,
) -> Result<(), String> {
    let id = resolve_id(tracker, reference)?;
    if !force && resolve(tracker, reference)?.assets.has(kind) {
        return Err(format!(
            "application {} already has a {kind}; pass --force to regenerate",
            id.short()
        ));
    }

    let generator = CommandGenerator::from_config(&config.generator).map_err(|e| e.to_string())?;
    eprintln!("Generating {kind}, this can take a while...");
    tracker
        .generate_missing(&id, kind, &generator)
        .map_err(|e| format!("failed to generate {kind}: {e}"))?;
    eprintln!("Attached {kind} to application {}", id.short());
    Ok(())
}

fn cmd_export(
    record: &ApplicationRecord,
    asset: ExportArg,
    out: Option<&Path>,
) -> Result<(), String> {
    let text = export_text(record, asset)?;

    match out {
        Some(path) => {
            fs::write(path, &text)
                .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Text of one asset. Generated assets that `show` lists as missing are
/// refused, including ones stored empty.
fn export_text(record: &ApplicationRecord, asset: ExportArg) -> Result<String, String> {
    let assets = &record.assets;
    let kind = match asset {
        ExportArg::Resume => return Ok(assets.resume_html.clone()),
        ExportArg::CoverLetter => AssetKind::CoverLetter,
        ExportArg::StrategyStory => AssetKind::StrategyStory,
        ExportArg::InterviewPrep => AssetKind::InterviewPrep,
        ExportArg::EmailKit => AssetKind::EmailKit,
    };
    if !assets.has(kind) {
        return Err(format!(
            "application {} has no {kind} yet; run `applykit generate`",
            record.id.short()
        ));
    }

    let text = match kind {
        AssetKind::CoverLetter => assets.cover_letter.clone(),
        AssetKind::StrategyStory => assets.strategy_story.clone(),
        AssetKind::InterviewPrep => assets.interview_prep.as_deref().map(format_interview_prep),
        AssetKind::EmailKit => assets.email_kit.as_ref().map(format_email_kit),
    };
    Ok(text.unwrap_or_default())
}

fn cmd_import(
    tracker: &mut Tracker<Storage>,
    reference: &str,
    asset: ImportArg,
    file: &Path,
) -> Result<(), String> {
    let content = read_file(file)?;
    if content.trim().is_empty() {
        return Err(format!("{} is empty; nothing to import", file.display()));
    }

    let record = resolve(tracker, reference)?;
    let id = record.id.clone();
    let assets = replace_asset(record.assets.clone(), asset, content);
    tracker
        .update_assets(&id, assets)
        .map_err(|e| format!("failed to update assets: {e}"))?;
    eprintln!("Replaced {} for application {}", asset.label(), id.short());
    Ok(())
}

fn replace_asset(mut assets: GeneratedAssets, asset: ImportArg, content: String) -> GeneratedAssets {
    match asset {
        ImportArg::Resume => assets.resume_html = content,
        ImportArg::CoverLetter => assets.cover_letter = Some(content),
        ImportArg::StrategyStory => assets.strategy_story = Some(content),
    }
    assets
}

fn cmd_delete(tracker: &mut Tracker<Storage>, reference: &str, yes: bool) -> Result<(), String> {
    let record = resolve(tracker, reference)?;
    if !record.is_deletable() {
        warn!(id = %record.id, status = %record.overall_status, "refused to delete application");
        return Err(format!(
            "only rejected applications can be deleted; {} is {}",
            record.id.short(),
            record.overall_status
        ));
    }
    if !yes {
        return Err(format!(
            "deleting {} at {} cannot be undone; pass --yes to confirm",
            record.title, record.company
        ));
    }

    let id = record.id.clone();
    tracker
        .delete_record(&id)
        .map_err(|e| format!("failed to delete application: {e}"))?;
    eprintln!("Deleted application {}", id.short());
    Ok(())
}

fn cmd_profile(storage: &Storage, command: &ProfileCommand) -> Result<(), String> {
    match command {
        ProfileCommand::Set { file } => {
            let content = read_file(file)?;
            storage
                .save_profile(&content)
                .map_err(|e| format!("failed to save profile: {e}"))?;
            eprintln!("Profile saved from {}", file.display());
        }
        ProfileCommand::Show => {
            let profile = storage
                .load_profile()
                .map_err(|e| format!("failed to read profile: {e}"))?
                .ok_or("no saved profile")?;
            print!("{profile}");
        }
    }
    Ok(())
}

fn resolve<'a>(tracker: &'a Tracker<Storage>, reference: &str) -> Result<&'a ApplicationRecord, String> {
    tracker.resolve(reference).map_err(|e| e.to_string())
}

fn resolve_id(tracker: &Tracker<Storage>, reference: &str) -> Result<RecordId, String> {
    resolve(tracker, reference).map(|r| r.id.clone())
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))
}
