use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};

use git_release::config::{load_config, Config};
use git_release::domain::{BumpType, Scheme};
use git_release::git::{Git2Repository, Repository as _};
use git_release::hotfix::HotfixEngine;
use git_release::release::Releaser;
use git_release::ui;

#[derive(Parser)]
#[command(
    name = "git-release",
    about = "Compute and create release tags with semver, calver and hotfix tracks"
)]
struct Args {
    #[arg(
        short,
        long,
        global = true,
        help = "Custom configuration file path"
    )]
    config: Option<String>,

    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Repository directory"
    )]
    repo_dir: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the effective version from tags and working tree state
    Version,

    /// Compute the next version without creating anything
    Next {
        #[arg(long, default_value = "patch", help = "Semver bump type: major, minor or patch")]
        bump: String,

        #[arg(long, help = "Prerelease identifier (e.g. rc.1)")]
        pre: Option<String>,

        #[arg(long, help = "Build metadata")]
        meta: Option<String>,
    },

    /// Create the next release tag at HEAD
    Tag {
        #[arg(long, default_value = "patch", help = "Semver bump type: major, minor or patch")]
        bump: String,

        #[arg(long, help = "Prerelease identifier (e.g. rc.1)")]
        pre: Option<String>,

        #[arg(long, help = "Build metadata")]
        meta: Option<String>,

        #[arg(short, long, help = "Custom tag message")]
        message: Option<String>,

        #[arg(long, help = "Push the tag to origin after creation")]
        push: bool,

        #[arg(long, help = "Allow tagging with uncommitted changes")]
        force: bool,

        #[arg(long, help = "Show what would happen without making changes")]
        dry_run: bool,
    },

    /// List release tags with commit, date and message
    Tags,

    /// Manage hotfix branches and tags
    Hotfix {
        #[command(subcommand)]
        command: HotfixCommand,
    },
}

#[derive(Subcommand)]
enum HotfixCommand {
    /// Create a hotfix branch from a release tag
    Create {
        base_tag: String,

        #[arg(long, help = "Create the branch without checking it out")]
        no_checkout: bool,

        #[arg(long, help = "Show what would happen without making changes")]
        dry_run: bool,
    },

    /// Create the next hotfix tag on the current hotfix branch
    Bump {
        #[arg(short, long, help = "Base tag to bump against (skips branch detection)")]
        base: Option<String>,

        #[arg(short, long, help = "Custom tag message")]
        message: Option<String>,

        #[arg(long, help = "Push the tag to origin after creation")]
        push: bool,

        #[arg(long, help = "Show what would happen without making changes")]
        dry_run: bool,
    },

    /// Show hotfix context for the current branch
    Status,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let repo = Git2Repository::open(&args.repo_dir)?;

    match args.command {
        Command::Version => run_version(&repo, &config),
        Command::Next { bump, pre, meta } => run_next(&repo, &config, &bump, pre, meta),
        Command::Tag {
            bump,
            pre,
            meta,
            message,
            push,
            force,
            dry_run,
        } => run_tag(&repo, &config, &bump, pre, meta, message, push, force, dry_run),
        Command::Tags => run_tags(&repo, &config),
        Command::Hotfix { command } => match command {
            HotfixCommand::Create {
                base_tag,
                no_checkout,
                dry_run,
            } => run_hotfix_create(&repo, &config, &base_tag, no_checkout, dry_run),
            HotfixCommand::Bump {
                base,
                message,
                push,
                dry_run,
            } => run_hotfix_bump(&repo, &config, base, message, push, dry_run),
            HotfixCommand::Status => run_hotfix_status(&repo, &config),
        },
    }
}

fn run_version(repo: &Git2Repository, config: &Config) -> Result<()> {
    let releaser = Releaser::new(repo, config.version.tag_prefix.clone(), false);

    let version = releaser.effective_version()?;
    let commit = repo.short_commit()?;

    ui::display_version_summary(&version, &config.version.scheme, &commit);
    Ok(())
}

fn next_version_inputs(
    config: &Config,
    bump: &str,
    pre: Option<String>,
    meta: Option<String>,
) -> Result<(Scheme, BumpType, String, String)> {
    let scheme = config.version.scheme()?;
    let bump: BumpType = bump.parse()?;
    let pre = pre.unwrap_or_else(|| config.version.pre.clone());
    let meta = meta.unwrap_or_else(|| config.version.meta.clone());
    Ok((scheme, bump, pre, meta))
}

fn run_next(
    repo: &Git2Repository,
    config: &Config,
    bump: &str,
    pre: Option<String>,
    meta: Option<String>,
) -> Result<()> {
    let (scheme, bump, pre, meta) = next_version_inputs(config, bump, pre, meta)?;
    let releaser = Releaser::new(repo, config.version.tag_prefix.clone(), false);

    let next = releaser.next_version(
        scheme,
        bump,
        &config.version.calver_format,
        Utc::now(),
        &pre,
        &meta,
    )?;

    println!("{}", next);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_tag(
    repo: &Git2Repository,
    config: &Config,
    bump: &str,
    pre: Option<String>,
    meta: Option<String>,
    message: Option<String>,
    push: bool,
    force: bool,
    dry_run: bool,
) -> Result<()> {
    let (scheme, bump, pre, meta) = next_version_inputs(config, bump, pre, meta)?;
    let releaser = Releaser::new(repo, config.version.tag_prefix.clone(), dry_run);

    if !force {
        releaser.ensure_clean_working_tree()?;
    }

    let tag = releaser.create_next_tag(
        scheme,
        bump,
        &config.version.calver_format,
        Utc::now(),
        &pre,
        &meta,
        message.as_deref(),
    )?;

    if dry_run {
        ui::display_status(&format!("dry-run: would create tag {}", tag));
        return Ok(());
    }

    ui::display_success(&format!("Created tag: {}", tag));

    if push {
        releaser.push_tag("origin", &tag)?;
        ui::display_success(&format!("Pushed tag to origin: {}", tag));
    } else {
        ui::display_manual_push_instruction(&tag, "origin");
    }

    Ok(())
}

fn run_tags(repo: &Git2Repository, config: &Config) -> Result<()> {
    let releaser = Releaser::new(repo, config.version.tag_prefix.clone(), false);
    let tags = releaser.list_tag_details()?;

    ui::display_tag_list(&tags);
    Ok(())
}

fn run_hotfix_create(
    repo: &Git2Repository,
    config: &Config,
    base_tag: &str,
    no_checkout: bool,
    dry_run: bool,
) -> Result<()> {
    let engine = HotfixEngine::new(repo, config.hotfix.clone(), dry_run);

    engine.validate_base_tag(base_tag)?;
    let branch = engine.create_branch(base_tag, !no_checkout)?;

    if dry_run {
        ui::display_status(&format!(
            "dry-run: would create branch {} from tag {}",
            branch, base_tag
        ));
        return Ok(());
    }

    ui::display_success(&format!("Created hotfix branch: {}", branch));
    println!("\nNext steps:");
    println!("  1. Apply fixes and commit changes");
    println!("  2. Run 'git-release hotfix bump' to create the hotfix tag");
    Ok(())
}

fn run_hotfix_bump(
    repo: &Git2Repository,
    config: &Config,
    base: Option<String>,
    message: Option<String>,
    push: bool,
    dry_run: bool,
) -> Result<()> {
    let engine = HotfixEngine::new(repo, config.hotfix.clone(), dry_run);
    let releaser = Releaser::new(repo, config.version.tag_prefix.clone(), dry_run);

    let base_tag = match base {
        Some(base) => {
            engine.validate_base_tag(&base)?;
            base
        }
        None => engine.status()?.base_tag,
    };

    releaser.ensure_clean_working_tree()?;

    let (tag, sequence) = engine.bump(&base_tag, message.as_deref())?;

    if dry_run {
        ui::display_status(&format!(
            "dry-run: would create hotfix tag {} (sequence {})",
            tag, sequence
        ));
        return Ok(());
    }

    ui::display_success(&format!("Created hotfix tag: {}", tag));

    if push {
        releaser.push_tag("origin", &tag)?;
        ui::display_success(&format!("Pushed tag to origin: {}", tag));
    } else {
        ui::display_manual_push_instruction(&tag, "origin");
    }

    Ok(())
}

fn run_hotfix_status(repo: &Git2Repository, config: &Config) -> Result<()> {
    let engine = HotfixEngine::new(repo, config.hotfix.clone(), false);

    let status = engine.status()?;
    ui::display_hotfix_status(&status);
    Ok(())
}
