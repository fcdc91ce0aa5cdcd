//! Terminal output helpers for the git-release binary.
//!
//! Pure display functions; nothing in here makes decisions. The engines
//! report through returned errors and values, the binary chooses what to
//! print.

use crate::git::TagDescriptor;
use crate::hotfix::HotfixStatus;
use console::style;

/// Print an error message in red to stderr.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Print a success message with a green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print a status message with a yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print the effective version summary.
pub fn display_version_summary(version: &str, scheme: &str, commit: &str) {
    println!("Current Version: {}", style(version).green().bold());
    println!("Scheme:          {}", scheme);
    println!("Commit:          {}", style(commit).dim());
    if version.contains("-dirty-") {
        println!("Status:          {}", style("dirty (uncommitted changes)").yellow());
    }
}

/// Print the tag listing, newest first.
pub fn display_tag_list(tags: &[TagDescriptor]) {
    if tags.is_empty() {
        println!("No tags found.");
        return;
    }

    for descriptor in tags {
        let date = descriptor
            .created_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let commit_short: String = descriptor.commit.chars().take(7).collect();

        println!(
            "{:<24} {} {:<10} {}",
            style(&descriptor.tag).green(),
            style(commit_short).dim(),
            date,
            descriptor.message
        );
    }
}

/// Print the hotfix branch status.
pub fn display_hotfix_status(status: &HotfixStatus) {
    println!("Branch:    {}", style(&status.branch).bold());
    println!("Base tag:  {}", status.base_tag);

    if status.tags.is_empty() {
        println!("Hotfixes:  none yet");
    } else {
        println!("Hotfixes:");
        for tag in &status.tags {
            println!("  - {}", tag);
        }
    }

    println!("Next tag:  {}", style(&status.next_tag).green());
}

/// Print the git command needed to push a tag later.
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "{} To push this tag later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} {}", remote, tag)).cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_helpers_do_not_panic() {
        // Visual verification only - output goes to stdout/stderr
        display_error("test error");
        display_success("test success");
        display_status("test status");
        display_version_summary("1.0.0-dirty-abc1234", "semver", "abc1234");
        display_manual_push_instruction("v1.0.0", "origin");
    }

    #[test]
    fn test_display_tag_list_empty() {
        display_tag_list(&[]);
    }
}
