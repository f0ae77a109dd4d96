//! Package manager operations offered by the tabs.
//!
//! Each function only describes the invocation; running it and attaching a
//! follow-up is up to the caller.

use ptui_core::command::Command;
use ptui_core::event::Target;

const NO_CONFIRM: &str = "--noconfirm";

/// `-Qq`, or `-Qqe` for explicitly installed packages only.
#[must_use]
pub fn list_installed(explicit_only: bool) -> Command {
    let command = Command::new()
        .operation("Q")
        .options("q")
        .target(Target::PackageList);

    if explicit_only {
        command.options("e")
    } else {
        command
    }
}

#[must_use]
pub fn installed_info(name: &str) -> Command {
    Command::new()
        .operation("Q")
        .options("i")
        .arguments([name])
        .target(Target::PackageInfo)
        .long_running(false)
}

#[must_use]
pub fn upgrade_all() -> Command {
    Command::new()
        .operation("S")
        .options("yu")
        .arguments([NO_CONFIRM])
        .target(Target::Background)
}

#[must_use]
pub fn upgrade_selected(name: &str) -> Command {
    Command::new()
        .operation("S")
        .options("yu")
        .arguments([name, NO_CONFIRM])
        .target(Target::Background)
}

#[must_use]
pub fn remove_selected(name: &str) -> Command {
    Command::new()
        .operation("R")
        .options("s")
        .arguments([name, NO_CONFIRM])
        .target(Target::Background)
}

/// `-Ssq <text>`; an empty `text` matches every package.
#[must_use]
pub fn search_sync_database(text: &str) -> Command {
    Command::new()
        .operation("S")
        .options("sq")
        .arguments([text, NO_CONFIRM])
        .target(Target::SearchResults)
}

#[must_use]
pub fn sync_info(name: &str) -> Command {
    Command::new()
        .operation("S")
        .options("i")
        .arguments([name, NO_CONFIRM])
        .target(Target::PackageInfo)
        .long_running(false)
}

#[must_use]
pub fn install_selected(name: &str) -> Command {
    Command::new()
        .operation("S")
        .arguments([name, NO_CONFIRM])
        .target(Target::Background)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(command: &Command, argv: &[&str], target: Target, long_running: bool) {
        assert_eq!(command.argv(), argv);
        assert_eq!(command.get_target(), target);
        assert_eq!(command.is_long_running(), long_running);
    }

    #[test]
    fn test_list_installed() {
        check(&list_installed(false), &["-Qq"], Target::PackageList, true);
        check(&list_installed(true), &["-Qqe"], Target::PackageList, true);
    }

    #[test]
    fn test_info_lookups_are_not_long_running() {
        check(&installed_info("vim"), &["-Qi", "vim"], Target::PackageInfo, false);
        check(
            &sync_info("vim"),
            &["-Si", "vim", "--noconfirm"],
            Target::PackageInfo,
            false,
        );
    }

    #[test]
    fn test_upgrades() {
        check(&upgrade_all(), &["-Syu", "--noconfirm"], Target::Background, true);
        check(
            &upgrade_selected("git"),
            &["-Syu", "git", "--noconfirm"],
            Target::Background,
            true,
        );
    }

    #[test]
    fn test_remove_and_install() {
        check(
            &remove_selected("git"),
            &["-Rs", "git", "--noconfirm"],
            Target::Background,
            true,
        );
        check(
            &install_selected("git"),
            &["-S", "git", "--noconfirm"],
            Target::Background,
            true,
        );
    }

    #[test]
    fn test_search_sync_database() {
        check(
            &search_sync_database("vim"),
            &["-Ssq", "vim", "--noconfirm"],
            Target::SearchResults,
            true,
        );
        assert_eq!(search_sync_database("").argv(), vec!["-Ssq", "", "--noconfirm"]);
    }
}
