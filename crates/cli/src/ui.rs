//! Terminal rendering.
//!
//! The whole screen is redrawn after every batch of messages: a header bar
//! with the tabs and the busy indicator, the selected tab's content, and a
//! status bar at the bottom.

use std::io::{stdout, Write};

use crossterm::cursor::{self, MoveTo};
use crossterm::style::Color::{DarkBlue, DarkGreen, Red, Reset, Yellow};
use crossterm::style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{queue, ExecutableCommand};
use ptui_core::error::Result;
use ptui_core::event::Target;
use ptui_core::router::{Line, StreamRouter};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{content_height, App};
use crate::tabs::hotkeys::Hotkeys;
use crate::tabs::list::ListView;
use crate::tabs::TabKind;

/// Switches the terminal into raw mode on an alternate screen and restores
/// it when dropped.
pub struct TerminalGuard;

impl TerminalGuard {
    /// # Errors
    ///
    /// Returns an error if the terminal rejects any of the mode changes.
    pub fn enter() -> Result<Self> {
        let guard = TerminalGuard;
        let mut stdout = stdout();
        stdout.execute(EnterAlternateScreen)?;
        enable_raw_mode()?;
        stdout.execute(cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = stdout();
        let _ = stdout.execute(cursor::Show);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

/// Draws the whole interface.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn draw<W: Write>(out: &mut W, app: &App) -> Result<()> {
    let (width, height) = app.size();
    let width = width as usize;

    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    print_header(out, app, width)?;

    let rows = content_height(height);
    match app.selected_tab() {
        TabKind::Installed => print_installed(out, app, width, rows)?,
        TabKind::Browse => print_browse(out, app, width, rows)?,
    }

    if height > 1 {
        print_status_bar(out, app, width, height - 1)?;
    }

    out.flush()?;
    Ok(())
}

/// Truncates or pads `text` to exactly `width` terminal columns.
///
/// A wide character that would straddle the edge is replaced by padding.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let mut fitted = String::with_capacity(width);
    let mut used = 0;

    for character in text.chars() {
        let columns = character.width().unwrap_or(0);
        if used + columns > width {
            break;
        }
        fitted.push(character);
        used += columns;
    }

    fitted.extend(std::iter::repeat(' ').take(width - used));
    fitted
}

fn print_header<W: Write>(out: &mut W, app: &App, width: usize) -> Result<()> {
    queue!(
        out,
        MoveTo(0, 0),
        SetBackgroundColor(DarkGreen),
        Print("  ")
    )?;
    let mut used = 2;

    for kind in TabKind::ALL {
        let title = format!(" {} ", kind.title());
        used += title.width() + 1;

        if kind == app.selected_tab() {
            queue!(
                out,
                SetAttribute(Attribute::Bold),
                SetForegroundColor(Yellow),
                Print(title),
                SetAttribute(Attribute::NormalIntensity),
                SetForegroundColor(Reset),
            )?;
        } else {
            queue!(out, Print(title))?;
        }
        queue!(out, Print("|"))?;
    }

    let busy = app
        .busy_text()
        .map(|text| format!("{text}{}  ", app.spinner()))
        .unwrap_or_default();
    let padding = width.saturating_sub(used + busy.width());

    queue!(
        out,
        Print(" ".repeat(padding)),
        SetForegroundColor(Yellow),
        Print(fit(&busy, width.saturating_sub(used + padding))),
        SetBackgroundColor(Reset),
        SetForegroundColor(Reset),
    )?;

    Ok(())
}

fn print_installed<W: Write>(out: &mut W, app: &App, width: usize, rows: usize) -> Result<()> {
    let tab = app.installed();
    let router = app.router();
    let packages = router.state(Target::PackageList);

    let left_width = width * 2 / 5;
    let right_width = width.saturating_sub(left_width + 1);
    let list_height = tab.list_height().min(rows);

    print_list(
        out,
        tab.list(),
        packages.lines(),
        packages.is_finished(),
        (0, 1),
        left_width,
        list_height,
        "Loading installed packages...",
    )?;

    if tab.hotkeys().is_visible() {
        print_hotkeys(out, tab.hotkeys(), 1 + list_height as u16, left_width)?;
    }

    for row in 0..rows {
        queue!(out, MoveTo(left_width as u16, 1 + row as u16), Print("│"))?;
    }

    if tab.list().selected(packages.lines()).is_some() {
        print_lines(
            out,
            router.state(Target::PackageInfo).lines(),
            (left_width as u16 + 1, 1),
            right_width,
            rows,
        )?;
    }

    Ok(())
}

fn print_browse<W: Write>(out: &mut W, app: &App, width: usize, rows: usize) -> Result<()> {
    let tab = app.browse();
    let router = app.router();
    let list_height = tab.list_height().min(rows);

    if tab.is_viewing_details() {
        print_lines(
            out,
            router.state(Target::PackageInfo).lines(),
            (0, 1),
            width,
            list_height,
        )?;
    } else {
        let results = router.state(Target::SearchResults);
        print_list(
            out,
            tab.list(),
            results.lines(),
            results.is_finished(),
            (0, 1),
            width,
            list_height,
            "Loading results...",
        )?;
    }

    if tab.hotkeys().is_visible() {
        print_hotkeys(out, tab.hotkeys(), 1 + list_height as u16, width)?;
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn print_list<W: Write>(
    out: &mut W,
    list: &ListView,
    lines: &[Line],
    is_finished: bool,
    (column, top): (u16, u16),
    width: usize,
    height: usize,
    loading_text: &str,
) -> Result<()> {
    let visible = list.visible(lines);

    if visible.is_empty() {
        let (text, color) = if is_finished {
            ("No matching packages!", Red)
        } else {
            (loading_text, Reset)
        };
        queue!(
            out,
            MoveTo(column, top),
            SetForegroundColor(color),
            Print(fit(text, width)),
            SetForegroundColor(Reset)
        )?;
        return Ok(());
    }

    for (row, position) in list.window(visible.len(), height).enumerate() {
        let line = &lines[visible[position]];
        queue!(out, MoveTo(column, top + row as u16))?;

        if position == list.cursor() {
            queue!(
                out,
                SetAttribute(Attribute::Bold),
                SetBackgroundColor(DarkBlue),
                SetForegroundColor(Yellow),
            )?;
        } else if line.is_error {
            queue!(out, SetForegroundColor(Red))?;
        }

        queue!(
            out,
            Print(fit(&line.text, width)),
            SetAttribute(Attribute::Reset),
            SetBackgroundColor(Reset),
            SetForegroundColor(Reset),
        )?;
    }

    Ok(())
}

fn print_lines<W: Write>(
    out: &mut W,
    lines: &[Line],
    (column, top): (u16, u16),
    width: usize,
    height: usize,
) -> Result<()> {
    for (row, line) in lines.iter().take(height).enumerate() {
        queue!(out, MoveTo(column, top + row as u16))?;
        if line.is_error {
            queue!(out, SetForegroundColor(Red))?;
        }
        queue!(out, Print(fit(&line.text, width)), SetForegroundColor(Reset))?;
    }

    Ok(())
}

fn print_hotkeys<W: Write, A: Copy>(
    out: &mut W,
    hotkeys: &Hotkeys<A>,
    top: u16,
    width: usize,
) -> Result<()> {
    queue!(out, MoveTo(0, top), Print("─".repeat(width)))?;

    for (row, hotkey) in hotkeys.iter().enumerate() {
        let text = format!("{:>10}  {}", hotkey.label, hotkey.description);
        queue!(
            out,
            MoveTo(0, top + 1 + row as u16),
            Print(fit(&text, width))
        )?;
    }

    Ok(())
}

fn print_status_bar<W: Write>(out: &mut W, app: &App, width: usize, row: u16) -> Result<()> {
    let router: &StreamRouter = app.router();

    let (list, target, mode) = match app.selected_tab() {
        TabKind::Installed => {
            let tab = app.installed();
            let mode = if tab.is_explicit_only() { "Explicit" } else { "All" };
            (tab.list(), Target::PackageList, mode)
        }
        TabKind::Browse => (app.browse().list(), Target::SearchResults, ""),
    };

    let status = if list.is_filtering() {
        format!(" Filter: {}_", list.filter_text())
    } else {
        let visible_count = list.visible(router.state(target).lines()).len();
        let position = if visible_count == 0 { 0 } else { list.cursor() + 1 };
        format!(" {position} / {visible_count}   {mode}")
    };

    queue!(out, MoveTo(0, row), SetAttribute(Attribute::Bold), Print(fit(&status, width)))?;

    if let Some(notice) = app.notice() {
        let column = status.width() + 3;
        if column < width {
            queue!(
                out,
                MoveTo(column as u16, row),
                SetForegroundColor(Red),
                Print(fit(notice, width - column)),
                SetForegroundColor(Reset),
            )?;
        }
    }

    queue!(out, SetAttribute(Attribute::Reset))?;
    Ok(())
}
