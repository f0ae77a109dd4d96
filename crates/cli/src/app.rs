//! Application state and the event loop.
//!
//! A single thread owns the [`App`] and handles one [`Message`] at a time.
//! Terminal input and ticks come from a dedicated input thread; command
//! progress comes from the executor's worker threads. All of them feed the
//! same channel, so nothing else ever touches view state.

use std::io::stdout;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use flume::Sender;
use log::{debug, error, info};
use ptui_core::config::Settings;
use ptui_core::error::{Error, Result};
use ptui_core::event::{StreamEvent, Target};
use ptui_core::execution::Executor;
use ptui_core::identity::CommandId;
use ptui_core::router::{Routed, StreamRouter};

use crate::message::{Context, Message};
use crate::tabs::{BrowseTab, InstalledTab, Issued, Tab, TabKind};
use crate::ui;

/// How long the input thread waits for input before sending a tick.
const TICK_INTERVAL: Duration = Duration::from_millis(333);

pub const SPINNER_FRAMES: [&str; 4] = [" ●", "  ●", "   ●", "    ●"];

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    context: Context,
    router: StreamRouter,
    installed: InstalledTab,
    browse: BrowseTab,
    selected: TabKind,
    executing: Option<Issued>,
    spinner_frame: usize,
    notice: Option<String>,
    size: (u16, u16),
}

/// Rows between the header and the status bar.
#[must_use]
pub fn content_height(terminal_height: u16) -> usize {
    terminal_height.saturating_sub(2) as usize
}

impl App {
    #[must_use]
    pub fn new(context: Context) -> Self {
        Self {
            context,
            router: StreamRouter::new(),
            installed: InstalledTab::new(),
            browse: BrowseTab::new(),
            selected: TabKind::Installed,
            executing: None,
            spinner_frame: 0,
            notice: None,
            size: (0, 0),
        }
    }

    /// Initialises the selected tab, which starts its first command.
    pub fn init(&mut self) {
        let (tab, context, _) = self.active_tab();
        tab.init(context);
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.installed.resize(content_height(height));
        self.browse.resize(content_height(height));
    }

    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    #[must_use]
    pub fn router(&self) -> &StreamRouter {
        &self.router
    }

    #[must_use]
    pub fn installed(&self) -> &InstalledTab {
        &self.installed
    }

    #[must_use]
    pub fn browse(&self) -> &BrowseTab {
        &self.browse
    }

    #[must_use]
    pub fn selected_tab(&self) -> TabKind {
        self.selected
    }

    /// Latest failure that has no other place to be shown.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    /// Text of the busy indicator, `None` when nothing long-running is active.
    #[must_use]
    pub fn busy_text(&self) -> Option<String> {
        if !self.router.is_busy() {
            return None;
        }

        Some(match self.executing {
            Some(Issued { description, .. }) => format!("Executing '{description}'..."),
            None => "Loading...".to_string(),
        })
    }

    pub fn update(&mut self, message: Message) -> Flow {
        match message {
            Message::Input(Event::Key(key)) => return self.handle_key(key),
            Message::Input(Event::Resize(width, height)) => self.resize(width, height),
            Message::Input(_) => {}
            Message::Stream(event) => self.handle_stream(event),
            Message::Tick => {
                if self.router.is_busy() {
                    self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
                }
            }
            Message::Refresh => {
                debug!("Refreshing installed packages");
                self.installed.load_packages(&self.context);
            }
        }

        Flow::Continue
    }

    fn active_tab(&mut self) -> (&mut dyn Tab, &Context, &StreamRouter) {
        let tab: &mut dyn Tab = match self.selected {
            TabKind::Installed => &mut self.installed,
            TabKind::Browse => &mut self.browse,
        };
        (tab, &self.context, &self.router)
    }

    fn switch_to(&mut self, kind: Option<TabKind>) {
        if let Some(kind) = kind {
            debug!("Switching to the {} tab", kind.title());
            self.selected = kind;
            self.init();
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind != KeyEventKind::Press {
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Flow::Quit;
            }
            KeyCode::Tab => self.switch_to(self.selected.next()),
            KeyCode::BackTab => self.switch_to(self.selected.previous()),
            _ => {
                let (tab, context, router) = self.active_tab();
                if let Some(issued) = tab.handle_key(key, context, router) {
                    self.executing = Some(issued);
                }
            }
        }

        Flow::Continue
    }

    fn handle_stream(&mut self, event: StreamEvent) {
        match self.router.route(event) {
            Routed::Finished {
                target,
                id,
                error,
                follow_up,
            } => {
                self.retire(id);

                if target == Target::Background {
                    self.notice = error;
                }
                if let Some(follow_up) = follow_up {
                    follow_up.run();
                }

                let (tab, context, router) = self.active_tab();
                tab.on_finished(target, context, router);
            }
            Routed::Rejected { id, error, .. } => {
                self.retire(id);
                self.notice = Some(error);
            }
            Routed::Stale { id, .. } => self.retire(id),
            Routed::Started { .. } | Routed::Appended { .. } => {}
        }
    }

    /// Forgets the hotkey description once its own command has ended or
    /// been superseded.
    fn retire(&mut self, id: CommandId) {
        if self.executing.is_some_and(|issued| issued.id == id) {
            self.executing = None;
        }
    }
}

fn spawn_input_reader(sender: Sender<Message>) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("input".to_string())
        .spawn(move || loop {
            let message = match event::poll(TICK_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(event) => Message::Input(event),
                    Err(e) => {
                        error!("Could not read terminal input: {}", e);
                        return;
                    }
                },
                Ok(false) => Message::Tick,
                Err(e) => {
                    error!("Could not poll terminal input: {}", e);
                    return;
                }
            };

            if sender.send(message).is_err() {
                return;
            }
        })
        .map_err(Error::Stdio)
}

/// Runs the interface until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or drawn to.
pub fn run(settings: &Settings) -> Result<()> {
    let (sender, receiver) = flume::unbounded();
    let executor = Executor::new(settings, sender.clone());
    let mut app = App::new(Context::new(executor, sender.clone()));

    let _terminal_guard = ui::TerminalGuard::enter()?;
    let (width, height) = terminal::size()?;
    app.resize(width, height);

    spawn_input_reader(sender)?;
    info!("Started with `{}` as package manager", settings.program);

    app.init();

    let mut stdout = stdout();
    ui::draw(&mut stdout, &app)?;

    while let Ok(message) = receiver.recv() {
        if app.update(message) == Flow::Quit {
            break;
        }

        // Apply everything already queued before drawing again.
        let mut flow = Flow::Continue;
        for message in receiver.try_iter() {
            flow = app.update(message);
            if flow == Flow::Quit {
                break;
            }
        }
        if flow == Flow::Quit {
            break;
        }

        ui::draw(&mut stdout, &app)?;
    }

    info!("Quitting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flume::Receiver;
    use ptui_core::event::ProcessHandle;
    use tempfile::NamedTempFile;

    /// An app whose commands are all refused by an existing lock marker.
    fn locked_app() -> (App, Receiver<Message>, NamedTempFile) {
        let marker = NamedTempFile::new().unwrap();
        let settings = Settings {
            lock_file: marker.path().to_str().unwrap().to_string(),
            ..Settings::default()
        };
        let (sender, receiver) = flume::unbounded();
        let context = Context::new(Executor::new(&settings, sender.clone()), sender);
        let mut app = App::new(context);
        app.resize(80, 24);
        (app, receiver, marker)
    }

    fn next_stream_target(receiver: &Receiver<Message>) -> Target {
        match receiver.recv_timeout(Duration::from_secs(10)) {
            Ok(Message::Stream(event)) => event.target(),
            other => panic!("Expected a stream event, got {other:?}"),
        }
    }

    fn key(code: KeyCode) -> Message {
        Message::Input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn start(app: &mut App, id: u64, target: Target, long_running: bool) {
        app.update(Message::Stream(StreamEvent::Start {
            id: CommandId::new(id),
            target,
            long_running,
            process: ProcessHandle {
                pid: 1,
                argv: vec!["pacman".to_string()],
            },
        }));
    }

    fn chunk(app: &mut App, id: u64, target: Target, lines: &[&str]) {
        app.update(Message::Stream(StreamEvent::Chunk {
            id: CommandId::new(id),
            target,
            lines: lines.iter().map(|line| line.to_string()).collect(),
            is_error: false,
        }));
    }

    fn done(app: &mut App, id: u64, target: Target) {
        app.update(Message::Stream(StreamEvent::Done {
            id: CommandId::new(id),
            target,
            result: Ok(()),
            follow_up: None,
        }));
    }

    #[test]
    fn test_init_lists_installed_packages() {
        let (mut app, receiver, _marker) = locked_app();
        app.init();
        assert_eq!(next_stream_target(&receiver), Target::PackageList);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let (mut app, _receiver, _marker) = locked_app();
        let flow = app.update(Message::Input(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        ))));
        assert_eq!(flow, Flow::Quit);
    }

    #[test]
    fn test_tab_switch_initialises_browse() {
        let (mut app, receiver, _marker) = locked_app();
        app.update(key(KeyCode::Tab));
        assert_eq!(app.selected_tab(), TabKind::Browse);
        assert_eq!(next_stream_target(&receiver), Target::SearchResults);

        app.update(key(KeyCode::Tab));
        assert_eq!(app.selected_tab(), TabKind::Browse);

        app.update(key(KeyCode::BackTab));
        assert_eq!(app.selected_tab(), TabKind::Installed);
    }

    #[test]
    fn test_finished_list_requests_info_for_selection() {
        let (mut app, receiver, _marker) = locked_app();
        start(&mut app, 1, Target::PackageList, true);
        chunk(&mut app, 1, Target::PackageList, &["git", "vim"]);
        assert!(app.busy_text().is_some());

        done(&mut app, 1, Target::PackageList);
        assert!(app.busy_text().is_none());
        assert_eq!(next_stream_target(&receiver), Target::PackageInfo);

        app.update(key(KeyCode::Down));
        assert_eq!(app.installed().list().cursor(), 1);
        assert_eq!(next_stream_target(&receiver), Target::PackageInfo);
    }

    #[test]
    fn test_rejected_command_sets_notice() {
        let (mut app, receiver, _marker) = locked_app();
        app.init();
        let Ok(message) = receiver.recv_timeout(Duration::from_secs(10)) else {
            panic!("No event received");
        };
        app.update(message);

        let notice = app.notice().unwrap();
        assert!(notice.contains("lock"));
    }

    #[test]
    fn test_hotkey_description_shown_while_busy() {
        let (mut app, _receiver, _marker) = locked_app();
        start(&mut app, 1, Target::PackageList, true);
        chunk(&mut app, 1, Target::PackageList, &["git"]);

        app.update(key(KeyCode::Char('U')));
        start(&mut app, 2, Target::Background, true);
        assert_eq!(
            app.busy_text().as_deref(),
            Some("Executing 'Upgrade Selected'...")
        );

        done(&mut app, 2, Target::Background);
        done(&mut app, 1, Target::PackageList);
        assert!(app.busy_text().is_none());
    }

    #[test]
    fn test_description_survives_unrelated_completion() {
        let (mut app, receiver, _marker) = locked_app();
        start(&mut app, 900_001, Target::PackageList, true);
        chunk(&mut app, 900_001, Target::PackageList, &["git"]);
        done(&mut app, 900_001, Target::PackageList);

        app.update(key(KeyCode::Char('U')));

        // A detail lookup ends while the upgrade has not started yet.
        start(&mut app, 900_002, Target::PackageInfo, false);
        done(&mut app, 900_002, Target::PackageInfo);

        start(&mut app, 900_003, Target::Background, true);
        assert_eq!(
            app.busy_text().as_deref(),
            Some("Executing 'Upgrade Selected'...")
        );

        let upgrade_done = loop {
            match receiver.recv_timeout(Duration::from_secs(10)) {
                Ok(Message::Stream(event)) if event.target() == Target::Background => break event,
                Ok(_) => {}
                Err(e) => panic!("No refusal for the upgrade: {e}"),
            }
        };
        app.update(Message::Stream(upgrade_done));
        assert_eq!(app.busy_text().as_deref(), Some("Loading..."));
    }

    #[test]
    fn test_spinner_advances_only_while_busy() {
        let (mut app, _receiver, _marker) = locked_app();
        let idle = app.spinner();
        app.update(Message::Tick);
        assert_eq!(app.spinner(), idle);

        start(&mut app, 1, Target::Background, true);
        app.update(Message::Tick);
        assert_ne!(app.spinner(), idle);
    }

    #[test]
    fn test_refresh_reloads_installed_list() {
        let (mut app, receiver, _marker) = locked_app();
        app.update(Message::Refresh);
        assert_eq!(next_stream_target(&receiver), Target::PackageList);
    }

    #[test]
    fn test_content_height() {
        assert_eq!(content_height(24), 22);
        assert_eq!(content_height(1), 0);
    }
}
