//! Event handling and progress display

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use mosdeps_events::{AppEvent, DownloadEvent, GeneralEvent, InstallEvent, SetupEvent};
use mosdeps_progress::{Reporter, StatusIndicator, StatusSurface, TextSink};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Status text while packages are being installed
const INSTALLING_TEXT: &str = "Installing packages...";

/// Spinner on stderr acting as the status indicator
#[derive(Clone, Default)]
struct Spinner(Rc<RefCell<Option<ProgressBar>>>);

impl Spinner {
    /// Run `f` with the spinner cleared from the terminal
    fn suspend<F: FnOnce()>(&self, f: F) {
        match self.0.borrow().as_ref() {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }
}

impl StatusSurface for Spinner {
    fn show(&mut self, text: &str, tooltip: Option<&str>) {
        let message = match tooltip {
            Some(tooltip) => format!("{text} {}", style(tooltip).dim()),
            None => text.to_string(),
        };
        let mut slot = self.0.borrow_mut();
        let bar = slot.get_or_insert_with(|| {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg}") {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        bar.set_message(message);
    }

    fn hide(&mut self) {
        if let Some(bar) = self.0.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }
}

/// Line-buffered stderr output that does not tear through the spinner
struct ConsoleSink {
    term: Term,
    spinner: Spinner,
    pending: String,
}

impl TextSink for ConsoleSink {
    fn write_str(&mut self, text: &str) {
        self.pending.push_str(text);
        while let Some(pos) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=pos).collect();
            let term = &self.term;
            self.spinner.suspend(|| {
                let _ = term.write_line(line.trim_end_matches('\n'));
            });
        }
    }
}

/// Event handler for progress display and user feedback
pub struct EventHandler {
    reporter: Reporter<ConsoleSink>,
    status: StatusIndicator<Spinner>,
    /// Render nothing, events are only logged
    quiet: bool,
    debug: bool,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(quiet: bool, debug: bool) -> Self {
        let spinner = Spinner::default();
        let sink = ConsoleSink {
            term: Term::stderr(),
            spinner: spinner.clone(),
            pending: String::new(),
        };
        Self {
            reporter: Reporter::new(sink),
            status: StatusIndicator::new(spinner),
            quiet,
            debug,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        crate::logging::log_event_with_tracing(&event);
        if self.quiet {
            return;
        }

        match event {
            AppEvent::General(event) => self.handle_general(event),
            AppEvent::Download(event) => self.handle_download(event),
            AppEvent::Install(event) => self.handle_install(event),
            AppEvent::Setup(event) => self.handle_setup(event),
        }
    }

    /// Remove the status indicator
    pub fn finish(&mut self) {
        self.status.dispose();
    }

    fn handle_general(&mut self, event: GeneralEvent) {
        match event {
            GeneralEvent::Warning { message, context } => {
                let line = match context {
                    Some(context) => format!("{message} ({context})"),
                    None => message,
                };
                self.line(&format!("{} {line}", style("warning:").yellow().bold()));
            }
            GeneralEvent::DebugLog { message, .. } => {
                if self.debug {
                    self.line(&style(message).dim().to_string());
                }
            }
            GeneralEvent::OperationCompleted { .. } | GeneralEvent::OperationFailed { .. } => {
                self.status.dispose();
            }
            GeneralEvent::OperationStarted { .. } => {}
        }
    }

    fn handle_download(&mut self, event: DownloadEvent) {
        match event {
            DownloadEvent::Started {
                package,
                description,
                ..
            } => {
                self.status.set_tooltip(format!("installing package: {package}"));
                if description.is_empty() {
                    self.line(&format!("Downloading {package}"));
                } else {
                    self.line(&format!("Downloading {package}: {description}"));
                }
            }
            DownloadEvent::Redirected {
                package,
                location,
                hop,
            } => {
                if self.debug {
                    self.line(&format!("{package}: redirect #{hop} to {location}"));
                }
            }
            DownloadEvent::Connected { .. } => {}
            DownloadEvent::Progress {
                package,
                percent,
                bytes_per_sec,
                ..
            } => {
                self.reporter.indent(1);
                self.line(&format!(
                    "{package}: {percent}% ({})",
                    format_rate(bytes_per_sec)
                ));
                self.reporter.outdent(1);
            }
            DownloadEvent::Completed { package, size } => {
                self.line(&format!("Downloaded {package} ({size} bytes)"));
            }
            DownloadEvent::Skipped { package, reason } => {
                self.line(&format!("Skipping {package}: {reason}"));
            }
            DownloadEvent::Failed { package, failure } => {
                self.line(&format!(
                    "{} download of {package} failed: {}",
                    style("error:").red().bold(),
                    failure.message
                ));
            }
        }
    }

    fn handle_install(&mut self, event: InstallEvent) {
        match event {
            InstallEvent::Started {
                package,
                install_path,
            } => {
                self.status.set_tooltip(format!("installing package: {package}"));
                self.line(&format!("Extracting {package} to {}", install_path.display()));
            }
            InstallEvent::Completed { package, files, .. } => {
                self.line(&format!(
                    "{} {package} ({files} files)",
                    style("Installed").green()
                ));
            }
            InstallEvent::Failed { package, failure } => {
                self.line(&format!(
                    "{} install of {package} failed: {}",
                    style("error:").red().bold(),
                    failure.message
                ));
            }
            InstallEvent::MarkerWritten { platform, path } => {
                if self.debug {
                    self.line(&format!("marked {platform} installed ({})", path.display()));
                }
            }
            InstallEvent::BatchCompleted {
                installed, skipped, ..
            } => {
                self.line(&format!("{installed} installed, {skipped} already present"));
            }
            InstallEvent::Skipped { .. } => {}
        }
    }

    fn handle_setup(&mut self, event: SetupEvent) {
        match event {
            SetupEvent::PlatformResolved { raw, platform } => {
                if raw == platform.name() {
                    self.line(&format!("Target platform: {platform}"));
                } else {
                    self.line(&format!("Target platform: {platform} (reported as \"{raw}\")"));
                }
            }
            SetupEvent::AlreadyInstalled { platform } => {
                self.line(&format!("Packages for {platform} are already installed"));
            }
            SetupEvent::PlatformStarted { platform, packages } => {
                self.status.set_text(INSTALLING_TEXT);
                self.line(&format!(
                    "{} {packages} package(s) for {platform}",
                    style("Installing").cyan().bold()
                ));
                self.reporter.indent(1);
            }
            SetupEvent::PlatformCompleted { platform } => {
                self.reporter.outdent(1);
                self.line(&format!("{} packages for {platform}", style("Finished").green().bold()));
            }
            SetupEvent::ConfigGenerated { path, include_paths } => {
                self.line(&format!(
                    "Wrote {} ({include_paths} include paths)",
                    path.display()
                ));
            }
            SetupEvent::MarkersCleared { .. } => {}
        }
    }

    fn line(&mut self, text: &str) {
        self.reporter.write_line(text);
    }
}

fn format_rate(bytes_per_sec: f64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    if bytes_per_sec >= MIB {
        format!("{:.1} MiB/s", bytes_per_sec / MIB)
    } else if bytes_per_sec >= KIB {
        format!("{:.1} KiB/s", bytes_per_sec / KIB)
    } else {
        format!("{bytes_per_sec:.0} B/s")
    }
}
