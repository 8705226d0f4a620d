//! Output management and formatting.
//!
//! [`OutputManager`] is also the [`PushReporter`] handed to the push
//! service: every push event becomes one line on stdout, or one JSON object
//! with `--output-format json`.

use std::{
    io::{self, IsTerminal},
    sync::{Arc, Mutex},
    time::Duration,
};

use clap::ValueEnum;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::json;

use hoist_core::{
    application::{PushEvent, PushReporter},
    domain::Application,
};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
#[derive(Clone)]
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
    /// Spinner shown while the platform works on a long step.
    activity: Arc<Mutex<Option<ProgressBar>>>,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // The flag wins over the config file; Auto resolves to Human (TTY)
        // or Plain (piped/redirected).
        let requested = match args.output_format {
            OutputFormat::Auto => {
                OutputFormat::from_str(&config.output.format, true).unwrap_or(OutputFormat::Auto)
            }
            explicit => explicit,
        };
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
            activity: Arc::new(Mutex::new(None)),
        }
    }
    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            msg.to_owned()
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green().bold())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            msg.to_owned()
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// One JSON document per line. Not suppressed in quiet mode: scripts ask
    /// for it explicitly.
    pub fn json(&self, value: &serde_json::Value) -> io::Result<()> {
        self.term.write_line(&value.to_string())
    }

    /// Final state of the pushed apps.
    pub fn summary(&self, apps: &[Application]) -> io::Result<()> {
        if self.resolved_format == OutputFormat::Json {
            let apps: Vec<_> = apps
                .iter()
                .map(|app| {
                    json!({
                        "name": app.name,
                        "guid": app.guid,
                        "state": app.state.as_str(),
                        "instances": app.instances,
                        "memory_mb": app.memory,
                        "urls": app.routes.iter().map(|r| r.url()).collect::<Vec<_>>(),
                    })
                })
                .collect();
            return self.json(&json!({ "apps": apps }));
        }

        for app in apps {
            self.print("")?;
            self.header(&format!("{}: {}", app.name, app.state))?;
            self.print(&format!("instances: {}", app.instances))?;
            self.print(&format!("usage: {}M x {} instances", app.memory, app.instances))?;
            let urls: Vec<_> = app.routes.iter().map(|r| r.url()).collect();
            self.print(&format!("urls: {}", urls.join(", ")))?;
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    // ── Activity spinner ──────────────────────────────────────────────────

    fn start_activity(&self, message: &str) {
        if self.quiet || self.resolved_format != OutputFormat::Human {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.blue} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));

        if let Ok(mut activity) = self.activity.lock() {
            *activity = Some(spinner);
        }
    }

    /// Clear the spinner, if one is running.
    pub fn finish_activity(&self) {
        if let Ok(mut activity) = self.activity.lock() {
            if let Some(spinner) = activity.take() {
                spinner.finish_and_clear();
            }
        }
    }

    fn render(&self, event: &PushEvent) -> io::Result<()> {
        match self.resolved_format {
            OutputFormat::Json => self.json(&json!({
                "event": event_kind(event),
                "message": event.to_string(),
            })),
            _ if matches!(event, PushEvent::Ok) => self.success(&event.to_string()),
            _ if event.is_warning() => self.warning(&event.to_string()),
            _ => self.print(&event.to_string()),
        }
    }
}

impl PushReporter for OutputManager {
    fn report(&self, event: &PushEvent) {
        self.finish_activity();
        // Progress lines are best effort; a closed stdout must not fail a push.
        let _ = self.render(event);

        match event {
            PushEvent::UploadingFiles { .. } => self.start_activity("Uploading..."),
            PushEvent::Starting { app } => self.start_activity(&format!("Waiting for {app} to start...")),
            _ => {}
        }
    }
}

/// Stable machine-readable name of an event.
fn event_kind(event: &PushEvent) -> &'static str {
    match event {
        PushEvent::UsingManifest { .. } => "using_manifest",
        PushEvent::UsingStack { .. } => "using_stack",
        PushEvent::CreatingApp { .. } => "creating_app",
        PushEvent::UpdatingApp { .. } => "updating_app",
        PushEvent::WorkerApp { .. } => "worker_app",
        PushEvent::RemovingRoute { .. } => "removing_route",
        PushEvent::UsingRoute { .. } => "using_route",
        PushEvent::CreatingRoute { .. } => "creating_route",
        PushEvent::BindingRoute { .. } => "binding_route",
        PushEvent::Uploading { .. } => "uploading",
        PushEvent::UploadingFiles { .. } => "uploading_files",
        PushEvent::NothingChanged => "nothing_changed",
        PushEvent::BindingService { .. } => "binding_service",
        PushEvent::Stopping { .. } => "stopping",
        PushEvent::Starting { .. } => "starting",
        PushEvent::SkippingStart { .. } => "skipping_start",
        PushEvent::Ok => "ok",
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
