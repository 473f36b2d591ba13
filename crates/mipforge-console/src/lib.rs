//! Colorful console output for mipforge sessions.
//!
//! Installs a `tracing` subscriber with a layer that renders the structured
//! events emitted by `mipforge_bnb` and `mipforge_session`.
//!
//! ## Log Levels
//!
//! - **WARN**: discarded searches, failed LP dumps, unrestored bounds
//! - **INFO**: session lifecycle, search start/end
//! - **DEBUG**: new incumbents
//! - **TRACE**: individual nodes and their relaxations
//!
//! The session log level decides which of these are emitted at all. When
//! `RUST_LOG` is set it further filters what reaches the console.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<bool> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();

const TARGETS: [&str; 2] = ["mipforge_bnb", "mipforge_session"];

/// Installs the console subscriber.
///
/// Safe to call multiple times; only the first call has effect. Returns
/// false if another global subscriber was already installed.
pub fn init() -> bool {
    *INIT.get_or_init(|| {
        EPOCH.get_or_init(Instant::now);

        let user_filter = std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();
        let mut filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy();
        // Without RUST_LOG the session log level alone decides what is shown.
        if !user_filter {
            for target in TARGETS {
                if let Ok(directive) = format!("{}=trace", target).parse::<Directive>() {
                    filter = filter.add_directive(directive);
                }
            }
        }

        tracing_subscriber::registry()
            .with(filter)
            .with(MipConsoleLayer)
            .try_init()
            .is_ok()
    })
}

fn elapsed_secs() -> f64 {
    EPOCH
        .get()
        .map(|epoch| epoch.elapsed().as_secs_f64())
        .unwrap_or(0.0)
}

/// A tracing layer that formats mipforge events with colors.
pub struct MipConsoleLayer;

impl<S: Subscriber> Layer<S> for MipConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if !TARGETS.iter().any(|prefix| target.starts_with(prefix)) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{} {}", format_elapsed(), output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    status: Option<String>,
    termination: Option<String>,
    sense: Option<String>,
    path: Option<String>,
    error: Option<String>,
    session: Option<u64>,
    col: Option<u64>,
    columns: Option<u64>,
    rows: Option<u64>,
    integers: Option<u64>,
    nodes: Option<u64>,
    node: Option<u64>,
    depth: Option<u64>,
    open: Option<u64>,
    solutions: Option<u64>,
    duration_ms: Option<u64>,
    requested: Option<i64>,
    level: Option<u64>,
    objective: Option<f64>,
    bound: Option<f64>,
    detached: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        let s = s.trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "message" => self.message = Some(s),
            "status" => self.status = Some(s),
            "termination" => self.termination = Some(s),
            "sense" => self.sense = Some(s),
            "path" => self.path = Some(s),
            "error" => self.error = Some(s),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            "termination" => self.termination = Some(value.to_string()),
            "sense" => self.sense = Some(value.to_string()),
            "path" => self.path = Some(value.to_string()),
            "error" => self.error = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "session" => self.session = Some(value),
            "col" => self.col = Some(value),
            "columns" => self.columns = Some(value),
            "rows" => self.rows = Some(value),
            "integers" => self.integers = Some(value),
            "nodes" => self.nodes = Some(value),
            "node" => self.node = Some(value),
            "depth" => self.depth = Some(value),
            "open" => self.open = Some(value),
            "solutions" => self.solutions = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "level" => self.level = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == "requested" {
            self.requested = Some(value);
        } else if value >= 0 {
            self.record_u64(field, value as u64);
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "objective" => self.objective = Some(value),
            "bound" => self.bound = Some(value),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "detached" {
            self.detached = Some(value);
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "session_created" => format_session_created(v),
        "session_disposed" => format_session_disposed(v),
        "search_start" => format_search_start(v),
        "search_end" => format_search_end(v),
        "incumbent" => format_incumbent(v),
        "node" if level == Level::TRACE => format_node(v),
        "node_lp" if level == Level::TRACE => format_node_lp(v),
        "reference_saved" => format!("{} reference saved │ {}", "◆".bright_blue(), session(v)),
        "reference_restored" => {
            format!("{} reference restored │ {}", "◇".bright_blue(), session(v))
        }
        "log_level_clamped" => format!(
            "{} log level {} clamped to {} │ {}",
            "!".yellow().bold(),
            v.requested.unwrap_or(0),
            v.level.unwrap_or(0),
            session(v)
        ),
        "search_discarded" => format!(
            "{} search result discarded │ {} │ session disposed while searching │ {}",
            "!".yellow().bold(),
            v.status.as_deref().unwrap_or("Unknown"),
            session(v)
        ),
        "write_lp_failed" => format!(
            "{} LP dump failed │ {} │ {}",
            "!".yellow().bold(),
            v.path.as_deref().unwrap_or("?"),
            v.error.as_deref().unwrap_or("unknown error").yellow()
        ),
        "restore_bounds_failed" => format!(
            "{} root bounds not restored │ column {} │ {}",
            "!".yellow().bold(),
            v.col.unwrap_or(0),
            v.error.as_deref().unwrap_or("unknown error").yellow()
        ),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs()).bright_black().to_string()
}

fn session(v: &EventVisitor) -> String {
    match v.session {
        Some(id) => format!("session {:#x}", id).bright_black().to_string(),
        None => String::new(),
    }
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_session_created(v: &EventVisitor) -> String {
    format!(
        "{} Session created │ {} columns │ {} rows │ log level {} │ {}",
        "+".bright_green().bold(),
        count(v.columns).bright_yellow(),
        count(v.rows).bright_yellow(),
        v.level.unwrap_or(0),
        session(v)
    )
}

fn format_session_disposed(v: &EventVisitor) -> String {
    let mut output = format!("{} Session disposed │ {}", "-".bright_red().bold(), session(v));
    if v.detached == Some(true) {
        output.push_str(&format!(" │ {}", "search detached".yellow()));
    }
    output
}

fn format_search_start(v: &EventVisitor) -> String {
    format!(
        "{} Branch and bound │ {} │ {} columns ({} integer) │ {} rows",
        "▶".bright_green().bold(),
        v.sense.as_deref().unwrap_or("Minimize").white().bold(),
        count(v.columns).bright_yellow(),
        count(v.integers).bright_yellow(),
        count(v.rows).bright_yellow(),
    )
}

fn format_search_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("Unknown");
    let colored = match status {
        "Optimal" => status.bright_green().bold().to_string(),
        "Feasible" => status.green().to_string(),
        _ => status.bright_red().bold().to_string(),
    };

    let mut output = format!(
        "{} Search complete │ {} │ {}",
        "■".bright_cyan().bold(),
        colored,
        format_objective(v.objective)
    );
    if let Some(termination) = v.termination.as_deref() {
        if termination != "Completed" {
            output.push_str(&format!(" │ {}", termination.yellow()));
        }
    }
    output.push_str(&format!(
        " │ {} nodes │ {} solutions │ {}",
        count(v.nodes).white(),
        count(v.solutions).white(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow()
    ));
    output
}

fn format_incumbent(v: &EventVisitor) -> String {
    format!(
        "{} New incumbent │ {} │ node {} │ depth {}",
        "★".bright_yellow(),
        format_objective(v.objective),
        count(v.node).white(),
        v.depth.unwrap_or(0)
    )
}

fn format_node(v: &EventVisitor) -> String {
    format!(
        "{} Node {:>10} │ depth {:>4} │ bound {} │ {} open",
        "·".bright_black(),
        count(v.node).bright_black(),
        v.depth.unwrap_or(0),
        format_bound(v.bound).bright_black(),
        count(v.open).bright_black()
    )
}

fn format_node_lp(v: &EventVisitor) -> String {
    format!(
        "  {} LP {} │ {}",
        "↳".bright_black(),
        v.status.as_deref().unwrap_or("Unknown").bright_black(),
        format_objective(v.objective).bright_black()
    )
}

fn format_objective(objective: Option<f64>) -> String {
    match objective {
        Some(value) if value.is_finite() => format!("{}", value).bright_white().bold().to_string(),
        _ => "n/a".white().to_string(),
    }
}

fn format_bound(bound: Option<f64>) -> String {
    match bound {
        Some(value) if value.is_finite() => format!("{:.6}", value),
        Some(value) if value < 0.0 => "-inf".to_string(),
        _ => "n/a".to_string(),
    }
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
