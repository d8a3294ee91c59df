pub mod build;
pub mod config;
pub mod html;
pub mod show;
pub mod view;
pub mod years;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::loader::FileSource;
use crate::render::RenderPort;
use crate::session::CalendarSession;
use crate::settings::calendar_path;

/// Open a session on the calendar document and render its latest year into
/// `port`. A failed load leaves `port` untouched.
pub(crate) fn open_session(file: Option<String>, port: &mut dyn RenderPort) -> Result<CalendarSession> {
    let source = FileSource::new(calendar_path(file));
    let mut session = CalendarSession::new();
    session.load(&source, port)?;
    Ok(session)
}

#[derive(Parser)]
#[command(
    name = "cadence",
    version,
    about = "Cash-flow calendar builder and viewer for bank statement exports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build calendar.json from a Wells Fargo CSV export.
    Build {
        /// Path to the statement CSV
        csv: String,
        /// Output path (default: calendar path from settings)
        #[arg(long)]
        output: Option<String>,
        /// Minimum recurrence score for a deposit to be amortized
        #[arg(long)]
        threshold: Option<f64>,
        /// Keep amortized amounts on Saturdays and Sundays
        #[arg(long = "no-forward-weekends")]
        no_forward_weekends: bool,
    },
    /// Browse the calendar (interactive on a terminal, text otherwise).
    View {
        /// Calendar document (default: calendar path from settings)
        #[arg(long)]
        file: Option<String>,
        /// Year to open instead of the most recent one
        #[arg(long)]
        year: Option<i32>,
    },
    /// Print the detail panel for one day.
    Show {
        /// Date: YYYY-MM-DD
        date: String,
        #[arg(long)]
        file: Option<String>,
    },
    /// List the years in the calendar with day counts and net totals.
    Years {
        #[arg(long)]
        file: Option<String>,
    },
    /// Export the calendar as a static HTML page.
    Html {
        #[arg(long)]
        file: Option<String>,
        /// Output path (default: calendar.html)
        #[arg(long)]
        output: Option<String>,
        /// HTML template to inject the calendar into
        #[arg(long)]
        template: Option<String>,
        /// Id of the template <div> that receives the calendar
        #[arg(long)]
        target: Option<String>,
    },
    /// Show or change saved settings.
    Config {
        /// Default calendar document path
        #[arg(long = "calendar-path")]
        calendar_path: Option<String>,
        /// Default recurrence threshold
        #[arg(long)]
        threshold: Option<f64>,
        /// Move weekend amortization to Monday: true or false
        #[arg(long = "forward-weekends")]
        forward_weekends: Option<bool>,
        /// Default template target id
        #[arg(long = "html-target")]
        html_target: Option<String>,
    },
}
