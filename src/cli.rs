use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "termcal",
    version,
    about = "Terminal task manager with a monthly calendar"
)]
pub struct Cli {
    /// Task file to use instead of the default data location
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,
    /// Config file to use instead of the default config location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// More log output (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Less log output (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    Add {
        /// Task description
        description: String,
        /// Deadline in YYYY-MM-DD or YYYY-MM-DD HH:MM format
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },
    /// Mark a task as completed
    Done { id: u32 },
    /// Delete a task
    Delete { id: u32 },
    /// Remove every task
    Clear,
    /// Show the calendar for a month (number or name, defaults to the current month)
    Calendar {
        #[arg(allow_negative_numbers = true)]
        month: Option<String>,
    },
    /// List the tasks due on one day
    Day {
        /// Month number; values above 12 roll into following years
        #[arg(allow_negative_numbers = true)]
        month: i32,
        day: u32,
    },
    /// Show or change display settings
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// Start the interactive prompt
    Shell,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the current settings
    Show,
    /// Set the cell width (10-40)
    Width { value: u16 },
    /// Set the cell height (5-10)
    Height { value: u16 },
    /// Set the calendar border color
    BorderColor { color: String },
    /// Set the text color
    TextColor { color: String },
    /// Set the color of events on the calendar
    EventsColor { color: String },
    /// Toggle bold calendar borders
    BorderBold,
    /// Toggle bold text
    TextBold,
    /// Toggle exporting new tasks to the calendar app
    Ics,
    /// Toggle between event counts and event descriptions
    EventDisplay,
    /// Set how tasks are sorted (ID, ASCENDING, DESCENDING)
    Sort { method: String },
}
