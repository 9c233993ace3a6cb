//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::PomodoroSettings;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "taskflow-timer")]
#[command(about = "A state-managed timer engine server for task and habit time tracking")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "8990")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Session user timer operations run as
    #[arg(short, long, default_value = "local")]
    pub user: String,

    /// Default pomodoro work duration in minutes
    #[arg(long, default_value = "25")]
    pub work: u64,

    /// Default pomodoro short break in minutes
    #[arg(long, default_value = "5")]
    pub short_break: u64,

    /// Default pomodoro long break in minutes
    #[arg(long, default_value = "15")]
    pub long_break: u64,

    /// Work segments per long-break cycle
    #[arg(long, default_value = "4")]
    pub cycles: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Bundle the pomodoro flags into the engine's global defaults
    pub fn pomodoro_defaults(&self) -> PomodoroSettings {
        PomodoroSettings {
            work_duration: self.work,
            short_break_duration: self.short_break,
            long_break_duration: self.long_break,
            cycles: self.cycles,
        }
    }
}
