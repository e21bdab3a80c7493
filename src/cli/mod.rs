//! CLI interface for Handi.jobs

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::auth::UserRole;

#[derive(Parser)]
#[command(name = "handijobs")]
#[command(version)]
#[command(about = "Sign in, inspect sessions and validate forms for Handi.jobs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default handijobs.toml configuration file
    Init,

    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        email: String,

        /// Prompted for when omitted
        #[arg(short, long, env = "HANDIJOBS_PASSWORD")]
        password: Option<String>,
    },

    /// Create an account and sign in. Accounts live in memory, so the new
    /// session only lasts for the current run.
    Register {
        #[arg(short, long)]
        email: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long, default_value = "candidate")]
        role: RoleArg,

        /// Required for company accounts
        #[arg(long)]
        company_name: Option<String>,

        /// Accept the terms of use
        #[arg(long)]
        accept_terms: bool,
    },

    /// Show the signed-in user
    Whoami {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Re-issue the stored token with a fresh expiry
    Refresh,

    /// Check whether the current session may open a view
    Guard {
        /// Role the view requires
        #[arg(short, long)]
        role: Option<RoleArg>,
    },

    /// Validate a JSON form submission
    Validate {
        form: FormKind,

        /// JSON file holding the submission
        file: PathBuf,
    },

    /// Read or write UI preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print a preference
    Get { name: String },

    /// Set a preference
    Set { name: String, value: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Company,
    Candidate,
    Admin,
    Association,
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Company => UserRole::Company,
            RoleArg::Candidate => UserRole::Candidate,
            RoleArg::Admin => UserRole::Admin,
            RoleArg::Association => UserRole::Association,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormKind {
    Login,
    Register,
    Job,
    Candidate,
    Company,
    Search,
    Contact,
    Settings,
}
