//! Command-line surface for the admin workflows.

pub mod access;
pub mod assign;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "taskdeck", about = "Taskdeck access administration", version)]
pub struct Cli {
    /// Act as this user (email). Overrides TASKDECK_ACTOR_EMAIL.
    #[arg(long, global = true)]
    pub as_user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Access-control administration: modules, roles, permissions, templates
    #[command(subcommand)]
    Access(access::AccessCommand),
    /// Brand/task-type assignment workflows
    #[command(subcommand)]
    Assign(assign::AssignCommand),
}
