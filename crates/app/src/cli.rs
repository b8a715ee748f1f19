//! Command-line arguments.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use apiweave_ui::UiCommand;
use clap::{Parser, Subcommand};

/// APIWeave - edit the workflow run order of a collection
#[derive(Parser, Debug)]
#[command(name = "apiweave", author, version, about)]
pub struct Args {
    /// Config file (defaults to ./apiweave.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty collection in the file store
    InitCollection {
        /// Collection name
        name: String,

        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },

    /// Add a workflow to a collection in the file store
    AddWorkflow {
        /// Collection id
        collection_id: String,

        /// Workflow name
        name: String,

        /// Number of nodes in the workflow
        #[arg(long, default_value_t = 0)]
        nodes: usize,
    },

    /// Print the effective run order of a collection
    Show {
        /// Collection id
        collection_id: String,
    },

    /// Apply edits to the run order and save it
    ///
    /// Operations run left to right: move:FROM:TO, enable:I, continue:I,
    /// remove:I, add:WORKFLOW_ID, global:on|off
    Edit {
        /// Collection id
        collection_id: String,

        /// Edit operations
        #[arg(required = true, value_name = "OP")]
        ops: Vec<EditOp>,

        /// Print the result without saving
        #[arg(long)]
        dry_run: bool,
    },
}

/// A single edit to the run order, as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Move { from: usize, to: usize },
    ToggleEnabled(usize),
    ToggleContinue(usize),
    Remove(usize),
    Add(String),
    Global(bool),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseOpError {
    #[error("unknown operation {0:?} (expected move, enable, continue, remove, add or global)")]
    Unknown(String),

    #[error("{op}: expected {expected}")]
    Malformed {
        op: String,
        expected: &'static str,
    },
}

impl EditOp {
    /// Commands that perform this edit. Moves replay a drag gesture.
    #[must_use]
    pub fn commands(&self, global_continue_on_failure: bool) -> Vec<UiCommand> {
        match self {
            Self::Move { from, to } => vec![
                UiCommand::BeginDrag { index: *from },
                UiCommand::DragOver { index: *to },
                UiCommand::Drop,
            ],
            Self::ToggleEnabled(index) => vec![UiCommand::ToggleEnabled { index: *index }],
            Self::ToggleContinue(index) => {
                vec![UiCommand::ToggleContinueOnFailure { index: *index }]
            }
            Self::Remove(index) => vec![UiCommand::RemoveEntry { index: *index }],
            Self::Add(item_id) => vec![UiCommand::AddEntry {
                item_id: item_id.clone(),
            }],
            Self::Global(on) if *on != global_continue_on_failure => {
                vec![UiCommand::ToggleGlobalContinueOnFailure]
            }
            Self::Global(_) => Vec::new(),
        }
    }

    /// Whether updates answering `cmd` show that this edit changed something.
    /// Starting and dropping a drag always re-render the rows, so a move is
    /// judged by its hover alone.
    #[must_use]
    pub const fn judged_by(&self, cmd: &UiCommand) -> bool {
        match self {
            Self::Move { .. } => matches!(cmd, UiCommand::DragOver { .. }),
            _ => true,
        }
    }
}

fn parse_index(op: &str, value: &str, expected: &'static str) -> Result<usize, ParseOpError> {
    value.parse().map_err(|_| ParseOpError::Malformed {
        op: op.to_string(),
        expected,
    })
}

impl FromStr for EditOp {
    type Err = ParseOpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match (name, args.as_slice()) {
            ("move", [from, to]) => Ok(Self::Move {
                from: parse_index(s, from, "move:FROM:TO")?,
                to: parse_index(s, to, "move:FROM:TO")?,
            }),
            ("move", _) => Err(ParseOpError::Malformed {
                op: s.to_string(),
                expected: "move:FROM:TO",
            }),
            ("enable", [index]) => Ok(Self::ToggleEnabled(parse_index(s, index, "enable:INDEX")?)),
            ("continue", [index]) => Ok(Self::ToggleContinue(parse_index(
                s,
                index,
                "continue:INDEX",
            )?)),
            ("remove", [index]) => Ok(Self::Remove(parse_index(s, index, "remove:INDEX")?)),
            ("add", [item_id]) if !item_id.trim().is_empty() => {
                Ok(Self::Add((*item_id).to_string()))
            }
            ("global", ["on"]) => Ok(Self::Global(true)),
            ("global", ["off"]) => Ok(Self::Global(false)),
            ("enable" | "continue" | "remove" | "add" | "global", _) => {
                Err(ParseOpError::Malformed {
                    op: s.to_string(),
                    expected: match name {
                        "add" => "add:WORKFLOW_ID",
                        "global" => "global:on|off",
                        _ => "NAME:INDEX",
                    },
                })
            }
            _ => Err(ParseOpError::Unknown(s.to_string())),
        }
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move { from, to } => write!(f, "move:{from}:{to}"),
            Self::ToggleEnabled(index) => write!(f, "enable:{index}"),
            Self::ToggleContinue(index) => write!(f, "continue:{index}"),
            Self::Remove(index) => write!(f, "remove:{index}"),
            Self::Add(item_id) => write!(f, "add:{item_id}"),
            Self::Global(on) => write!(f, "global:{}", if *on { "on" } else { "off" }),
        }
    }
}
