use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A launchd domain target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Domain {
    System,
    Gui(u32),
    User(u32),
}

impl Domain {
    /// Directory launchd conventionally reads definitions for this domain from.
    pub fn default_definition_dir(&self, home: &str) -> PathBuf {
        match self {
            Domain::System => PathBuf::from("/Library/LaunchDaemons"),
            Domain::Gui(_) | Domain::User(_) => {
                PathBuf::from(home).join("Library").join("LaunchAgents")
            }
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::System => write!(f, "system"),
            Domain::Gui(uid) => write!(f, "gui/{}", uid),
            Domain::User(uid) => write!(f, "user/{}", uid),
        }
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, uid) = match s.split_once('/') {
            Some((kind, uid)) => (kind, Some(uid)),
            None => (s, None),
        };

        let parse_uid = |uid: Option<&str>| -> Result<u32, String> {
            let uid = uid.ok_or_else(|| format!("domain `{}` needs a uid, e.g. `{}/501`", s, kind))?;
            uid.parse::<u32>()
                .map_err(|_| format!("invalid uid `{}` in domain `{}`", uid, s))
        };

        match kind {
            "system" if uid.is_none() => Ok(Domain::System),
            "gui" => Ok(Domain::Gui(parse_uid(uid)?)),
            "user" => Ok(Domain::User(parse_uid(uid)?)),
            _ => Err(format!(
                "unknown domain `{}` (expected system, gui/<uid> or user/<uid>)",
                s
            )),
        }
    }
}

/// Captured result of one control-binary invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub status: String,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Contents of a launchd property list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub label: String,
    pub program_arguments: Vec<String>,
    pub run_at_load: bool,
    pub keep_alive: bool,
    pub working_directory: Option<String>,
    pub environment: BTreeMap<String, String>,
    pub stdout_path: Option<String>,
    pub stderr_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub specifier: String,
    pub state: Option<String>,
    pub pid: Option<u32>,
    pub last_exit_code: Option<String>,
    pub properties: BTreeMap<String, String>,
    pub queried_at: DateTime<Utc>,
}

impl ServiceStatus {
    pub fn is_running(&self) -> bool {
        self.state.as_deref() == Some("running")
    }
}
