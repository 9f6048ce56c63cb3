//! Password-less SSH login setup
//!
//! Remote kernels are launched over SSH, so the remote host has to accept the
//! local key. This creates an RSA key pair when none exists, installs the
//! public key on the remote host and loads the private key into the agent.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

use crate::errors::{Result, RkError};

/// Private key file names checked for an existing pair, in order
pub const KEY_NAMES: [&str; 4] = ["id_dsa", "id_ecdsa", "id_ed25519", "id_rsa"];

pub struct SshSetup {
    ssh_dir: PathBuf,
    local_user: String,
}

impl SshSetup {
    pub fn new(ssh_dir: PathBuf, local_user: String) -> Self {
        Self { ssh_dir, local_user }
    }

    /// `~/.ssh` of the current user
    pub fn for_current_user() -> Result<Self> {
        let home = env::var("HOME")
            .map_err(|_| RkError::Config("HOME environment variable not set".to_string()))?;
        let user = env::var("USER")
            .or_else(|_| env::var("LOGNAME"))
            .unwrap_or_default();
        Ok(Self::new(PathBuf::from(home).join(".ssh"), user))
    }

    fn rsa_key(&self) -> PathBuf {
        self.ssh_dir.join("id_rsa")
    }

    /// True when some private key exists together with its `.pub`
    pub fn has_key_pair(&self) -> bool {
        KEY_NAMES.iter().any(|name| {
            let private = self.ssh_dir.join(name);
            let public = self.ssh_dir.join(format!("{}.pub", name));
            private.is_file() && public.is_file()
        })
    }

    /// Drop the `user@` part when it names the local user
    pub fn normalize_target(&self, input: &str) -> String {
        let input = input.trim();
        match input.split_once('@') {
            Some((user, host)) if user == self.local_user => host.to_string(),
            _ => input.to_string(),
        }
    }

    /// Run the whole setup, asking for the remote host through `ask`
    pub fn run(&self, ask: &mut dyn FnMut() -> Result<String>) -> Result<()> {
        if self.has_key_pair() {
            debug!("Existing key pair found in {}", self.ssh_dir.display());
        } else {
            if !self.ssh_dir.is_dir() {
                fs::create_dir_all(&self.ssh_dir)?;
            }
            let key = self.rsa_key();
            run_command(
                Command::new("ssh-keygen")
                    .args(["-t", "rsa", "-b", "4096", "-N", "", "-f"])
                    .arg(&key),
            )?;
            info!("Generated key pair {}", key.display());
        }

        let target = self.normalize_target(&ask()?);
        if target.is_empty() {
            return Err(RkError::Prompt("no remote host given".to_string()));
        }

        run_command(Command::new("ssh-copy-id").arg(&target))?;
        run_command(Command::new("ssh-add").arg(self.rsa_key()))?;
        info!("Password-less login to {} configured", target);
        Ok(())
    }
}

fn run_command(command: &mut Command) -> Result<()> {
    let program = command.get_program().to_string_lossy().into_owned();
    debug!("Running {:?}", command);
    let status = command
        .status()
        .map_err(|e| RkError::Command(format!("{}: {}", program, e)))?;
    if !status.success() {
        return Err(RkError::Command(format!("{} exited with {}", program, status)));
    }
    Ok(())
}
