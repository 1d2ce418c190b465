use std::path::{Path, PathBuf};
use std::process::Command;

/// Deploys a model into an AI resource
pub trait Provisioner {
    /// All-or-nothing: `true` only if the deployment completed
    fn deploy(&self, resource_name: &str, model: &str) -> bool;
}

/// Runs the external deploy script interactively
pub struct ScriptProvisioner {
    script: PathBuf,
}

impl ScriptProvisioner {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }

    pub fn script(&self) -> &Path {
        &self.script
    }
}

impl Provisioner for ScriptProvisioner {
    fn deploy(&self, resource_name: &str, model: &str) -> bool {
        if !self.script.exists() {
            println!("\n❌ Deploy script not found: {}", self.script.display());
            return false;
        }

        println!("\n🚀 Launching model deployment...");
        println!("   Resource: {}", resource_name);
        println!("   Model filter: {}", model);
        println!();

        // Resolve before switching the working directory to the script's own
        let script = self
            .script
            .canonicalize()
            .unwrap_or_else(|_| self.script.clone());

        let mut cmd = Command::new(&script);
        cmd.arg(resource_name).arg(model);
        if let Some(dir) = script.parent().filter(|d| !d.as_os_str().is_empty()) {
            cmd.current_dir(dir);
        }

        tracing::debug!(script = %script.display(), resource_name, model, "running deploy script");
        match cmd.status() {
            Ok(status) => status.success(),
            Err(e) => {
                println!("\n❌ Error running deploy script: {}", e);
                false
            }
        }
    }
}
