use std::env;
use std::process::Command;

fn main() {
    let version = env::var("CARGO_PKG_VERSION").unwrap();
    let profile = env::var("PROFILE").unwrap();

    println!(
        "cargo:rustc-env=FOUNDRY_AGENT_VERSION={}",
        build_version(&version, &profile)
    );

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");
    println!("cargo:rerun-if-changed=.git/index");
}

/// `<version>` for release builds, `<version>-dev+<hash>[.dirty]` otherwise
fn build_version(version: &str, profile: &str) -> String {
    if profile != "debug" {
        return version.to_string();
    }

    let hash = git(&["rev-parse", "--short=8", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .is_some_and(|status| !status.is_empty());

    format!(
        "{}-dev+{}{}",
        version,
        hash,
        if dirty { ".dirty" } else { "" }
    )
}

/// Trimmed stdout of a successful git command
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}
