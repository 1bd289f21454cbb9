use std::process::Command;

/// Commit for `entstruct --version`. Source tarballs have no `.git`, so
/// packagers can pin it with ENTSTRUCT_BUILD_COMMIT.
fn commit() -> String {
    if let Ok(pinned) = std::env::var("ENTSTRUCT_BUILD_COMMIT") {
        let pinned = pinned.trim();
        if !pinned.is_empty() {
            return pinned.to_string();
        }
    }
    Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/heads");
    println!("cargo:rerun-if-env-changed=ENTSTRUCT_BUILD_COMMIT");

    let env_or_unknown = |key: &str| std::env::var(key).unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=ENTSTRUCT_COMMIT={}", commit());
    println!("cargo:rustc-env=ENTSTRUCT_PROFILE={}", env_or_unknown("PROFILE"));
    println!("cargo:rustc-env=ENTSTRUCT_TARGET={}", env_or_unknown("TARGET"));
}
