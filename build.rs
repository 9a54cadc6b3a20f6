//! Exposes `JSP_BUILD_TIMESTAMP` and `JSP_GIT_COMMIT` to `--version`.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    println!(
        "cargo:rustc-env=JSP_BUILD_TIMESTAMP={}",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );
    println!(
        "cargo:rustc-env=JSP_GIT_COMMIT={}",
        short_commit().as_deref().unwrap_or("unknown")
    );
}

fn short_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())?;
    String::from_utf8(output.stdout)
        .ok()
        .map(|hash| hash.trim().to_string())
}
