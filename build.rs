use std::env;
use std::path::Path;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=RUSTC");
    if Path::new(".git/HEAD").exists() {
        println!("cargo:rerun-if-changed=.git/HEAD");
        println!("cargo:rerun-if-changed=.git/index");
    }

    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let rustc_version = run(&rustc, &["--version"]).unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=BUILD_RUSTC_VERSION={rustc_version}");

    // No git, or not a checkout: the VCS settings are simply left unset.
    let Some(revision) = run("git", &["rev-parse", "HEAD"]) else {
        return;
    };
    println!("cargo:rustc-env=BUILD_VCS_REVISION={revision}");

    if let Some(time) = run("git", &["log", "-1", "--format=%cI"]) {
        println!("cargo:rustc-env=BUILD_VCS_TIME={time}");
    }

    if let Some(status) = run_raw("git", &["status", "--porcelain"]) {
        let modified = !status.trim().is_empty();
        println!("cargo:rustc-env=BUILD_VCS_MODIFIED={modified}");
    }
}

fn run(program: &str, args: &[&str]) -> Option<String> {
    run_raw(program, args)
        .map(|out| out.trim().to_string())
        .filter(|out| !out.is_empty())
}

fn run_raw(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}
