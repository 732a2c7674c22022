use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

/// Packaged builds without a `.git` directory can pin the commit through
/// `RADARFRAME_BUILD_COMMIT`; CI sets `GITHUB_SHA`.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    for var in ["RADARFRAME_BUILD_COMMIT", "GITHUB_SHA"] {
        println!("cargo:rerun-if-env-changed={var}");
    }

    let commit = ["RADARFRAME_BUILD_COMMIT", "GITHUB_SHA"]
        .into_iter()
        .find_map(|var| env::var(var).ok().filter(|value| !value.trim().is_empty()))
        .or_else(|| git(&["rev-parse", "--short=7", "HEAD"]))
        .map(|sha| sha.trim().chars().take(7).collect::<String>())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let date = git(&["show", "-s", "--format=%cs", "HEAD"]).unwrap_or_else(|| UNKNOWN.to_string());

    println!("cargo:rustc-env=RADARFRAME_BUILD_COMMIT={commit}");
    println!("cargo:rustc-env=RADARFRAME_BUILD_DATE={date}");
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (output.status.success() && !text.is_empty()).then(|| text.to_string())
}
