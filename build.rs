//! Stamps version details and asset dependencies into the binary.
//!
//! - `GIT_HASH`: short commit hash, empty outside a git checkout
//! - `GIT_DIRTY`: `true` when tracked files have uncommitted changes
//! - `ON_RELEASE_TAG`: `true` when HEAD is exactly a release tag

use std::process::{Command, Output};

/// Assets embedded with `include_str!`.
const EMBEDDED_ASSETS: [&str; 2] = ["static/content.toml", "static/style.css"];

fn git(args: &[&str]) -> Option<Output> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-changed=.git/index");
    for asset in EMBEDDED_ASSETS {
        println!("cargo:rerun-if-changed={asset}");
    }

    let hash = git(&["rev-parse", "--short", "HEAD"])
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default();

    let dirty = !hash.is_empty()
        && git(&["status", "--porcelain", "--untracked-files=no"])
            .is_some_and(|o| !o.stdout.is_empty());

    let on_tag = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();

    println!("cargo:rustc-env=GIT_HASH={hash}");
    println!("cargo:rustc-env=GIT_DIRTY={dirty}");
    println!("cargo:rustc-env=ON_RELEASE_TAG={on_tag}");
}
