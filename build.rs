use std::process::Command;

fn short_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_owned())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    // outside a git checkout `--version` just omits the hash
    if let Some(hash) = short_commit() {
        println!("cargo:rustc-env=FONTSCALE_GIT_HASH={hash}");
    }
}
