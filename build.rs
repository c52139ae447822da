use std::process::Command;

/// Build stamp read by `openstackcli version`.
#[derive(Default)]
struct Stamp {
    hash: String,
    commit_date: String,
    release: bool,
}

fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
}

impl Stamp {
    /// Outside a git checkout every field stays empty and the build counts as
    /// a release.
    fn from_git(version: &str) -> Self {
        let Some(hash) = git(&["rev-parse", "--short", "HEAD"]) else {
            return Self {
                release: true,
                ..Self::default()
            };
        };

        let clean = git(&["status", "--porcelain"]).is_some_and(|s| s.is_empty());
        let tagged = git(&["tag", "--points-at", "HEAD"]).is_some_and(|tags| {
            tags.lines()
                .any(|tag| tag.strip_prefix('v').unwrap_or(tag) == version)
        });

        Self {
            hash,
            commit_date: git(&["log", "-1", "--format=%cd", "--date=format:%Y-%m-%d %H:%M"])
                .unwrap_or_default(),
            release: clean && tagged,
        }
    }
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let stamp = Stamp::from_git(env!("CARGO_PKG_VERSION"));
    for (key, value) in [
        ("GIT_HASH", stamp.hash),
        ("GIT_COMMIT_DATE", stamp.commit_date),
        ("IS_RELEASE", stamp.release.to_string()),
    ] {
        println!("cargo:rustc-env={}={}", key, value);
    }
}
