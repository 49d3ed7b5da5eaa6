#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Paths a full Salt install leaves behind, relative to the root prefix.
pub const SALT_TREE: &[&str] = &[
    "etc/salt/master",
    "etc/salt/master.d/reactor.conf",
    "etc/salt/pki/master/master.pem",
    "etc/salt/pki/master/minions/web01",
    "etc/salt/minion",
    "etc/salt/minion.d/_schedule.conf",
    "etc/salt/pki/minion/minion.pem",
    "etc/salt/syndic",
    "etc/salt/syndic.d/overrides.conf",
    "etc/salt/pki/syndic/syndic.pub",
    "var/cache/salt/master/jobs/4f/jid",
    "var/cache/salt/minion/extmods/grains/custom.py",
    "var/cache/salt/syndic/minions",
    "var/log/salt/master",
    "var/log/salt/minion",
    "var/log/salt/syndic",
    "var/run/salt/master/publish_pull.ipc",
    "var/run/salt/minion/minion_event.ipc",
    "var/run/salt/syndic/syndic.ipc",
    "var/lib/dpkg/status",
];

/// Populate `root` with [`SALT_TREE`].
pub fn seed_salt_tree(root: &Path) {
    for rel in SALT_TREE {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("seeded path has a parent"))
            .expect("create seeded parent");
        fs::write(&path, rel.as_bytes()).expect("write seeded file");
    }
}

/// Every path below `root`, relative and sorted.
pub fn snapshot(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).expect("read dir").flatten() {
            let path = entry.path();
            if entry.file_type().expect("file type").is_dir() {
                stack.push(path.clone());
            }
            out.push(path.strip_prefix(root).expect("below root").to_path_buf());
        }
    }
    out.sort();
    out
}

/// Run the hook binary as `argv0` with `args`, logging the exchange.
pub fn run_hook(case_name: &str, argv0: &str, args: &[&str]) -> CmdResult {
    run_hook_with_env(case_name, argv0, args, &[])
}

pub fn run_hook_with_env(
    case_name: &str,
    argv0: &str,
    args: &[&str],
    env: &[(&str, &str)],
) -> CmdResult {
    let root = std::env::temp_dir().join("salt-purge-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = PathBuf::from(env!("CARGO_BIN_EXE_salt-postrm"));

    let mut command = Command::new(&bin_path);
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.arg0(argv0);
    }
    for name in [
        "SALT_PURGE_ROOT",
        "SALT_PURGE_CONFIG_DIR",
        "SALT_PURGE_CACHE_DIR",
        "SALT_PURGE_LOG_DIR",
        "SALT_PURGE_RUN_DIR",
        "SALT_PURGE_DRY_RUN",
        "SALT_PURGE_JSONL_PATH",
        "SALT_PURGE_OUTPUT_FORMAT",
    ] {
        command.env_remove(name);
    }
    let output = command
        .args(args)
        .envs(env.iter().copied())
        .env("RUST_BACKTRACE", "1")
        .output()
        .expect("execute salt-postrm");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("argv0={argv0}\n"));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}
