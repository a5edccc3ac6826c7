// zfsctl-core/src/client_tests.rs
#![cfg(test)]

use super::*;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result as TestResult;

// --- Mock Command Runner ---

type CallLog = Arc<Mutex<Vec<(PathBuf, Vec<String>)>>>;

#[derive(Clone)]
struct MockRunner {
    call_log: CallLog,
    output: CommandOutput,
    spawn_fails: bool,
}

impl MockRunner {
    fn ok(stdout: &str) -> Self {
        Self {
            call_log: Arc::new(Mutex::new(Vec::new())),
            output: CommandOutput {
                status: 0,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
            spawn_fails: false,
        }
    }

    fn failing(status: i32, stdout: &str, stderr: &str) -> Self {
        let mut runner = Self::ok(stdout);
        runner.output.status = status;
        runner.output.stderr = stderr.to_string();
        runner
    }

    fn unspawnable() -> Self {
        let mut runner = Self::ok("");
        runner.spawn_fails = true;
        runner
    }

    fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.call_log.lock().unwrap().clone()
    }

    fn last_args(&self) -> Vec<String> {
        self.calls().last().map(|(_, args)| args.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, program: &Path, args: &[String]) -> errors::Result<CommandOutput> {
        self.call_log
            .lock()
            .unwrap()
            .push((program.to_path_buf(), args.to_vec()));
        if self.spawn_fails {
            return Err(ZfsError::Spawn {
                program: program.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
            });
        }
        Ok(self.output.clone())
    }
}

// --- Test Helpers ---

const ZFS_BIN: &str = "/sbin/zfs";
const ZPOOL_BIN: &str = "/sbin/zpool";

fn test_toolchain() -> Arc<Toolchain> {
    Arc::new(Toolchain::new(Some(PathBuf::from(ZFS_BIN)), Some(PathBuf::from(ZPOOL_BIN))))
}

fn zfs_with(runner: &MockRunner) -> ZfsClient {
    ZfsClient::new(test_toolchain(), Arc::new(runner.clone()))
}

fn zpool_with(runner: &MockRunner) -> ZpoolClient {
    ZpoolClient::new(test_toolchain(), Arc::new(runner.clone()))
}

const FILESYSTEMS: &str = "zones\t1004799731712\t956926580736\t328704\t/zones\n\
zones/f78f9208-9c26-47f7-9e03-881a96d17c04\t590843904\t10146574336\t694054400\t/zones/f78f9208-9c26-47f7-9e03-881a96d17c04\n\
zones/f78f9208-9c26-47f7-9e03-881a96d17c04/data\t73728\t10146574336\t31744\t/data\n";

const SNAPSHOTS: &str = "zones/f78f9208-9c26-47f7-9e03-881a96d17c04/data@daily-20120430\t1024\t-\t32768\t-\n\
zones/f78f9208-9c26-47f7-9e03-881a96d17c04/data@daily-20120501\t1024\t-\t32768\t-\n\
zones/f78f9208-9c26-47f7-9e03-881a96d17c04/data@daily-20120502\t1024\t-\t32768\t-\n";

const COMPRESSION: &str = "zones\tcompression\ton\tlocal\n\
zones/f78f9208-9c26-47f7-9e03-881a96d17c04\tcompression\ton\tinherited from zones\n\
zones/f78f9208-9c26-47f7-9e03-881a96d17c04/data\tcompression\ton\tinherited from zones\n\
zones/f78f9208-9c26-47f7-9e03-881a96d17c04/data@daily-20120430\tcompression\t-\t-\n";

// --- Dataset Client Tests ---

#[tokio::test]
async fn test_zfs_list_filesystems() -> TestResult<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let runner = MockRunner::ok(FILESYSTEMS);
    let datasets = zfs_with(&runner).list(&ListOptions::default()).await?;

    assert_eq!(datasets.len(), 3);
    assert_eq!(
        datasets[0],
        Dataset {
            name: "zones".to_string(),
            used: 1004799731712,
            avail: Some(956926580736),
            refer: 328704,
            mountpoint: "/zones".to_string(),
        }
    );
    assert_eq!(datasets[2].name, "zones/f78f9208-9c26-47f7-9e03-881a96d17c04/data");
    assert_eq!(datasets[2].mountpoint, "/data");

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, PathBuf::from(ZFS_BIN));
    assert_eq!(calls[0].1, ListOptions::default().args());
    Ok(())
}

#[tokio::test]
async fn test_zfs_list_snapshots() -> TestResult<()> {
    let runner = MockRunner::ok(SNAPSHOTS);
    let options = ListOptions {
        kind: Some(DatasetKind::Snapshot),
        ..ListOptions::default()
    };
    let snapshots = zfs_with(&runner).list(&options).await?;

    assert_eq!(snapshots.len(), 3);
    for snapshot in &snapshots {
        assert_eq!(snapshot.used, 1024);
        assert_eq!(snapshot.avail, None);
        assert_eq!(snapshot.refer, 32768);
        assert_eq!(snapshot.mountpoint, "-");
    }
    assert!(snapshots[1].name.ends_with("@daily-20120501"));
    assert!(runner.last_args().windows(2).any(|w| w == ["-t", "snapshot"]));
    Ok(())
}

#[tokio::test]
async fn test_zfs_list_drops_malformed_lines_and_keeps_order() -> TestResult<()> {
    let stdout = "tank\t1\t2\t3\t/tank\n\
                  garbage line\n\
                  \n\
                  tank/b\t4\t5\t6\t/tank/b\n";
    let runner = MockRunner::ok(stdout);
    let datasets = zfs_with(&runner).list(&ListOptions::default()).await?;
    let names: Vec<&str> = datasets.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["tank", "tank/b"]);
    Ok(())
}

#[tokio::test]
async fn test_zfs_list_empty_output() -> TestResult<()> {
    let runner = MockRunner::ok("");
    assert!(zfs_with(&runner).list(&ListOptions::default()).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_zfs_get_properties() -> TestResult<()> {
    let runner = MockRunner::ok(COMPRESSION);
    let properties = zfs_with(&runner).get(&GetOptions::new("compression")).await?;

    assert_eq!(properties.len(), 4);
    assert_eq!(properties[0].source, PropertySource::Local);
    assert_eq!(
        properties[1].source,
        PropertySource::Inherited {
            from: Some("zones".to_string())
        }
    );
    assert_eq!(properties[3].value, "-");
    assert_eq!(properties[3].source, PropertySource::NotApplicable);
    assert_eq!(runner.last_args().last().map(String::as_str), Some("compression"));
    Ok(())
}

#[tokio::test]
async fn test_zfs_mutations_send_expected_args() -> TestResult<()> {
    let runner = MockRunner::ok("");
    let zfs = zfs_with(&runner);

    zfs.set(&SetOptions::new("tank/home", "quota", "10G")).await?;
    zfs.destroy(&DestroyOptions { name: "tank/old".into(), recursive: true }).await?;
    zfs.snapshot(&SnapshotOptions { dataset: "tank/data".into(), name: "daily".into(), recursive: false }).await?;
    zfs.clone_snapshot(&CloneOptions { snapshot: "tank/data@daily".into(), dataset: "tank/restore".into() }).await?;
    zfs.create(&CreateOptions {
        name: "tank/vol".into(),
        options: vec![PropertyAssignment::new("compression", "lz4")],
        size: Some("1G".into()),
    })
    .await?;

    let args: Vec<Vec<String>> = runner.calls().into_iter().map(|(_, args)| args).collect();
    assert_eq!(args[0], ["set", "quota=10G", "tank/home"]);
    assert_eq!(args[1], ["destroy", "-r", "tank/old"]);
    assert_eq!(args[2], ["snapshot", "tank/data@daily"]);
    assert_eq!(args[3], ["clone", "tank/data@daily", "tank/restore"]);
    assert_eq!(args[4], ["create", "-o", "compression=lz4", "-V", "1073741824", "tank/vol"]);
    Ok(())
}

#[tokio::test]
async fn test_zfs_create_invalid_size_does_not_spawn() {
    let runner = MockRunner::ok("");
    let result = zfs_with(&runner)
        .create(&CreateOptions {
            name: "tank/vol".into(),
            size: Some("10Q".into()),
            ..CreateOptions::default()
        })
        .await;
    assert!(matches!(result, Err(ZfsError::InvalidSize(_))));
    assert!(runner.calls().is_empty());
}

// --- Error Policy Tests ---

#[tokio::test]
async fn test_command_failure_compacts_stderr_and_ignores_stdout() {
    let stderr = "cannot destroy 'tank/data': filesystem has children\n\
                  \n\
                  use '-r' to destroy the following datasets:\n\
                  tank/data/child\n";
    let runner = MockRunner::failing(1, FILESYSTEMS, stderr);
    let err = zfs_with(&runner)
        .destroy(&DestroyOptions { name: "tank/data".into(), recursive: false })
        .await
        .unwrap_err();

    let message = err.to_string();
    assert_eq!(
        message,
        "cannot destroy 'tank/data': filesystem has children; use '-r' to destroy the following datasets:; tank/data/child"
    );
    assert!(!message.contains('\n'));
    assert!(message.split("; ").all(|segment| !segment.trim().is_empty()));
    assert_eq!(err.exit_status(), Some(1));
}

#[tokio::test]
async fn test_failed_list_returns_error_not_records() {
    let runner = MockRunner::failing(2, FILESYSTEMS, "cannot open 'nope': dataset does not exist\n");
    let result = zfs_with(&runner)
        .list(&ListOptions { target: Some("nope".into()), ..ListOptions::default() })
        .await;
    match result {
        Err(ZfsError::CommandFailed { status, message, .. }) => {
            assert_eq!(status, 2);
            assert_eq!(message, "cannot open 'nope': dataset does not exist");
        }
        other => panic!("expected CommandFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failure_without_stderr_has_fallback_message() {
    let runner = MockRunner::failing(3, "", "\n\n");
    let err = zpool_with(&runner)
        .destroy(&PoolDestroyOptions { name: "tank".into() })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "/sbin/zpool exited with status 3");
}

#[tokio::test]
async fn test_missing_executable_fails_fast() {
    let runner = MockRunner::ok(FILESYSTEMS);
    let toolchain = Arc::new(Toolchain::new(None, Some(PathBuf::from(ZPOOL_BIN))));
    let zfs = ZfsClient::new(toolchain, Arc::new(runner.clone()));

    let result = zfs.list(&ListOptions::default()).await;
    match result {
        Err(ZfsError::ExecutableNotFound { name }) => assert_eq!(name, "zfs"),
        other => panic!("expected ExecutableNotFound, got {:?}", other),
    }
    assert!(runner.calls().is_empty(), "nothing should be spawned without a path");
}

#[tokio::test]
async fn test_spawn_failure_is_surfaced() {
    let runner = MockRunner::unspawnable();
    let result = zpool_with(&runner).list(&PoolListOptions::default()).await;
    assert!(matches!(result, Err(ZfsError::Spawn { .. })), "{:?}", result);
}

// --- Pool Client Tests ---

#[tokio::test]
async fn test_zpool_list() -> TestResult<()> {
    let stdout = "tank\t1992864825344\t442032246784\t1550832578560\t22\tONLINE\t-\n\
                  backup\t999653638144\t512\t999653637632\t0\tDEGRADED\t/mnt/backup\n";
    let runner = MockRunner::ok(stdout);
    let pools = zpool_with(&runner).list(&PoolListOptions::default()).await?;

    assert_eq!(pools.len(), 2);
    assert_eq!(pools[0].name, "tank");
    assert_eq!(pools[0].size, Some(1992864825344));
    assert_eq!(pools[0].alloc, Some(442032246784));
    assert_eq!(pools[0].altroot, None);
    assert_eq!(pools[1].health, PoolHealth::Degraded);
    assert_eq!(pools[1].altroot.as_deref(), Some("/mnt/backup"));
    assert_eq!(runner.calls()[0].0, PathBuf::from(ZPOOL_BIN));
    Ok(())
}

#[tokio::test]
async fn test_zpool_get_with_target() -> TestResult<()> {
    let runner = MockRunner::ok("tank\tautoexpand\toff\tdefault\n");
    let options = GetOptions {
        target: Some("tank".into()),
        ..GetOptions::new("autoexpand")
    };
    let properties = zpool_with(&runner).get(&options).await?;
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].source, PropertySource::Default);
    assert_eq!(
        runner.last_args(),
        ["get", "-H", "-p", "-o", "name,property,value,source", "autoexpand", "tank"]
    );
    Ok(())
}

#[tokio::test]
async fn test_zpool_create_mirror_args() -> TestResult<()> {
    let runner = MockRunner::ok("");
    zpool_with(&runner)
        .create(&PoolCreateOptions {
            name: "tank".into(),
            devices: DeviceSpec::from(vec!["mirror".to_string(), "/dev/a".to_string(), "/dev/b".to_string()]),
            ..PoolCreateOptions::default()
        })
        .await?;
    let args = runner.last_args();
    assert!(args.ends_with(&[
        "create".to_string(),
        "-f".to_string(),
        "tank".to_string(),
        "mirror".to_string(),
        "/dev/a".to_string(),
        "/dev/b".to_string(),
    ]));
    Ok(())
}

#[tokio::test]
async fn test_zpool_mutations_send_expected_args() -> TestResult<()> {
    let runner = MockRunner::ok("");
    let zpool = zpool_with(&runner);

    zpool.set(&SetOptions::new("tank", "autotrim", "on")).await?;
    zpool.destroy(&PoolDestroyOptions { name: "scratch".into() }).await?;
    zpool
        .add(&PoolAddOptions { name: "tank".into(), devices: DeviceSpec::parse("spare /dev/sdz") })
        .await?;

    let args: Vec<Vec<String>> = runner.calls().into_iter().map(|(_, args)| args).collect();
    assert_eq!(args[0], ["set", "autotrim=on", "tank"]);
    assert_eq!(args[1], ["destroy", "-f", "scratch"]);
    assert_eq!(args[2], ["add", "-f", "tank", "spare", "/dev/sdz"]);
    Ok(())
}

#[tokio::test]
async fn test_zpool_add_without_devices_does_not_spawn() {
    let runner = MockRunner::ok("");
    let result = zpool_with(&runner)
        .add(&PoolAddOptions { name: "tank".into(), devices: DeviceSpec::parse("") })
        .await;
    assert!(matches!(result, Err(ZfsError::InvalidRequest(_))));
    assert!(runner.calls().is_empty());
}

// --- Concurrency ---

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_operations_share_toolchain() -> TestResult<()> {
    let runner = MockRunner::ok(FILESYSTEMS);
    let zfs = zfs_with(&runner);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let zfs = zfs.clone();
            tokio::spawn(async move { zfs.list(&ListOptions::default()).await })
        })
        .collect();

    for handle in handles {
        let datasets = handle.await??;
        assert_eq!(datasets.len(), 3);
    }
    assert_eq!(runner.calls().len(), 16);
    Ok(())
}

// --- End-to-end with fake binaries ---

#[cfg(unix)]
#[tokio::test]
async fn test_clients_from_config_with_fake_binaries() -> TestResult<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let bin = tempfile::tempdir()?;
    let zfs_script = format!("#!/bin/sh\nprintf '{}'\n", SNAPSHOTS.replace('\t', "\\t").replace('\n', "\\n"));
    let zpool_script = "#!/bin/sh\necho \"cannot create '$3': no such pool\" >&2\necho >&2\nexit 1\n";
    for (name, script) in [("zfs", zfs_script.as_str()), ("zpool", zpool_script)] {
        let path = bin.path().join(name);
        fs::write(&path, script)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    }

    let config = ZfsctlConfig {
        search_path: Some(vec![bin.path().to_path_buf()]),
        ..ZfsctlConfig::default()
    };
    let (zfs, zpool) = clients_from_config(&config);

    let snapshots = zfs
        .list(&ListOptions { kind: Some(DatasetKind::Snapshot), ..ListOptions::default() })
        .await?;
    assert_eq!(snapshots.len(), 3);
    assert!(snapshots.iter().all(|s| s.avail.is_none()));

    let err = zpool
        .create(&PoolCreateOptions {
            name: "tank".into(),
            devices: DeviceSpec::parse("/dev/a"),
            ..PoolCreateOptions::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "cannot create 'tank': no such pool");
    Ok(())
}
