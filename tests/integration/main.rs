//! Integration tests for the jcache CLI

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn jcache(storage: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("jcache");
        cmd.env_remove("JCACHE_STORAGE_PATH");
        cmd.args(["--storage-path", storage.path().to_str().unwrap()]);
        cmd
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("jcache")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("file-backed JSON key/value cache"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("jcache")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("jcache"));
    }

    #[test]
    fn set_then_get_round_trips() {
        let storage = TempDir::new().unwrap();

        jcache(&storage)
            .args(["set", "greeting", r#"{"hello":"world"}"#])
            .assert()
            .success()
            .stdout(predicate::str::contains("stored"));

        jcache(&storage)
            .args(["get", "greeting"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"hello\""));
    }

    #[test]
    fn set_reads_value_from_stdin() {
        let storage = TempDir::new().unwrap();

        jcache(&storage)
            .args(["set", "piped"])
            .write_stdin(r#"[1, 2, 3]"#)
            .assert()
            .success();

        jcache(&storage)
            .args(["get", "piped"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1"));
    }

    #[test]
    fn set_rejects_invalid_json() {
        let storage = TempDir::new().unwrap();

        jcache(&storage)
            .args(["set", "bad", "{not json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not valid JSON"));
    }

    #[test]
    fn get_unknown_key_is_a_miss() {
        let storage = TempDir::new().unwrap();

        jcache(&storage)
            .args(["get", "nothing"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("miss"));
    }

    #[test]
    fn has_reports_membership() {
        let storage = TempDir::new().unwrap();

        jcache(&storage)
            .args(["has", "k"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("false"));

        jcache(&storage).args(["set", "k", "42"]).assert().success();

        jcache(&storage)
            .args(["has", "k"])
            .assert()
            .success()
            .stdout(predicate::str::contains("true"));
    }

    #[test]
    fn delete_then_delete_again() {
        let storage = TempDir::new().unwrap();

        jcache(&storage).args(["set", "k", "1"]).assert().success();

        jcache(&storage)
            .args(["delete", "k"])
            .assert()
            .success()
            .stdout(predicate::str::contains("deleted"));

        jcache(&storage)
            .args(["delete", "k"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn size_reports_positive_byte_count() {
        let storage = TempDir::new().unwrap();

        jcache(&storage)
            .args(["set", "k", r#"{"a":1}"#])
            .assert()
            .success();

        jcache(&storage)
            .args(["size", "k"])
            .assert()
            .success()
            .stdout(predicate::str::is_match(r"^[1-9]\d*\n$").unwrap());
    }

    #[test]
    fn sweep_reports_live_entries() {
        let storage = TempDir::new().unwrap();

        jcache(&storage).args(["set", "a", "1"]).assert().success();
        jcache(&storage).args(["set", "b", "2"]).assert().success();

        jcache(&storage)
            .args(["sweep"])
            .assert()
            .success()
            .stdout(predicate::str::contains("2 live entries"));
    }

    #[test]
    fn uncompressed_entries_work_across_invocations() {
        let storage = TempDir::new().unwrap();

        jcache(&storage)
            .args(["--no-compress", "set", "k", r#""plain""#])
            .assert()
            .success();

        jcache(&storage)
            .args(["--no-compress", "get", "k"])
            .assert()
            .success()
            .stdout(predicate::str::contains("plain"));
    }

    #[test]
    fn expired_entry_vanishes_after_sweep() {
        let storage = TempDir::new().unwrap();

        // lifetime 1s, then wait for it to lapse before reopening.
        jcache(&storage)
            .args(["--lifetime", "1", "set", "k", "1"])
            .assert()
            .success();

        std::thread::sleep(std::time::Duration::from_secs(2));

        jcache(&storage)
            .args(["has", "k"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("false"));
    }
}
