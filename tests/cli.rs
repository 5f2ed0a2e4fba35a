use assert_cmd::Command;
use predicates::prelude::*;

fn taproot_build() -> Command {
    let mut cmd = Command::cargo_bin("taproot-build").unwrap();
    cmd.arg("--no-color");
    cmd
}

#[test]
fn args_prints_normalized_record() {
    taproot_build()
        .args(["args", "run-tests"])
        .assert()
        .success()
        .stdout("TARGET_ENV=tests\nBUILD_PROFILE=debug\nPROFILING=false\n");
}

#[test]
fn args_json_with_profile() {
    taproot_build()
        .args(["args", "--json", "run", "profile=fast"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""TARGET_ENV": "hardware""#))
        .stdout(predicate::str::contains(r#""BUILD_PROFILE": "fast""#))
        .stdout(predicate::str::contains(r#""PROFILING": "false""#));
}

#[test]
fn args_flags_after_target_are_parsed_as_flags() {
    taproot_build()
        .args(["args", "run", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""TARGET_ENV": "hardware""#));

    taproot_build()
        .args(["args", "run", "profile=fast", "-v"])
        .assert()
        .success()
        .stdout("TARGET_ENV=hardware\nBUILD_PROFILE=fast\nPROFILING=false\n");
}

#[test]
fn args_help_exits_zero_with_usage() {
    taproot_build()
        .args(["args", "help"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Usage: scons <target>"));
}

#[test]
fn args_rejects_unknown_target() {
    taproot_build()
        .args(["args", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("You did not select a valid target"))
        .stderr(predicate::str::contains("Usage: scons <target>"));
}

#[test]
fn args_requires_a_target() {
    taproot_build()
        .arg("args")
        .assert()
        .failure()
        .stderr(predicate::str::contains("You must select a valid robot target"));
}

#[test]
fn args_rejects_two_targets() {
    taproot_build()
        .args(["args", "build", "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("correct number of arguments"));
}

#[test]
fn fingerprint_of_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    taproot_build()
        .arg("fingerprint")
        .arg(dir.path())
        .assert()
        .success()
        .stdout("da39a3ee5e6b4b0d3255bfef95601890afd80709\n");
}

#[test]
fn subproject_without_descriptor_fails() {
    let dir = tempfile::tempdir().unwrap();
    taproot_build()
        .args(["subproject", "taproot"])
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("building taproot"))
        .stderr(predicate::str::contains("project.xml"));
}

#[cfg(unix)]
#[test]
fn subproject_git_failure_is_fatal_and_skips_lbuild() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("project.xml"),
        "<library><repositories><repository><path>../modm/repo.lb</path></repository></repositories></library>",
    )
    .unwrap();

    taproot_build()
        .args(["subproject", "taproot", "--git", "false", "--lbuild", "definitely-not-lbuild-42"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to describe git revision"));

    assert!(!dir.path().join(".cache").exists());
}
