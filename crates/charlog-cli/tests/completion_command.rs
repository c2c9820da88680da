use assert_cmd::Command;
use predicates::prelude::*;

fn charlog() -> Command {
    #[allow(deprecated)]
    Command::new(assert_cmd::cargo::cargo_bin("charlog"))
}

#[test]
fn test_completion_help_lists_shells_and_installation() {
    charlog()
        .args(["completion", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate shell completion scripts"))
        .stdout(predicate::str::contains("SUPPORTED SHELLS"))
        .stdout(predicate::str::contains("INSTALLATION"))
        .stdout(predicate::str::contains("~/.zshrc"));
}

#[test]
fn test_completion_scripts_name_the_binary() {
    let cases = [
        ("bash", "complete -F _charlog"),
        ("zsh", "#compdef charlog"),
        ("fish", "complete -c charlog"),
        ("powershell", "Register-ArgumentCompleter"),
    ];

    for (shell, marker) in cases {
        charlog()
            .args(["completion", "--shell", shell])
            .assert()
            .success()
            .stdout(predicate::str::contains(marker));
    }
}

#[test]
fn test_completion_rejects_unknown_shell() {
    charlog()
        .args(["completion", "--shell", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_completion_requires_shell() {
    charlog()
        .arg("completion")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_completion_includes_subcommands() {
    charlog()
        .args(["completion", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("entries"));
}
