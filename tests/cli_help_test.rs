#[cfg(test)]
mod cli_help_tests {
    use assert_cmd::prelude::*;
    use std::process::Command;

    #[test]
    fn test_cli_help_output() {
        // Test that the CLI help command executes successfully and produces expected output
        let mut cmd = Command::cargo_bin("nbcli").unwrap();

        let assert_result = cmd.arg("--help").assert().success();
        let output = assert_result.get_output();
        let help_output = String::from_utf8_lossy(&output.stdout);

        assert!(help_output.contains("Usage:"));
        assert!(help_output.contains("Options:"));
        assert!(help_output.contains("Commands:"));

        // Verify that major command groups are present
        assert!(help_output.contains("user"));
        assert!(help_output.contains("group"));
        assert!(help_output.contains("container"));
        assert!(help_output.contains("item"));
        assert!(help_output.contains("config"));

        // Verify that help flags are present
        assert!(help_output.contains("-h, --help"));
        assert!(help_output.contains("-V, --version"));

        assert!(help_output.contains("nbcli"));
    }

    #[test]
    fn test_cli_subcommand_help_outputs() {
        let subcommands = vec!["user", "group", "container", "item", "config"];

        for subcommand in subcommands {
            let mut cmd = Command::cargo_bin("nbcli").unwrap();
            let assert_result = cmd.arg(subcommand).arg("--help").assert().success();
            let output = assert_result.get_output();
            let help_output = String::from_utf8_lossy(&output.stdout);

            assert!(help_output.contains("Usage:"));
            assert!(help_output.contains(subcommand));

            if subcommand == "user" {
                assert!(help_output.contains("list"));
                assert!(help_output.contains("get"));
            } else if subcommand == "group" {
                assert!(help_output.contains("list"));
                assert!(help_output.contains("get"));
                assert!(help_output.contains("members"));
            } else if subcommand == "container" {
                assert!(help_output.contains("list"));
                assert!(help_output.contains("get"));
            } else if subcommand == "item" {
                assert!(help_output.contains("list"));
                assert!(help_output.contains("get"));
                assert!(help_output.contains("search"));
                assert!(help_output.contains("shared"));
                assert!(help_output.contains("upload"));
                assert!(help_output.contains("mkdir"));
                assert!(help_output.contains("rename"));
                assert!(help_output.contains("delete"));
            } else if subcommand == "config" {
                assert!(help_output.contains("show"));
                assert!(help_output.contains("get"));
                assert!(help_output.contains("set"));
            }
        }
    }

    #[test]
    fn test_cli_version_output() {
        let mut cmd = Command::cargo_bin("nbcli").unwrap();

        let assert_result = cmd.arg("--version").assert().success();
        let output = assert_result.get_output();
        let version_output = String::from_utf8_lossy(&output.stdout);

        assert!(version_output.contains("nbcli"));
        assert!(version_output.contains('.'));
    }

    #[test]
    fn test_nested_subcommand_help() {
        let nested_commands = vec![
            ("user", "list"),
            ("user", "get"),
            ("group", "list"),
            ("group", "get"),
            ("group", "members"),
            ("container", "list"),
            ("container", "get"),
            ("item", "list"),
            ("item", "get"),
            ("item", "search"),
            ("item", "shared"),
            ("item", "upload"),
            ("item", "mkdir"),
            ("item", "rename"),
            ("item", "delete"),
            ("config", "show"),
            ("config", "get"),
        ];

        for (parent_cmd, sub_cmd) in nested_commands {
            let mut cmd = Command::cargo_bin("nbcli").unwrap();
            let assert_result = cmd
                .arg(parent_cmd)
                .arg(sub_cmd)
                .arg("--help")
                .assert()
                .success();
            let output = assert_result.get_output();
            let help_output = String::from_utf8_lossy(&output.stdout);

            assert!(help_output.contains("Usage:"));
            assert!(help_output.contains(parent_cmd));
            assert!(help_output.contains(sub_cmd));
        }
    }

    #[test]
    fn test_missing_subcommand_shows_usage() {
        let mut cmd = Command::cargo_bin("nbcli").unwrap();
        let assert_result = cmd.assert().failure();
        let output = assert_result.get_output();
        let help_output = String::from_utf8_lossy(&output.stderr);

        assert!(help_output.contains("Usage:"));
    }

    #[test]
    fn test_unknown_conflict_mode_is_rejected() {
        use predicates::prelude::*;

        let mut cmd = Command::cargo_bin("nbcli").unwrap();
        cmd.args(["item", "upload", "report.pdf", "--conflict", "merge"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid value"));
    }
}
