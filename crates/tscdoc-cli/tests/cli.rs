mod common;

use common::{OutputAssertions, TestContext, TOC};
use predicates::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn help_lists_overrides() {
    let ctx = TestContext::new();
    ctx.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--component"))
        .stdout(predicate::str::contains("--spec-path"));
}

#[test]
fn successful_run_writes_documents() {
    let ctx = TestContext::new().with_default_config();
    ctx.source("Crypto_Generate_KeyManagement", "A, B");
    ctx.source("Crypto_Generate_Primitives", "B, C");

    let output = ctx.command().output().unwrap();
    output.assert_success();
    output.assert_stdout_contains("Running oAW to RST generator\n----------------------------\n");
    output.assert_stdout_contains("Component: Crypto\n");
    output.assert_stdout_contains("Crypto_oAW_Generator_Tests.rst");
    output.assert_stdout_contains("| OAW TO RST WAS SUCCESSFUL |");

    let doc = ctx.read("spec/Crypto_oAW_Generator_Tests.rst");
    assert!(doc.contains("   :tests: A, B, C\n"));
    assert_eq!(
        ctx.read("spec/Crypto_component_test.rst"),
        format!("{TOC}   Crypto_oAW_Generator_Tests.rst\n")
    );
}

#[test]
fn flags_override_missing_config_file() {
    let ctx = TestContext::new();
    ctx.source("Crypto_Sign_Ed25519", "S1");

    ctx.command()
        .args(["--component", "Crypto"])
        .args(["--test-path", "tests"])
        .args(["--spec-path", "spec"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OAW TO RST WAS SUCCESSFUL"));
    assert!(ctx.path().join("spec/Crypto_oAW_Sign_Tests.rst").exists());
}

#[test]
fn header_error_fails_with_location() {
    let ctx = TestContext::new().with_default_config();
    ctx.source("Crypto_Generate_KeyManagement", "A");
    ctx.source("Crypto_Sign_Empty", ", ,");

    let output = ctx.command().output().unwrap();
    output.assert_exit_code(5);
    output.assert_stderr_contains(
        "Crypto_Sign_Empty.tsc:7: (ERROR) missing or invalid `Requirements` section",
    );
    output.assert_stdout_contains("| OAW TO RST FAILED |");
    let generated = ctx.path().join("spec/Crypto_oAW_Generator_Tests.rst");
    assert!(!generated.exists());
    assert_eq!(ctx.read("spec/Crypto_component_test.rst"), TOC);
}

#[test]
fn placeholder_headers_finish_with_warnings() {
    let ctx = TestContext::new().with_config(
        "component: Crypto\ntest_path: tests\nspec_path: spec\nallow_placeholder_headers: true\n",
    );
    ctx.write(
        "tests/Crypto_Generate_Todo.tsc",
        "// Description\n// Input\n// Output\n// Requirements\n",
    );

    let output = ctx.command().output().unwrap();
    output.assert_success();
    output.assert_stderr_contains(
        "Crypto_Generate_Todo.tsc:4: (WARNING) Missing Requirements content",
    );
    output.assert_stdout_contains("| OAW TO RST FINISHED WITH WARNINGS |");
}

#[test]
fn all_invalid_sources_are_skipped() {
    let ctx = TestContext::new().with_default_config();
    ctx.write("tests/Crypto_Generate_A.tsc", "run();\n");

    let output = ctx.command().output().unwrap();
    output.assert_success();
    output.assert_stderr_contains("Crypto_Generate_A.tsc:1: (ERROR)");
    output.assert_stdout_contains("| OAW TO RST SKIPPED |");
    assert_eq!(ctx.read("spec/Crypto_component_test.rst"), TOC);
}

#[test]
fn no_sources_is_a_quiet_success() {
    let ctx = TestContext::new().with_default_config();

    let output = ctx.command().output().unwrap();
    output.assert_success();
    output.assert_stdout_contains("No oAW tests found for Crypto.");
    assert_eq!(ctx.read("spec/Crypto_component_test.rst"), TOC);
}

#[test]
fn explicit_missing_config_is_a_config_error() {
    let ctx = TestContext::new();

    let output = ctx.command()
        .args(["--config", "absent.yaml"])
        .output()
        .unwrap();
    output.assert_exit_code(2);
    output.assert_stderr_contains("absent.yaml:1: (ERROR) config file not found");
}

#[test]
fn missing_spec_directory_is_a_config_error() {
    let ctx = TestContext::new()
        .with_config("component: Crypto\ntest_path: tests\nspec_path: nowhere\n");

    let output = ctx.command().output().unwrap();
    output.assert_exit_code(2);
    output.assert_stderr_contains("(ERROR) `spec_path` directory does not exist");
}

#[test]
fn quiet_keeps_banner_only() {
    let ctx = TestContext::new().with_default_config();
    ctx.source("Crypto_Generate_KeyManagement", "A");

    let output = ctx.command().arg("-q").output().unwrap();
    output.assert_success();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Running oAW to RST generator"));
    assert!(stdout.contains("| OAW TO RST WAS SUCCESSFUL |"));
}

#[test]
fn color_always_wraps_banner() {
    let ctx = TestContext::new().with_default_config();
    ctx.source("Crypto_Generate_KeyManagement", "A");

    ctx.command()
        .args(["--color", "always"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b[32m/---"));
}
