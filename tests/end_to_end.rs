/// End-to-end tests for am-budget
///
/// Library tests resolve fixture job files through the config layer; binary
/// tests run the built executable against the same fixtures.
use am_budget::cli::CliArgs;
use am_budget::report::{SpreadsheetReport, format_terminal_report};
use am_budget::{BudgetError, PricingKey, config, cost};
use clap::Parser;
use fs2::FileExt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// Helper to get the test fixtures directory
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-fixtures")
}

fn fixture(name: &str) -> String {
    fixtures_dir().join(name).to_string_lossy().into_owned()
}

fn job_args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["am-budget", "--no-user-pricing"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).expect("Should parse args")
}

// Helper to run the binary with the per-user pricing file disabled
fn run_budget(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_am-budget"))
        .arg("--no-user-pricing")
        .arg("--no-color")
        .args(["--console-width", "120"])
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run am-budget {}: {}", args.join(" "), e))
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_fixtures_exist() {
    let fixtures = fixtures_dir();
    assert!(fixtures.join("single-part.toml").exists());
    assert!(fixtures.join("two-parts-discount.toml").exists());
    assert!(fixtures.join("pricing-premium.toml").exists());
    assert!(fixtures.join("bad-pricing.toml").exists());
}

#[test]
fn test_single_part_job_file() {
    let job = config::build_job(&job_args(&["--job", &fixture("single-part.toml")])).unwrap();
    let breakdown = cost::compute(&job.parts, &job.duration_text, &job.pricing);

    assert_eq!(breakdown.detail.machine_hours, 51.0);
    assert_eq!(breakdown.detail.material_cost, 14.57);
    assert_eq!(breakdown.detail.machine_cost, 12750.0);
    assert_eq!(breakdown.detail.argon_cost, 15300.0);
    assert_eq!(breakdown.detail.total_cost, 29564.57);
    assert_eq!(breakdown.detail.actual_cost, 29564.57);
}

#[test]
fn test_two_parts_with_label_keyed_discount() {
    let job = config::build_job(&job_args(&["--job", &fixture("two-parts-discount.toml")])).unwrap();
    assert_eq!(job.pricing.discount, 0.85);

    let breakdown = cost::compute(&job.parts, &job.duration_text, &job.pricing);
    assert_eq!(breakdown.part_count(), 2);
    assert_eq!(breakdown.detail.material_cost, 46.4);
    assert_eq!(breakdown.detail.total_cost, 16127.51);
    assert_eq!(breakdown.detail.actual_cost, 13708.38);

    let text = format_terminal_report(&breakdown, 60);
    assert!(text.contains("housing"));
    assert!(text.contains("13,708.38"));
}

#[test]
fn test_pricing_file_then_set_flag() {
    let job = config::build_job(&job_args(&[
        "--job",
        &fixture("single-part.toml"),
        "--pricing",
        &fixture("pricing-premium.toml"),
        "--set",
        "discount=0.5",
    ]))
    .unwrap();

    assert_eq!(job.pricing.machine_rate, 300.0);
    assert_eq!(job.pricing.post_processing_fee, 2000.0);
    assert_eq!(job.pricing.discount, 0.5);

    let breakdown = cost::compute(&job.parts, &job.duration_text, &job.pricing);
    assert_eq!(breakdown.detail.machine_cost, 15300.0);
    assert_eq!(breakdown.detail.total_cost, 32614.57);
    assert_eq!(breakdown.detail.actual_cost, 16307.29);
}

#[test]
fn test_bad_pricing_value_reports_key() {
    let err = config::build_job(&job_args(&["--job", &fixture("bad-pricing.toml")])).unwrap_err();
    match err {
        BudgetError::InvalidParameter { key, value } => {
            assert_eq!(key, PricingKey::Density);
            assert!(value.contains("heavy"));
        }
        other => panic!("Expected InvalidParameter, got {:?}", other),
    }
}

#[test]
fn test_spreadsheet_from_fixture() {
    let job = config::build_job(&job_args(&["--job", &fixture("two-parts-discount.toml")])).unwrap();
    let breakdown = cost::compute(&job.parts, &job.duration_text, &job.pricing);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.xlsx");
    SpreadsheetReport::now().render(&breakdown, &path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_binary_prints_report() {
    let output = run_budget(&["--job", &fixture("single-part.toml")]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("预算计算结果"));
    assert!(stdout.contains("bracket"));
    assert!(stdout.contains("29,564.57"));
}

#[test]
fn test_binary_part_flags() {
    let output = run_budget(&["-p", "bracket:1000:200", "-d", "2天3小时"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("29,564.57"));
}

#[test]
fn test_binary_writes_all_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let xlsx = dir.path().join("budget.xlsx");
    let json = dir.path().join("budget.json");
    let text = dir.path().join("budget.txt");

    let output = run_budget(&[
        "--job",
        &fixture("two-parts-discount.toml"),
        "--quiet",
        "--xlsx",
        xlsx.to_str().unwrap(),
        "--json",
        json.to_str().unwrap(),
        "--text",
        text.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(!stdout_of(&output).contains("预算计算结果"));

    assert_eq!(&fs::read(&xlsx).unwrap()[..2], b"PK");

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(value["detail"]["actual_cost"], 13708.38);
    assert_eq!(value["input"]["part_count"], 2);

    let report = fs::read_to_string(&text).unwrap();
    assert!(report.contains("13,708.38"));
    assert!(report.ends_with('\n'));
}

#[test]
fn test_binary_busy_spreadsheet_fails_without_touching_file() {
    let dir = tempfile::tempdir().unwrap();
    let xlsx = dir.path().join("budget.xlsx");
    fs::write(&xlsx, b"held by a spreadsheet program").unwrap();

    let holder = File::open(&xlsx).unwrap();
    holder.lock_exclusive().unwrap();

    let output = run_budget(&[
        "--job",
        &fixture("single-part.toml"),
        "--xlsx",
        xlsx.to_str().unwrap(),
        "--retries",
        "2",
        "--retry-delay-ms",
        "10",
    ]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("another program"), "stderr: {}", stderr_of(&output));
    assert_eq!(fs::read(&xlsx).unwrap(), b"held by a spreadsheet program");

    holder.unlock().unwrap();
}

#[test]
fn test_binary_rejects_missing_parts() {
    let output = run_budget(&["-d", "3小时"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("--part"));
}

#[test]
fn test_binary_rejects_unknown_parameter() {
    let output = run_budget(&["-p", "a:1", "-d", "1小时", "--set", "colour=red"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("colour"));
}
