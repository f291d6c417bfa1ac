use anyhow::Result;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const HEADER: &str = "externalSampleID,sequencer,run,flowcell,sequencingStartDate,project,capturingKit";

const RUN_INFO: &str = r#"<?xml version="1.0"?>
<RunInfo Version="2">
  <Run Id="RUN7" Number="7">
    <Flowcell>HYYYYBGXC</Flowcell>
    <Instrument>NB501043</Instrument>
    <Date>230301</Date>
  </Run>
</RunInfo>"#;

/// Runs a binary from a scratch working directory so config and logs stay inside it.
fn run_bin(bin: &str, cwd: &Path, args: &[&Path]) -> Result<Output> {
    let output = Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "off")
        .env_remove("SEQ_INGEST_CONFIG")
        .env_remove("SEQ_INGEST_METRICS_ADDR")
        .env_remove("SEQ_INGEST_PUSHGATEWAY_URL")
        .output()?;
    Ok(output)
}

fn index_samples(cwd: &Path, input: &Path, output: &Path, fail: &Path) -> Result<Output> {
    run_bin(
        env!("CARGO_BIN_EXE_index-samples"),
        cwd,
        &[
            Path::new("-i"),
            input,
            Path::new("-o"),
            output,
            Path::new("-f"),
            fail,
        ],
    )
}

fn ingest_run(cwd: &Path, runxml: &Path, interop: &Path, db: &Path, exe: &Path) -> Result<Output> {
    run_bin(
        env!("CARGO_BIN_EXE_ingest-run"),
        cwd,
        &[
            Path::new("-r"),
            runxml,
            Path::new("-i"),
            interop,
            Path::new("-d"),
            db,
            Path::new("-e"),
            exe,
        ],
    )
}

#[test]
fn test_index_samples_exits_zero_on_quarantine() -> Result<()> {
    let temp_dir = tempdir()?;
    let sheet = temp_dir.path().join("sheet.csv");
    let contents = format!("{HEADER}\nS1,illumina,R1,FC1,31-12-2022,P1,KitA\n");
    fs::write(&sheet, &contents)?;
    let fail = temp_dir.path().join("failed");

    let output = index_samples(temp_dir.path(), &sheet, &temp_dir.path().join("index.csv"), &fail)?;

    assert!(output.status.success(), "{output:?}");
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Quarantined"));
    assert_eq!(fs::read_to_string(fail.join("sheet.csv"))?, contents);
    Ok(())
}

#[test]
fn test_index_samples_exits_zero_when_indexed() -> Result<()> {
    let temp_dir = tempdir()?;
    let sheet = temp_dir.path().join("sheet.csv");
    fs::write(&sheet, format!("{HEADER}\nS1,illumina,R1,FC1,221231,P1,KitA\n"))?;
    let index = temp_dir.path().join("index.csv");

    let output = index_samples(temp_dir.path(), &sheet, &index, &temp_dir.path().join("failed"))?;

    assert!(output.status.success(), "{output:?}");
    assert_eq!(fs::read_to_string(&index)?.lines().count(), 2);
    Ok(())
}

#[test]
fn test_index_samples_exits_non_zero_on_missing_sheet() -> Result<()> {
    let temp_dir = tempdir()?;
    let fail = temp_dir.path().join("failed");

    let output = index_samples(
        temp_dir.path(),
        &temp_dir.path().join("absent.csv"),
        &temp_dir.path().join("index.csv"),
        &fail,
    )?;

    assert_eq!(output.status.code(), Some(1));
    assert!(!fail.exists());
    Ok(())
}

#[test]
fn test_ingest_run_exits_non_zero_when_tool_is_missing() -> Result<()> {
    let temp_dir = tempdir()?;
    let runxml = temp_dir.path().join("RunInfo.xml");
    fs::write(&runxml, RUN_INFO)?;

    let output = ingest_run(
        temp_dir.path(),
        &runxml,
        temp_dir.path(),
        &temp_dir.path().join("runs.db"),
        &temp_dir.path().join("no-such-summary-tool"),
    )?;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Run ingestion failed"));
    Ok(())
}

#[test]
fn test_ingest_run_exits_non_zero_on_malformed_run_document() -> Result<()> {
    let temp_dir = tempdir()?;
    let runxml = temp_dir.path().join("RunInfo.xml");
    fs::write(&runxml, "<RunInfo><Run Id=")?;

    let output = ingest_run(
        temp_dir.path(),
        &runxml,
        temp_dir.path(),
        &temp_dir.path().join("runs.db"),
        Path::new("sh"),
    )?;

    assert!(!output.status.success());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_ingest_run_exits_zero_when_summary_is_stored() -> Result<()> {
    let temp_dir = tempdir()?;
    let runxml = temp_dir.path().join("RunInfo.xml");
    fs::write(&runxml, RUN_INFO)?;
    // `sh` runs the script handed over as the metrics directory
    let script = temp_dir.path().join("summary.sh");
    fs::write(
        &script,
        "cat <<'EOF'\n# Version: v1.1.4\nLevel,Yield,Q30 Yield,Mean QScore,Group,Reads,Error Rate\n\
         Total,88.0,80.5,34.1,Nonindexed,1200,0.3\nNon-indexed,88.0,80.5,34.1,Nonindexed,1200,0.3\nEOF\n",
    )?;

    let output = ingest_run(
        temp_dir.path(),
        &runxml,
        &script,
        &temp_dir.path().join("runs.db"),
        Path::new("sh"),
    )?;

    assert!(output.status.success(), "{output:?}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Stored run RUN7"));
    Ok(())
}
