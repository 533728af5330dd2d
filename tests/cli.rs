use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("docx_catalog_cli_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_docx_catalog"))
        .args(args)
        .env_remove("MAX_CHUNK_SIZE")
        .output()
        .expect("run CLI")
}

#[test]
fn cli_writes_catalog() {
    let out_dir = scratch_dir("catalog");
    let output = out_dir.join("public").join("projects.json");

    let result = run(&[
        "--input",
        "tests/fixtures/projects.html",
        "--images",
        "tests/fixtures/images.json",
        "--output",
        output.to_str().unwrap(),
        "--source-name",
        "data/Data Projects Demo.docx",
        "--image-policy",
        "per-chunk",
        "--date",
        "2024-06-01",
    ]);
    assert!(
        result.status.success(),
        "cli exited with {}: {}",
        result.status,
        String::from_utf8_lossy(&result.stderr)
    );

    let catalog: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let metadata = &catalog["metadata"];
    assert_eq!(metadata["source_file"], "data/Data Projects Demo.docx");
    assert_eq!(metadata["total_projects"], 2);
    assert_eq!(metadata["version"], "1.0.0");
    assert_eq!(metadata["categories"], serde_json::json!(["Machine Learning", "Data & AI"]));

    let projects = catalog["projects"].as_array().unwrap();
    let churn = &projects[0];
    assert_eq!(churn["id"], "customer-churn-prediction-1");
    assert_eq!(churn["client"], "Northwind Telecom");
    assert_eq!(
        churn["summary"],
        "Predicted churn risk for & retained high-value subscribers."
    );
    assert_eq!(
        churn["problem"],
        serde_json::json!(["Churn was only noticed after cancellation", "No single view of the customer"])
    );
    assert_eq!(
        churn["outcomes"],
        serde_json::json!(["Churn reduced by 12% in two quarters", "Retention campaigns targeted weekly"])
    );
    assert_eq!(churn["techStack"], serde_json::json!(["Azure", "Databricks", "Python"]));
    assert_eq!(churn["tags"], serde_json::json!(["churn", "retention", "ML"]));
    assert_eq!(churn["images"], serde_json::json!([{ "src": "/projects/churn.png", "alt": "Churn dashboard" }]));
    assert_eq!(churn["date"], "2024-06-01");

    let finance = &projects[1];
    assert_eq!(finance["id"], "finance-reporting-automation-2");
    assert_eq!(finance["client"], "Contoso Finance");
    assert_eq!(finance["outcomes"], serde_json::json!(["Month-end close shortened by three days"]));
    assert_eq!(finance["images"], serde_json::json!([]));
    assert_eq!(finance["tags"], serde_json::json!(["Data Analytics", "AI", "Business Intelligence"]));
}

#[test]
fn cli_fails_without_input_and_leaves_output_alone() {
    let out_dir = scratch_dir("missing");
    let output = out_dir.join("projects.json");
    std::fs::write(&output, "previous catalog").unwrap();

    let result = run(&[
        "--input",
        out_dir.join("does-not-exist.html").to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]);

    assert!(!result.status.success());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous catalog");
}
