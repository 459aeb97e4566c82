use std::process::Command;

const SOURCE: &str = r#"
use retrofit_core::ApiError;

pub trait Health {
    #[head("/health")]
    fn health(&self) -> Result<(), ApiError>;
}
"#;

fn retrofit_gen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_retrofit-gen"))
}

#[test]
fn writes_client_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("health.rs");
    let output = dir.path().join("health_client.rs");
    let config = dir.path().join("retrofit.toml");
    std::fs::write(&input, SOURCE).unwrap();
    std::fs::write(&config, "client_suffix = \"Http\"\ncopy_uses = false\n").unwrap();

    let status = retrofit_gen()
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--config")
        .arg(&config)
        .status()
        .unwrap();
    assert!(status.success());

    let generated = std::fs::read_to_string(&output).unwrap();
    assert!(generated.starts_with("// @generated"));
    assert!(generated.contains("pub struct HealthHttp<T>"));
    assert!(!generated.contains("use retrofit_core::ApiError;"));
}

#[test]
fn emits_the_model_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("health.rs");
    std::fs::write(&input, SOURCE).unwrap();

    let output = retrofit_gen()
        .arg(&input)
        .args(["--emit", "model"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let model: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(model["methods"][0]["name"], "health");
    assert_eq!(model["methods"][0]["verb"], "head");
}

#[test]
fn reports_validation_errors() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.rs");
    std::fs::write(
        &input,
        "trait Broken {\n    #[get(\"/items/{id}\")]\n    fn item(&self) -> Result<(), E>;\n}\n",
    )
    .unwrap();

    let output = retrofit_gen().arg(&input).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parameter `id` not found"), "stderr: {stderr}");
}
