use std::path::PathBuf;
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../core/tests/fixtures")
        .join(name)
}

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/strand-cli-smoke");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn compile_prints_success_json() {
    let output = Command::new(env!("CARGO_BIN_EXE_strand"))
        .arg("compile")
        .arg(fixture("multivec_peaks.json"))
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["state"], "success");
    assert_eq!(result["compiled"]["tracks"].as_array().unwrap().len(), 1);
}

#[test]
fn compile_fails_on_malformed_spec() {
    let spec = scratch("malformed.json");
    std::fs::write(&spec, r#"{"views": [], "tracks": []}"#).unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_strand"))
        .arg("compile")
        .arg(&spec)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["state"], "error");
}

#[test]
fn render_writes_svg() {
    let tiles = scratch("tiles.json");
    let tile = std::fs::read_to_string(fixture("multivec_tile.json")).unwrap();
    std::fs::write(&tiles, format!(r#"{{"peaks": [{tile}]}}"#)).unwrap();
    let out = scratch("peaks.svg");
    let _ = std::fs::remove_file(&out);

    let status = Command::new(env!("CARGO_BIN_EXE_strand"))
        .arg("render")
        .arg(fixture("multivec_peaks.json"))
        .arg("--tiles")
        .arg(&tiles)
        .arg("--out")
        .arg(&out)
        .args(["--theme", "dark"])
        .status()
        .unwrap();
    assert!(status.success());

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"<g id="peaks">"#));
    // Page background, clip box, dark track background and eight bars.
    assert_eq!(svg.matches("<rect").count(), 1 + 1 + 1 + 8);
}
