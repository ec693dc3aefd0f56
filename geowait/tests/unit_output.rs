use anyhow::Context;
use geowait::output::{error_value, render, OutputFormat};
use serde_json::json;

#[test]
fn raw_arrays_render_one_value_per_line() {
    let out = render(&OutputFormat::Raw, &json!([3, 0, -1])).unwrap();
    assert_eq!(out, "3\n0\n-1");
    let out = render(&OutputFormat::Raw, &json!(["10,0.5", "20,0.45"])).unwrap();
    assert_eq!(out, "10,0.5\n20,0.45");
}

#[test]
fn yaml_and_json_render_maps() {
    let data = json!({"t_chr": 15, "waits": [2]});
    let yaml = render(&OutputFormat::Yaml, &data).unwrap();
    assert!(yaml.contains("t_chr: 15"));
    let parsed: serde_json::Value =
        serde_json::from_str(&render(&OutputFormat::Json, &data).unwrap()).unwrap();
    assert_eq!(parsed, data);
}

#[test]
fn error_value_keeps_cause_chain() {
    let err = Err::<(), _>(geowait::DataError::TooFewSamples(1))
        .context("build scale table from scales.csv")
        .unwrap_err();
    let v = error_value(&err);
    assert_eq!(v["error"], "build scale table from scales.csv");
    assert_eq!(v["causes"][0], "need at least 2 samples to interpolate, found 1");

    let plain = error_value(&anyhow::anyhow!("no scale table configured"));
    assert!(plain.get("causes").is_none());
}
