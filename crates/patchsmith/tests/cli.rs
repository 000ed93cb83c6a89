use assert_cmd::cargo;
use assert_cmd::Command;
use patchsmith_testkit::{parse_unified, sample_patches};
use patchsmith_types::Patch;
use tempfile::TempDir;

fn patchsmith_cmd() -> Command {
    Command::new(cargo::cargo_bin!("patchsmith"))
}

fn write_patch(dir: &std::path::Path, name: &str, json: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, json).expect("write patch");
    path
}

fn commit_json() -> String {
    serde_json::to_string_pretty(&sample_patches::two_file_commit()).expect("serialize patch")
}

#[test]
fn render_reads_stdin_and_writes_stdout() {
    let td = TempDir::new().expect("temp");

    let output = patchsmith_cmd()
        .current_dir(td.path())
        .args(["render", "--input", "-"])
        .write_stdin(commit_json())
        .output()
        .expect("run render");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.starts_with("Rename greeting\ndiff --git a/a.txt b/a.txt\n"));

    let files = parse_unified(&stdout).expect("parse rendered diff");
    assert_eq!(files.len(), 2);
    assert_eq!(files[1].path.as_deref(), Some("b.txt"));
    assert_eq!(files[1].hunks[0].new_count, 1);
}

#[test]
fn render_accepts_handwritten_json() {
    let td = TempDir::new().expect("temp");
    let input = write_patch(
        td.path(),
        "patch.json",
        r#"{
  "files": [
    {
      "change": {
        "kind": "modified",
        "from": { "path": "notes.txt", "mode": "100644", "hash": "aaaa" },
        "to": { "path": "notes.txt", "mode": "100644", "hash": "bbbb" }
      },
      "chunks": [
        { "op": "equal", "lines": [{ "text": "one" }, { "text": "two" }] },
        { "op": "delete", "lines": [{ "text": "three", "newline": false }] },
        { "op": "add", "lines": [{ "text": "3" }] }
      ]
    }
  ]
}"#,
    );

    let output = patchsmith_cmd()
        .current_dir(td.path())
        .arg("render")
        .arg("--input")
        .arg(&input)
        .args(["--context", "1"])
        .output()
        .expect("run render");
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "diff --git a/notes.txt b/notes.txt\n\
         index aaaa..bbbb 100644\n\
         --- a/notes.txt\n\
         +++ b/notes.txt\n\
         @@ -2,2 +2,2 @@ one\n \
         two\n\
         -three\n\
         \\ No newline at end of file\n\
         +3\n"
    );
}

#[test]
fn render_markup_escapes_text() {
    let td = TempDir::new().expect("temp");
    let patch = Patch {
        message: Some("<b>bold</b> & more".to_string()),
        files: vec![sample_patches::html_sensitive()],
    };
    let input = write_patch(
        td.path(),
        "patch.json",
        &serde_json::to_string(&patch).expect("serialize"),
    );
    let out = td.path().join("out/diff.html");

    let output = patchsmith_cmd()
        .current_dir(td.path())
        .arg("render")
        .arg("--input")
        .arg(&input)
        .args(["--format", "markup"])
        .arg("--out")
        .arg(&out)
        .output()
        .expect("run render");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let html = std::fs::read_to_string(&out).expect("read output");
    assert!(html.starts_with("&lt;b&gt;bold&lt;/b&gt; &amp; more\n"));
    assert!(html.contains("<span class=\"diff-add\">+&lt;p class=&#34;b&#34;&gt;"));
    assert!(!html.contains("<p"));
}

#[test]
fn render_uses_config_from_working_directory() {
    let td = TempDir::new().expect("temp");
    std::fs::write(
        td.path().join("patchsmith.toml"),
        "[defaults]\ncontext_lines = ${PATCHSMITH_CLI_CTX:-0}\n",
    )
    .expect("write config");
    let input = write_patch(td.path(), "patch.json", &commit_json());

    let output = patchsmith_cmd()
        .current_dir(td.path())
        .env("PATCHSMITH_CLI_CTX", "0")
        .arg("render")
        .arg("--input")
        .arg(&input)
        .output()
        .expect("run render");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("@@ -1 +1 @@\n-hi\n+hello\n"));
}

#[test]
fn render_fails_on_missing_input() {
    let td = TempDir::new().expect("temp");

    let output = patchsmith_cmd()
        .current_dir(td.path())
        .args(["render", "--input", "does-not-exist.json"])
        .output()
        .expect("run render");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does-not-exist.json"));
}

#[test]
fn render_fails_on_invalid_mode() {
    let td = TempDir::new().expect("temp");
    let input = write_patch(
        td.path(),
        "patch.json",
        r#"{"files":[{"change":{"kind":"added","to":{"path":"x","mode":"9z9","hash":"ab"}}}]}"#,
    );

    let output = patchsmith_cmd()
        .current_dir(td.path())
        .arg("render")
        .arg("--input")
        .arg(&input)
        .output()
        .expect("run render");
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn schema_prints_json_for_both_kinds() {
    let output = patchsmith_cmd()
        .arg("schema")
        .output()
        .expect("run schema");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["title"], "Patch");

    let output = patchsmith_cmd()
        .args(["schema", "--kind", "config"])
        .output()
        .expect("run schema");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["title"], "ConfigFile");
}

#[test]
fn config_prints_effective_defaults() {
    let td = TempDir::new().expect("temp");

    let output = patchsmith_cmd()
        .current_dir(td.path())
        .arg("config")
        .output()
        .expect("run config");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("context_lines = 3"));
    assert!(stdout.contains("format = \"plain\""));

    std::fs::write(td.path().join("base.toml"), "[defaults]\nformat = \"markup\"\n")
        .expect("write base");
    let config = td.path().join("custom.toml");
    std::fs::write(&config, "includes = [\"base.toml\"]\n").expect("write config");

    let output = patchsmith_cmd()
        .current_dir(td.path())
        .arg("config")
        .arg("--config")
        .arg(&config)
        .output()
        .expect("run config");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("format = \"markup\""));
}
