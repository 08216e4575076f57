//! End-to-end project creation from a templates directory

use creator_core::templates::{self, create_project};
use creator_core::{ConfigBuilder, ConfigValue, Configuration, CreatorError, TemplateRegistry};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn manifest(root: &Path, id: &str, inherits: &[&str]) {
    let body = json!({
        "name": id,
        "description": format!("{} template", id),
        "inherits": inherits,
        "prompts": [],
    });
    write(root, &format!("{}/template.json", id), &body.to_string());
}

fn name_config(name: &str) -> Configuration {
    ConfigBuilder::new().project_name(name).build()
}

#[tokio::test]
async fn inherited_file_is_substituted() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    manifest(templates.path(), "base", &[]);
    write(templates.path(), "base/file.txt", "Hello {{name}}");
    manifest(templates.path(), "child", &["base"]);

    let registry = TemplateRegistry::discover(templates.path()).unwrap();
    let dest = out.path().join("project");
    create_project(&registry, "child", &dest, &name_config("World"))
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(dest.join("file.txt")).unwrap(),
        "Hello World"
    );
    assert!(!dest.join("template.json").exists());
}

#[tokio::test]
async fn merge_marker_combines_parent_config() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    manifest(templates.path(), "base", &[]);
    write(
        templates.path(),
        "base/package.json",
        r#"{"name": "{{name}}", "scripts": {"dev": "vite"}, "keywords": ["base"]}"#,
    );
    manifest(templates.path(), "lib", &["base"]);
    write(
        templates.path(),
        "lib/+package.json",
        r#"{"scripts": {"build": "tsup"}, "keywords": ["lib"], "main": "dist/index.js"}"#,
    );

    let registry = TemplateRegistry::discover(templates.path()).unwrap();
    let dest = out.path().join("my-lib");
    let report = create_project(&registry, "lib", &dest, &name_config("my-lib"))
        .await
        .unwrap();

    let merged: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dest.join("package.json")).unwrap()).unwrap();
    assert_eq!(
        merged,
        json!({
            "name": "my-lib",
            "scripts": {"dev": "vite", "build": "tsup"},
            "keywords": ["base", "lib"],
            "main": "dist/index.js"
        })
    );
    assert!(report.issues.is_empty());
}

#[tokio::test]
async fn deletion_marker_removes_parent_file() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    manifest(templates.path(), "base", &[]);
    write(templates.path(), "base/old.txt", "old");
    write(templates.path(), "base/keep.txt", "keep");
    manifest(templates.path(), "child", &["base"]);
    write(templates.path(), "child/-old.txt", "");
    write(templates.path(), "child/-missing.txt", "");

    let registry = TemplateRegistry::discover(templates.path()).unwrap();
    let dest = out.path().join("app");
    create_project(&registry, "child", &dest, &name_config("app"))
        .await
        .unwrap();

    assert!(!dest.join("old.txt").exists());
    assert!(dest.join("keep.txt").exists());
}

#[tokio::test]
async fn three_layers_apply_in_order() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    manifest(templates.path(), "c", &[]);
    write(templates.path(), "c/layer.txt", "c");
    write(templates.path(), "c/from-c.txt", "c");
    manifest(templates.path(), "b", &["c"]);
    write(templates.path(), "b/layer.txt", "b");
    manifest(templates.path(), "a", &["b"]);
    write(templates.path(), "a/-from-c.txt", "");

    let registry = TemplateRegistry::discover(templates.path()).unwrap();
    assert_eq!(templates::resolve(&registry, "a").unwrap(), vec!["c", "b"]);

    let dest = out.path().join("app");
    create_project(&registry, "a", &dest, &name_config("app"))
        .await
        .unwrap();
    assert_eq!(fs::read_to_string(dest.join("layer.txt")).unwrap(), "b");
    assert!(!dest.join("from-c.txt").exists());
}

#[tokio::test]
async fn existing_destination_is_rejected_without_writes() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    manifest(templates.path(), "base", &[]);
    write(templates.path(), "base/file.txt", "x");

    let dest = out.path().join("taken");
    fs::create_dir(&dest).unwrap();
    fs::write(dest.join("mine.txt"), "untouched").unwrap();

    let registry = TemplateRegistry::discover(templates.path()).unwrap();
    let result = create_project(&registry, "base", &dest, &name_config("taken")).await;

    assert!(matches!(result, Err(CreatorError::DestinationExists(_))));
    assert!(!dest.join("file.txt").exists());
    assert_eq!(fs::read_to_string(dest.join("mine.txt")).unwrap(), "untouched");
}

#[tokio::test]
async fn cycle_fails_before_creating_destination() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    manifest(templates.path(), "a", &["b"]);
    manifest(templates.path(), "b", &["a"]);

    let registry = TemplateRegistry::discover(templates.path()).unwrap();
    let dest = out.path().join("never");
    let result = create_project(&registry, "a", &dest, &name_config("never")).await;

    assert!(matches!(result, Err(CreatorError::CircularInheritance(_))));
    assert!(!dest.exists());
}

#[tokio::test]
async fn broken_manifest_only_affects_its_template() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    manifest(templates.path(), "good", &[]);
    write(templates.path(), "good/ok.txt", "ok");
    write(templates.path(), "bad/template.json", "{ not valid");

    let registry = TemplateRegistry::discover(templates.path()).unwrap();

    let bad = create_project(&registry, "bad", &out.path().join("bad"), &name_config("bad")).await;
    assert!(matches!(bad, Err(CreatorError::ManifestParse { .. })));
    assert!(!out.path().join("bad").exists());

    create_project(&registry, "good", &out.path().join("good"), &name_config("good"))
        .await
        .unwrap();
    assert!(out.path().join("good/ok.txt").exists());
}

#[tokio::test]
async fn prompt_defaults_and_cli_values_are_substituted() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let body = json!({
        "name": "Static",
        "description": "static site",
        "prompts": [
            {"name": "port", "type": "number", "message": "Port?", "initial": 8080},
            {"name": "domain", "type": "text", "message": "Domain?", "initial": "example.com"},
            {"name": "ssl", "type": "bool", "message": "SSL?", "initial": false}
        ]
    });
    write(templates.path(), "static/template.json", &body.to_string());
    write(
        templates.path(),
        "static/.env",
        "NAME={{name}}\nPORT={{port}}\nDOMAIN={{domain}}\nSSL={{ssl}}\nUNSET={{unset}}\n",
    );

    let registry = TemplateRegistry::discover(templates.path()).unwrap();
    let template = registry.get("static").unwrap();
    let cli: Configuration = [("domain", ConfigValue::parse_cli("site.dev"))]
        .into_iter()
        .collect();
    let config = ConfigBuilder::new()
        .project_name("site")
        .cli_values(cli)
        .defaults_from(&template.manifest)
        .build();

    let dest = out.path().join("site");
    create_project(&registry, "static", &dest, &config).await.unwrap();

    assert_eq!(
        fs::read_to_string(dest.join(".env")).unwrap(),
        "NAME=site\nPORT=8080\nDOMAIN=site.dev\nSSL=false\nUNSET={{unset}}\n"
    );
}
