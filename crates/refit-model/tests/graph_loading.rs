use refit_model::{DESCRIPTOR_FILE, ModelError, ProjectKey, load_project_graph, write_changed};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_descriptor(dir: &Path, contents: &str) -> PathBuf {
    fs::create_dir_all(dir).expect("module directory should create");
    let path = dir.join(DESCRIPTOR_FILE);
    fs::write(&path, contents).expect("descriptor should write");
    path
}

fn parent_descriptor(modules: &[&str]) -> String {
    let rendered: Vec<String> = modules.iter().map(|m| format!("\"{m}\"")).collect();
    format!(
        r#"
        [package]
        group = "org.acme"
        artifact = "acme-parent"
        version = "1.2.3"
        packaging = "pom"
        modules = [{}]
        "#,
        rendered.join(", ")
    )
}

fn module_descriptor(artifact: &str) -> String {
    format!(
        r#"
        [package]
        group = "org.acme"
        artifact = "{artifact}"
        version = "1.2.3"

        [[dependencies]]
        group = "junit"
        artifact = "junit"
        version = "4.12"
        "#
    )
}

#[test]
fn load_multi_module_graph_expected_depth_first_order() {
    let temp = TempDir::new().expect("tempdir should create");
    let root = write_descriptor(temp.path(), &parent_descriptor(&["core", "web"]));
    write_descriptor(
        &temp.path().join("core"),
        r#"
        [package]
        group = "org.acme"
        artifact = "acme-core"
        version = "1.2.3"
        packaging = "pom"
        modules = ["api"]
        "#,
    );
    write_descriptor(&temp.path().join("core/api"), &module_descriptor("acme-api"));
    write_descriptor(&temp.path().join("web"), &module_descriptor("acme-web"));

    let projects = load_project_graph(&root).expect("graph should load");

    let artifacts: Vec<&str> = projects
        .iter()
        .map(|p| p.descriptor.package.artifact.as_str())
        .collect();
    assert_eq!(artifacts, vec!["acme-parent", "acme-core", "acme-api", "acme-web"]);
}

#[test]
fn load_duplicate_project_key_expected_error() {
    let temp = TempDir::new().expect("tempdir should create");
    let root = write_descriptor(temp.path(), &parent_descriptor(&["a", "b"]));
    write_descriptor(&temp.path().join("a"), &module_descriptor("acme-dup"));
    write_descriptor(&temp.path().join("b"), &module_descriptor("acme-dup"));

    let error = load_project_graph(&root).expect_err("duplicate key should be rejected");
    assert!(matches!(
        error,
        ModelError::DuplicateProject { key, .. }
            if key == ProjectKey::new("org.acme", "acme-dup", "1.2.3")
    ));
}

#[test]
fn load_module_cycle_expected_error() {
    let temp = TempDir::new().expect("tempdir should create");
    let root = write_descriptor(temp.path(), &parent_descriptor(&["child"]));
    write_descriptor(
        &temp.path().join("child"),
        r#"
        [package]
        group = "org.acme"
        artifact = "acme-child"
        version = "1.2.3"
        modules = [".."]
        "#,
    );

    let error = load_project_graph(&root).expect_err("cycle should be rejected");
    assert!(matches!(error, ModelError::ModuleCycle { .. }));
}

#[test]
fn load_missing_module_descriptor_expected_read_error() {
    let temp = TempDir::new().expect("tempdir should create");
    let root = write_descriptor(temp.path(), &parent_descriptor(&["ghost"]));

    let error = load_project_graph(&root).expect_err("missing module should be rejected");
    assert!(matches!(error, ModelError::Read { path, .. } if path.ends_with("ghost/project.toml")));
}

#[test]
fn write_changed_rewrites_only_changed_projects() {
    let temp = TempDir::new().expect("tempdir should create");
    let root = write_descriptor(temp.path(), &parent_descriptor(&["core", "web"]));
    write_descriptor(&temp.path().join("core"), &module_descriptor("acme-core"));
    let web_path = write_descriptor(&temp.path().join("web"), &module_descriptor("acme-web"));
    let web_before = fs::read_to_string(&web_path).expect("descriptor should read");

    let mut projects = load_project_graph(&root).expect("graph should load");
    let core = projects
        .iter_mut()
        .find(|p| p.descriptor.package.artifact == "acme-core")
        .expect("core project should exist");
    core.descriptor.dependencies[0].version = Some("4.13.2".to_string());
    let core_key = core.key();

    let changed = BTreeSet::from([core_key]);
    let written = write_changed(&projects, &changed).expect("write should succeed");
    assert_eq!(written, 1);

    let web_after = fs::read_to_string(&web_path).expect("descriptor should read");
    assert_eq!(web_before, web_after);

    let reloaded = load_project_graph(&root).expect("graph should reload");
    assert_eq!(reloaded, projects);
}
