//! Compiler configuration files.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn config_file_changes_intermediate_dir_and_priorities() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compiler.toml");
    std::fs::write(&path, "priority_step = 5\nintermediate_dir = \"partials\"\n").unwrap();

    let farm = farm_with(CompilerConfig::load(&path).unwrap());
    let job = farm.progressive("1", 1, 20, 2);

    let render = farm.task(&job, "render-smpl11-20-frm1");
    assert_eq!(
        param(&render, 0, "render_output"),
        "/render/shot-010/partials/render-smpl11-20-frm-######"
    );
    assert_eq!(render.priority, 45);
    assert_eq!(farm.task(&job, "merge-to-smpl20-frm1").priority, 44);
    assert_eq!(farm.task(&job, "render-smpl1-10-frm1").priority, 50);
}

#[test]
fn invalid_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compiler.toml");
    std::fs::write(&path, "intermediate_dir = \"../escape\"\n").unwrap();

    assert!(CompilerConfig::load(&path).is_err());
}
