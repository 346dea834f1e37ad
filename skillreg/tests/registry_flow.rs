use std::{fs, path::Path};

use clap::Parser;
use skillreg::{
    cli::{Cli, run},
    error::CliError,
};
use tempfile::TempDir;

fn skills(home: &Path, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["skills", "--home", home.to_str().unwrap()];
    argv.extend_from_slice(args);
    run(Cli::try_parse_from(argv).unwrap())
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}

#[test]
fn create_install_sync_desync() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("home");
    let project = temp.path().join("app");
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&project).unwrap();
    let project_arg = project.to_str().unwrap();

    skills(&home, &["init"]).unwrap();
    assert!(home.join("skills/skill.build").is_file());
    assert!(home.join("skills/skill.improve").is_file());

    skills(&home, &["create", "Echo Web"]).unwrap();
    skills(&home, &["verify", "echo-web", "--strict", "--output", "json"]).unwrap();

    skills(
        &home,
        &["install", "echo-web", "--agent", "claude,codex", "--project", project_arg],
    )
    .unwrap();
    assert!(project.join(".claude/skills/echo-web/SKILL.md").is_file());
    assert!(home.join(".codex/skills/echo-web/SKILL.md").is_file());
    assert!(!project.join(".kiro/skills/echo-web").exists());

    skills(&home, &["sync", "--project", project_arg]).unwrap();
    assert!(project.join(".kiro/skills/echo-web/SKILL.md").is_file());
    assert!(project.join(".agent/skills/echo-web/SKILL.md").is_file());

    let err = skills(&home, &["desync", "echo-web", "--project", project_arg]).unwrap_err();
    assert_eq!(exit_code(&err), 2);

    skills(
        &home,
        &["desync", "--all", "--force", "--agent", "claude", "--project", project_arg],
    )
    .unwrap();
    assert!(!project.join(".claude/skills/echo-web").exists());
    assert!(project.join(".gemini/skills/echo-web").exists());

    skills(&home, &["deregister", "echo-web", "--force"]).unwrap();
    assert!(!home.join("skills/skills/echo-web").exists());
}

#[test]
fn verify_gate_sets_exit_status() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("home");
    let skill = temp.path().join("lenis");
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&skill).unwrap();
    fs::write(
        skill.join("SKILL.md"),
        "---\nname: lenis\ndescription: Smooth scrolling setup and pitfalls for Lenis.\n---\n\n# Lenis\n",
    )
    .unwrap();
    let path = skill.to_str().unwrap();

    skills(&home, &["verify", path, "--output", "text"]).unwrap();
    let err = skills(&home, &["verify", path, "--strict", "--output", "text"]).unwrap_err();
    assert_eq!(exit_code(&err), 1);

    let err = skills(&home, &["register", path, "--gate", "strict"]).unwrap_err();
    assert_eq!(exit_code(&err), 1);
    skills(&home, &["register", path]).unwrap();
    assert!(home.join("skills/skills/lenis/SKILL.md").is_file());
}

#[test]
fn config_defaults_apply() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().join("home");
    let skill = temp.path().join("lenis");
    fs::create_dir_all(home.join("skills")).unwrap();
    fs::create_dir_all(&skill).unwrap();
    fs::write(
        skill.join("SKILL.md"),
        "---\nname: lenis\ndescription: Smooth scrolling setup and pitfalls for Lenis.\n---\n\n# Lenis\n",
    )
    .unwrap();
    fs::write(
        home.join("skills/config.toml"),
        "default_gate = \"strict\"\ndefault_output = \"text\"\n",
    )
    .unwrap();

    let err = skills(&home, &["verify", skill.to_str().unwrap()]).unwrap_err();
    assert_eq!(exit_code(&err), 1);

    fs::write(home.join("skills/config.toml"), "[targets]\ncursor = \"x\"\n").unwrap();
    let err = skills(&home, &["list"]).unwrap_err();
    assert!(err.to_string().contains("Unknown agent in [targets]: cursor"));
}

#[test]
fn unknown_agent_is_usage_error() {
    let temp = TempDir::new().unwrap();
    let err = skills(temp.path(), &["sync", "zod", "--agent", "cursor"]).unwrap_err();
    assert_eq!(exit_code(&err), 2);
}
