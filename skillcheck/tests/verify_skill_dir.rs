use std::{fs, path::Path};

use skillcheck::{CheckError, Verifier, ensure_valid, verify_skill_dir};
use tempfile::TempDir;

const VALID_SKILL_MD: &str = r#"---
name: react-flow
description: >-
  Conventions for building node editors with React Flow; use when editing
  custom nodes, edges or viewport handling.
triggers:
  - react flow
  - "@xyflow/react"
references:
  - references/api/nodes.md
compatibility: "@xyflow/react 12.x, React 18+"
metadata:
  skill_version: "1.2.0"
  owner: frontend
activation:
  mode: fuzzy
  triggers:
    - "@xyflow/react"
  priority: normal
---

# React Flow

## Critical Rules

1. Memoise custom node components.
2. Keep node ids stable across renders.
"#;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn skill(name: &str, skill_md: &str) -> (TempDir, std::path::PathBuf) {
    let _ = env_logger::builder().is_test(true).try_init();
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(name);
    fs::create_dir_all(&dir).unwrap();
    write(&dir, "SKILL.md", skill_md);
    write(&dir, "references/api/nodes.md", "# Nodes\n\nCustom node recipes.\n");
    (temp, dir)
}

#[test]
fn valid_skill_passes_both_gates() {
    let (_temp, dir) = skill("react-flow", VALID_SKILL_MD);
    let report = verify_skill_dir(&dir);

    assert!(report.spec.is_empty(), "{report}");
    assert!(report.strict.is_empty(), "{report}");
    assert_eq!(report.spec_grade, 100);
    assert_eq!(report.strict_grade, 100);
    assert!(report.spec_passed);
    assert!(report.strict_passed);
    assert_eq!(report.frontmatter_name(), Some("react-flow"));
    assert!(report.body.as_deref().unwrap().contains("Critical Rules"));
}

#[test]
fn missing_directory() {
    let temp = TempDir::new().unwrap();
    let report = verify_skill_dir(temp.path().join("absent"));
    assert!(!report.spec_passed);
    assert!(report.spec.mentions("Skill path is not a directory"));
    assert!(report.strict.mentions("Skill path is not a directory"));
    assert_eq!(report.spec_grade, 75);
    assert_eq!(report.strict_grade, 85);
}

#[test]
fn missing_skill_md() {
    let temp = TempDir::new().unwrap();
    let report = verify_skill_dir(temp.path());
    assert!(report.spec.mentions("Missing required file: SKILL.md"));
    assert!(report.frontmatter.is_none());
}

#[test]
fn frontmatter_must_be_delimited_and_a_mapping() {
    let (_temp, dir) = skill("broken", "# No frontmatter\n");
    let report = verify_skill_dir(&dir);
    assert!(report.spec.mentions("must start with YAML frontmatter"));

    let (_temp, dir) = skill("broken", "---\n- just\n- a list\n---\nbody\n");
    let report = verify_skill_dir(&dir);
    assert!(report.spec.mentions("must be a YAML mapping/object"));

    let (_temp, dir) = skill("broken", "---\n---\nbody\n");
    let report = verify_skill_dir(&dir);
    assert!(report.spec.mentions("must be a YAML mapping/object"));

    let (_temp, dir) = skill("broken", "---\nname: [oops\n---\nbody\n");
    let report = verify_skill_dir(&dir);
    assert!(report.spec.mentions("Invalid YAML frontmatter in SKILL.md"));
    assert!(!report.spec_passed);
}

#[test]
fn non_utf8_skill_md() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("SKILL.md"), [0xc3, 0x28]).unwrap();
    let report = verify_skill_dir(temp.path());
    assert!(report.spec.mentions("must be UTF-8 decodable"));
}

#[test]
fn spec_minimal_skill_fails_strict_only() {
    let skill_md = "---\nname: lenis\ndescription: Smooth scrolling setup and pitfalls for Lenis.\n---\n\n# Lenis\n\nUse one instance.\n";
    let (_temp, dir) = skill("lenis", skill_md);
    let report = verify_skill_dir(&dir);

    assert!(report.spec_passed, "{report}");
    assert!(report.spec.is_empty());
    assert!(!report.strict_passed);
    assert!(report.strict.mentions("`triggers` is required"));
    assert!(report.strict.mentions("`references` field is required"));
    assert!(report.strict.mentions("`activation` is required"));
    assert!(report.strict.mentions("version appears unpinned"));
}

#[test]
fn name_must_match_directory() {
    let (_temp, dir) = skill("flow", VALID_SKILL_MD);
    let report = verify_skill_dir(&dir);
    assert!(!report.spec_passed);
    assert!(report.spec.mentions("`name` (react-flow) must match the parent directory name (flow)."));
}

#[test]
fn empty_body_warns_in_both_scopes() {
    let skill_md = VALID_SKILL_MD.split("# React Flow").next().unwrap();
    let (_temp, dir) = skill("react-flow", skill_md);
    let report = verify_skill_dir(&dir);
    assert!(report.spec.mentions("no Markdown body"));
    assert!(report.strict.mentions("no Markdown body"));
    assert_eq!(report.spec_grade, 96);
    assert_eq!(report.strict_grade, 97);
}

#[test]
fn unquoted_at_trigger_is_a_yaml_error() {
    let skill_md = VALID_SKILL_MD.replace("  - \"@xyflow/react\"\nreferences", "  - @xyflow/react\nreferences");
    let (_temp, dir) = skill("react-flow", &skill_md);
    let report = verify_skill_dir(&dir);
    assert!(report.spec.mentions("Invalid YAML frontmatter in SKILL.md"));
    assert!(report.strict.mentions("Invalid YAML frontmatter in SKILL.md"));
    assert!(report.strict.mentions("YAML frontmatter safety rule violated"));
    assert!(!report.spec_passed);
    assert!(!report.strict_passed);
}

#[test]
fn large_code_blocks_fail_strict() {
    let mut skill_md = VALID_SKILL_MD.to_string();
    skill_md.push_str("\n## Example\n\n```tsx\n");
    for i in 0..30 {
        skill_md.push_str(&format!("const n{i} = useNodes();\n"));
    }
    skill_md.push_str("```\n");
    let (_temp, dir) = skill("react-flow", &skill_md);
    let report = verify_skill_dir(&dir);

    assert!(report.spec_passed);
    assert_eq!(report.strict.error_count(), 1);
    assert_eq!(report.strict.warning_count(), 2);
    assert_eq!(report.strict_grade, 79);
    assert!(!report.strict_passed);
}

#[test]
fn threshold_is_configurable() {
    let mut skill_md = VALID_SKILL_MD.to_string();
    skill_md.push_str("\n```sh\nnpm i @xyflow/react\n```\n");
    let (_temp, dir) = skill("react-flow", &skill_md);

    let report = Verifier::new().with_strict_threshold(100).verify(&dir);
    assert_eq!(report.strict_grade, 97);
    assert!(!report.strict_passed);

    let report = Verifier::new().with_strict_threshold(90).verify(&dir);
    assert!(report.strict_passed);
}

#[test]
fn unexpected_top_level_entries_lower_strict_grade() {
    let (_temp, dir) = skill("react-flow", VALID_SKILL_MD);
    write(&dir, "notes.txt", "scratch");
    let report = verify_skill_dir(&dir);
    assert_eq!(report.strict.warning_count(), 1);
    assert!(report.strict_passed);
    assert!(report.spec.is_empty());
}

#[test]
fn ensure_valid_returns_report_or_error() {
    let (_temp, dir) = skill("react-flow", VALID_SKILL_MD);
    let report = ensure_valid(&dir).unwrap();
    assert!(report.is_valid());

    let temp = TempDir::new().unwrap();
    match ensure_valid(temp.path()) {
        Err(CheckError::Invalid(report)) => {
            assert!(report.to_string().contains("SPEC ERROR: Missing required file: SKILL.md"));
        }
        other => panic!("expected invalid report, got {other:?}"),
    }
}
