use std::fs;
use std::path::Path;

use practice_core::LessonName;
use scaffold::{RegistrationStatus, ScaffoldError, ScaffoldPaths, Scaffolder};
use tempfile::TempDir;

const INDEX_FIXTURE: &str = "// Lesson components\n\
    export { default as Phase1Selectors } from \"./Phase1Selectors\";\n\
    export { default as Phase2Grid } from \"./Phase2Grid\";\n";

const ROUTER_FIXTURE: &str = r#"import { Route, Routes, useNavigate } from "react-router-dom";
import {
  Phase1Selectors,
  Phase2Grid,
} from "../lessons";

export default function MainPage(): JSX.Element {
  return (
    <Routes>
      <Route path="/" element={<Hub />} />
      <Route
        path="/phase2-grid"
        element={
          <LessonLayout>
            <Phase2Grid />
          </LessonLayout>
        }
      />
    </Routes>
  );
}
"#;

fn build_tree(root: &Path) {
    fs::create_dir_all(root.join("src/lessons")).unwrap();
    fs::create_dir_all(root.join("src/styles")).unwrap();
    fs::create_dir_all(root.join("src/components")).unwrap();
    fs::write(root.join("src/lessons/index.ts"), INDEX_FIXTURE).unwrap();
    fs::write(root.join("src/components/MainPage.tsx"), ROUTER_FIXTURE).unwrap();
}

fn scaffolder(root: &Path) -> Scaffolder {
    Scaffolder::new(ScaffoldPaths::from_app_root(root))
}

#[test]
fn scaffolds_lesson_into_clean_tree() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path());

    let name = LessonName::new("Phase9Demo").unwrap();
    let report = scaffolder(dir.path())
        .scaffold(&name, Some("Demo Lesson"))
        .expect("scaffold");

    assert_eq!(report.route_path, "/phase9-demo");
    assert_eq!(report.index, RegistrationStatus::Updated);
    assert_eq!(report.import, RegistrationStatus::Updated);
    assert_eq!(report.route, RegistrationStatus::Updated);
    assert!(report.warnings.is_empty());

    let lesson = fs::read_to_string(dir.path().join("src/lessons/Phase9Demo.tsx")).unwrap();
    assert!(lesson.contains("export default function Phase9Demo()"));
    assert!(lesson.contains(r#"<PageHeader title="Demo Lesson" />"#));

    let stylesheet =
        fs::read_to_string(dir.path().join("src/styles/phase-phase9demo.css")).unwrap();
    assert!(stylesheet.contains("phase-phase9demo.css"));

    let index = fs::read_to_string(dir.path().join("src/lessons/index.ts")).unwrap();
    assert!(index.ends_with("export { default as Phase9Demo } from \"./Phase9Demo\";\n"));

    let router = fs::read_to_string(dir.path().join("src/components/MainPage.tsx")).unwrap();
    assert!(router.contains(", Phase9Demo\n} from \"../lessons\";"));
    assert!(router.contains("path=\"/phase9-demo\""));
    let route_at = router.find("<Phase9Demo />").unwrap();
    let closing_at = router.find("    </Routes>").unwrap();
    assert!(route_at < closing_at);
}

#[test]
fn title_defaults_to_lesson_name() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path());

    let name = LessonName::new("Phase9Demo").unwrap();
    scaffolder(dir.path()).scaffold(&name, None).expect("scaffold");

    let lesson = fs::read_to_string(dir.path().join("src/lessons/Phase9Demo.tsx")).unwrap();
    assert!(lesson.contains(r#"<PageHeader title="Phase9Demo" />"#));
}

#[test]
fn second_run_fails_on_create_without_duplicating_registrations() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path());

    let name = LessonName::new("Phase9Demo").unwrap();
    let tool = scaffolder(dir.path());
    tool.scaffold(&name, None).expect("first run");

    let err = tool.scaffold(&name, None).unwrap_err();
    assert!(matches!(err, ScaffoldError::ArtifactExists { .. }));

    // Registrations from the first run are still there exactly once.
    let index = fs::read_to_string(dir.path().join("src/lessons/index.ts")).unwrap();
    assert_eq!(index.matches("default as Phase9Demo").count(), 1);

    let router = fs::read_to_string(dir.path().join("src/components/MainPage.tsx")).unwrap();
    assert_eq!(router.matches("<Phase9Demo />").count(), 1);
    assert_eq!(router.matches(", Phase9Demo\n").count(), 1);
}

#[test]
fn registration_steps_are_idempotent_in_isolation() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path());

    let name = LessonName::new("Phase9Demo").unwrap();
    let tool = scaffolder(dir.path());
    tool.scaffold(&name, None).expect("first run");

    // Remove the artifacts so only the (already-applied) registrations remain.
    fs::remove_file(dir.path().join("src/lessons/Phase9Demo.tsx")).unwrap();
    fs::remove_file(dir.path().join("src/styles/phase-phase9demo.css")).unwrap();

    let report = tool.scaffold(&name, None).expect("second run");
    assert_eq!(report.index, RegistrationStatus::AlreadyPresent);
    assert_eq!(report.import, RegistrationStatus::AlreadyPresent);
    assert_eq!(report.route, RegistrationStatus::AlreadyPresent);

    let index = fs::read_to_string(dir.path().join("src/lessons/index.ts")).unwrap();
    assert_eq!(index.matches("default as Phase9Demo").count(), 1);
}

#[test]
fn never_clobbers_existing_lesson_file() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path());

    let existing = dir.path().join("src/lessons/Phase9Demo.tsx");
    fs::write(&existing, "// hand-edited lesson, do not touch\n").unwrap();

    let name = LessonName::new("Phase9Demo").unwrap();
    let err = scaffolder(dir.path()).scaffold(&name, None).unwrap_err();
    assert!(matches!(err, ScaffoldError::ArtifactExists { .. }));

    let bytes = fs::read(&existing).unwrap();
    assert_eq!(bytes, b"// hand-edited lesson, do not touch\n");
}

#[test]
fn stylesheet_conflict_keeps_lesson_file() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path());

    let stylesheet = dir.path().join("src/styles/phase-phase9demo.css");
    fs::write(&stylesheet, "/* existing styles */\n").unwrap();

    let name = LessonName::new("Phase9Demo").unwrap();
    let err = scaffolder(dir.path()).scaffold(&name, None).unwrap_err();
    assert!(matches!(err, ScaffoldError::ArtifactExists { .. }));

    // No rollback: the lesson file written before the conflict stays.
    assert!(dir.path().join("src/lessons/Phase9Demo.tsx").exists());
    assert_eq!(
        fs::read_to_string(&stylesheet).unwrap(),
        "/* existing styles */\n"
    );
}

#[test]
fn missing_router_marker_downgrades_to_warning() {
    let dir = TempDir::new().unwrap();
    build_tree(dir.path());
    fs::write(
        dir.path().join("src/components/MainPage.tsx"),
        "import {\n  Phase2Grid,\n} from \"../lessons\";\n\nexport default function MainPage() {}\n",
    )
    .unwrap();

    let name = LessonName::new("Phase9Demo").unwrap();
    let report = scaffolder(dir.path()).scaffold(&name, None).expect("scaffold");

    assert_eq!(report.route, RegistrationStatus::Skipped);
    assert_eq!(report.import, RegistrationStatus::Updated);
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("routes closing tag"))
    );
}

#[test]
fn missing_registration_files_do_not_fail_the_run() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src/lessons")).unwrap();
    fs::create_dir_all(dir.path().join("src/styles")).unwrap();

    let name = LessonName::new("Phase9Demo").unwrap();
    let report = scaffolder(dir.path()).scaffold(&name, None).expect("scaffold");

    assert_eq!(report.index, RegistrationStatus::Skipped);
    assert_eq!(report.import, RegistrationStatus::Skipped);
    assert_eq!(report.route, RegistrationStatus::Skipped);
    assert_eq!(report.warnings.len(), 2);
    assert!(dir.path().join("src/lessons/Phase9Demo.tsx").exists());
    assert!(dir.path().join("src/styles/phase-phase9demo.css").exists());
}
