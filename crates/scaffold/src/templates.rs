use practice_core::LessonName;

/// File name of the generated lesson component.
#[must_use]
pub fn lesson_file_name(name: &LessonName) -> String {
    format!("{name}.tsx")
}

/// File name of the companion stylesheet: `phase-` + lowercase name + `.css`.
#[must_use]
pub fn stylesheet_file_name(name: &LessonName) -> String {
    format!("phase-{}.css", name.as_str().to_lowercase())
}

/// Minimal component stub: imports the shared page header and the derived
/// stylesheet, renders the title plus a placeholder body.
#[must_use]
pub fn lesson_component(name: &LessonName, title: &str, stylesheet: &str) -> String {
    format!(
        r#"import React from 'react';
import {{ PageHeader }} from '../components';
import '../styles/{stylesheet}';

export default function {name}() {{
  return (
    <div>
      <PageHeader title="{title}" />
      <p>New lesson scaffolded. Replace this content with exercises.</p>
    </div>
  );
}}
"#
    )
}

/// Stylesheet stub: a comment header naming the lesson, no rules.
#[must_use]
pub fn stylesheet(name: &LessonName, stylesheet: &str) -> String {
    format!("/* {stylesheet} - scaffolded styles for {name} */\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> LessonName {
        LessonName::new(raw).unwrap()
    }

    #[test]
    fn stylesheet_name_lowercases_with_prefix() {
        assert_eq!(
            stylesheet_file_name(&name("Phase9Demo")),
            "phase-phase9demo.css"
        );
    }

    #[test]
    fn component_uses_title_and_stylesheet() {
        let text = lesson_component(&name("Phase9Demo"), "Demo Lesson", "phase-phase9demo.css");
        assert!(text.contains("export default function Phase9Demo()"));
        assert!(text.contains(r#"<PageHeader title="Demo Lesson" />"#));
        assert!(text.contains("import '../styles/phase-phase9demo.css';"));
    }

    #[test]
    fn stylesheet_stub_names_the_lesson() {
        let text = stylesheet(&name("Phase9Demo"), "phase-phase9demo.css");
        assert_eq!(
            text,
            "/* phase-phase9demo.css - scaffolded styles for Phase9Demo */\n"
        );
    }
}
