use planforge::report::checklist::Checklist;

#[test]
fn embedded_markers_win_over_everything_else() {
    // Bullets and markers together: the marker payload is authoritative.
    let text = "- visible bullet\n\
                ___LOCAL_STORAGE_DATA___\n\
                [{\"id\": \"t1\", \"title\": \"Design\", \"completed\": true}]\n\
                ___END_LOCAL_STORAGE___\n\
                - another bullet";

    let parsed = Checklist::parse(text);
    let Checklist::EmbeddedOverride { tasks, raw } = &parsed else {
        panic!("expected embedded override, got {parsed:?}");
    };
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Design");
    assert!(tasks[0].completed);
    assert_eq!(raw, text);
    assert!(parsed.override_tasks().is_some());
}

#[test]
fn embedded_markers_with_bad_json_fall_through() {
    let text = "___LOCAL_STORAGE_DATA___ not json ___END_LOCAL_STORAGE___";
    let parsed = Checklist::parse(text);
    assert!(matches!(parsed, Checklist::Raw(_)));
}

#[test]
fn json_array_parses_as_structured() {
    let text = r#"[{"title": "Set up CI", "completed": false}, {"title": "Write docs"}]"#;
    let parsed = Checklist::parse(text);
    let Checklist::Structured(tasks) = &parsed else {
        panic!("expected structured, got {parsed:?}");
    };
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].title, "Set up CI");
    // Missing fields take defaults.
    assert!(!tasks[1].completed);
    assert_eq!(tasks[1].phase, "");
}

#[test]
fn bullet_lines_parse_as_tasks() {
    let text = "Plan:\n- Design schema\n* Build API\n\n- \nnot a bullet";
    let parsed = Checklist::parse(text);
    let Checklist::Bulleted(tasks) = &parsed else {
        panic!("expected bulleted, got {parsed:?}");
    };
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].title, "Design schema");
    assert_eq!(tasks[0].id.as_deref(), Some("text_task_1"));
    assert_eq!(tasks[0].phase, "Tasks");
    assert_eq!(tasks[0].phase_order, 1);
    assert_eq!(tasks[0].task_order, 1);
    assert_eq!(tasks[1].title, "Build API");
    assert_eq!(tasks[1].task_order, 2);
    assert!(tasks.iter().all(|t| !t.completed));
}

#[test]
fn unrecognized_text_is_raw() {
    let parsed = Checklist::parse("free-form notes, nothing structured");
    assert!(matches!(parsed, Checklist::Raw(_)));
    assert!(parsed.tasks().is_empty());
    assert!(parsed.override_tasks().is_none());
}

#[test]
fn empty_override_list_does_not_suppress_counting() {
    let text = "___LOCAL_STORAGE_DATA___[]___END_LOCAL_STORAGE___";
    let parsed = Checklist::parse(text);
    assert!(matches!(parsed, Checklist::EmbeddedOverride { .. }));
    assert!(parsed.override_tasks().is_none());
}
