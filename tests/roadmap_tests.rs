use chrono::NaiveDate;
use serde_json::json;

use planforge::config::AiConfig;
use planforge::roadmap::client::{RoadmapClient, extract_text};
use planforge::roadmap::prompt::{
    Complexity, ProjectFacts, build_prompt, classify_complexity, days_until_deadline,
    pick_methodology,
};

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

// ── Fact extraction ─────────────────────────────────────────────

#[test]
fn facts_pick_values_after_the_colon() {
    let context = "Project Title: Inventory Tracker\n\
                   Description: track stock levels in real time\n\
                   Priority: High\n\
                   Deadline: 2024-03-15\n\
                   Requirements/Goals: reduce stockouts";

    let facts = ProjectFacts::from_context(context);
    assert_eq!(facts.title, "Inventory Tracker");
    assert_eq!(facts.description, "track stock levels in real time");
    assert_eq!(facts.deadline_line, "Deadline: 2024-03-15");
    assert_eq!(facts.problem_statement, "reduce stockouts");
}

// ── Deadline parsing ────────────────────────────────────────────

#[test]
fn deadline_formats_all_parse() {
    let today = march(1);
    assert_eq!(days_until_deadline("Deadline: 2024-03-15", today), Some(14));
    assert_eq!(days_until_deadline("Deadline: 03/15/2024", today), Some(14));
    assert_eq!(days_until_deadline("Deadline: 15-03-2024", today), Some(14));
}

#[test]
fn past_deadline_clamps_to_zero() {
    assert_eq!(days_until_deadline("Deadline: 2024-03-01", march(20)), Some(0));
}

#[test]
fn unparseable_deadline_is_none() {
    assert_eq!(days_until_deadline("Deadline: sometime soon", march(1)), None);
    assert_eq!(days_until_deadline("", march(1)), None);
}

// ── Complexity classification ───────────────────────────────────

#[test]
fn high_keywords_need_outright_majority() {
    let (c, factors) =
        classify_complexity("a complex distributed real-time enterprise platform");
    assert_eq!(c, Complexity::High);
    assert_eq!(factors.len(), 3);

    // One high hit against one medium hit is a tie: medium wins.
    let (c, _) = classify_complexity("a complex api");
    assert_eq!(c, Complexity::Medium);
}

#[test]
fn low_keywords_classify_simple_projects() {
    let (c, factors) = classify_complexity("a simple static mvp prototype");
    assert_eq!(c, Complexity::Low);
    assert!(factors.contains(&"simple"));
}

#[test]
fn ai_and_ml_words_count_as_high_complexity() {
    let (c, factors) = classify_complexity("an ai and ml recommendation engine");
    assert_eq!(c, Complexity::High);
    assert!(factors.contains(&"ai"));
    assert!(factors.contains(&"ml"));

    // Substrings must not trigger the indicators.
    let (c, factors) = classify_complexity("maintain the email archive");
    assert_eq!(c, Complexity::Medium);
    assert!(factors.is_empty());
}

#[test]
fn no_keywords_default_to_medium() {
    let (c, factors) = classify_complexity("a project about gardening");
    assert_eq!(c, Complexity::Medium);
    assert!(factors.is_empty());
}

// ── Methodology selection ───────────────────────────────────────

#[test]
fn tight_deadline_overrides_methodology_keywords() {
    assert_eq!(
        pick_methodology(true, "a waterfall microservices project"),
        "Agile with Sprint cycles"
    );
}

#[test]
fn methodology_keywords_match_in_fixed_order() {
    assert_eq!(pick_methodology(false, "strict waterfall process"), "Waterfall");
    assert_eq!(pick_methodology(false, "devops culture"), "DevOps with CI/CD");
    assert_eq!(pick_methodology(false, "ci/cd pipelines"), "DevOps with CI/CD");
    assert_eq!(
        pick_methodology(false, "microservices everywhere"),
        "Microservices Architecture"
    );
    assert_eq!(
        pick_methodology(false, "an ai chatbot"),
        "AI/ML Development Pipeline"
    );
    assert_eq!(pick_methodology(false, "plain web app"), "Agile");
}

#[test]
fn ai_keyword_requires_word_boundary() {
    // "maintain", "aid" etc. must not read as AI projects.
    assert_eq!(pick_methodology(false, "maintain a painting aid"), "Agile");
}

// ── Prompt assembly ─────────────────────────────────────────────

#[test]
fn prompt_embeds_derived_facts_and_banding() {
    let context = "Project Title: Fleet Dashboard\n\
                   Description: a simple static mvp\n\
                   Deadline: 2024-03-10";
    let prompt = build_prompt(context, march(1));

    assert!(prompt.contains("Fleet Dashboard"));
    assert!(prompt.contains("low complexity software project"));
    assert!(prompt.contains("Low complexity: 3-4 phases with 2-3 tasks each"));
    // 9 days out is a tight deadline.
    assert!(prompt.contains("Agile with Sprint cycles"));
    assert!(prompt.contains("only 9 days"));
    assert!(prompt.contains("timestamp:"));
    assert!(prompt.contains("\"phases\""));
}

#[test]
fn prompt_without_deadline_reports_unknown_days() {
    let prompt = build_prompt("Project Title: Thing", march(1));
    assert!(prompt.contains("total available time of unknown days"));
}

// ── Drafting client ─────────────────────────────────────────────

fn assert_send<T: Send>(value: T) -> T {
    value
}

#[test]
fn draft_future_is_send() {
    let client = RoadmapClient::new(AiConfig {
        api_key: None,
        api_url: "http://127.0.0.1:9/unused".to_string(),
        model: "test-model".to_string(),
    });
    // tokio::spawn and the server's handler futures both require Send.
    let _ = assert_send(client.draft("roadmap prompt"));
}

// ── Response text extraction ────────────────────────────────────

#[test]
fn extract_text_tries_known_shapes_in_order() {
    let choices = json!({ "choices": [{ "text": "from choices" }] });
    assert_eq!(extract_text(&choices).unwrap(), "from choices");

    let nested = json!({ "output": { "choices": [{ "text": "from output" }] } });
    assert_eq!(extract_text(&nested).unwrap(), "from output");

    let flat = json!({ "text": "flat" });
    assert_eq!(extract_text(&flat).unwrap(), "flat");

    let any_nested = json!({ "result": { "text": "buried" } });
    assert_eq!(extract_text(&any_nested).unwrap(), "buried");
}

#[test]
fn extract_text_unknown_shape_is_typed_error() {
    let err = extract_text(&json!({ "status": "ok" })).unwrap_err();
    assert!(err.to_string().contains("Could not find text field"));
}
