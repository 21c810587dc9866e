//! Prompt synthesis for roadmap drafting. Everything here is pure: facts are
//! extracted from free-text context lines by keyword matching, a complexity
//! class and methodology are derived, and the final instruction prompt embeds
//! them together with fixed structural rules and a uniqueness nonce.

use std::sync::LazyLock;

use chrono::NaiveDate;
use rand::Rng;
use regex::Regex;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}|\d{2}/\d{2}/\d{4}|\d{2}-\d{2}-\d{4}").unwrap()
});

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];

// Word-boundary matched: "maintain" and "email" must not read as AI/ML.
static AI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bai\b").unwrap());
static ML_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bml\b").unwrap());

/// Deadlines under 30 days get a streamlined, fast-tracked plan.
pub const TIGHT_DEADLINE_DAYS: i64 = 30;

const HIGH_KEYWORDS: &[&str] = &[
    "complex",
    "advanced",
    "sophisticated",
    "extensive",
    "comprehensive",
    "enterprise",
    "microservices",
    "distributed",
    "real-time",
    "machine learning",
    "blockchain",
    "scalable",
    "high-performance",
    "multi-tenant",
    "big data",
];

const MEDIUM_KEYWORDS: &[&str] = &[
    "moderate",
    "standard",
    "typical",
    "conventional",
    "regular",
    "normal",
    "api",
    "integration",
    "dashboard",
    "authentication",
    "authorization",
];

const LOW_KEYWORDS: &[&str] = &[
    "simple",
    "basic",
    "minimal",
    "straightforward",
    "easy",
    "small",
    "prototype",
    "mvp",
    "proof of concept",
    "poc",
    "single-page",
    "static",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }

    /// Phase/task count bands embedded in the prompt.
    fn banding(&self) -> &'static str {
        match self {
            Complexity::Low => "Low complexity: 3-4 phases with 2-3 tasks each",
            Complexity::Medium => "Medium complexity: 4-5 phases with 3-4 tasks each",
            Complexity::High => "High complexity: 5-7 phases with 4-6 tasks each",
        }
    }
}

/// Project attributes pulled out of free-text context lines.
#[derive(Debug, Clone, Default)]
pub struct ProjectFacts {
    pub title: String,
    pub description: String,
    pub deadline_line: String,
    pub priority_line: String,
    pub problem_statement: String,
}

impl ProjectFacts {
    /// Keyword-match each non-empty line. The value is whatever follows the
    /// first colon; a line with no colon is kept whole where that matters.
    pub fn from_context(context: &str) -> Self {
        let mut facts = ProjectFacts::default();

        for line in context.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let lower = line.to_lowercase();
            let after_colon = line.split_once(':').map(|(_, v)| v.trim());

            if lower.contains("title") {
                facts.title = after_colon.unwrap_or(line).to_string();
            } else if lower.contains("description") {
                facts.description = after_colon.unwrap_or_default().to_string();
            } else if lower.contains("deadline") {
                facts.deadline_line = line.to_string();
            } else if lower.contains("priority") {
                facts.priority_line = line.to_string();
            } else if lower.contains("requirements")
                || lower.contains("goals")
                || lower.contains("problem statement")
            {
                facts.problem_statement = after_colon.unwrap_or_default().to_string();
            }
        }

        facts
    }

    pub fn combined_text(&self) -> String {
        format!("{} {}", self.description, self.problem_statement).to_lowercase()
    }
}

/// Extract a date from the deadline line and compute days remaining from
/// `today`, clamped at zero. None when no date could be parsed.
pub fn days_until_deadline(deadline_line: &str, today: NaiveDate) -> Option<i64> {
    let m = DATE_RE.find(deadline_line)?;
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(m.as_str(), fmt) {
            return Some((date - today).num_days().max(0));
        }
    }
    None
}

/// Classify complexity by counting keyword-set hits over the combined
/// description and problem text. "ai" and "ml" count as high indicators but
/// only on word boundaries. High wins only with an outright majority over the
/// other two sets combined, same for low; ties fall to medium. Returns the
/// class plus up to three matched factor keywords.
pub fn classify_complexity(combined: &str) -> (Complexity, Vec<&'static str>) {
    let hits = |set: &[&'static str]| -> Vec<&'static str> {
        set.iter().copied().filter(|w| combined.contains(w)).collect()
    };

    let mut high = hits(HIGH_KEYWORDS);
    if AI_RE.is_match(combined) {
        high.push("ai");
    }
    if ML_RE.is_match(combined) {
        high.push("ml");
    }
    let medium = hits(MEDIUM_KEYWORDS);
    let low = hits(LOW_KEYWORDS);

    if high.len() > medium.len() + low.len() {
        (Complexity::High, high.into_iter().take(3).collect())
    } else if low.len() > high.len() + medium.len() {
        (Complexity::Low, low.into_iter().take(3).collect())
    } else {
        (Complexity::Medium, medium.into_iter().take(3).collect())
    }
}

/// Pick a development methodology. A tight deadline overrides everything;
/// otherwise the first matching keyword wins; default is plain Agile.
pub fn pick_methodology(tight_deadline: bool, combined: &str) -> &'static str {
    if tight_deadline {
        "Agile with Sprint cycles"
    } else if combined.contains("waterfall") {
        "Waterfall"
    } else if combined.contains("devops") || combined.contains("ci/cd") {
        "DevOps with CI/CD"
    } else if combined.contains("microservices") {
        "Microservices Architecture"
    } else if combined.contains("machine learning") || AI_RE.is_match(combined) {
        "AI/ML Development Pipeline"
    } else {
        "Agile"
    }
}

/// Assemble the full instruction prompt for a context-derived roadmap.
/// Embeds the derived facts, structural rules (phase/task bands, SDLC phase
/// ordering, required JSON shape) and a timestamp+seed nonce so repeated
/// calls with identical inputs do not hit cached provider output.
pub fn build_prompt(context: &str, today: NaiveDate) -> String {
    let facts = ProjectFacts::from_context(context);
    let combined = facts.combined_text();

    let days_remaining = days_until_deadline(&facts.deadline_line, today);
    let tight_deadline = days_remaining.is_some_and(|d| d < TIGHT_DEADLINE_DAYS);

    let (complexity, factors) = classify_complexity(&combined);
    let methodology = pick_methodology(tight_deadline, &combined);

    let mut lead = format!(
        "Create a detailed software development roadmap for '{}'.",
        facts.title
    );
    if !facts.description.is_empty() {
        lead.push_str(&format!(
            " The goal is to {}.",
            facts.description.trim_end_matches('.')
        ));
    }
    if !facts.problem_statement.is_empty() {
        lead.push_str(&format!(
            " The key challenge to solve is: {}.",
            facts.problem_statement.trim_end_matches('.')
        ));
    }
    match days_remaining {
        Some(days) if tight_deadline => lead.push_str(&format!(
            " CRITICAL: There are only {days} days to complete this project, which is a tight \
             deadline. The roadmap must be streamlined and prioritize critical development tasks."
        )),
        Some(days) => {
            lead.push_str(&format!(" The project timeline allows {days} days for completion."))
        }
        None if !facts.deadline_line.is_empty() => {
            let raw = facts
                .deadline_line
                .split_once(':')
                .map(|(_, v)| v.trim())
                .unwrap_or(&facts.deadline_line);
            lead.push_str(&format!(" The deadline is {raw}."));
        }
        None => {}
    }
    lead.push_str(&format!(
        " This is a {} complexity software project{}.",
        complexity.as_str(),
        if factors.is_empty() {
            String::new()
        } else {
            format!(" with {}", factors.join(", "))
        }
    ));
    lead.push_str(&format!(
        " Implement a {methodology} approach for this software development project."
    ));

    let mut rng = rand::rng();
    let timestamp = chrono::Utc::now().timestamp();
    let seed: u32 = rng.random_range(1000..=9999);
    let days_display = days_remaining
        .map(|d| d.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        r#"{lead}

Requirements and Context:
{context}

Software Development Requirements:
1. Generate a STRICTLY SOFTWARE DEVELOPMENT-FOCUSED roadmap, not a generic project plan
2. The number of phases and tasks must be dynamically determined based on project complexity:
   - {banding}
3. For tight deadlines (under 30 days), prioritize essential development tasks and create a fast-tracked plan

4. Structure phases according to standard software development lifecycle:
   - Include initial phases for planning, requirements gathering, and design
   - Include middle phases for development, testing, and integration
   - Include final phases for deployment, documentation, and maintenance

5. MUST incorporate industry best practices relevant to the project:
   - For {methodology} projects, include specific methodology elements
   - Include necessary testing stages (unit, integration, system, user acceptance)
   - Include DevOps practices where relevant (CI/CD, infrastructure as code)
   - For AI/ML projects, include data processing and model training steps

6. Provide realistic time estimates for each task that:
   - Account for the project's total available time of {days_display} days
   - Allocate time proportionally based on task complexity and importance
   - Include buffer time for unexpected issues and revisions

7. Ensure each task is:
   - Specific to software development (NO generic market research, presentations, etc.)
   - Actionable and measurable
   - Technical in nature with clear deliverables
   - Described with software development terminology and concepts

8. IMPORTANT: This is a unique request (timestamp: {timestamp}, seed: {seed}). Do not provide a generic or templated roadmap. Create a completely fresh and unique roadmap specific to this project's needs.

The roadmap MUST be uniquely tailored to this specific software project, not a generic template.

Please provide the response in the following JSON format:
{{
    "phases": [
        {{
            "name": "Phase name - must be specific to software development",
            "description": "Phase description with methodology and technical details",
            "tasks": [
                {{
                    "title": "Technical task title",
                    "description": "Detailed technical description",
                    "estimated_duration": "X days"
                }}
            ]
        }}
    ]
}}"#,
        banding = complexity.banding(),
    )
}
