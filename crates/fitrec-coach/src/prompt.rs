//! Prompt construction and reply cleanup for the coaching service.

use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

use crate::summary::PlanSummary;

pub const SYSTEM_PROMPT: &str = "You are a certified fitness trainer and nutritionist. \
Give safe, evidence-based, personalised advice. Stay consistent with the plan you are given; \
do not change its goal, intensity or number of sessions.";

static RE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*```[A-Za-z0-9_-]*[ \t]*$").unwrap());
static RE_MULTI_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

pub fn user_prompt(summary: &PlanSummary) -> String {
    let mut p = String::new();
    let _ = writeln!(p, "Write short coaching advice for this user and plan.");
    let _ = writeln!(p);
    let _ = writeln!(p, "- Goal: {} (confidence {:.0}%)", summary.goal.display_name(), summary.confidence * 100.0);
    let _ = writeln!(p, "- Age: {}", summary.age);
    let _ = writeln!(p, "- BMI: {:.1} ({})", summary.bmi, summary.bmi_category);
    let _ = writeln!(p, "- Experience: {}", summary.experience);
    let _ = writeln!(p, "- Intensity: RPE {:.1}/10, {} sessions per week", summary.intensity, summary.sessions_per_week);
    if !summary.workout_highlights.is_empty() {
        let _ = writeln!(p, "\nWorkout plan:");
        for line in &summary.workout_highlights {
            let _ = writeln!(p, "- {line}");
        }
    }
    if !summary.diet_highlights.is_empty() {
        let _ = writeln!(p, "\nDiet plan:");
        for line in &summary.diet_highlights {
            let _ = writeln!(p, "- {line}");
        }
    }
    let _ = writeln!(
        p,
        "\nCover workout advice, nutrition advice, lifestyle tips and end with one motivational sentence. \
         Plain text only."
    );
    p
}

/// Three-day meal plan request built around the plan's diet guidance.
pub fn meal_plan_prompt(summary: &PlanSummary) -> String {
    let mut p = String::new();
    let _ = writeln!(p, "Create a 3-day meal plan for this user.");
    let _ = writeln!(p);
    let _ = writeln!(p, "- Age: {}", summary.age);
    let _ = writeln!(p, "- Gender: {}", summary.gender);
    let _ = writeln!(p, "- Weight: {:.1} kg, height: {:.0} cm", summary.weight_kg, summary.height_cm);
    let _ = writeln!(p, "- Activity level: {}", summary.activity_level);
    let _ = writeln!(p, "- Fitness goal: {}", summary.goal.display_name());
    let _ = writeln!(p, "- BMI: {:.1} ({})", summary.bmi, summary.bmi_category);
    if !summary.diet_highlights.is_empty() {
        let _ = writeln!(p, "\nFollow this diet guidance:");
        for line in &summary.diet_highlights {
            let _ = writeln!(p, "- {line}");
        }
    }
    let _ = writeln!(
        p,
        "\nStart with the estimated daily calorie need. For Day 1, Day 2 and Day 3 list breakfast, lunch, \
         dinner and two snacks, each with approximate calories. End with three nutritional guidelines. \
         Plain text only."
    );
    p
}

/// Strip markdown code fences and collapse runs of blank lines.
pub fn clean_reply(raw: &str) -> String {
    let text = RE_FENCE.replace_all(raw, "");
    let text = RE_MULTI_NEWLINE.replace_all(&text, "\n\n");
    text.trim().to_string()
}
