use crate::domain::{analysis::entities::AnalysisType, llm::entities::Personalization};

pub const SYSTEM_PROMPT: &str = "You are an expert nutritional analyst. \
You must follow exactly the steps and rules in the prompt. \
Do not ignore any scoring coherence conditions. \
If the general_rating score is less than 5, no individual profile score can be greater than 7. \
Return ONLY valid JSON, with no additional text or explanation outside the JSON.";

/// Appended to the user prompt when the previous answer could not be parsed.
pub const STRICT_JSON_REMINDER: &str = "\n\nIMPORTANT: Your previous answer was not valid JSON. \
Respond with a single JSON object only. Do not wrap it in markdown code fences \
and do not add any text before or after it.";

fn analysis_focus(analysis_type: AnalysisType) -> &'static str {
    match analysis_type {
        AnalysisType::Nutrition => {
            "Analysis focus: Prioritize extraction of nutritional data and per-serving values."
        }
        AnalysisType::Ingredients => {
            "Analysis focus: Prioritize ingredient list, allergens, and additives."
        }
        AnalysisType::Complete => {
            "Analysis focus: Provide a complete analysis: nutrition, ingredients, and comprehensive health evaluation."
        }
    }
}

fn language_name(code: &str) -> &str {
    match code {
        "es" => "Spanish",
        "en" => "English",
        other => other,
    }
}

/// Assembles template, focus, personalization and language instruction.
pub fn build_analysis_prompt(
    template: &str,
    analysis_type: AnalysisType,
    personalization: &Personalization,
) -> String {
    let mut section = String::new();

    if !personalization.is_empty() {
        section.push_str("\n\n## Personalization\n");
        if !personalization.dietary_preferences.is_empty() {
            section.push_str(&format!(
                "- Dietary preferences: {}\n",
                personalization.dietary_preferences.join(", ")
            ));
        }
        if !personalization.health_conditions.is_empty() {
            section.push_str(&format!(
                "- Health conditions to consider: {}\n",
                personalization.health_conditions.join(", ")
            ));
        }
        if let Some(profile) = &personalization.user_profile {
            section.push_str(&format!("- User profile: {}\n", profile));
        }
    }

    let language_instruction = format!(
        "\n\nIMPORTANT: Write ALL text content (justifications, summaries, \
recommendations, warnings, strengths, weaknesses) in {}.",
        language_name(&personalization.content_language)
    );

    format!(
        "{}\n\n{}\n{}{}",
        template,
        analysis_focus(analysis_type),
        section,
        language_instruction
    )
    .trim()
    .to_string()
}
