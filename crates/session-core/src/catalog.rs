//! Static policy catalog for the Republic of Bean refugee-education
//! scenario: seven areas, three option texts each, loaded once and never
//! mutated at runtime.

use contracts::PolicyArea;
use serde_json::{json, Value};

pub fn option_texts(area: PolicyArea) -> [&'static str; 3] {
    match area {
        PolicyArea::AccessToEducation => [
            "Limit access to education for refugees, allowing only a small percentage to enroll in mainstream schools.",
            "Establish separate schools or learning centers specifically for refugee education.",
            "Provide equal access to education for all, and integrate refugee students into mainstream schools.",
        ],
        PolicyArea::LanguageInstruction => [
            "Maintain the current policy of teaching only Teanish in schools.",
            "Provide primary Teanish language courses to refugees.",
            "Implement comprehensive bilingual education programs.",
        ],
        PolicyArea::TeacherTraining => [
            "Provide minimal or no specific training for teachers regarding refugee education.",
            "Offer basic training sessions for teachers to familiarize them with refugee needs.",
            "Implement comprehensive and ongoing training programs for teachers.",
        ],
        PolicyArea::CurriculumAdaptation => [
            "Maintain the existing national curriculum without modifications.",
            "Introduce supplementary materials that acknowledge refugee experiences.",
            "Adapt the national curriculum to include diverse perspectives and cultural elements.",
        ],
        PolicyArea::PsychosocialSupport => [
            "Provide limited or no specific psychosocial support for refugee students.",
            "Establish basic support services such as counseling and peer support programs.",
            "Develop comprehensive and specialized psychosocial support programs.",
        ],
        PolicyArea::FinancialSupport => [
            "Allocate minimal funds to support refugee education.",
            "Increase financial support for refugee education, though still insufficient.",
            "Allocate significant financial resources to ensure adequate funding.",
        ],
        PolicyArea::Certification => [
            "Only recognize educational qualifications obtained within the Republic of Bean.",
            "Establish a comprehensive evaluation process for previous educational experiences.",
            "Develop tailored programs that combine recognition with additional training.",
        ],
    }
}

/// Text for a single option, or None when the option is outside 1..=3.
pub fn option_text(area: PolicyArea, option: u8) -> Option<&'static str> {
    if !(1..=3).contains(&option) {
        return None;
    }
    Some(option_texts(area)[usize::from(option) - 1])
}

/// Catalog as a wire payload: area id -> { label, options: { "1".., } }.
pub fn catalog_value() -> Value {
    let mut areas = serde_json::Map::new();
    for area in PolicyArea::ALL {
        let texts = option_texts(area);
        areas.insert(
            area.as_str().to_string(),
            json!({
                "label": area.label(),
                "options": {
                    "1": texts[0],
                    "2": texts[1],
                    "3": texts[2],
                },
            }),
        );
    }
    Value::Object(areas)
}

pub const REFLECTION_QUESTIONS: [&str; 5] = [
    "What emotions came up for you during the decision-making process—discomfort, frustration, detachment, guilt? What do those feelings reveal about your position in relation to refugee education?",
    "How did the group dynamics impact your ability to advocate for certain policies? Were there moments when you chose silence or compromise? Why?",
    "Whose interests did your decisions ultimately serve—refugees, citizens, or the state? Why?",
    "What compromises did you make for the sake of consensus, and who or what got erased in the process?",
    "How did the structure of the game (budget, options, scenario) shape or limit your imagination of justice?",
];
