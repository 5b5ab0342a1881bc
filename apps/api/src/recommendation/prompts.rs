// All LLM prompt constants for the Recommendation module.

/// System instruction: counsellor role, tone, and output discipline.
pub const CAREER_COUNSELOR_SYSTEM: &str = "You are a world-class Career Counselor specialized in \
    helping students from ALL academic backgrounds (Arts, Science, Commerce, Engineering, Law, \
    Medical, etc.). Analyze the provided personality traits, cognitive styles, and interests. \
    Suggest the 3 best-fit career paths (could be modern or traditional) and provide a detailed \
    4-phase growth roadmap for the top choice. Maintain an encouraging and professional tone. \
    Respond STRICTLY in structured JSON format.";

/// User query template. Replace `{name}` and `{profile_block}` before sending.
pub const ASSESSMENT_PROMPT_TEMPLATE: &str = r#"Universal Career Assessment for {name}:
{profile_block}

Generate the career guidance JSON."#;

/// Known assessment fields, in the order they appear in the prompt, with their labels.
pub const KNOWN_FIELDS: &[(&str, &str)] = &[
    ("fullName", "Student Name"),
    ("courseBranch", "Current Background"),
    ("collegeName", "Institution"),
    ("q1", "Activities preferred"),
    ("q2", "Problem-solving style"),
    ("q3", "Preferred Work Environment"),
    ("q4", "Professional Values"),
    ("q5", "Pride-worthy Skill"),
    ("q6", "Communication Preference"),
    ("q7", "Goal Satisfaction"),
    ("q8", "Passion Topic"),
    ("q9", "Interest Industries"),
    ("q10", "Commitment Level"),
    ("message", "Specific Concerns"),
];

pub const MISSING_FIELD_PLACEHOLDER: &str = "Not provided";
pub const MISSING_MESSAGE_PLACEHOLDER: &str = "None provided";
pub const UNNAMED_STUDENT: &str = "the student";
