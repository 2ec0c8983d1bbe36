// All LLM prompt templates for the agent nodes.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Classification prompt. Replace `{question}` and `{token_only}` before sending.
pub const CLASSIFY_PROMPT_TEMPLATE: &str = r#"Analyse this question about a professional CV and classify it.

Question: "{question}"

Classify into:
1. TYPE:
   - experience: professional experience, roles, companies
   - skills: technical skills, competencies
   - education: degrees, courses, certifications
   - projects: projects delivered
   - personal: personal information, contact details
   - career: progression, professional growth
   - general: general question about the profile

2. COMPLEXITY:
   - simple: direct question, specific piece of information
   - complex: needs analysis, comparison or synthesis
   - analytical: needs deep interpretation or insight

Return only: TYPE|COMPLEXITY
{token_only}"#;

/// Extraction tool templates. Replace `{cv_text}` and `{grounding}` before sending.
pub const EXTRACT_EXPERIENCE_TEMPLATE: &str = r#"Extract ALL professional experiences from the CV.

CV: {cv_text}

For each experience extract:
- Role/Position
- Company
- Period (start - end)
- Main responsibilities
- Achievements/results

{grounding}
Format: JSON with a list of experiences"#;

pub const EXTRACT_SKILLS_TEMPLATE: &str = r#"Extract ALL technical skills from the CV.

CV: {cv_text}

Categorise into:
- Programming languages
- Frameworks/Libraries
- Technologies/Tools
- Databases
- Cloud/DevOps
- Other technical competencies

{grounding}
Format: structured JSON"#;

pub const EXTRACT_EDUCATION_TEMPLATE: &str = r#"Extract ALL academic background from the CV.

CV: {cv_text}

Extract:
- Undergraduate/Graduate degrees
- Institution
- Period
- Certifications
- Relevant courses

{grounding}
Format: structured JSON"#;

pub const EXTRACT_PROJECTS_TEMPLATE: &str = r#"Extract ALL projects mentioned in the CV.

CV: {cv_text}

For each project:
- Name/Description
- Technologies used
- Results/Impact
- Context (company, personal, academic)

{grounding}
Format: structured JSON"#;

pub const EXTRACT_PERSONAL_INFO_TEMPLATE: &str = r#"Extract personal information from the CV.

CV: {cv_text}

Extract:
- Full name
- Professional title
- Location
- Contacts (email, phone, LinkedIn)
- Professional summary/objective

{grounding}
Format: structured JSON"#;

pub const ANALYZE_CAREER_PROGRESSION_TEMPLATE: &str = r#"Analyse the career progression in the CV.

CV: {cv_text}

Analyse:
- Growth in responsibilities
- Evolution of roles
- Total years of experience
- Areas of specialisation
- Career trends

{grounding}
Format: structured analysis"#;

/// Context blob stored under `context_analysis`. Replace `{question}` and `{extracted_json}`.
pub const CONTEXT_ANALYSIS_TEMPLATE: &str = r#"Question: {question}
Extracted information: {extracted_json}

Context analysed and prepared for answer generation."#;

// Answer generator personas, one per specialised question type.
pub const EXPERIENCE_PERSONA: &str = "You are an expert in professional experience analysis. \
    Answer focusing on: roles, companies, periods, responsibilities and achievements.";
pub const SKILLS_PERSONA: &str = "You are an expert in technical competency analysis. \
    Answer focusing on: technologies, languages, frameworks and level of experience.";
pub const EDUCATION_PERSONA: &str = "You are an expert in academic background analysis. \
    Answer focusing on: courses, institutions, periods and certifications.";
pub const PROJECTS_PERSONA: &str = "You are an expert in project analysis. \
    Answer focusing on: description, technologies, results and impact.";
pub const CAREER_PERSONA: &str = "You are an expert in career progression analysis. \
    Answer focusing on: growth, evolution and trends.";
pub const GENERIC_PERSONA: &str =
    "You are an assistant specialised in analysing professional CVs.";

/// Generation prompt. Replace `{persona}`, `{context}`, `{question}`, `{guidelines}`.
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"{persona}

Available context:
{context}

Question: "{question}"

{guidelines}

Answer:"#;

/// Validation prompt. Replace `{question}`, `{answer}`, `{token_only}`.
pub const VALIDATION_PROMPT_TEMPLATE: &str = r#"Evaluate the quality of this answer.

Question: "{question}"
Answer: "{answer}"

Evaluation criteria:
1. Does it answer the question directly? (yes/no)
2. Does it use specific information from the CV? (yes/no)
3. Is it clear and well structured? (yes/no)
4. Does it have an adequate length? (yes/no)
5. Does it keep a professional tone? (yes/no)

Return only: APROVADO or REJEITAR_<REASON>
{token_only}"#;

/// Fills `{name}` placeholders in one pass over `template`.
///
/// Only the template is scanned: substituted values are copied verbatim, so braces in a
/// question, answer or document are never expanded. Unknown placeholders are left as is.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let filled = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match filled {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
