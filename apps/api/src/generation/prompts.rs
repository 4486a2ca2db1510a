// All LLM prompt constants for the artifact features.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, MARKDOWN_ONLY_SYSTEM};
use crate::models::profile::UserProfile;

/// System prompt for resume generation — ATS-friendly single-page markdown.
pub const RESUME_SYSTEM: &str =
    "You are an expert resume writer and ATS optimization specialist. \
    Produce a single-page, ATS-friendly resume in markdown. \
    Use ## section headers (SUMMARY, SKILLS, EXPERIENCE, EDUCATION) and \
    tight, quantified bullet points. Do not invent employers, dates, or \
    credentials that are not in the candidate profile.";

/// Resume prompt template. Placeholders are filled from the profile.
const RESUME_PROMPT_TEMPLATE: &str = "\
Write a resume for the following candidate. Omit the name and contact \
header (the caller renders it separately).

Candidate profile:
- Target role: {target_role}
- Target region: {target_region}
- Skills: {skills}
- Experience: {experience}
- Education: {education}";

/// System prompt for cover letter tailoring.
pub const COVER_LETTER_SYSTEM: &str =
    "You are an expert cover letter writer. Write a persuasive, specific \
    cover letter in markdown, three to four short paragraphs, addressed to \
    the hiring team. Mirror the language of the job description without \
    copying it verbatim, and never fabricate experience.";

const COVER_LETTER_PROMPT_TEMPLATE: &str = "\
Write a cover letter for this candidate applying to the job below.

Candidate profile:
- Name: {full_name}
- Target role: {target_role}
- Skills: {skills}
- Experience: {experience}

Job description:
{job_description}";

/// System prompt for interview prep — strict JSON list output.
pub const INTERVIEW_SYSTEM: &str = JSON_ONLY_SYSTEM;

const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Generate 6 tough, realistic interview questions for a candidate interviewing for {target_role} roles in {target_region}, tailored to their background.

Candidate background:
- Skills: {skills}
- Experience: {experience}

Return a JSON array with this EXACT schema (no extra fields):
[
  {"question": "...", "answer": "..."}
]

Each "answer" is a concrete strategy for answering well, not a scripted reply. Order questions from warm-up to hardest."#;

/// System prompt for the job market analysis.
pub const MARKET_SYSTEM: &str = MARKDOWN_ONLY_SYSTEM;

const MARKET_PROMPT_TEMPLATE: &str = "\
Write a strategic job market analysis in markdown for a candidate targeting \
{target_role} roles in {target_region}.

Cover: current demand and hiring trends, salary ranges for the region, the \
skills employers weight most (compare against the candidate's skills: \
{skills}), and three concrete next moves for the candidate.";

pub fn resume_prompt(profile: &UserProfile) -> String {
    RESUME_PROMPT_TEMPLATE
        .replace("{target_role}", &profile.target_role)
        .replace("{target_region}", &profile.target_region)
        .replace("{skills}", &profile.skills)
        .replace("{experience}", &profile.experience)
        .replace("{education}", &profile.education)
}

pub fn cover_letter_prompt(profile: &UserProfile, job_description: &str) -> String {
    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{full_name}", &profile.full_name)
        .replace("{target_role}", &profile.target_role)
        .replace("{skills}", &profile.skills)
        .replace("{experience}", &profile.experience)
        .replace("{job_description}", job_description)
}

pub fn interview_prompt(profile: &UserProfile) -> String {
    INTERVIEW_PROMPT_TEMPLATE
        .replace("{target_role}", &profile.target_role)
        .replace("{target_region}", &profile.target_region)
        .replace("{skills}", &profile.skills)
        .replace("{experience}", &profile.experience)
}

pub fn market_prompt(profile: &UserProfile) -> String {
    MARKET_PROMPT_TEMPLATE
        .replace("{target_role}", &profile.target_role)
        .replace("{target_region}", &profile.target_region)
        .replace("{skills}", &profile.skills)
}
