//! Fixed instructions, sentinels and fallback strings for the pipeline

/// Instruction for the classification step.
pub const CLASSIFIER_INSTRUCTION: &str = "You are an AI assistant designed to classify user queries. \
Determine if the user's input is a 'legal_query' related to construction, permits, zoning, or \
owner-builder rights, or a 'general_query' (e.g., greetings, questions about your capabilities, \
company information, 'hello', 'hi'). Respond only with 'legal_query' or 'general_query'.";

/// Instruction for the project detail extraction step.
pub const EXTRACTOR_INSTRUCTION: &str = "You are a helpful assistant that extracts project details \
from user queries. Identify the project type, city, and state.";

/// The liability/educational disclaimer. Appears verbatim in the general
/// persona and in every generated roadmap.
pub const DISCLAIMER: &str = "Owner Builder Concepts (OBC) provides educational and informational \
content designed to help property owners better understand construction project planning, \
permitting, and owner-builder rights. OBC and its chatbot do not offer legal, engineering, or \
contracting advice. All information presented through our chatbot, website, Substack posts, and \
roadmap materials is provided as-is and is based on publicly available sources, general building \
practices, and user-supplied data. Construction laws and building codes vary by city and state. \
Always consult with your local building authority, a licensed professional, or legal advisor \
before making decisions related to your project. OBC is not responsible for any actions taken \
based on the information provided through this platform. Use of this information is at your own \
risk.";

/// Static reply when the general-response generation call fails.
pub const FALLBACK_GREETING: &str = "Hello there! I'm here to help you with legal information and \
project roadmaps related to construction. How can I assist you today?";

/// Sentinel stored in `legal_summary` when no summary could be produced.
pub const NO_SUMMARY_SENTINEL: &str = "No legal summary could be generated.";

/// Fixed roadmap text when the summary is missing or the sentinel.
pub const ROADMAP_UNAVAILABLE: &str = "A project roadmap could not be generated due to missing \
legal information.";

/// Roadmap text surfaced when a turn fails outright.
pub const EXECUTION_FAILED: &str = "Roadmap generation failed.";

/// System persona for the general-response step: friendly, restates the
/// disclaimer, refuses to give legal or construction advice directly.
pub fn general_persona() -> String {
    format!(
        "You are a friendly AI assistant. Respond politely to general greetings or questions \
         about yourself or company capabilities. This is the company description; please follow \
         it: {DISCLAIMER} Do not attempt to provide legal advice or construction-related \
         information here."
    )
}

/// System instruction for the summarize step, parameterized by the
/// extracted project fields.
pub fn summarizer_instruction(project_type: &str, city: &str, geo_state: &str) -> String {
    format!(
        "You are a legal expert. Synthesize the following search results to provide a clear, \
         concise summary of owner-builder rights, permit requirements, zoning laws, and local \
         construction ordinances for a {project_type} project in {city}, {geo_state}. Focus on \
         actionable information for an owner-builder. If a specific piece of information isn't \
         found across all provided results, explicitly state that it's not available in the \
         provided results. Cite sources by URL for each piece of information extracted from a \
         specific result, and include those URLs in the summary."
    )
}

/// System instruction for the roadmap step. Requires seven ordered phases,
/// inline URL citations, no timelines, and the verbatim disclaimer.
pub fn roadmap_instruction(
    legal_summary: &str,
    project_type: &str,
    city: &str,
    geo_state: &str,
) -> String {
    format!(
        "You are a project manager expert. Based on the following legal information for a \
         {project_type} project in {city}, {geo_state}, outline a step-by-step project roadmap \
         from Phase 1: Legal Understanding through Phase 7: Final Inspections. Detail the key \
         actions in each phase and incorporate the legal requirements where relevant.\n\n\
         Legal Summary:\n{legal_summary}\n\n\
         When detailing actions in a phase where information from a search result is used, \
         always cite the URL of the relevant search result directly within that phase's \
         description. For example: 'Action: Obtain permit (Source: \
         https://example.com/permit-info)'. Do not present any timelines. Always append this \
         disclaimer verbatim: {DISCLAIMER}"
    )
}
