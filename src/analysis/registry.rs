//! Static mode registry: for each analysis mode, the JSON exemplar the model
//! must reproduce and the system persona that frames the request.
//!
//! The exemplars are textual instructions, not machine-checked schemas; the
//! service only guarantees the response parses as JSON. Lookup is total:
//! `Mode::resolve` already collapsed unknown input onto `Lawyer`.

use super::mode::Mode;

/// Everything that varies per mode: output exemplar + system persona.
#[derive(Debug, Clone, Copy)]
pub struct ModeSpec {
    pub schema: &'static str,
    pub system_prompt: &'static str,
}

const LAWYER_SCHEMA: &str = r#"{"case_meta":{"case_no":"","court":"","date":"","cause":""},"parties":[{"role":"","name":""}],"issues":["..."],"evidence_chain":[{"evidence":"","source_paragraph":"","supports_fact":"","probative_weight":1}],"statutes":[{"law":"","article":"","quote_or_ref":"","application_reasoning":""}],"holdings":"","ratio_decidendi":"","obiter_dicta":"","our_side_arguments":["..."],"risks":[{"level":"high|medium|low","reason":"","mitigation":""}]}"#;

const CORPORATE_SCHEMA: &str = r#"{"overview":{"overall_risk":"high|medium|low","monetary_exposure_range":"e.g. 800k-1.2M","business_domain":"","region":"","time":""},"claims_against_company":[{"type":"","amount":"","status":"upheld|dismissed|partially upheld"}],"compliance_gaps":["..."],"action_items":["..."],"watchlist_keywords":["..."],"aggregation_keys":{"cause":"","industry":"","province":"","year":""}}"#;

const MEDIA_SCHEMA: &str = r#"{"newsworthiness_score":0,"headline":"","six_w":{"who":"","what":"","when":"","where":"","why":"","how":""},"precedent_or_context":["..."],"pull_quotes":[{"text":"","source":"source paragraph or faithful paraphrase"}],"tags":["..."],"related_cases_query":"..."}"#;

const PUBLIC_SCHEMA: &str = r#"{"plain_summary":"150-200 words","result":"what the court decided","why":"brief reasoning behind the ruling","rights_and_duties":["..."],"faq":[{"q":"","a":""}]}"#;

const LAWYER_SYSTEM: &str = "You are a senior litigation assistant for judgment analysis. Use ONLY the provided text. Output MUST be valid JSON and nothing else.";

const CORPORATE_SYSTEM: &str = "You are a corporate legal risk analysis assistant. Use ONLY the provided text. Output JSON only.";

const MEDIA_SYSTEM: &str = "You are a research assistant for legal/news editors. Use ONLY the provided text. Output JSON only.";

const PUBLIC_SYSTEM: &str = "You explain judgments in plain language for the public. Use ONLY the provided text. Output JSON only.";

/// Look up the spec for a mode. Pure and infallible.
pub fn lookup(mode: Mode) -> ModeSpec {
    match mode {
        Mode::Lawyer => ModeSpec {
            schema: LAWYER_SCHEMA,
            system_prompt: LAWYER_SYSTEM,
        },
        Mode::Corporate => ModeSpec {
            schema: CORPORATE_SCHEMA,
            system_prompt: CORPORATE_SYSTEM,
        },
        Mode::Media => ModeSpec {
            schema: MEDIA_SCHEMA,
            system_prompt: MEDIA_SYSTEM,
        },
        Mode::Public => ModeSpec {
            schema: PUBLIC_SCHEMA,
            system_prompt: PUBLIC_SYSTEM,
        },
    }
}
