//! Prompt builders: record → instruction text + declared output schema.
//!
//! Builders never validate. Blank fields are interpolated as empty text.

use crate::models::{ChatMessage, ChatRole, ClaimRecord, LiverPanelRecord};

use super::schema::ResponseSchema;
use super::types::{GenerateRequest, Turn};

/// Instruction plus the response shape the model must return.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub instruction: String,
    pub schema: ResponseSchema,
}

impl PromptRequest {
    pub fn into_generate_request(self) -> GenerateRequest {
        GenerateRequest {
            system_instruction: None,
            turns: vec![Turn {
                role: ChatRole::User,
                text: self.instruction,
            }],
            response_schema: Some(self.schema),
        }
    }
}

pub const CHAT_SYSTEM_PROMPT: &str = "You are Dr. Assistant, an AI reference assistant for \
physicians using HepatoGuard. Answer questions about liver function tests, hepatology and \
insurance claim review concisely and accurately, citing standard reference ranges where useful. \
You support clinical reasoning but do not make diagnoses; remind the physician to apply their \
own clinical judgement when a question calls for a decision about a specific patient.";

pub fn liver_schema() -> ResponseSchema {
    ResponseSchema::object(vec![
        ("riskLevel", ResponseSchema::enumeration(&["Low", "Medium", "High"])),
        ("probability", ResponseSchema::number()),
        ("analysis", ResponseSchema::string()),
        ("recommendations", ResponseSchema::array(ResponseSchema::string())),
    ])
}

pub fn claim_schema() -> ResponseSchema {
    ResponseSchema::object(vec![
        ("isFraud", ResponseSchema::boolean()),
        ("riskScore", ResponseSchema::number()),
        ("reasoning", ResponseSchema::string()),
        ("flaggedFields", ResponseSchema::array(ResponseSchema::string())),
    ])
}

/// Build the hepatology risk prompt for a liver panel.
pub fn build_liver_prompt(data: &LiverPanelRecord) -> PromptRequest {
    let instruction = format!(
        r#"You are an expert hepatologist AI assistant. Analyze the following patient data for Liver Disease:

Patient Demographics:
- Age: {age}
- Gender: {gender}

Clinical Chemistry (Liver Function Tests):
- Total Bilirubin: {total_bilirubin} mg/dL
- Direct Bilirubin: {direct_bilirubin} mg/dL
- Alkaline Phosphotase: {alkaline_phosphotase} IU/L
- Alamine Aminotransferase (ALT): {alt} IU/L
- Aspartate Aminotransferase (AST): {ast} IU/L
- Total Proteins: {total_proteins} g/dL
- Albumin: {albumin} g/dL
- Albumin/Globulin Ratio: {ag_ratio}

Based on these values, provide a risk assessment for liver disease.
Return the output strictly as a JSON object with the following schema:
{{
  "riskLevel": "Low" | "Medium" | "High",
  "probability": number (0-100),
  "analysis": "A concise paragraph explaining the key findings indicating the risk.",
  "recommendations": ["List of three to four concise actionable medical recommendations"]
}}"#,
        age = data.age,
        gender = data.gender,
        total_bilirubin = data.total_bilirubin,
        direct_bilirubin = data.direct_bilirubin,
        alkaline_phosphotase = data.alkaline_phosphotase,
        alt = data.alamine_aminotransferase,
        ast = data.aspartate_aminotransferase,
        total_proteins = data.total_proteins,
        albumin = data.albumin,
        ag_ratio = data.albumin_globulin_ratio,
    );

    PromptRequest {
        instruction,
        schema: liver_schema(),
    }
}

/// Build the fraud screening prompt for an insurance claim.
pub fn build_claim_prompt(data: &ClaimRecord) -> PromptRequest {
    let instruction = format!(
        r#"You are an expert health insurance fraud investigator AI. Review the following claim for indicators of fraud, waste or abuse:

Claim Details:
- Claim Amount ($): {claim_amount}
- Claim Status: {claim_status}
- Claim Type: {claim_type}
- Claim Submission Method: {submission_method}

Patient Profile:
- Patient Age: {patient_age}
- Patient Gender: {patient_gender}
- Patient Annual Income ($): {patient_income}
- Patient Marital Status: {marital_status}
- Patient Employment Status: {employment_status}
- Disease Severity: {disease_severity}

Provider:
- Provider Specialty: {provider_specialty}
- Provider Location: {provider_location}

Look for inconsistencies such as amounts out of proportion to the claim type, severity that does not fit the provider specialty, or unusual submission channels.
Return the output strictly as a JSON object with the following schema:
{{
  "isFraud": boolean,
  "riskScore": number (0-100),
  "reasoning": "A concise paragraph explaining why the claim looks legitimate or suspicious.",
  "flaggedFields": ["Names of the claim fields that raised concern"]
}}"#,
        claim_amount = data.claim_amount,
        claim_status = data.claim_status,
        claim_type = data.claim_type,
        submission_method = data.claim_submission_method,
        patient_age = data.patient_age,
        patient_gender = data.patient_gender,
        patient_income = data.patient_income,
        marital_status = data.patient_marital_status,
        employment_status = data.patient_employment_status,
        disease_severity = data.disease_severity,
        provider_specialty = data.provider_specialty,
        provider_location = data.provider_location,
    );

    PromptRequest {
        instruction,
        schema: claim_schema(),
    }
}

/// Build a chat request from the prior transcript and the new user message.
///
/// `history` excludes `new_message`; it is appended as the final user turn.
pub fn build_chat_request(history: &[ChatMessage], new_message: &str) -> GenerateRequest {
    let mut turns: Vec<Turn> = history
        .iter()
        .map(|m| Turn {
            role: m.role,
            text: m.text.clone(),
        })
        .collect();
    turns.push(Turn {
        role: ChatRole::User,
        text: new_message.to_string(),
    });

    GenerateRequest {
        system_instruction: Some(CHAT_SYSTEM_PROMPT.to_string()),
        turns,
        response_schema: None,
    }
}
