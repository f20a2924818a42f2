//! Input records submitted for assessment.
//!
//! Both record shapes keep their values as text, the way the form widgets
//! hold them; numeric fields are only checked for parseability when set.

use serde::{Deserialize, Serialize};

use super::enums::Gender;

/// How a form widget constrains a field's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Text,
    Choice(&'static [&'static str]),
}

/// Static description of one record field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// camelCase name used on the wire and in `set`.
    pub name: &'static str,
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("{field} must be a number, got {value:?}")]
    NotNumeric { field: &'static str, value: String },
    #[error("{field} must be one of {allowed:?}, got {value:?}")]
    InvalidChoice {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
}

/// A record shape that can be edited field by field.
pub trait Record: Clone + Default + Serialize + Send + Sync + 'static {
    /// Fields in display order.
    const FIELDS: &'static [FieldSpec];

    /// Current text of a field, `None` for unknown names.
    fn get(&self, name: &str) -> Option<String>;

    /// Store a value without widget checks. Callers go through [`set_field`].
    fn assign(&mut self, name: &str, value: &str) -> Result<(), FieldError>;

    fn spec(name: &str) -> Option<&'static FieldSpec> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }

    /// Names of fields whose value is blank.
    fn blank_fields(&self) -> Vec<&'static str> {
        Self::FIELDS
            .iter()
            .filter(|f| self.get(f.name).map_or(true, |v| v.trim().is_empty()))
            .map(|f| f.name)
            .collect()
    }
}

/// Set one field, applying the coercion its widget would apply.
///
/// Empty text is always accepted so a field can be cleared.
pub fn set_field<R: Record>(record: &mut R, name: &str, value: &str) -> Result<(), FieldError> {
    let spec = R::spec(name).ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
    match spec.kind {
        FieldKind::Number if !value.trim().is_empty() => {
            let parsed = value.trim().parse::<f64>().ok().filter(|v| v.is_finite());
            if parsed.is_none() {
                return Err(FieldError::NotNumeric {
                    field: spec.name,
                    value: value.to_string(),
                });
            }
        }
        FieldKind::Choice(allowed) if !allowed.contains(&value) => {
            return Err(FieldError::InvalidChoice {
                field: spec.name,
                value: value.to_string(),
                allowed,
            });
        }
        _ => {}
    }
    record.assign(name, value)
}

// ═══════════════════════════════════════════
// Liver panel
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiverPanelRecord {
    pub age: String,
    pub gender: Gender,
    pub total_bilirubin: String,
    pub direct_bilirubin: String,
    pub alkaline_phosphotase: String,
    pub alamine_aminotransferase: String,
    pub aspartate_aminotransferase: String,
    pub total_proteins: String,
    pub albumin: String,
    pub albumin_globulin_ratio: String,
}

impl Default for LiverPanelRecord {
    fn default() -> Self {
        Self {
            age: String::new(),
            gender: Gender::Male,
            total_bilirubin: String::new(),
            direct_bilirubin: String::new(),
            alkaline_phosphotase: String::new(),
            alamine_aminotransferase: String::new(),
            aspartate_aminotransferase: String::new(),
            total_proteins: String::new(),
            albumin: String::new(),
            albumin_globulin_ratio: String::new(),
        }
    }
}

const fn field(
    name: &'static str,
    label: &'static str,
    unit: Option<&'static str>,
    kind: FieldKind,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        unit,
        kind,
    }
}

const GENDERS: &[&str] = &["Male", "Female"];

impl Record for LiverPanelRecord {
    const FIELDS: &'static [FieldSpec] = &[
        field("age", "Age", None, FieldKind::Number),
        field("gender", "Gender", None, FieldKind::Choice(GENDERS)),
        field("totalBilirubin", "Total Bilirubin", Some("mg/dL"), FieldKind::Number),
        field("directBilirubin", "Direct Bilirubin", Some("mg/dL"), FieldKind::Number),
        field("alkalinePhosphotase", "Alkaline Phosphotase", Some("IU/L"), FieldKind::Number),
        field(
            "alamineAminotransferase",
            "Alamine Aminotransferase (ALT)",
            Some("IU/L"),
            FieldKind::Number,
        ),
        field(
            "aspartateAminotransferase",
            "Aspartate Aminotransferase (AST)",
            Some("IU/L"),
            FieldKind::Number,
        ),
        field("totalProteins", "Total Proteins", Some("g/dL"), FieldKind::Number),
        field("albumin", "Albumin", Some("g/dL"), FieldKind::Number),
        field("albuminGlobulinRatio", "Albumin/Globulin Ratio", None, FieldKind::Number),
    ];

    fn get(&self, name: &str) -> Option<String> {
        let value = match name {
            "age" => &self.age,
            "gender" => return Some(self.gender.as_str().to_string()),
            "totalBilirubin" => &self.total_bilirubin,
            "directBilirubin" => &self.direct_bilirubin,
            "alkalinePhosphotase" => &self.alkaline_phosphotase,
            "alamineAminotransferase" => &self.alamine_aminotransferase,
            "aspartateAminotransferase" => &self.aspartate_aminotransferase,
            "totalProteins" => &self.total_proteins,
            "albumin" => &self.albumin,
            "albuminGlobulinRatio" => &self.albumin_globulin_ratio,
            _ => return None,
        };
        Some(value.clone())
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        let slot = match name {
            "age" => &mut self.age,
            "gender" => {
                self.gender = value.parse().map_err(|_| FieldError::InvalidChoice {
                    field: "gender",
                    value: value.to_string(),
                    allowed: GENDERS,
                })?;
                return Ok(());
            }
            "totalBilirubin" => &mut self.total_bilirubin,
            "directBilirubin" => &mut self.direct_bilirubin,
            "alkalinePhosphotase" => &mut self.alkaline_phosphotase,
            "alamineAminotransferase" => &mut self.alamine_aminotransferase,
            "aspartateAminotransferase" => &mut self.aspartate_aminotransferase,
            "totalProteins" => &mut self.total_proteins,
            "albumin" => &mut self.albumin,
            "albuminGlobulinRatio" => &mut self.albumin_globulin_ratio,
            _ => return Err(FieldError::UnknownField(name.to_string())),
        };
        *slot = value.to_string();
        Ok(())
    }
}

// ═══════════════════════════════════════════
// Insurance claim
// ═══════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    pub claim_amount: String,
    pub patient_age: String,
    pub patient_gender: String,
    pub provider_specialty: String,
    pub claim_status: String,
    pub patient_income: String,
    pub patient_marital_status: String,
    pub patient_employment_status: String,
    pub provider_location: String,
    pub claim_type: String,
    pub claim_submission_method: String,
    pub disease_severity: String,
}

impl Default for ClaimRecord {
    /// Blank inputs, selects at their first option.
    fn default() -> Self {
        Self {
            claim_amount: String::new(),
            patient_age: String::new(),
            patient_gender: "Male".into(),
            provider_specialty: String::new(),
            claim_status: "Submitted".into(),
            patient_income: String::new(),
            patient_marital_status: "Single".into(),
            patient_employment_status: "Employed".into(),
            provider_location: String::new(),
            claim_type: "Medical".into(),
            claim_submission_method: "Electronic".into(),
            disease_severity: "Medium".into(),
        }
    }
}

impl Record for ClaimRecord {
    const FIELDS: &'static [FieldSpec] = &[
        field("claimAmount", "Claim Amount", Some("$"), FieldKind::Number),
        field("patientAge", "Patient Age", None, FieldKind::Number),
        field("patientGender", "Patient Gender", None, FieldKind::Text),
        field("providerSpecialty", "Provider Specialty", None, FieldKind::Text),
        field("claimStatus", "Claim Status", None, FieldKind::Text),
        field("patientIncome", "Patient Annual Income", Some("$"), FieldKind::Number),
        field("patientMaritalStatus", "Patient Marital Status", None, FieldKind::Text),
        field("patientEmploymentStatus", "Patient Employment Status", None, FieldKind::Text),
        field("providerLocation", "Provider Location", None, FieldKind::Text),
        field("claimType", "Claim Type", None, FieldKind::Text),
        field("claimSubmissionMethod", "Claim Submission Method", None, FieldKind::Text),
        field("diseaseSeverity", "Disease Severity", None, FieldKind::Text),
    ];

    fn get(&self, name: &str) -> Option<String> {
        let value = match name {
            "claimAmount" => &self.claim_amount,
            "patientAge" => &self.patient_age,
            "patientGender" => &self.patient_gender,
            "providerSpecialty" => &self.provider_specialty,
            "claimStatus" => &self.claim_status,
            "patientIncome" => &self.patient_income,
            "patientMaritalStatus" => &self.patient_marital_status,
            "patientEmploymentStatus" => &self.patient_employment_status,
            "providerLocation" => &self.provider_location,
            "claimType" => &self.claim_type,
            "claimSubmissionMethod" => &self.claim_submission_method,
            "diseaseSeverity" => &self.disease_severity,
            _ => return None,
        };
        Some(value.clone())
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        let slot = match name {
            "claimAmount" => &mut self.claim_amount,
            "patientAge" => &mut self.patient_age,
            "patientGender" => &mut self.patient_gender,
            "providerSpecialty" => &mut self.provider_specialty,
            "claimStatus" => &mut self.claim_status,
            "patientIncome" => &mut self.patient_income,
            "patientMaritalStatus" => &mut self.patient_marital_status,
            "patientEmploymentStatus" => &mut self.patient_employment_status,
            "providerLocation" => &mut self.provider_location,
            "claimType" => &mut self.claim_type,
            "claimSubmissionMethod" => &mut self.claim_submission_method,
            "diseaseSeverity" => &mut self.disease_severity,
            _ => return Err(FieldError::UnknownField(name.to_string())),
        };
        *slot = value.to_string();
        Ok(())
    }
}
