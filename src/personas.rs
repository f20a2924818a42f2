//! Canned records for demonstrating the forms.

use serde::Serialize;

use crate::models::{ClaimRecord, Gender, LiverPanelRecord};

/// A named preset that fully populates one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona<R> {
    pub key: &'static str,
    pub label: &'static str,
    pub record: R,
}

/// Selector entry: key plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaSummary {
    pub key: &'static str,
    pub label: &'static str,
}

pub const PERSONA_KEYS: &[&str] = &["low", "medium", "high"];

pub fn claim_persona(key: &str) -> Option<Persona<ClaimRecord>> {
    let (label, values) = match key {
        "low" => (
            "Low Risk - Alice Brown (Legitimate)",
            [
                "250",
                "34",
                "Female",
                "General Practice",
                "Submitted",
                "65000",
                "Married",
                "Employed",
                "Boston, MA",
                "Medical",
                "Electronic",
                "Low",
            ],
        ),
        "medium" => (
            "Medium Risk - Michael Wilson (Suspicious)",
            [
                "4500",
                "29",
                "Male",
                "Chiropractor",
                "Pending Review",
                "35000",
                "Single",
                "Unemployed",
                "Miami, FL",
                "Medical",
                "Portal",
                "Medium",
            ],
        ),
        // Pharmacy claim far above typical amounts, paper submission, and a
        // critical severity billed by a dermatologist.
        "high" => (
            "High Risk - David Miller (Fraudulent)",
            [
                "85000",
                "45",
                "Male",
                "Dermatology",
                "Submitted",
                "120000",
                "Divorced",
                "Self-Employed",
                "Los Angeles, CA",
                "Pharmacy",
                "Paper",
                "Critical",
            ],
        ),
        _ => return None,
    };

    let [amount, age, gender, specialty, status, income, marital, employment, location, claim_type, method, severity] =
        values;
    Some(Persona {
        key: static_key(key)?,
        label,
        record: ClaimRecord {
            claim_amount: amount.into(),
            patient_age: age.into(),
            patient_gender: gender.into(),
            provider_specialty: specialty.into(),
            claim_status: status.into(),
            patient_income: income.into(),
            patient_marital_status: marital.into(),
            patient_employment_status: employment.into(),
            provider_location: location.into(),
            claim_type: claim_type.into(),
            claim_submission_method: method.into(),
            disease_severity: severity.into(),
        },
    })
}

pub fn liver_persona(key: &str) -> Option<Persona<LiverPanelRecord>> {
    let (label, gender, values) = match key {
        "low" => (
            "Low Risk - Emma Clarke (Normal Panel)",
            Gender::Female,
            ["32", "0.7", "0.2", "85", "22", "25", "7.2", "4.3", "1.4"],
        ),
        "medium" => (
            "Medium Risk - Robert Hayes (Borderline Enzymes)",
            Gender::Male,
            ["47", "1.6", "0.6", "190", "68", "59", "6.6", "3.5", "1.0"],
        ),
        "high" => (
            "High Risk - Thomas Reed (Cholestatic Pattern)",
            Gender::Male,
            ["63", "7.3", "3.9", "490", "215", "260", "5.8", "2.4", "0.6"],
        ),
        _ => return None,
    };

    let [age, tb, db, alp, alt, ast, tp, alb, ag] = values;
    Some(Persona {
        key: static_key(key)?,
        label,
        record: LiverPanelRecord {
            age: age.into(),
            gender,
            total_bilirubin: tb.into(),
            direct_bilirubin: db.into(),
            alkaline_phosphotase: alp.into(),
            alamine_aminotransferase: alt.into(),
            aspartate_aminotransferase: ast.into(),
            total_proteins: tp.into(),
            albumin: alb.into(),
            albumin_globulin_ratio: ag.into(),
        },
    })
}

pub fn list_claim_personas() -> Vec<PersonaSummary> {
    PERSONA_KEYS
        .iter()
        .filter_map(|k| claim_persona(k))
        .map(|p| PersonaSummary {
            key: p.key,
            label: p.label,
        })
        .collect()
}

pub fn list_liver_personas() -> Vec<PersonaSummary> {
    PERSONA_KEYS
        .iter()
        .filter_map(|k| liver_persona(k))
        .map(|p| PersonaSummary {
            key: p.key,
            label: p.label,
        })
        .collect()
}

fn static_key(key: &str) -> Option<&'static str> {
    PERSONA_KEYS.iter().copied().find(|k| *k == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{set_field, Record};

    #[test]
    fn every_persona_is_fully_populated() {
        for key in PERSONA_KEYS {
            assert!(claim_persona(key).unwrap().record.blank_fields().is_empty());
            assert!(liver_persona(key).unwrap().record.blank_fields().is_empty());
        }
    }

    #[test]
    fn persona_values_pass_widget_checks() {
        for key in PERSONA_KEYS {
            let persona = liver_persona(key).unwrap();
            let mut copy = LiverPanelRecord::default();
            for spec in LiverPanelRecord::FIELDS {
                let value = persona.record.get(spec.name).unwrap();
                set_field(&mut copy, spec.name, &value).unwrap();
            }
            assert_eq!(copy, persona.record);

            let persona = claim_persona(key).unwrap();
            let mut copy = ClaimRecord::default();
            for spec in ClaimRecord::FIELDS {
                let value = persona.record.get(spec.name).unwrap();
                set_field(&mut copy, spec.name, &value).unwrap();
            }
            assert_eq!(copy, persona.record);
        }
    }

    #[test]
    fn high_risk_claim_matches_demo_scenario() {
        let persona = claim_persona("high").unwrap();
        assert_eq!(persona.label, "High Risk - David Miller (Fraudulent)");
        assert_eq!(persona.record.claim_amount, "85000");
        assert_eq!(persona.record.claim_type, "Pharmacy");
        assert_eq!(persona.record.disease_severity, "Critical");
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(claim_persona("extreme").is_none());
        assert!(liver_persona("").is_none());
    }

    #[test]
    fn summaries_follow_key_order() {
        let keys: Vec<&str> = list_claim_personas().iter().map(|p| p.key).collect();
        assert_eq!(keys, vec!["low", "medium", "high"]);
        assert_eq!(list_liver_personas().len(), 3);
    }
}
