//! Candidate profile form

use serde::{Deserialize, Serialize};

use super::{
    choice, clean_list, non_empty_list, optional, optional_text, phone, postal_code, range, text,
    trimmed, ValidationResult, Validator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Immediate,
    OneMonth,
    ThreeMonths,
    NotAvailable,
}

impl Availability {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "immediate" => Some(Availability::Immediate),
            "one_month" => Some(Availability::OneMonth),
            "three_months" => Some(Availability::ThreeMonths),
            "not_available" => Some(Availability::NotAvailable),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CandidateInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub title: Option<String>,
    pub experience_years: Option<u32>,
    pub availability: Option<String>,
    pub skills: Vec<String>,
    /// Holds a RQTH (recognised disabled worker status)
    pub has_rqth: Option<bool>,
    pub accommodations: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub title: Option<String>,
    pub experience_years: u32,
    pub availability: Availability,
    pub skills: Vec<String>,
    pub has_rqth: bool,
    pub accommodations: Option<String>,
    pub bio: Option<String>,
}

pub struct CandidateSchema;

impl Validator for CandidateSchema {
    type Input = CandidateInput;
    type Output = CandidateProfile;

    fn check(&self, input: &CandidateInput, result: &mut ValidationResult) {
        text(result, "firstName", &input.first_name, Some(2), Some(50));
        text(result, "lastName", &input.last_name, Some(2), Some(50));
        phone(result, "phone", &input.phone);
        text(result, "city", &input.city, Some(2), Some(100));
        postal_code(result, "postalCode", &input.postal_code);
        optional_text(result, "title", &input.title, 100);
        match input.experience_years {
            Some(years) => range(result, "experienceYears", years, 0, 50),
            None => result.add_error("experienceYears", "Ce champ est requis"),
        }
        choice(
            result,
            "availability",
            &input.availability,
            Availability::parse,
            "Disponibilité invalide",
        );
        non_empty_list(
            result,
            "skills",
            &input.skills,
            "Au moins une compétence est requise",
        );
        optional_text(result, "accommodations", &input.accommodations, 500);
        optional_text(result, "bio", &input.bio, 1000);
    }

    fn normalize(&self, input: CandidateInput) -> CandidateProfile {
        CandidateProfile {
            first_name: trimmed(input.first_name),
            last_name: trimmed(input.last_name),
            phone: optional(input.phone),
            city: trimmed(input.city),
            postal_code: trimmed(input.postal_code),
            title: optional(input.title),
            experience_years: input.experience_years.unwrap_or(0),
            availability: optional(input.availability)
                .and_then(|a| Availability::parse(&a))
                .unwrap_or(Availability::Immediate),
            skills: clean_list(input.skills),
            has_rqth: input.has_rqth.unwrap_or(false),
            accommodations: optional(input.accommodations),
            bio: optional(input.bio),
        }
    }
}
