//! Job posting form

use serde::{Deserialize, Serialize};

use super::{
    choice, clean_list, non_empty_list, optional, range, text, trimmed, ValidationResult,
    Validator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Cdi,
    Cdd,
    Interim,
    Stage,
    Alternance,
    Freelance,
}

impl ContractType {
    pub const ALL: [ContractType; 6] = [
        ContractType::Cdi,
        ContractType::Cdd,
        ContractType::Interim,
        ContractType::Stage,
        ContractType::Alternance,
        ContractType::Freelance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Cdi => "cdi",
            ContractType::Cdd => "cdd",
            ContractType::Interim => "interim",
            ContractType::Stage => "stage",
            ContractType::Alternance => "alternance",
            ContractType::Freelance => "freelance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    Onsite,
    Remote,
    Hybrid,
}

impl WorkMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "onsite" => Some(WorkMode::Onsite),
            "remote" => Some(WorkMode::Remote),
            "hybrid" => Some(WorkMode::Hybrid),
            _ => None,
        }
    }
}

/// Enforce `salaryMax >= salaryMin` when both bounds are given
pub(crate) fn salary_range(
    result: &mut ValidationResult,
    min: Option<f64>,
    max: Option<f64>,
) {
    if let (Some(min), Some(max)) = (min, max) {
        if max < min {
            result.add_error(
                "salaryMax",
                "Le salaire maximum doit être supérieur ou égal au salaire minimum",
            );
        }
    }
}

pub(crate) fn salary_bounds(result: &mut ValidationResult, min: Option<f64>, max: Option<f64>) {
    if let Some(min) = min {
        if min < 0.0 {
            result.add_error("salaryMin", "Le salaire ne peut pas être négatif");
        }
    }
    if let Some(max) = max {
        if max < 0.0 {
            result.add_error("salaryMax", "Le salaire ne peut pas être négatif");
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub contract_type: Option<String>,
    pub work_mode: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub skills: Vec<String>,
    pub accessibility_features: Vec<String>,
    pub experience_years: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub title: String,
    pub description: String,
    pub location: String,
    pub contract_type: ContractType,
    pub work_mode: WorkMode,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub skills: Vec<String>,
    pub accessibility_features: Vec<String>,
    pub experience_years: Option<u32>,
}

pub struct JobSchema;

impl Validator for JobSchema {
    type Input = JobInput;
    type Output = JobPosting;

    fn check(&self, input: &JobInput, result: &mut ValidationResult) {
        text(result, "title", &input.title, Some(5), Some(100));
        text(result, "description", &input.description, Some(50), Some(5000));
        text(result, "location", &input.location, None, Some(100));
        choice(
            result,
            "contractType",
            &input.contract_type,
            ContractType::parse,
            "Type de contrat invalide",
        );
        choice(
            result,
            "workMode",
            &input.work_mode,
            WorkMode::parse,
            "Mode de travail invalide",
        );
        salary_bounds(result, input.salary_min, input.salary_max);
        non_empty_list(
            result,
            "skills",
            &input.skills,
            "Au moins une compétence est requise",
        );
        if let Some(years) = input.experience_years {
            range(result, "experienceYears", years, 0, 50);
        }
    }

    fn refine(&self, input: &JobInput, result: &mut ValidationResult) {
        salary_range(result, input.salary_min, input.salary_max);
    }

    fn normalize(&self, input: JobInput) -> JobPosting {
        let contract_type = optional(input.contract_type)
            .and_then(|c| ContractType::parse(&c))
            .unwrap_or(ContractType::Cdi);
        let work_mode = optional(input.work_mode)
            .and_then(|w| WorkMode::parse(&w))
            .unwrap_or(WorkMode::Onsite);

        JobPosting {
            title: trimmed(input.title),
            description: trimmed(input.description),
            location: trimmed(input.location),
            contract_type,
            work_mode,
            salary_min: input.salary_min,
            salary_max: input.salary_max,
            skills: clean_list(input.skills),
            accessibility_features: clean_list(input.accessibility_features),
            experience_years: input.experience_years,
        }
    }
}
