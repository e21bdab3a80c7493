//! Job search filters

use serde::{Deserialize, Serialize};

use super::job::{salary_bounds, salary_range, ContractType, WorkMode};
use super::{optional, optional_text, range, ValidationResult, Validator};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchInput {
    pub query: Option<String>,
    pub location: Option<String>,
    pub contract_types: Vec<String>,
    pub work_mode: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub accessible_only: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub query: Option<String>,
    pub location: Option<String>,
    pub contract_types: Vec<ContractType>,
    pub work_mode: Option<WorkMode>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub accessible_only: bool,
    pub page: u32,
    pub per_page: u32,
}

pub struct SearchFiltersSchema;

impl Validator for SearchFiltersSchema {
    type Input = SearchInput;
    type Output = SearchFilters;

    fn check(&self, input: &SearchInput, result: &mut ValidationResult) {
        optional_text(result, "query", &input.query, 100);
        optional_text(result, "location", &input.location, 100);

        for (index, contract) in input.contract_types.iter().enumerate() {
            if ContractType::parse(contract.trim()).is_none() {
                result.add_error(
                    &format!("contractTypes[{}]", index),
                    "Type de contrat invalide",
                );
            }
        }

        if let Some(mode) = input.work_mode.as_deref().map(str::trim) {
            if !mode.is_empty() && WorkMode::parse(mode).is_none() {
                result.add_error("workMode", "Mode de travail invalide");
            }
        }

        salary_bounds(result, input.salary_min, input.salary_max);

        if let Some(page) = input.page {
            if page < 1 {
                result.add_error("page", "La page doit être supérieure ou égale à 1");
            }
        }
        if let Some(per_page) = input.per_page {
            range(result, "perPage", per_page, 1, 100);
        }
    }

    fn refine(&self, input: &SearchInput, result: &mut ValidationResult) {
        salary_range(result, input.salary_min, input.salary_max);
    }

    fn normalize(&self, input: SearchInput) -> SearchFilters {
        let mut contract_types: Vec<ContractType> = Vec::new();
        for contract in input.contract_types.iter().filter_map(|c| ContractType::parse(c.trim())) {
            if !contract_types.contains(&contract) {
                contract_types.push(contract);
            }
        }

        SearchFilters {
            query: optional(input.query),
            location: optional(input.location),
            contract_types,
            work_mode: optional(input.work_mode).and_then(|w| WorkMode::parse(&w)),
            salary_min: input.salary_min,
            salary_max: input.salary_max,
            accessible_only: input.accessible_only.unwrap_or(false),
            page: input.page.unwrap_or(1),
            per_page: input.per_page.unwrap_or(20),
        }
    }
}
