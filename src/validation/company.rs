//! Company profile form

use serde::{Deserialize, Serialize};

use super::{
    choice, clean_list, optional, optional_text, postal_code, range, siret, text, trimmed,
    website, ValidationResult, Validator,
};
use crate::auth::models::{Address, CompanySize, CompanyUpdate};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddressInput {
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyInput {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub size: Option<String>,
    pub address: AddressInput,
    pub siret: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub oeth_rate: Option<f64>,
    pub values: Vec<String>,
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub name: String,
    pub industry: String,
    pub size: CompanySize,
    pub address: Address,
    pub siret: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub oeth_rate: Option<f64>,
    pub values: Vec<String>,
    pub benefits: Vec<String>,
}

impl From<CompanyProfile> for CompanyUpdate {
    fn from(profile: CompanyProfile) -> Self {
        CompanyUpdate {
            name: Some(profile.name),
            industry: Some(profile.industry),
            size: Some(profile.size),
            address: Some(profile.address),
            // The legal 6% threshold only counts once a rate is declared
            oeth_compliant: profile.oeth_rate.map(|rate| rate >= 6.0),
            oeth_rate: profile.oeth_rate,
            values: Some(profile.values),
            benefits: Some(profile.benefits),
            description: profile.description,
            website: profile.website,
        }
    }
}

pub struct CompanySchema;

impl Validator for CompanySchema {
    type Input = CompanyInput;
    type Output = CompanyProfile;

    fn check(&self, input: &CompanyInput, result: &mut ValidationResult) {
        text(result, "name", &input.name, Some(2), Some(100));
        text(result, "industry", &input.industry, None, Some(100));
        choice(
            result,
            "size",
            &input.size,
            CompanySize::parse,
            "Taille d'entreprise invalide",
        );
        text(result, "address.street", &input.address.street, Some(5), Some(200));
        text(result, "address.city", &input.address.city, Some(2), Some(100));
        postal_code(result, "address.postalCode", &input.address.postal_code);
        siret(result, "siret", &input.siret);
        website(result, "website", &input.website);
        optional_text(result, "description", &input.description, 2000);
        if let Some(rate) = input.oeth_rate {
            range(result, "oethRate", rate, 0.0, 100.0);
        }
    }

    fn normalize(&self, input: CompanyInput) -> CompanyProfile {
        let size = optional(input.size)
            .and_then(|s| CompanySize::parse(&s))
            .unwrap_or_default();
        let country = optional(input.address.country).unwrap_or_else(|| "France".to_string());

        CompanyProfile {
            name: trimmed(input.name),
            industry: trimmed(input.industry),
            size,
            address: Address {
                street: trimmed(input.address.street),
                city: trimmed(input.address.city),
                postal_code: trimmed(input.address.postal_code),
                country,
            },
            siret: optional(input.siret).map(|s| s.replace(' ', "")),
            website: optional(input.website),
            description: optional(input.description),
            oeth_rate: input.oeth_rate,
            values: clean_list(input.values),
            benefits: clean_list(input.benefits),
        }
    }
}
