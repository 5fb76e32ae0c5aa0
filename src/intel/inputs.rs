//! Typed inputs of the company intelligence tools.

use serde::Deserialize;

use crate::tools::{FieldType, InputSchema, ToolInput};

#[derive(Debug, Clone, Deserialize)]
pub struct ResearchCompanyProfileInput {
    pub company_name: String,
    #[serde(default)]
    pub role_title: Option<String>,
}

impl ToolInput for ResearchCompanyProfileInput {
    fn schema() -> InputSchema {
        InputSchema::new()
            .required("company_name", FieldType::String, "Name of the company to research")
            .optional(
                "role_title",
                FieldType::String,
                "Role the research should focus on",
            )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchJobMarketDataInput {
    pub role_title: String,
    pub location: String,
}

impl ToolInput for FetchJobMarketDataInput {
    fn schema() -> InputSchema {
        InputSchema::new()
            .required("role_title", FieldType::String, "Job title to look up")
            .required("location", FieldType::String, "City, region or \"Remote\"")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeGithubPresenceInput {
    pub company_name: String,
}

impl ToolInput for AnalyzeGithubPresenceInput {
    fn schema() -> InputSchema {
        InputSchema::new().required(
            "company_name",
            FieldType::String,
            "Company whose public GitHub organisation to analyze",
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetGlassdoorInsightsInput {
    pub company_name: String,
}

impl ToolInput for GetGlassdoorInsightsInput {
    fn schema() -> InputSchema {
        InputSchema::new().required(
            "company_name",
            FieldType::String,
            "Company to fetch employee review insights for",
        )
    }
}
