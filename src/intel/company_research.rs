use async_trait::async_trait;
use serde::Serialize;

use super::MOCK_DATA_STATUS;
use super::inputs::ResearchCompanyProfileInput;
use crate::tools::Handler;

#[derive(Debug, Clone, Serialize)]
pub struct CompanyProfileReport {
    pub company: String,
    pub profile: CompanyProfile,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub size: String,
    pub industry: String,
    pub culture: Vec<String>,
    pub tech_stack: Vec<String>,
    pub values: Vec<String>,
}

/// Placeholder company research returning a fixed profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockCompanyResearch;

#[async_trait]
impl Handler<ResearchCompanyProfileInput> for MockCompanyResearch {
    type Output = CompanyProfileReport;

    async fn handle(
        &self,
        input: ResearchCompanyProfileInput,
    ) -> anyhow::Result<CompanyProfileReport> {
        Ok(CompanyProfileReport {
            company: input.company_name,
            profile: CompanyProfile {
                size: "Medium (500-1000 employees)".to_string(),
                industry: "Technology".to_string(),
                culture: strings(&["Remote-friendly", "Fast-paced", "Innovation-focused"]),
                tech_stack: strings(&["React", "Node.js", "PostgreSQL"]),
                values: strings(&["Collaboration", "Quality", "Growth"]),
            },
            status: MOCK_DATA_STATUS,
        })
    }
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
