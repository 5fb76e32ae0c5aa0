//! Placeholder market, GitHub and employer-review providers.
//!
//! Each provider echoes the identifying input fields and fills the rest with
//! fixed values, marked with `status: "mock_data"`.

use async_trait::async_trait;
use serde::Serialize;

use super::MOCK_DATA_STATUS;
use super::company_research::strings;
use super::inputs::{AnalyzeGithubPresenceInput, FetchJobMarketDataInput, GetGlassdoorInsightsInput};
use crate::tools::Handler;

#[derive(Debug, Clone, Serialize)]
pub struct JobMarketReport {
    pub role: String,
    pub location: String,
    pub market_trends: MarketTrends,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarketTrends {
    pub salary_range: String,
    pub demand: String,
    pub top_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GithubPresenceReport {
    pub company: String,
    pub github_presence: GithubPresence,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GithubPresence {
    pub repositories: u32,
    pub top_languages: Vec<String>,
    pub activity_level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GlassdoorReport {
    pub company: String,
    pub glassdoor_insights: GlassdoorInsights,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GlassdoorInsights {
    pub overall_rating: f64,
    pub culture_and_values_rating: f64,
    pub work_life_balance_rating: f64,
    pub senior_management_rating: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MockJobMarket;

#[async_trait]
impl Handler<FetchJobMarketDataInput> for MockJobMarket {
    type Output = JobMarketReport;

    async fn handle(&self, input: FetchJobMarketDataInput) -> anyhow::Result<JobMarketReport> {
        Ok(JobMarketReport {
            role: input.role_title,
            location: input.location,
            market_trends: MarketTrends {
                salary_range: "100k-150k".to_string(),
                demand: "High".to_string(),
                top_skills: strings(&["TypeScript", "React", "GraphQL"]),
            },
            status: MOCK_DATA_STATUS,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MockGithubPresence;

#[async_trait]
impl Handler<AnalyzeGithubPresenceInput> for MockGithubPresence {
    type Output = GithubPresenceReport;

    async fn handle(
        &self,
        input: AnalyzeGithubPresenceInput,
    ) -> anyhow::Result<GithubPresenceReport> {
        Ok(GithubPresenceReport {
            company: input.company_name,
            github_presence: GithubPresence {
                repositories: 42,
                top_languages: strings(&["TypeScript", "Go", "Python"]),
                activity_level: "High".to_string(),
            },
            status: MOCK_DATA_STATUS,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MockGlassdoorInsights;

#[async_trait]
impl Handler<GetGlassdoorInsightsInput> for MockGlassdoorInsights {
    type Output = GlassdoorReport;

    async fn handle(&self, input: GetGlassdoorInsightsInput) -> anyhow::Result<GlassdoorReport> {
        Ok(GlassdoorReport {
            company: input.company_name,
            glassdoor_insights: GlassdoorInsights {
                overall_rating: 4.2,
                culture_and_values_rating: 4.1,
                work_life_balance_rating: 3.9,
                senior_management_rating: 3.8,
            },
            status: MOCK_DATA_STATUS,
        })
    }
}
