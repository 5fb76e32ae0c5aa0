//! Company intelligence tools.
//!
//! Four tools are exposed, all currently backed by mock providers:
//!
//! - `research_company_profile`: size, industry, culture and stack of a company
//! - `fetch_job_market_data`: salary range and demand for a role in a location
//! - `analyze_github_presence`: public repository activity of a company
//! - `get_glassdoor_insights`: employee review ratings of a company
//!
//! Real providers plug in through [`IntelProviders`] without changing dispatch.

pub mod company_research;
pub mod inputs;
pub mod market_data;

use std::sync::Arc;

use crate::tools::{Handler, RegistryError, ToolRegistry, TypedTool};
use company_research::MockCompanyResearch;
use inputs::{
    AnalyzeGithubPresenceInput, FetchJobMarketDataInput, GetGlassdoorInsightsInput,
    ResearchCompanyProfileInput,
};
use market_data::{MockGithubPresence, MockGlassdoorInsights, MockJobMarket};

/// Marker placed in the `status` field of every placeholder result.
pub const MOCK_DATA_STATUS: &str = "mock_data";

pub const RESEARCH_COMPANY_PROFILE: &str = "research_company_profile";
pub const FETCH_JOB_MARKET_DATA: &str = "fetch_job_market_data";
pub const ANALYZE_GITHUB_PRESENCE: &str = "analyze_github_presence";
pub const GET_GLASSDOOR_INSIGHTS: &str = "get_glassdoor_insights";

/// One provider per tool.
#[derive(Debug, Clone)]
pub struct IntelProviders<C, J, G, R> {
    pub company_research: C,
    pub job_market: J,
    pub github: G,
    pub reviews: R,
}

impl Default
    for IntelProviders<MockCompanyResearch, MockJobMarket, MockGithubPresence, MockGlassdoorInsights>
{
    fn default() -> Self {
        Self {
            company_research: MockCompanyResearch,
            job_market: MockJobMarket,
            github: MockGithubPresence,
            reviews: MockGlassdoorInsights,
        }
    }
}

/// Register the four intelligence tools backed by `providers`.
pub fn register_tools<C, J, G, R>(
    registry: &mut ToolRegistry,
    providers: IntelProviders<C, J, G, R>,
) -> Result<(), RegistryError>
where
    C: Handler<ResearchCompanyProfileInput>,
    J: Handler<FetchJobMarketDataInput>,
    G: Handler<AnalyzeGithubPresenceInput>,
    R: Handler<GetGlassdoorInsightsInput>,
{
    registry
        .register(Arc::new(TypedTool::<ResearchCompanyProfileInput, _>::new(
            RESEARCH_COMPANY_PROFILE,
            "Research a company's size, industry, culture, tech stack and values.",
            providers.company_research,
        )))?
        .register(Arc::new(TypedTool::<FetchJobMarketDataInput, _>::new(
            FETCH_JOB_MARKET_DATA,
            "Fetch salary range, demand and in-demand skills for a role in a location.",
            providers.job_market,
        )))?
        .register(Arc::new(TypedTool::<AnalyzeGithubPresenceInput, _>::new(
            ANALYZE_GITHUB_PRESENCE,
            "Analyze a company's public GitHub repositories and activity.",
            providers.github,
        )))?
        .register(Arc::new(TypedTool::<GetGlassdoorInsightsInput, _>::new(
            GET_GLASSDOOR_INSIGHTS,
            "Summarize employee review ratings for a company.",
            providers.reviews,
        )))?;
    Ok(())
}

/// Registry with every tool backed by its mock provider.
pub fn default_registry() -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    register_tools(&mut registry, IntelProviders::default())?;
    Ok(registry)
}
