//! The typed API client and its endpoint methods.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::constants::{Continent, Queue, Region};
use crate::dispatch::Dispatcher;
use crate::error::{self, ApiError, Error};
use crate::http::{HttpExchanger, ReqwestTransport, Transport};
use crate::models::{
    ChampionRotations, LeagueEntry, Match, MatchTimeline, Matchlist, MatchlistOptions,
};
use crate::ratelimit::{EndpointKey, LimiterRegistry, RequestDescriptor};

/// Client for the Riot Games API.
///
/// Owns one limiter registry shared by every call made through it; clone the
/// `Arc` around the client to share that budget between tasks.
pub struct RiotClient {
    dispatcher: Dispatcher,
}

impl RiotClient {
    /// Create a client that talks HTTP through `reqwest`.
    pub fn new(config: ClientConfig) -> error::Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("api_key is required".to_string()));
        }
        let transport = Arc::new(ReqwestTransport::new(&config.http)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client on top of an arbitrary transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let registry = Arc::new(
            LimiterRegistry::new(config.rate_limits.clone())
                .with_jitter(config.dispatch.contention_jitter()),
        );
        let exchanger = HttpExchanger::new(transport, config.api_key.clone())
            .with_base_url(config.http.base_url.clone());

        Self {
            dispatcher: Dispatcher::with_config(registry, exchanger, &config.dispatch),
        }
    }

    /// The dispatcher behind every endpoint method.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Rate limit state shared by every call made through this client.
    pub fn registry(&self) -> &LimiterRegistry {
        self.dispatcher.registry()
    }

    /// Champions currently free to play on a region.
    pub async fn champion_rotations(&self, region: Region) -> Result<ChampionRotations, ApiError> {
        let descriptor = RequestDescriptor::get(
            region,
            EndpointKey::GetChampionRotations,
            "/lol/platform/v3/champion-rotations",
        );
        self.dispatcher.dispatch_and_decode(&descriptor).await
    }

    /// One page of league entries for a queue, tier and division.
    pub async fn league_exp_entries(
        &self,
        region: Region,
        queue: Queue,
        tier: &str,
        division: &str,
        page: u32,
    ) -> Result<Vec<LeagueEntry>, ApiError> {
        let path = format!(
            "/lol/league-exp/v4/entries/{}/{}/{}",
            queue,
            tier.to_uppercase(),
            division.to_uppercase()
        );
        let descriptor = RequestDescriptor::get(region, EndpointKey::GetLeagueExpEntries, path)
            .with_query("page", page);
        self.dispatcher.dispatch_and_decode(&descriptor).await
    }

    /// Match ids played by a player.
    pub async fn matchlist(
        &self,
        continent: Continent,
        puuid: &str,
        options: &MatchlistOptions,
    ) -> Result<Matchlist, ApiError> {
        let path = format!("/lol/match/v5/matches/by-puuid/{}/ids", puuid);
        let descriptor =
            options.apply(RequestDescriptor::get(continent, EndpointKey::GetMatchlist, path));
        self.dispatcher.dispatch_and_decode(&descriptor).await
    }

    /// A single match by id, e.g. `NA1_1234567890`.
    pub async fn match_by_id(&self, continent: Continent, match_id: &str) -> Result<Match, ApiError> {
        let path = format!("/lol/match/v5/matches/{}", match_id);
        let descriptor = RequestDescriptor::get(continent, EndpointKey::GetMatch, path);
        self.dispatcher.dispatch_and_decode(&descriptor).await
    }

    /// Frame-by-frame timeline of a match.
    pub async fn match_timeline(
        &self,
        continent: Continent,
        match_id: &str,
    ) -> Result<MatchTimeline, ApiError> {
        let path = format!("/lol/match/v5/matches/{}/timeline", match_id);
        let descriptor = RequestDescriptor::get(continent, EndpointKey::GetMatchTimeline, path);
        self.dispatcher.dispatch_and_decode(&descriptor).await
    }
}
