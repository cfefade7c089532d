//! Request descriptors and the keys rate-limit buckets are indexed by.

use bytes::Bytes;
use reqwest::Method;
use std::fmt;
use std::str::FromStr;

use crate::constants::{Continent, Region};

/// The partition the upstream API segments traffic by.
///
/// Rate limits are tracked independently per scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Region(Region),
    Continent(Continent),
}

impl Scope {
    /// Host label for this scope, e.g. `na1` or `americas`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Region(r) => r.as_str(),
            Scope::Continent(c) => c.as_str(),
        }
    }

    /// Default base URL for this scope.
    pub fn base_url(&self) -> String {
        format!("https://{}.api.riotgames.com", self.as_str())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Region> for Scope {
    fn from(region: Region) -> Self {
        Scope::Region(region)
    }
}

impl From<Continent> for Scope {
    fn from(continent: Continent) -> Self {
        Scope::Continent(continent)
    }
}

/// Identifies one independently rate-limited operation.
///
/// Several paths may share a key; the key, not the path, selects the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKey {
    GetChampionRotations,
    GetLeagueExpEntries,
    GetMatchlist,
    GetMatch,
    GetMatchTimeline,
}

impl EndpointKey {
    pub const ALL: [EndpointKey; 5] = [
        EndpointKey::GetChampionRotations,
        EndpointKey::GetLeagueExpEntries,
        EndpointKey::GetMatchlist,
        EndpointKey::GetMatch,
        EndpointKey::GetMatchTimeline,
    ];

    /// Stable key used in configuration and logs, e.g. `get-match`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKey::GetChampionRotations => "get-champion-rotations",
            EndpointKey::GetLeagueExpEntries => "get-league-exp-entries",
            EndpointKey::GetMatchlist => "get-matchlist",
            EndpointKey::GetMatch => "get-match",
            EndpointKey::GetMatchTimeline => "get-match-timeline",
        }
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EndpointKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown endpoint key: {}", s))
    }
}

/// Key of a per-method bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub scope: Scope,
    pub endpoint: EndpointKey,
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope, self.endpoint)
    }
}

/// Everything the dispatcher needs to perform one API call.
///
/// Built once by an endpoint method and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    scope: Scope,
    endpoint: EndpointKey,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Bytes>,
}

impl RequestDescriptor {
    /// Create a GET descriptor.
    pub fn get(scope: impl Into<Scope>, endpoint: EndpointKey, path: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            endpoint,
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Append a query parameter. Parameters keep their insertion order.
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter when the value is present.
    pub fn with_optional_query<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with_query(key, v),
            None => self,
        }
    }

    /// Replace the HTTP method and attach a body.
    pub fn with_body(mut self, method: Method, body: impl Into<Bytes>) -> Self {
        self.method = method;
        self.body = Some(body.into());
        self
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn endpoint(&self) -> EndpointKey {
        self.endpoint
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Key of the per-method bucket this descriptor draws from.
    pub fn bucket_key(&self) -> BucketKey {
        BucketKey {
            scope: self.scope,
            endpoint: self.endpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_creation() {
        let descriptor = RequestDescriptor::get(
            Continent::Americas,
            EndpointKey::GetMatchlist,
            "/lol/match/v5/matches/by-puuid/abc/ids",
        )
        .with_query("start", 0)
        .with_query("count", 20)
        .with_optional_query::<u32>("queue", None);

        assert_eq!(descriptor.scope(), Scope::Continent(Continent::Americas));
        assert_eq!(descriptor.method(), &Method::GET);
        assert_eq!(
            descriptor.query(),
            &[
                ("start".to_string(), "0".to_string()),
                ("count".to_string(), "20".to_string())
            ]
        );
        assert!(descriptor.body().is_none());
    }

    #[test]
    fn test_bucket_key_display() {
        let descriptor =
            RequestDescriptor::get(Region::Na1, EndpointKey::GetChampionRotations, "/x");
        assert_eq!(
            descriptor.bucket_key().to_string(),
            "na1:get-champion-rotations"
        );
    }

    #[test]
    fn test_endpoint_key_round_trip_names() {
        for key in EndpointKey::ALL {
            assert_eq!(key.as_str().parse::<EndpointKey>(), Ok(key));
        }
        assert!("get-nothing".parse::<EndpointKey>().is_err());
    }

    #[test]
    fn test_scope_base_url() {
        assert_eq!(
            Scope::from(Region::Euw1).base_url(),
            "https://euw1.api.riotgames.com"
        );
        assert_eq!(
            Scope::from(Continent::Sea).base_url(),
            "https://sea.api.riotgames.com"
        );
    }
}
