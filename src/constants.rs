//! Static enumerations of the upstream API: platform regions, regional
//! continents and ranked queues.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A platform region. Summoner, league and platform endpoints are served per region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Br1,
    Eun1,
    Euw1,
    Jp1,
    Kr,
    La1,
    La2,
    Me1,
    Na1,
    Oc1,
    Ph2,
    Ru,
    Sg2,
    Th2,
    Tr1,
    Tw2,
    Vn2,
}

impl Region {
    pub const ALL: [Region; 17] = [
        Region::Br1,
        Region::Eun1,
        Region::Euw1,
        Region::Jp1,
        Region::Kr,
        Region::La1,
        Region::La2,
        Region::Me1,
        Region::Na1,
        Region::Oc1,
        Region::Ph2,
        Region::Ru,
        Region::Sg2,
        Region::Th2,
        Region::Tr1,
        Region::Tw2,
        Region::Vn2,
    ];

    /// Host label used in the API hostname, e.g. `na1`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Br1 => "br1",
            Region::Eun1 => "eun1",
            Region::Euw1 => "euw1",
            Region::Jp1 => "jp1",
            Region::Kr => "kr",
            Region::La1 => "la1",
            Region::La2 => "la2",
            Region::Me1 => "me1",
            Region::Na1 => "na1",
            Region::Oc1 => "oc1",
            Region::Ph2 => "ph2",
            Region::Ru => "ru",
            Region::Sg2 => "sg2",
            Region::Th2 => "th2",
            Region::Tr1 => "tr1",
            Region::Tw2 => "tw2",
            Region::Vn2 => "vn2",
        }
    }

    /// The continent that serves match data for this region.
    pub fn continent(&self) -> Continent {
        match self {
            Region::Br1 | Region::La1 | Region::La2 | Region::Na1 => Continent::Americas,
            Region::Jp1 | Region::Kr => Continent::Asia,
            Region::Eun1 | Region::Euw1 | Region::Me1 | Region::Ru | Region::Tr1 => {
                Continent::Europe
            }
            Region::Oc1
            | Region::Ph2
            | Region::Sg2
            | Region::Th2
            | Region::Tw2
            | Region::Vn2 => Continent::Sea,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == lower)
            .ok_or_else(|| format!("unknown region: {}", s))
    }
}

/// A regional routing value. Match and account endpoints are served per continent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Continent {
    Americas,
    Asia,
    Europe,
    Sea,
}

impl Continent {
    /// Host label of the regional routing value, e.g. `americas`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Continent::Americas => "americas",
            Continent::Asia => "asia",
            Continent::Europe => "europe",
            Continent::Sea => "sea",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Continent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "americas" => Ok(Continent::Americas),
            "asia" => Ok(Continent::Asia),
            "europe" => Ok(Continent::Europe),
            "sea" => Ok(Continent::Sea),
            _ => Err(format!("unknown continent: {}", s)),
        }
    }
}

/// Ranked queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Queue {
    #[serde(rename = "RANKED_SOLO_5x5")]
    RankedSolo5x5,
    #[serde(rename = "RANKED_FLEX_SR")]
    RankedFlexSr,
    #[serde(rename = "RANKED_FLEX_TT")]
    RankedFlexTt,
}

impl Queue {
    /// Queue name as used in league paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Queue::RankedSolo5x5 => "RANKED_SOLO_5x5",
            Queue::RankedFlexSr => "RANKED_FLEX_SR",
            Queue::RankedFlexTt => "RANKED_FLEX_TT",
        }
    }

    /// Numeric queue id as used in match data and matchlist filters.
    pub fn id(&self) -> u16 {
        match self {
            Queue::RankedSolo5x5 => 420,
            Queue::RankedFlexSr => 440,
            Queue::RankedFlexTt => 470,
        }
    }
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
