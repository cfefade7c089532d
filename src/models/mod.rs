//! Response shapes returned by the endpoint methods.
//!
//! Every field defaults when absent from the payload, so a shape decodes from
//! any JSON object and fields the server omits read as zero or empty.

mod champion;
mod league;
mod matches;
mod timeline;

pub use champion::ChampionRotations;
pub use league::{LeagueEntry, MiniSeries};
pub use matches::{
    Match, MatchInfo, MatchMetadata, MatchParticipant, MatchTeam, Matchlist, MatchlistOptions,
    TeamBan, TeamObjective, TeamObjectives,
};
pub use timeline::{
    ChampionStats, DamageStats, MatchTimeline, MatchTimelineInfo, MatchTimelineMetadata,
    ParticipantFrame, Position, TimelineEvent, TimelineEventType, TimelineFrame,
    TimelineParticipant,
};
