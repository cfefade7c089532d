use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchTimeline {
    pub metadata: MatchTimelineMetadata,
    pub info: MatchTimelineInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchTimelineMetadata {
    pub data_version: String,
    pub match_id: String,
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchTimelineInfo {
    /// Milliseconds between frames
    pub frame_interval: i64,
    pub frames: Vec<TimelineFrame>,
    pub game_id: i64,
    pub participants: Vec<TimelineParticipant>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineParticipant {
    pub participant_id: i32,
    pub puuid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineFrame {
    pub timestamp: i64,
    /// One frame per participant, ordered by participant id
    #[serde(
        deserialize_with = "participant_frames",
        serialize_with = "participant_frames_by_id"
    )]
    pub participant_frames: Vec<ParticipantFrame>,
    pub events: Vec<TimelineEvent>,
}

/// The server keys participant frames by participant id (`{"1": {...}}`).
fn participant_frames<'de, D>(deserializer: D) -> Result<Vec<ParticipantFrame>, D::Error>
where
    D: Deserializer<'de>,
{
    let by_id: Option<HashMap<String, ParticipantFrame>> = Option::deserialize(deserializer)?;
    let mut frames: Vec<(i64, ParticipantFrame)> = by_id
        .unwrap_or_default()
        .into_iter()
        .map(|(id, frame)| (id.parse().unwrap_or(i64::MAX), frame))
        .collect();
    frames.sort_by_key(|(id, _)| *id);
    Ok(frames.into_iter().map(|(_, frame)| frame).collect())
}

/// Writes the frames back in the server's id-keyed shape.
fn participant_frames_by_id<S>(frames: &[ParticipantFrame], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(frames.iter().map(|f| (f.participant_id.to_string(), f)))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantFrame {
    pub champion_stats: ChampionStats,
    pub current_gold: i32,
    pub damage_stats: DamageStats,
    pub gold_per_second: i32,
    pub jungle_minions_killed: i32,
    pub level: i32,
    pub minions_killed: i32,
    pub participant_id: i32,
    pub position: Position,
    pub time_enemy_spent_controlled: i32,
    pub total_gold: i32,
    pub xp: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChampionStats {
    pub ability_haste: i32,
    pub ability_power: i32,
    pub armor: i32,
    pub armor_pen: i32,
    pub armor_pen_percent: i32,
    pub attack_damage: i32,
    pub attack_speed: i32,
    pub bonus_armor_pen_percent: i32,
    pub bonus_magic_pen_percent: i32,
    pub cc_reduction: i32,
    pub cooldown_reduction: i32,
    pub health: i32,
    pub health_max: i32,
    pub health_regen: i32,
    pub lifesteal: i32,
    pub magic_pen: i32,
    pub magic_pen_percent: i32,
    pub magic_resist: i32,
    pub movement_speed: i32,
    pub omnivamp: i32,
    pub physical_vamp: i32,
    pub power: i32,
    pub power_max: i32,
    pub power_regen: i32,
    pub spell_vamp: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DamageStats {
    pub magic_damage_done: i32,
    pub magic_damage_done_to_champions: i32,
    pub magic_damage_taken: i32,
    pub physical_damage_done: i32,
    pub physical_damage_done_to_champions: i32,
    pub physical_damage_taken: i32,
    pub total_damage_done: i32,
    pub total_damage_done_to_champions: i32,
    pub total_damage_taken: i32,
    pub true_damage_done: i32,
    pub true_damage_done_to_champions: i32,
    pub true_damage_taken: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimelineEventType {
    ChampionKill,
    ChampionSpecialKill,
    WardPlaced,
    WardKill,
    BuildingKill,
    EliteMonsterKill,
    TurretPlateDestroyed,
    ItemPurchased,
    ItemSold,
    ItemDestroyed,
    ItemUndo,
    SkillLevelUp,
    LevelUp,
    AscendedEvent,
    CapturePoint,
    PoroKingSummon,
    ChampionTransform,
    ObjectiveBountyPrestart,
    PauseEnd,
    GameEnd,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineEvent {
    #[serde(rename = "type")]
    pub event_type: TimelineEventType,
    pub timestamp: i64,
    pub participant_id: i32,
    pub killer_id: i32,
    pub victim_id: i32,
    pub creator_id: i32,
    pub assisting_participant_ids: Vec<i32>,
    pub team_id: i32,
    pub item_id: i32,
    pub before_id: i32,
    pub after_id: i32,
    pub skill_slot: i32,
    pub level_up_type: String,
    pub ward_type: String,
    pub monster_type: String,
    pub monster_sub_type: String,
    pub building_type: String,
    pub tower_type: String,
    pub lane_type: String,
    pub ascended_type: String,
    pub point_captured: String,
    pub transform_type: String,
    pub actual_start_time: i64,
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_frames_flattened_in_id_order() {
        let json = r#"{
            "timestamp": 60000,
            "participantFrames": {
                "10": {"participantId": 10, "totalGold": 900},
                "2": {"participantId": 2, "totalGold": 650, "position": {"x": 100, "y": 200}},
                "1": {"participantId": 1, "totalGold": 500}
            },
            "events": [
                {"type": "ITEM_PURCHASED", "timestamp": 1200, "participantId": 2, "itemId": 1055},
                {"type": "OBJECTIVE_BOUNTY_PRESTART", "timestamp": 1500},
                {"type": "SOMETHING_NEW", "timestamp": 1600}
            ]
        }"#;
        let frame: TimelineFrame = serde_json::from_str(json).unwrap();

        let ids: Vec<i32> = frame.participant_frames.iter().map(|f| f.participant_id).collect();
        assert_eq!(ids, vec![1, 2, 10]);
        assert_eq!(frame.participant_frames[1].position, Position { x: 100, y: 200 });

        assert_eq!(frame.events[0].event_type, TimelineEventType::ItemPurchased);
        assert_eq!(frame.events[0].item_id, 1055);
        assert_eq!(frame.events[1].event_type, TimelineEventType::ObjectiveBountyPrestart);
        assert_eq!(frame.events[2].event_type, TimelineEventType::Unknown);
    }

    #[test]
    fn test_frame_without_participant_frames() {
        let frame: TimelineFrame = serde_json::from_str(r#"{"timestamp": 0}"#).unwrap();
        assert!(frame.participant_frames.is_empty());
        assert!(frame.events.is_empty());
    }

    #[test]
    fn test_timeline_survives_reencoding() {
        let json = r#"{
            "metadata": {"matchId": "EUW1_9", "participants": ["a", "b"]},
            "info": {
                "frameInterval": 60000,
                "frames": [{
                    "timestamp": 60000,
                    "participantFrames": {
                        "2": {"participantId": 2, "totalGold": 650, "championStats": {"armor": 30}},
                        "1": {"participantId": 1, "totalGold": 500}
                    },
                    "events": [{"type": "CHAMPION_KILL", "killerId": 1, "victimId": 2}]
                }]
            }
        }"#;
        let timeline: MatchTimeline = serde_json::from_str(json).unwrap();

        let encoded = serde_json::to_value(&timeline).unwrap();
        let frames = &encoded["info"]["frames"][0]["participantFrames"];
        assert!(frames.is_object());
        assert_eq!(frames["2"]["totalGold"], 650);

        let decoded: MatchTimeline = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, timeline);
    }
}
