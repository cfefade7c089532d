use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ratelimit::RequestDescriptor;

/// Match ids, most recent first.
pub type Matchlist = Vec<String>;

/// Filters for the matchlist endpoint. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchlistOptions {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Numeric queue id, e.g. 420
    pub queue: Option<u16>,
    /// Match type, e.g. `ranked`
    pub match_type: Option<String>,
    pub start: Option<u32>,
    pub count: Option<u32>,
}

impl MatchlistOptions {
    /// Append the set filters as query parameters, times as epoch seconds.
    pub fn apply(&self, descriptor: RequestDescriptor) -> RequestDescriptor {
        descriptor
            .with_optional_query("startTime", self.start_time.map(|t| t.timestamp()))
            .with_optional_query("endTime", self.end_time.map(|t| t.timestamp()))
            .with_optional_query("queue", self.queue)
            .with_optional_query("type", self.match_type.as_deref())
            .with_optional_query("start", self.start)
            .with_optional_query("count", self.count)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Match {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchMetadata {
    pub data_version: String,
    pub match_id: String,
    /// Participant puuids
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchInfo {
    pub game_creation: i64,
    /// Seconds for matches after patch 11.20, milliseconds before
    pub game_duration: i64,
    pub game_end_timestamp: i64,
    pub game_id: i64,
    pub game_mode: String,
    pub game_name: String,
    pub game_start_timestamp: i64,
    pub game_type: String,
    /// Full client version, e.g. `14.3.558.106`
    pub game_version: String,
    pub map_id: i32,
    pub participants: Vec<MatchParticipant>,
    pub platform_id: String,
    pub queue_id: i32,
    pub teams: Vec<MatchTeam>,
    pub tournament_code: String,
}

impl MatchInfo {
    /// Patch as `major.minor`, e.g. `14.3`.
    pub fn patch(&self) -> Option<String> {
        let mut parts = self.game_version.split('.');
        match (parts.next(), parts.next()) {
            (Some(major), Some(minor)) if !major.is_empty() && !minor.is_empty() => {
                Some(format!("{}.{}", major, minor))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchParticipant {
    pub all_in_pings: i32,
    pub assist_me_pings: i32,
    pub assists: i32,
    pub bait_pings: i32,
    pub baron_kills: i32,
    pub basic_pings: i32,
    pub bounty_level: i32,
    pub challenges: Option<ParticipantChallenges>,
    pub champ_experience: i32,
    pub champ_level: i32,
    pub champion_id: i32,
    pub champion_name: String,
    pub champion_transform: i32,
    pub command_pings: i32,
    pub consumables_purchased: i32,
    pub damage_dealt_to_buildings: i32,
    pub damage_dealt_to_objectives: i32,
    pub damage_dealt_to_turrets: i32,
    pub damage_self_mitigated: i32,
    pub danger_pings: i32,
    pub deaths: i32,
    pub detector_wards_placed: i32,
    pub double_kills: i32,
    pub dragon_kills: i32,
    pub eligible_for_progression: bool,
    pub enemy_missing_pings: i32,
    pub enemy_vision_pings: i32,
    pub first_blood_assist: bool,
    pub first_blood_kill: bool,
    pub first_tower_assist: bool,
    pub first_tower_kill: bool,
    pub game_ended_in_early_surrender: bool,
    pub game_ended_in_surrender: bool,
    pub get_back_pings: i32,
    pub gold_earned: i32,
    pub gold_spent: i32,
    pub hold_pings: i32,
    pub individual_position: String,
    pub inhibitor_kills: i32,
    pub inhibitor_takedowns: i32,
    pub inhibitors_lost: i32,
    pub item0: i32,
    pub item1: i32,
    pub item2: i32,
    pub item3: i32,
    pub item4: i32,
    pub item5: i32,
    pub item6: i32,
    pub items_purchased: i32,
    pub killing_sprees: i32,
    pub kills: i32,
    pub lane: String,
    pub largest_critical_strike: i32,
    pub largest_killing_spree: i32,
    pub largest_multi_kill: i32,
    pub longest_time_spent_living: i32,
    pub magic_damage_dealt: i32,
    pub magic_damage_dealt_to_champions: i32,
    pub magic_damage_taken: i32,
    pub need_vision_pings: i32,
    pub neutral_minions_killed: i32,
    pub nexus_kills: i32,
    pub nexus_lost: i32,
    pub nexus_takedowns: i32,
    pub objectives_stolen: i32,
    pub objectives_stolen_assists: i32,
    pub on_my_way_pings: i32,
    pub participant_id: i32,
    pub penta_kills: i32,
    pub perks: ParticipantPerks,
    pub physical_damage_dealt: i32,
    pub physical_damage_dealt_to_champions: i32,
    pub physical_damage_taken: i32,
    pub placement: i32,
    pub player_augment1: i32,
    pub player_augment2: i32,
    pub player_augment3: i32,
    pub player_augment4: i32,
    pub player_score0: i32,
    pub player_score1: i32,
    pub player_score10: i32,
    pub player_score11: i32,
    pub player_score2: i32,
    pub player_score3: i32,
    pub player_score4: i32,
    pub player_score5: i32,
    pub player_score6: i32,
    pub player_score7: i32,
    pub player_score8: i32,
    pub player_score9: i32,
    pub player_subteam_id: i32,
    pub played_champ_select_position: i32,
    pub profile_icon: i32,
    pub push_pings: i32,
    pub quadra_kills: i32,
    pub riot_id_game_name: String,
    pub riot_id_tagline: String,
    pub role: String,
    pub sight_wards_bought_in_game: i32,
    pub spell1_casts: i32,
    pub spell2_casts: i32,
    pub spell3_casts: i32,
    pub spell4_casts: i32,
    pub subteam_placement: i32,
    pub summoner1_casts: i32,
    pub summoner1_id: i32,
    pub summoner2_casts: i32,
    pub summoner2_id: i32,
    pub summoner_id: String,
    pub summoner_level: i32,
    pub summoner_name: String,
    pub puuid: String,
    pub team_early_surrendered: bool,
    pub team_id: i32,
    pub team_position: String,
    #[serde(rename = "timeCCingOthers")]
    pub time_ccing_others: i32,
    pub time_played: i32,
    pub total_ally_jungle_minions_killed: i32,
    pub total_damage_dealt: i32,
    pub total_damage_dealt_to_champions: i32,
    pub total_damage_shielded_on_teammates: i32,
    pub total_damage_taken: i32,
    pub total_enemy_jungle_minions_killed: i32,
    pub total_heal: i32,
    pub total_heals_on_teammates: i32,
    pub total_minions_killed: i32,
    #[serde(rename = "totalTimeCCDealt")]
    pub total_time_cc_dealt: i32,
    pub total_time_spent_dead: i32,
    pub total_units_healed: i32,
    pub triple_kills: i32,
    pub true_damage_dealt: i32,
    pub true_damage_dealt_to_champions: i32,
    pub true_damage_taken: i32,
    pub turret_kills: i32,
    pub turret_takedowns: i32,
    pub turrets_lost: i32,
    pub unreal_kills: i32,
    pub vision_cleared_pings: i32,
    pub vision_score: i32,
    pub vision_wards_bought_in_game: i32,
    pub wards_killed: i32,
    pub wards_placed: i32,
    pub win: bool,
}

/// Per-player challenge statistics. Absent from older matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantChallenges {
    #[serde(rename = "12AssistStreakCount")]
    pub assist12_streak_count: i32,
    pub ability_uses: i32,
    pub aces_before15_minutes: i32,
    pub allied_jungle_monster_kills: i32,
    pub baron_buff_gold_advantage_over_threshold: i32,
    pub baron_takedowns: i32,
    pub blast_cone_opposite_opponent_count: i32,
    pub bounty_gold: i32,
    pub buffs_stolen: i32,
    pub complete_support_quest_in_time: i32,
    pub control_ward_time_coverage_in_river_or_enemy_half: f64,
    pub control_wards_placed: i32,
    pub damage_per_minute: f64,
    pub damage_taken_on_team_percentage: f64,
    pub danced_with_rift_herald: i32,
    pub deaths_by_enemy_champs: i32,
    pub dodge_skill_shots_small_window: i32,
    pub double_aces: i32,
    pub dragon_takedowns: i32,
    pub earliest_baron: f64,
    pub earliest_dragon_takedown: f64,
    pub early_laning_phase_gold_exp_advantage: f64,
    pub effective_heal_and_shielding: f64,
    pub elder_dragon_kills_with_opposing_soul: i32,
    pub elder_dragon_multikills: i32,
    pub enemy_champion_immobilizations: i32,
    pub enemy_jungle_monster_kills: i32,
    pub epic_monster_kills_near_enemy_jungler: i32,
    pub epic_monster_kills_within30_seconds_of_spawn: i32,
    pub epic_monster_steals: i32,
    pub fastest_legendary: f64,
    pub epic_monster_stolen_without_smite: i32,
    pub first_turret_killed: i32,
    pub first_turret_killed_time: f64,
    pub flawless_aces: i32,
    pub full_team_takedown: i32,
    pub game_length: f64,
    pub get_takedowns_in_all_lanes_early_jungle_as_laner: i32,
    pub gold_per_minute: f64,
    pub had_open_nexus: i32,
    pub immobilize_and_kill_with_ally: i32,
    pub initial_buff_count: i32,
    pub initial_crab_count: i32,
    pub jungle_cs_before10_minutes: f64,
    pub jungler_takedowns_near_damaged_epic_monster: i32,
    pub k_turrets_destroyed_before_plates_fall: i32,
    pub kda: f64,
    pub kill_after_hidden_with_ally: i32,
    pub kill_participation: f64,
    pub killed_champ_took_full_team_damage_survived: i32,
    pub killing_sprees: i32,
    pub kills_near_enemy_turret: i32,
    pub kills_on_other_lanes_early_jungle_as_laner: i32,
    pub kills_on_recently_healed_by_aram_pack: i32,
    pub kills_under_own_turret: i32,
    pub kills_with_help_from_epic_monster: i32,
    pub knock_enemy_into_team_and_kill: i32,
    pub land_skill_shots_early_game: i32,
    pub lane_minions_first10_minutes: i32,
    pub laning_phase_gold_exp_advantage: f64,
    pub legendary_count: i32,
    pub lost_an_inhibitor: i32,
    pub max_cs_advantage_on_lane_opponent: f64,
    pub max_kill_deficit: i32,
    pub max_level_lead_lane_opponent: i32,
    pub mejais_full_stack_in_time: i32,
    pub more_enemy_jungle_than_opponent: f64,
    pub multi_kill_one_spell: i32,
    pub multi_turret_rift_herald_count: i32,
    pub multikills: i32,
    pub multikills_after_aggressive_flash: i32,
    pub mythic_item_used: i32,
    pub outer_turret_executes_before10_minutes: i32,
    pub outnumbered_kills: i32,
    pub outnumbered_nexus_kill: i32,
    pub perfect_dragon_souls_taken: i32,
    pub perfect_game: i32,
    pub pick_kill_with_ally: i32,
    pub played_champ_select_position: i32,
    pub poro_explosions: i32,
    pub quick_cleanse: i32,
    pub quick_first_turret: i32,
    pub quick_solo_kills: i32,
    pub rift_herald_takedowns: i32,
    pub save_ally_from_death: i32,
    pub scuttle_crab_kills: i32,
    pub shortest_time_to_ace_from_first_takedown: f64,
    pub skillshots_dodged: i32,
    pub skillshots_hit: i32,
    pub snowballs_hit: i32,
    pub solo_baron_kills: i32,
    pub solo_kills: i32,
    pub solo_turrets_lategame: i32,
    pub stealth_wards_placed: i32,
    pub survived_single_digit_hp_count: i32,
    pub survived_three_immobilizes_in_fight: i32,
    pub takedown_on_first_turret: i32,
    pub takedowns: i32,
    pub takedowns_after_gaining_level_advantage: i32,
    pub takedowns_before_jungle_minion_spawn: i32,
    pub takedowns_first_x_minutes: i32,
    pub takedowns_in_alcove: i32,
    pub takedowns_in_enemy_fountain: i32,
    pub team_baron_kills: i32,
    pub team_damage_percentage: f64,
    pub team_elder_dragon_kills: i32,
    pub team_rift_herald_kills: i32,
    pub three_wards_one_sweeper_count: i32,
    pub took_large_damage_survived: i32,
    pub turret_plates_taken: i32,
    pub turret_takedowns: i32,
    pub turrets_taken_with_rift_herald: i32,
    pub twenty_minions_in3_seconds_count: i32,
    pub two_wards_one_sweeper_count: i32,
    pub unseen_recalls: i32,
    pub vision_score_advantage_lane_opponent: f64,
    pub vision_score_per_minute: f64,
    pub ward_takedowns: i32,
    #[serde(rename = "wardTakedownsBefore20M")]
    pub ward_takedowns_before_20m: i32,
    pub wards_guarded: i32,
}

/// Runes chosen by a participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParticipantPerks {
    pub stat_perks: StatPerks,
    pub styles: Vec<PerkStyle>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatPerks {
    pub defense: i32,
    pub flex: i32,
    pub offense: i32,
}

/// A rune tree and the runes picked from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerkStyle {
    pub description: String,
    pub selections: Vec<PerkSelection>,
    pub style: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerkSelection {
    pub perk: i32,
    pub var1: i32,
    pub var2: i32,
    pub var3: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchTeam {
    pub team_id: i32,
    pub win: bool,
    pub bans: Vec<TeamBan>,
    pub objectives: TeamObjectives,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamBan {
    pub champion_id: i32,
    pub pick_turn: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamObjectives {
    pub baron: TeamObjective,
    pub champion: TeamObjective,
    pub dragon: TeamObjective,
    pub horde: TeamObjective,
    pub inhibitor: TeamObjective,
    pub rift_herald: TeamObjective,
    pub tower: TeamObjective,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamObjective {
    pub first: bool,
    pub kills: i32,
}
