use serde::{Deserialize, Serialize};

/// Champions currently free to play.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChampionRotations {
    pub free_champion_ids: Vec<i32>,
    pub free_champion_ids_for_new_players: Vec<i32>,
    pub max_new_player_level: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_field_names() {
        let json = r#"{
            "freeChampionIds": [17, 22],
            "freeChampionIdsForNewPlayers": [1],
            "maxNewPlayerLevel": 10
        }"#;
        let rotation: ChampionRotations = serde_json::from_str(json).unwrap();
        assert_eq!(rotation.free_champion_ids, vec![17, 22]);
        assert_eq!(rotation.free_champion_ids_for_new_players, vec![1]);
        assert_eq!(rotation.max_new_player_level, 10);
    }
}
