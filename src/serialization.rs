//! Field-map encoding for configs, rooms and grids.
//!
//! Every value encodes to a flat `serde_json::Map` of field name to primitive
//! value, and decodes back to an equal value. Enums are written by their
//! stable names, never by ordinal.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{DungeonConfig, GenerationAlgorithm};
use crate::error::DungeonError;
use crate::grid::TileGrid;
use crate::room::Room;

/// Field name to value
pub type FieldMap = Map<String, Value>;

fn to_field_map<S: Serialize>(value: &S) -> Result<FieldMap, DungeonError> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(DungeonError::Decode(format!("expected an object, got {other}"))),
    }
}

fn from_field_map<D: DeserializeOwned>(fields: &FieldMap) -> Result<D, DungeonError> {
    Ok(serde_json::from_value(Value::Object(fields.clone()))?)
}

pub fn encode_config(config: &DungeonConfig) -> Result<FieldMap, DungeonError> {
    to_field_map(config)
}

/// Decode a config. Missing fields take their [`Default`] values; an unknown
/// algorithm name is reported as [`ConfigError::UnknownAlgorithm`](crate::error::ConfigError::UnknownAlgorithm).
pub fn decode_config(fields: &FieldMap) -> Result<DungeonConfig, DungeonError> {
    if let Some(tag) = fields.get("algorithm") {
        let name = tag
            .as_str()
            .ok_or_else(|| DungeonError::Decode(format!("algorithm must be a string, got {tag}")))?;
        name.parse::<GenerationAlgorithm>()?;
    }
    from_field_map(fields)
}

/// The room's rectangle is flattened into `x`, `y`, `width` and `height`
pub fn encode_room<T: Serialize>(room: &Room<T>) -> Result<FieldMap, DungeonError> {
    to_field_map(room)
}

pub fn decode_room<T: DeserializeOwned + Default>(fields: &FieldMap) -> Result<Room<T>, DungeonError> {
    from_field_map(fields)
}

pub fn encode_grid(grid: &TileGrid) -> Result<FieldMap, DungeonError> {
    to_field_map(grid)
}

/// Rejects grids whose tile count does not match their dimensions
pub fn decode_grid(fields: &FieldMap) -> Result<TileGrid, DungeonError> {
    from_field_map(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    use crate::error::ConfigError;
    use crate::room::{Rect, RoomTemplate, ROOM_TYPE_CAVE};
    use crate::tile::Tile;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Loot {
        gold: u32,
        guardian: String,
    }

    fn fields(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("test input must be an object"),
        }
    }

    #[test]
    fn test_config_round_trip() {
        for config in [
            DungeonConfig::castle(Some(77)).with_name("keep"),
            DungeonConfig::cave(None).with_cave_params(0.52, 7),
            DungeonConfig::default().with_room_size(3, 9),
        ] {
            let encoded = encode_config(&config).unwrap();
            assert_eq!(decode_config(&encoded).unwrap(), config);
        }
    }

    #[test]
    fn test_algorithm_encoded_by_name() {
        let encoded = encode_config(&DungeonConfig::castle(None)).unwrap();
        assert_eq!(encoded["algorithm"], json!("BINARY_SPACE_PARTITION"));
        assert_eq!(encoded["seed"], Value::Null);
        assert_eq!(encoded["width"], json!(40));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = decode_config(&fields(json!({
            "name": "tiny",
            "width": 12,
            "height": 10,
            "seed": 5
        })))
        .unwrap();
        assert_eq!(config.name, "tiny");
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.algorithm, GenerationAlgorithm::RandomRooms);
        assert_eq!(config.min_partition_size, DungeonConfig::default().min_partition_size);
    }

    #[test]
    fn test_unknown_algorithm_is_config_error() {
        let err = decode_config(&fields(json!({ "algorithm": "MAZE" }))).unwrap_err();
        assert_eq!(
            err,
            DungeonError::Configuration(ConfigError::UnknownAlgorithm("MAZE".to_string()))
        );
    }

    #[test]
    fn test_malformed_field_is_decode_error() {
        let err = decode_config(&fields(json!({ "width": "wide" }))).unwrap_err();
        assert!(matches!(err, DungeonError::Decode(_)));
        let err = decode_config(&fields(json!({ "algorithm": 2 }))).unwrap_err();
        assert!(matches!(err, DungeonError::Decode(_)));
    }

    #[test]
    fn test_room_fields_are_flat() {
        let room: Room = Room::new(Rect::new(3, 4, 5, 6), ROOM_TYPE_CAVE);
        let encoded = encode_room(&room).unwrap();
        assert_eq!(encoded["x"], json!(3));
        assert_eq!(encoded["height"], json!(6));
        assert_eq!(encoded["room_id"], json!("room_3_4"));
        assert_eq!(encoded["room_type"], json!("cave"));
        assert_eq!(decode_room::<()>(&encoded).unwrap(), room);
    }

    #[test]
    fn test_room_payload_round_trip() {
        let loot = Loot {
            gold: 250,
            guardian: "wyrm".to_string(),
        };
        let room = RoomTemplate::quest(6, 4)
            .with_id("hoard")
            .with_data(loot.clone())
            .place_at(10, 2);

        let encoded = encode_room(&room).unwrap();
        assert_eq!(encoded["data"]["gold"], json!(250));
        let decoded: Room<Loot> = decode_room(&encoded).unwrap();
        assert_eq!(decoded, room);
        assert_eq!(decoded.data, loot);
    }

    #[test]
    fn test_room_without_payload_gets_default() {
        let decoded: Room<Loot> = decode_room(&fields(json!({
            "x": 1, "y": 1, "width": 2, "height": 2,
            "room_id": "a", "room_type": "normal"
        })))
        .unwrap();
        assert_eq!(decoded.data, Loot::default());
    }

    #[test]
    fn test_grid_round_trip() {
        let mut grid = TileGrid::new(4, 3, Tile::wall()).unwrap();
        grid.set(1, 1, Tile::floor()).unwrap();
        grid.set(2, 1, Tile::door()).unwrap();
        let encoded = encode_grid(&grid).unwrap();
        assert_eq!(decode_grid(&encoded).unwrap(), grid);
    }

    #[test]
    fn test_grid_with_wrong_tile_count_is_rejected() {
        let err = decode_grid(&fields(json!({ "width": 3, "height": 3, "tiles": [] }))).unwrap_err();
        assert!(matches!(err, DungeonError::Decode(_)));
    }
}
