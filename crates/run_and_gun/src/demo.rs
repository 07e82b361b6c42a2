//! Built-in level and scripted input for headless runs

use platformer_engine::input::{Actions, InputState};
use platformer_engine::level::{Layer, LayerContent, LevelData, MapObject, TilePlacement};

fn object(name: &str, x: f32, y: f32, width: f32, height: f32) -> MapObject {
    MapObject {
        name: name.to_string(),
        x,
        y,
        width,
        height,
        gid: None,
    }
}

fn tiles(cells: impl IntoIterator<Item = (i32, i32)>) -> LayerContent {
    LayerContent::Tiles(
        cells
            .into_iter()
            .map(|(column, row)| TilePlacement { column, row, gid: 1 })
            .collect(),
    )
}

fn layer(name: &str, content: LayerContent) -> Layer {
    Layer {
        name: name.to_string(),
        content,
    }
}

/// Small level: a long floor, a wall, an enemy and one moving platform
pub fn demo_level() -> LevelData {
    let floor = (0..60).map(|column| (column, 20));
    let wall = (17..20).map(|row| (40, row));
    let ledge = (44..48).map(|column| (column, 10));

    let mut platform = object("Platform", 1600.0, 600.0, 96.0, 16.0);
    platform.gid = Some(2);

    LevelData {
        tile_width: 32.0,
        tile_height: 32.0,
        layers: vec![
            layer("BG", tiles([])),
            layer("BG Detail", tiles([])),
            layer("Level", tiles(floor.chain(wall).chain(ledge))),
            layer("FG Detail Bottom", tiles([])),
            layer("FG Detail Top", tiles([])),
            layer(
                "Entities",
                LayerContent::Objects(vec![
                    object("Player", 64.0, 560.0, 40.0, 64.0),
                    object("Enemy", 700.0, 590.0, 40.0, 64.0),
                ]),
            ),
            layer(
                "Platforms",
                LayerContent::Objects(vec![
                    platform,
                    object("Border", 1600.0, 280.0, 96.0, 16.0),
                    object("Border", 1600.0, 620.0, 96.0, 16.0),
                ]),
            ),
        ],
    }
}

/// Input held at `step` of the scripted run
///
/// Walks right while shooting, hops periodically and ducks now and then.
pub fn scripted_input(step: u64) -> InputState {
    let mut input = InputState::default();
    input.set(Actions::RIGHT, step % 400 < 300);
    input.set(Actions::FIRE, step % 20 < 2);
    input.set(Actions::UP, step % 90 == 45);
    input.set(Actions::DOWN, step % 400 >= 360);
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use platformer_engine::input::InputSource;
    use platformer_engine::level::LevelSource;

    #[test]
    fn test_demo_level_layers_match_depths() {
        let level = demo_level();
        for (name, depth) in crate::session::LAYER_DEPTHS {
            assert_eq!(level.layer_index(name), Some(depth as usize));
        }
        assert!(level.find_object("Entities", "Player").is_ok());
    }

    #[test]
    fn test_scripted_input() {
        assert!(scripted_input(0).is_pressed(Actions::RIGHT | Actions::FIRE));
        assert!(scripted_input(45).is_pressed(Actions::UP));
        assert!(!scripted_input(320).is_pressed(Actions::RIGHT));
        assert!(scripted_input(370).is_pressed(Actions::DOWN));
    }
}
