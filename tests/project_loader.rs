use std::fs;

use screenpack::model::{LayerName, ScreenTile};
use screenpack::parser::load_from_json;

#[test]
fn parses_project_fixture() {
    let json = fs::read_to_string("tests/screen_project.json").unwrap();
    let proj = load_from_json(&json).expect("valid json");

    assert_eq!(proj.tiles.len(), 4);
    assert_eq!(proj.tile_banks.len(), 3);
    assert_eq!(proj.screens.len(), 2);

    // `enabled` defaults to true when absent
    assert!(proj.tile_banks[1].enabled);
    assert!(!proj.tile_banks[2].enabled);
    assert_eq!(proj.tile_banks[0].assigned_tiles["tree"].char_code, 4);
    assert_eq!(proj.tile("tree").unwrap().cells(proj.base_cell_size), (2, 2));
    assert!(proj.tile("Tree").is_none());

    let level = proj.screen("Level 1").unwrap();
    assert_eq!(proj.screen("screen_1").unwrap().name, "Level 1");
    let area = level.active_area();
    assert_eq!((area.x, area.y, area.width, area.height), (0, 0, 6, 3));

    let bg = level.layer(LayerName::Background);
    assert_eq!(bg.len(), 4);
    assert_eq!(bg[0][3], ScreenTile::part("tree", 1, 0));
    assert_eq!(bg[1][5], ScreenTile::default());
    assert!(level.layer(LayerName::Collision).is_empty());

    // no explicit active area: whole screen
    let title = proj.screen("Title Screen").unwrap().active_area();
    assert_eq!((title.width, title.height), (2, 1));
}
