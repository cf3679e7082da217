use std::collections::HashSet;

use hexbound_core::{Command, Event, HexCoord, ModuleChoice, PlayMode};
use hexbound_system_progression::{Config, Progression};
use hexbound_world::{self as world, query, World};

fn offers(commands: &[Command]) -> Vec<&[ModuleChoice]> {
    commands
        .iter()
        .filter_map(|command| match command {
            Command::OfferModules { choices } => Some(choices.as_slice()),
            _ => None,
        })
        .collect()
}

#[test]
fn level_up_offers_three_distinct_valid_sites() {
    let world = World::new();
    let sites = query::attachment_sites(&world);
    let mut progression = Progression::new(Config::new(9));
    let mut out = Vec::new();

    progression.handle(&[Event::LevelReached { level: 2 }], &sites, &mut out);

    let offered = offers(&out);
    assert_eq!(offered.len(), 1);
    let coords: HashSet<HexCoord> = offered[0].iter().map(|choice| choice.coord).collect();
    assert_eq!(coords.len(), 3);
    assert!(coords.iter().all(|coord| sites.contains(coord)));
}

#[test]
fn every_level_reached_gets_its_own_offer() {
    let world = World::new();
    let sites = query::attachment_sites(&world);
    let mut progression = Progression::new(Config::new(9));
    let mut out = Vec::new();

    progression.handle(
        &[
            Event::LevelReached { level: 2 },
            Event::LevelReached { level: 3 },
        ],
        &sites,
        &mut out,
    );

    assert_eq!(offers(&out).len(), 2);
}

#[test]
fn offers_are_capped_by_available_sites() {
    let sites = [HexCoord::new(1, 0)];
    let mut progression = Progression::new(Config::new(1));
    let mut out = Vec::new();

    progression.handle(&[Event::LevelReached { level: 2 }], &sites, &mut out);

    assert_eq!(offers(&out)[0].len(), 1);
}

#[test]
fn selecting_an_offer_grows_the_ship_and_resumes() {
    let mut world = World::new();
    let sites = query::attachment_sites(&world);
    let mut progression = Progression::new(Config::new(4));
    let mut commands = Vec::new();
    progression.handle(&[Event::LevelReached { level: 2 }], &sites, &mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    assert_eq!(query::play_mode(&world), PlayMode::Paused);
    let chosen = query::pending_offer(&world).expect("offer")[2];

    world::apply(&mut world, Command::SelectOffer { index: 2 }, &mut events);

    assert_eq!(query::play_mode(&world), PlayMode::Running);
    let cell = query::ship_view(&world)
        .cell_at(chosen.coord)
        .map(|cell| cell.cell.color);
    assert_eq!(cell, Some(chosen.color));
}

#[test]
fn equal_seeds_draw_equal_offers() {
    let world = World::new();
    let sites = query::attachment_sites(&world);
    let draw = |seed| {
        let mut progression = Progression::new(Config::new(seed));
        let mut out = Vec::new();
        progression.handle(&[Event::LevelReached { level: 2 }], &sites, &mut out);
        out
    };

    assert_eq!(draw(17), draw(17));
}
