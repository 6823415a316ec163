//! A small, complete sample case for tests.

use crate::case::CaseModel;
use crate::encounter::{EncounterGraph, Location, Presence, SightingEdge, TimeSlot};
use crate::entities::{Clue, Suspect, Victim};

/// Four suspects at Byte Manor; the heiress did it, in the study.
pub fn sample_case() -> CaseModel {
    let suspects = vec![
        Suspect::new("Ada Syntax", "the heiress")
            .with_personality("charming, calculating")
            .with_alibi("I was taking the air in the garden.")
            .with_secret("I forged my father's signature on the new will.")
            .with_clue("Father argued with someone on the telephone before dinner.")
            .with_location_hint("the wine cellar")
            .guilty(Some("struck him with the brass candlestick".to_string())),
        Suspect::new("Bram Holloway", "the butler")
            .with_personality("formal, loyal")
            .with_alibi("I was polishing the silver in the library.")
            .with_secret("I have been selling the family silver piece by piece.")
            .with_clue("The study door was locked from the inside at half past eight.")
            .with_location_hint("the library desk"),
        Suspect::new("Clara Voss", "the cook")
            .with_personality("blunt, warm")
            .with_alibi("I was in the kitchen plating dessert.")
            .with_secret("I am the victim's illegitimate daughter.")
            .with_clue("Someone took a candle from the kitchen drawer."),
        Suspect::new("Dorian Pike", "the gardener")
            .with_personality("quiet, observant")
            .with_alibi("I was returning a book to the library.")
            .with_secret("I was fired last week and never told anyone.")
            .with_clue("The garden gate was latched all evening.")
            .with_location_hint("the greenhouse"),
    ];

    let clues = vec![
        Clue::new("clue_1", "Candle wax on the study rug", "study")
            .with_significance("Someone carried a candle into the study"),
        Clue::new("clue_2", "Undisturbed dew on the garden bench", "garden")
            .with_significance("Nobody sat in the garden after dinner"),
        Clue::new("clue_3", "A half-burnt love letter", "library")
            .with_significance("An old affair, unrelated to the murder")
            .red_herring(),
    ];

    match CaseModel::new(
        "Byte Manor, a stormy autumn dinner party",
        Victim::new("Lord Reginald Byte", "A collector who rewrote his will weekly"),
        "the heiress",
        "a brass candlestick",
        "she was about to be written out of the will",
        suspects,
        clues,
    ) {
        Ok(case) => case,
        Err(err) => panic!("sample case is invalid: {err}"),
    }
}

/// The encounter graph matching [`sample_case`].
pub fn sample_graph() -> EncounterGraph {
    let critical = TimeSlot::CriticalWindow;
    let dinner = TimeSlot::DinnerMain;
    let gathering = TimeSlot::DinnerStart;

    let locations = vec![
        Location::new("library", "Library").adjacent_to(["hall"]),
        Location::new("hall", "Great Hall").adjacent_to(["library", "dining_room", "study"]),
        Location::new("dining_room", "Dining Room").adjacent_to(["hall", "kitchen"]),
        Location::new("kitchen", "Kitchen").adjacent_to(["dining_room"]),
        Location::new("garden", "Garden"),
        Location::new("study", "Study")
            .private()
            .murder_scene()
            .adjacent_to(["hall"]),
    ];

    let mut presences = vec![
        Presence::truthful("the heiress", "hall", gathering, "greeting guests"),
        Presence::truthful("the cook", "hall", gathering, "announcing dinner"),
        Presence::fabricated("the heiress", "garden", "study", critical, "taking the air"),
        Presence::truthful("the butler", "library", critical, "polishing silver"),
        Presence::truthful("the gardener", "library", critical, "returning a book"),
        Presence::truthful("the cook", "kitchen", critical, "plating dessert"),
    ];
    for role in ["the heiress", "the butler", "the cook", "the gardener"] {
        presences.push(Presence::truthful(role, "dining_room", dinner, "eating dinner"));
    }

    let sightings = vec![
        SightingEdge::new("the gardener", "the butler", "library", critical)
            .mutual()
            .with_claim_text("I saw the butler polishing silver in the library."),
        SightingEdge::new("the heiress", "the cook", "garden", critical)
            .false_claim()
            .with_claim_text("The cook came out to the garden for some mint."),
        SightingEdge::new("the cook", "the heiress", "hall", gathering)
            .with_claim_text("Miss Syntax was greeting guests in the hall."),
    ];

    match EncounterGraph::new(locations, presences, sightings, "the heiress", "study") {
        Ok(graph) => graph,
        Err(err) => panic!("sample graph is invalid: {err}"),
    }
}
