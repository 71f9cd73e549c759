//! Human-readable room titles.
//!
//! Titles are three-word slugs such as `amber-quiet-falcon`. They are
//! for display only; rooms are addressed by [`RoomId`](party_protocol::RoomId).

use rand::seq::IndexedRandom;

const ADJECTIVES: &[&str] = &[
    "amber", "bold", "brisk", "calm", "cosmic", "crimson", "dapper", "eager",
    "fancy", "gentle", "golden", "hidden", "jolly", "keen", "lively", "lucky",
    "mellow", "misty", "neon", "noble", "quiet", "rapid", "rustic", "silver",
    "sleek", "spry", "sunny", "swift", "tidal", "vivid", "wild", "zesty",
];

const NOUNS: &[&str] = &[
    "arrow", "badger", "beacon", "cadence", "comet", "falcon", "fiddle",
    "harbor", "heron", "lantern", "meadow", "melody", "otter", "panda",
    "pulse", "quasar", "raven", "rhythm", "sparrow", "tempo", "thunder",
    "tiger", "trumpet", "vortex", "walrus", "willow",
];

/// Generates a random `adjective-adjective-noun` title.
pub fn generate_title() -> String {
    let mut rng = rand::rng();
    let first = ADJECTIVES.choose(&mut rng).copied().unwrap_or("quiet");
    let second = ADJECTIVES.choose(&mut rng).copied().unwrap_or("lively");
    let noun = NOUNS.choose(&mut rng).copied().unwrap_or("rhythm");
    format!("{first}-{second}-{noun}")
}
