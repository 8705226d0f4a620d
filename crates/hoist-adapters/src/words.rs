//! Random `adjective-noun` pairs for `--random-route` hostnames.

use uuid::Uuid;

use hoist_core::application::ports::WordGenerator;

const ADJECTIVES: &[&str] = &[
    "agile", "amber", "ancient", "bold", "brave", "bright", "calm", "candid", "clever", "cosmic",
    "crisp", "curious", "daring", "dapper", "eager", "fearless", "fluffy", "forgiving", "gentle",
    "glad", "grateful", "happy", "humble", "jolly", "keen", "kind", "lively", "lucky", "mellow",
    "merry", "nimble", "noble", "patient", "polite", "proud", "quick", "quiet", "rapid", "shiny",
    "silly", "sleek", "smart", "sunny", "swift", "tidy", "timely", "unique", "vivid", "wise",
    "zesty",
];

const NOUNS: &[&str] = &[
    "aardvark", "badger", "bison", "buffalo", "camel", "capybara", "cheetah", "coyote", "crane",
    "dingo", "dolphin", "eland", "elephant", "falcon", "ferret", "gazelle", "gecko", "giraffe",
    "gnu", "hedgehog", "heron", "hippo", "ibex", "impala", "jackal", "jaguar", "kangaroo",
    "koala", "lemur", "leopard", "lynx", "meerkat", "mongoose", "narwhal", "ocelot", "okapi",
    "otter", "panda", "pelican", "puma", "quokka", "raccoon", "rhino", "serval", "tapir",
    "toucan", "walrus", "wallaby", "wombat", "zebra",
];

/// Draws entropy from random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordPairGenerator;

impl WordPairGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl WordGenerator for WordPairGenerator {
    fn babble(&self) -> String {
        let (high, low) = Uuid::new_v4().as_u64_pair();
        let adjective = ADJECTIVES[(high % ADJECTIVES.len() as u64) as usize];
        let noun = NOUNS[(low % NOUNS.len() as u64) as usize];
        format!("{adjective}-{noun}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn babble_is_two_hostname_safe_words() {
        let generator = WordPairGenerator::new();
        for _ in 0..20 {
            let words = generator.babble();
            let (adjective, noun) = words.split_once('-').unwrap();
            assert!(ADJECTIVES.contains(&adjective));
            assert!(NOUNS.contains(&noun));
            assert!(words.chars().all(|c| c.is_ascii_lowercase() || c == '-'));
        }
    }
}
