use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::card::Character::{Ambassador, Assassin, Captain, Contessa, Duke};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Character {
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
}

pub static CHARACTER_VARIANTS: [Character; 5] = [
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
];

// copies of each character in a fresh deck
pub const COPIES_PER_CHARACTER: usize = 3;

pub const TOTAL_CARDS: usize = CHARACTER_VARIANTS.len() * COPIES_PER_CHARACTER;

impl Display for Character {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Duke => "Duke",
            Assassin => "Assassin",
            Captain => "Captain",
            Ambassador => "Ambassador",
            Contessa => "Contessa",
        };
        f.write_str(name)
    }
}

/// One influence card. Two cards are equal when they show the same character.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(Character);

impl Card {
    pub const fn new(character: Character) -> Self {
        Self(character)
    }

    pub const fn character(self) -> Character {
        self.0
    }

    pub fn is(self, character: Character) -> bool {
        self.0 == character
    }
}

impl From<Character> for Card {
    fn from(character: Character) -> Self {
        Card(character)
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}
