use std::ops::Index;
use std::slice;

use serde::Serialize;

use crate::types::{Author, Turn};

/// The ordered history of turns for a session, oldest first.
///
/// A transcript only grows: turns can be appended from inside the crate but
/// never removed, replaced or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript that opens with an agent greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::agent(greeting)],
        }
    }

    pub(crate) fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    /// The number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if there are no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The turn at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    /// The most recent turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Iterate over turns, oldest first.
    pub fn iter(&self) -> slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    /// The number of turns written by `author`.
    pub fn count_by(&self, author: Author) -> usize {
        self.turns.iter().filter(|t| t.author() == author).count()
    }
}

impl Index<usize> for Transcript {
    type Output = Turn;

    fn index(&self, index: usize) -> &Turn {
        &self.turns[index]
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
