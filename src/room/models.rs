use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Per-choice vote counts keyed by choice key
pub type Tally = BTreeMap<String, u32>;

/// The fixed answer slots every poll is created with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Choice {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Choice {
    /// Wire key of this choice ("1".."4")
    pub fn key(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// Question text plus the labels of each choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionView {
    pub question: String,
    pub choices: BTreeMap<String, String>,
}

/// In-memory state of one live poll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomModel {
    pub id: String,                    // Short uppercase room code
    pub owner: String,                 // Presenter token, fixed at creation
    pub owner_channel: Option<String>, // Connection id of the presenter's current socket
    pub question: String,
    pub choices: BTreeMap<String, String>, // choice key -> label
    pub votes: HashMap<String, String>,    // voter token -> choice key
}

impl RoomModel {
    /// Creates an empty poll owned by `owner`
    pub fn new(id: String, owner: String) -> Self {
        let choices = Choice::iter()
            .map(|choice| (choice.key(), String::new()))
            .collect();

        Self {
            id,
            owner,
            owner_channel: None,
            question: String::new(),
            choices,
            votes: HashMap::new(),
        }
    }

    /// Points the owner channel at `connection_id`, replacing any previous one
    pub fn set_owner_channel(&mut self, connection_id: String) {
        self.owner_channel = Some(connection_id);
    }

    /// Clears the owner channel, but only if it still points at `connection_id`
    pub fn release_owner_channel(&mut self, connection_id: &str) -> bool {
        if self.owner_channel.as_deref() == Some(connection_id) {
            self.owner_channel = None;
            return true;
        }
        false
    }

    /// Records `answer` for `token`; a later vote from the same token replaces the earlier one
    pub fn vote(&mut self, token: String, answer: String) {
        self.votes.insert(token, answer);
    }

    pub fn clear_votes(&mut self) {
        self.votes.clear();
    }

    /// Counts current votes per choice.
    ///
    /// The four fixed choices are always present. Answers outside of them are
    /// still counted, under a bucket named after the answer itself.
    pub fn tally(&self) -> Tally {
        let mut tally: Tally = Choice::iter().map(|choice| (choice.key(), 0)).collect();
        for answer in self.votes.values() {
            *tally.entry(answer.clone()).or_insert(0) += 1;
        }
        tally
    }

    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }

    pub fn question_view(&self) -> QuestionView {
        QuestionView {
            question: self.question.clone(),
            choices: self.choices.clone(),
        }
    }
}
