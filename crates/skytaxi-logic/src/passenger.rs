//! Passenger identity, personality and dialogue lines.
//!
//! Personality is picked at random when a mission is created; urgency and
//! chattiness follow deterministically from it. Dialogue lines are chosen
//! once at creation and never change afterwards.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::names::passenger_name;

// ============================================================================
// PERSONALITY
// ============================================================================

/// Fixed personality enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityType {
    Businesslike,
    Friendly,
    Impatient,
    Nervous,
    Casual,
}

impl PersonalityType {
    pub const ALL: [PersonalityType; 5] = [
        PersonalityType::Businesslike,
        PersonalityType::Friendly,
        PersonalityType::Impatient,
        PersonalityType::Nervous,
        PersonalityType::Casual,
    ];

    /// Inclusive urgency range (0.0 relaxed .. 1.0 frantic).
    pub fn urgency_range(self) -> (f32, f32) {
        match self {
            PersonalityType::Businesslike => (0.5, 0.7),
            PersonalityType::Friendly => (0.2, 0.4),
            PersonalityType::Impatient => (0.8, 1.0),
            PersonalityType::Nervous => (0.6, 0.8),
            PersonalityType::Casual => (0.1, 0.3),
        }
    }

    /// Chatty passengers make small talk during the ride.
    pub fn is_chatty(self) -> bool {
        match self {
            PersonalityType::Businesslike | PersonalityType::Impatient => false,
            PersonalityType::Friendly | PersonalityType::Nervous | PersonalityType::Casual => true,
        }
    }
}

/// A rolled personality: type plus the derived traits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    #[serde(rename = "type")]
    pub kind: PersonalityType,
    pub urgency: f32,
    pub chatty: bool,
}

impl Personality {
    pub fn roll(rng: &mut impl Rng) -> Self {
        let kind = PersonalityType::ALL[rng.gen_range(0..PersonalityType::ALL.len())];
        Self::with_kind(kind, rng)
    }

    pub fn with_kind(kind: PersonalityType, rng: &mut impl Rng) -> Self {
        let (lo, hi) = kind.urgency_range();
        Self {
            kind,
            urgency: rng.gen_range(lo..=hi),
            chatty: kind.is_chatty(),
        }
    }
}

// ============================================================================
// DIALOGUE
// ============================================================================

/// Which line a speech cue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Spoken when the passenger appears.
    Greeting,
    /// Spoken on pickup; names the destination.
    Destination,
    /// Spoken on delivery.
    Farewell,
    /// Chatty passengers only, during the ride.
    SmallTalk,
}

/// Lines fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLines {
    pub greeting: String,
    pub destination: String,
    pub farewell: String,
    pub small_talk: Option<String>,
}

impl DialogueLines {
    pub fn generate(personality: &Personality, destination_id: &str, rng: &mut impl Rng) -> Self {
        let kind = personality.kind;
        let greeting = pick(greeting_templates(kind), rng).to_string();
        let destination =
            pick(destination_templates(kind), rng).replace("{destination}", destination_id);
        let farewell = pick(farewell_templates(kind), rng).to_string();
        let small_talk = if personality.chatty {
            Some(pick(SMALL_TALK, rng).to_string())
        } else {
            None
        };

        Self {
            greeting,
            destination,
            farewell,
            small_talk,
        }
    }

    pub fn line(&self, kind: LineKind) -> Option<&str> {
        match kind {
            LineKind::Greeting => Some(&self.greeting),
            LineKind::Destination => Some(&self.destination),
            LineKind::Farewell => Some(&self.farewell),
            LineKind::SmallTalk => self.small_talk.as_deref(),
        }
    }
}

fn pick(lines: &[&'static str], rng: &mut impl Rng) -> &'static str {
    lines[rng.gen_range(0..lines.len())]
}

fn greeting_templates(kind: PersonalityType) -> &'static [&'static str] {
    match kind {
        PersonalityType::Businesslike => &["Taxi. I have a meeting.", "Good, you're here."],
        PersonalityType::Friendly => &["Hey there, taxi!", "Hi! Over here!"],
        PersonalityType::Impatient => &["Taxi! Hurry up!", "Finally. Come on!"],
        PersonalityType::Nervous => &["Um, taxi? Please?", "Is this... is this the taxi?"],
        PersonalityType::Casual => &["Yo, taxi.", "Hey. Got room?"],
    }
}

fn destination_templates(kind: PersonalityType) -> &'static [&'static str] {
    match kind {
        PersonalityType::Businesslike => &["Pad {destination}, please.", "{destination}. Promptly."],
        PersonalityType::Friendly => &[
            "Could you take me to {destination}? Thanks!",
            "{destination}, please!",
        ],
        PersonalityType::Impatient => &["{destination}, and step on it!", "{destination}! Go go go!"],
        PersonalityType::Nervous => &[
            "{destination}, if that's okay? Carefully?",
            "I need to get to {destination}... safely.",
        ],
        PersonalityType::Casual => &["{destination}, whenever.", "Drop me at {destination}."],
    }
}

fn farewell_templates(kind: PersonalityType) -> &'static [&'static str] {
    match kind {
        PersonalityType::Businesslike => &["Adequate.", "Thank you."],
        PersonalityType::Friendly => &["Thanks so much!", "You're the best!"],
        PersonalityType::Impatient => &["About time.", "Finally!"],
        PersonalityType::Nervous => &["Oh thank goodness.", "We made it!"],
        PersonalityType::Casual => &["Later.", "Cheers."],
    }
}

static SMALL_TALK: &[&str] = &[
    "Busy day at the station, huh?",
    "Did you hear about the docking ring repairs?",
    "I love the view out here.",
    "How long have you been flying taxis?",
];

// ============================================================================
// PASSENGER
// ============================================================================

/// A passenger bound to one mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: u32,
    pub name: String,
    pub pickup_platform_id: String,
    pub destination_platform_id: String,
    pub personality: Personality,
    pub dialogue: DialogueLines,
    pub is_picked_up: bool,
    pub is_delivered: bool,
}

impl Passenger {
    pub fn generate(id: u32, pickup: &str, destination: &str, rng: &mut impl Rng) -> Self {
        let name = passenger_name(rng);
        let personality = Personality::roll(rng);
        let dialogue = DialogueLines::generate(&personality, destination, rng);
        Self {
            id,
            name,
            pickup_platform_id: pickup.to_string(),
            destination_platform_id: destination.to_string(),
            personality,
            dialogue,
            is_picked_up: false,
            is_delivered: false,
        }
    }
}
