/// Canned content the "AI" picks from
use std::ops::RangeInclusive;

/// Possible ugliness scores
pub const SCORE_RANGE: RangeInclusive<u8> = 70..=99;

/// Largest number of overlay filters on one result
pub const MAX_FILTERS: usize = 3;

pub const ROASTS: [&str; 10] = [
    "87% Goblin DNA detected. Your face scared my backend server! 👹",
    "Analysis complete: 94% chance of being mistaken for a potato 🥔",
    "Error 404: Attractiveness not found. Please try again with a different face 😂",
    "AI crashed trying to process this image. Congratulations! 🤖💥",
    "92% Troll genetics confirmed. Bridge trolling license approved 🌉",
    "Warning: Face may cause spontaneous laughter in viewers 😂",
    "Detected: 89% Shrek similarity. Swamp residency recommended 🧌",
    "System overload: Ugliness levels exceed maximum parameters 📊",
    "Analysis: Your face is a perfect advertisement for plastic surgery 💉",
    "Congratulations! You've unlocked the 'Unique' achievement 🏆",
];
