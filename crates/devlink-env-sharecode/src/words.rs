// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Built-in word lists for share codes.

pub const MIN_WORD_LENGTH: usize = 2;
pub const MAX_WORD_LENGTH: usize = 12;

pub const ADJECTIVES: &[&str] = &[
	"blue", "red", "green", "yellow", "purple", "orange", "pink", "brown", "black", "white", "gray",
	"silver", "gold", "navy", "teal", "coral", "lime", "indigo", "violet", "maroon", "olive",
	"cyan", "magenta", "fast", "slow", "big", "small", "tall", "short", "wide", "narrow", "bright",
	"dark", "light", "heavy", "soft", "hard", "smooth", "rough", "warm", "cool", "fresh", "old",
	"new", "young", "ancient", "modern", "quiet", "loud", "calm", "wild", "gentle", "fierce",
	"brave", "shy",
];

pub const NOUNS: &[&str] = &[
	"whale", "dolphin", "shark", "turtle", "seahorse", "octopus", "jellyfish", "crab", "lobster",
	"starfish", "clam", "oyster", "mussel", "coral", "eagle", "hawk", "owl", "falcon", "raven",
	"crow", "sparrow", "robin", "lion", "tiger", "bear", "wolf", "fox", "deer", "rabbit",
	"squirrel", "elephant", "giraffe", "zebra", "rhino", "hippo", "camel", "llama", "dragon",
	"phoenix", "unicorn", "griffin", "pegasus", "centaur", "mountain", "river", "ocean", "forest",
	"desert", "island", "valley", "castle", "tower", "bridge", "temple", "palace", "cottage",
	"cabin", "diamond", "ruby", "emerald", "sapphire", "pearl", "crystal", "gem",
];

/// A share-code word is 2 to 12 lowercase ASCII letters.
pub fn is_valid_word(word: &str) -> bool {
	(MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&word.len())
		&& word.bytes().all(|b| b.is_ascii_lowercase())
}
