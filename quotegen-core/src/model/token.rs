use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Reserved word/tag of the sentence-start sentinel.
const BEGIN: &str = "___BEGIN__";
/// Reserved word/tag of the sentence-end sentinel.
const END: &str = "___END__";
/// Joins the surface word and its tag in the wire form `word::TAG`.
const SEPARATOR: &str = "::";

/// A single unit of the transition model: a surface word paired with its
/// part-of-speech tag.
///
/// Two occurrences of the same spelling under different tags are distinct
/// tokens, so grammatically distinct uses of a word are modeled separately.
///
/// # Wire form
/// A token serializes as the single string `word::TAG` (`"cat::NOUN"`).
/// Parsing splits on the *last* `::` so words containing colons survive a
/// round trip. This is also the representation used inside stored blobs.
///
/// # Invariants
/// - `word` and `tag` are both non-empty.
/// - The sentinels are ordinary tokens whose word and tag are the reserved
///   `___BEGIN__` / `___END__` markers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Token {
	word: String,
	tag: String,
}

impl Token {
	/// Creates a token from a surface word and its part-of-speech tag.
	pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
		Self { word: word.into(), tag: tag.into() }
	}

	/// The sentinel marking a legal sentence start.
	pub fn begin() -> Self {
		Self::new(BEGIN, BEGIN)
	}

	/// The sentinel marking a legal sentence end.
	pub fn end() -> Self {
		Self::new(END, END)
	}

	/// The surface word, as it appears in generated output.
	pub fn word(&self) -> &str {
		&self.word
	}

	/// The part-of-speech tag.
	pub fn tag(&self) -> &str {
		&self.tag
	}

	pub fn is_begin(&self) -> bool {
		self.word == BEGIN && self.tag == BEGIN
	}

	pub fn is_end(&self) -> bool {
		self.word == END && self.tag == END
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}{}", self.word, SEPARATOR, self.tag)
	}
}

impl FromStr for Token {
	type Err = ModelError;

	/// Parses the `word::TAG` wire form.
	///
	/// # Errors
	/// Returns `ModelError::Corrupt` if the separator is missing or either
	/// side of it is empty.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.rsplit_once(SEPARATOR) {
			Some((word, tag)) if !word.is_empty() && !tag.is_empty() => {
				Ok(Self::new(word, tag))
			}
			_ => Err(ModelError::corrupt(format!(
				"token {s:?} is not of the form word{SEPARATOR}TAG"
			))),
		}
	}
}

impl From<Token> for String {
	fn from(token: Token) -> Self {
		token.to_string()
	}
}

impl TryFrom<String> for Token {
	type Error = ModelError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wire_form_round_trips() {
		let token = Token::new("cat", "NOUN");
		assert_eq!(token.to_string(), "cat::NOUN");
		assert_eq!("cat::NOUN".parse::<Token>().unwrap(), token);
	}

	#[test]
	fn parse_splits_on_last_separator() {
		let token = "c::o::lon::NOUN".parse::<Token>().unwrap();
		assert_eq!(token.word(), "c::o::lon");
		assert_eq!(token.tag(), "NOUN");
	}

	#[test]
	fn parse_rejects_malformed_strings() {
		assert!("no-separator".parse::<Token>().is_err());
		assert!("::TAG".parse::<Token>().is_err());
		assert!("word::".parse::<Token>().is_err());
	}

	#[test]
	fn sentinels_are_recognized() {
		assert!(Token::begin().is_begin());
		assert!(Token::end().is_end());
		assert!(!Token::new("___BEGIN__", "NOUN").is_begin());
	}
}
