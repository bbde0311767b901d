/// Part-of-speech tagging seam.
///
/// The builder does not mandate a tagging algorithm; any implementation with
/// deterministic output for a fixed input satisfies the contract. Tags
/// participate in chain-state identity, so two spellings of a word under
/// different tags are modeled as distinct tokens.
pub trait PosTagger {
	/// Tags a sentence worth of words, returning exactly one tag per word.
	///
	/// # Notes
	/// - Must be a pure function: identical input yields identical tags.
	/// - Words arrive as they appear in the sentence, punctuation attached.
	fn tag(&self, words: &[&str]) -> Vec<String>;
}

/// Articles, demonstratives and possessives.
const DETERMINERS: &[&str] = &[
	"the", "a", "an", "this", "that", "these", "those", "my", "your", "his",
	"her", "its", "our", "their", "some", "any", "no", "every", "each",
];

const PRONOUNS: &[&str] = &[
	"i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them",
	"who", "whom", "what", "mine", "yours", "theirs",
];

const PREPOSITIONS: &[&str] = &[
	"of", "in", "on", "at", "by", "for", "with", "to", "from", "into",
	"over", "under", "about", "after", "before", "between", "through",
];

const CONJUNCTIONS: &[&str] = &[
	"and", "or", "but", "nor", "so", "yet", "because", "although", "while",
	"if", "when",
];

/// Copulas, auxiliaries and modals.
const AUXILIARIES: &[&str] = &[
	"is", "am", "are", "was", "were", "be", "been", "being", "have", "has",
	"had", "do", "does", "did", "will", "would", "can", "could", "shall",
	"should", "may", "might", "must",
];

/// Common irregular past forms the suffix rules cannot catch.
const IRREGULAR_VERBS: &[&str] = &[
	"sat", "ran", "said", "went", "saw", "came", "got", "took", "made",
	"knew", "thought", "told", "gave", "found", "left", "put", "kept",
];

/// Default tagger: a small closed-class lexicon plus suffix heuristics.
///
/// This is intentionally shallow. It exists so the engine is usable out of
/// the box; callers with a real tagger plug it in through [`PosTagger`].
///
/// # Behavior
/// - Surrounding punctuation is ignored when classifying; case is ignored.
/// - Closed classes (DET, PRON, PREP, CONJ, AUX) come first, then digits
///   (NUM), then irregular and suffix-derived verbs (VERB), `-ly` adverbs
///   (ADV), and finally the NOUN fallback.
/// - A word with no alphanumeric core is tagged PUNCT.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleTagger;

impl RuleTagger {
	fn classify(word: &str) -> &'static str {
		let core: String = word
			.trim_matches(|c: char| !c.is_alphanumeric())
			.to_lowercase();
		if core.is_empty() {
			return "PUNCT";
		}
		if DETERMINERS.contains(&core.as_str()) {
			return "DET";
		}
		if PRONOUNS.contains(&core.as_str()) {
			return "PRON";
		}
		if PREPOSITIONS.contains(&core.as_str()) {
			return "PREP";
		}
		if CONJUNCTIONS.contains(&core.as_str()) {
			return "CONJ";
		}
		if AUXILIARIES.contains(&core.as_str()) {
			return "AUX";
		}
		if core.chars().all(|c| c.is_ascii_digit()) {
			return "NUM";
		}
		if IRREGULAR_VERBS.contains(&core.as_str()) {
			return "VERB";
		}
		if core.ends_with("ly") {
			return "ADV";
		}
		if core.len() > 3 && (core.ends_with("ed") || core.ends_with("ing")) {
			return "VERB";
		}
		"NOUN"
	}
}

impl PosTagger for RuleTagger {
	fn tag(&self, words: &[&str]) -> Vec<String> {
		words.iter().map(|word| Self::classify(word).to_owned()).collect()
	}
}
