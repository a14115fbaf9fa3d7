use std::collections::HashMap;

use smallvec::SmallVec;

use crate::{GlyphId, WordId, MAX_SLOT_LENGTH};

/// A struct representing a word that can be chosen for a slot.
#[derive(Debug, Clone)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[GlyphId; MAX_SLOT_LENGTH]>,
}

impl Word {
    /// Length in letters (not bytes).
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// The solver's view of a puzzle's word list: each distinct word gets a `WordId` and each distinct
/// character a `GlyphId`, so that checking a crossing is an integer comparison.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    pub glyphs: Vec<char>,
    pub words: Vec<Word>,
}

impl Vocabulary {
    /// Intern the given words. Duplicates and empty strings are dropped; otherwise ids follow
    /// input order.
    pub fn new<S: AsRef<str>>(words: &[S]) -> Vocabulary {
        let mut vocabulary = Vocabulary::default();
        let mut glyph_ids_by_char: HashMap<char, GlyphId> = HashMap::new();
        let mut seen: HashMap<&str, WordId> = HashMap::with_capacity(words.len());

        for word in words {
            let word = word.as_ref();
            if word.is_empty() || seen.contains_key(word) {
                continue;
            }
            seen.insert(word, vocabulary.words.len());

            let glyphs = word
                .chars()
                .map(|c| {
                    *glyph_ids_by_char.entry(c).or_insert_with(|| {
                        vocabulary.glyphs.push(c);
                        vocabulary.glyphs.len() - 1
                    })
                })
                .collect();

            vocabulary.words.push(Word { string: word.to_string(), glyphs });
        }

        vocabulary
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    pub fn glyph(&self, word_id: WordId, cell_idx: usize) -> GlyphId {
        self.words[word_id].glyphs[cell_idx]
    }
}

#[cfg(test)]
mod tests {
    use crate::word_list::Vocabulary;

    #[test]
    fn test_vocabulary_dedupes_and_interns_glyphs() {
        let vocabulary = Vocabulary::new(&["cat", "act", "", "cat", "tab"]);

        let strings: Vec<_> = vocabulary.words.iter().map(|w| w.string.as_str()).collect();
        assert_eq!(strings, vec!["cat", "act", "tab"]);
        assert_eq!(vocabulary.glyphs, vec!['c', 'a', 't', 'b']);

        // "cat" and "act" share glyph ids for the same letters.
        assert_eq!(vocabulary.glyph(0, 0), vocabulary.glyph(1, 1));
        assert_eq!(vocabulary.glyph(0, 2), vocabulary.glyph(2, 0));
    }

    #[test]
    fn test_word_length_counts_chars() {
        let vocabulary = Vocabulary::new(&["façade"]);

        assert_eq!(vocabulary.word(0).len(), 6);
    }
}
