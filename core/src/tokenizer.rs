use crate::stats::TermCounter;
use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref URL_RE: Regex = Regex::new(r"https?://\S*").expect("valid regex");
    static ref WORD_RE: Regex = Regex::new(r"\w+").expect("valid regex");
}

pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
    "be","because","been","before","being","below","between","both","but","by",
    "can","can't","cannot","could","couldn't",
    "did","didn't","do","does","doesn't","doing","don't","down","during",
    "each","few","for","from","further",
    "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
    "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
    "let's","me","more","most","mustn't","my","myself",
    "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
    "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
    "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
    "under","until","up","very",
    "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
    "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
];

pub const RUSSIAN_STOP_WORDS: &[&str] = &[
    "а","без","более","больше","будет","будто","бы","был","была","были","было","быть",
    "в","вам","вас","вдруг","ведь","во","вот","впрочем","все","всегда","всего","всех","всю","вы",
    "где","да","даже","два","для","до","другой",
    "его","ее","ей","ему","если","есть","еще","ещё",
    "ж","же","за","зачем","здесь",
    "и","из","или","им","иногда","их",
    "к","как","какая","какой","когда","конечно","кто","куда",
    "ли","лучше","между","меня","мне","много","может","можно","мой","моя","мы",
    "на","над","надо","наконец","нас","не","него","нее","ней","нельзя","нет","ни","нибудь","никогда","ним","них","ничего","но","ну",
    "о","об","один","он","она","они","опять","от","перед","по","под","после","потом","потому","почти","при","про",
    "раз","разве",
    "с","сам","свое","свою","себе","себя","сейчас","со","совсем","так","такой","там","тебя","тем","теперь","то","тогда","того","тоже","только","том","тот","три","тут","ты",
    "у","уж","уже","хорошо","хоть",
    "чего","чей","чем","через","что","чтоб","чтобы","чуть",
    "эти","этого","этой","этом","этот","эту","я"
];

/// Reduces a lowercased token to its canonical form.
pub trait Lemmatizer: Send + Sync {
    fn lemma(&self, token: &str) -> String;
}

/// Snowball stemming, Russian for tokens with Cyrillic letters and English otherwise.
pub struct SnowballLemmatizer {
    russian: Stemmer,
    english: Stemmer,
}

impl SnowballLemmatizer {
    pub fn new() -> Self {
        Self { russian: Stemmer::create(Algorithm::Russian), english: Stemmer::create(Algorithm::English) }
    }
}

impl Default for SnowballLemmatizer {
    fn default() -> Self { Self::new() }
}

impl Lemmatizer for SnowballLemmatizer {
    fn lemma(&self, token: &str) -> String {
        if token.chars().any(is_cyrillic) {
            self.russian.stem(token).into_owned()
        } else {
            self.english.stem(token).into_owned()
        }
    }
}

fn is_cyrillic(c: char) -> bool { matches!(c, '\u{0400}'..='\u{04FF}') }

/// Text normalization pipeline: URL stripping, word splitting, lemmatization
/// and stop-word filtering.
///
/// Built once per job and shared by reference with every consumer.
pub struct Normalizer {
    stop_words: HashSet<String>,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl Normalizer {
    pub fn new<I, S, L>(stop_words: I, lemmatizer: L) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        L: Lemmatizer + 'static,
    {
        let stop_words = stop_words.into_iter().map(|w| w.as_ref().to_lowercase()).collect();
        Self { stop_words, lemmatizer: Box::new(lemmatizer) }
    }

    /// Russian and English stop words with Snowball stemming.
    pub fn russian_english() -> Self {
        Self::new(RUSSIAN_STOP_WORDS.iter().chain(ENGLISH_STOP_WORDS.iter()), SnowballLemmatizer::new())
    }

    pub fn is_stop_word(&self, word: &str) -> bool { self.stop_words.contains(word) }

    /// Normalized lemmas of `text` in order of appearance, stop words removed.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        let stripped = URL_RE.replace_all(text, "");
        let normalized = stripped.nfkc().collect::<String>().to_lowercase();
        let mut tokens = Vec::new();
        for mat in WORD_RE.find_iter(&normalized) {
            let word = mat.as_str();
            if self.is_stop_word(word) { continue; }
            let lemma = self.lemmatizer.lemma(word);
            if lemma.is_empty() || self.is_stop_word(&lemma) { continue; }
            tokens.push(lemma);
        }
        tokens
    }

    /// Frequency table of the lemmas in one text unit.
    pub fn count(&self, text: &str) -> TermCounter {
        let mut counter = TermCounter::new();
        for token in self.tokens(text) {
            counter.add(token, 1);
        }
        counter
    }
}

impl Default for Normalizer {
    fn default() -> Self { Self::russian_english() }
}
