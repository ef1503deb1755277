use wordstat_core::tokenizer::{Lemmatizer, Normalizer};

struct Identity;

impl Lemmatizer for Identity {
    fn lemma(&self, token: &str) -> String { token.to_string() }
}

#[test]
fn mixed_script_message_folds_inflections() {
    let n = Normalizer::default();
    let c = n.count("Кошки и КОШКУ видел? The cats, cat!");
    assert_eq!(c.get("кошк"), 2);
    assert_eq!(c.get("cat"), 2);
    assert!(!c.contains("и"));
    assert!(!c.contains("the"));
}

#[test]
fn stop_words_of_both_languages_are_dropped() {
    let n = Normalizer::default();
    let toks = n.tokens("мы и вы в чате and the bot");
    for stop in ["и", "в", "and", "the"] {
        assert!(!toks.iter().any(|t| t == stop), "{stop} survived");
    }
    assert!(toks.iter().any(|t| t == "чат"));
    assert!(toks.iter().any(|t| t == "bot"));
}

#[test]
fn urls_and_stop_words_only_yield_nothing() {
    let n = Normalizer::default();
    for text in [
        "",
        "https://example.com",
        "the and http://a.b/c?d=e и в https://x.y",
        "   ...!!! ",
    ] {
        assert!(n.count(text).is_empty(), "text {text:?}");
    }
}

#[test]
fn counts_repeated_lemmas() {
    let n = Normalizer::new(["a"], Identity);
    let c = n.count("Cat cat CAT a dog");
    assert_eq!(c.get("cat"), 3);
    assert_eq!(c.get("dog"), 1);
    assert_eq!(c.total(), 4);
}

#[test]
fn url_inside_sentence_is_removed_whole() {
    let n = Normalizer::new(Vec::<&str>::new(), Identity);
    let toks = n.tokens("look:https://github.com/rust-lang/rust now");
    assert_eq!(toks, vec!["look", "now"]);
}
