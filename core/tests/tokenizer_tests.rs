use wayfarer_core::tokenizer::{tokenize, Analyzer};

#[test]
fn it_normalizes_and_stems() {
    let words = tokenize("Trekking Treks TREK! The café's menu.");
    // Stemming to "trek" should appear
    assert!(words.contains(&"trek".to_string()));
    // Unicode normalization keeps accented letters inside the word
    assert!(words.iter().any(|w| w.starts_with("café")));
}

#[test]
fn it_filters_stopwords() {
    let words = tokenize("The quiet beach and the lazy afternoon");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert!(words.contains(&"beach".to_string()));
}

#[test]
fn it_is_case_insensitive() {
    let a = Analyzer::new(false);
    assert_eq!(a.analyze("HIMALAYAN Trek"), a.analyze("himalayan trek"));
}

#[test]
fn fullwidth_letters_fold_under_nfkc() {
    let a = Analyzer::new(false);
    assert_eq!(a.analyze("ｂｅａｃｈ"), vec!["beach".to_string()]);
}
