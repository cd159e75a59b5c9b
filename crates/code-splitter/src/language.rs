use serde::{Deserialize, Serialize};

/// Language tag reported in a split summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Python,
    JavaScript,
    C,
    Cpp,
    Go,
    Unknown,
}

impl Language {
    /// Get language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Go => "go",
            Language::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps code text to a language tag.
///
/// Implementations never fail and never block; anything they cannot place is
/// [`Language::Unknown`].
pub trait LanguageClassifier: Send + Sync {
    fn classify(&self, code: &str) -> Language;
}

/// How a rule inspects the code text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Matches if any needle occurs
    Any(Vec<&'static str>),
    /// Matches only if every needle occurs
    All(Vec<&'static str>),
}

impl Pattern {
    fn matches(&self, code: &str) -> bool {
        match self {
            Pattern::Any(needles) => needles.iter().any(|n| code.contains(n)),
            Pattern::All(needles) => needles.iter().all(|n| code.contains(n)),
        }
    }
}

/// One entry of the classifier's rule list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub language: Language,
    /// Alternatives; the rule fires when any of them matches
    pub patterns: Vec<Pattern>,
}

impl KeywordRule {
    pub fn new(language: Language, patterns: Vec<Pattern>) -> Self {
        Self { language, patterns }
    }

    fn matches(&self, code: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(code))
    }
}

/// Substring heuristics evaluated in order; the first matching rule wins.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<KeywordRule>,
}

impl KeywordClassifier {
    /// Classifier with the built-in rule list
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    /// Classifier with a custom, already prioritized rule list
    pub fn with_rules(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageClassifier for KeywordClassifier {
    fn classify(&self, code: &str) -> Language {
        self.rules
            .iter()
            .find(|rule| rule.matches(code))
            .map_or(Language::Unknown, |rule| rule.language)
    }
}

// Order matters: C++ sources that `#include` are reported as C, and anything
// with `const ` is JavaScript before the C/Go rules are reached.
fn default_rules() -> Vec<KeywordRule> {
    use Pattern::{All, Any};

    vec![
        KeywordRule::new(Language::Java, vec![Any(vec!["public class", "import java."])]),
        KeywordRule::new(
            Language::Python,
            vec![Any(vec!["def "]), All(vec!["import ", "from "])],
        ),
        KeywordRule::new(
            Language::JavaScript,
            vec![Any(vec!["function ", "const ", "let "])],
        ),
        KeywordRule::new(Language::C, vec![Any(vec!["#include", "int main()"])]),
        KeywordRule::new(Language::Cpp, vec![Any(vec!["using namespace", "std::"])]),
        KeywordRule::new(Language::Go, vec![Any(vec!["package main", "func "])]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(code: &str) -> Language {
        KeywordClassifier::new().classify(code)
    }

    #[test]
    fn test_detects_each_language() {
        assert_eq!(classify("public class Foo {}"), Language::Java);
        assert_eq!(classify("import java.util.List;"), Language::Java);
        assert_eq!(classify("def main():\n    pass"), Language::Python);
        assert_eq!(classify("from os import path"), Language::Python);
        assert_eq!(classify("function go() {}"), Language::JavaScript);
        assert_eq!(classify("let x = 1;"), Language::JavaScript);
        assert_eq!(classify("#include <stdio.h>"), Language::C);
        assert_eq!(classify("int main() { return 0; }"), Language::C);
        assert_eq!(classify("std::vector<int> v;"), Language::Cpp);
        assert_eq!(classify("package main"), Language::Go);
        assert_eq!(classify("SELECT 1;"), Language::Unknown);
    }

    #[test]
    fn test_first_match_wins() {
        // Includes plus C++ idioms: the C rule sits earlier in the list.
        let code = "#include <iostream>\nusing namespace std;\n";
        assert_eq!(classify(code), Language::C);

        // Go code declaring a const hits the JavaScript rule first.
        let code = "package main\nconst x = 1\n";
        assert_eq!(classify(code), Language::JavaScript);
    }

    #[test]
    fn test_python_import_needs_from() {
        // `import ` alone is not enough for the python rule.
        assert_eq!(classify("import foo"), Language::Unknown);
    }

    #[test]
    fn test_custom_rules() {
        let classifier = KeywordClassifier::with_rules(vec![KeywordRule::new(
            Language::Go,
            vec![Pattern::Any(vec!["func "])],
        )]);
        assert_eq!(classifier.classify("public class A { func x }"), Language::Go);
        assert_eq!(classifier.classify("public class A"), Language::Unknown);
        assert_eq!(classifier.rules().len(), 1);
    }

    #[test]
    fn test_serialized_tag_matches_as_str() {
        for lang in [
            Language::Java,
            Language::Python,
            Language::JavaScript,
            Language::C,
            Language::Cpp,
            Language::Go,
            Language::Unknown,
        ] {
            let json = serde_json::to_value(lang).unwrap();
            assert_eq!(json, serde_json::Value::String(lang.as_str().to_string()));
        }
    }
}
