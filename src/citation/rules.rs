use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::CitationError;

/// Bracketed numeric references: `[1]`, `[2,3]`, `[4-6]`.
const BRACKETED_INDEX: &str = r"\[\s*\d+(?:\s*[,\-–]\s*\d+)*\s*\]";

/// Lowercase name particles allowed before a capitalised surname.
const NAME_PARTICLES: &str = "van|von|der|den|de|del|della|di|da|du|dos|das|le|la|ten|ter";

/// Parenthetical author-year references: `(Smith, 2020)`, `(Smith et al. 2019)`,
/// `(Smith & Jones, 2018; Lee, 2021)`, `(World Health Organization, 2020)`,
/// `(van der Berg, 2019)`, `(see Smith, 2020)`, `（张三，2020）`.
fn author_year_pattern() -> String {
    let name = format!(r"(?:(?:(?:{NAME_PARTICLES})\s+)*\p{{Lu}}[\p{{L}}'’\-]*\.?|\p{{Han}}{{1,4}})");
    let separator = r"(?:\s*[,，]\s*|\s+)(?:(?:&|and)\s+)?";
    format!(
        r"[(（]\s*(?:(?i:see)\s+)?{name}(?:{separator}{name})*(?:\s+et\s+al\.?)?\s*[,，]?\s*(?:1[5-9]|20)\d{{2}}[a-z]?(?:\s*[;,，:][^)）]*)?[)）]"
    )
}

/// Paired quotation marks; capture group 1 is the quoted span.
pub(crate) const QUOTATION_PATTERNS: [&str; 6] = [
    r#""([^"]+)""#,
    r"“([^”]+)”",
    r"「([^」]+)」",
    r"『([^』]+)』",
    r"‘([^’]+)’",
    r"(?:^|[\s(\[])'([^']+)'(?:$|[\s.,;:!?)\]])",
];

/// Attribution phrases that introduce someone else's words.
const ATTRIBUTION_PATTERNS: [&str; 7] = [
    r"(?i)\baccording\s+to\s+\p{L}",
    r"(?i)\bas\s+(?:\p{L}[\p{L}.'’\-]*\s+){1,4}(?:stated|noted|argued|wrote|observed|pointed\s+out)\b",
    r"根据.{1,10}",
    r"引用.{1,10}",
    r"参考.{1,10}",
    r"如.{1,10}所说",
    r"正如.{1,10}指出",
];

/// One citation style. Rules are evaluated in list order; the first match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CitationRule {
    /// `[1]`, `[2,3]`.
    BracketedIndex,
    /// `(Author, 2020)`, with author lists, name particles, "et al." and "see".
    AuthorYear,
    /// Quoted text covering at least `min_fraction` of the segment's letters and digits.
    Quotation { min_fraction: f32 },
    /// "according to X", "as X stated", and the Chinese attribution forms.
    AttributionPhrase,
    /// Caller-supplied regular expression.
    Pattern { name: String, pattern: String },
}

impl CitationRule {
    /// The built-in rule list, in evaluation order.
    pub fn standard(quote_min_fraction: f32) -> Vec<CitationRule> {
        vec![
            CitationRule::BracketedIndex,
            CitationRule::AuthorYear,
            CitationRule::Quotation {
                min_fraction: quote_min_fraction,
            },
            CitationRule::AttributionPhrase,
        ]
    }

    /// Short name used in logs.
    pub fn name(&self) -> &str {
        match self {
            CitationRule::BracketedIndex => "bracketed_index",
            CitationRule::AuthorYear => "author_year",
            CitationRule::Quotation { .. } => "quotation",
            CitationRule::AttributionPhrase => "attribution_phrase",
            CitationRule::Pattern { name, .. } => name,
        }
    }

    pub(crate) fn compile(self) -> Result<CompiledRule, CitationError> {
        let matcher = match &self {
            CitationRule::BracketedIndex => Matcher::Any(vec![compile_builtin(BRACKETED_INDEX)?]),
            CitationRule::AuthorYear => Matcher::Any(vec![compile_builtin(&author_year_pattern())?]),
            CitationRule::Quotation { min_fraction } => {
                if !(*min_fraction > 0.0 && *min_fraction <= 1.0) {
                    return Err(CitationError::InvalidQuoteFraction {
                        value: *min_fraction,
                    });
                }
                Matcher::Quoted {
                    min_fraction: *min_fraction,
                    patterns: QUOTATION_PATTERNS
                        .iter()
                        .map(|p| compile_builtin(p))
                        .collect::<Result<_, _>>()?,
                }
            }
            CitationRule::AttributionPhrase => Matcher::Any(
                ATTRIBUTION_PATTERNS
                    .iter()
                    .map(|p| compile_builtin(p))
                    .collect::<Result<_, _>>()?,
            ),
            CitationRule::Pattern { name, pattern } => {
                let regex = Regex::new(pattern).map_err(|e| CitationError::InvalidPattern {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
                Matcher::Any(vec![regex])
            }
        };

        Ok(CompiledRule {
            rule: self,
            matcher,
        })
    }
}

fn compile_builtin(pattern: &str) -> Result<Regex, CitationError> {
    Regex::new(pattern).map_err(|e| CitationError::InvalidPattern {
        name: "builtin".to_string(),
        reason: e.to_string(),
    })
}

#[derive(Debug, Clone)]
enum Matcher {
    Any(Vec<Regex>),
    Quoted {
        min_fraction: f32,
        patterns: Vec<Regex>,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) rule: CitationRule,
    matcher: Matcher,
}

impl CompiledRule {
    pub(crate) fn matches(&self, text: &str) -> bool {
        match &self.matcher {
            Matcher::Any(patterns) => patterns.iter().any(|p| p.is_match(text)),
            Matcher::Quoted {
                min_fraction,
                patterns,
            } => quoted_fraction(text, patterns) >= *min_fraction,
        }
    }
}

/// Share of the letters and digits of `text` that sit inside quotes.
///
/// Quoted spans from all patterns are merged first, so a quotation nested in
/// another one is counted once.
pub(crate) fn quoted_fraction(text: &str, patterns: &[Regex]) -> f32 {
    let total = text.chars().filter(|c| c.is_alphanumeric()).count();
    if total == 0 {
        return 0.0;
    }

    let mut spans: Vec<(usize, usize)> = patterns
        .iter()
        .flat_map(|p| p.captures_iter(text))
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.start(), m.end()))
        .collect();
    spans.sort_unstable();

    let mut quoted = 0usize;
    let mut covered_to = 0usize;
    for (start, end) in spans {
        let start = start.max(covered_to);
        if start < end {
            quoted += text[start..end].chars().filter(|c| c.is_alphanumeric()).count();
            covered_to = end;
        }
    }

    (quoted as f32 / total as f32).min(1.0)
}
