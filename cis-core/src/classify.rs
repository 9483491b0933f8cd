//! Keyword classification and knowledge search.

use indexmap::IndexMap;
use serde::Serialize;

use crate::store::{ChangePattern, KnowledgeEntry};

/// Find the first configured pattern whose keyword set intersects the
/// text. Matching is case-insensitive substring containment, not
/// word-boundary aware: the keyword "scale" matches "rescaled".
///
/// Patterns are scanned in their configured order and the scan stops at
/// the first hit, so no tie-break is needed. `None` is a normal outcome.
pub fn match_pattern<'a>(
    text: &str,
    patterns: &'a IndexMap<String, ChangePattern>,
) -> Option<(&'a str, &'a ChangePattern)> {
    let normalized = text.to_lowercase();
    patterns.iter().find_map(|(name, pattern)| {
        let hit = pattern
            .keywords
            .iter()
            .any(|keyword| normalized.contains(&keyword.to_lowercase()));
        hit.then_some((name.as_str(), pattern))
    })
}

/// A knowledge base entry returned by [`search_knowledge`], with its
/// category attached.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeHit {
    pub category: String,
    pub title: String,
    pub content: String,
}

/// Case-insensitive substring search over knowledge entry titles and
/// contents, in configured order.
pub fn search_knowledge(
    query: &str,
    knowledge: &IndexMap<String, Vec<KnowledgeEntry>>,
) -> Vec<KnowledgeHit> {
    let query = query.to_lowercase();
    let mut results = Vec::new();
    for (category, entries) in knowledge {
        for entry in entries {
            if entry.title.to_lowercase().contains(&query)
                || entry.content.to_lowercase().contains(&query)
            {
                results.push(KnowledgeHit {
                    category: category.clone(),
                    title: entry.title.clone(),
                    content: entry.content.clone(),
                });
            }
        }
    }
    results
}
