//! Segmentation shared by the Latin-script romanisations.
//!
//! A run of letters is segmented on a lattice over its character positions:
//! an edge `i -> j` exists when `run[i..j]` is a reading or formatting
//! entity. Positions that every complete path passes through cut the run
//! into windows; ambiguity is resolved per window, so the cost of `decompose`
//! grows with the longest ambiguous window rather than with the run.

use std::collections::HashSet;

use regex::Regex;
use tracing::{debug, debug_span};

use super::ReadingOperator;
use crate::entity::{Decomposition, EntityKind};
use crate::error::{ReadingError, Result};
use crate::options::{Case, RomanisationOptions};
use crate::settings::BestEffort;

/// Segmentation state a romanisation operator carries.
#[derive(Debug)]
pub struct Romanisation {
    options: RomanisationOptions,
    best_effort: BestEffort,
    run: Regex,
    reading: HashSet<String>,
    formatting: HashSet<String>,
    prefixes: HashSet<String>,
}

impl Romanisation {
    /// `run` matches the candidate runs handed to the segmenter; text
    /// between matches is kept whole.
    pub(crate) fn new(
        options: RomanisationOptions,
        best_effort: BestEffort,
        run: Regex,
        formatting: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            options,
            best_effort,
            run,
            reading: HashSet::new(),
            formatting: formatting.into_iter().collect(),
            prefixes: HashSet::new(),
        }
    }

    /// Install the reading entity inventory and rebuild the prefix table.
    pub(crate) fn set_reading_entities(&mut self, reading: HashSet<String>) {
        self.prefixes = prefix_table(reading.iter().chain(self.formatting.iter()));
        self.reading = reading;
    }

    pub fn strict_segmentation(&self) -> bool {
        self.options.strict_segmentation
    }

    pub fn case(&self) -> Case {
        self.options.case
    }

    /// With `case = lower` only entities without capitals are recognised.
    pub fn accepts_case(&self, entity: &str) -> bool {
        self.options.case == Case::Both || !entity.chars().any(char::is_uppercase)
    }

    pub(crate) fn has_prefix(&self, lower: &str) -> bool {
        self.prefixes.contains(lower)
    }

    pub(crate) fn is_formatting_entity(&self, entity: &str) -> bool {
        self.accepts_case(entity) && self.formatting.contains(&entity.to_lowercase())
    }
}

/// Every non-empty prefix of every entity.
pub(crate) fn prefix_table<'a>(entities: impl Iterator<Item = &'a String>) -> HashSet<String> {
    let mut out = HashSet::new();
    for entity in entities {
        for (i, c) in entity.char_indices() {
            out.insert(entity[..i + c.len_utf8()].to_string());
        }
    }
    out
}

/// Operations of readings written in Latin letters.
pub trait RomanisationOperator: ReadingOperator {
    fn romanisation(&self) -> &Romanisation;

    /// Whether some entity starts with `lower` (already lowercased).
    fn has_entity_substring(&self, lower: &str) -> bool {
        self.romanisation().has_prefix(lower)
    }

    /// Whether a segmentation is the one a writer would have meant, given
    /// that it contains no mergeable entities.
    fn is_strict_decomposition(&self, _entities: &[&str]) -> bool {
        false
    }

    fn reading_entities(&self) -> &HashSet<String> {
        &self.romanisation().reading
    }

    fn formatting_entities(&self) -> &HashSet<String> {
        &self.romanisation().formatting
    }

    /// All segmentations of a single run, shortest first entity first.
    fn segment(&self, run: &str) -> Result<Vec<Vec<String>>> {
        let lattice = Lattice::build(self, run);
        if !lattice.is_segmentable() {
            if self.romanisation().strict_segmentation() {
                return Err(unsegmentable(run));
            }
            return Ok(vec![vec![run.to_string()]]);
        }
        Ok(lattice
            .paths(0, lattice.end())
            .into_iter()
            .map(|path| lattice.texts(0, &path).into_iter().map(str::to_string).collect())
            .collect())
    }
}

fn unsegmentable(run: &str) -> ReadingError {
    ReadingError::Decomposition(format!(
        "segmentation of '{run}' not possible or invalid syllable"
    ))
}

struct Lattice<'t> {
    text: &'t str,
    /// Byte offset of every character boundary, end included.
    bounds: Vec<usize>,
    /// Edges to positions from which the end is reachable, ascending.
    edges: Vec<Vec<usize>>,
}

impl<'t> Lattice<'t> {
    fn build<R: RomanisationOperator + ?Sized>(op: &R, text: &'t str) -> Self {
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let n = bounds.len() - 1;
        let mut edges = vec![Vec::new(); n + 1];
        for (i, out) in edges.iter_mut().enumerate().take(n) {
            for j in i + 1..=n {
                let sub = &text[bounds[i]..bounds[j]];
                if !op.has_entity_substring(&sub.to_lowercase()) {
                    break;
                }
                if op.is_reading_entity(sub) || op.is_formatting_entity(sub) {
                    out.push(j);
                }
            }
        }
        let mut viable = vec![false; n + 1];
        viable[n] = true;
        for i in (0..n).rev() {
            edges[i].retain(|&j| viable[j]);
            viable[i] = !edges[i].is_empty();
        }
        Self {
            text,
            bounds,
            edges,
        }
    }

    fn end(&self) -> usize {
        self.bounds.len() - 1
    }

    fn is_segmentable(&self) -> bool {
        self.end() == 0 || !self.edges[0].is_empty()
    }

    /// Positions every complete path passes through, both ends included.
    fn cut_points(&self) -> Vec<usize> {
        let n = self.end();
        let mut reachable = vec![false; n + 1];
        reachable[0] = true;
        let mut cuts = vec![0];
        let mut furthest = 0;
        for p in 0..=n {
            if !reachable[p] {
                continue;
            }
            if p > 0 && furthest <= p {
                cuts.push(p);
            }
            for &j in &self.edges[p] {
                reachable[j] = true;
                furthest = furthest.max(j);
            }
        }
        cuts
    }

    /// Paths from `from` to `to`, each listed as the positions after `from`.
    fn paths(&self, from: usize, to: usize) -> Vec<Vec<usize>> {
        if from == to {
            return vec![Vec::new()];
        }
        let mut out = Vec::new();
        for &j in self.edges[from].iter().filter(|&&j| j <= to) {
            for rest in self.paths(j, to) {
                let mut path = Vec::with_capacity(rest.len() + 1);
                path.push(j);
                path.extend(rest);
                out.push(path);
            }
        }
        out
    }

    fn texts(&self, from: usize, path: &[usize]) -> Vec<&'t str> {
        let text = self.text;
        let mut start = from;
        path.iter()
            .map(|&end| {
                let s = &text[self.bounds[start]..self.bounds[end]];
                start = end;
                s
            })
            .collect()
    }
}

/// Adjacent entities that together spell a reading entity.
fn has_mergeable_entities<R: RomanisationOperator + ?Sized>(op: &R, entities: &[&str]) -> bool {
    for start in 0..entities.len().saturating_sub(1) {
        let mut joined = entities[start].to_lowercase();
        for next in &entities[start + 1..] {
            joined.push_str(&next.to_lowercase());
            if !op.has_entity_substring(&joined) {
                break;
            }
            if op.is_reading_entity(&joined) {
                return true;
            }
        }
    }
    false
}

/// Pick one segmentation of an ambiguous window. The flag is false when the
/// longest-match tie-break decided.
fn resolve_window<'t, R: RomanisationOperator + ?Sized>(
    op: &R,
    run: &str,
    mut candidates: Vec<Vec<&'t str>>,
    preceding: Option<&str>,
) -> Result<(Vec<&'t str>, bool)> {
    if candidates.len() == 1 {
        return Ok((candidates.remove(0), true));
    }
    let (mut plain, merged): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| !has_mergeable_entities(op, c));
    if plain.len() == 1 {
        return Ok((plain.remove(0), true));
    }
    let strict = plain.iter().position(|c| {
        let mut with_context: Vec<&str> = preceding.into_iter().collect();
        with_context.extend(c.iter().copied());
        op.is_strict_decomposition(&with_context)
    });
    if let Some(i) = strict {
        return Ok((plain.swap_remove(i), true));
    }
    let romanisation = op.romanisation();
    if romanisation.strict_segmentation() || romanisation.best_effort == BestEffort::Error {
        return Err(ReadingError::AmbiguousDecomposition(format!(
            "decomposition of '{run}' ambiguous"
        )));
    }
    let pool = if plain.is_empty() { merged } else { plain };
    let chosen = pool
        .into_iter()
        .max_by_key(|c| c.iter().map(|e| e.chars().count()).collect::<Vec<_>>())
        .unwrap_or_default();
    debug!(run, chosen = ?chosen, "ambiguous segmentation resolved longest match first");
    Ok((chosen, false))
}

fn entity_kind<R: ReadingOperator + ?Sized>(op: &R, entity: &str) -> EntityKind {
    if op.is_reading_entity(entity) {
        EntityKind::Reading
    } else if op.is_formatting_entity(entity) {
        EntityKind::Formatting
    } else {
        EntityKind::Other
    }
}

enum Piece<'t> {
    Run(&'t str),
    Gap(&'t str),
}

fn pieces<'t>(pattern: &Regex, text: &'t str) -> Vec<Piece<'t>> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in pattern.find_iter(text) {
        if m.start() > last {
            out.push(Piece::Gap(&text[last..m.start()]));
        }
        if !m.as_str().is_empty() {
            out.push(Piece::Run(m.as_str()));
        }
        last = m.end();
    }
    if last < text.len() {
        out.push(Piece::Gap(&text[last..]));
    }
    out
}

fn decompose_run<R: RomanisationOperator + ?Sized>(
    op: &R,
    run: &str,
) -> Result<(Vec<(String, EntityKind)>, bool)> {
    let lattice = Lattice::build(op, run);
    if !lattice.is_segmentable() {
        if op.romanisation().strict_segmentation() {
            return Err(unsegmentable(run));
        }
        return Ok((vec![(run.to_string(), EntityKind::Other)], true));
    }
    let mut chosen: Vec<&str> = Vec::new();
    let mut strict = true;
    for window in lattice.cut_points().windows(2) {
        let (from, to) = (window[0], window[1]);
        let candidates = lattice
            .paths(from, to)
            .iter()
            .map(|path| lattice.texts(from, path))
            .collect();
        let (entities, window_strict) =
            resolve_window(op, run, candidates, chosen.last().copied())?;
        strict &= window_strict;
        chosen.extend(entities);
    }
    let parts = chosen
        .into_iter()
        .map(|e| (e.to_string(), entity_kind(op, e)))
        .collect();
    Ok((parts, strict))
}

/// Decompose `text`, resolving each ambiguous window.
pub(crate) fn decompose<R: RomanisationOperator + ?Sized>(op: &R, text: &str) -> Result<Decomposition> {
    let _span = debug_span!("decompose", reading = %op.reading(), len = text.len()).entered();
    let mut parts = Vec::new();
    let mut strict = true;
    for piece in pieces(&op.romanisation().run, text) {
        match piece {
            Piece::Gap(gap) => parts.push((gap.to_string(), entity_kind(op, gap))),
            Piece::Run(run) => {
                let (entities, run_strict) = decompose_run(op, run)?;
                strict &= run_strict;
                parts.extend(entities);
            }
        }
    }
    Ok(Decomposition::from_parts(parts, strict))
}

/// Cross product of every run's segmentations. The member equal to the
/// strict result of [`decompose`] is marked strict.
pub(crate) fn decompositions<R: RomanisationOperator + ?Sized>(
    op: &R,
    text: &str,
) -> Result<Vec<Decomposition>> {
    let _span = debug_span!("decompositions", reading = %op.reading(), len = text.len()).entered();
    let mut product: Vec<Vec<(String, EntityKind)>> = vec![Vec::new()];
    for piece in pieces(&op.romanisation().run, text) {
        let alternatives: Vec<Vec<(String, EntityKind)>> = match piece {
            Piece::Gap(gap) => vec![vec![(gap.to_string(), entity_kind(op, gap))]],
            Piece::Run(run) => op
                .segment(run)?
                .into_iter()
                .map(|seg| {
                    seg.into_iter()
                        .map(|e| {
                            let kind = entity_kind(op, &e);
                            (e, kind)
                        })
                        .collect()
                })
                .collect(),
        };
        product = product
            .iter()
            .flat_map(|prefix| {
                alternatives.iter().map(move |alt| {
                    let mut joined = prefix.clone();
                    joined.extend(alt.iter().cloned());
                    joined
                })
            })
            .collect();
    }
    let strict = decompose(op, text).ok().filter(|d| d.strict);
    Ok(product
        .into_iter()
        .map(|parts| {
            let mut d = Decomposition::from_parts(parts, false);
            d.strict = strict.as_ref().is_some_and(|s| s.entities == d.entities);
            d
        })
        .collect())
}

/// The entity that cannot be delimited when `preceding` and `entity` are
/// written next to each other, if any.
pub(crate) fn fused_entity<'a, R: ReadingOperator + ?Sized>(
    op: &R,
    preceding: &'a str,
    entity: &'a str,
    is_reading_char: impl Fn(char) -> bool,
    tone_digits: &str,
) -> Option<&'a str> {
    let (Some(last), Some(first)) = (preceding.chars().last(), entity.chars().next()) else {
        return None;
    };
    if tone_digits.contains(last) {
        return None;
    }
    let preceding_reading = op.is_reading_entity(preceding);
    let entity_reading = op.is_reading_entity(entity);
    if preceding_reading && !entity_reading && is_reading_char(first) {
        Some(entity)
    } else if !preceding_reading && entity_reading && is_reading_char(last) {
        Some(preceding)
    } else {
        None
    }
}

pub(crate) fn undelimitable(entity: &str) -> ReadingError {
    ReadingError::Composition(format!("unable to delimit non-reading entity '{entity}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_table() {
        let entities = ["an".to_string(), "ān".to_string()];
        let table = prefix_table(entities.iter());
        assert!(table.contains("a"));
        assert!(table.contains("ā"));
        assert!(table.contains("ān"));
        assert!(!table.contains("n"));
    }

    #[test]
    fn test_pieces_keep_gaps() {
        let re = Regex::new("[a-z]+").unwrap();
        let texts: Vec<(&str, bool)> = pieces(&re, "ab, cd")
            .into_iter()
            .map(|p| match p {
                Piece::Run(s) => (s, true),
                Piece::Gap(s) => (s, false),
            })
            .collect();
        assert_eq!(texts, vec![("ab", true), (", ", false), ("cd", true)]);
    }
}
