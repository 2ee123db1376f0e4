use std::ops::Range;

use ragsnip_core::Corpus;

/// How a text is cut into comparable units and glued back together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentMode {
    /// Split on `.`; fragments are trimmed and empty ones dropped.
    Sentence,
    /// One segment per line, blank lines included.
    Line,
}

impl SegmentMode {
    pub fn separator(self) -> &'static str {
        match self { SegmentMode::Sentence => ". ", SegmentMode::Line => "\n" }
    }

    pub fn split(self, text: &str) -> Vec<&str> {
        match self {
            SegmentMode::Sentence => text.split('.').map(str::trim).filter(|s| !s.is_empty()).collect(),
            SegmentMode::Line => text.lines().collect(),
        }
    }
}

/// One source of the corpus after segmentation.
#[derive(Debug, Clone)]
pub struct SegmentedSource<'a> {
    pub id: Option<&'a str>,
    pub mode: SegmentMode,
    pub segments: Vec<&'a str>,
}

impl SegmentedSource<'_> {
    pub fn len(&self) -> usize { self.segments.len() }
    pub fn is_empty(&self) -> bool { self.segments.is_empty() }

    pub fn texts(&self) -> Vec<String> { self.segments.iter().map(|s| s.to_string()).collect() }

    pub fn join(&self, range: Range<usize>) -> String { self.segments[range].join(self.mode.separator()) }
}

/// Segment every source of `corpus`, keeping corpus iteration order.
pub fn segment_corpus(corpus: &Corpus) -> Vec<SegmentedSource<'_>> {
    match corpus {
        Corpus::SingleText(text) => vec![SegmentedSource { id: None, mode: SegmentMode::Sentence, segments: SegmentMode::Sentence.split(text) }],
        Corpus::MultiSource(sources) => sources
            .iter()
            .map(|(id, content)| SegmentedSource { id: Some(id.as_str()), mode: SegmentMode::Line, segments: SegmentMode::Line.split(content) })
            .collect(),
    }
}

/// Segment indices covered by the window around `idx`, clipped to `[0, len)`.
pub fn window(idx: usize, len: usize, radius: usize) -> Range<usize> {
    idx.saturating_sub(radius)..len.min(idx.saturating_add(radius).saturating_add(1))
}
