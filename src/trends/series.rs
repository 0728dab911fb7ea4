use crate::dataset::{Dataset, SourceMap};

/// One reporting period: a label plus the named datasets loaded for it.
/// Callers assemble frames in chronological order; the analyzer never
/// sorts them.
#[derive(Debug, Clone, Default)]
pub struct PeriodFrame {
    label: String,
    sources: SourceMap,
}

impl PeriodFrame {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            sources: SourceMap::new(),
        }
    }

    pub fn with_source(mut self, name: &str, dataset: Dataset) -> Self {
        self.sources.insert(name.to_string(), dataset);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }
}

/// Rolling window of the most recent reporting periods. Pushing past
/// capacity evicts the oldest frame.
pub struct PeriodWindow {
    frames: Vec<PeriodFrame>,
    capacity: usize,
}

impl PeriodWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, frame: PeriodFrame) {
        if self.frames.len() >= self.capacity {
            self.frames.remove(0);
        }
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[PeriodFrame] {
        &self.frames
    }

    pub fn latest(&self) -> Option<&PeriodFrame> {
        self.frames.last()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Default for PeriodWindow {
    fn default() -> Self {
        // A year of monthly reporting periods.
        Self::new(12)
    }
}
