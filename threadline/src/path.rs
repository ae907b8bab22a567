use std::ops::Deref;

/// Ordered nail indices visited by the thread. Starts with a single entry
/// and only ever grows; consecutive duplicates never occur.
#[derive(Clone, Debug)]
pub struct PathSequence {
    sequence: Vec<usize>,
}

impl PathSequence {
    pub(crate) fn new(start: usize) -> Self {
        Self {
            sequence: vec![start],
        }
    }

    pub(crate) fn push(&mut self, nail: usize) {
        self.sequence.push(nail);
    }

    pub fn last(&self) -> usize {
        // SAFETY: the sequence is created with a start nail and only grows.
        unsafe { *self.sequence.get_unchecked(self.sequence.len() - 1) }
    }

    /// Thread map text, one line per traced segment:
    /// `Line <n>: <from> -> <to>`, 1-indexed.
    pub fn build_instructions(&self) -> String {
        self.sequence
            .windows(2)
            .enumerate()
            .map(|(step, pair)| format!("Line {}: {} -> {}\n", step + 1, pair[0], pair[1]))
            .collect()
    }
}

impl Deref for PathSequence {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::PathSequence;

    #[test]
    fn instructions_are_one_indexed() {
        let mut path = PathSequence::new(7);
        path.push(3);
        path.push(12);
        assert_eq!(
            path.build_instructions(),
            "Line 1: 7 -> 3\nLine 2: 3 -> 12\n"
        );
    }

    #[test]
    fn a_fresh_path_has_no_instructions() {
        assert_eq!(PathSequence::new(0).build_instructions(), "");
        assert_eq!(PathSequence::new(5).last(), 5);
    }
}
