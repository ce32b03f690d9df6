//! Per-parse verse tracking.

/// Allocates node ids for one parse invocation.
///
/// Ids are deterministic: a counter rendered as `{prefix}n{k}`, so
/// re-parsing the same markup with the same prefix yields an identical
/// tree. Callers needing chapter-global uniqueness namespace via the
/// prefix (`"GEN.1."`).
pub(crate) struct IdGenerator {
    prefix: String,
    next: u32,
}

impl IdGenerator {
    pub(crate) fn new(prefix: &str) -> IdGenerator {
        IdGenerator {
            prefix: prefix.to_string(),
            next: 1,
        }
    }

    pub(crate) fn next_id(&mut self) -> String {
        let id = format!("{}n{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// The "currently open verse" for one parse invocation.
///
/// Verses are milestones: there is no close operation. A verse stays open
/// from its marker until the next marker or end of chapter, across any
/// paragraph boundaries in between. Constructed fresh inside every parse
/// call so concurrent chapter imports never share cursor state.
pub(crate) struct VerseCursor {
    current: Option<(String, u32)>,
}

impl VerseCursor {
    pub(crate) fn new() -> VerseCursor {
        VerseCursor { current: None }
    }

    /// Open verse `number`, allocating and returning the milestone's id.
    pub(crate) fn open_verse(&mut self, number: u32, ids: &mut IdGenerator) -> String {
        let id = ids.next_id();
        self.current = Some((id.clone(), number));
        id
    }

    /// The attribution to stamp on a leaf produced right now.
    pub(crate) fn current(&self) -> Option<(&str, u32)> {
        self.current.as_ref().map(|(id, n)| (id.as_str(), *n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_attribution_before_first_verse() {
        let cursor = VerseCursor::new();
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn verse_stays_open_until_replaced() {
        let mut ids = IdGenerator::new("");
        let mut cursor = VerseCursor::new();

        let first = cursor.open_verse(1, &mut ids);
        assert_eq!(cursor.current(), Some((first.as_str(), 1)));

        // Still open; reading attribution does not advance anything.
        assert_eq!(cursor.current(), Some((first.as_str(), 1)));

        let second = cursor.open_verse(2, &mut ids);
        assert_ne!(first, second);
        assert_eq!(cursor.current(), Some((second.as_str(), 2)));
    }

    #[test]
    fn ids_are_deterministic_and_prefixed() {
        let mut ids = IdGenerator::new("GEN.1.");
        assert_eq!(ids.next_id(), "GEN.1.n1");
        assert_eq!(ids.next_id(), "GEN.1.n2");
    }
}
