//! Request ids for async work whose results may arrive out of order.

/// Issues monotonically increasing ids and decides whether a response is
/// still worth applying.
///
/// Two policies are offered:
/// - [`is_latest`](Self::is_latest): only the most recently issued id counts.
/// - [`try_apply`](Self::try_apply): any id newer than the last applied one
///   counts, so results never regress but an older-but-unseen one may land.
#[derive(Debug, Default, Clone)]
pub struct RequestSequence {
    issued: u64,
    applied: u64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub fn latest(&self) -> u64 {
        self.issued
    }

    pub fn is_latest(&self, id: u64) -> bool {
        id != 0 && id == self.issued
    }

    /// Records `id` as applied if it is newer than anything applied so far.
    pub fn try_apply(&mut self, id: u64) -> bool {
        if id == 0 || id > self.issued || id <= self.applied {
            return false;
        }
        self.applied = id;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase() {
        let mut seq = RequestSequence::new();
        assert_eq!(seq.next_id(), 1);
        assert_eq!(seq.next_id(), 2);
        assert_eq!(seq.latest(), 2);
    }

    #[test]
    fn latest_only() {
        let mut seq = RequestSequence::new();
        let first = seq.next_id();
        let second = seq.next_id();
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
    }

    #[test]
    fn newer_response_first_never_reverts() {
        let mut seq = RequestSequence::new();
        let one = seq.next_id();
        let two = seq.next_id();

        assert!(seq.try_apply(two));
        assert!(!seq.try_apply(one));
        assert!(!seq.try_apply(two));
    }

    #[test]
    fn unknown_ids_rejected() {
        let mut seq = RequestSequence::new();
        assert!(!seq.try_apply(0));
        assert!(!seq.try_apply(5));
    }
}
