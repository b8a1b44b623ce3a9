//! Photo carousel for the current round
//!
//! The carousel holds the photos unlocked so far in unlock order, the
//! browsing cursor within them, and the total number of photos the server
//! declared for the round. Browsing never reaches past what has been
//! unlocked, and unlocking always jumps the cursor to the newest photo.

use serde::{Deserialize, Serialize};

/// A photo unlocked during a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Location of the image, as given by the server
    pub url: String,
    /// Zero-based position in the unlock order
    pub position: usize,
}

/// Snapshot of the carousel for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarouselMessage {
    /// One-based position of the displayed photo (0 when empty)
    pub position: usize,
    /// Number of photos unlocked so far
    pub unlocked: usize,
    /// Number of photos the server declared for the round
    pub total: usize,
    /// Whether the previous-photo control is usable
    pub can_prev: bool,
    /// Whether the next-photo control is usable
    pub can_next: bool,
    /// Whether another photo may be unlocked
    pub can_unlock: bool,
    /// Whether the navigation arrows are shown at all
    pub show_navigation: bool,
}

/// Unlocked photos of the current round and the browsing cursor over them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carousel {
    /// Photos in unlock order
    unlocked: Vec<Photo>,
    /// Index of the displayed photo
    cursor: usize,
    /// Server-declared number of photos in the round
    total_available: usize,
}

impl Carousel {
    /// Forgets every unlocked photo
    ///
    /// The declared total is kept until the next `set_total_available`.
    pub fn reset(&mut self) {
        self.unlocked.clear();
        self.cursor = 0;
    }

    /// Records a newly unlocked photo and moves the cursor onto it
    ///
    /// If the server unlocks more photos than it declared, the declared
    /// total is raised to match so the carousel stays consistent.
    pub fn unlock(&mut self, url: impl Into<String>) -> &Photo {
        let position = self.unlocked.len();
        self.unlocked.push(Photo {
            url: url.into(),
            position,
        });
        self.cursor = position;
        self.total_available = self.total_available.max(self.unlocked.len());
        &self.unlocked[position]
    }

    /// Updates the number of photos the server declared for the round
    pub fn set_total_available(&mut self, total: usize) {
        self.total_available = total.max(self.unlocked.len());
    }

    /// Moves the cursor to `index` if it points at an unlocked photo
    ///
    /// Out-of-range indices leave the cursor untouched.
    ///
    /// # Returns
    ///
    /// `true` if the cursor moved
    pub fn seek(&mut self, index: usize) -> bool {
        if index >= self.unlocked.len() || index == self.cursor {
            return false;
        }
        self.cursor = index;
        true
    }

    /// Moves to the following photo, stopping at the newest one
    pub fn next(&mut self) -> bool {
        self.cursor
            .checked_add(1)
            .is_some_and(|index| self.seek(index))
    }

    /// Moves to the preceding photo, stopping at the first one
    pub fn prev(&mut self) -> bool {
        self.cursor
            .checked_sub(1)
            .is_some_and(|index| self.seek(index))
    }

    /// Whether the server still has photos to unlock this round
    pub fn can_unlock_more(&self) -> bool {
        self.unlocked.len() < self.total_available
    }

    /// The photo under the cursor
    pub fn current(&self) -> Option<&Photo> {
        self.unlocked.get(self.cursor)
    }

    /// Photos unlocked so far, in unlock order
    pub fn photos(&self) -> &[Photo] {
        &self.unlocked
    }

    /// Index of the displayed photo
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of unlocked photos
    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    /// Whether nothing has been unlocked yet
    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }

    /// Server-declared number of photos in the round
    pub fn total_available(&self) -> usize {
        self.total_available
    }

    /// Whether a photo exists before the cursor
    pub fn has_prev(&self) -> bool {
        self.cursor > 0
    }

    /// Whether an unlocked photo exists after the cursor
    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.unlocked.len()
    }

    /// Display snapshot of the carousel
    pub fn message(&self) -> CarouselMessage {
        CarouselMessage {
            position: if self.is_empty() { 0 } else { self.cursor + 1 },
            unlocked: self.len(),
            total: self.total_available,
            can_prev: self.has_prev(),
            can_next: self.has_next(),
            can_unlock: self.can_unlock_more(),
            show_navigation: self.len() > 1,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn carousel_with(urls: &[&str], total: usize) -> Carousel {
        let mut carousel = Carousel::default();
        carousel.set_total_available(total);
        for url in urls {
            carousel.unlock(*url);
        }
        carousel
    }

    #[test]
    fn test_new_carousel_is_empty() {
        let carousel = Carousel::default();
        assert!(carousel.is_empty());
        assert_eq!(carousel.current(), None);
        assert!(!carousel.can_unlock_more());
        assert_eq!(carousel.message().position, 0);
    }

    #[test]
    fn test_unlock_jumps_to_newest() {
        let mut carousel = carousel_with(&["p1.jpg"], 5);
        assert_eq!(carousel.cursor(), 0);

        carousel.seek(0);
        let photo = carousel.unlock("p2.jpg");
        assert_eq!(photo.position, 1);
        assert_eq!(carousel.cursor(), 1);
        assert_eq!(carousel.current().map(|p| p.url.as_str()), Some("p2.jpg"));
    }

    #[test]
    fn test_browse_scenario() {
        let mut carousel = carousel_with(&["p1.jpg"], 5);
        carousel.unlock("p2.jpg");
        carousel.unlock("p3.jpg");

        let urls: Vec<_> = carousel.photos().iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, ["p1.jpg", "p2.jpg", "p3.jpg"]);
        assert_eq!(carousel.cursor(), 2);

        assert!(carousel.seek(0));
        assert_eq!(carousel.cursor(), 0);

        assert!(carousel.next());
        assert!(carousel.next());
        assert!(!carousel.next());
        assert_eq!(carousel.cursor(), 2);
    }

    #[test]
    fn test_prev_clamps_at_start() {
        let mut carousel = carousel_with(&["a", "b"], 2);
        assert!(carousel.prev());
        assert!(!carousel.prev());
        assert_eq!(carousel.cursor(), 0);
    }

    #[test]
    fn test_seek_out_of_range_is_ignored() {
        let mut carousel = carousel_with(&["a", "b"], 3);
        assert!(!carousel.seek(2));
        assert!(!carousel.seek(usize::MAX));
        assert_eq!(carousel.cursor(), 1);
    }

    #[test]
    fn test_navigation_on_empty_carousel() {
        let mut carousel = Carousel::default();
        assert!(!carousel.next());
        assert!(!carousel.prev());
        assert!(!carousel.seek(0));
    }

    #[test]
    fn test_reset_keeps_total() {
        let mut carousel = carousel_with(&["a", "b", "c"], 3);
        assert!(!carousel.can_unlock_more());

        carousel.reset();
        assert!(carousel.is_empty());
        assert_eq!(carousel.cursor(), 0);
        assert_eq!(carousel.total_available(), 3);
        assert!(carousel.can_unlock_more());
    }

    #[test]
    fn test_unlock_past_declared_total_raises_total() {
        let mut carousel = carousel_with(&["a"], 1);
        carousel.unlock("b");
        assert_eq!(carousel.total_available(), 2);
        assert!(!carousel.can_unlock_more());
    }

    #[test]
    fn test_message_navigation_flags() {
        let mut carousel = carousel_with(&["a"], 3);
        let message = carousel.message();
        assert!(!message.show_navigation);
        assert!(message.can_unlock);

        carousel.unlock("b");
        carousel.seek(0);
        let message = carousel.message();
        assert_eq!(message.position, 1);
        assert_eq!(message.unlocked, 2);
        assert!(message.show_navigation);
        assert!(!message.can_prev);
        assert!(message.can_next);
    }

    proptest! {
        #[test]
        fn prop_unlock_moves_cursor_to_newest(count in 1usize..40, total in 0usize..40) {
            let mut carousel = Carousel::default();
            carousel.set_total_available(total);
            for i in 0..count {
                carousel.unlock(format!("p{i}.jpg"));
                prop_assert_eq!(carousel.len(), i + 1);
                prop_assert_eq!(carousel.cursor(), i);
                prop_assert!(carousel.len() <= carousel.total_available());
            }
        }

        #[test]
        fn prop_seek_out_of_range_never_moves(
            count in 0usize..20,
            start in 0usize..20,
            target in 0usize..100,
        ) {
            let mut carousel = Carousel::default();
            for i in 0..count {
                carousel.unlock(format!("p{i}"));
            }
            carousel.seek(start);
            let before = carousel.cursor();
            if target >= count {
                prop_assert!(!carousel.seek(target));
                prop_assert_eq!(carousel.cursor(), before);
            } else {
                carousel.seek(target);
                prop_assert_eq!(carousel.cursor(), target);
            }
        }

        #[test]
        fn prop_can_unlock_more_until_total(total in 0usize..30, unlocks in 0usize..30) {
            let mut carousel = Carousel::default();
            carousel.set_total_available(total);
            for i in 0..unlocks.min(total) {
                carousel.unlock(format!("p{i}"));
            }
            prop_assert_eq!(
                carousel.can_unlock_more(),
                carousel.len() != carousel.total_available()
            );
        }

        #[test]
        fn prop_cursor_stays_in_bounds(moves in proptest::collection::vec(0u8..4, 0..60)) {
            let mut carousel = Carousel::default();
            carousel.set_total_available(10);
            for step in moves {
                match step {
                    0 => { carousel.next(); }
                    1 => { carousel.prev(); }
                    2 if carousel.can_unlock_more() => { carousel.unlock("p"); }
                    _ => { carousel.seek(usize::from(step) * 3); }
                }
                if !carousel.is_empty() {
                    prop_assert!(carousel.cursor() < carousel.len());
                }
            }
        }
    }
}
