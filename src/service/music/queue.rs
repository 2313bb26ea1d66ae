//! Per-guild music queue.
//!
//! The queue holds the playing track separately from the upcoming ones. Upcoming tracks
//! carry a 1-based position that is renumbered after every mutation so positions shown
//! to users always run `1..=len` without gaps.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

use crate::model::music::RepeatMode;

/// Tracks listed per queue page.
pub const QUEUE_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct QueuedTrack<T> {
    /// 1-based position among upcoming tracks, `0` for the playing track.
    pub position: usize,
    pub track: T,
    /// Discord user that requested the track, `None` for autoplay.
    pub requester: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueuePage<'a, T> {
    pub items: Vec<&'a QueuedTrack<T>>,
    /// 1-based page number after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct MusicQueue<T> {
    current: Option<QueuedTrack<T>>,
    upcoming: VecDeque<QueuedTrack<T>>,
}

impl<T> Default for MusicQueue<T> {
    fn default() -> Self {
        Self {
            current: None,
            upcoming: VecDeque::new(),
        }
    }
}

impl<T> MusicQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of upcoming tracks.
    pub fn len(&self) -> usize {
        self.upcoming.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upcoming.is_empty()
    }

    pub fn current(&self) -> Option<&QueuedTrack<T>> {
        self.current.as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedTrack<T>> {
        self.current.iter().chain(self.upcoming.iter())
    }

    /// Appends a track and returns its position.
    pub fn enqueue(&mut self, track: T, requester: Option<u64>) -> usize {
        let position = self.upcoming.len() + 1;
        self.upcoming.push_back(QueuedTrack {
            position,
            track,
            requester,
        });
        position
    }

    /// Appends several tracks and returns the position of the first one.
    pub fn enqueue_many(
        &mut self,
        tracks: impl IntoIterator<Item = T>,
        requester: Option<u64>,
    ) -> usize {
        let first = self.upcoming.len() + 1;
        for track in tracks {
            self.enqueue(track, requester);
        }
        first
    }

    /// Removes the upcoming track at `position`.
    pub fn remove(&mut self, position: usize) -> Option<QueuedTrack<T>> {
        let index = position.checked_sub(1)?;
        let mut removed = self.upcoming.remove(index)?;
        self.renumber();
        removed.position = 0;
        Some(removed)
    }

    /// Moves the upcoming track at `from` so it ends up at `to`.
    ///
    /// # Returns
    /// - `true` - Both positions were valid and the track was moved
    /// - `false` - Either position was out of range, the queue is unchanged
    pub fn move_track(&mut self, from: usize, to: usize) -> bool {
        let len = self.upcoming.len();
        if from == 0 || to == 0 || from > len || to > len {
            return false;
        }
        if let Some(item) = self.upcoming.remove(from - 1) {
            self.upcoming.insert(to - 1, item);
        }
        self.renumber();
        true
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.upcoming.make_contiguous().shuffle(rng);
        self.renumber();
    }

    /// Drops all upcoming tracks, keeping the playing one. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.upcoming.len();
        self.upcoming.clear();
        removed
    }

    /// Drops everything including the playing track.
    pub fn reset(&mut self) {
        self.current = None;
        self.upcoming.clear();
    }

    /// Starts the next track when nothing is playing.
    ///
    /// # Returns
    /// - `Some(track)` - A track was promoted and should start playing
    /// - `None` - Something is already playing or the queue is empty
    pub fn start_if_idle(&mut self) -> Option<&QueuedTrack<T>> {
        if self.current.is_some() {
            return None;
        }
        self.promote_front()
    }

    /// Picks the track to play after the current one ended.
    ///
    /// - `Off` plays the next upcoming track and forgets the finished one.
    /// - `Track` keeps playing the same track.
    /// - `Queue` sends the finished track to the back before taking the next one.
    pub fn advance(&mut self, mode: RepeatMode) -> Option<&QueuedTrack<T>> {
        match mode {
            RepeatMode::Track if self.current.is_some() => self.current.as_ref(),
            RepeatMode::Queue => {
                if let Some(finished) = self.current.take() {
                    self.upcoming.push_back(finished);
                }
                self.promote_front()
            }
            _ => {
                self.current = None;
                self.promote_front()
            }
        }
    }

    /// Skips the playing track. Track repeat does not apply to an explicit skip.
    pub fn skip(&mut self, mode: RepeatMode) -> Option<&QueuedTrack<T>> {
        match mode {
            RepeatMode::Track => self.advance(RepeatMode::Off),
            other => self.advance(other),
        }
    }

    /// Jumps to the upcoming track at `position`, dropping the tracks before it.
    pub fn jump(&mut self, position: usize) -> Option<&QueuedTrack<T>> {
        if position == 0 || position > self.upcoming.len() {
            return None;
        }
        self.upcoming.drain(..position - 1);
        self.current = None;
        self.promote_front()
    }

    /// Returns one page of upcoming tracks. `page` is 1-based and clamped to the last page.
    pub fn page(&self, page: usize, per_page: usize) -> QueuePage<'_, T> {
        let per_page = per_page.max(1);
        let total = self.upcoming.len();
        let total_pages = total.div_ceil(per_page).max(1);
        let page = page.clamp(1, total_pages);

        let items = self
            .upcoming
            .iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        QueuePage {
            items,
            page,
            total_pages,
            total,
        }
    }

    fn promote_front(&mut self) -> Option<&QueuedTrack<T>> {
        let mut next = self.upcoming.pop_front()?;
        next.position = 0;
        self.current = Some(next);
        self.renumber();
        self.current.as_ref()
    }

    fn renumber(&mut self) {
        for (index, item) in self.upcoming.iter_mut().enumerate() {
            item.position = index + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn queue_of(names: &[&str]) -> MusicQueue<String> {
        let mut queue = MusicQueue::new();
        queue.enqueue_many(names.iter().map(|n| n.to_string()), Some(1));
        queue
    }

    fn upcoming(queue: &MusicQueue<String>) -> Vec<(usize, String)> {
        queue
            .page(1, 100)
            .items
            .iter()
            .map(|item| (item.position, item.track.clone()))
            .collect()
    }

    fn current(queue: &MusicQueue<String>) -> Option<String> {
        queue.current().map(|item| item.track.clone())
    }

    #[test]
    fn positions_are_contiguous_after_remove() {
        let mut queue = queue_of(&["a", "b", "c", "d"]);

        let removed = queue.remove(2).unwrap();

        assert_eq!(removed.track, "b");
        assert_eq!(
            upcoming(&queue),
            vec![(1, "a".into()), (2, "c".into()), (3, "d".into())]
        );
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut queue = queue_of(&["a"]);

        assert!(queue.remove(0).is_none());
        assert!(queue.remove(2).is_none());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn moves_track_and_renumbers() {
        let mut queue = queue_of(&["a", "b", "c"]);

        assert!(queue.move_track(3, 1));

        assert_eq!(
            upcoming(&queue),
            vec![(1, "c".into()), (2, "a".into()), (3, "b".into())]
        );
        assert!(!queue.move_track(4, 1));
    }

    #[test]
    fn advance_off_consumes_queue() {
        let mut queue = queue_of(&["a", "b"]);
        queue.start_if_idle();

        assert_eq!(queue.advance(RepeatMode::Off).map(|t| t.track.clone()), Some("b".into()));
        assert!(queue.advance(RepeatMode::Off).is_none());
        assert!(current(&queue).is_none());
    }

    #[test]
    fn advance_track_repeats_current() {
        let mut queue = queue_of(&["a", "b"]);
        queue.start_if_idle();

        assert_eq!(queue.advance(RepeatMode::Track).map(|t| t.track.clone()), Some("a".into()));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn advance_queue_cycles_finished_track() {
        let mut queue = queue_of(&["a", "b"]);
        queue.start_if_idle();

        assert_eq!(queue.advance(RepeatMode::Queue).map(|t| t.track.clone()), Some("b".into()));
        assert_eq!(upcoming(&queue), vec![(1, "a".into())]);
        assert_eq!(queue.advance(RepeatMode::Queue).map(|t| t.track.clone()), Some("a".into()));
        assert_eq!(upcoming(&queue), vec![(1, "b".into())]);
    }

    #[test]
    fn advance_queue_with_single_track_replays_it() {
        let mut queue = queue_of(&["a"]);
        queue.start_if_idle();

        assert_eq!(queue.advance(RepeatMode::Queue).map(|t| t.track.clone()), Some("a".into()));
        assert!(queue.is_empty());
    }

    #[test]
    fn skip_ignores_track_repeat() {
        let mut queue = queue_of(&["a", "b"]);
        queue.start_if_idle();

        assert_eq!(queue.skip(RepeatMode::Track).map(|t| t.track.clone()), Some("b".into()));
    }

    #[test]
    fn jump_drops_earlier_tracks() {
        let mut queue = queue_of(&["a", "b", "c", "d"]);
        queue.start_if_idle();

        let next = queue.jump(2).map(|t| t.track.clone());

        assert_eq!(next, Some("c".into()));
        assert_eq!(upcoming(&queue), vec![(1, "d".into())]);
        assert!(queue.jump(5).is_none());
    }

    #[test]
    fn start_if_idle_only_starts_once() {
        let mut queue = queue_of(&["a", "b"]);

        assert_eq!(queue.start_if_idle().map(|t| t.track.clone()), Some("a".into()));
        assert!(queue.start_if_idle().is_none());
        assert_eq!(upcoming(&queue), vec![(1, "b".into())]);
    }

    #[test]
    fn shuffle_keeps_tracks_and_positions() {
        let names: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        let mut queue = MusicQueue::new();
        queue.enqueue_many(names.clone(), None);

        queue.shuffle(&mut StdRng::seed_from_u64(7));

        let after = upcoming(&queue);
        let positions: Vec<usize> = after.iter().map(|(p, _)| *p).collect();
        let mut tracks: Vec<String> = after.into_iter().map(|(_, t)| t).collect();
        tracks.sort();
        let mut expected = names;
        expected.sort();

        assert_eq!(positions, (1..=20).collect::<Vec<_>>());
        assert_eq!(tracks, expected);
    }

    #[test]
    fn pages_are_clamped() {
        let names: Vec<String> = (1..=25).map(|i| i.to_string()).collect();
        let mut queue = MusicQueue::new();
        queue.enqueue_many(names, None);

        let page = queue.page(3, QUEUE_PAGE_SIZE);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].position, 21);

        let clamped = queue.page(9, QUEUE_PAGE_SIZE);
        assert_eq!(clamped.page, 3);

        let empty = MusicQueue::<String>::new();
        assert_eq!(empty.page(1, QUEUE_PAGE_SIZE).total_pages, 1);
    }

    #[test]
    fn clear_keeps_current() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.start_if_idle();

        assert_eq!(queue.clear(), 2);
        assert_eq!(current(&queue), Some("a".into()));
    }
}
