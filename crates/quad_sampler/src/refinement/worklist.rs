//! Approximate priority queue of live quads.
//!
//! A deque kept roughly sorted by descending priority. Instead of a heap, the
//! whole deque is re-sorted when a countdown expires (reset to half the
//! length) or when the head turns out to be terminal. Between sorts, pops take
//! the current head, which may not be the true maximum.

use std::collections::VecDeque;

use crate::quad::Quad;

#[derive(Debug, Default)]
pub struct Worklist {
  quads: VecDeque<Quad>,
  /// Pops remaining until the next forced sort.
  countdown: usize,
  sorts: usize,
}

impl Worklist {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replace the contents; the next pop sorts first.
  pub fn reset<I: IntoIterator<Item = Quad>>(&mut self, quads: I) {
    self.quads.clear();
    self.quads.extend(quads);
    self.countdown = 0;
    self.sorts = 0;
  }

  /// Append a freshly created quad.
  #[inline]
  pub fn push(&mut self, quad: Quad) {
    self.quads.push_back(quad);
  }

  /// Remove and return the head if it can be refined.
  ///
  /// Returns `None` once every quad is terminal; the worklist is left intact.
  pub fn pop_refinable(&mut self) -> Option<Quad> {
    self.countdown = self.countdown.saturating_sub(1);
    let head_terminal = self.quads.front().map_or(true, Quad::is_terminal);
    if self.countdown == 0 || head_terminal {
      self.sort();
    }
    match self.quads.front() {
      Some(head) if !head.is_terminal() => self.quads.pop_front(),
      _ => None,
    }
  }

  /// Sort descending by priority and reset the countdown.
  pub fn sort(&mut self) {
    self
      .quads
      .make_contiguous()
      .sort_by(|a, b| b.priority.total_cmp(&a.priority));
    self.countdown = self.quads.len() / 2;
    self.sorts += 1;
  }

  pub fn head(&self) -> Option<&Quad> {
    self.quads.front()
  }

  pub fn len(&self) -> usize {
    self.quads.len()
  }

  pub fn is_empty(&self) -> bool {
    self.quads.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Quad> {
    self.quads.iter()
  }

  pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Quad> {
    self.quads.iter_mut()
  }

  /// Full sorts performed since the last reset.
  pub fn sort_count(&self) -> usize {
    self.sorts
  }
}
