//=========================================================================
// Deferred Queue
//=========================================================================
//
// Tasks waiting for a number of ticks or an amount of simulated time.
//
// The runtime advances the queue at the start of every tick, before it
// handles that tick's host events. A task deferred by one tick therefore
// runs on the tick after the one that scheduled it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Wait ================================================================

/// How long a task waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    Ticks(u32),
    Duration(Duration),
}

#[derive(Debug)]
struct Deferred<T> {
    task: T,
    wait: Wait,
}

//=== DeferredQueue =======================================================

#[derive(Debug)]
pub struct DeferredQueue<T> {
    queue: Vec<Deferred<T>>,
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Defers `task` until `wait` has elapsed.
    pub fn schedule(&mut self, task: T, wait: Wait) {
        self.queue.push(Deferred { task, wait });
    }

    /// Advances every waiting task by one tick of length `dt` and returns
    /// the ones that became due, in scheduling order.
    pub fn advance(&mut self, dt: Duration) -> Vec<T> {
        let mut due = Vec::new();
        let mut waiting = Vec::with_capacity(self.queue.len());

        for mut deferred in self.queue.drain(..) {
            let done = match &mut deferred.wait {
                Wait::Ticks(n) => {
                    *n = n.saturating_sub(1);
                    *n == 0
                }
                Wait::Duration(left) => {
                    *left = left.saturating_sub(dt);
                    left.is_zero()
                }
            };

            if done {
                due.push(deferred.task);
            } else {
                waiting.push(deferred);
            }
        }

        self.queue = waiting;
        due
    }

    /// Drops every waiting task matching `predicate`. Returns how many.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.queue.len();
        self.queue.retain(|deferred| !predicate(&deferred.task));
        before - self.queue.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.queue.iter().map(|deferred| &deferred.task)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(100);

    #[test]
    fn tick_wait_counts_advances() {
        let mut queue = DeferredQueue::new();
        queue.schedule("a", Wait::Ticks(2));

        assert!(queue.advance(TICK).is_empty());
        assert_eq!(queue.advance(TICK), vec!["a"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_ticks_runs_on_next_advance() {
        let mut queue = DeferredQueue::new();
        queue.schedule(1, Wait::Ticks(0));
        assert_eq!(queue.advance(TICK), vec![1]);
    }

    #[test]
    fn duration_wait_accumulates_dt() {
        let mut queue = DeferredQueue::new();
        queue.schedule("load", Wait::Duration(Duration::from_millis(250)));

        assert!(queue.advance(TICK).is_empty());
        assert!(queue.advance(TICK).is_empty());
        assert_eq!(queue.advance(TICK), vec!["load"]);
    }

    #[test]
    fn due_tasks_keep_scheduling_order() {
        let mut queue = DeferredQueue::new();
        queue.schedule("first", Wait::Duration(TICK));
        queue.schedule("second", Wait::Ticks(1));
        queue.schedule("later", Wait::Ticks(3));

        assert_eq!(queue.advance(TICK), vec!["first", "second"]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn cancel_removes_matching_tasks() {
        let mut queue = DeferredQueue::new();
        queue.schedule(1, Wait::Ticks(5));
        queue.schedule(2, Wait::Ticks(5));
        queue.schedule(3, Wait::Ticks(5));

        assert_eq!(queue.cancel_where(|&n| n % 2 == 1), 2);
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec![2]);
    }
}
