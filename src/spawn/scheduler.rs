//! Cooperative tick scheduling.
//!
//! [`TickScheduler`] is the contract the host runtime offers: run a task
//! once after some ticks, or run it every N ticks until it cancels itself.
//! [`TickLoop`] is a plain in-process implementation of that contract.

/// Handle of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Passed to a repeating task on every run.
#[derive(Debug)]
pub struct Repeat {
    tick: u64,
    cancelled: bool,
}

impl Repeat {
    /// The tick the task is running on.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Stops the task after the current run.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Tick-driven task scheduling offered by the host.
///
/// Delays and periods are counted in ticks; a value of zero is treated as
/// one, so nothing ever runs inside the call that registered it.
pub trait TickScheduler {
    /// Runs `task` once, `delay` ticks from now.
    fn run_later(&mut self, delay: u64, task: Box<dyn FnOnce()>) -> TaskId;

    /// Runs `task` first after `delay` ticks and then every `period` ticks
    /// until it calls [`Repeat::cancel`].
    fn run_repeating(
        &mut self,
        delay: u64,
        period: u64,
        task: Box<dyn FnMut(&mut Repeat)>,
    ) -> TaskId;
}

enum Job {
    Once(Box<dyn FnOnce()>),
    Repeating {
        period: u64,
        task: Box<dyn FnMut(&mut Repeat)>,
    },
}

struct Scheduled {
    id: TaskId,
    due: u64,
    job: Job,
}

/// Single-threaded tick loop.
///
/// Each call to [`TickLoop::tick`] advances the clock by one and runs every
/// task that has come due, in registration order.
#[derive(Default)]
pub struct TickLoop {
    now: u64,
    next_id: u64,
    tasks: Vec<Scheduled>,
}

impl TickLoop {
    pub fn new() -> Self {
        TickLoop::default()
    }

    /// Number of ticks run so far.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of tasks still scheduled.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    fn schedule(&mut self, delay: u64, job: Job) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Scheduled {
            id,
            due: self.now + delay.max(1),
            job,
        });
        id
    }

    /// Advances one tick and runs everything due.
    pub fn tick(&mut self) {
        self.now += 1;
        let now = self.now;

        let (mut due, waiting): (Vec<Scheduled>, Vec<Scheduled>) =
            std::mem::take(&mut self.tasks)
                .into_iter()
                .partition(|s| s.due <= now);
        self.tasks = waiting;
        due.sort_by_key(|s| s.id);

        for scheduled in due {
            match scheduled.job {
                Job::Once(task) => task(),
                Job::Repeating { period, mut task } => {
                    let mut repeat = Repeat {
                        tick: now,
                        cancelled: false,
                    };
                    task(&mut repeat);
                    if !repeat.cancelled {
                        self.tasks.push(Scheduled {
                            id: scheduled.id,
                            due: now + period.max(1),
                            job: Job::Repeating { period, task },
                        });
                    }
                }
            }
        }
    }

    /// Ticks until no task is left or `max_ticks` have run. Returns the
    /// number of ticks run.
    pub fn run_until_idle(&mut self, max_ticks: u64) -> u64 {
        let mut ran = 0;
        while !self.is_idle() && ran < max_ticks {
            self.tick();
            ran += 1;
        }
        ran
    }
}

impl TickScheduler for TickLoop {
    fn run_later(&mut self, delay: u64, task: Box<dyn FnOnce()>) -> TaskId {
        self.schedule(delay, Job::Once(task))
    }

    fn run_repeating(
        &mut self,
        delay: u64,
        period: u64,
        task: Box<dyn FnMut(&mut Repeat)>,
    ) -> TaskId {
        self.schedule(delay, Job::Repeating { period, task })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn run_later_fires_once_after_delay() {
        let mut lp = TickLoop::new();
        let fired = Rc::new(RefCell::new(Vec::new()));
        let f = fired.clone();
        lp.run_later(3, Box::new(move || f.borrow_mut().push("done")));

        lp.tick();
        lp.tick();
        assert!(fired.borrow().is_empty());
        lp.tick();
        assert_eq!(*fired.borrow(), vec!["done"]);
        assert!(lp.is_idle());
        lp.tick();
        assert_eq!(fired.borrow().len(), 1);
    }

    #[test]
    fn zero_delay_waits_for_next_tick() {
        let mut lp = TickLoop::new();
        let fired = Rc::new(RefCell::new(false));
        let f = fired.clone();
        lp.run_later(0, Box::new(move || *f.borrow_mut() = true));
        assert!(!*fired.borrow());
        lp.tick();
        assert!(*fired.borrow());
    }

    #[test]
    fn repeating_task_runs_every_period_until_cancelled() {
        let mut lp = TickLoop::new();
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let t = ticks.clone();
        lp.run_repeating(
            1,
            2,
            Box::new(move |r: &mut Repeat| {
                t.borrow_mut().push(r.tick());
                if t.borrow().len() == 3 {
                    r.cancel();
                }
            }),
        );

        let ran = lp.run_until_idle(100);
        assert_eq!(*ticks.borrow(), vec![1, 3, 5]);
        assert_eq!(ran, 5);
        assert!(lp.is_idle());
    }

    #[test]
    fn due_tasks_run_in_registration_order() {
        let mut lp = TickLoop::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for name in ["a", "b", "c"] {
            let o = order.clone();
            lp.run_repeating(
                1,
                1,
                Box::new(move |r: &mut Repeat| {
                    o.borrow_mut().push(name);
                    if r.tick() == 2 {
                        r.cancel();
                    }
                }),
            );
        }
        lp.tick();
        lp.tick();
        assert_eq!(*order.borrow(), vec!["a", "b", "c", "a", "b", "c"]);
        assert!(lp.is_idle());
    }

    #[test]
    fn run_until_idle_respects_limit() {
        let mut lp = TickLoop::new();
        lp.run_repeating(1, 1, Box::new(|_: &mut Repeat| {}));
        assert_eq!(lp.run_until_idle(10), 10);
        assert_eq!(lp.now(), 10);
        assert_eq!(lp.pending(), 1);
    }
}
