/// Receives simulation events and optionally steers the run.
///
/// `observe` returns `Some(action)` to request a loop-specific action (such as
/// aborting the run) and `None` to let it continue. Recorders, telemetry
/// streams, and tracing all plug into the loop through this trait.
///
/// Closures implement `Observer` directly, and `()` is a no-op observer.
pub trait Observer<E, A> {
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

/// Forwards events to two observers, `first` then `second`.
///
/// The first action returned wins; both observers always see the event.
impl<E, A, O1, O2> Observer<E, A> for (O1, O2)
where
    O1: Observer<E, A>,
    O2: Observer<E, A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        let first = self.0.observe(event);
        let second = self.1.observe(event);
        first.or(second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_count_events() {
        let mut seen = 0;
        let mut observer = |event: &u32| {
            seen += event;
            None::<()>
        };

        observer.observe(&2);
        observer.observe(&3);

        assert_eq!(seen, 5);
    }

    #[test]
    fn pairs_see_every_event_and_keep_the_first_action() {
        let mut left = Vec::new();
        let mut right = Vec::new();
        {
            let mut pair = (
                |event: &u32| {
                    left.push(*event);
                    (*event == 2).then_some("left")
                },
                |event: &u32| {
                    right.push(*event);
                    Some("right")
                },
            );

            assert_eq!(pair.observe(&1), Some("right"));
            assert_eq!(pair.observe(&2), Some("left"));
        }

        assert_eq!(left, vec![1, 2]);
        assert_eq!(right, vec![1, 2]);
    }
}
