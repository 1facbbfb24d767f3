//! Rate-limited touch sampling
//!
//! The touch controller is read at most once per debounce interval. Between
//! reads the last sample is replayed bit-for-bit, timestamp included. A
//! failed or empty read is simply a release; there is no retry.

use touchdeck_hal::TouchSource;

use super::sample::TouchSample;
use crate::time::elapsed_ms;

/// Touch debouncer
pub struct InputDebouncer<T> {
    source: T,
    debounce_ms: u32,
    /// Time of the last hardware read (`None` until the first one)
    last_read_ms: Option<u32>,
    last: TouchSample,
}

impl<T: TouchSource> InputDebouncer<T> {
    /// Wrap a touch source
    pub fn new(source: T, debounce_ms: u32) -> Self {
        Self {
            source,
            debounce_ms,
            last_read_ms: None,
            last: TouchSample::default(),
        }
    }

    /// Bring up the underlying touch controller
    pub fn init(&mut self) -> Result<(), T::Error> {
        self.source.init()
    }

    /// Get the current sample
    ///
    /// Reads hardware on the first call and whenever at least
    /// `debounce_ms` has passed since the last read; otherwise returns the
    /// previous sample unchanged.
    pub fn sample(&mut self, now_ms: u32) -> TouchSample {
        if let Some(last_read) = self.last_read_ms {
            if elapsed_ms(now_ms, last_read) < self.debounce_ms {
                return self.last;
            }
        }

        self.last_read_ms = Some(now_ms);
        self.last = match self.source.get_touch() {
            Some((x, y)) => TouchSample::press(x, y, now_ms),
            None => TouchSample::release(self.last.x, self.last.y, now_ms),
        };

        #[cfg(feature = "defmt")]
        defmt::trace!("touch: {}", self.last);

        self.last
    }

    /// Most recent sample, if hardware has been read yet
    pub fn last_sample(&self) -> Option<TouchSample> {
        self.last_read_ms.map(|_| self.last)
    }

    pub fn debounce_ms(&self) -> u32 {
        self.debounce_ms
    }

    /// Get mutable access to the touch source
    pub fn source_mut(&mut self) -> &mut T {
        &mut self.source
    }

    /// Release the touch source
    pub fn into_source(self) -> T {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted touch source that counts hardware reads
    struct MockTouch {
        point: Option<(u16, u16)>,
        reads: u32,
    }

    impl MockTouch {
        fn new() -> Self {
            Self {
                point: None,
                reads: 0,
            }
        }
    }

    impl TouchSource for MockTouch {
        type Error = ();

        fn init(&mut self) -> Result<(), ()> {
            Ok(())
        }

        fn get_touch(&mut self) -> Option<(u16, u16)> {
            self.reads += 1;
            self.point
        }
    }

    #[test]
    fn test_first_call_reads_hardware() {
        let mut debouncer = InputDebouncer::new(MockTouch::new(), 5);
        assert_eq!(debouncer.last_sample(), None);

        let sample = debouncer.sample(0);
        assert!(!sample.pressed);
        assert_eq!(debouncer.source_mut().reads, 1);
        assert_eq!(debouncer.last_sample(), Some(sample));
    }

    #[test]
    fn test_replay_within_interval_is_identical() {
        let mut debouncer = InputDebouncer::new(MockTouch::new(), 5);
        debouncer.source_mut().point = Some((120, 80));

        let first = debouncer.sample(100);
        debouncer.source_mut().point = Some((300, 10));
        let second = debouncer.sample(104);

        assert_eq!(first, second);
        assert_eq!(second.timestamp, 100);
        assert_eq!(debouncer.source_mut().reads, 1);
    }

    #[test]
    fn test_reads_again_after_interval() {
        let mut debouncer = InputDebouncer::new(MockTouch::new(), 5);
        debouncer.source_mut().point = Some((120, 80));
        debouncer.sample(100);

        debouncer.source_mut().point = Some((300, 10));
        let sample = debouncer.sample(105);

        assert_eq!(sample, TouchSample::press(300, 10, 105));
        assert_eq!(debouncer.source_mut().reads, 2);
    }

    #[test]
    fn test_missed_read_is_release_at_last_position() {
        let mut debouncer = InputDebouncer::new(MockTouch::new(), 5);
        debouncer.source_mut().point = Some((42, 17));
        debouncer.sample(0);

        debouncer.source_mut().point = None;
        let sample = debouncer.sample(10);

        assert_eq!(sample, TouchSample::release(42, 17, 10));
    }

    #[test]
    fn test_interval_across_clock_wrap() {
        let mut debouncer = InputDebouncer::new(MockTouch::new(), 5);
        debouncer.sample(u32::MAX - 1);
        debouncer.sample(2);
        assert_eq!(debouncer.source_mut().reads, 1);
        debouncer.sample(3);
        assert_eq!(debouncer.source_mut().reads, 2);
    }

    #[test]
    fn test_zero_interval_reads_every_call() {
        let mut debouncer = InputDebouncer::new(MockTouch::new(), 0);
        debouncer.sample(7);
        debouncer.sample(7);
        assert_eq!(debouncer.source_mut().reads, 2);
    }
}
