use thiserror::Error;

use crate::animation::values::Interpolatable;

/// A keyframe bracket produced a factor that time-ordered keys cannot produce.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error(
    "factor {factor} at time {time} between keys at {start} and {end} is outside [0, 1]"
)]
pub struct KeyframeRangeError {
    pub time: f32,
    pub start: f32,
    pub end: f32,
    pub factor: f32,
}

/// One independently timed list of `(time, value)` samples.
///
/// Times are expected in ascending order. Sampling never extrapolates: a
/// single key is returned as-is, and queries outside the keyed range settle on
/// the first or last bracket.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    /// Builds a track from parallel time/value lists. Extra entries in the
    /// longer list are dropped.
    #[must_use]
    pub fn new(mut times: Vec<f32>, mut values: Vec<T>) -> Self {
        let len = times.len().min(values.len());
        times.truncate(len);
        values.truncate(len);
        Self { times, values }
    }

    /// A track holding a single constant value.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self {
            times: vec![0.0],
            values: vec![value],
        }
    }

    /// Number of usable keys: the shorter of the two lists.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len().min(self.values.len())
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Time of the last key, or `0.0` for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times[..self.len()].last().copied().unwrap_or(0.0)
    }

    /// Index of the first key of the bracket used for `time`.
    ///
    /// Forward scan for the first pair whose upper key lies after `time`; when
    /// no such pair exists the last pair is used. Requires at least two keys.
    fn find_bracket(&self, time: f32) -> usize {
        let len = self.len();
        self.times[..len]
            .windows(2)
            .position(|pair| time < pair[1])
            .unwrap_or(len - 2)
    }

    /// Samples the track at `time`.
    ///
    /// Returns `Ok(None)` for an empty track so the caller can fall back to
    /// its bind-pose value.
    pub fn sample(&self, time: f32) -> Result<Option<T>, KeyframeRangeError> {
        match self.len() {
            0 => return Ok(None),
            1 => return Ok(Some(self.values[0])),
            _ => {}
        }

        let index = self.find_bracket(time);
        let start = self.times[index];
        let end = self.times[index + 1];

        // Past the last key the bracket is the final pair; pin the query to
        // its end so the factor stays within range for ordered keys.
        let query = if index == self.len() - 2 && time > end {
            end
        } else {
            time
        };

        let delta = end - start;
        let factor = (query - start) / delta;
        if delta <= 0.0 || factor.is_nan() || factor > 1.0 {
            return Err(KeyframeRangeError {
                time,
                start,
                end,
                factor,
            });
        }
        let factor = factor.clamp(0.0, 1.0);

        Ok(Some(T::interpolate_linear(
            self.values[index],
            self.values[index + 1],
            factor,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn ramp() -> KeyframeTrack<Vec3> {
        KeyframeTrack::new(
            vec![0.0, 1.0, 3.0],
            vec![Vec3::ZERO, Vec3::X, Vec3::new(3.0, 0.0, 0.0)],
        )
    }

    #[test]
    fn bracket_picks_first_pair_ending_after_time() {
        let track = ramp();
        assert_eq!(track.find_bracket(-1.0), 0);
        assert_eq!(track.find_bracket(0.0), 0);
        assert_eq!(track.find_bracket(0.99), 0);
        assert_eq!(track.find_bracket(1.0), 1);
        assert_eq!(track.find_bracket(2.5), 1);
        assert_eq!(track.find_bracket(3.0), 1);
        assert_eq!(track.find_bracket(100.0), 1);
    }

    #[test]
    fn sample_interpolates_inside_second_bracket() {
        let value = ramp().sample(2.0).unwrap().unwrap();
        assert!(value.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn new_truncates_mismatched_lists() {
        let track = KeyframeTrack::new(vec![0.0, 1.0, 2.0], vec![Vec3::ONE]);
        assert_eq!(track.len(), 1);
        assert_eq!(track.values.len(), 1);
    }

    #[test]
    fn literal_with_mismatched_lists_samples_the_common_prefix() {
        let short_values = KeyframeTrack {
            times: vec![0.0, 1.0],
            values: vec![Vec3::ONE],
        };
        assert_eq!(short_values.len(), 1);
        assert_eq!(short_values.sample(0.5), Ok(Some(Vec3::ONE)));
        assert_eq!(short_values.end_time(), 0.0);

        let short_times = KeyframeTrack {
            times: vec![0.0, 2.0],
            values: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        };
        let value = short_times.sample(5.0).unwrap().unwrap();
        assert!(value.abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn empty_track_samples_none() {
        let track: KeyframeTrack<Vec3> = KeyframeTrack::new(Vec::new(), Vec::new());
        assert_eq!(track.sample(1.0), Ok(None));
        assert_eq!(track.end_time(), 0.0);
    }

    #[test]
    fn duplicate_key_times_at_bracket_are_rejected() {
        let track = KeyframeTrack::new(vec![0.0, 0.0], vec![Vec3::ZERO, Vec3::ONE]);
        let err = track.sample(0.0).unwrap_err();
        assert_eq!(err.start, 0.0);
        assert_eq!(err.end, 0.0);
    }
}
