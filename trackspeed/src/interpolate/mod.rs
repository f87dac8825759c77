//! Gap filling for unsampled track points.

/// Propagate known values into missing slots.
///
/// Runs a forward pass that carries the last known value into following
/// gaps, then a backward pass that fills any leading gap from the first
/// known value. A sequence with no known values is returned unchanged.
///
/// # Example
///
/// ```
/// use trackspeed::interpolate::fill;
///
/// let filled = fill(vec![None, None, Some(30), None, None, Some(50), None]);
/// assert_eq!(filled, vec![Some(30), Some(30), Some(30), Some(30), Some(30), Some(50), Some(50)]);
/// ```
pub fn fill<T: Copy>(mut values: Vec<Option<T>>) -> Vec<Option<T>> {
    let mut last = None;
    for slot in values.iter_mut() {
        if let Some(v) = *slot {
            last = Some(v);
        } else {
            *slot = last;
        }
    }

    let mut next = None;
    for slot in values.iter_mut().rev() {
        if let Some(v) = *slot {
            next = Some(v);
        } else {
            *slot = next;
        }
    }

    values
}
