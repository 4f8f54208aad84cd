//! Integer apportionment helpers
//!
//! Turns real-valued shares into integer weights that sum exactly to a
//! target. Shared by normalization and by every curve strategy.

/// Split `available` evenly across `count` slots
///
/// Each slot gets `floor(available / count)`; the remainder adds one to the
/// first slots in order.
#[must_use]
pub fn even_split(available: u32, count: usize) -> Vec<u32> {
    let Ok(n) = u32::try_from(count) else {
        return Vec::new();
    };
    if n == 0 {
        return Vec::new();
    }

    let share = available / n;
    let remainder = (available - share * n) as usize;

    (0..count)
        .map(|i| if i < remainder { share + 1 } else { share })
        .collect()
}

/// Scale raw non-negative values so they sum to `available`, then repair
///
/// Falls back to [`even_split`] when the raw values carry no mass.
#[must_use]
pub fn scale_to_available(raw: &[f64], available: u32) -> Vec<u32> {
    let mut values = round_shares(raw, available);
    repair_remainder(&mut values, available);
    values
}

/// Round each value's share of `available` independently
///
/// No repair is applied, so the result can drift from `available` by up to
/// half the slot count.
#[must_use]
pub fn round_shares(raw: &[f64], available: u32) -> Vec<u32> {
    let sum: f64 = raw.iter().sum();
    if !(sum.is_finite() && sum > 0.0) {
        return even_split(available, raw.len());
    }

    let available = f64::from(available);
    raw.iter()
        .map(|value| {
            let share = (value.max(0.0) / sum * available).round();
            // share lies in 0..=available, which fits in u32.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let share = share as u32;
            share
        })
        .collect()
}

/// Force `values` to sum exactly to `target`
///
/// Walks the slots cyclically, adding or removing one unit per step until
/// the remainder is gone. A removal skips slots already at zero.
pub fn repair_remainder(values: &mut [u32], target: u32) {
    if values.is_empty() {
        return;
    }

    let distributed: i64 = values.iter().map(|v| i64::from(*v)).sum();
    let mut remainder = i64::from(target) - distributed;
    let mut i = 0usize;

    while remainder != 0 {
        let slot = &mut values[i % values.len()];
        if remainder > 0 {
            *slot += 1;
            remainder -= 1;
        } else if *slot > 0 {
            *slot -= 1;
            remainder += 1;
        }
        i += 1;
    }
}
