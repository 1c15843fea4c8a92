//! Salary arithmetic used by the reports.
//!
//! The midpoint of a salary range is `(from_or_0 + to_or_0) / 2` in integer
//! arithmetic, truncated toward zero. An absent bound counts as zero, so a
//! vacancy that only states "from 100 000" has a midpoint of 50 000. Vacancies with no bounds at all have no midpoint and
//! are left out of averages.
//!
//! The SQL in `hh-db` computes the same figures server-side; these functions
//! are the reference the queries are tested against.

/// Midpoint of a salary range, substituting zero for an absent bound.
///
/// The division truncates, so `(101, None)` has a midpoint of 50.
///
/// # Examples
///
/// ```
/// use hh_core::salary::midpoint;
///
/// assert_eq!(midpoint(Some(100), Some(200)), Some(150.0));
/// assert_eq!(midpoint(Some(100), None), Some(50.0));
/// assert_eq!(midpoint(None, None), None);
/// ```
pub fn midpoint(salary_from: Option<i32>, salary_to: Option<i32>) -> Option<f64> {
    if salary_from.is_none() && salary_to.is_none() {
        return None;
    }
    let sum = i64::from(salary_from.unwrap_or(0)) + i64::from(salary_to.unwrap_or(0));
    Some((sum / 2) as f64)
}

/// Average midpoint over all ranges that have at least one bound.
///
/// Returns `0.0` when no range qualifies.
pub fn average_midpoint<I>(ranges: I) -> f64
where
    I: IntoIterator<Item = (Option<i32>, Option<i32>)>,
{
    let (sum, count) = ranges
        .into_iter()
        .filter_map(|(from, to)| midpoint(from, to))
        .fold((0.0_f64, 0_usize), |(sum, count), m| (sum + m, count + 1));

    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Midpoint used for comparisons: like [`midpoint`], but a range with no
/// bounds compares as zero.
pub fn comparable_midpoint(salary_from: Option<i32>, salary_to: Option<i32>) -> f64 {
    midpoint(salary_from, salary_to).unwrap_or(0.0)
}
