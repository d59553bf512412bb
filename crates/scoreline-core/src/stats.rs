//! Pure aggregation functions over test records.
//!
//! Every function here is a side-effect-free transformation over slices the
//! caller has already filtered. None of them panic, mutate their input, or
//! let a division by zero leak out as NaN/Infinity: empty input produces a
//! defined sentinel (`0`, `100` for consistency, or `None` where "no data"
//! is distinct from "zero").

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Subject, Test, TestCategory};

/// Rounded mean of `percentage` values. Empty input yields 0.
pub fn average(tests: &[Test]) -> f64 {
    rounded_mean(tests.iter().map(|t| t.percentage))
}

/// Highest percentage, or 0 for empty input.
pub fn best(tests: &[Test]) -> f64 {
    tests.iter().map(|t| t.percentage).fold(0.0, f64::max)
}

/// Lowest percentage, or 0 for empty input.
pub fn worst(tests: &[Test]) -> f64 {
    if tests.is_empty() {
        return 0.0;
    }
    tests
        .iter()
        .map(|t| t.percentage)
        .fold(f64::INFINITY, f64::min)
}

/// Point delta between the last and first record of a date-ascending slice.
/// Fewer than two records yields 0.
pub fn trend_points(ordered: &[Test]) -> f64 {
    match (ordered.first(), ordered.last()) {
        (Some(first), Some(last)) if ordered.len() > 1 => last.percentage - first.percentage,
        _ => 0.0,
    }
}

/// Rate-form trend: `round((last - first) / first * 100)` over a
/// date-ascending slice. Fewer than two records, or a zero baseline,
/// yields 0 rather than Infinity.
pub fn trend_rate(ordered: &[Test]) -> f64 {
    let (Some(first), Some(last)) = (ordered.first(), ordered.last()) else {
        return 0.0;
    };
    if ordered.len() < 2 || first.percentage == 0.0 {
        return 0.0;
    }
    ((last.percentage - first.percentage) / first.percentage * 100.0).round()
}

/// Population standard deviation of `percentage` values. Empty input yields
/// 0 (mean is defined as 0 when `n == 0`).
pub fn std_dev(tests: &[Test]) -> f64 {
    if tests.is_empty() {
        return 0.0;
    }
    let n = tests.len() as f64;
    let mean = tests.iter().map(|t| t.percentage).sum::<f64>() / n;
    let variance = tests
        .iter()
        .map(|t| (t.percentage - mean).powi(2))
        .sum::<f64>()
        / n;
    variance.sqrt()
}

/// Consistency score: `round(100 - min(stdDev, 100))`, bounded to [0, 100].
/// Empty input and zero-variance input both yield 100.
pub fn consistency(tests: &[Test]) -> f64 {
    (100.0 - std_dev(tests).min(100.0)).round()
}

/// Aggregate figures for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectStats {
    pub subject_id: String,
    pub name: String,
    pub color: String,
    pub average: f64,
    pub count: usize,
    pub best: f64,
    pub worst: f64,
}

/// Per-subject aggregates, one entry per supplied subject. Subjects with no
/// matching test report `count: 0` and zeroed figures rather than being
/// omitted.
pub fn subject_breakdown(tests: &[Test], subjects: &[Subject]) -> Vec<SubjectStats> {
    subjects
        .iter()
        .map(|subject| {
            let matching: Vec<Test> = tests
                .iter()
                .filter(|t| t.subject_id == subject.id)
                .cloned()
                .collect();
            SubjectStats {
                subject_id: subject.id.clone(),
                name: subject.name.clone(),
                color: subject.color.clone(),
                average: average(&matching),
                count: matching.len(),
                best: best(&matching),
                worst: worst(&matching),
            }
        })
        .collect()
}

/// Per-subject aggregates restricted to subjects with at least one test.
pub fn subject_breakdown_with_data(tests: &[Test], subjects: &[Subject]) -> Vec<SubjectStats> {
    subject_breakdown(tests, subjects)
        .into_iter()
        .filter(|s| s.count > 0)
        .collect()
}

/// Aggregate figures for one test category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: TestCategory,
    pub average: f64,
    pub count: usize,
    pub best: f64,
    pub worst: f64,
}

/// Per-category aggregates. Every category variant is present, zero-count
/// entries included.
pub fn category_breakdown(tests: &[Test]) -> Vec<CategoryStats> {
    TestCategory::ALL
        .iter()
        .map(|&category| {
            let matching: Vec<Test> = tests
                .iter()
                .filter(|t| t.category == category)
                .cloned()
                .collect();
            CategoryStats {
                category,
                average: average(&matching),
                count: matching.len(),
                best: best(&matching),
                worst: worst(&matching),
            }
        })
        .collect()
}

/// Aggregate figures for one difficulty level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub difficulty: Difficulty,
    pub average: f64,
    pub count: usize,
    pub best: f64,
    pub worst: f64,
}

/// Per-difficulty aggregates. Tests without a recorded difficulty are
/// skipped; every difficulty variant is present in the output.
pub fn difficulty_breakdown(tests: &[Test]) -> Vec<DifficultyStats> {
    Difficulty::ALL
        .iter()
        .map(|&difficulty| {
            let matching: Vec<Test> = tests
                .iter()
                .filter(|t| t.difficulty == Some(difficulty))
                .cloned()
                .collect();
            DifficultyStats {
                difficulty,
                average: average(&matching),
                count: matching.len(),
                best: best(&matching),
                worst: worst(&matching),
            }
        })
        .collect()
}

/// One fixed-size index chunk of a (typically pre-sorted) test list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    pub index: usize,
    pub average: f64,
    pub count: usize,
}

/// Partition a list into fixed-size index chunks and average each chunk.
/// A `chunk_size` of 0 yields no buckets.
pub fn chunk_buckets(tests: &[Test], chunk_size: usize) -> Vec<Bucket> {
    if chunk_size == 0 {
        return Vec::new();
    }
    tests
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, chunk)| Bucket {
            index,
            average: rounded_mean(chunk.iter().map(|t| t.percentage)),
            count: chunk.len(),
        })
        .collect()
}

/// One literal 7-day window ending at or before a reference date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekBucket {
    /// Inclusive window start.
    pub start: NaiveDate,
    /// Inclusive window end.
    pub end: NaiveDate,
    /// `None` when the window has no tests. Distinct from `Some(0.0)`:
    /// consumers branch on "no data", and the distinction survives JSON as
    /// `null`.
    pub average: Option<f64>,
    pub count: usize,
}

/// Bucket tests into `weeks` consecutive 7-day windows counting back from
/// `end` (the newest window ends on `end`), oldest window first.
pub fn week_buckets(tests: &[Test], end: NaiveDate, weeks: usize) -> Vec<WeekBucket> {
    let mut buckets = Vec::with_capacity(weeks);
    for i in (0..weeks).rev() {
        let window_end = end - Duration::days(7 * i as i64);
        let window_start = window_end - Duration::days(6);
        let percentages: Vec<f64> = tests
            .iter()
            .filter(|t| t.date >= window_start && t.date <= window_end)
            .map(|t| t.percentage)
            .collect();
        buckets.push(WeekBucket {
            start: window_start,
            end: window_end,
            average: if percentages.is_empty() {
                None
            } else {
                Some(rounded_mean(percentages.iter().copied()))
            },
            count: percentages.len(),
        });
    }
    buckets
}

fn rounded_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestCategory;

    fn test_record(percentage: f64, date: &str) -> Test {
        Test {
            id: format!("t-{percentage}-{date}"),
            name: "test".into(),
            subject_id: "s1".into(),
            category: TestCategory::Mock,
            score: percentage,
            total_marks: 100.0,
            percentage,
            date: date.parse().unwrap(),
            difficulty: None,
            time_spent_min: None,
            topics: vec![],
            notes: None,
        }
    }

    fn with_subject(mut test: Test, subject_id: &str) -> Test {
        test.subject_id = subject_id.into();
        test
    }

    fn subject(id: &str, name: &str) -> Subject {
        Subject {
            id: id.into(),
            name: name.into(),
            color: "#2563eb".into(),
            icon: "book".into(),
        }
    }

    #[test]
    fn average_empty_is_zero() {
        assert_eq!(average(&[]), 0.0);
    }

    #[test]
    fn average_single_and_pair() {
        assert_eq!(average(&[test_record(100.0, "2024-01-01")]), 100.0);
        assert_eq!(
            average(&[
                test_record(50.0, "2024-01-01"),
                test_record(100.0, "2024-01-02")
            ]),
            75.0
        );
    }

    #[test]
    fn average_rounds() {
        // round(230 / 3) == 77
        let tests = [
            test_record(60.0, "2024-01-01"),
            test_record(80.0, "2024-01-08"),
            test_record(90.0, "2024-01-05"),
        ];
        assert_eq!(average(&tests), 77.0);
    }

    #[test]
    fn best_and_worst_empty_are_zero() {
        assert_eq!(best(&[]), 0.0);
        assert_eq!(worst(&[]), 0.0);
    }

    #[test]
    fn worst_average_best_ordering() {
        let tests = [
            test_record(40.0, "2024-01-01"),
            test_record(70.0, "2024-01-02"),
            test_record(95.0, "2024-01-03"),
        ];
        let (w, a, b) = (worst(&tests), average(&tests), best(&tests));
        assert!(w <= a && a <= b, "expected {w} <= {a} <= {b}");
        assert_eq!(w, 40.0);
        assert_eq!(b, 95.0);
    }

    #[test]
    fn trend_single_element_is_zero() {
        assert_eq!(trend_points(&[test_record(50.0, "2024-01-01")]), 0.0);
        assert_eq!(trend_rate(&[test_record(50.0, "2024-01-01")]), 0.0);
    }

    #[test]
    fn trend_point_and_rate_forms() {
        let tests = [
            test_record(50.0, "2024-01-01"),
            test_record(75.0, "2024-01-08"),
        ];
        assert_eq!(trend_points(&tests), 25.0);
        assert_eq!(trend_rate(&tests), 50.0);
    }

    #[test]
    fn trend_rate_guards_zero_baseline() {
        let tests = [
            test_record(0.0, "2024-01-01"),
            test_record(75.0, "2024-01-08"),
        ];
        assert_eq!(trend_rate(&tests), 0.0);
        assert!(trend_rate(&tests).is_finite());
    }

    #[test]
    fn trend_negative() {
        let tests = [
            test_record(80.0, "2024-01-01"),
            test_record(60.0, "2024-01-08"),
        ];
        assert_eq!(trend_points(&tests), -20.0);
        assert_eq!(trend_rate(&tests), -25.0);
    }

    #[test]
    fn consistency_empty_is_hundred() {
        assert_eq!(consistency(&[]), 100.0);
    }

    #[test]
    fn consistency_zero_variance_is_hundred() {
        let tests = [
            test_record(80.0, "2024-01-01"),
            test_record(80.0, "2024-01-02"),
            test_record(80.0, "2024-01-03"),
        ];
        assert_eq!(consistency(&tests), 100.0);
    }

    #[test]
    fn consistency_decreases_with_variance() {
        // Same mean (60), increasing spread.
        let tight = [
            test_record(55.0, "2024-01-01"),
            test_record(65.0, "2024-01-02"),
        ];
        let wide = [
            test_record(30.0, "2024-01-01"),
            test_record(90.0, "2024-01-02"),
        ];
        assert!(consistency(&tight) > consistency(&wide));
        assert!(consistency(&wide) >= 0.0);
        assert!(consistency(&tight) <= 100.0);
    }

    #[test]
    fn subject_breakdown_keeps_empty_subjects() {
        let subjects = [subject("s1", "Physics"), subject("s2", "Chemistry")];
        let tests = [
            with_subject(test_record(60.0, "2024-01-01"), "s1"),
            with_subject(test_record(80.0, "2024-01-08"), "s1"),
        ];

        let all = subject_breakdown(&tests, &subjects);
        assert_eq!(all.len(), 2);
        let physics = all.iter().find(|s| s.name == "Physics").unwrap();
        assert_eq!(physics.average, 70.0);
        assert_eq!(physics.count, 2);
        let chemistry = all.iter().find(|s| s.name == "Chemistry").unwrap();
        assert_eq!(chemistry.count, 0);
        assert_eq!(chemistry.average, 0.0);
    }

    #[test]
    fn subject_breakdown_with_data_drops_empty() {
        let subjects = [subject("s1", "Physics"), subject("s2", "Chemistry")];
        let tests = [with_subject(test_record(90.0, "2024-01-05"), "s2")];

        let with_data = subject_breakdown_with_data(&tests, &subjects);
        assert_eq!(with_data.len(), 1);
        assert_eq!(with_data[0].name, "Chemistry");
        assert!(with_data.iter().all(|s| s.count > 0));
        let total: usize = with_data.iter().map(|s| s.count).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn end_to_end_scenario() {
        // Physics 60 + 80, Chemistry 90; overall average round(230/3) == 77,
        // trend by date (60 on 2024-01-01 -> 80 on 2024-01-08) is +20 points.
        let subjects = [subject("s1", "Physics"), subject("s2", "Chemistry")];
        let mut tests = vec![
            with_subject(test_record(60.0, "2024-01-01"), "s1"),
            with_subject(test_record(80.0, "2024-01-08"), "s1"),
            with_subject(test_record(90.0, "2024-01-05"), "s2"),
        ];
        assert_eq!(average(&tests), 77.0);

        let breakdown = subject_breakdown(&tests, &subjects);
        assert_eq!(
            breakdown.iter().find(|s| s.name == "Physics").unwrap().average,
            70.0
        );
        assert_eq!(
            breakdown
                .iter()
                .find(|s| s.name == "Chemistry")
                .unwrap()
                .average,
            90.0
        );

        tests.sort_by_key(|t| t.date);
        assert_eq!(trend_points(&tests), 20.0);
    }

    #[test]
    fn category_breakdown_covers_all_variants() {
        let mut t = test_record(70.0, "2024-01-01");
        t.category = TestCategory::Practice;
        let breakdown = category_breakdown(&[t]);
        assert_eq!(breakdown.len(), TestCategory::ALL.len());
        let practice = breakdown
            .iter()
            .find(|c| c.category == TestCategory::Practice)
            .unwrap();
        assert_eq!(practice.count, 1);
        assert_eq!(practice.average, 70.0);
        let mock = breakdown
            .iter()
            .find(|c| c.category == TestCategory::Mock)
            .unwrap();
        assert_eq!(mock.count, 0);
    }

    #[test]
    fn difficulty_breakdown_skips_unset() {
        let mut hard = test_record(40.0, "2024-01-01");
        hard.difficulty = Some(Difficulty::Hard);
        let unset = test_record(90.0, "2024-01-02");

        let breakdown = difficulty_breakdown(&[hard, unset]);
        assert_eq!(breakdown.len(), 3);
        let total: usize = breakdown.iter().map(|d| d.count).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn chunk_buckets_fixed_size() {
        let tests: Vec<Test> = (0..7)
            .map(|i| test_record(10.0 * (i + 1) as f64, "2024-01-01"))
            .collect();
        let buckets = chunk_buckets(&tests, 3);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].count, 3);
        assert_eq!(buckets[0].average, 20.0); // (10+20+30)/3
        assert_eq!(buckets[2].count, 1);
        assert_eq!(buckets[2].average, 70.0);
    }

    #[test]
    fn chunk_buckets_zero_size_is_empty() {
        let tests = [test_record(50.0, "2024-01-01")];
        assert!(chunk_buckets(&tests, 0).is_empty());
    }

    #[test]
    fn week_buckets_none_vs_zero() {
        let end: NaiveDate = "2024-01-28".parse().unwrap();
        let tests = [
            test_record(0.0, "2024-01-25"),  // newest window, real zero score
            test_record(80.0, "2024-01-10"), // third-from-newest window
        ];
        let buckets = week_buckets(&tests, end, 4);
        assert_eq!(buckets.len(), 4);

        // Newest window has data with a genuine zero average.
        assert_eq!(buckets[3].average, Some(0.0));
        assert_eq!(buckets[3].count, 1);
        // Window with no tests reports None, not zero.
        assert_eq!(buckets[0].average, None);
        assert_eq!(buckets[0].count, 0);

        // The distinction survives JSON.
        let json = serde_json::to_string(&buckets).unwrap();
        assert!(json.contains("null"));
    }

    #[test]
    fn week_buckets_windows_are_contiguous() {
        let end: NaiveDate = "2024-01-28".parse().unwrap();
        let buckets = week_buckets(&[], end, 3);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[2].end, end);
        for pair in buckets.windows(2) {
            assert_eq!(pair[0].end + Duration::days(1), pair[1].start);
        }
        for b in &buckets {
            assert_eq!(b.end - b.start, Duration::days(6));
        }
    }

    #[test]
    fn functions_do_not_mutate_input() {
        let tests = vec![
            test_record(80.0, "2024-01-08"),
            test_record(60.0, "2024-01-01"),
        ];
        let before: Vec<String> = tests.iter().map(|t| t.id.clone()).collect();
        let _ = average(&tests);
        let _ = consistency(&tests);
        let _ = chunk_buckets(&tests, 1);
        let _ = week_buckets(&tests, "2024-01-28".parse().unwrap(), 2);
        let after: Vec<String> = tests.iter().map(|t| t.id.clone()).collect();
        assert_eq!(before, after);
    }
}
