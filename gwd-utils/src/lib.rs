//! Shared utility functions for GWD crates.

/// Year and decade utility functions
pub mod years {
    use chrono::{Datelike, NaiveDate};

    /// Start year of the decade containing `year`.
    /// e.g., 2009 -> 2000, 2010 -> 2010, -5 -> -10
    pub fn decade_of(year: i32) -> i32 {
        year.div_euclid(10) * 10
    }

    /// Year of a calendar date.
    pub fn year_of(date: &NaiveDate) -> i32 {
        date.year()
    }

    /// Month (1-12) of a calendar date.
    pub fn month_of(date: &NaiveDate) -> u32 {
        date.month()
    }

    /// Remove `excluded` decades from a sorted decade list.
    ///
    /// Map views hide decades with too little coverage; the aggregate itself
    /// keeps them, so this runs on the presentation list only.
    pub fn visible_decades(decades: &[i32], excluded: &[i32]) -> Vec<i32> {
        decades
            .iter()
            .copied()
            .filter(|decade| !excluded.contains(decade))
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_decade_of() {
            assert_eq!(decade_of(2000), 2000);
            assert_eq!(decade_of(2009), 2000);
            assert_eq!(decade_of(2010), 2010);
            assert_eq!(decade_of(1915), 1910);
            assert_eq!(decade_of(-5), -10);
        }

        #[test]
        fn test_year_and_month_of() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            assert_eq!(year_of(&date), 2023);
            assert_eq!(month_of(&date), 6);
        }

        #[test]
        fn test_visible_decades() {
            let decades = vec![1910, 1920, 1930, 2000];
            assert_eq!(visible_decades(&decades, &[1910, 1920]), vec![1930, 2000]);
            assert_eq!(visible_decades(&decades, &[]), decades);
        }
    }
}

/// Numeric reductions
pub mod stats {
    /// Arithmetic mean; `None` for an empty input rather than a misleading zero.
    pub fn mean<I>(values: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0.0f64, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// `(min, max)` of the input, or `None` when empty.
    pub fn extent<I>(values: I) -> Option<(f64, f64)>
    where
        I: IntoIterator<Item = f64>,
    {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Largest absolute value, or `None` when empty.
    pub fn max_abs<I>(values: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .map(f64::abs)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_mean() {
            assert_eq!(mean(vec![5.0, -3.0, 12.0, 5.0]), Some(4.75));
            assert_eq!(mean(Vec::<f64>::new()), None);
        }

        #[test]
        fn test_extent() {
            assert_eq!(extent(vec![3.0, -1.0, 7.5]), Some((-1.0, 7.5)));
            assert_eq!(extent(Vec::<f64>::new()), None);
        }

        #[test]
        fn test_max_abs() {
            assert_eq!(max_abs(vec![0.2, -0.9, 0.5]), Some(0.9));
            assert_eq!(max_abs(Vec::<f64>::new()), None);
        }
    }
}
