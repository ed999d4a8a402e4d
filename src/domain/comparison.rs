// Multi-route comparison assembly
use crate::domain::error::RouteDataError;
use crate::domain::metrics::RouteAnalysis;

/// One route's contribution to a comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonEntry {
    pub name: String,
    pub analysis: RouteAnalysis,
}

/// Unified comparison across routes of unequal length.
///
/// `labels` spans the index range of the longest successful route;
/// shorter series stay ragged and downstream consumers render them
/// with fewer points. `None` labels with no entries is the valid
/// result of every route failing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteComparison {
    pub labels: Option<Vec<usize>>,
    pub entries: Vec<ComparisonEntry>,
}

/// Fold per-route results into a comparison.
///
/// A route that failed to read, parse, or was empty is dropped and
/// logged; one bad file never aborts the comparison of the others.
/// Entry order follows input order.
pub fn assemble_comparison(
    results: Vec<(String, Result<RouteAnalysis, RouteDataError>)>,
) -> RouteComparison {
    let mut comparison = RouteComparison::default();
    let mut max_len = 0usize;

    for (name, result) in results {
        match result {
            Ok(analysis) => {
                max_len = max_len.max(analysis.len());
                comparison.entries.push(ComparisonEntry { name, analysis });
            }
            Err(err) => {
                tracing::warn!(route = %name, error = %err, "skipping route in comparison");
            }
        }
    }

    if !comparison.entries.is_empty() {
        comparison.labels = Some((0..max_len).collect());
    }
    comparison
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::analyze_route;
    use crate::domain::sample::Sample;

    fn route_of_len(n: usize) -> RouteAnalysis {
        let samples: Vec<Sample> = (0..n)
            .map(|i| Sample {
                lat: i as f64 * 0.01,
                lon: 0.0,
                temperature: 20.0,
                vibration: 3.0,
                humidity: 50.0,
            })
            .collect();
        analyze_route(&samples, 8.0).unwrap()
    }

    #[test]
    fn test_labels_span_the_longest_route() {
        let comparison = assemble_comparison(vec![
            ("a".to_string(), Ok(route_of_len(10))),
            ("b".to_string(), Ok(route_of_len(20))),
            ("c".to_string(), Ok(route_of_len(15))),
        ]);

        let labels = comparison.labels.unwrap();
        assert_eq!(labels.len(), 20);
        assert_eq!(labels.first(), Some(&0));
        assert_eq!(labels.last(), Some(&19));
    }

    #[test]
    fn test_entries_preserve_caller_order() {
        let comparison = assemble_comparison(vec![
            ("short".to_string(), Ok(route_of_len(2))),
            ("long".to_string(), Ok(route_of_len(5))),
            ("middle".to_string(), Ok(route_of_len(3))),
        ]);

        let names: Vec<&str> = comparison.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["short", "long", "middle"]);
    }

    #[test]
    fn test_failed_routes_are_skipped() {
        let comparison = assemble_comparison(vec![
            ("empty".to_string(), Err(RouteDataError::EmptyRoute)),
            ("valid".to_string(), Ok(route_of_len(4))),
        ]);

        assert_eq!(comparison.entries.len(), 1);
        assert_eq!(comparison.entries[0].name, "valid");
        // Labels reflect only the surviving route.
        assert_eq!(comparison.labels.unwrap().len(), 4);
    }

    #[test]
    fn test_all_routes_failing_is_a_valid_result() {
        let comparison = assemble_comparison(vec![
            ("a".to_string(), Err(RouteDataError::EmptyRoute)),
            (
                "b".to_string(),
                Err(RouteDataError::Parse {
                    line: 3,
                    reason: "bad cell".to_string(),
                }),
            ),
        ]);

        assert!(comparison.labels.is_none());
        assert!(comparison.entries.is_empty());
    }
}
