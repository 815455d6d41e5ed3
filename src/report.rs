//! Result aggregation.
//!
//! [`run_probes`] probes every target in configuration order, one at a time,
//! and collects the outcomes into a [`Report`] with the same order. Chart rows
//! follow that order.

use crate::config::Target;
use crate::probe::{ProbeOutcome, Prober, ReachabilityProbe};

/// Ordered outcomes of one probe pass, one per configured target.
///
/// Entries are kept exactly as pushed. Target names are expected to be
/// unique (the config loader rejects duplicates); if they are not, every
/// entry is still kept and [`Report::get`] returns the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    outcomes: Vec<ProbeOutcome>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the outcome for the next target.
    pub fn push(&mut self, outcome: ProbeOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Look up an outcome by target name. The first entry wins.
    pub fn get(&self, name: &str) -> Option<&ProbeOutcome> {
        self.outcomes.iter().find(|o| o.name() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProbeOutcome> {
        self.outcomes.iter()
    }

    /// Target names in report order.
    pub fn names(&self) -> Vec<&str> {
        self.outcomes.iter().map(ProbeOutcome::name).collect()
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded).count()
    }

    pub fn failed_count(&self) -> usize {
        self.len() - self.succeeded_count()
    }

    pub fn into_outcomes(self) -> Vec<ProbeOutcome> {
        self.outcomes
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a ProbeOutcome;
    type IntoIter = std::slice::Iter<'a, ProbeOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

impl FromIterator<ProbeOutcome> for Report {
    fn from_iter<I: IntoIterator<Item = ProbeOutcome>>(iter: I) -> Self {
        let mut report = Self::new();
        for outcome in iter {
            report.push(outcome);
        }
        report
    }
}

/// Probe every target sequentially and build the report.
///
/// Each target is fully resolved (and logged) before the next one starts.
/// There are no retries; a failing target never stops the pass.
pub async fn run_probes<P: ReachabilityProbe>(
    prober: &Prober<P>,
    targets: &[Target],
    attempts: u32,
    timeout_secs: u64,
) -> Report {
    tracing::info!(
        targets = targets.len(),
        attempts,
        timeout_secs,
        "Starting probe pass"
    );

    let mut report = Report::new();
    for target in targets {
        let outcome = prober.probe(target, attempts, timeout_secs).await;
        tracing::debug!(
            name = %target.name,
            address = %target.address,
            succeeded = outcome.succeeded,
            average_rtt = %outcome.average_rtt,
            "Probe finished"
        );
        report.push(outcome);
    }

    tracing::info!(
        succeeded = report.succeeded_count(),
        failed = report.failed_count(),
        "Probe pass complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogSink;
    use crate::probe::{OutputDialect, ProbeError, RawProbeResult};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Replies to every address except those listed as down, recording the
    /// order of calls.
    struct OrderedProbe {
        down: Vec<&'static str>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl ReachabilityProbe for OrderedProbe {
        fn dialect(&self) -> OutputDialect {
            OutputDialect::Unix
        }

        async fn check(
            &self,
            address: &str,
            _attempts: u32,
            _timeout: Duration,
        ) -> Result<RawProbeResult, ProbeError> {
            self.seen.lock().unwrap().push(address.to_string());
            if self.down.iter().any(|down| *down == address) {
                Ok(RawProbeResult::new("100% packet loss").with_exit_code(Some(1)))
            } else {
                Ok(RawProbeResult::new(format!(
                    "64 bytes from {address}: icmp_seq=1 ttl=64 time=1.0 ms\n\
                     rtt min/avg/max/mdev = 1.0/1.0/1.0/0.0 ms\n"
                )))
            }
        }
    }

    fn prober(down: Vec<&'static str>) -> Prober<OrderedProbe> {
        let probe = OrderedProbe {
            down,
            seen: Mutex::new(Vec::new()),
        };
        Prober::new(probe, Arc::new(LogSink::from_writer(std::io::sink())))
    }

    fn targets(n: usize) -> Vec<Target> {
        (0..n)
            .map(|i| Target::new(format!("dept-{i:02}"), format!("10.0.{}.{}", i / 250, i % 250 + 1)))
            .rev()
            .collect()
    }

    #[tokio::test]
    async fn test_report_matches_config_order() {
        for n in [0, 1, 2, 7, 30] {
            let targets = targets(n);
            let prober = prober(vec![]);

            let report = run_probes(&prober, &targets, 1, 1).await;

            let expected: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
            assert_eq!(report.len(), n);
            assert_eq!(report.names(), expected);

            let seen = prober.reachability().seen.lock().unwrap().clone();
            let addresses: Vec<String> = targets.iter().map(|t| t.address.clone()).collect();
            assert_eq!(seen, addresses);
        }
    }

    #[tokio::test]
    async fn test_partial_failure_does_not_stop_pass() {
        let targets = vec![
            Target::new("HQ", "10.0.0.1"),
            Target::new("Branch", "10.0.0.2"),
            Target::new("Depot", "10.0.0.3"),
        ];
        let prober = prober(vec!["10.0.0.2"]);

        let report = run_probes(&prober, &targets, 4, 5).await;

        assert_eq!(report.len(), 3);
        assert!(report.get("HQ").unwrap().succeeded);
        assert!(!report.get("Branch").unwrap().succeeded);
        assert!(report.get("Depot").unwrap().succeeded);
        assert_eq!(report.get("HQ").unwrap().average_rtt, "1.0ms");
        assert_eq!(report.succeeded_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert!(report.get("Nowhere").is_none());
    }

    #[tokio::test]
    async fn test_unvalidated_duplicate_targets_are_all_reported() {
        let targets = vec![
            Target::new("HQ", "10.0.0.1"),
            Target::new("HQ", "10.0.0.2"),
        ];
        let prober = prober(vec!["10.0.0.2"]);

        let report = run_probes(&prober, &targets, 1, 1).await;

        assert_eq!(report.names(), vec!["HQ", "HQ"]);
        assert_eq!(report.get("HQ").unwrap().target.address, "10.0.0.1");
        assert_eq!(report.failed_count(), 1);
    }

    #[test]
    fn test_report_from_iter_and_into_iter() {
        let report: Report = ["A", "B"]
            .into_iter()
            .map(|name| {
                ProbeOutcome::failure(Target::new(name, "x"), "Ping timed out", "2024-01-01 00:00:00")
            })
            .collect();

        let names: Vec<&str> = (&report).into_iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(report.into_outcomes().len(), 2);
    }
}
