// ── Server version compatibility ──
//
// The NVR API changed shape across releases; only versions on the
// allow-list or inside a supported range are driven without complaint.

use std::cmp::Ordering;

/// Compare dotted version strings numerically, segment by segment.
///
/// Missing trailing segments count as zero. Returns `None` when either side
/// has a non-numeric segment, so callers treat the result as indeterminate.
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    let parse = |v: &str| -> Option<Vec<u64>> {
        v.trim().split('.').map(|s| s.parse().ok()).collect()
    };
    let (a, b) = (parse(a)?, parse(b)?);

    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => {}
            other => return Some(other),
        }
    }
    Some(Ordering::Equal)
}

/// Allow-list plus inclusive ranges of supported server versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGate {
    allow: Vec<String>,
    ranges: Vec<(String, String)>,
}

impl Default for VersionGate {
    fn default() -> Self {
        Self::new(["3.9.12"], [("3.10.0", "3.10.13")])
    }
}

impl VersionGate {
    pub fn new<'a>(
        allow: impl IntoIterator<Item = &'a str>,
        ranges: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            allow: allow.into_iter().map(str::to_owned).collect(),
            ranges: ranges
                .into_iter()
                .map(|(lo, hi)| (lo.to_owned(), hi.to_owned()))
                .collect(),
        }
    }

    /// Whether `version` is on the allow-list or inside any range.
    ///
    /// An absent or unparseable version is never supported.
    pub fn is_supported(&self, version: Option<&str>) -> bool {
        let Some(version) = version else {
            return false;
        };
        if self.allow.iter().any(|v| v == version) {
            return true;
        }
        self.ranges.iter().any(|(lo, hi)| {
            matches!(
                compare_versions(version, lo),
                Some(Ordering::Greater | Ordering::Equal)
            ) && matches!(
                compare_versions(version, hi),
                Some(Ordering::Less | Ordering::Equal)
            )
        })
    }
}
